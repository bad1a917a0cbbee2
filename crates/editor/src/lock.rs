//! Advisory file locking
//!
//! Loads and stores hold an exclusive `flock` on the file for their whole
//! duration so two editors never interleave writes. Acquisition never
//! blocks: a held lock is reported as [`TeditError::Locked`].

use std::fs::File;
use std::path::Path;

use tedit_core::{Result, TeditError};

/// Exclusive advisory lock released on drop
#[derive(Debug)]
pub struct FileLock<'a> {
    #[cfg_attr(not(unix), allow(dead_code))]
    file: &'a File,
}

impl<'a> FileLock<'a> {
    /// Try to take an exclusive lock on an open file
    #[cfg(unix)]
    pub fn exclusive(file: &'a File, path: &Path) -> Result<Self> {
        use std::os::unix::io::AsRawFd;

        // SAFETY: the descriptor is borrowed from a live `File`.
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc != 0 {
            return Err(TeditError::from_io(std::io::Error::last_os_error(), path));
        }
        Ok(Self { file })
    }

    #[cfg(not(unix))]
    pub fn exclusive(file: &'a File, _path: &Path) -> Result<Self> {
        Ok(Self { file })
    }
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;

            // SAFETY: the descriptor outlives the lock by the borrow.
            unsafe {
                libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
            }
        }
    }
}
