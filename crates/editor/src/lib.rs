//! tedit Editor
//!
//! Text engine of the editor:
//! - Power-of-two growable array used for every container
//! - Tab-expanded lines where column and cell index coincide
//! - Cursor, viewport and scroll sync
//! - Edit operations, file buffers and the shared editor state

pub mod array;
pub mod buffer;
pub mod commands;
pub mod cursor;
pub mod edit;
pub mod line;
pub mod lines;
pub mod lock;
pub mod render;
pub mod state;
pub mod tab;
pub mod view;

pub use array::DynArray;
pub use buffer::FileBuffer;
pub use commands::{Command, CommandResult};
pub use cursor::{Cursor, Direction, Position};
pub use line::Line;
pub use lines::{LineTable, StoreTarget};
pub use render::{Frame, FrameRow};
pub use state::{EditorState, SharedState};
pub use tab::Cell;
pub use view::{ScreenSize, Viewport};
