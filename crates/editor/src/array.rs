//! Growable Array
//!
//! Homogeneous resizable sequence with power-of-two capacity management.
//! Capacity doubles when an insertion would overflow it and, after any
//! removal, drops to the smallest power of two that still holds the
//! remaining elements. Capacity never goes below [`MIN_CAPACITY`].
//!
//! Every container of the engine (cells of a line, lines of a table) is a
//! `DynArray`.

use std::ops::{Index, IndexMut, Range};
use std::slice;

/// Smallest capacity an array is ever allocated with
pub const MIN_CAPACITY: usize = 16;

/// Round up to the nearest power of two (1 for 0)
fn round_up_pow2(n: usize) -> usize {
    n.next_power_of_two()
}

/// Capacity an array holding `len` elements is sized to
fn capacity_for(len: usize) -> usize {
    round_up_pow2(len).max(MIN_CAPACITY)
}

/// Power-of-two growable array
#[derive(Debug)]
pub struct DynArray<T> {
    items: Vec<T>,
    /// Logical capacity; the backing vector always holds at least this much.
    capacity: usize,
}

impl<T> DynArray<T> {
    /// Create an empty array with the minimum capacity
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Create an empty array able to hold `capacity` elements.
    ///
    /// The capacity is rounded up to a power of two, and to at least
    /// [`MIN_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity_for(capacity);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Take ownership of the elements of a vector
    pub fn from_vec(mut items: Vec<T>) -> Self {
        let capacity = capacity_for(items.len());
        items.reserve_exact(capacity.saturating_sub(items.len()));
        Self { items, capacity }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements that fit before the next reallocation
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a reference to the element at `index`, if in bounds
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Get a mutable reference to the element at `index`, if in bounds
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Overwrite the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, item: T) {
        self.items[index] = item;
    }

    /// Last element, if any
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Append an element to the end. Amortized O(1).
    pub fn append(&mut self, item: T) {
        self.reserve_for(1);
        self.items.push(item);
    }

    /// Insert an element at `index`, shifting everything after it right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, item: T) {
        assert!(
            index <= self.len(),
            "insert index {} out of range for length {}",
            index,
            self.len()
        );
        self.reserve_for(1);
        self.items.insert(index, item);
    }

    /// Remove and return the element at `index`, shifting everything after it left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn delete(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.try_shrink();
        item
    }

    /// Remove a contiguous range of elements, shrinking at most once.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn delete_range(&mut self, range: Range<usize>) {
        self.items.drain(range);
        self.try_shrink();
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop();
        if item.is_some() {
            self.try_shrink();
        }
        item
    }

    /// Drop every element from `len` onwards
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.items.truncate(len);
            self.try_shrink();
        }
    }

    /// Split the array at `index`.
    ///
    /// `self` keeps the elements before `index`; the returned array holds the
    /// elements at and after it.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn split(&mut self, index: usize) -> Self {
        assert!(
            index <= self.len(),
            "split index {} out of range for length {}",
            index,
            self.len()
        );
        let tail = self.items.split_off(index);
        self.try_shrink();
        Self::from_vec(tail)
    }

    /// Move every element of `src` onto the end of `self`
    pub fn concat(&mut self, src: DynArray<T>) {
        self.reserve_for(src.len());
        self.items.extend(src.items);
    }

    /// Find the first index in `start..=end` whose element matches, scanning left to right
    pub fn find<P>(&self, start: usize, end: usize, mut pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        if self.is_empty() || start > end {
            return None;
        }
        let end = end.min(self.len() - 1);
        (start..=end).find(|&i| pred(&self.items[i]))
    }

    /// Find the last index in `start..=end` whose element matches, scanning right to left
    pub fn rfind<P>(&self, start: usize, end: usize, mut pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        if self.is_empty() || start > end {
            return None;
        }
        let end = end.min(self.len() - 1);
        (start..=end).rev().find(|&i| pred(&self.items[i]))
    }

    /// Iterate over the elements
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate mutably over the elements
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// View the elements as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Double the capacity until `additional` more elements fit
    fn reserve_for(&mut self, additional: usize) {
        let needed = self.len() + additional;
        if needed <= self.capacity {
            return;
        }
        while self.capacity < needed {
            self.capacity <<= 1;
        }
        self.items
            .reserve_exact(self.capacity.saturating_sub(self.items.len()));
    }

    /// Reallocate down to the smallest power of two holding the current length
    fn try_shrink(&mut self) {
        let new_cap = capacity_for(self.len());
        if new_cap < self.capacity {
            self.capacity = new_cap;
            self.items.shrink_to(new_cap);
        }
    }
}

impl<T: Clone> DynArray<T> {
    /// Create an array holding copies of a slice's elements
    pub fn from_slice(items: &[T]) -> Self {
        Self::from_vec(items.to_vec())
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        let mut items = Vec::with_capacity(self.capacity);
        items.extend(self.items.iter().cloned());
        Self {
            items,
            capacity: self.capacity,
        }
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T> Index<usize> for DynArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for DynArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
