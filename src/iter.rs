//
// Copyright (c) 2025 Nathan Fiedler
//

use crate::raw::RawBuffer;
use std::fmt;
use std::iter::FusedIterator;
use std::ptr::{drop_in_place, slice_from_raw_parts_mut};

/// An iterator that moves out of a growable array.
///
/// Elements that are never yielded are dropped along with the iterator.
pub struct IntoIter<T> {
    buffer: RawBuffer<T>,
    /// next slot to yield from the front
    index: usize,
    /// one past the next slot to yield from the back
    end: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(buffer: RawBuffer<T>, len: usize) -> Self {
        Self {
            buffer,
            index: 0,
            end: len,
        }
    }

    /// Returns the remaining elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.buffer.slot(self.index), self.end - self.index) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.end {
            let value = unsafe { self.buffer.read(self.index) };
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.index < self.end {
            self.end -= 1;
            unsafe { Some(self.buffer.read(self.end)) }
        } else {
            None
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        if std::mem::needs_drop::<T>() && self.index < self.end {
            unsafe {
                drop_in_place(slice_from_raw_parts_mut(
                    self.buffer.slot(self.index),
                    self.end - self.index,
                ));
            }
        }
        // the buffer deallocates itself once the remaining values are gone
    }
}
