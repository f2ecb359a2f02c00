//
// Copyright (c) 2025 Nathan Fiedler
//

//! Error type for the checked and fallible array operations.

use std::error::Error;
use std::fmt;

/// Errors that can be returned by the growable array.
///
/// Contract violations such as popping from an empty array are not
/// represented here; those panic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// A checked accessor was given an index at or beyond the length.
    OutOfRange {
        /// The index that was requested.
        index: usize,
        /// Number of elements in the array at the time.
        len: usize,
    },
    /// The allocator could not provide the requested number of slots, or the
    /// request exceeded the maximum allocation size.
    OutOfMemory {
        /// Number of element slots requested.
        capacity: usize,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index out of range: index {index}, len {len}")
            }
            Self::OutOfMemory { capacity } => {
                write!(f, "out of memory: unable to allocate {capacity} slots")
            }
        }
    }
}

impl Error for ArrayError {}
