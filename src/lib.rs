//
// Copyright (c) 2025 Nathan Fiedler
//

//! A contiguous, growable array that manages its own allocation.
//!
//! [`GrowableArray`] is built on [`RawBuffer`], a fixed-capacity block of
//! uninitialized slots that only knows how to allocate, deallocate, and
//! hand out pointers. The array layers a logical length on top and owns the
//! lifetime of every element it stores.
//!
//! # Growth
//!
//! Appending or inserting into a full array allocates a new buffer with
//! double the capacity (or a single slot if the capacity was zero), moves
//! the elements across, and swaps it in. Explicit reservation and resizing
//! allocate exactly the requested capacity. Capacity never shrinks when
//! elements are removed.
//!
//! The new buffer is always allocated before any element is moved, so a
//! failed allocation through one of the `try_` operations leaves the array
//! exactly as it was.
//!
//! # Access
//!
//! Indexing with `[]` panics on an out-of-range index, while
//! [`GrowableArray::at`] reports [`ArrayError::OutOfRange`] instead. The
//! unchecked path is [`GrowableArray::get_unchecked`], which only asserts in
//! debug builds.
//!
//! # Safety
//!
//! Because this data structure is allocating memory, copying bytes using
//! pointers, and de-allocating memory as needed, there are many `unsafe` blocks
//! throughout the code.

mod array;
mod error;
mod iter;
mod raw;

pub use array::{GrowableArray, Reservation, reserve};
pub use error::ArrayError;
pub use iter::IntoIter;
pub use raw::RawBuffer;

/// Create a [`GrowableArray`] from a list of values, or from a value and a
/// repeat count.
///
/// ```
/// use growarray::growable;
///
/// let list = growable![1, 2, 3];
/// assert_eq!(list, [1, 2, 3]);
/// assert_eq!(list.capacity(), 3);
///
/// let repeated = growable![String::from("x"); 2];
/// assert_eq!(repeated, ["x", "x"]);
/// ```
#[macro_export]
macro_rules! growable {
    () => {
        $crate::GrowableArray::new()
    };
    ($value:expr; $size:expr) => {
        $crate::GrowableArray::filled($size, $value)
    };
    ($($value:expr),+ $(,)?) => {
        $crate::GrowableArray::from([$($value),+])
    };
}
