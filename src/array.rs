//
// Copyright (c) 2025 Nathan Fiedler
//

use crate::error::ArrayError;
use crate::iter::IntoIter;
use crate::raw::RawBuffer;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::{self, ManuallyDrop};
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull, drop_in_place, slice_from_raw_parts_mut};
use std::slice;

/// Capacity allocated by the first growth of an empty array.
const MIN_CAPACITY: usize = 1;

/// Factor by which a full array grows on append or insert.
const GROWTH_FACTOR: usize = 2;

/// Compute the capacity that follows `capacity` under the doubling policy.
#[inline]
fn next_capacity(capacity: usize) -> Option<usize> {
    if capacity == 0 {
        Some(MIN_CAPACITY)
    } else {
        capacity.checked_mul(GROWTH_FACTOR)
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

/// Requested capacity for an array that is built empty but pre-allocated.
///
/// Build one with [`reserve()`] and hand it to [`GrowableArray::from`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reservation {
    capacity: usize,
}

impl Reservation {
    /// Return a reservation for `capacity` slots.
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Number of slots that will be allocated.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Return a reservation for `capacity_to_reserve` slots.
///
/// ```
/// use growarray::{GrowableArray, reserve};
///
/// let array: GrowableArray<u32> = GrowableArray::from(reserve(10));
/// assert_eq!(array.len(), 0);
/// assert_eq!(array.capacity(), 10);
/// ```
pub const fn reserve(capacity_to_reserve: usize) -> Reservation {
    Reservation::new(capacity_to_reserve)
}

///
/// Contiguous growable array backed by a single allocation.
///
pub struct GrowableArray<T> {
    /// owned storage, slots `[0, len)` are initialized
    buffer: RawBuffer<T>,
    /// number of initialized elements
    len: usize,
}

impl<T> GrowableArray<T> {
    /// Return an empty array with zero capacity.
    pub const fn new() -> Self {
        Self {
            buffer: RawBuffer::new(),
            len: 0,
        }
    }

    /// Return an empty array with room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the allocation would exceed `isize::MAX` _bytes_.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: RawBuffer::with_capacity(capacity),
            len: 0,
        }
    }

    /// Return an empty array whose capacity is taken from the reservation.
    pub fn from_reservation(reservation: Reservation) -> Self {
        Self::with_capacity(reservation.capacity())
    }

    /// Return an array of `size` default values, with capacity equal to the
    /// size.
    pub fn with_size(size: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity(size);
        array.extend_with(size, T::default);
        array
    }

    /// Return an array holding `size` copies of `value`, with capacity equal
    /// to the size.
    pub fn from_elem(size: usize, value: &T) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(size);
        array.extend_with(size, || value.clone());
        array
    }

    /// Return an array holding `size` copies of `value`, consuming it.
    ///
    /// The first `size - 1` slots receive clones and the last receives
    /// `value` itself, so no slot ever holds a moved-from value. If `size` is
    /// zero the value is dropped.
    pub fn filled(size: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(size);
        if size > 0 {
            array.extend_with(size - 1, || value.clone());
            array.push_back(value);
        }
        array
    }

    /// Create an array directly from its raw parts.
    ///
    /// # Safety
    ///
    /// The parts must come from [`GrowableArray::into_raw_parts`] for the
    /// same `T`, with `len <= capacity` and the first `len` slots still
    /// initialized.
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, len: usize, capacity: usize) -> Self {
        debug_assert!(len <= capacity);
        Self {
            buffer: unsafe { RawBuffer::from_raw_parts(ptr, capacity) },
            len,
        }
    }

    /// Decompose the array into its pointer, length, and capacity. The
    /// caller becomes responsible for the elements and the allocation, which
    /// can be handed back via [`GrowableArray::from_raw_parts`].
    #[must_use]
    pub fn into_raw_parts(self) -> (NonNull<T>, usize, usize) {
        let mut me = ManuallyDrop::new(self);
        let len = me.len;
        let (ptr, capacity) = me.buffer.release();
        (ptr, len, capacity)
    }

    /// Return the number of elements in the array.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the total number of elements the array can hold without
    /// reallocating.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns true if the array has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Retrieve a reference to the element at the given offset.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            None
        } else {
            unsafe { Some(self.buffer.get(index)) }
        }
    }

    /// Returns a mutable reference to an element.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            None
        } else {
            unsafe { Some(self.buffer.get_mut(index)) }
        }
    }

    /// Bounds-checked access, failing with [`ArrayError::OutOfRange`] if
    /// `index` is not below the length.
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len;
        self.get(index).ok_or(ArrayError::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.get_mut(index).ok_or(ArrayError::OutOfRange { index, len })
    }

    /// Returns a reference to an element without checking the bounds.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`; this is only checked in debug
    /// builds.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index out of bounds: {index}");
        unsafe { self.buffer.get(index) }
    }

    /// Mutable counterpart of [`GrowableArray::get_unchecked`].
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index out of bounds: {index}");
        unsafe { self.buffer.get_mut(index) }
    }

    /// Returns the first element, or `None` if the array is empty.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the last element, or `None` if the array is empty.
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Pointer to the first slot. Valid until the next operation that
    /// changes the capacity.
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Mutable pointer to the first slot, with the same validity as
    /// [`GrowableArray::as_ptr`].
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_mut_ptr()
    }

    /// View the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// View the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.len) }
    }

    /// Returns an iterator over the elements, front to back.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns an iterator that allows modifying each element.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Ensure the capacity is at least `new_capacity`, reallocating to
    /// exactly that many slots if it is currently smaller. Never reduces the
    /// capacity.
    ///
    /// # Panics
    ///
    /// Panics if the allocation would exceed `isize::MAX` _bytes_.
    ///
    /// # Time complexity
    ///
    /// O(n) when reallocating, otherwise constant time.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.capacity() {
            self.relocate(RawBuffer::with_capacity(new_capacity));
        }
    }

    /// Fallible form of [`GrowableArray::reserve`]. On error the array is
    /// left unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        if new_capacity > self.capacity() {
            self.relocate(RawBuffer::try_with_capacity(new_capacity)?);
        }
        Ok(())
    }

    // Move every element into `fresh` and make it the active buffer. The
    // old allocation is released when `fresh` goes out of scope.
    fn relocate(&mut self, mut fresh: RawBuffer<T>) {
        debug_assert!(fresh.capacity() >= self.len);
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.as_ptr(), fresh.as_mut_ptr(), self.len);
        }
        self.buffer.swap(&mut fresh);
    }

    // Append `count` values produced by `f`. The capacity must already be
    // sufficient. The length is bumped after every write so that a panic in
    // `f` leaves only initialized slots counted.
    fn extend_with(&mut self, count: usize, mut f: impl FnMut() -> T) {
        debug_assert!(self.len + count <= self.capacity());
        for _ in 0..count {
            let value = f();
            let len = self.len;
            unsafe { self.buffer.write(len, value) };
            self.len += 1;
        }
    }

    /// Change the length to `new_len`, filling new slots with values
    /// returned by `f` and dropping any elements beyond `new_len`.
    ///
    /// Growing past the capacity reserves exactly `new_len` slots.
    pub fn resize_with(&mut self, new_len: usize, f: impl FnMut() -> T) {
        if new_len > self.len {
            self.reserve(new_len);
            self.extend_with(new_len - self.len, f);
        } else {
            self.truncate(new_len);
        }
    }

    /// Change the length to `new_len`, filling new slots with the default
    /// value. The capacity never shrinks.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Fallible form of [`GrowableArray::resize`].
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), ArrayError>
    where
        T: Default,
    {
        if new_len > self.len {
            self.try_reserve(new_len)?;
            self.extend_with(new_len - self.len, T::default);
        } else {
            self.truncate(new_len);
        }
        Ok(())
    }

    /// Drop the elements at and beyond `new_len`. Has no effect if `new_len`
    /// is not below the current length.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len < self.len {
            let tail = self.len - new_len;
            // shorten first in case a destructor panics
            self.len = new_len;
            unsafe {
                drop_in_place(slice_from_raw_parts_mut(self.buffer.slot(new_len), tail));
            }
        }
    }

    /// Drop all elements, keeping the allocated capacity.
    ///
    /// # Time complexity
    ///
    /// O(n) if elements are droppable, otherwise constant time.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Appends an element to the back of the array.
    ///
    /// When the array is full the capacity doubles, or becomes one if it was
    /// zero.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity would exceed `isize::MAX` _bytes_.
    ///
    /// # Time complexity
    ///
    /// Amortized constant time.
    pub fn push_back(&mut self, value: T) {
        if self.len == self.capacity() {
            let capacity = next_capacity(self.capacity()).unwrap_or_else(|| capacity_overflow());
            self.reserve(capacity);
        }
        let len = self.len;
        unsafe { self.buffer.write(len, value) };
        self.len += 1;
    }

    /// Fallible form of [`GrowableArray::push_back`]. If memory cannot be
    /// allocated the value is dropped and the array is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<(), ArrayError> {
        if self.len == self.capacity() {
            let capacity = next_capacity(self.capacity()).ok_or(ArrayError::OutOfMemory {
                capacity: usize::MAX,
            })?;
            self.try_reserve(capacity)?;
        }
        let len = self.len;
        unsafe { self.buffer.write(len, value) };
        self.len += 1;
        Ok(())
    }

    /// Removes the last element and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) -> T {
        assert!(!self.is_empty(), "pop_back on an empty array");
        self.len -= 1;
        unsafe { self.buffer.read(self.len) }
    }

    fn assert_insert_index(&self, index: usize) {
        if index > self.len {
            panic!(
                "insert index (is {index}) should be <= len (is {})",
                self.len
            );
        }
    }

    /// Inserts `value` before the element at `index`, shifting everything
    /// after it one slot to the right, and returns the index of the inserted
    /// element.
    ///
    /// A full array grows exactly as [`GrowableArray::push_back`] does.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Time complexity
    ///
    /// O(n - index), or O(n) if the array reallocates.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.assert_insert_index(index);
        if self.len == self.capacity() {
            let capacity = next_capacity(self.capacity()).unwrap_or_else(|| capacity_overflow());
            self.insert_relocating(index, value, RawBuffer::with_capacity(capacity));
        } else {
            self.insert_in_place(index, value);
        }
        index
    }

    /// Fallible form of [`GrowableArray::insert`]. If memory cannot be
    /// allocated the value is dropped and the array is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<usize, ArrayError> {
        self.assert_insert_index(index);
        if self.len == self.capacity() {
            let capacity = next_capacity(self.capacity()).ok_or(ArrayError::OutOfMemory {
                capacity: usize::MAX,
            })?;
            self.insert_relocating(index, value, RawBuffer::try_with_capacity(capacity)?);
        } else {
            self.insert_in_place(index, value);
        }
        Ok(index)
    }

    fn insert_in_place(&mut self, index: usize, value: T) {
        debug_assert!(self.len < self.capacity());
        unsafe {
            let hole = self.buffer.slot(index);
            // overlapping shift toward the end, the copy handles direction
            ptr::copy(hole, hole.add(1), self.len - index);
            ptr::write(hole, value);
        }
        self.len += 1;
    }

    // Lay out prefix, value, and suffix in `fresh`, then swap it in.
    fn insert_relocating(&mut self, index: usize, value: T, mut fresh: RawBuffer<T>) {
        debug_assert!(fresh.capacity() > self.len);
        unsafe {
            let src = self.buffer.as_ptr();
            let dst = fresh.as_mut_ptr();
            ptr::copy_nonoverlapping(src, dst, index);
            ptr::write(dst.add(index), value);
            ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), self.len - index);
        }
        self.buffer.swap(&mut fresh);
        self.len += 1;
    }

    /// Removes the element at `index` and returns it, shifting everything
    /// after it one slot to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        if index >= self.len {
            panic!("remove index (is {index}) should be < len (is {})", self.len);
        }
        unsafe {
            let hole = self.buffer.slot(index);
            let value = ptr::read(hole);
            ptr::copy(hole.add(1), hole, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drops the element at `index`, shifting the rest left, and returns the
    /// index that now holds the following element (equal to `len()` if the
    /// last element was erased).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Exchange contents with another array in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        self.buffer.swap(&mut other.buffer);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Move the contents out into a new array, leaving this one empty with
    /// zero capacity. No elements are copied.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Clone and append every element of `values`.
    pub fn extend_from_slice(&mut self, values: &[T])
    where
        T: Clone,
    {
        for value in values {
            self.push_back(value.clone());
        }
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GrowableArray<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone> Clone for GrowableArray<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        for value in self.iter() {
            copy.push_back(value.clone());
        }
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T> From<Reservation> for GrowableArray<T> {
    fn from(reservation: Reservation) -> Self {
        Self::from_reservation(reservation)
    }
}

impl<T, const N: usize> From<[T; N]> for GrowableArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut array = Self::with_capacity(N);
        for value in values {
            array.push_back(value);
        }
        array
    }
}

impl<T: Clone> From<&[T]> for GrowableArray<T> {
    fn from(values: &[T]) -> Self {
        let mut array = Self::with_capacity(values.len());
        array.extend_from_slice(values);
        array
    }
}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for GrowableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let needed = self.len.saturating_add(lower);
        if needed > self.capacity() {
            // never grow by less than the doubling policy would
            let grown = next_capacity(self.capacity()).unwrap_or(needed);
            self.reserve(needed.max(grown));
        }
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> Index<usize> for GrowableArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        let Some(item) = self.get(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<T> IndexMut<usize> for GrowableArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let Some(item) = self.get_mut(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<T> IntoIterator for GrowableArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let mut me = ManuallyDrop::new(self);
        let buffer = mem::take(&mut me.buffer);
        IntoIter::new(buffer, me.len)
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq<U>, U> PartialEq<GrowableArray<U>> for GrowableArray<T> {
    fn eq(&self, other: &GrowableArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowableArray<T> {}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for GrowableArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<[U]> for GrowableArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for GrowableArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialOrd> PartialOrd for GrowableArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for GrowableArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for GrowableArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> fmt::Display for GrowableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GrowableArray(len: {}, capacity: {})",
            self.len,
            self.capacity()
        )
    }
}
