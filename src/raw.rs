//
// Copyright (c) 2025 Nathan Fiedler
//

//! Owning wrapper around a single contiguous allocation.
//!
//! The buffer knows its capacity but nothing about which slots hold live
//! values. Its owner is responsible for writing, reading, and dropping
//! elements; the buffer only allocates and deallocates memory.

use crate::error::ArrayError;
use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

/// A fixed-capacity block of uninitialized element slots.
///
/// Zero-sized types and zero capacity never allocate; the pointer is left
/// dangling in that case.
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer exclusively owns its allocation, like a `Box<[T]>`.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out shared references to slots.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Return an empty buffer that owns no allocation.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate a buffer with room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the allocation would exceed `isize::MAX` _bytes_. If the
    /// allocator fails, [`handle_alloc_error`] is invoked.
    pub fn with_capacity(capacity: usize) -> Self {
        let Ok(layout) = Layout::array::<T>(capacity) else {
            panic!("capacity overflow: {capacity} slots");
        };
        Self::allocate(capacity, layout).unwrap_or_else(|| handle_alloc_error(layout))
    }

    /// Allocate a buffer with room for `capacity` elements, returning an
    /// error rather than aborting if memory is unavailable.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        let oom = ArrayError::OutOfMemory { capacity };
        let layout = Layout::array::<T>(capacity).map_err(|_| oom.clone())?;
        Self::allocate(capacity, layout).ok_or(oom)
    }

    fn allocate(capacity: usize, layout: Layout) -> Option<Self> {
        if layout.size() == 0 {
            return Some(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }
        let ptr = unsafe { alloc(layout) }.cast::<T>();
        NonNull::new(ptr).map(|ptr| Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Re-adopt an allocation previously handed out by [`RawBuffer::release`].
    ///
    /// # Safety
    ///
    /// `ptr` and `capacity` must be exactly the pair returned by `release()`
    /// for the same `T`, and the allocation must not be owned elsewhere.
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, capacity: usize) -> Self {
        Self {
            ptr,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Give up ownership of the allocation, returning the pointer and the
    /// capacity it was allocated with. The buffer is left empty and dropping
    /// it no longer frees anything.
    #[must_use]
    pub fn release(&mut self) -> (NonNull<T>, usize) {
        let ptr = mem::replace(&mut self.ptr, NonNull::dangling());
        let capacity = mem::take(&mut self.capacity);
        (ptr, capacity)
    }

    /// Number of element slots in the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if the buffer currently owns heap memory.
    pub fn is_allocated(&self) -> bool {
        self.layout().is_some()
    }

    /// Exchange allocations with another buffer without moving elements.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Pointer to the first slot; dangling if nothing is allocated.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first slot; dangling if nothing is allocated.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to the slot at `offset`; `offset == capacity` yields the one
    /// past the end pointer.
    ///
    /// # Safety
    ///
    /// `offset` must not exceed the capacity.
    #[inline]
    pub unsafe fn slot(&self, offset: usize) -> *mut T {
        debug_assert!(offset <= self.capacity);
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// # Safety
    ///
    /// `offset` must be below the capacity and the slot must be initialized.
    #[inline]
    pub unsafe fn get(&self, offset: usize) -> &T {
        debug_assert!(offset < self.capacity);
        unsafe { &*self.slot(offset) }
    }

    /// # Safety
    ///
    /// `offset` must be below the capacity and the slot must be initialized.
    #[inline]
    pub unsafe fn get_mut(&mut self, offset: usize) -> &mut T {
        debug_assert!(offset < self.capacity);
        unsafe { &mut *self.slot(offset) }
    }

    /// Write a value into a slot without dropping whatever was there.
    ///
    /// # Safety
    ///
    /// `offset` must be below the capacity. Any live value in the slot is
    /// leaked.
    #[inline]
    pub unsafe fn write(&mut self, offset: usize, value: T) {
        debug_assert!(offset < self.capacity);
        unsafe { ptr::write(self.slot(offset), value) }
    }

    /// Move the value out of a slot, leaving it logically uninitialized.
    ///
    /// # Safety
    ///
    /// `offset` must be below the capacity and the slot must be initialized.
    /// The caller must not read or drop the slot again until it is written.
    #[inline]
    pub unsafe fn read(&self, offset: usize) -> T {
        debug_assert!(offset < self.capacity);
        unsafe { ptr::read(self.slot(offset)) }
    }

    // Layout of the owned allocation, if there is one.
    fn layout(&self) -> Option<Layout> {
        let layout = Layout::array::<T>(self.capacity).ok()?;
        (layout.size() != 0).then_some(layout)
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout() {
            unsafe {
                dealloc(self.ptr.as_ptr().cast::<u8>(), layout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unallocated() {
        let sut: RawBuffer<u64> = RawBuffer::new();
        assert_eq!(sut.capacity(), 0);
        assert!(!sut.is_allocated());
        let sut: RawBuffer<u64> = RawBuffer::default();
        assert!(!sut.is_allocated());
    }

    #[test]
    fn test_with_capacity_zero() {
        let sut: RawBuffer<String> = RawBuffer::with_capacity(0);
        assert_eq!(sut.capacity(), 0);
        assert!(!sut.is_allocated());
    }

    #[test]
    fn test_with_capacity_allocates() {
        let sut: RawBuffer<u32> = RawBuffer::with_capacity(16);
        assert_eq!(sut.capacity(), 16);
        assert!(sut.is_allocated());
    }

    #[test]
    fn test_write_read_slots() {
        let mut sut: RawBuffer<String> = RawBuffer::with_capacity(4);
        unsafe {
            sut.write(0, String::from("first"));
            sut.write(3, String::from("last"));
            assert_eq!(sut.get(0), "first");
            sut.get_mut(3).push_str(" one");
            assert_eq!(sut.get(3), "last one");
            // the buffer never drops elements, so move them back out
            assert_eq!(sut.read(0), "first");
            assert_eq!(sut.read(3), "last one");
        }
    }

    #[test]
    fn test_swap_exchanges_allocations() {
        let mut a: RawBuffer<u8> = RawBuffer::with_capacity(2);
        let mut b: RawBuffer<u8> = RawBuffer::with_capacity(8);
        let a_ptr = a.as_ptr();
        let b_ptr = b.as_ptr();
        a.swap(&mut b);
        assert_eq!(a.capacity(), 8);
        assert_eq!(b.capacity(), 2);
        assert_eq!(a.as_ptr(), b_ptr);
        assert_eq!(b.as_ptr(), a_ptr);
    }

    #[test]
    fn test_swap_with_empty() {
        let mut a: RawBuffer<u8> = RawBuffer::with_capacity(3);
        let mut b: RawBuffer<u8> = RawBuffer::new();
        a.swap(&mut b);
        assert!(!a.is_allocated());
        assert!(b.is_allocated());
        assert_eq!(b.capacity(), 3);
    }

    #[test]
    fn test_release_and_readopt() {
        let mut sut: RawBuffer<u16> = RawBuffer::with_capacity(5);
        unsafe { sut.write(4, 404) };
        let (ptr, capacity) = sut.release();
        assert_eq!(capacity, 5);
        assert!(!sut.is_allocated());
        assert_eq!(sut.capacity(), 0);
        drop(sut);
        let back = unsafe { RawBuffer::from_raw_parts(ptr, capacity) };
        assert!(back.is_allocated());
        assert_eq!(unsafe { *back.get(4) }, 404);
    }

    #[test]
    fn test_try_with_capacity_overflow() {
        let result: Result<RawBuffer<u64>, _> = RawBuffer::try_with_capacity(usize::MAX);
        assert_eq!(
            result.err(),
            Some(ArrayError::OutOfMemory {
                capacity: usize::MAX
            })
        );
    }

    #[test]
    fn test_try_with_capacity_ok() {
        let sut: RawBuffer<u64> = RawBuffer::try_with_capacity(7).unwrap();
        assert_eq!(sut.capacity(), 7);
        assert!(sut.is_allocated());
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_with_capacity_overflow_panics() {
        let _sut: RawBuffer<u64> = RawBuffer::with_capacity(usize::MAX);
    }

    #[test]
    fn test_zero_sized_never_allocates() {
        let mut sut: RawBuffer<()> = RawBuffer::with_capacity(1_000);
        assert_eq!(sut.capacity(), 1_000);
        assert!(!sut.is_allocated());
        unsafe {
            sut.write(999, ());
            sut.read(999);
        }
    }
}
