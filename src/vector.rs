//! Contiguous vector that stores its first `N` elements inline and spills to the heap.
//!
//! Provides [`SmallVector`] — keeps up to `N` elements in a `[MaybeUninit<T>; N]` arena
//! embedded in the value itself and migrates them to a `std::vec::Vec` the first time the
//! arena overflows.  The migration (the *switchover*) happens at most once per instance:
//! a heap-backed vector stays heap-backed even after it shrinks back below `N`.
//!
//! Because it `Deref`s to `[T]`, all standard slice methods are available without
//! conversion.  [`AnyVec`] is a slice-view trait implemented by `SmallVector`, `Vec`,
//! slices and arrays to enable generic comparison and extension helpers.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::{self, MaybeUninit};
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;
use std::collections::TryReserveError;

use crate::cursor::{Cursor, CursorMut};
use crate::error::TryPushError;

/// A trait generalizing any vector-like contiguous collection.
pub trait AnyVec<T> {
    fn as_slice(&self) -> &[T];

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().contains(x)
    }

    fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T> AnyVec<T> for std::vec::Vec<T> {
    fn as_slice(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AnyVec<T> for [T] {
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> AnyVec<T> for [T; N] {
    fn as_slice(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> AnyVec<T> for SmallVector<T, N> {
    fn as_slice(&self) -> &[T] {
        self.as_slice()
    }
}

/// Which storage region currently holds the elements of a [`SmallVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Elements live in the arena embedded in the vector itself.
    Inline,
    /// Elements live in a separately allocated buffer. Never reverts to `Inline`.
    Heap,
}

/// Fixed arena of `N` slots with a constructed count.
///
/// Slots `[0, len)` are initialized, the rest are not. Elements are constructed
/// front-to-back and destroyed back-to-front, so the count alone tracks liveness.
struct InlineSlots<T, const N: usize> {
    slots: [MaybeUninit<T>; N],
    len: usize,
}

impl<T, const N: usize> InlineSlots<T, N> {
    const fn new() -> Self {
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            len: 0,
        }
    }

    #[inline(always)]
    fn is_full(&self) -> bool {
        self.len == N
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        self.slots.as_ptr() as *const T
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.slots.as_mut_ptr() as *mut T
    }

    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// # Safety
    /// The arena must not be full.
    #[inline(always)]
    unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < N);
        unsafe { ptr::write(self.as_mut_ptr().add(self.len), value) };
        self.len += 1;
    }

    fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(unsafe { ptr::read(self.as_ptr().add(self.len)) })
        }
    }

    fn truncate(&mut self, len: usize) {
        if len < self.len {
            let tail = ptr::slice_from_raw_parts_mut(
                unsafe { self.as_mut_ptr().add(len) },
                self.len - len,
            );
            // Shrink first so a panicking destructor cannot cause a double drop.
            self.len = len;
            unsafe { ptr::drop_in_place(tail) };
        }
    }

    /// Moves every live element onto the end of `dst` and leaves the arena empty.
    ///
    /// `dst` must already have room for `self.len` more elements.
    fn drain_into(&mut self, dst: &mut Vec<T>) {
        let count = self.len;
        debug_assert!(dst.capacity() - dst.len() >= count);
        let start = dst.len();
        self.len = 0;
        unsafe {
            ptr::copy_nonoverlapping(self.as_ptr(), dst.as_mut_ptr().add(start), count);
            dst.set_len(start + count);
        }
    }
}

impl<T, const N: usize> Drop for InlineSlots<T, N> {
    fn drop(&mut self) {
        self.truncate(0);
    }
}

/// The authoritative storage. The tag and the data it guards change in one assignment.
enum Storage<T, const N: usize> {
    Inline(InlineSlots<T, N>),
    Heap(Vec<T>),
}

/// A vector that lives inline for `N` items, then spills to the heap.
///
/// # Overview
/// The first `N` elements are written directly into an arena inside the `SmallVector`
/// value. Appending element `N + 1` performs a one-time *switchover*: a heap buffer of
/// at least `2 * N + 1` slots is built in a scratch `Vec`, the inline elements are moved
/// into it in order, and only then is it published as the new storage.
///
/// # Growth
/// Once heap-backed, a full buffer grows to `2 * len + 1` slots.
///
/// # Allocation failure
/// [`push`](Self::push) aborts on allocation failure like `Vec::push`;
/// [`try_push`](Self::try_push) hands the value back instead. In both cases the
/// allocation happens before any element moves, so a failed switchover leaves the vector
/// exactly as it was.
pub struct SmallVector<T, const N: usize> {
    storage: Storage<T, N>,
}

impl<T, const N: usize> SmallVector<T, N> {
    /// The maximum allowed inline footprint in bytes (16 KB).
    pub const MAX_STACK_SIZE: usize = 16 * 1024;

    /// Creates a new empty, inline `SmallVector`.
    ///
    /// # Compile-Time Safety
    /// **Size Limit:** Enforces a limit of 16 KB. Exceeding this fails the build.
    ///
    /// ## Test: Valid (Compiles)
    /// ```rust
    /// use small_vector::SmallVector;
    /// let v: SmallVector<u64, 32> = SmallVector::new();
    /// assert!(v.is_inline());
    /// ```
    ///
    /// ## Test: Invalid Size (Fails Compilation)
    /// ```rust,compile_fail
    /// use small_vector::SmallVector;
    /// let v: SmallVector<u64, 4096> = SmallVector::new();
    /// ```
    pub const fn new() -> Self {
        const {
            assert!(
                mem::size_of::<Self>() <= Self::MAX_STACK_SIZE,
                "SmallVector is too large! Reduce N."
            );
        }
        Self {
            storage: Storage::Inline(InlineSlots::new()),
        }
    }

    /// Creates a vector able to hold `capacity` elements without reallocating.
    ///
    /// Starts heap-backed when `capacity > N`.
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity <= N {
            Self::new()
        } else {
            Self {
                storage: Storage::Heap(Vec::with_capacity(capacity)),
            }
        }
    }

    #[inline(always)]
    pub fn mode(&self) -> Mode {
        match self.storage {
            Storage::Inline(_) => Mode::Inline,
            Storage::Heap(_) => Mode::Heap,
        }
    }

    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline(_))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Inline(slots) => slots.len,
            Storage::Heap(vec) => vec.len(),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements the current storage holds without growing.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Inline(_) => N,
            Storage::Heap(vec) => vec.capacity(),
        }
    }

    #[inline(always)]
    pub const fn inline_capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        match &self.storage {
            Storage::Inline(slots) => slots.as_ptr(),
            Storage::Heap(vec) => vec.as_ptr(),
        }
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.storage {
            Storage::Inline(slots) => slots.as_mut_ptr(),
            Storage::Heap(vec) => vec.as_mut_ptr(),
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Inline(slots) => slots.as_slice(),
            Storage::Heap(vec) => vec.as_slice(),
        }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.storage {
            Storage::Inline(slots) => slots.as_mut_slice(),
            Storage::Heap(vec) => vec.as_mut_slice(),
        }
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Returns the element at `index` without a bounds check.
    ///
    /// # Safety
    /// `index` must be less than `self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len());
        unsafe { &*self.as_ptr().add(index) }
    }

    /// # Safety
    /// `index` must be less than `self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len());
        unsafe { &mut *self.as_mut_ptr().add(index) }
    }

    /// Overwrites the element at `index` without a bounds check, dropping the old one.
    ///
    /// # Safety
    /// `index` must be less than `self.len()`.
    #[inline(always)]
    pub unsafe fn set_unchecked(&mut self, index: usize, value: T) {
        unsafe { *self.get_unchecked_mut(index) = value };
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn set(&mut self, index: usize, value: T) -> T {
        mem::replace(&mut self[index], value)
    }

    #[inline(always)]
    pub fn push(&mut self, value: T) {
        let has_room = match &self.storage {
            Storage::Inline(slots) => !slots.is_full(),
            Storage::Heap(vec) => vec.len() < vec.capacity(),
        };
        if has_room {
            unsafe { self.push_within_capacity(value) };
        } else {
            self.grow_and_push(value);
        }
    }

    #[inline(never)]
    fn grow_and_push(&mut self, value: T) {
        self.reserve(1);
        unsafe { self.push_within_capacity(value) };
    }

    /// Appends `value`, returning it inside the error if the storage cannot grow.
    ///
    /// On failure the vector is left unchanged.
    pub fn try_push(&mut self, value: T) -> Result<(), TryPushError<T>> {
        match self.try_reserve(1) {
            Ok(()) => {
                unsafe { self.push_within_capacity(value) };
                Ok(())
            }
            Err(source) => Err(TryPushError::new(value, source)),
        }
    }

    /// # Safety
    /// There must be spare capacity in the current storage.
    #[inline(always)]
    unsafe fn push_within_capacity(&mut self, value: T) {
        match &mut self.storage {
            Storage::Inline(slots) => unsafe { slots.push_unchecked(value) },
            Storage::Heap(vec) => {
                debug_assert!(vec.len() < vec.capacity());
                vec.push(value);
            }
        }
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// Switches to the heap if the inline arena cannot fit them.
    pub fn reserve(&mut self, additional: usize) {
        match &mut self.storage {
            Storage::Inline(slots) => {
                if N - slots.len < additional {
                    let scratch = Vec::with_capacity(switchover_capacity(N, slots.len, additional));
                    self.switchover(scratch);
                }
            }
            Storage::Heap(vec) => {
                if vec.capacity() - vec.len() < additional {
                    let from = vec.capacity();
                    vec.reserve_exact(grown_capacity(vec.len(), additional) - vec.len());
                    log_grow(from, vec.capacity());
                }
            }
        }
    }

    /// Fallible [`reserve`](Self::reserve). On error nothing has changed.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        match &mut self.storage {
            Storage::Inline(slots) => {
                if N - slots.len < additional {
                    let mut scratch = Vec::new();
                    scratch.try_reserve_exact(switchover_capacity(N, slots.len, additional))?;
                    self.switchover(scratch);
                }
            }
            Storage::Heap(vec) => {
                if vec.capacity() - vec.len() < additional {
                    let from = vec.capacity();
                    vec.try_reserve_exact(grown_capacity(vec.len(), additional) - vec.len())?;
                    log_grow(from, vec.capacity());
                }
            }
        }
        Ok(())
    }

    /// Moves the inline elements into `scratch` and installs it as the storage.
    ///
    /// `scratch` is fully populated before it is published; the drained arena is
    /// dropped last. A no-op when already heap-backed.
    #[inline(never)]
    fn switchover(&mut self, mut scratch: Vec<T>) {
        if let Storage::Inline(slots) = &mut self.storage {
            let moved = slots.len;
            slots.drain_into(&mut scratch);
            let capacity = scratch.capacity();
            let old = mem::replace(&mut self.storage, Storage::Heap(scratch));
            drop(old);
            log_switchover(moved, capacity);
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        match &mut self.storage {
            Storage::Inline(slots) => slots.pop(),
            Storage::Heap(vec) => vec.pop(),
        }
    }

    /// Drops every element past `len`. Does not change the storage mode.
    pub fn truncate(&mut self, len: usize) {
        match &mut self.storage {
            Storage::Inline(slots) => slots.truncate(len),
            Storage::Heap(vec) => vec.truncate(len),
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Read-only cursor at the first element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T> {
        unsafe { Cursor::new(self.as_ptr(), 0) }
    }

    /// Read-only cursor one past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T> {
        unsafe { Cursor::new(self.as_ptr(), self.len() as isize) }
    }

    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        unsafe { CursorMut::new(self.as_mut_ptr(), 0) }
    }

    #[inline]
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let len = self.len() as isize;
        unsafe { CursorMut::new(self.as_mut_ptr(), len) }
    }

    /// Both mutable bounds at once, since `begin_mut` and `end_mut` each borrow `self`.
    #[inline]
    pub fn bounds_mut(&mut self) -> (CursorMut<'_, T>, CursorMut<'_, T>) {
        let len = self.len() as isize;
        let begin = self.begin_mut();
        (begin, begin + len)
    }
}

impl<T: Clone, const N: usize> SmallVector<T, N> {
    pub fn resize(&mut self, new_len: usize, value: T) {
        let len = self.len();
        if new_len > len {
            self.reserve(new_len - len);
            for _ in len..new_len {
                self.push(value.clone());
            }
        } else {
            self.truncate(new_len);
        }
    }

    /// Appends a clone of every element in `other`.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.reserve(other.len());
        for item in other {
            self.push(item.clone());
        }
    }
}

/// Capacity of the heap buffer built at switchover: at least `2 * n + 1`.
#[inline]
fn switchover_capacity(n: usize, len: usize, additional: usize) -> usize {
    len.saturating_add(additional)
        .max(n.saturating_mul(2).saturating_add(1))
}

/// Heap growth target: at least doubling plus one, never less than requested.
#[inline]
fn grown_capacity(len: usize, additional: usize) -> usize {
    len.saturating_add(additional)
        .max(len.saturating_mul(2).saturating_add(1))
}

#[inline]
fn log_switchover(moved: usize, capacity: usize) {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "small_vector::switchover",
        moved,
        capacity,
        "inline storage torn down, now heap-backed"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = (moved, capacity);
}

#[inline]
fn log_grow(from: usize, to: usize) {
    #[cfg(feature = "tracing")]
    tracing::trace!(target: "small_vector::grow", from, to, "heap buffer reallocated");
    #[cfg(not(feature = "tracing"))]
    let _ = (from, to);
}

impl<T, const N: usize> Deref for SmallVector<T, N> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for SmallVector<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Clone, const N: usize> Clone for SmallVector<T, N> {
    fn clone(&self) -> Self {
        match &self.storage {
            Storage::Inline(slots) => {
                // The clone's count only covers finished clones if `T::clone` panics.
                let mut copy = InlineSlots::new();
                for item in slots.as_slice() {
                    unsafe { copy.push_unchecked(item.clone()) };
                }
                Self {
                    storage: Storage::Inline(copy),
                }
            }
            Storage::Heap(vec) => Self {
                storage: Storage::Heap(vec.clone()),
            },
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for SmallVector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T, const N: usize> Default for SmallVector<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq, const N: usize> PartialEq for SmallVector<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}
impl<T: Eq, const N: usize> Eq for SmallVector<T, N> {}

impl<T: Hash, const N: usize> Hash for SmallVector<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: PartialOrd, const N: usize> PartialOrd for SmallVector<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, const N: usize> Ord for SmallVector<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T, const N: usize> Extend<T> for SmallVector<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, const N: usize> Extend<&'a T> for SmallVector<T, N> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> FromIterator<T> for SmallVector<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = SmallVector::new();
        vec.extend(iter);
        vec
    }
}

impl<T, const N: usize> AsRef<[T]> for SmallVector<T, N> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> AsMut<[T]> for SmallVector<T, N> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> std::borrow::Borrow<[T]> for SmallVector<T, N> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> std::borrow::BorrowMut<[T]> for SmallVector<T, N> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> core::ops::Index<usize> for SmallVector<T, N> {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("index out of bounds")
    }
}

impl<T, const N: usize> core::ops::IndexMut<usize> for SmallVector<T, N> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index).expect("index out of bounds")
    }
}

impl<T, const N: usize> core::ops::Index<core::ops::RangeFull> for SmallVector<T, N> {
    type Output = [T];
    #[inline(always)]
    fn index(&self, _: core::ops::RangeFull) -> &Self::Output {
        self.as_slice()
    }
}

impl<T, const N: usize> core::ops::IndexMut<core::ops::RangeFull> for SmallVector<T, N> {
    #[inline(always)]
    fn index_mut(&mut self, _: core::ops::RangeFull) -> &mut Self::Output {
        self.as_mut_slice()
    }
}

/// Owning iterator returned by [`SmallVector::into_iter`].
pub struct IntoIter<T, const N: usize> {
    inner: IntoIterInner<T, N>,
}

enum IntoIterInner<T, const N: usize> {
    /// Slots `[pos, slots.len)` are still owned by the iterator.
    Inline { slots: InlineSlots<T, N>, pos: usize },
    Heap(std::vec::IntoIter<T>),
}

impl<T, const N: usize> IntoIterator for SmallVector<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        let inner = match self.storage {
            Storage::Inline(slots) => IntoIterInner::Inline { slots, pos: 0 },
            Storage::Heap(vec) => IntoIterInner::Heap(vec.into_iter()),
        };
        IntoIter { inner }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a SmallVector<T, N> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut SmallVector<T, N> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IntoIterInner::Inline { slots, pos } => {
                if *pos < slots.len {
                    let value = unsafe { ptr::read(slots.as_ptr().add(*pos)) };
                    *pos += 1;
                    Some(value)
                } else {
                    None
                }
            }
            IntoIterInner::Heap(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IntoIterInner::Inline { slots, pos } => {
                let remaining = slots.len - pos;
                (remaining, Some(remaining))
            }
            IntoIterInner::Heap(iter) => iter.size_hint(),
        }
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IntoIterInner::Inline { slots, pos } => {
                if *pos < slots.len {
                    slots.pop()
                } else {
                    None
                }
            }
            IntoIterInner::Heap(iter) => iter.next_back(),
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        if let IntoIterInner::Inline { slots, pos } = &mut self.inner {
            let start = *pos;
            let remaining = slots.len - start;
            let tail = ptr::slice_from_raw_parts_mut(
                unsafe { slots.as_mut_ptr().add(start) },
                remaining,
            );
            // Yielded slots are already moved out; hide them all from the arena's drop.
            slots.len = 0;
            unsafe { ptr::drop_in_place(tail) };
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining: &[T] = match &self.inner {
            IntoIterInner::Inline { slots, pos } => &slots.as_slice()[*pos..],
            IntoIterInner::Heap(iter) => iter.as_slice(),
        };
        f.debug_tuple("IntoIter").field(&remaining).finish()
    }
}

impl<T, const N: usize> SmallVector<T, N> {
    pub fn extend_from_any<V: AnyVec<T> + ?Sized>(&mut self, other: &V)
    where
        T: Clone,
    {
        self.extend_from_slice(other.as_slice());
    }

    pub fn eq_any<V: AnyVec<T> + ?Sized>(&self, other: &V) -> bool
    where
        T: PartialEq,
    {
        self.as_slice() == other.as_slice()
    }

    pub fn cmp_any<V: AnyVec<T> + ?Sized>(&self, other: &V) -> Ordering
    where
        T: Ord,
    {
        self.as_slice().cmp(other.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts how many times it has been dropped.
    struct Dropper(Rc<Cell<usize>>);

    impl Drop for Dropper {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    impl Clone for Dropper {
        fn clone(&self) -> Self {
            Dropper(self.0.clone())
        }
    }

    #[test]
    fn test_vec_inline_push_size_and_get() {
        let mut vec: SmallVector<i32, 4> = SmallVector::new();
        assert!(vec.is_empty());
        vec.push(7);
        vec.push(8);
        vec.push(9);
        assert_eq!(vec.mode(), Mode::Inline);
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.get(0), Some(&7));
        assert_eq!(vec.get(1), Some(&8));
        assert_eq!(vec.get(2), Some(&9));
        assert_eq!(vec.get(3), None);
        assert_eq!(vec.capacity(), 4);
    }

    #[test]
    fn test_vec_spill_zero_through_nine() {
        let mut vec: SmallVector<i32, 4> = SmallVector::new();
        for i in 0..10 {
            vec.push(i);
            assert_eq!(vec.len(), i as usize + 1);
            let expected = if i < 4 { Mode::Inline } else { Mode::Heap };
            assert_eq!(vec.mode(), expected);
        }
        assert_eq!(vec.mode(), Mode::Heap);
        let collected: Vec<i32> = vec.iter().copied().collect();
        assert_eq!(collected, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_vec_spill_reserves_double_plus_one() {
        let mut vec: SmallVector<u8, 4> = SmallVector::from_iter(0..4);
        assert!(vec.is_inline());
        vec.push(4);
        assert!(!vec.is_inline());
        assert!(vec.capacity() >= 2 * 4 + 1);
    }

    #[test]
    fn test_vec_heap_growth_at_least_doubles() {
        let mut vec: SmallVector<u32, 1> = SmallVector::new();
        let mut last_capacity = vec.capacity();
        for i in 0..200 {
            vec.push(i);
            let capacity = vec.capacity();
            if capacity != last_capacity && i > 1 {
                assert!(capacity >= 2 * last_capacity, "{last_capacity} -> {capacity}");
            }
            last_capacity = capacity;
        }
        assert_eq!(vec.len(), 200);
        assert!(vec.iter().copied().eq(0..200));
    }

    #[test]
    fn test_vec_mode_never_reverts() {
        let mut vec: SmallVector<i32, 2> = SmallVector::from_iter([1, 2, 3]);
        assert_eq!(vec.mode(), Mode::Heap);
        assert_eq!(vec.pop(), Some(3));
        assert_eq!(vec.pop(), Some(2));
        assert_eq!(vec.len(), 1);
        assert_eq!(vec.mode(), Mode::Heap);
        vec.clear();
        assert!(vec.is_empty());
        assert_eq!(vec.mode(), Mode::Heap);
        vec.push(5);
        assert_eq!(vec.mode(), Mode::Heap);
        assert_eq!(vec.as_slice(), &[5]);
    }

    #[test]
    fn test_vec_set_and_get_both_modes() {
        let mut vec: SmallVector<i32, 3> = SmallVector::from_iter([1, 2, 3]);
        assert_eq!(vec.set(1, 20), 2);
        assert_eq!(vec[1], 20);
        vec[2] = 30;
        assert!(vec.is_inline());

        vec.push(4);
        assert!(!vec.is_inline());
        assert_eq!(vec.as_slice(), &[1, 20, 30, 4]);
        assert_eq!(vec.set(3, 40), 4);
        unsafe {
            vec.set_unchecked(0, 10);
            assert_eq!(*vec.get_unchecked(0), 10);
            *vec.get_unchecked_mut(3) += 1;
        }
        assert_eq!(vec.as_slice(), &[10, 20, 30, 41]);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_vec_set_out_of_bounds_panics() {
        let mut vec: SmallVector<i32, 3> = SmallVector::from_iter([1]);
        vec.set(1, 2);
    }

    #[test]
    fn test_vec_try_push_inline_and_heap() {
        let mut vec: SmallVector<String, 1> = SmallVector::new();
        assert!(vec.try_push("a".to_string()).is_ok());
        assert!(vec.is_inline());
        assert!(vec.try_push("b".to_string()).is_ok());
        assert!(!vec.is_inline());
        assert_eq!(vec.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_vec_try_reserve_overflow_leaves_inline_untouched() {
        let mut vec: SmallVector<u64, 4> = SmallVector::from_iter([1, 2]);
        assert!(vec.try_reserve(usize::MAX).is_err());
        assert!(vec.is_inline());
        assert_eq!(vec.as_slice(), &[1, 2]);

        let mut heap: SmallVector<u64, 1> = SmallVector::from_iter([1, 2]);
        assert!(heap.try_reserve(usize::MAX).is_err());
        assert_eq!(heap.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_vec_reserve_switches_over_when_needed() {
        let mut vec: SmallVector<i32, 4> = SmallVector::from_iter([1, 2]);
        vec.reserve(2);
        assert!(vec.is_inline());
        vec.reserve(3);
        assert!(!vec.is_inline());
        assert!(vec.capacity() >= 5);
        assert_eq!(vec.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_vec_with_capacity() {
        let v: SmallVector<i32, 4> = SmallVector::with_capacity(2);
        assert!(v.is_inline());
        let v2: SmallVector<i32, 4> = SmallVector::with_capacity(10);
        assert_eq!(v2.mode(), Mode::Heap);
        assert!(v2.capacity() >= 10);
        assert!(v2.is_empty());
    }

    #[test]
    fn test_vec_zero_inline_capacity() {
        let mut v: SmallVector<i32, 0> = SmallVector::new();
        assert!(v.is_inline());
        assert_eq!(v.inline_capacity(), 0);
        v.push(1);
        assert!(!v.is_inline());
        assert_eq!(v.as_slice(), &[1]);
    }

    #[test]
    fn test_vec_zero_sized_elements() {
        let mut v: SmallVector<(), 2> = SmallVector::new();
        for _ in 0..10 {
            v.push(());
        }
        assert_eq!(v.len(), 10);
        assert!(!v.is_inline());
        assert_eq!(v.end() - v.begin(), 10);
    }

    #[test]
    fn test_vec_drop_inline_drops_each_live_element() {
        let counter = Rc::new(Cell::new(0));
        {
            let mut vec: SmallVector<Dropper, 4> = SmallVector::new();
            for _ in 0..3 {
                vec.push(Dropper(counter.clone()));
            }
            assert!(vec.is_inline());
        }
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn test_vec_switchover_drops_nothing_and_heap_drops_once() {
        let counter = Rc::new(Cell::new(0));
        {
            let mut vec: SmallVector<Dropper, 2> = SmallVector::new();
            vec.push(Dropper(counter.clone()));
            vec.push(Dropper(counter.clone()));
            vec.push(Dropper(counter.clone()));
            assert!(!vec.is_inline());
            assert_eq!(counter.get(), 0);
        }
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn test_vec_truncate_and_pop_drop_counts() {
        let counter = Rc::new(Cell::new(0));
        let mut vec: SmallVector<Dropper, 4> = SmallVector::new();
        for _ in 0..4 {
            vec.push(Dropper(counter.clone()));
        }
        vec.truncate(1);
        assert_eq!(counter.get(), 3);
        drop(vec.pop());
        assert_eq!(counter.get(), 4);
        assert!(vec.is_empty());
        drop(vec);
        assert_eq!(counter.get(), 4);
    }

    #[test]
    fn test_vec_into_iter_partial_consumption_drops_rest() {
        let counter = Rc::new(Cell::new(0));
        let mut vec: SmallVector<Dropper, 4> = SmallVector::new();
        for _ in 0..4 {
            vec.push(Dropper(counter.clone()));
        }
        let mut iter = vec.into_iter();
        assert_eq!(iter.len(), 4);
        drop(iter.next());
        drop(iter.next_back());
        assert_eq!(counter.get(), 2);
        assert_eq!(iter.len(), 2);
        drop(iter);
        assert_eq!(counter.get(), 4);
    }

    #[test]
    fn test_vec_into_iter_both_modes() {
        let inline: SmallVector<i32, 4> = SmallVector::from_iter([1, 2, 3]);
        let collected: Vec<i32> = inline.into_iter().map(|x| x * 2).collect();
        assert_eq!(collected, vec![2, 4, 6]);

        let heap: SmallVector<i32, 2> = SmallVector::from_iter([1, 2, 3]);
        let reversed: Vec<i32> = heap.into_iter().rev().collect();
        assert_eq!(reversed, vec![3, 2, 1]);
    }

    #[test]
    fn test_vec_ref_into_iter() {
        let mut vec: SmallVector<i32, 4> = SmallVector::from_iter([1, 2, 3]);
        for x in &mut vec {
            *x += 1;
        }
        let mut sum = 0;
        for x in &vec {
            sum += x;
        }
        assert_eq!(sum, 9);
    }

    #[test]
    fn test_vec_clone_preserves_mode_and_contents() {
        let inline: SmallVector<String, 4> =
            SmallVector::from_iter(["a", "b"].map(String::from));
        let copy = inline.clone();
        assert!(copy.is_inline());
        assert_eq!(copy, inline);

        let heap: SmallVector<String, 1> = SmallVector::from_iter(["a", "b"].map(String::from));
        let copy = heap.clone();
        assert!(!copy.is_inline());
        assert_eq!(copy, heap);
    }

    #[test]
    fn test_vec_resize_and_extend_from_slice() {
        let mut v: SmallVector<i32, 4> = SmallVector::new();
        v.resize(2, 0);
        assert!(v.is_inline());
        v.extend_from_slice(&[1, 2]);
        assert!(v.is_inline());
        assert_eq!(v.as_slice(), &[0, 0, 1, 2]);
        v.extend_from_slice(&[3]);
        assert!(!v.is_inline());
        v.resize(1, 9);
        assert_eq!(v.as_slice(), &[0]);
        v.resize(3, 9);
        assert_eq!(v.as_slice(), &[0, 9, 9]);
    }

    #[test]
    fn test_vec_extend_by_reference() {
        let mut v: SmallVector<u8, 2> = SmallVector::new();
        v.extend(&[1u8, 2, 3]);
        assert_eq!(v.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_vec_traits_borrow_and_deref() {
        use std::borrow::{Borrow, BorrowMut};
        let mut v: SmallVector<i32, 4> = SmallVector::from_iter([3, 1, 2]);
        let b: &[i32] = v.borrow();
        assert_eq!(b, &[3, 1, 2]);
        let b_mut: &mut [i32] = v.borrow_mut();
        b_mut[0] = 10;
        v.sort();
        assert_eq!(&v[..], &[1, 2, 10]);
        assert_eq!(format!("{v:?}"), "[1, 2, 10]");
    }

    #[test]
    fn test_vec_traits_ordering_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        let a: SmallVector<i32, 2> = SmallVector::from_iter([1, 2]);
        let b: SmallVector<i32, 2> = SmallVector::from_iter([1, 2, 3]);
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);

        let hash = |v: &SmallVector<i32, 2>| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        let mut c = b.clone();
        c.pop();
        assert_eq!(hash(&a), hash(&c));
    }

    #[test]
    fn test_vec_traits_interop_comparison() {
        let sv: SmallVector<i32, 4> = SmallVector::from_iter([1, 2, 3]);
        let std_vec = vec![1, 2, 3];
        assert!(sv.eq_any(&std_vec));
        assert_eq!(sv.cmp_any(&std_vec), Ordering::Equal);
        let arr = [1, 2, 4];
        assert!(!sv.eq_any(&arr));
        assert_eq!(sv.cmp_any(&arr), Ordering::Less);

        let mut other: SmallVector<i32, 4> = SmallVector::new();
        other.extend_from_any(&std_vec[..]);
        assert_eq!(other, sv);
        assert!(AnyVec::contains(&other, &2));
    }

    #[cfg(feature = "tracing")]
    mod switchover_events {
        use super::*;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
        use tracing::{Event, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct CountSwitchovers(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for CountSwitchovers {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if event.metadata().target() == "small_vector::switchover" {
                    self.0.fetch_add(1, AtomicOrdering::SeqCst);
                }
            }
        }

        fn count_switchovers(f: impl FnOnce()) -> usize {
            let hits = Arc::new(AtomicUsize::new(0));
            let subscriber = tracing_subscriber::registry().with(CountSwitchovers(hits.clone()));
            tracing::subscriber::with_default(subscriber, f);
            hits.load(AtomicOrdering::SeqCst)
        }

        #[test]
        fn test_vec_no_switchover_up_to_capacity() {
            let hits = count_switchovers(|| {
                let mut vec: SmallVector<i32, 4> = SmallVector::new();
                for i in 0..4 {
                    vec.push(i);
                }
                assert!(vec.is_inline());
            });
            assert_eq!(hits, 0);
        }

        #[test]
        fn test_vec_exactly_one_switchover() {
            let hits = count_switchovers(|| {
                let mut vec: SmallVector<i32, 4> = SmallVector::new();
                for i in 0..5 {
                    vec.push(i);
                }
                vec.truncate(0);
                for i in 0..100 {
                    vec.push(i);
                }
                assert_eq!(vec.len(), 100);
            });
            assert_eq!(hits, 1);
        }
    }
}
