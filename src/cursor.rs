//! Random-access cursors over the contiguous range of a [`SmallVector`].
//!
//! A cursor is a base pointer plus a signed position, the Rust rendition of a raw
//! pointer iterator. It knows nothing about inline or heap storage: it is handed the
//! start of whichever region was authoritative when it was created.
//!
//! Moving a cursor is plain integer arithmetic and always safe. Dereferencing is
//! `unsafe`: the cursor performs no validity check, so reading a position outside
//! `[begin, end)` is undefined behavior. The lifetime `'a` borrows the vector, which
//! keeps the storage from switching over or reallocating while a cursor is alive.
//!
//! [`SmallVector`]: crate::SmallVector

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Read-only cursor. Cannot be used to mutate the element it refers to.
pub struct Cursor<'a, T> {
    base: *const T,
    pos: isize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    /// # Safety
    /// `base` must point to the start of a contiguous range of `T` that stays valid and
    /// unmodified for `'a`.
    #[inline(always)]
    pub(crate) unsafe fn new(base: *const T, pos: isize) -> Self {
        Self {
            base,
            pos,
            _marker: PhantomData,
        }
    }

    /// Returns the element at the current position.
    ///
    /// # Safety
    /// The position must lie within `[begin, end)` of the range this cursor came from.
    #[inline(always)]
    pub unsafe fn get(&self) -> &'a T {
        unsafe { &*self.base.offset(self.pos) }
    }

    /// Returns the element `n` positions away, like `it[n]`.
    ///
    /// # Safety
    /// `self + n` must lie within `[begin, end)`.
    #[inline(always)]
    pub unsafe fn at(&self, n: isize) -> &'a T {
        unsafe { &*self.base.offset(self.pos + n) }
    }

    /// Pre-increment.
    #[inline(always)]
    pub fn inc(&mut self) -> &mut Self {
        self.pos += 1;
        self
    }

    /// Pre-decrement.
    #[inline(always)]
    pub fn dec(&mut self) -> &mut Self {
        self.pos -= 1;
        self
    }

    /// Post-increment: advances and returns the previous position.
    #[inline(always)]
    pub fn post_inc(&mut self) -> Self {
        let prev = *self;
        self.pos += 1;
        prev
    }

    /// Post-decrement: steps back and returns the previous position.
    #[inline(always)]
    pub fn post_dec(&mut self) -> Self {
        let prev = *self;
        self.pos -= 1;
        prev
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.pos == other.pos
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    /// `None` for cursors over different ranges.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.base == other.base).then(|| self.pos.cmp(&other.pos))
    }
}

impl<T> Add<isize> for Cursor<'_, T> {
    type Output = Self;
    #[inline(always)]
    fn add(mut self, rhs: isize) -> Self {
        self.pos += rhs;
        self
    }
}

impl<T> Sub<isize> for Cursor<'_, T> {
    type Output = Self;
    #[inline(always)]
    fn sub(mut self, rhs: isize) -> Self {
        self.pos -= rhs;
        self
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: isize) {
        self.pos += rhs;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: isize) {
        self.pos -= rhs;
    }
}

/// Distance in elements: the number of `inc()` calls from `rhs` to `self`.
impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;
    #[inline(always)]
    fn sub(self, rhs: Self) -> isize {
        self.pos - rhs.pos
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("base", &self.base)
            .field("pos", &self.pos)
            .finish()
    }
}

/// Mutable cursor.
///
/// Copies share the same target, so handing out two `&mut T` to one position through
/// [`get_mut`](Self::get_mut) is the caller's responsibility to avoid.
pub struct CursorMut<'a, T> {
    base: *mut T,
    pos: isize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> CursorMut<'a, T> {
    /// # Safety
    /// `base` must point to the start of a contiguous range of `T` exclusively borrowed
    /// for `'a`.
    #[inline(always)]
    pub(crate) unsafe fn new(base: *mut T, pos: isize) -> Self {
        Self {
            base,
            pos,
            _marker: PhantomData,
        }
    }

    /// # Safety
    /// The position must lie within `[begin, end)`, and no `&mut` to the same element
    /// may be alive.
    #[inline(always)]
    pub unsafe fn get(&self) -> &'a T {
        unsafe { &*self.base.offset(self.pos) }
    }

    /// # Safety
    /// The position must lie within `[begin, end)`, and no other reference to the same
    /// element may be alive while the returned one is.
    #[inline(always)]
    pub unsafe fn get_mut(&self) -> &'a mut T {
        unsafe { &mut *self.base.offset(self.pos) }
    }

    /// # Safety
    /// Same as [`get_mut`](Self::get_mut) for `self + n`.
    #[inline(always)]
    pub unsafe fn at_mut(&self, n: isize) -> &'a mut T {
        unsafe { &mut *self.base.offset(self.pos + n) }
    }

    /// A read-only cursor at the same position.
    #[inline(always)]
    pub fn as_cursor(&self) -> Cursor<'a, T> {
        unsafe { Cursor::new(self.base, self.pos) }
    }

    #[inline(always)]
    pub fn inc(&mut self) -> &mut Self {
        self.pos += 1;
        self
    }

    #[inline(always)]
    pub fn dec(&mut self) -> &mut Self {
        self.pos -= 1;
        self
    }

    #[inline(always)]
    pub fn post_inc(&mut self) -> Self {
        let prev = *self;
        self.pos += 1;
        prev
    }

    #[inline(always)]
    pub fn post_dec(&mut self) -> Self {
        let prev = *self;
        self.pos -= 1;
        prev
    }
}

impl<T> Clone for CursorMut<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CursorMut<'_, T> {}

impl<T> PartialEq for CursorMut<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.pos == other.pos
    }
}

impl<T> Eq for CursorMut<'_, T> {}

impl<T> PartialOrd for CursorMut<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.base == other.base).then(|| self.pos.cmp(&other.pos))
    }
}

impl<T> Add<isize> for CursorMut<'_, T> {
    type Output = Self;
    #[inline(always)]
    fn add(mut self, rhs: isize) -> Self {
        self.pos += rhs;
        self
    }
}

impl<T> Sub<isize> for CursorMut<'_, T> {
    type Output = Self;
    #[inline(always)]
    fn sub(mut self, rhs: isize) -> Self {
        self.pos -= rhs;
        self
    }
}

impl<T> AddAssign<isize> for CursorMut<'_, T> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: isize) {
        self.pos += rhs;
    }
}

impl<T> SubAssign<isize> for CursorMut<'_, T> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: isize) {
        self.pos -= rhs;
    }
}

impl<'a, T> Sub for CursorMut<'a, T> {
    type Output = isize;
    #[inline(always)]
    fn sub(self, rhs: Self) -> isize {
        self.pos - rhs.pos
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("base", &self.base)
            .field("pos", &self.pos)
            .finish()
    }
}
