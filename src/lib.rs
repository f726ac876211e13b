//! # Small Vector
//!
//! A contiguous, growable vector that stores its first `N` elements inside the value
//! itself and transparently spills to a heap buffer once it grows past `N`.
//!
//! ## Key Features
//!
//! * **Inline Storage:** Up to `N` elements live in an embedded arena; no allocation happens
//!   until element `N + 1` is appended.
//! * **One-Way Switchover:** The move to the heap happens at most once per vector. The new
//!   buffer is fully built before it replaces the inline storage, so no operation ever
//!   observes half-migrated state.
//! * **Raw Cursors:** [`Cursor`] and [`CursorMut`] are copyable random-access positions
//!   with pointer-style arithmetic, independent of the storage mode.
//! * **Slice Interop:** `SmallVector` derefs to `[T]`, so every slice method is available.
//! * **Compile-Time Safety:** `new()` refuses to build a vector whose inline footprint
//!   exceeds 16 KB.
//!
//! ## Capacity (`N`)
//!
//! `N` is a const generic fixed for the type. Any value is accepted, including `0` (the
//! first push switches over immediately). Once heap-backed, the buffer grows to
//! `2 * len + 1` whenever it fills up.
//!
//! ## Observability
//!
//! With the default `tracing` feature, the switchover emits a `DEBUG` event on the
//! `small_vector::switchover` target and heap growth emits a `TRACE` event on
//! `small_vector::grow`. The crate never installs a subscriber.
//!
//! ## Examples
//!
//! ```rust
//! use small_vector::{Mode, SmallVector};
//!
//! // Capacity 4. Lives inline.
//! let mut v: SmallVector<i32, 4> = SmallVector::new();
//! for i in 0..4 {
//!     v.push(i);
//! }
//! assert_eq!(v.mode(), Mode::Inline);
//!
//! // 5th item -> switches to the heap
//! v.push(4);
//! assert_eq!(v.mode(), Mode::Heap);
//! assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4]);
//!
//! // Shrinking does not move it back.
//! v.truncate(1);
//! assert_eq!(v.mode(), Mode::Heap);
//! ```
//!
//! ### Cursors
//!
//! ```rust
//! use small_vector::SmallVector;
//!
//! let v: SmallVector<i32, 4> = SmallVector::from_iter([1, 2, 3]);
//! let mut it = v.begin();
//! let mut sum = 0;
//! while it != v.end() {
//!     // SAFETY: `it` stays within `[begin, end)`.
//!     sum += unsafe { *it.get() };
//!     it.inc();
//! }
//! assert_eq!(sum, 6);
//! assert_eq!(v.end() - v.begin(), 3);
//! ```

// --- Module Declarations ---

pub mod cursor;
pub mod error;
pub mod vector;

// --- Re-exports ---

pub use cursor::{Cursor, CursorMut};
pub use error::TryPushError;
pub use vector::{AnyVec, IntoIter, Mode, SmallVector};
