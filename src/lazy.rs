//! Unsynchronized lazy cell.
//!
//! [`Lazy<T>`] checks for a published value and, if there is none, builds and
//! publishes one. The check and the publish are two separate atomic operations
//! with nothing tying them together, so threads that arrive together during
//! first access can each see "empty", each construct a value and each walk
//! away with a different one. That is the classic broken lazy singleton. The
//! pointer itself is atomic so the race stays a logic race and never becomes
//! undefined behaviour: every value a caller was handed stays alive for as
//! long as the cell does.

use core::fmt;
use core::marker::PhantomData;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// A lazily initialized cell that is only correct under single-threaded first access.
pub struct Lazy<T> {
   published: AtomicPtr<T>,
   _owns: PhantomData<*mut T>,
}

impl<T> Lazy<T> {
   /// Creates an empty cell. Usable in a `static`.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         published: AtomicPtr::new(ptr::null_mut()),
         _owns: PhantomData,
      }
   }

   /// Returns the most recently published value, if any.
   #[inline]
   pub fn get(&self) -> Option<&T> {
      let current = self.published.load(Ordering::Acquire);
      // SAFETY: published pointers come from `Box::into_raw` and are never
      // freed before the cell is dropped.
      unsafe { current.as_ref() }
   }

   /// Returns the published value, or builds one with `f` if none is visible.
   ///
   /// Not atomic: concurrent first callers may each run `f` and receive
   /// different values. Values that lose the race are leaked.
   pub fn get_or_init<F>(&self, f: F) -> &T
   where
      F: FnOnce() -> T,
   {
      if let Some(value) = self.get() {
         return value;
      }
      let fresh = Box::into_raw(Box::new(f()));
      self.published.store(fresh, Ordering::Release);
      // SAFETY: `fresh` is a live allocation that this cell never frees while
      // borrowed, whether or not another thread overwrote it.
      unsafe { &*fresh }
   }
}

// SAFETY: `&T` crosses threads through `get`, and the value can be dropped by
// whichever thread drops the cell.
unsafe impl<T: Sync + Send> Sync for Lazy<T> {}
// SAFETY: the cell owns its published `T`.
unsafe impl<T: Send> Send for Lazy<T> {}

impl<T> Default for Lazy<T> {
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

impl<T: fmt::Debug> fmt::Debug for Lazy<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("Lazy");
      match self.get() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}

impl<T> Drop for Lazy<T> {
   fn drop(&mut self) {
      let last = *self.published.get_mut();
      if !last.is_null() {
         // SAFETY: came from `Box::into_raw`, and `&mut self` means no borrows remain.
         drop(unsafe { Box::from_raw(last) });
      }
   }
}
