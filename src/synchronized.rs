//! Lazy cell serialized by a single mutex.

use core::cell::UnsafeCell;
use core::fmt;

use parking_lot::Mutex;

/// A lazily initialized cell whose every access takes the same lock.
///
/// Correct under any amount of concurrency, at the price of a lock
/// acquisition on every call, including the ones long after the value exists.
/// The lock is not reentrant: an initializer that calls back into the same
/// cell deadlocks.
pub struct Synchronized<T> {
   lock: Mutex<()>,
   slot: UnsafeCell<Option<T>>,
}

impl<T> Synchronized<T> {
   /// Creates an empty cell. Usable in a `static`.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         lock: parking_lot::const_mutex(()),
         slot: UnsafeCell::new(None),
      }
   }

   /// Returns the value if it exists. Takes the lock.
   pub fn get(&self) -> Option<&T> {
      let _guard = self.lock.lock();
      // SAFETY: the slot is only read or written under `lock`, and once it is
      // `Some` it is never written again.
      unsafe { (*self.slot.get()).as_ref() }
   }

   /// Returns the value, creating it with `f` under the lock if it is missing.
   ///
   /// If `f` panics the lock is released and the cell stays empty.
   pub fn get_or_init<F>(&self, f: F) -> &T
   where
      F: FnOnce() -> T,
   {
      let _guard = self.lock.lock();
      // SAFETY: see `get`.
      if let Some(value) = unsafe { (*self.slot.get()).as_ref() } {
         return value;
      }
      let value = f();
      // SAFETY: we hold the lock and the slot is `None`, so no reference into
      // it has ever been handed out.
      unsafe {
         *self.slot.get() = Some(value);
         (*self.slot.get()).as_ref().unwrap_unchecked()
      }
   }
}

// SAFETY: `&T` crosses threads and the value can be dropped on any thread.
unsafe impl<T: Sync + Send> Sync for Synchronized<T> {}
// SAFETY: the cell owns its `T`.
unsafe impl<T: Send> Send for Synchronized<T> {}

impl<T> Default for Synchronized<T> {
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

impl<T: fmt::Debug> fmt::Debug for Synchronized<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("Synchronized");
      match self.get() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}
