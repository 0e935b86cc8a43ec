//! Lazy cell guarded by double-checked locking.
//!
//! [`DoubleChecked<T>`] reads an atomic state word without locking on every
//! call. Only when the word says UNINITIALIZED does a caller take the init
//! lock, and it checks the word again once it holds the lock because another
//! thread may have published the value in the meantime. The value is written
//! before DONE is stored with Release ordering, and every fast-path read loads
//! the word with Acquire ordering, so a reader that sees DONE also sees the
//! fully constructed value.

use core::cell::UnsafeCell;
#[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
use core::future::Future;
use core::{fmt, mem};

use crate::state::InitState;

/// A thread-safe cell initialized at most once, locking only on the creation path.
pub struct DoubleChecked<T> {
   value: UnsafeCell<mem::MaybeUninit<T>>,
   state: InitState,
}

impl<T> DoubleChecked<T> {
   /// Creates an uninitialized cell. Usable in a `static`.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         state: InitState::new(),
         value: UnsafeCell::new(mem::MaybeUninit::uninit()),
      }
   }

   /// Creates a cell that is already initialized with `value`.
   #[inline]
   #[must_use]
   pub const fn with_value(value: T) -> Self {
      Self {
         state: InitState::done(),
         value: UnsafeCell::new(mem::MaybeUninit::new(value)),
      }
   }

   /// Returns `true` once the value has been published. Never blocks.
   #[inline]
   pub fn is_done(&self) -> bool {
      self.state.is_done()
   }

   /// Returns the value if it has been published. Never blocks.
   #[inline]
   pub fn get(&self) -> Option<&T> {
      if self.is_done() {
         // SAFETY: DONE was observed with Acquire ordering.
         Some(unsafe { self.get_unchecked() })
      } else {
         None
      }
   }

   /// # Safety
   ///
   /// The cell must be initialized.
   #[inline]
   unsafe fn get_unchecked(&self) -> &T {
      debug_assert!(self.is_done(), "get_unchecked on uninitialized DoubleChecked");
      (*self.value.get()).assume_init_ref()
   }

   /// Returns the value, running `f` to create it if nobody has yet.
   ///
   /// Concurrent callers block until the single running `f` has published.
   /// If `f` panics the cell stays uninitialized and a later caller retries.
   /// `f` must not call back into the same cell: it would park forever on
   /// its own init lock.
   #[inline]
   pub fn get_or_init<F>(&self, f: F) -> &T
   where
      F: FnOnce() -> T,
   {
      if let Some(value) = self.get() {
         return value;
      }
      self.initialize(f);
      // SAFETY: `initialize` only returns once the cell is DONE.
      unsafe { self.get_unchecked() }
   }

   /// Like [`get_or_init`](Self::get_or_init) with a fallible initializer.
   ///
   /// On `Err` the error is returned and the cell stays uninitialized.
   pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      if let Some(value) = self.get() {
         return Ok(value);
      }
      self.try_initialize(f)?;
      debug_assert!(self.is_done());
      // SAFETY: `try_initialize` returned Ok, so the cell is DONE.
      Ok(unsafe { self.get_unchecked() })
   }

   /// Async flavour of [`get_or_init`](Self::get_or_init).
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[inline]
   pub async fn get_or_init_async<F, Fut>(&self, f: F) -> &T
   where
      F: FnOnce() -> Fut,
      Fut: Future<Output = T>,
   {
      if let Some(value) = self.get() {
         return value;
      }
      self.initialize_async(f).await;
      // SAFETY: `initialize_async` only returns once the cell is DONE.
      unsafe { self.get_unchecked() }
   }

   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[cold]
   async fn initialize_async<F, Fut>(&self, f: F)
   where
      F: FnOnce() -> Fut,
      Fut: Future<Output = T>,
   {
      let Some(guard) = self.state.lock_async().await else {
         return;
      };
      log::trace!("double-checked slow path: constructing (async)");
      // SAFETY: we hold LOCKED, nobody else touches the slot.
      unsafe { (*self.value.get()).write(f().await) };
      guard.commit();
   }

   #[cold]
   fn initialize<F>(&self, f: F)
   where
      F: FnOnce() -> T,
   {
      // `lock` re-checks DONE after acquiring, so a thread that lost the race
      // returns here without constructing.
      let Some(guard) = self.state.lock() else {
         return;
      };
      log::trace!("double-checked slow path: constructing");
      // SAFETY: we hold LOCKED, nobody else touches the slot.
      unsafe { (*self.value.get()).write(f()) };
      guard.commit();
   }

   #[cold]
   fn try_initialize<F, E>(&self, f: F) -> Result<(), E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      let Some(guard) = self.state.lock() else {
         return Ok(());
      };
      let value = f()?;
      // SAFETY: we hold LOCKED, nobody else touches the slot.
      unsafe { (*self.value.get()).write(value) };
      guard.commit();
      Ok(())
   }
}

// SAFETY: shared references hand out `&T` to any thread, and the value may be
// constructed on one thread and dropped on another.
unsafe impl<T: Sync + Send> Sync for DoubleChecked<T> {}
// SAFETY: moving the cell moves the `T` inside it.
unsafe impl<T: Send> Send for DoubleChecked<T> {}

impl<T> Default for DoubleChecked<T> {
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

impl<T: fmt::Debug> fmt::Debug for DoubleChecked<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("DoubleChecked");
      match self.get() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}

impl<T> Drop for DoubleChecked<T> {
   #[inline]
   fn drop(&mut self) {
      if self.is_done() {
         // SAFETY: `&mut self` and DONE; nothing can read the value again.
         unsafe { self.value.get_mut().assume_init_drop() };
      }
   }
}
