//! Initialization state word for [`DoubleChecked`](crate::DoubleChecked).
//!
//! The whole state of a double-checked cell lives in one `AtomicU8`:
//! - Bit 0: DONE - the value is published
//! - Bit 1: LOCKED - a thread is constructing the value
//! - Bit 2: WAITING - at least one thread is parked on the state address
//! - Bits 3-7: EPOCH - bumped on every DONE/reset transition so parked threads
//!   never mistake a new state for the one they went to sleep on
//!
//! Readers only ever need an Acquire load of this word. Writers hold the
//! LOCKED bit, write the value, then publish DONE with a Release swap.

use core::mem;
use core::sync::atomic::{AtomicU8, Ordering};

use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};

#[repr(transparent)]
pub(crate) struct InitState(AtomicU8);

impl InitState {
   const DONE: u8 = 1;
   const LOCKED: u8 = 2;
   const WAITING: u8 = 4;
   const EPOCH_1: u8 = 8;
   const EPOCH_MASK: u8 = !(Self::DONE | Self::LOCKED | Self::WAITING);

   #[inline(always)]
   const fn next_epoch(current: u8) -> u8 {
      (current & Self::EPOCH_MASK).wrapping_add(Self::EPOCH_1) & Self::EPOCH_MASK
   }

   /// UNINITIALIZED, unlocked, nobody waiting.
   #[inline]
   pub(crate) const fn new() -> Self {
      Self(AtomicU8::new(0))
   }

   /// Already INITIALIZED; used for cells built with a value.
   #[inline]
   pub(crate) const fn done() -> Self {
      Self(AtomicU8::new(Self::DONE))
   }

   #[inline]
   fn key(&self) -> usize {
      self.0.as_ptr() as usize
   }

   #[inline]
   fn notify_all(&self) {
      // SAFETY: park and unpark both key on the address of the state word.
      unsafe {
         parking_lot_core::unpark_all(self.key(), DEFAULT_UNPARK_TOKEN);
      }
   }

   /// Parks the calling thread while the state still equals `expected`.
   #[inline]
   fn wait(&self, expected: u8) {
      // SAFETY: see `notify_all`. The validate closure runs under the bucket
      // lock, so a publish between our load and the park cannot be missed.
      unsafe {
         let _ = parking_lot_core::park(
            self.key(),
            || self.0.load(Ordering::Acquire) == expected,
            || {},
            |_, _| {},
            DEFAULT_PARK_TOKEN,
            None,
         );
      }
   }

   /// Publishes DONE. Returns `true` if the state was not DONE before.
   ///
   /// The Release swap orders the value write before any Acquire load that
   /// observes DONE.
   #[inline]
   pub(crate) fn set_done(&self) -> bool {
      let current = self.0.load(Ordering::Relaxed);
      let prev = self
         .0
         .swap(Self::DONE | Self::next_epoch(current), Ordering::Release);
      if prev & Self::WAITING != 0 {
         self.notify_all();
      }
      prev & Self::DONE == 0
   }

   /// Drops back to UNINITIALIZED and wakes waiters so one of them can retry.
   /// Only called by a guard whose initializer failed or panicked.
   #[inline]
   pub(crate) fn set_uninit(&self) {
      let current = self.0.load(Ordering::Relaxed);
      let prev = self.0.swap(Self::next_epoch(current), Ordering::Release);
      if prev & Self::WAITING != 0 {
         self.notify_all();
      }
   }

   /// The unsynchronized first check.
   #[inline]
   pub(crate) fn is_done(&self) -> bool {
      self.0.load(Ordering::Acquire) & Self::DONE != 0
   }

   /// One attempt at taking the init lock.
   ///
   /// - `Ok(None)`: already DONE (this is the second check).
   /// - `Ok(Some(guard))`: LOCKED is ours.
   /// - `Err(state)`: somebody else holds LOCKED; WAITING is set in `state`.
   #[inline]
   fn lock_step(&self) -> Result<Option<InitGuard<'_>>, u8> {
      loop {
         let current = self.0.load(Ordering::Acquire);
         if current & Self::DONE != 0 {
            return Ok(None);
         }

         if current & Self::LOCKED == 0 {
            match self.0.compare_exchange_weak(
               current,
               current | Self::LOCKED,
               Ordering::Acquire,
               Ordering::Relaxed,
            ) {
               Ok(_) => return Ok(Some(InitGuard::new(self))),
               Err(_) => {
                  std::hint::spin_loop();
                  continue;
               }
            }
         }

         if current & Self::WAITING == 0 {
            let flagged = current | Self::WAITING;
            match self.0.compare_exchange_weak(
               current,
               flagged,
               Ordering::Relaxed,
               Ordering::Relaxed,
            ) {
               Ok(_) => return Err(flagged),
               Err(_) => {
                  std::hint::spin_loop();
                  continue;
               }
            }
         }
         return Err(current);
      }
   }

   /// Takes the init lock, parking while another thread constructs.
   ///
   /// Returns `None` once the cell is DONE, whether it already was or became
   /// so while we were parked.
   #[inline]
   pub(crate) fn lock(&self) -> Option<InitGuard<'_>> {
      let mut observed = match self.lock_step() {
         Ok(guard) => return guard,
         Err(state) => state,
      };
      loop {
         self.wait(observed);
         match self.lock_step() {
            Ok(guard) => return guard,
            Err(state) => observed = state,
         }
      }
   }

   /// Async flavour of [`lock`](Self::lock).
   ///
   /// Yields to the scheduler for a while, then falls back to parking inside
   /// `block_in_place` on the multi-threaded runtime.
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[inline]
   pub(crate) async fn lock_async(&self) -> Option<InitGuard<'_>> {
      #[allow(clippy::never_loop)]
      loop {
         for _ in 0..16 {
            match self.lock_step() {
               Ok(guard) => return guard,
               Err(state) => {
                  for _ in 0..32 {
                     tokio::task::yield_now().await;
                     if self.0.load(Ordering::Relaxed) != state {
                        break;
                     }
                  }
               }
            }
         }

         #[cfg(feature = "async-tokio-mt")]
         {
            return match self.lock_step() {
               Ok(guard) => guard,
               Err(state) => tokio::task::block_in_place(|| {
                  self.wait(state);
                  self.lock()
               }),
            };
         }
      }
   }
}

/// Holds the LOCKED bit. Must be [`commit`](Self::commit)ted after the value
/// is written; dropping it instead resets the cell to UNINITIALIZED.
pub(crate) struct InitGuard<'a> {
   state: &'a InitState,
}

impl<'a> InitGuard<'a> {
   #[inline(always)]
   const fn new(state: &'a InitState) -> Self {
      Self { state }
   }

   /// Publishes DONE and wakes every parked thread.
   #[inline(always)]
   pub(crate) fn commit(self) -> bool {
      let published = self.state.set_done();
      mem::forget(self);
      published
   }
}

impl Drop for InitGuard<'_> {
   #[inline(always)]
   fn drop(&mut self) {
      self.state.set_uninit();
   }
}
