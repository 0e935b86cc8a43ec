//! Eagerly initialized cell.

use core::fmt;

/// A value built before anyone can ask for it.
///
/// `new` is a `const fn`, so a `static Eager<T>` is evaluated at compile time
/// and is already in place when the process starts.
pub struct Eager<T> {
   value: T,
}

impl<T> Eager<T> {
   #[inline]
   #[must_use]
   pub const fn new(value: T) -> Self {
      Self { value }
   }

   #[inline]
   pub const fn get(&self) -> &T {
      &self.value
   }
}

impl<T: fmt::Debug> fmt::Debug for Eager<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_tuple("Eager").field(&self.value).finish()
   }
}
