//! The object every holder hands out.

use core::fmt;
use core::ptr;

use crate::variant::Variant;

/// An opaque singleton object. Only its identity matters.
///
/// Never zero-sized, so two live instances always have different addresses.
///
/// Only the holders can build one:
///
/// ```compile_fail
/// use singleton_holders::{Instance, Variant};
///
/// let rogue = Instance::new(Variant::Eager);
/// ```
#[derive(Debug)]
pub struct Instance {
   variant: Variant,
}

impl Instance {
   #[inline]
   pub(crate) const fn new(variant: Variant) -> Self {
      Self { variant }
   }

   /// The holder variant that built this instance.
   #[inline]
   pub const fn variant(&self) -> Variant {
      self.variant
   }

   #[inline]
   pub fn identity(&self) -> Identity {
      Identity(self as *const Self as usize)
   }

   /// Same object, not merely equal contents.
   #[inline]
   pub fn is_same(&self, other: &Instance) -> bool {
      ptr::eq(self, other)
   }
}

impl fmt::Display for Instance {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}@{}", self.variant, self.identity())
   }
}

/// The address of an [`Instance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(usize);

impl Identity {
   #[inline]
   pub const fn addr(self) -> usize {
      self.0
   }
}

impl fmt::Display for Identity {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{:#x}", self.0)
   }
}
