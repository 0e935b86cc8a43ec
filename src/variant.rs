//! The selector naming the four holders.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
   /// Built at compile time.
   Eager,
   /// Built on first access with an unguarded check-then-act.
   Lazy,
   /// Built on first access; every access takes one lock.
   Synchronized,
   /// Built on first access; the lock is only taken while uninitialized.
   #[default]
   DoubleChecked,
}

impl Variant {
   pub const ALL: [Variant; 4] = [
      Variant::Eager,
      Variant::Lazy,
      Variant::Synchronized,
      Variant::DoubleChecked,
   ];

   pub const fn name(self) -> &'static str {
      match self {
         Variant::Eager => "eager",
         Variant::Lazy => "lazy",
         Variant::Synchronized => "synchronized",
         Variant::DoubleChecked => "double-checked",
      }
   }

   /// Whether concurrent first access is guaranteed to yield one instance.
   pub const fn is_thread_safe(self) -> bool {
      !matches!(self, Variant::Lazy)
   }
}

impl fmt::Display for Variant {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.name())
   }
}

impl FromStr for Variant {
   type Err = Error;

   /// Case-insensitive; `_` and `-` are interchangeable. The long names
   /// (`eager-initialization`, `lazy-initialization`, `synchronized-specific`)
   /// are accepted as aliases.
   fn from_str(s: &str) -> Result<Self, Self::Err> {
      let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
      match normalized.as_str() {
         "eager" | "eager-initialization" => Ok(Variant::Eager),
         "lazy" | "lazy-initialization" => Ok(Variant::Lazy),
         "synchronized" => Ok(Variant::Synchronized),
         "double-checked" | "synchronized-specific" => Ok(Variant::DoubleChecked),
         _ => Err(Error::UnknownVariant(s.to_string())),
      }
   }
}
