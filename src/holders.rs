//! The four process-wide singleton holders.
//!
//! Each holder is a unit type with one static cell behind it. They share the
//! [`Singleton`] contract and differ only in how that cell gets filled.

use crate::double_checked::DoubleChecked;
use crate::eager::Eager;
use crate::instance::Instance;
use crate::lazy::Lazy;
use crate::synchronized::Synchronized;
use crate::variant::Variant;

/// One operation: hand out the process-wide instance.
pub trait Singleton: 'static {
   const VARIANT: Variant;

   fn get_instance() -> &'static Instance;
}

static EAGER: Eager<Instance> = Eager::new(Instance::new(Variant::Eager));
static LAZY: Lazy<Instance> = Lazy::new();
static SYNCHRONIZED: Synchronized<Instance> = Synchronized::new();
static DOUBLE_CHECKED: DoubleChecked<Instance> = DoubleChecked::new();

fn construct(variant: Variant) -> Instance {
   log::debug!("constructing {variant} instance");
   Instance::new(variant)
}

/// Instance built at compile time.
#[derive(Debug, Clone, Copy)]
pub struct EagerHolder;

impl Singleton for EagerHolder {
   const VARIANT: Variant = Variant::Eager;

   #[inline]
   fn get_instance() -> &'static Instance {
      EAGER.get()
   }
}

/// Instance built on first access without synchronization.
///
/// Only safe to race on after the first call has returned; concurrent first
/// callers may end up with different instances.
#[derive(Debug, Clone, Copy)]
pub struct LazyHolder;

impl Singleton for LazyHolder {
   const VARIANT: Variant = Variant::Lazy;

   #[inline]
   fn get_instance() -> &'static Instance {
      LAZY.get_or_init(|| construct(Variant::Lazy))
   }
}

/// Instance built on first access; every call locks.
#[derive(Debug, Clone, Copy)]
pub struct SynchronizedHolder;

impl Singleton for SynchronizedHolder {
   const VARIANT: Variant = Variant::Synchronized;

   #[inline]
   fn get_instance() -> &'static Instance {
      SYNCHRONIZED.get_or_init(|| construct(Variant::Synchronized))
   }
}

/// Instance built on first access; only the creation path locks.
#[derive(Debug, Clone, Copy)]
pub struct DoubleCheckedHolder;

impl DoubleCheckedHolder {
   /// Same instance as [`get_instance`](Singleton::get_instance), for async callers.
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   pub async fn get_instance_async() -> &'static Instance {
      DOUBLE_CHECKED
         .get_or_init_async(|| async { construct(Variant::DoubleChecked) })
         .await
   }
}

impl Singleton for DoubleCheckedHolder {
   const VARIANT: Variant = Variant::DoubleChecked;

   #[inline]
   fn get_instance() -> &'static Instance {
      DOUBLE_CHECKED.get_or_init(|| construct(Variant::DoubleChecked))
   }
}

/// Dispatches to the holder named by `variant`.
pub fn get_instance(variant: Variant) -> &'static Instance {
   match variant {
      Variant::Eager => EagerHolder::get_instance(),
      Variant::Lazy => LazyHolder::get_instance(),
      Variant::Synchronized => SynchronizedHolder::get_instance(),
      Variant::DoubleChecked => DoubleCheckedHolder::get_instance(),
   }
}
