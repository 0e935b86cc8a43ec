//! Four ways to hold a process-wide singleton, side by side.
//!
//! Every holder implements [`Singleton`], whose single accessor returns a
//! `&'static` [`Instance`]. They differ in when and how that instance is
//! built:
//!
//! - [`EagerHolder`]: built at compile time, nothing left to race on.
//! - [`LazyHolder`]: built on first access by an unguarded check-then-act.
//!   Concurrent first callers can receive different instances. It is kept
//!   as the counter-example.
//! - [`SynchronizedHolder`]: built on first access, every call takes a lock.
//! - [`DoubleCheckedHolder`]: built on first access, the lock is only taken
//!   while the instance is missing and the state is re-checked once it is
//!   held. The publish uses Release ordering and the lock-free read uses Acquire.
//!
//! The generic cells behind the holders ([`Eager`], [`Lazy`],
//! [`Synchronized`], [`DoubleChecked`]) are public so the techniques can be
//! used, and tested, on values other than [`Instance`].
//!
//! # Examples
//!
//! ```rust
//! use singleton_holders::{DoubleCheckedHolder, Singleton};
//!
//! let first = DoubleCheckedHolder::get_instance();
//! let second = DoubleCheckedHolder::get_instance();
//! assert!(first.is_same(second));
//! ```
//!
//! ```rust
//! use singleton_holders::DoubleChecked;
//!
//! static CONFIG: DoubleChecked<String> = DoubleChecked::new();
//!
//! let value = CONFIG.get_or_init(|| "production".to_string());
//! assert_eq!(value, "production");
//! assert!(CONFIG.is_done());
//! ```

/// Double-checked locking cell.
mod double_checked;

/// Compile-time initialized cell.
mod eager;

pub mod driver;
mod error;
mod holders;
mod instance;

/// Unsynchronized lazy cell.
mod lazy;

/// Internal state word for the double-checked cell.
mod state;

/// Mutex-guarded lazy cell.
mod synchronized;

mod variant;

pub use double_checked::DoubleChecked;
pub use eager::Eager;
pub use error::{Error, Result};
pub use holders::{
   get_instance, DoubleCheckedHolder, EagerHolder, LazyHolder, Singleton, SynchronizedHolder,
};
pub use instance::{Identity, Instance};
pub use lazy::Lazy;
pub use synchronized::Synchronized;
pub use variant::Variant;
