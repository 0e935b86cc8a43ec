//! Error types for the selector and the driver.
//!
//! The holders themselves never fail; errors only come from turning user input
//! into a [`Variant`](crate::Variant) or into driver settings, and from
//! starting the driver's caller threads.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
   /// The name does not match any singleton variant.
   #[error("unknown singleton variant `{0}` (expected one of: eager, lazy, synchronized, double-checked)")]
   UnknownVariant(String),

   /// Driver settings that cannot produce a report.
   #[error("invalid settings: {0}")]
   InvalidSettings(&'static str),

   /// The OS refused to start a caller thread.
   #[error("failed to spawn caller thread: {0}")]
   Spawn(String),
}

pub type Result<T> = core::result::Result<T, Error>;
