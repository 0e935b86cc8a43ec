//! Calls one holder repeatedly and records what it handed out.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::holders::get_instance;
use crate::instance::{Identity, Instance};
use crate::variant::Variant;

/// What to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
   pub variant: Variant,
   /// Accessor calls per thread.
   pub calls: usize,
   /// Threads released together onto the accessor. `1` runs on the caller's thread.
   pub threads: usize,
}

impl Default for Settings {
   fn default() -> Self {
      Self {
         variant: Variant::default(),
         calls: 2,
         threads: 1,
      }
   }
}

impl Settings {
   pub fn validate(&self) -> Result<()> {
      if self.calls == 0 {
         return Err(Error::InvalidSettings("calls must be at least 1"));
      }
      if self.threads == 0 {
         return Err(Error::InvalidSettings("threads must be at least 1"));
      }
      if self.threads.checked_mul(self.calls).is_none() {
         return Err(Error::InvalidSettings("threads * calls overflows"));
      }
      Ok(())
   }
}

/// Every instance returned during a run, in call order per thread.
#[derive(Debug, Clone)]
pub struct Report {
   pub variant: Variant,
   pub instances: Vec<&'static Instance>,
}

impl Report {
   pub fn identities(&self) -> impl Iterator<Item = Identity> + '_ {
      self.instances.iter().map(|instance| instance.identity())
   }

   pub fn distinct(&self) -> BTreeSet<Identity> {
      self.identities().collect()
   }

   /// `true` when every call returned the same object.
   pub fn is_consistent(&self) -> bool {
      self.distinct().len() <= 1
   }
}

/// Runs the accessor as described by `settings`.
pub fn run(settings: &Settings) -> Result<Report> {
   settings.validate()?;
   log::info!(
      "calling {} accessor {} time(s) on {} thread(s)",
      settings.variant,
      settings.calls,
      settings.threads
   );

   let instances = if settings.threads == 1 {
      call_repeatedly(settings.variant, settings.calls)
   } else {
      run_concurrent(settings.variant, settings.threads, settings.calls)?
   };

   let report = Report {
      variant: settings.variant,
      instances,
   };
   if !report.is_consistent() {
      log::warn!(
         "{} handed out {} distinct instances",
         report.variant,
         report.distinct().len()
      );
   }
   Ok(report)
}

fn call_repeatedly(variant: Variant, calls: usize) -> Vec<&'static Instance> {
   (0..calls).map(|_| get_instance(variant)).collect()
}

fn run_concurrent(
   variant: Variant,
   threads: usize,
   calls: usize,
) -> Result<Vec<&'static Instance>> {
   // Held for writing until every caller exists; releasing it starts them together.
   let gate = Arc::new(RwLock::new(()));
   let aborted = Arc::new(AtomicBool::new(false));
   let start = gate.write();

   let mut handles = Vec::with_capacity(threads);
   let mut spawn_error = None;
   for index in 0..threads {
      let gate = Arc::clone(&gate);
      let aborted = Arc::clone(&aborted);
      let spawned = thread::Builder::new()
         .name(format!("caller-{index}"))
         .spawn(move || {
            drop(gate.read());
            if aborted.load(Ordering::Acquire) {
               return Vec::new();
            }
            call_repeatedly(variant, calls)
         });
      match spawned {
         Ok(handle) => handles.push(handle),
         Err(err) => {
            log::error!("could not spawn caller {index} of {threads}: {err}");
            spawn_error = Some(err);
            break;
         }
      }
   }
   if spawn_error.is_some() {
      aborted.store(true, Ordering::Release);
   }
   drop(start);

   let mut instances = Vec::new();
   for handle in handles {
      match handle.join() {
         Ok(batch) => instances.extend(batch),
         Err(panic) => std::panic::resume_unwind(panic),
      }
   }
   match spawn_error {
      Some(err) => Err(Error::Spawn(err.to_string())),
      None => Ok(instances),
   }
}
