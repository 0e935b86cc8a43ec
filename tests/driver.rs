use singleton_holders::driver::{run, Settings};
use singleton_holders::{get_instance, Error, Variant};

#[test]
fn test_default_settings() {
   let settings = Settings::default();
   assert_eq!(settings.variant, Variant::DoubleChecked);
   assert_eq!(settings.calls, 2);
   assert_eq!(settings.threads, 1);
   assert_eq!(settings.validate(), Ok(()));
}

#[test]
fn test_rejects_zero_calls_and_threads() {
   let no_calls = Settings {
      calls: 0,
      ..Settings::default()
   };
   assert!(matches!(run(&no_calls), Err(Error::InvalidSettings(_))));

   let no_threads = Settings {
      threads: 0,
      ..Settings::default()
   };
   assert!(matches!(
      no_threads.validate(),
      Err(Error::InvalidSettings(_))
   ));
}

#[test]
fn test_rejects_overflowing_call_count() {
   let huge = Settings {
      variant: Variant::Eager,
      calls: 2,
      threads: usize::MAX,
   };
   assert_eq!(
      huge.validate(),
      Err(Error::InvalidSettings("threads * calls overflows"))
   );
   // Rejected before a single thread is spawned
   assert!(matches!(run(&huge), Err(Error::InvalidSettings(_))));
}

#[test]
fn test_two_calls_return_the_same_instance() {
   for variant in [Variant::Eager, Variant::Synchronized, Variant::DoubleChecked] {
      let report = run(&Settings {
         variant,
         ..Settings::default()
      })
      .unwrap();
      assert_eq!(report.variant, variant);
      assert_eq!(report.instances.len(), 2);
      assert!(report.is_consistent());
      assert!(report.instances[0].is_same(get_instance(variant)));
   }
}

// Only sequential access to the lazy holder in this binary.
#[test]
fn test_lazy_sequential_report_is_consistent() {
   let report = run(&Settings {
      variant: Variant::Lazy,
      calls: 5,
      threads: 1,
   })
   .unwrap();
   assert_eq!(report.instances.len(), 5);
   assert_eq!(report.distinct().len(), 1);
}

#[test]
fn test_concurrent_report_for_thread_safe_variants() {
   for variant in Variant::ALL.into_iter().filter(|v| v.is_thread_safe()) {
      let report = run(&Settings {
         variant,
         calls: 4,
         threads: 64,
      })
      .unwrap();
      assert_eq!(report.instances.len(), 256);
      assert!(report.is_consistent(), "{variant} diverged");
   }
}
