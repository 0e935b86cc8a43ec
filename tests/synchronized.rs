use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use singleton_holders::Synchronized;

/// Not zero-sized, so live values always sit at different addresses.
struct Token {
   _tag: u8,
}

impl Token {
   const fn new() -> Self {
      Token { _tag: 0 }
   }

   fn addr(&self) -> usize {
      self as *const Token as usize
   }
}

#[test]
fn test_new_is_empty() {
   let cell: Synchronized<i32> = Synchronized::new();
   assert_eq!(cell.get(), None);
   assert_eq!(format!("{cell:?}"), "Synchronized(<uninit>)");
}

#[test]
fn test_get_or_init_runs_once() {
   let cell: Synchronized<String> = Synchronized::new();
   let counter = AtomicUsize::new(0);
   let first = cell.get_or_init(|| {
      counter.fetch_add(1, Ordering::SeqCst);
      String::from("held")
   });
   let second = cell.get_or_init(|| {
      counter.fetch_add(1, Ordering::SeqCst);
      panic!("Should not be called")
   });
   assert!(std::ptr::eq(first, second));
   assert_eq!(cell.get().map(String::as_str), Some("held"));
   assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panicking_initializer_releases_lock() {
   let cell: Synchronized<i32> = Synchronized::new();
   let result = panic::catch_unwind(AssertUnwindSafe(|| {
      cell.get_or_init(|| panic!("boom"));
   }));
   assert!(result.is_err());
   assert_eq!(cell.get(), None);
   assert_eq!(cell.get_or_init(|| 3), &3);
}

#[test]
fn test_hundreds_of_threads_see_one_instance() {
   const THREADS: usize = 200;
   let cell = Arc::new(Synchronized::new());
   let constructions = Arc::new(AtomicUsize::new(0));
   let barrier = Arc::new(Barrier::new(THREADS));

   let handles: Vec<_> = (0..THREADS)
      .map(|_| {
         let cell = Arc::clone(&cell);
         let constructions = Arc::clone(&constructions);
         let barrier = Arc::clone(&barrier);
         thread::spawn(move || {
            barrier.wait();
            let mut seen = Vec::with_capacity(10);
            for _ in 0..10 {
               let instance = cell.get_or_init(|| {
                  constructions.fetch_add(1, Ordering::SeqCst);
                  thread::sleep(Duration::from_millis(5));
                  Token::new()
               });
               seen.push(instance.addr());
            }
            seen
         })
      })
      .collect();

   let expected = handles
      .into_iter()
      .flat_map(|h| h.join().unwrap())
      .collect::<std::collections::HashSet<_>>();
   assert_eq!(expected.len(), 1);
   assert_eq!(constructions.load(Ordering::SeqCst), 1);
   assert!(expected.contains(&cell.get().unwrap().addr()));
}
