use singleton_holders::{Error, Variant};

#[test]
fn test_canonical_names_round_trip() {
   for variant in Variant::ALL {
      assert_eq!(variant.name().parse::<Variant>(), Ok(variant));
      assert_eq!(variant.to_string(), variant.name());
   }
}

#[test]
fn test_aliases_and_spelling() {
   assert_eq!("EAGER_INITIALIZATION".parse::<Variant>(), Ok(Variant::Eager));
   assert_eq!("lazy-initialization".parse::<Variant>(), Ok(Variant::Lazy));
   assert_eq!(" Synchronized ".parse::<Variant>(), Ok(Variant::Synchronized));
   assert_eq!("synchronized_specific".parse::<Variant>(), Ok(Variant::DoubleChecked));
   assert_eq!("double_checked".parse::<Variant>(), Ok(Variant::DoubleChecked));
}

#[test]
fn test_unknown_name() {
   let err = "monostate".parse::<Variant>().unwrap_err();
   assert_eq!(err, Error::UnknownVariant("monostate".to_string()));
   assert!(err.to_string().contains("monostate"));
}

#[test]
fn test_thread_safety_flags() {
   assert!(Variant::Eager.is_thread_safe());
   assert!(!Variant::Lazy.is_thread_safe());
   assert!(Variant::Synchronized.is_thread_safe());
   assert!(Variant::DoubleChecked.is_thread_safe());
   assert_eq!(Variant::default(), Variant::DoubleChecked);
}
