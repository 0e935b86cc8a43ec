use anyhow::Context;
use clap::Parser;
use singleton_holders::driver::{self, Settings};
use singleton_holders::Variant;

#[derive(Debug, Parser, Clone)]
#[clap(
   version,
   about = "Fetch a singleton from one of four holders and print what came back"
)]
struct Options {
   #[clap(
      long,
      env = "SINGLETON_VARIANT",
      default_value = "double-checked",
      help = "Holder to use: eager, lazy, synchronized, double-checked"
   )]
   variant: Variant,
   #[clap(long, default_value_t = 2, help = "Accessor calls per thread")]
   calls: usize,
   #[clap(long, default_value_t = 1, help = "Threads released together onto the accessor")]
   threads: usize,
}

impl From<&Options> for Settings {
   fn from(options: &Options) -> Self {
      Settings {
         variant: options.variant,
         calls: options.calls,
         threads: options.threads,
      }
   }
}

fn main() -> anyhow::Result<()> {
   env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

   let options = Options::parse();
   let report = driver::run(&Settings::from(&options))
      .with_context(|| format!("running the {} holder", options.variant))?;

   if options.threads == 1 {
      for instance in &report.instances {
         println!("{instance}");
      }
   } else {
      for identity in report.distinct() {
         println!("{}@{identity}", report.variant);
      }
   }

   if report.is_consistent() {
      println!("{}: every call returned the same instance", report.variant);
   } else {
      println!(
         "{}: {} distinct instances across {} calls",
         report.variant,
         report.distinct().len(),
         report.instances.len()
      );
   }
   Ok(())
}
