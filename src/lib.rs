//! idf-hil — registration and validation layer for ESP-IDF
//! hardware-in-the-loop test cases.
//!
//! Wraps a generic test-execution framework with ESP-IDF defaults
//! (target chip, module, test level, NVS erase policy), enforces the
//! "CI targets must be declared targets" rule at collection time, and
//! gates performance measurements against thresholds defined in the
//! SDK tree.
//!
//! The execution framework, console, and run report sit behind port
//! traits; the chip → DUT-driver mapping and the active case's report
//! are explicit context objects passed at call sites.
//!
//! ```no_run
//! use idf_hil::{CaseConfig, DutRegistry};
//! use idf_hil::perf::log_performance;
//! # struct Fw;
//! # impl idf_hil::ports::FrameworkPort for Fw {
//! #     fn register(&mut self, _m: idf_hil::case::CaseMeta, f: idf_hil::case::CaseFn)
//! #         -> anyhow::Result<idf_hil::case::RegisteredCase>
//! #     { Ok(idf_hil::case::RegisteredCase::new("test_wifi_throughput", f)) }
//! # }
//! # fn main() -> idf_hil::Result<()> {
//! # let mut framework = Fw;
//! let registry = DutRegistry::builtin();
//! let case = CaseConfig::example()
//!     .target(vec!["esp32", "esp32s2"])
//!     .ci_target("esp32")
//!     .execution_time_mins(3)
//!     .register(&registry, &mut framework, Box::new(|run| {
//!         let mut console = idf_hil::adapters::LogConsole::new();
//!         log_performance(&mut console, run, "WIFI_TX_MBPS", 41.5);
//!     }))?;
//! assert!(case.id().is_some());
//! # Ok(())
//! # }
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod case;
pub mod chips;
pub mod perf;
pub mod ports;
pub mod registry;

mod error;

pub use case::{AppKind, CaseConfig, CaseMeta, RegisteredCase, register, validate_ci_subset};
pub use chips::{ChipList, format_case_id};
pub use error::{Error, Result};
pub use perf::{PerfChecker, log_performance};
pub use ports::{CaseReport, ConsoleColor, ConsoleSink, FrameworkPort, RunContext};
pub use registry::{DutKind, DutRegistry};
