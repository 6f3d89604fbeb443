//! Port traits — the boundary between the registration core and its
//! collaborators.
//!
//! ```text
//!   CaseConfig ──▶ register() ──▶ FrameworkPort (execution framework)
//!   test body  ──▶ log_performance() ──▶ ConsoleSink + RunContext
//! ```
//!
//! The execution framework, the colored console, and the run report are
//! all behind traits so the core stays testable with mocks. The
//! "current test case" of the report is an explicit [`RunContext`]
//! handle rather than ambient process state.

use crate::case::{CaseFn, CaseMeta, RegisteredCase};

// ───────────────────────────────────────────────────────────────
// Execution framework port
// ───────────────────────────────────────────────────────────────

/// The registration API of the external test-execution framework.
///
/// Takes a metadata bundle and the user's test function, records the
/// case in the framework's own collection state, and returns the
/// wrapped case. The returned case must carry the framework-assigned
/// `name` and a mutable `case_info` map; the core stamps an `"ID"`
/// entry into the latter after delegation.
pub trait FrameworkPort {
    fn register(&mut self, meta: CaseMeta, func: CaseFn) -> anyhow::Result<RegisteredCase>;
}

// ───────────────────────────────────────────────────────────────
// Console sink port
// ───────────────────────────────────────────────────────────────

/// Color tag for console output. The live console renders it however it
/// can; capture sinks may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleColor {
    Orange,
    Red,
    Green,
    White,
}

/// Live console output, colored. Performance observations go here as
/// well as into the run report.
pub trait ConsoleSink {
    fn log(&mut self, msg: &str, color: ConsoleColor);
}

// ───────────────────────────────────────────────────────────────
// Run context — the active case's report
// ───────────────────────────────────────────────────────────────

/// Captured output of one executing test case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    /// Captured standard output, appended to by the performance
    /// reporter and flushed into the final report by the runner.
    pub stdout: String,
}

impl CaseReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stdout: String::new(),
        }
    }
}

/// Handle to the run the current case executes within. Owns exactly one
/// active [`CaseReport`] at a time; the runner swaps it per case.
#[derive(Debug)]
pub struct RunContext {
    current: CaseReport,
}

impl RunContext {
    pub fn new(case_name: impl Into<String>) -> Self {
        Self {
            current: CaseReport::new(case_name),
        }
    }

    pub fn current_case(&self) -> &CaseReport {
        &self.current
    }

    pub fn current_case_mut(&mut self) -> &mut CaseReport {
        &mut self.current
    }

    /// Start capturing for the next case, returning the finished report
    /// of the previous one.
    pub fn begin_case(&mut self, case_name: impl Into<String>) -> CaseReport {
        std::mem::replace(&mut self.current, CaseReport::new(case_name))
    }
}
