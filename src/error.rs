//! Unified error types for the HIL registration layer.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! callers' error handling uniform. Missing threshold files and absent
//! metric definitions are deliberately *not* errors — the checker treats
//! them as "no data" and passes.

use std::fmt;

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Case misconfiguration caught at registration time (e.g. the
    /// CI-target set is not a subset of the declared targets). Fatal to
    /// collection of the offending module, never deferred to run time.
    Config(String),
    /// The execution framework rejected the registration. Opaque — the
    /// framework is a collaborator behind a port.
    Framework(anyhow::Error),
    /// The SDK path could not be resolved (`IDF_PATH` unset or empty).
    SdkPath(String),
    /// A measured performance value missed its pass threshold. Intended
    /// to surface as a test failure in the host runner, not a crash.
    PerfViolation {
        item: String,
        value: f64,
        threshold: f64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Framework(e) => write!(f, "framework: {e}"),
            Self::SdkPath(msg) => write!(f, "sdk path: {msg}"),
            Self::PerfViolation {
                item,
                value,
                threshold,
            } => write!(
                f,
                "[Performance] {item} value is {value}, doesn't meet pass standard {threshold}"
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::Framework(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perf_violation_message_names_metric_value_and_standard() {
        let e = Error::PerfViolation {
            item: "RSA_2048KEY_PUBLIC_OP".into(),
            value: 100.1,
            threshold: 100.0,
        };
        let msg = e.to_string();
        assert!(msg.contains("RSA_2048KEY_PUBLIC_OP"));
        assert!(msg.contains("100.1"));
        assert!(msg.contains("100"));
    }
}
