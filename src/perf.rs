//! Performance reporting and pass/fail threshold checks.
//!
//! Thresholds live in the SDK tree as C header `#define` lines:
//!
//! ```text
//! #define IDF_PERFORMANCE_MAX_RSA_2048KEY_PUBLIC_OP   19000
//! #define IDF_PERFORMANCE_MIN_AES_CBC_THROUGHPUT_MBSEC 43.0
//! ```
//!
//! A target-specific header overrides the generic one. A metric with no
//! definition anywhere is simply not checked — thresholds are optional
//! by policy.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Error, Result};
use crate::ports::{ConsoleColor, ConsoleSink, RunContext};

/// Emit one performance observation to the live console (orange) and
/// into the active case's captured stdout.
pub fn log_performance(
    console: &mut dyn ConsoleSink,
    run: &mut RunContext,
    item: &str,
    value: impl fmt::Display,
) {
    let msg = format!("[Performance][{item}]: {value}");
    console.log(&msg, ConsoleColor::Orange);
    let stdout = &mut run.current_case_mut().stdout;
    stdout.push_str(&msg);
    stdout.push_str("\r\n");
}

/// Comparison direction of a threshold definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PerfOp {
    Min,
    Max,
}

/// Resolves and enforces performance thresholds from the SDK tree.
#[derive(Debug, Clone)]
pub struct PerfChecker {
    sdk_path: PathBuf,
}

impl PerfChecker {
    pub fn new(sdk_path: impl Into<PathBuf>) -> Self {
        Self {
            sdk_path: sdk_path.into(),
        }
    }

    /// Resolve the SDK path from the `IDF_PATH` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("IDF_PATH") {
            Ok(p) if !p.is_empty() => Ok(Self::new(p)),
            _ => Err(Error::SdkPath("IDF_PATH is not set".to_owned())),
        }
    }

    /// Check a measured value against the applicable threshold.
    ///
    /// The target-specific header takes precedence over the generic
    /// one; the first source that defines the metric wins. Unreadable
    /// files and undefined metrics are skipped silently, and if no
    /// source defines the metric the check passes.
    pub fn check(&self, item: &str, value: f64, target: &str) -> Result<()> {
        let pattern = format!(
            r"#define\s+IDF_PERFORMANCE_(MIN|MAX)_{}\s+([\d.]+)",
            regex::escape(&item.to_uppercase())
        );
        let re =
            Regex::new(&pattern).map_err(|e| Error::Config(format!("perf pattern: {e}")))?;

        let include_dir = self
            .sdk_path
            .join("components")
            .join("idf_test")
            .join("include");
        let sources = [
            include_dir.join(target).join("idf_performance_target.h"),
            include_dir.join("idf_performance.h"),
        ];

        for source in &sources {
            let Some((op, threshold)) = find_perf_item(&re, source) else {
                continue;
            };
            let ok = match op {
                PerfOp::Max => value <= threshold,
                PerfOp::Min => value >= threshold,
            };
            if !ok {
                return Err(Error::PerfViolation {
                    item: item.to_owned(),
                    value,
                    threshold,
                });
            }
            // first definition wins, don't consult the fallback
            break;
        }
        Ok(())
    }
}

/// Scan one threshold source. `None` means "no data" — the file is
/// missing, unreadable, defines no matching metric, or carries a value
/// that doesn't parse as a float.
fn find_perf_item(re: &Regex, path: &Path) -> Option<(PerfOp, f64)> {
    let text = fs::read_to_string(path).ok()?;
    let caps = re.captures(&text)?;
    let op = match &caps[1] {
        "MAX" => PerfOp::Max,
        _ => PerfOp::Min,
    };
    let threshold: f64 = caps[2].parse().ok()?;
    Some((op, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct CapturedConsole {
        lines: Vec<(String, ConsoleColor)>,
    }

    impl ConsoleSink for CapturedConsole {
        fn log(&mut self, msg: &str, color: ConsoleColor) {
            self.lines.push((msg.to_owned(), color));
        }
    }

    #[test]
    fn log_performance_hits_console_and_report() {
        let mut console = CapturedConsole { lines: Vec::new() };
        let mut run = RunContext::new("test_rsa");
        log_performance(&mut console, &mut run, "RSA_PUBLIC_OP", 18500);

        assert_eq!(
            console.lines,
            vec![(
                "[Performance][RSA_PUBLIC_OP]: 18500".to_owned(),
                ConsoleColor::Orange
            )]
        );
        assert_eq!(
            run.current_case().stdout,
            "[Performance][RSA_PUBLIC_OP]: 18500\r\n"
        );
    }

    #[test]
    fn log_performance_appends() {
        let mut console = CapturedConsole { lines: Vec::new() };
        let mut run = RunContext::new("test_aes");
        log_performance(&mut console, &mut run, "A", 1);
        log_performance(&mut console, &mut run, "B", 2.5);
        assert_eq!(
            run.current_case().stdout,
            "[Performance][A]: 1\r\n[Performance][B]: 2.5\r\n"
        );
    }

    fn write_header(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = fs::File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn sdk_with_generic(lines: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_header(
            dir.path(),
            "components/idf_test/include/idf_performance.h",
            lines,
        );
        dir
    }

    #[test]
    fn max_threshold_boundary() {
        let sdk = sdk_with_generic("#define IDF_PERFORMANCE_MAX_SPI_PER_TRANS 100.0\n");
        let checker = PerfChecker::new(sdk.path());
        assert!(checker.check("spi_per_trans", 100.0, "ESP32").is_ok());
        let err = checker.check("spi_per_trans", 100.1, "ESP32").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("spi_per_trans"));
        assert!(msg.contains("100.1"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn min_threshold_boundary() {
        let sdk = sdk_with_generic("#define IDF_PERFORMANCE_MIN_AES_THROUGHPUT 5.0\n");
        let checker = PerfChecker::new(sdk.path());
        assert!(checker.check("AES_THROUGHPUT", 5.0, "ESP32").is_ok());
        assert!(checker.check("AES_THROUGHPUT", 4.9, "ESP32").is_err());
    }

    #[test]
    fn undefined_metric_passes_any_value() {
        let sdk = sdk_with_generic("#define IDF_PERFORMANCE_MAX_OTHER_METRIC 1\n");
        let checker = PerfChecker::new(sdk.path());
        assert!(checker.check("NO_SUCH_METRIC", 1e12, "ESP32").is_ok());
    }

    #[test]
    fn missing_sdk_tree_passes() {
        let checker = PerfChecker::new("/nonexistent/idf");
        assert!(checker.check("ANY", 123.0, "ESP32").is_ok());
    }

    #[test]
    fn target_specific_overrides_generic() {
        let sdk = sdk_with_generic("#define IDF_PERFORMANCE_MAX_DELAY_US 100\n");
        write_header(
            sdk.path(),
            "components/idf_test/include/ESP32S2/idf_performance_target.h",
            "#define IDF_PERFORMANCE_MAX_DELAY_US 50\n",
        );
        let checker = PerfChecker::new(sdk.path());
        // 75 violates the target-specific 50 even though generic allows 100
        assert!(checker.check("DELAY_US", 75.0, "ESP32S2").is_err());
        // other targets fall back to the generic file
        assert!(checker.check("DELAY_US", 75.0, "ESP32").is_ok());
    }

    #[test]
    fn metric_match_is_case_insensitive_via_uppercasing() {
        let sdk = sdk_with_generic("#define IDF_PERFORMANCE_MIN_FOO_BAR 2.5\n");
        let checker = PerfChecker::new(sdk.path());
        assert!(checker.check("foo_bar", 3.0, "ESP32").is_ok());
        assert!(checker.check("foo_bar", 2.0, "ESP32").is_err());
    }
}
