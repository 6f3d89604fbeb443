//! Case configuration, validation, and registration.
//!
//! The decorator pattern of the original tooling becomes explicit
//! builders here: a [`CaseConfig`] factory per test flavor (example,
//! unit, custom), consumed by [`register`], which validates, delegates
//! to the execution framework, then stamps the returned case with its
//! correlation ID. Sequencing is fixed: validate → delegate → stamp.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chips::{ChipList, format_case_id};
use crate::error::{Error, Result};
use crate::ports::{FrameworkPort, RunContext};
use crate::registry::{DutKind, DutRegistry};

// ───────────────────────────────────────────────────────────────
// Application kinds
// ───────────────────────────────────────────────────────────────

/// Opaque reference to a test-application class in the execution
/// framework. Which binary gets built and flashed is the framework's
/// concern; this crate only selects the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppKind {
    /// A standalone example application.
    Example,
    /// The unit-test runner application.
    UnitTest,
    /// A custom test application (test-apps tree).
    TestApp,
    /// A loadable ELF test app, run without flashing.
    LoadableElf,
}

// ───────────────────────────────────────────────────────────────
// Case configuration builders
// ───────────────────────────────────────────────────────────────

/// Everything a test case declares at registration time.
///
/// Three factories carry the flavor defaults; builder methods override
/// individual fields. The `extra` map is passed to the framework
/// verbatim — this crate never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseConfig {
    pub app: AppKind,
    pub target: ChipList,
    pub ci_target: ChipList,
    pub module: String,
    pub execution_time_mins: u32,
    pub level: String,
    pub erase_nvs: bool,
    pub config_name: Option<String>,
    /// Grouping tag for custom tests (unused by the core, forwarded).
    pub group: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

impl CaseConfig {
    fn with_defaults(app: AppKind, module: &str, level: &str) -> Self {
        Self {
            app,
            target: ChipList::from("ESP32"),
            ci_target: ChipList::Unset,
            module: module.to_owned(),
            execution_time_mins: 1,
            level: level.to_owned(),
            erase_nvs: true,
            config_name: None,
            group: None,
            extra: BTreeMap::new(),
        }
    }

    /// Configuration for an example test.
    pub fn example() -> Self {
        Self::with_defaults(AppKind::Example, "examples", "example")
    }

    /// Configuration for a unit test.
    pub fn unit() -> Self {
        Self::with_defaults(AppKind::UnitTest, "unit-test", "unit")
    }

    /// Configuration for a custom / integration test.
    pub fn custom() -> Self {
        let mut cfg = Self::with_defaults(AppKind::TestApp, "misc", "integration");
        cfg.group = Some("test-apps".to_owned());
        cfg
    }

    // ── builder methods ───────────────────────────────────────

    pub fn app(mut self, app: AppKind) -> Self {
        self.app = app;
        self
    }

    /// Chips this case supports. Accepts a single name or a list.
    pub fn target(mut self, target: impl Into<ChipList>) -> Self {
        self.target = target.into();
        self
    }

    /// Chips that must run in CI. Unset means all declared targets.
    pub fn ci_target(mut self, ci_target: impl Into<ChipList>) -> Self {
        self.ci_target = ci_target.into();
        self
    }

    pub fn module(mut self, module: &str) -> Self {
        self.module = module.to_owned();
        self
    }

    pub fn execution_time_mins(mut self, mins: u32) -> Self {
        self.execution_time_mins = mins;
        self
    }

    pub fn level(mut self, level: &str) -> Self {
        self.level = level.to_owned();
        self
    }

    /// Whether the DUT erases NVS before starting the app.
    pub fn erase_nvs(mut self, erase: bool) -> Self {
        self.erase_nvs = erase;
        self
    }

    pub fn config_name(mut self, name: &str) -> Self {
        self.config_name = Some(name.to_owned());
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_owned());
        self
    }

    /// Attach an arbitrary passthrough option.
    pub fn extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_owned(), value);
        self
    }

    /// Consume the builder: validate, delegate, stamp. See [`register`].
    pub fn register(
        self,
        registry: &DutRegistry,
        framework: &mut dyn FrameworkPort,
        func: CaseFn,
    ) -> Result<RegisteredCase> {
        register(self, registry, framework, func)
    }
}

// ───────────────────────────────────────────────────────────────
// Metadata bundle and registered case
// ───────────────────────────────────────────────────────────────

/// The bundle handed to [`FrameworkPort::register`]. Target lists are
/// normalized to uppercase; the DUT map is a snapshot of the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMeta {
    pub app: AppKind,
    pub target: ChipList,
    pub ci_target: ChipList,
    pub module: String,
    pub execution_time_mins: u32,
    pub level: String,
    pub dut_map: BTreeMap<String, DutKind>,
    pub erase_nvs: bool,
    pub config_name: Option<String>,
    pub group: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

impl CaseMeta {
    fn from_config(config: &CaseConfig, registry: &DutRegistry) -> Self {
        Self {
            app: config.app,
            target: config.target.normalized(),
            ci_target: config.ci_target.normalized(),
            module: config.module.clone(),
            execution_time_mins: config.execution_time_mins,
            level: config.level.clone(),
            dut_map: registry.as_map(),
            erase_nvs: config.erase_nvs,
            config_name: config.config_name.clone(),
            group: config.group.clone(),
            extra: config.extra.clone(),
        }
    }
}

/// The user-authored test body, executed by the framework against the
/// run it schedules.
pub type CaseFn = Box<dyn Fn(&mut RunContext) + Send>;

/// A case the framework has accepted: the wrapped test function plus
/// the metadata the framework assigned it.
pub struct RegisteredCase {
    name: String,
    /// Mutable per-case info map; the core writes the `"ID"` entry, the
    /// framework and runner read and extend it freely.
    pub case_info: BTreeMap<String, Value>,
    func: CaseFn,
}

impl RegisteredCase {
    /// Constructed by `FrameworkPort` implementations once a case is
    /// recorded. Seeds `case_info["name"]` with the assigned name.
    pub fn new(name: impl Into<String>, func: CaseFn) -> Self {
        let name = name.into();
        let case_info = BTreeMap::from([("name".to_owned(), Value::String(name.clone()))]);
        Self {
            name,
            case_info,
            func,
        }
    }

    /// The framework-assigned case name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stamped correlation ID, once registration has completed.
    pub fn id(&self) -> Option<&str> {
        self.case_info.get("ID").and_then(Value::as_str)
    }

    /// Execute the test body within `run`.
    pub fn run(&self, run: &mut RunContext) {
        (self.func)(run);
    }
}

impl std::fmt::Debug for RegisteredCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCase")
            .field("name", &self.name)
            .field("case_info", &self.case_info)
            .finish_non_exhaustive()
    }
}

// ───────────────────────────────────────────────────────────────
// Validation and registration
// ───────────────────────────────────────────────────────────────

/// CI-target containment check, applied to every registration entry
/// point before anything else runs.
///
/// An unset CI-target trivially passes — the empty set is a subset of
/// anything, and "unset" means every declared target runs in CI.
pub fn validate_ci_subset(target: &ChipList, ci_target: &ChipList) -> Result<()> {
    if !ci_target.as_set().is_subset(&target.as_set()) {
        return Err(Error::Config(
            "ci_target must be a subset of target".to_owned(),
        ));
    }
    Ok(())
}

/// Register a test case with the execution framework.
///
/// 1. Validate that the CI-target set is contained in the target set —
///    fail-fast, at collection time.
/// 2. Build the metadata bundle (normalized chip lists, registry
///    snapshot) and delegate to the framework.
/// 3. Stamp `case_info["ID"]` with the correlation key, derived from
///    the target *as originally written* and the assigned case name.
pub fn register(
    config: CaseConfig,
    registry: &DutRegistry,
    framework: &mut dyn FrameworkPort,
    func: CaseFn,
) -> Result<RegisteredCase> {
    validate_ci_subset(&config.target, &config.ci_target)?;

    let meta = CaseMeta::from_config(&config, registry);
    let mut case = framework.register(meta, func).map_err(Error::Framework)?;

    let id = format_case_id(&config.target, case.name());
    debug!("registered case {id} (module={})", config.module);
    case.case_info.insert("ID".to_owned(), Value::String(id));
    Ok(case)
}
