//! DUT driver registry — the chip → driver-class mapping.
//!
//! The execution framework needs to know which device-under-test driver
//! serves each chip. The original ambient dictionary is replaced by an
//! explicit [`DutRegistry`] instance built once at startup and handed to
//! every registration call; it is read-only after construction. Building
//! it here (rather than letting the framework import driver modules)
//! also sidesteps a load-order cycle between registration and drivers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque reference to a device-under-test driver class. The drivers
/// themselves live in the execution framework; this crate only routes
/// the mapping through to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutKind {
    Esp32,
    Esp32s2,
    Esp8266,
    /// QEMU-emulated ESP32, for driver-level tests without hardware.
    Esp32Qemu,
}

/// Chip name (canonical uppercase) → DUT driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutRegistry {
    map: BTreeMap<String, DutKind>,
}

impl DutRegistry {
    /// Empty registry, for callers that wire everything themselves.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// The stock mapping: the chips the standard driver set covers.
    pub fn builtin() -> Self {
        Self::new()
            .with_dut("ESP32", DutKind::Esp32)
            .with_dut("ESP32S2", DutKind::Esp32s2)
    }

    /// Add or replace a chip → driver entry.
    pub fn with_dut(mut self, chip: &str, kind: DutKind) -> Self {
        self.map.insert(chip.to_uppercase(), kind);
        self
    }

    pub fn get(&self, chip: &str) -> Option<DutKind> {
        self.map.get(&chip.to_uppercase()).copied()
    }

    /// Snapshot of the mapping, as embedded into each case's metadata.
    pub fn as_map(&self) -> BTreeMap<String, DutKind> {
        self.map.clone()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for DutRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_stock_chips() {
        let reg = DutRegistry::builtin();
        assert_eq!(reg.get("ESP32"), Some(DutKind::Esp32));
        assert_eq!(reg.get("ESP32S2"), Some(DutKind::Esp32s2));
        assert_eq!(reg.get("ESP8266"), None);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = DutRegistry::builtin();
        assert_eq!(reg.get("esp32"), Some(DutKind::Esp32));
    }

    #[test]
    fn with_dut_extends_and_replaces() {
        let reg = DutRegistry::builtin()
            .with_dut("esp8266", DutKind::Esp8266)
            .with_dut("ESP32", DutKind::Esp32Qemu);
        assert_eq!(reg.get("ESP8266"), Some(DutKind::Esp8266));
        assert_eq!(reg.get("ESP32"), Some(DutKind::Esp32Qemu));
        assert_eq!(reg.len(), 3);
    }
}
