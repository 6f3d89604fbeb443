//! Chip-name normalization and case-identifier formatting.
//!
//! Test authors write chip names in whatever case they like (`"esp32"`,
//! `"Esp32s2"`); everything downstream — CI filtering, the DUT registry,
//! the subset check — works on the uppercased canonical form.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A target-chip declaration: absent, a single chip, or several.
///
/// Mirrors the three input shapes a case may declare support with.
/// `Unset` propagates "unspecified" — for `ci_target` it means "every
/// declared target runs in CI".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChipList {
    /// Not specified by the author.
    Unset,
    /// A single chip name.
    One(String),
    /// Several chip names, order-significant.
    Many(Vec<String>),
}

impl ChipList {
    /// Uppercase pass. `Unset` is returned unchanged; `Many` preserves
    /// element order and count. Pure — no validation happens here.
    pub fn normalized(&self) -> Self {
        match self {
            Self::Unset => Self::Unset,
            Self::One(s) => Self::One(s.to_uppercase()),
            Self::Many(v) => Self::Many(v.iter().map(|s| s.to_uppercase()).collect()),
        }
    }

    /// Canonical set view of the normalized form. `Unset` yields the
    /// empty set, which is a subset of anything.
    pub fn as_set(&self) -> BTreeSet<String> {
        match self.normalized() {
            Self::Unset => BTreeSet::new(),
            Self::One(s) => BTreeSet::from([s]),
            Self::Many(v) => v.into_iter().collect(),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<&str> for ChipList {
    fn from(s: &str) -> Self {
        Self::One(s.to_owned())
    }
}

impl From<String> for ChipList {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<Vec<&str>> for ChipList {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for ChipList {
    fn from(v: &[&str]) -> Self {
        Self::Many(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl fmt::Display for ChipList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::One(s) => f.write_str(s),
            Self::Many(v) => f.write_str(&v.join(",")),
        }
    }
}

/// Build the canonical correlation key for a case: `"<chip>.<case_name>"`.
///
/// The chip token is taken as-is; callers that want the conventional
/// `UPPERCASE_TARGET.case_name` form normalize before formatting. Not
/// guaranteed globally unique — two cases sharing a name and a target
/// collide, which reporting tolerates.
pub fn format_case_id(chip: impl fmt::Display, case_name: &str) -> String {
    format!("{chip}.{case_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_propagates_unchanged() {
        assert_eq!(ChipList::Unset.normalized(), ChipList::Unset);
        assert!(ChipList::Unset.as_set().is_empty());
    }

    #[test]
    fn single_chip_uppercased() {
        let c = ChipList::from("esp32");
        assert_eq!(c.normalized(), ChipList::One("ESP32".into()));
    }

    #[test]
    fn list_uppercased_order_preserved() {
        let c = ChipList::from(vec!["esp32", "esp32s2"]);
        assert_eq!(
            c.normalized(),
            ChipList::Many(vec!["ESP32".into(), "ESP32S2".into()])
        );
    }

    #[test]
    fn set_view_deduplicates() {
        let c = ChipList::from(vec!["esp32", "ESP32", "esp32s2"]);
        let set = c.as_set();
        assert_eq!(set.len(), 2);
        assert!(set.contains("ESP32"));
        assert!(set.contains("ESP32S2"));
    }

    #[test]
    fn case_id_format() {
        assert_eq!(format_case_id("ESP32", "test_foo"), "ESP32.test_foo");
    }

    #[test]
    fn case_id_accepts_chip_list() {
        let target = ChipList::from("esp32");
        assert_eq!(format_case_id(&target, "test_foo"), "esp32.test_foo");
    }
}
