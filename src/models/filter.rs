// src/models/filter.rs

//! Declarative activity filter rules.
//!
//! Filters are configured as an ordered list; insertion order is evaluation
//! order. Evaluation itself lives in [`crate::pipeline::filters`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::activity::CharacterClass;

/// Set-membership operators for character and activity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOperator {
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
}

impl SetOperator {
    /// Whether membership of the tested value in the rule's set removes it.
    pub fn removes_on_membership(self, is_member: bool) -> bool {
        match self {
            Self::Is | Self::In => !is_member,
            Self::IsNot | Self::NotIn => is_member,
        }
    }
}

/// Operators for date rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOperator {
    Before,
    After,
}

/// One or many character class codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassValue {
    One(CharacterClass),
    Many(Vec<CharacterClass>),
}

impl ClassValue {
    pub fn contains(&self, class: CharacterClass) -> bool {
        match self {
            Self::One(value) => *value == class,
            Self::Many(values) => values.contains(&class),
        }
    }
}

/// One or many activity mode codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeValue {
    One(i64),
    Many(Vec<i64>),
}

/// A declarative filter rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    /// Filter batches by the character class that played them.
    Character {
        operator: SetOperator,
        value: ClassValue,
    },

    /// Filter batches and records by timestamp.
    Date {
        operator: DateOperator,
        value: DateTime<FixedOffset>,
    },

    /// Filter records by activity mode. Currently a documented no-op: the
    /// naive mode comparison removed every activity, so evaluation is
    /// disabled until the mode semantics are settled.
    Activity {
        operator: SetOperator,
        value: ModeValue,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_deserialize_from_toml() {
        let raw = r#"
            [[filters]]
            type = "date"
            operator = "before"
            value = "2020-05-01T00:00:00+00:00"

            [[filters]]
            type = "character"
            operator = "is not"
            value = 2

            [[filters]]
            type = "activity"
            operator = "in"
            value = [5, 7]
        "#;

        #[derive(Deserialize)]
        struct Wrapper {
            filters: Vec<Filter>,
        }

        let parsed: Wrapper = toml::from_str(raw).unwrap();
        assert_eq!(parsed.filters.len(), 3);
        assert!(matches!(
            parsed.filters[1],
            Filter::Character {
                operator: SetOperator::IsNot,
                value: ClassValue::One(CharacterClass::Warlock),
            }
        ));
        assert!(matches!(
            parsed.filters[2],
            Filter::Activity {
                operator: SetOperator::In,
                ..
            }
        ));
    }

    #[test]
    fn set_operator_removal_semantics() {
        assert!(SetOperator::Is.removes_on_membership(false));
        assert!(!SetOperator::Is.removes_on_membership(true));
        assert!(SetOperator::NotIn.removes_on_membership(true));
        assert!(!SetOperator::NotIn.removes_on_membership(false));
    }

    #[test]
    fn class_value_membership() {
        let many = ClassValue::Many(vec![CharacterClass::Titan, CharacterClass::Hunter]);
        assert!(many.contains(CharacterClass::Titan));
        assert!(!many.contains(CharacterClass::Warlock));
    }
}
