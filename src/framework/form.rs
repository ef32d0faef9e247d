//! # Form State
//!
//! A screen's editable state is a flat map of field name to string value, exactly as an
//! operator types it. Typed records are produced from it only at the service boundary
//! (see [`Resource::from_fields`](crate::framework::Resource::from_fields)).

use crate::framework::WorkflowError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How a field's text is interpreted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Whole number, e.g. a capacity or a foreign key.
    Integer,
    /// `YYYY-MM-DD`.
    Date,
    /// `HH:MM`, optionally followed by `:SS`.
    Time,
}

impl FieldKind {
    /// Whether `raw` (already trimmed, non-empty) has the shape this kind expects.
    pub fn accepts(self, raw: &str) -> bool {
        match self {
            FieldKind::Text => true,
            FieldKind::Integer => raw.parse::<i64>().is_ok(),
            FieldKind::Date => {
                let parts: Vec<&str> = raw.split('-').collect();
                matches!(
                    parts.as_slice(),
                    [year, month, day]
                        if year.len() == 4
                            && year.parse::<u32>().is_ok()
                            && in_range(month, 1..=12)
                            && in_range(day, 1..=31)
                )
            }
            FieldKind::Time => {
                let parts: Vec<&str> = raw.split(':').collect();
                match parts.as_slice() {
                    [hours, minutes] => in_range(hours, 0..=23) && in_range(minutes, 0..=59),
                    [hours, minutes, seconds] => {
                        in_range(hours, 0..=23)
                            && in_range(minutes, 0..=59)
                            && in_range(seconds, 0..=59)
                    }
                    _ => false,
                }
            }
        }
    }
}

fn in_range(raw: &str, range: std::ops::RangeInclusive<u32>) -> bool {
    raw.len() == 2 && raw.parse::<u32>().is_ok_and(|value| range.contains(&value))
}

/// One entry of a resource's field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value the field takes whenever the form is cleared.
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: "",
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: "",
        }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self { default, ..self }
    }
}

/// Field name to current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    values: BTreeMap<String, String>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form holding every schema field at its default value.
    pub fn from_schema(schema: &[FieldSpec]) -> Self {
        let values = schema
            .iter()
            .map(|spec| (spec.name.to_string(), spec.default.to_string()))
            .collect();
        Self { values }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value with surrounding whitespace removed; empty when absent.
    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).map(str::trim).unwrap_or("")
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.trimmed(name).is_empty()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names of required schema fields that are blank, in schema order.
    pub fn missing_required(&self, schema: &[FieldSpec]) -> Vec<&'static str> {
        schema
            .iter()
            .filter(|spec| spec.required && self.is_blank(spec.name))
            .map(|spec| spec.name)
            .collect()
    }

    /// Names of filled-in schema fields whose text does not fit their [`FieldKind`].
    pub fn malformed(&self, schema: &[FieldSpec]) -> Vec<&'static str> {
        schema
            .iter()
            .filter(|spec| match self.trimmed(spec.name) {
                "" => false,
                raw => !spec.kind.accepts(raw),
            })
            .map(|spec| spec.name)
            .collect()
    }

    /// Trimmed text of a required field.
    pub fn text(&self, name: &str) -> Result<String, WorkflowError> {
        match self.trimmed(name) {
            "" => Err(WorkflowError::validation(format!("{name} is required"))),
            value => Ok(value.to_string()),
        }
    }

    /// Trimmed text of an optional field, `None` when blank.
    pub fn optional_text(&self, name: &str) -> Option<String> {
        match self.trimmed(name) {
            "" => None,
            value => Some(value.to_string()),
        }
    }

    /// Parses a required field.
    pub fn parse<V: FromStr>(&self, name: &str) -> Result<V, WorkflowError> {
        let raw = self.text(name)?;
        raw.parse()
            .map_err(|_| WorkflowError::validation(format!("{name}: invalid value '{raw}'")))
    }

    /// Parses an optional field, `None` when blank.
    pub fn parse_optional<V: FromStr>(&self, name: &str) -> Result<Option<V>, WorkflowError> {
        match self.optional_text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| WorkflowError::validation(format!("{name}: invalid value '{raw}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[FieldSpec] = &[
        FieldSpec::required("bus_number", FieldKind::Text),
        FieldSpec::required("seat_capacity", FieldKind::Integer),
        FieldSpec::optional("status", FieldKind::Text).with_default("active"),
    ];

    #[test]
    fn from_schema_applies_defaults() {
        let form = FormFields::from_schema(SCHEMA);
        assert_eq!(form.get("status"), Some("active"));
        assert_eq!(form.get("bus_number"), Some(""));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let form = FormFields::from_schema(SCHEMA)
            .with("bus_number", "   ")
            .with("seat_capacity", "40");
        assert_eq!(form.missing_required(SCHEMA), vec!["bus_number"]);
    }

    #[test]
    fn parse_reports_the_offending_field() {
        let form = FormFields::new().with("seat_capacity", "forty");
        let err = form.parse::<u32>("seat_capacity").unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Validation("seat_capacity: invalid value 'forty'".into())
        );
        assert_eq!(form.parse_optional::<u32>("route_id").unwrap(), None);
    }

    #[test]
    fn malformed_checks_kind_of_filled_fields_only() {
        let form = FormFields::from_schema(SCHEMA)
            .with("bus_number", "NB-1")
            .with("seat_capacity", "forty");
        assert_eq!(form.malformed(SCHEMA), vec!["seat_capacity"]);

        let blank = FormFields::from_schema(SCHEMA);
        assert!(blank.malformed(SCHEMA).is_empty());
    }

    #[test]
    fn date_and_time_shapes() {
        assert!(FieldKind::Date.accepts("2024-05-01"));
        assert!(!FieldKind::Date.accepts("2024-13-01"));
        assert!(!FieldKind::Date.accepts("01/05/2024"));
        assert!(FieldKind::Time.accepts("06:30"));
        assert!(FieldKind::Time.accepts("23:59:59"));
        assert!(!FieldKind::Time.accepts("24:00"));
        assert!(!FieldKind::Time.accepts("6:30"));
        assert!(FieldKind::Integer.accepts("52"));
        assert!(!FieldKind::Integer.accepts("5.2"));
    }
}
