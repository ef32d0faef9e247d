//! # Resource Trait
//!
//! The `Resource` trait is the contract every entity behind an admin screen implements
//! (User, Bus, Alert, ...). It is deliberately small: a typed id, a field schema, and the
//! conversions between a typed record and the flat [`FormFields`] the screen edits.
//!
//! The [`WorkflowEngine`](crate::framework::WorkflowEngine) is written once against this
//! trait, so a new screen is a schema declaration and nothing else.

use crate::framework::{FieldSpec, FormFields, WorkflowError};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// A record type managed through a CRUD screen.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    /// Server-assigned identifier. Parsed from the id field an operator types.
    type Id: Clone + Eq + Hash + Debug + Display + FromStr + From<u32> + Send + Sync + 'static;

    /// Short lowercase entity name used in logs and messages (e.g. `"bus"`).
    const KIND: &'static str;

    /// Name of the form field that carries the identifier (e.g. `"bus_id"`).
    const ID_FIELD: &'static str;

    /// Editable fields, excluding the identifier.
    fn schema() -> &'static [FieldSpec];

    fn id(&self) -> &Self::Id;

    /// The record's editable fields as form values. Does not include the id.
    fn to_fields(&self) -> FormFields;

    /// Builds a record from submitted form values.
    ///
    /// Used by backends; a malformed value is a [`WorkflowError::Validation`].
    fn from_fields(id: Self::Id, fields: &FormFields) -> Result<Self, WorkflowError>;

    /// Full-text match used by [`find_by_text`](crate::framework::ResourceService::find_by_text).
    ///
    /// The default matches the query case-insensitively against every field value.
    fn matches_text(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.to_fields()
            .iter()
            .any(|(_, value)| value.to_lowercase().contains(&needle))
    }

    fn parse_id(raw: &str) -> Result<Self::Id, WorkflowError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(WorkflowError::validation(format!("{} is required", Self::ID_FIELD)));
        }
        raw.parse()
            .map_err(|_| WorkflowError::validation(format!("{}: invalid id '{raw}'", Self::ID_FIELD)))
    }

    /// A cleared form: every schema field at its default.
    fn blank_form() -> FormFields {
        FormFields::from_schema(Self::schema())
    }

    /// The form shown while editing this record: its fields plus its id.
    fn edit_form(&self) -> FormFields {
        self.to_fields().with(Self::ID_FIELD, self.id().to_string())
    }
}

/// Declares a `u32`-backed identifier newtype named `<Entity>Id`.
macro_rules! resource_id {
    ($entity:ident) => {
        ::paste::paste! {
            #[doc = "Identifier of a `" $entity "` record."]
            #[derive(
                Debug,
                Clone,
                Copy,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                ::serde::Serialize,
                ::serde::Deserialize,
            )]
            pub struct [<$entity Id>](pub u32);

            impl From<u32> for [<$entity Id>] {
                fn from(id: u32) -> Self {
                    Self(id)
                }
            }

            impl ::std::fmt::Display for [<$entity Id>] {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl ::std::str::FromStr for [<$entity Id>] {
                type Err = ::std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse().map(Self)
                }
            }
        }
    };
}

pub(crate) use resource_id;
