use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(Feedback);

/// A passenger's rating of a bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: FeedbackId,
    pub user_id: u32,
    pub bus_id: u32,
    pub comment: String,
    /// 0 to 5 stars.
    pub rating: u8,
}

const MAX_RATING: u8 = 5;

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("user_id", FieldKind::Integer),
    FieldSpec::required("bus_id", FieldKind::Integer),
    FieldSpec::optional("comment", FieldKind::Text),
    FieldSpec::required("rating", FieldKind::Integer).with_default("0"),
];

impl Resource for Feedback {
    type Id = FeedbackId;
    const KIND: &'static str = "feedback";
    const ID_FIELD: &'static str = "feedback_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &FeedbackId {
        &self.feedback_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("user_id", self.user_id.to_string())
            .with("bus_id", self.bus_id.to_string())
            .with("comment", &self.comment)
            .with("rating", self.rating.to_string())
    }

    fn from_fields(feedback_id: FeedbackId, fields: &FormFields) -> Result<Self, WorkflowError> {
        let rating: u8 = fields.parse("rating")?;
        if rating > MAX_RATING {
            return Err(WorkflowError::validation(format!(
                "rating: must be between 0 and {MAX_RATING}"
            )));
        }
        Ok(Self {
            feedback_id,
            user_id: fields.parse("user_id")?,
            bus_id: fields.parse("bus_id")?,
            comment: fields.optional_text("comment").unwrap_or_default(),
            rating,
        })
    }
}
