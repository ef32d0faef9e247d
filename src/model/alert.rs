use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(Alert);

/// An operational alert raised against a bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: AlertId,
    pub alert_type: String,
    pub description: String,
    pub bus_number: Option<String>,
    pub user_id: Option<u32>,
    pub avg_passengers: Option<u32>,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("alert_type", FieldKind::Text),
    FieldSpec::required("description", FieldKind::Text),
    FieldSpec::optional("bus_number", FieldKind::Text),
    FieldSpec::optional("user_id", FieldKind::Integer),
    FieldSpec::optional("avg_passengers", FieldKind::Integer),
];

impl Resource for Alert {
    type Id = AlertId;
    const KIND: &'static str = "alert";
    const ID_FIELD: &'static str = "alert_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &AlertId {
        &self.alert_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("alert_type", &self.alert_type)
            .with("description", &self.description)
            .with("bus_number", self.bus_number.clone().unwrap_or_default())
            .with("user_id", optional_number(self.user_id))
            .with("avg_passengers", optional_number(self.avg_passengers))
    }

    fn from_fields(alert_id: AlertId, fields: &FormFields) -> Result<Self, WorkflowError> {
        Ok(Self {
            alert_id,
            alert_type: fields.text("alert_type")?,
            description: fields.text("description")?,
            bus_number: fields.optional_text("bus_number"),
            user_id: fields.parse_optional("user_id")?,
            avg_passengers: fields.parse_optional("avg_passengers")?,
        })
    }
}

fn optional_number(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
