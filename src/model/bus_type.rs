use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(BusType);

/// A category of bus (e.g. "Express", "Night").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusType {
    pub bus_type_id: BusTypeId,
    pub type_name: String,
    pub description: Option<String>,
    /// 1 active, 0 retired.
    pub status: u8,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("type_name", FieldKind::Text),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::optional("status", FieldKind::Integer).with_default("1"),
];

impl Resource for BusType {
    type Id = BusTypeId;
    const KIND: &'static str = "bus type";
    const ID_FIELD: &'static str = "bus_type_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &BusTypeId {
        &self.bus_type_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("type_name", &self.type_name)
            .with("description", self.description.clone().unwrap_or_default())
            .with("status", self.status.to_string())
    }

    fn from_fields(bus_type_id: BusTypeId, fields: &FormFields) -> Result<Self, WorkflowError> {
        Ok(Self {
            bus_type_id,
            type_name: fields.text("type_name")?,
            description: fields.optional_text("description"),
            status: fields.parse_optional("status")?.unwrap_or(1),
        })
    }
}
