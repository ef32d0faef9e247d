use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(Bus);

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub bus_id: BusId,
    pub bus_number: String,
    pub seat_capacity: u32,
    pub route_id: u32,
    pub status: String,
}

impl Bus {
    pub fn new(
        bus_id: BusId,
        bus_number: impl Into<String>,
        seat_capacity: u32,
        route_id: u32,
        status: impl Into<String>,
    ) -> Self {
        Self {
            bus_id,
            bus_number: bus_number.into(),
            seat_capacity,
            route_id,
            status: status.into(),
        }
    }
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("bus_number", FieldKind::Text),
    FieldSpec::required("seat_capacity", FieldKind::Integer),
    FieldSpec::required("route_id", FieldKind::Integer),
    FieldSpec::optional("status", FieldKind::Text).with_default("active"),
];

impl Resource for Bus {
    type Id = BusId;
    const KIND: &'static str = "bus";
    const ID_FIELD: &'static str = "bus_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &BusId {
        &self.bus_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("bus_number", &self.bus_number)
            .with("seat_capacity", self.seat_capacity.to_string())
            .with("route_id", self.route_id.to_string())
            .with("status", &self.status)
    }

    fn from_fields(bus_id: BusId, fields: &FormFields) -> Result<Self, WorkflowError> {
        Ok(Self {
            bus_id,
            bus_number: fields.text("bus_number")?,
            seat_capacity: fields.parse("seat_capacity")?,
            route_id: fields.parse("route_id")?,
            status: fields
                .optional_text("status")
                .unwrap_or_else(|| "active".to_string()),
        })
    }
}
