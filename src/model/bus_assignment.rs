use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(BusAssignment);

/// A driver or conductor assigned to a bus on a route for one shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusAssignment {
    pub assignment_id: BusAssignmentId,
    pub bus_id: u32,
    pub user_id: u32,
    pub route_id: u32,
    pub assigned_place: String,
    /// `YYYY-MM-DD`, as entered.
    pub assigned_date: String,
    /// `HH:MM`, as entered.
    pub assigned_time: String,
    pub status: u8,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("bus_id", FieldKind::Integer),
    FieldSpec::required("user_id", FieldKind::Integer),
    FieldSpec::required("route_id", FieldKind::Integer),
    FieldSpec::required("assigned_place", FieldKind::Text),
    FieldSpec::required("assigned_date", FieldKind::Date),
    FieldSpec::required("assigned_time", FieldKind::Time),
    FieldSpec::optional("status", FieldKind::Integer).with_default("1"),
];

impl Resource for BusAssignment {
    type Id = BusAssignmentId;
    const KIND: &'static str = "bus assignment";
    const ID_FIELD: &'static str = "assignment_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &BusAssignmentId {
        &self.assignment_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("bus_id", self.bus_id.to_string())
            .with("user_id", self.user_id.to_string())
            .with("route_id", self.route_id.to_string())
            .with("assigned_place", &self.assigned_place)
            .with("assigned_date", &self.assigned_date)
            .with("assigned_time", &self.assigned_time)
            .with("status", self.status.to_string())
    }

    fn from_fields(
        assignment_id: BusAssignmentId,
        fields: &FormFields,
    ) -> Result<Self, WorkflowError> {
        Ok(Self {
            assignment_id,
            bus_id: fields.parse("bus_id")?,
            user_id: fields.parse("user_id")?,
            route_id: fields.parse("route_id")?,
            assigned_place: fields.text("assigned_place")?,
            assigned_date: fields.text("assigned_date")?,
            assigned_time: fields.text("assigned_time")?,
            status: fields.parse_optional("status")?.unwrap_or(1),
        })
    }
}
