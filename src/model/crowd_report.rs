use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(CrowdReport);

/// A passenger-count observation for a bus on a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdReport {
    pub report_id: CrowdReportId,
    pub bus_id: u32,
    pub trip_id: u32,
    pub current_count: u32,
    /// `Low`, `Medium` or `High`.
    pub crowd_status: String,
}

const CROWD_LEVELS: &[&str] = &["Low", "Medium", "High"];

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("bus_id", FieldKind::Integer),
    FieldSpec::required("trip_id", FieldKind::Integer),
    FieldSpec::required("current_count", FieldKind::Integer),
    FieldSpec::required("crowd_status", FieldKind::Text).with_default("Low"),
];

impl Resource for CrowdReport {
    type Id = CrowdReportId;
    const KIND: &'static str = "crowd report";
    const ID_FIELD: &'static str = "report_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &CrowdReportId {
        &self.report_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("bus_id", self.bus_id.to_string())
            .with("trip_id", self.trip_id.to_string())
            .with("current_count", self.current_count.to_string())
            .with("crowd_status", &self.crowd_status)
    }

    fn from_fields(report_id: CrowdReportId, fields: &FormFields) -> Result<Self, WorkflowError> {
        let crowd_status = fields.text("crowd_status")?;
        if !CROWD_LEVELS.contains(&crowd_status.as_str()) {
            return Err(WorkflowError::validation(format!(
                "crowd_status: expected one of {}, got '{crowd_status}'",
                CROWD_LEVELS.join(", ")
            )));
        }
        Ok(Self {
            report_id,
            bus_id: fields.parse("bus_id")?,
            trip_id: fields.parse("trip_id")?,
            current_count: fields.parse("current_count")?,
            crowd_status,
        })
    }
}
