use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(FavouriteRoute);

/// A route bookmarked by a passenger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavouriteRoute {
    pub favourite_route_id: FavouriteRouteId,
    pub user_id: u32,
    pub route_id: u32,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("user_id", FieldKind::Integer),
    FieldSpec::required("route_id", FieldKind::Integer),
];

impl Resource for FavouriteRoute {
    type Id = FavouriteRouteId;
    const KIND: &'static str = "favourite route";
    const ID_FIELD: &'static str = "favourite_route_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &FavouriteRouteId {
        &self.favourite_route_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("user_id", self.user_id.to_string())
            .with("route_id", self.route_id.to_string())
    }

    fn from_fields(
        favourite_route_id: FavouriteRouteId,
        fields: &FormFields,
    ) -> Result<Self, WorkflowError> {
        Ok(Self {
            favourite_route_id,
            user_id: fields.parse("user_id")?,
            route_id: fields.parse("route_id")?,
        })
    }
}
