use crate::framework::{resource_id, FieldKind, FieldSpec, FormFields, Resource, WorkflowError};
use serde::{Deserialize, Serialize};

resource_id!(User);

/// A console or app account.
///
/// The password is write-only: it is submitted with the form but never returned, so a
/// loaded edit form always shows it blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role_name: String,
}

impl User {
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            phone: None,
            role_name: role_name.into(),
        }
    }
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text),
    FieldSpec::required("email", FieldKind::Text),
    FieldSpec::optional("password", FieldKind::Text),
    FieldSpec::optional("phone", FieldKind::Text),
    FieldSpec::required("role_name", FieldKind::Text),
];

impl Resource for User {
    type Id = UserId;
    const KIND: &'static str = "user";
    const ID_FIELD: &'static str = "user_id";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn id(&self) -> &UserId {
        &self.user_id
    }

    fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("name", &self.name)
            .with("email", &self.email)
            .with("password", "")
            .with("phone", self.phone.clone().unwrap_or_default())
            .with("role_name", &self.role_name)
    }

    fn from_fields(user_id: UserId, fields: &FormFields) -> Result<Self, WorkflowError> {
        let email = fields.text("email")?;
        if !email.contains('@') {
            return Err(WorkflowError::validation(format!("email: invalid address '{email}'")));
        }
        Ok(Self {
            user_id,
            name: fields.text("name")?,
            email,
            phone: fields.optional_text("phone"),
            role_name: fields.text("role_name")?,
        })
    }
}
