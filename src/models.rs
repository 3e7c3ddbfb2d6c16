use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// --- Identity ---

/// Role
///
/// The RBAC field of a user profile. The backend sends it as a plain string; unknown
/// values are kept verbatim so a newer backend cannot break deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Customer,
    BusinessAdmin,
    SuperAdmin,
    Other(String),
}

impl Role {
    pub const CUSTOMER: &'static str = "customer";
    pub const BUSINESS_ADMIN: &'static str = "business-admin";
    pub const SUPER_ADMIN: &'static str = "super-admin";

    pub fn as_str(&self) -> &str {
        match self {
            Role::Customer => Self::CUSTOMER,
            Role::BusinessAdmin => Self::BUSINESS_ADMIN,
            Role::SuperAdmin => Self::SUPER_ADMIN,
            Role::Other(raw) => raw,
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        match raw {
            Self::CUSTOMER => Role::Customer,
            Self::BUSINESS_ADMIN => Role::BusinessAdmin,
            Self::SUPER_ADMIN => Role::SuperAdmin,
            other => Role::Other(other.to_string()),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from(raw.as_str()))
    }
}

/// User
///
/// The cached profile returned by `GET /auth/me`. Fields this client does not model are
/// carried in `extra` so the persisted copy round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct User {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(
        default,
        deserialize_with = "optional_id_from_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub business_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_application_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Backend ids are strings, but numeric ids show up in older rows.
fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn optional_id_from_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

// --- Request Payloads ---

/// LoginRequest
///
/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// RegisterRequest
///
/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// TokenResponse
///
/// Successful login answer. Only the token is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// ResetPasswordRequest
///
/// Body of `POST /auth/reset-password`; the token and email arrive in the reset link's
/// query string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

// --- Outcomes ---

/// AuthOutcome
///
/// Result object returned by the session store. Failures are values, never panics or
/// propagated errors, so pages can render `error` directly.
///
/// Serializes as `{"success":true,<field>:...}` or `{"success":false,"error":"..."}`, where
/// `<field>` comes from the payload's `OutcomePayload` impl: `user` for a profile, `data`
/// for raw backend JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome<T> {
    Success(T),
    Failure { error: String },
}

impl<T> AuthOutcome<T> {
    pub fn failure(error: impl Into<String>) -> Self {
        AuthOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthOutcome::Failure { error } => Some(error),
            AuthOutcome::Success(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            AuthOutcome::Success(value) => Some(value),
            AuthOutcome::Failure { .. } => None,
        }
    }
}

/// OutcomePayload
///
/// Names the key a successful `AuthOutcome` carries its payload under.
pub trait OutcomePayload {
    const FIELD: &'static str;
}

impl OutcomePayload for User {
    const FIELD: &'static str = "user";
}

impl OutcomePayload for Value {
    const FIELD: &'static str = "data";
}

impl<T: Serialize + OutcomePayload> Serialize for AuthOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            AuthOutcome::Success(value) => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry(T::FIELD, value)?;
            }
            AuthOutcome::Failure { error } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
            }
        }
        map.end()
    }
}

// --- Interaction Tracking ---

/// InteractionType
///
/// What the user did. Upper-case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InteractionType {
    View,
    Click,
    Search,
    Compare,
}

/// EntityType
///
/// What the interaction was about. Upper-case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Tire,
    Business,
    Page,
}

/// Interaction
///
/// Body of `POST /governance/interactions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub interaction_type: InteractionType,
    pub entity_type: EntityType,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Interaction {
    pub fn new(
        interaction_type: InteractionType,
        entity_type: EntityType,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            interaction_type,
            entity_type,
            entity_id: entity_id.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
