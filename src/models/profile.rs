use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const USERS_TABLE: &str = "users";

/// Partial update for a `mechanic_profiles` row. Absent fields are left alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanicProfileUpdate {
    #[serde(skip_serializing)]
    pub mechanic_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mobile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Partial update for a `users` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfileUpdate {
    #[serde(skip_serializing)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// The columns an update actually sets, without the row key.
pub fn changed_fields<T: Serialize>(update: &T) -> anyhow::Result<Map<String, Value>> {
    match serde_json::to_value(update)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("profile update serialized to non-object: {other}"),
    }
}
