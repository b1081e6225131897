use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MECHANICS_TABLE: &str = "mechanics";
pub const MECHANIC_PROFILES_TABLE: &str = "mechanic_profiles";

/// A mechanic row from either `mechanic_profiles` or `mechanics`. Fields the
/// service reads are typed; everything else is carried in `extra` so rows
/// serialize back out unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MechanicProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Specialties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MechanicProfile {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.current_latitude?, self.current_longitude?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Specialties {
    List(Vec<String>),
    Text(String),
}

impl Specialties {
    pub fn to_display(&self) -> String {
        match self {
            Specialties::List(items) => items.join(", "),
            Specialties::Text(text) => text.clone(),
        }
    }

    /// Case-insensitive substring match against any listed specialty.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match self {
            Specialties::List(items) => items.iter().any(|s| s.to_lowercase().contains(&needle)),
            Specialties::Text(text) => text.to_lowercase().contains(&needle),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_jobs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_min: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
