//! Health-tracking value records.
//!
//! Water, meals, and platform health samples are plain records with no
//! behavior of their own; they are exchanged with the injected
//! [`HealthStore`](crate::store::HealthStore). Metrics form a closed
//! variant family so consumers can match exhaustively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::UserId;

/// A single logged water intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterIntake {
    pub id: String,
    pub user_id: UserId,
    pub amount_ml: u32,
    pub at: DateTime<Utc>,
    /// Where the record came from ("manual", "health_api", ...).
    #[serde(default)]
    pub source: String,
}

/// A single logged meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub user_id: UserId,
    pub name: String,
    pub calories: Option<u32>,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub source: String,
}

/// One reading from the platform health API. Each variant carries only its
/// own fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthMetric {
    Steps { count: u64 },
    HeartRate { bpm: u16 },
    Sleep { minutes: u32 },
    Weight { grams: u32 },
}

impl HealthMetric {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Steps { .. } => "steps",
            Self::HeartRate { .. } => "heart_rate",
            Self::Sleep { .. } => "sleep",
            Self::Weight { .. } => "weight",
        }
    }
}

/// A timestamped metric reading for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSample {
    pub id: String,
    pub user_id: UserId,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub metric: HealthMetric,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_kinds() {
        assert_eq!(HealthMetric::Steps { count: 100 }.kind(), "steps");
        assert_eq!(HealthMetric::HeartRate { bpm: 60 }.kind(), "heart_rate");
        assert_eq!(HealthMetric::Sleep { minutes: 480 }.kind(), "sleep");
        assert_eq!(HealthMetric::Weight { grams: 70_000 }.kind(), "weight");
    }

    #[test]
    fn metric_serializes_with_kind_tag() {
        let json = serde_json::to_value(HealthMetric::Steps { count: 8000 }).unwrap();
        assert_eq!(json["kind"], "steps");
        assert_eq!(json["count"], 8000);
    }
}
