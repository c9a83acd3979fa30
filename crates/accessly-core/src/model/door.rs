use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical door controlled by the Access system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub id: String,
    pub name: String,
    /// The hub/floor binding reported by the controller.
    pub device_id: String,
    pub description: Option<String>,
    pub is_locked: bool,
    pub is_online: bool,
    pub battery_level: Option<i64>,
    pub signal_strength: Option<i64>,
    pub firmware_version: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A named group of doors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorGroup {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub door_ids: Vec<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
