use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hardware classes in the Access system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    DoorReader,
    DoorLock,
    Controller,
    AccessHub,
    Camera,
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoorReader => "door_reader",
            Self::DoorLock => "door_lock",
            Self::Controller => "controller",
            Self::AccessHub => "access_hub",
            Self::Camera => "camera",
        }
    }
}

/// An Access device (reader, hub, camera).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub mac_address: String,
    pub ip_address: Option<String>,
    pub firmware_version: Option<String>,
    pub is_online: bool,
    pub battery_level: Option<i64>,
    pub signal_strength: Option<i64>,
    pub location: Option<String>,
    /// For readers/locks, the door they are mounted on.
    pub door_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
