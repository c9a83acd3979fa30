use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An access policy binding doors/door-groups to a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub schedule_id: Option<String>,
    pub holiday_group_id: Option<String>,
    pub door_ids: Vec<String>,
    pub door_group_ids: Vec<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A weekly access schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Raw time-range definitions as the controller reports them.
    pub time_ranges: Vec<Value>,
    /// Days of week, 0 = Sunday through 6 = Saturday.
    pub days_of_week: Vec<u8>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Holiday exclusions applied on top of a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayGroup {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub holidays: Vec<Value>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
