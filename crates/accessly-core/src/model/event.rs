use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credential kinds that can trigger an access event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    NfcCard,
    PinCode,
    TouchPass,
    QrCode,
}

impl CredentialType {
    /// Parse the vendor's credential-type string; unknown values are `None`.
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw {
            "nfc_card" => Some(Self::NfcCard),
            "pin_code" => Some(Self::PinCode),
            "touch_pass" => Some(Self::TouchPass),
            "qr_code" => Some(Self::QrCode),
            _ => None,
        }
    }
}

/// One entry in the access event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub door_id: String,
    pub device_id: String,
    /// "granted", "denied", ...
    pub result: String,
    pub user_id: Option<String>,
    pub visitor_id: Option<String>,
    pub credential_type: Option<CredentialType>,
    pub credential_id: Option<String>,
    pub reason: Option<String>,
    pub ip_address: Option<String>,
}

/// One entry in the system log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// "info", "warning", "error"
    pub level: String,
    pub category: String,
    pub message: String,
    pub details: Option<Value>,
    pub device_id: Option<String>,
    pub user_id: Option<String>,
}
