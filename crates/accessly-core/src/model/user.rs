use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of an account in the Access system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    Visitor,
}

impl UserRole {
    /// Parse the vendor's role string, defaulting to `User` for anything
    /// unrecognized.
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "admin" => Self::Admin,
            "visitor" => Self::Visitor,
            _ => Self::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Visitor => "visitor",
        }
    }
}

/// NFC card credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NfcCard {
    pub id: String,
    pub card_number: String,
    pub facility_code: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// PIN code credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinCode {
    pub id: String,
    /// Masked (`****`) when the controller withholds the digits.
    pub pin: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Touch Pass credential (smartphone-based access).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchPass {
    pub id: String,
    pub device_id: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub access_policy_ids: Vec<String>,
    pub nfc_cards: Vec<NfcCard>,
    pub pin_codes: Vec<PinCode>,
    pub touch_passes: Vec<TouchPass>,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// The user's full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
