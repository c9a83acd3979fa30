// ── Service facade ──
//
// Typed operations over the raw request pipeline. Each method issues one
// call through `ApiClient`, unwraps the `data` envelope, and maps the
// payload through `convert`. This layer holds no state and caches nothing;
// it is a thin consumer of the transport core.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use tracing::debug;

use accessly_api::{ApiClient, ClientConfig, EventStream, JsonMap, StreamConfig};

use crate::convert;
use crate::error::CoreError;
use crate::model::{
    AccessEvent, AccessPolicy, Device, Door, DoorGroup, HolidayGroup, NfcCard, Schedule,
    SystemLog, User, UserRole, Visitor,
};

// ── Request payloads ─────────────────────────────────────────────────

/// Fields for creating a user.
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub access_policy_ids: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CreateUserRequest {
    fn payload(&self) -> Value {
        let mut data = Map::new();
        data.insert("first_name".into(), json!(self.first_name));
        data.insert("last_name".into(), json!(self.last_name));
        data.insert("role".into(), json!(self.role.as_str()));
        data.insert("is_active".into(), json!(true));

        if let Some(ref email) = self.email {
            data.insert("email".into(), json!(email));
        }
        if let Some(ref phone) = self.phone {
            data.insert("phone".into(), json!(phone));
        }
        if !self.access_policy_ids.is_empty() {
            data.insert("access_policy_ids".into(), json!(self.access_policy_ids));
        }
        if let Some(start) = self.start_date {
            data.insert("start_date".into(), json!(start.to_rfc3339()));
        }
        if let Some(end) = self.end_date {
            data.insert("end_date".into(), json!(end.to_rfc3339()));
        }

        Value::Object(data)
    }
}

/// Fields for creating a visitor. The access window is mandatory.
#[derive(Debug, Clone)]
pub struct CreateVisitorRequest {
    pub first_name: String,
    pub last_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub access_policy_ids: Vec<String>,
    pub sponsor_user_id: Option<String>,
    pub notes: Option<String>,
}

impl CreateVisitorRequest {
    fn payload(&self) -> Value {
        let mut data = Map::new();
        data.insert("first_name".into(), json!(self.first_name));
        data.insert("last_name".into(), json!(self.last_name));
        data.insert("start_date".into(), json!(self.start_date.to_rfc3339()));
        data.insert("end_date".into(), json!(self.end_date.to_rfc3339()));
        data.insert("is_active".into(), json!(true));

        if let Some(ref email) = self.email {
            data.insert("email".into(), json!(email));
        }
        if let Some(ref phone) = self.phone {
            data.insert("phone".into(), json!(phone));
        }
        if !self.access_policy_ids.is_empty() {
            data.insert("access_policy_ids".into(), json!(self.access_policy_ids));
        }
        if let Some(ref sponsor) = self.sponsor_user_id {
            data.insert("sponsor_user_id".into(), json!(sponsor));
        }
        if let Some(ref notes) = self.notes {
            data.insert("notes".into(), json!(notes));
        }

        Value::Object(data)
    }
}

/// Partial update for a visitor: only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct UpdateVisitorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub access_policy_ids: Option<Vec<String>>,
    pub sponsor_user_id: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateVisitorRequest {
    fn payload(&self) -> Value {
        let mut data = Map::new();

        if let Some(ref v) = self.first_name {
            data.insert("first_name".into(), json!(v));
        }
        if let Some(ref v) = self.last_name {
            data.insert("last_name".into(), json!(v));
        }
        if let Some(ref v) = self.email {
            data.insert("email".into(), json!(v));
        }
        if let Some(ref v) = self.phone {
            data.insert("phone".into(), json!(v));
        }
        if let Some(v) = self.start_date {
            data.insert("start_date".into(), json!(v.to_rfc3339()));
        }
        if let Some(v) = self.end_date {
            data.insert("end_date".into(), json!(v.to_rfc3339()));
        }
        if let Some(ref v) = self.access_policy_ids {
            data.insert("access_policy_ids".into(), json!(v));
        }
        if let Some(ref v) = self.sponsor_user_id {
            data.insert("sponsor_user_id".into(), json!(v));
        }
        if let Some(ref v) = self.notes {
            data.insert("notes".into(), json!(v));
        }
        if let Some(v) = self.is_active {
            data.insert("is_active".into(), json!(v));
        }

        Value::Object(data)
    }
}

/// Fields for creating an access policy.
#[derive(Debug, Clone, Default)]
pub struct CreateAccessPolicyRequest {
    pub name: String,
    pub description: Option<String>,
    pub schedule_id: Option<String>,
    pub holiday_group_id: Option<String>,
    pub door_ids: Vec<String>,
    pub door_group_ids: Vec<String>,
}

impl CreateAccessPolicyRequest {
    fn payload(&self) -> Value {
        let mut data = Map::new();
        data.insert("name".into(), json!(self.name));
        data.insert("is_active".into(), json!(true));

        if let Some(ref v) = self.description {
            data.insert("description".into(), json!(v));
        }
        if let Some(ref v) = self.schedule_id {
            data.insert("schedule_id".into(), json!(v));
        }
        if let Some(ref v) = self.holiday_group_id {
            data.insert("holiday_group_id".into(), json!(v));
        }
        if !self.door_ids.is_empty() {
            data.insert("door_ids".into(), json!(self.door_ids));
        }
        if !self.door_group_ids.is_empty() {
            data.insert("door_group_ids".into(), json!(self.door_group_ids));
        }

        Value::Object(data)
    }
}

// ── Envelope helpers ─────────────────────────────────────────────────

fn page_params(limit: u32, offset: u32) -> [(&'static str, String); 2] {
    [("limit", limit.to_string()), ("offset", offset.to_string())]
}

/// The `data` field of a response, required for single-record endpoints.
fn data_field(response: &JsonMap) -> Result<&Value, CoreError> {
    response.get("data").ok_or_else(|| CoreError::Payload {
        message: "response has no 'data' field".into(),
    })
}

/// Map every element of the `data` array; an absent field is an empty list.
fn collect_items<T>(
    response: &JsonMap,
    parse: impl Fn(&Value) -> Result<T, CoreError>,
) -> Result<Vec<T>, CoreError> {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(&parse).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

// ── AccessDirectory ──────────────────────────────────────────────────

/// Typed client for the Access directory: users, visitors, doors, devices,
/// groups, and policies, plus construction of the live event stream.
pub struct AccessDirectory {
    client: ApiClient,
    config: ClientConfig,
}

impl AccessDirectory {
    /// Build a directory client from connection configuration.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// Assemble from an existing `ApiClient` (tests, custom transports).
    pub fn from_parts(client: ApiClient, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// The underlying request client, for raw endpoint access.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The connection configuration this directory was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create the companion event-stream session for this controller.
    ///
    /// The session is independent of the request pipeline; connect and
    /// register handlers on the returned stream.
    pub fn event_stream(&self) -> Result<EventStream, CoreError> {
        let stream_config = StreamConfig::try_from(&self.config)?;
        Ok(EventStream::new(stream_config))
    }

    // ── Users ────────────────────────────────────────────────────────

    pub async fn users(&self, limit: u32, offset: u32) -> Result<Vec<User>, CoreError> {
        let resp = self
            .client
            .get_with_params("/users", &page_params(limit, offset))
            .await?;
        collect_items(&resp, convert::parse_user)
    }

    pub async fn user(&self, user_id: &str) -> Result<User, CoreError> {
        let resp = self.client.get(&format!("/users/{user_id}")).await?;
        convert::parse_user(data_field(&resp)?)
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, CoreError> {
        debug!(first_name = %request.first_name, "creating user");
        let resp = self.client.post("/users", &request.payload()).await?;
        convert::parse_user(data_field(&resp)?)
    }

    // ── Visitors ─────────────────────────────────────────────────────

    pub async fn visitors(&self, limit: u32, offset: u32) -> Result<Vec<Visitor>, CoreError> {
        let resp = self
            .client
            .get_with_params("/visitors", &page_params(limit, offset))
            .await?;
        collect_items(&resp, convert::parse_visitor)
    }

    pub async fn visitor(&self, visitor_id: &str) -> Result<Visitor, CoreError> {
        let resp = self.client.get(&format!("/visitors/{visitor_id}")).await?;
        convert::parse_visitor(data_field(&resp)?)
    }

    pub async fn create_visitor(
        &self,
        request: &CreateVisitorRequest,
    ) -> Result<Visitor, CoreError> {
        debug!(first_name = %request.first_name, "creating visitor");
        let resp = self.client.post("/visitors", &request.payload()).await?;
        convert::parse_visitor(data_field(&resp)?)
    }

    pub async fn update_visitor(
        &self,
        visitor_id: &str,
        request: &UpdateVisitorRequest,
    ) -> Result<Visitor, CoreError> {
        let resp = self
            .client
            .put(&format!("/visitors/{visitor_id}"), &request.payload())
            .await?;
        convert::parse_visitor(data_field(&resp)?)
    }

    pub async fn delete_visitor(&self, visitor_id: &str) -> Result<(), CoreError> {
        self.client
            .delete(&format!("/visitors/{visitor_id}"))
            .await?;
        Ok(())
    }

    /// Assign (or replace) a visitor's PIN code.
    ///
    /// Returns `true` when the controller reports `SUCCESS`.
    pub async fn set_visitor_pin(&self, visitor_id: &str, pin: &str) -> Result<bool, CoreError> {
        let resp = self
            .client
            .put(
                &format!("/visitors/{visitor_id}/pin_codes"),
                &json!({"pin_code": pin}),
            )
            .await?;
        Ok(resp.get("code").and_then(Value::as_str) == Some("SUCCESS"))
    }

    /// Enrol an NFC card for a visitor.
    pub async fn add_visitor_nfc_card(
        &self,
        visitor_id: &str,
        card_number: &str,
        facility_code: Option<&str>,
    ) -> Result<NfcCard, CoreError> {
        let mut body = Map::new();
        body.insert("card_number".into(), json!(card_number));
        if let Some(code) = facility_code {
            body.insert("facility_code".into(), json!(code));
        }

        let resp = self
            .client
            .post(
                &format!("/visitors/{visitor_id}/nfc-cards"),
                &Value::Object(body),
            )
            .await?;
        convert::parse_nfc_card(data_field(&resp)?)
    }

    // ── Doors ────────────────────────────────────────────────────────

    pub async fn doors(&self, limit: u32, offset: u32) -> Result<Vec<Door>, CoreError> {
        let resp = self
            .client
            .get_with_params("/doors", &page_params(limit, offset))
            .await?;
        collect_items(&resp, convert::parse_door)
    }

    pub async fn door(&self, door_id: &str) -> Result<Door, CoreError> {
        let resp = self.client.get(&format!("/doors/{door_id}")).await?;
        convert::parse_door(data_field(&resp)?)
    }

    /// Remote unlock is not exposed by the developer API.
    pub fn unlock_door(&self, _door_id: &str, _duration_secs: u32) -> Result<(), CoreError> {
        Err(CoreError::Unsupported {
            operation: "door unlock",
        })
    }

    /// Remote lock is not exposed by the developer API.
    pub fn lock_door(&self, _door_id: &str) -> Result<(), CoreError> {
        Err(CoreError::Unsupported {
            operation: "door lock",
        })
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn devices(&self, limit: u32, offset: u32) -> Result<Vec<Device>, CoreError> {
        let resp = self
            .client
            .get_with_params("/devices", &page_params(limit, offset))
            .await?;

        // The devices endpoint nests its payload one level deeper than the
        // others: `data` is an array of arrays, one per hub.
        let mut devices = Vec::new();
        if let Some(groups) = resp.get("data").and_then(Value::as_array) {
            for group in groups {
                match group.as_array() {
                    Some(items) => {
                        for item in items {
                            devices.push(convert::parse_device(item)?);
                        }
                    }
                    None => devices.push(convert::parse_device(group)?),
                }
            }
        }
        Ok(devices)
    }

    pub async fn device(&self, device_id: &str) -> Result<Device, CoreError> {
        let resp = self.client.get(&format!("/devices/{device_id}")).await?;
        convert::parse_device(data_field(&resp)?)
    }

    // ── Door groups ──────────────────────────────────────────────────

    pub async fn door_groups(&self, limit: u32, offset: u32) -> Result<Vec<DoorGroup>, CoreError> {
        let resp = self
            .client
            .get_with_params("/door_groups", &page_params(limit, offset))
            .await?;
        collect_items(&resp, convert::parse_door_group)
    }

    pub async fn create_door_group(
        &self,
        name: &str,
        description: Option<&str>,
        door_ids: &[String],
    ) -> Result<DoorGroup, CoreError> {
        let mut body = Map::new();
        body.insert("name".into(), json!(name));
        body.insert("is_active".into(), json!(true));
        if let Some(description) = description {
            body.insert("description".into(), json!(description));
        }
        if !door_ids.is_empty() {
            body.insert("door_ids".into(), json!(door_ids));
        }

        let resp = self
            .client
            .post("/door_groups", &Value::Object(body))
            .await?;
        convert::parse_door_group(data_field(&resp)?)
    }

    // ── Access policies ──────────────────────────────────────────────

    pub async fn access_policies(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<AccessPolicy>, CoreError> {
        let resp = self
            .client
            .get_with_params("/access_policies", &page_params(limit, offset))
            .await?;
        collect_items(&resp, convert::parse_access_policy)
    }

    pub async fn access_policy(&self, policy_id: &str) -> Result<AccessPolicy, CoreError> {
        let resp = self
            .client
            .get(&format!("/access-policies/{policy_id}"))
            .await?;
        convert::parse_access_policy(data_field(&resp)?)
    }

    pub async fn create_access_policy(
        &self,
        request: &CreateAccessPolicyRequest,
    ) -> Result<AccessPolicy, CoreError> {
        let resp = self
            .client
            .post("/access_policies", &request.payload())
            .await?;
        convert::parse_access_policy(data_field(&resp)?)
    }

    // ── Endpoints absent from the developer API ──────────────────────
    //
    // These fail locally, without a network round trip, so callers get a
    // stable error instead of a controller-dependent 404.

    pub fn schedules(&self) -> Result<Vec<Schedule>, CoreError> {
        Err(CoreError::Unsupported {
            operation: "schedules",
        })
    }

    pub fn holiday_groups(&self) -> Result<Vec<HolidayGroup>, CoreError> {
        Err(CoreError::Unsupported {
            operation: "holiday groups",
        })
    }

    pub fn access_events(&self) -> Result<Vec<AccessEvent>, CoreError> {
        Err(CoreError::Unsupported {
            operation: "historical access events",
        })
    }

    pub fn system_logs(&self) -> Result<Vec<SystemLog>, CoreError> {
        Err(CoreError::Unsupported {
            operation: "system logs",
        })
    }
}
