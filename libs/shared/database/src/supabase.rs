use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentUpdate};
use shared_models::hospital::{Hospital, HospitalFilter};
use shared_models::user::{Role, User};

use crate::store::{AppointmentStore, DirectoryStore, StoreError, StoreResult};

const HOSPITALS: &str = "/rest/v1/hospitals";
const USERS: &str = "/rest/v1/users";
const PATIENTS: &str = "/rest/v1/patients";

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.anon_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers();
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(anyhow::Error::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.map_err(anyhow::Error::from)?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::DuplicateKey(error_text),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    anyhow!("Authentication error: {}", error_text).into()
                }
                _ => anyhow!("API error ({}): {}", status, error_text).into(),
            });
        }

        let data = response.json::<T>().await.map_err(anyhow::Error::from)?;
        Ok(data)
    }

    /// Writes that should echo the affected rows back.
    async fn mutate<T>(&self, method: Method, path: &str, body: Option<Value>) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        self.request_with_headers(method, path, body, Some(headers)).await
    }
}

/// PostgREST-backed store. Columns mirror the camelCase JSON field names and
/// the catalogs live in JSON columns on `hospitals`.
pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: SupabaseClient::new(config),
        }
    }
}

fn eq(column: &str, value: impl std::fmt::Display) -> String {
    format!("{}=eq.{}", column, urlencoding::encode(&value.to_string()))
}

fn with_query(base: &str, mut parts: Vec<String>) -> String {
    parts.retain(|p| !p.is_empty());
    if parts.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, parts.join("&"))
    }
}

const SEARCH_COLUMNS: [&str; 6] = [
    "name",
    "surgeryType",
    "healthIssue",
    "address",
    "mobileNo",
    "hospitalName",
];

pub(crate) fn appointment_query(filter: &AppointmentFilter) -> Vec<String> {
    let mut parts = Vec::new();

    if let Some(id) = filter.hospital_id {
        parts.push(eq("hospitalId", id));
    }
    if let Some(id) = filter.booked_by {
        parts.push(eq("bookedByUser", id));
    }
    if let Some(done) = filter.surgery_done {
        parts.push(eq("surgeryDone", done));
    }
    if let Some(status) = filter.approval {
        parts.push(eq("approvedForSurgery", status));
    }
    if let Some(from) = filter.date_from {
        parts.push(format!("date=gte.{}", urlencoding::encode(&from.to_rfc3339())));
    }
    if let Some(to) = filter.date_to {
        parts.push(format!("date=lte.{}", urlencoding::encode(&to.to_rfc3339())));
    }
    if let Some(text) = filter.search.as_deref().filter(|t| !t.is_empty()) {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        let clauses: Vec<String> = SEARCH_COLUMNS
            .iter()
            .map(|col| format!("{}.ilike.\"*{}*\"", col, escaped))
            .collect();
        parts.push(format!("or={}", urlencoding::encode(&format!("({})", clauses.join(",")))));
    }

    parts
}

fn update_body(update: &AppointmentUpdate) -> Value {
    match update {
        AppointmentUpdate::Comments(comments) => json!({ "comments": comments.trim() }),
        AppointmentUpdate::Approval(status) => json!({ "approvedForSurgery": status }),
        AppointmentUpdate::Completion { done, done_by } => {
            let mut body = json!({ "surgeryDone": done });
            if let Some(by) = done_by.as_deref().filter(|b| !b.is_empty()) {
                body["surgeryDoneBy"] = json!(by);
            }
            body
        }
    }
}

#[async_trait]
impl DirectoryStore for SupabaseStore {
    async fn insert_hospital(&self, hospital: Hospital) -> StoreResult<Hospital> {
        let rows: Vec<Hospital> = self
            .client
            .mutate(Method::POST, HOSPITALS, Some(json!(hospital)))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create hospital").into())
    }

    async fn get_hospital(&self, id: Uuid) -> StoreResult<Option<Hospital>> {
        let path = with_query(HOSPITALS, vec![eq("id", id)]);
        let rows: Vec<Hospital> = self.client.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_hospital_by_email(&self, email: &str) -> StoreResult<Option<Hospital>> {
        let path = with_query(HOSPITALS, vec![eq("email", email)]);
        let rows: Vec<Hospital> = self.client.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    // PostgREST cannot substring-match inside the JSON catalog columns, so the
    // catalog predicates run here.
    async fn list_hospitals(&self, filter: &HospitalFilter) -> StoreResult<Vec<Hospital>> {
        let path = with_query(HOSPITALS, vec!["order=createdAt.desc".to_string()]);
        let rows: Vec<Hospital> = self.client.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().filter(|h| filter.matches(h)).collect())
    }

    async fn replace_hospital(&self, hospital: Hospital) -> StoreResult<Option<Hospital>> {
        let path = with_query(HOSPITALS, vec![eq("id", hospital.id)]);
        let rows: Vec<Hospital> = self
            .client
            .mutate(Method::PATCH, &path, Some(json!(hospital)))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_hospital(&self, id: Uuid) -> StoreResult<bool> {
        let path = with_query(HOSPITALS, vec![eq("id", id)]);
        let rows: Vec<Value> = self.client.mutate(Method::DELETE, &path, None).await?;
        Ok(!rows.is_empty())
    }

    async fn count_hospitals(&self) -> StoreResult<u64> {
        let path = with_query(HOSPITALS, vec!["select=id".to_string()]);
        let rows: Vec<Value> = self.client.request(Method::GET, &path, None).await?;
        Ok(rows.len() as u64)
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let rows: Vec<User> = self
            .client
            .mutate(Method::POST, USERS, Some(json!(user)))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create user").into())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let path = with_query(USERS, vec![eq("email", email)]);
        let rows: Vec<User> = self.client.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let list: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let path = with_query(
            USERS,
            vec![
                format!("id=in.({})", list.join(",")),
                "order=createdAt.desc".to_string(),
            ],
        );
        self.client.request(Method::GET, &path, None).await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let path = with_query(USERS, vec!["order=createdAt.desc".to_string()]);
        self.client.request(Method::GET, &path, None).await
    }

    async fn count_users(&self, role: Option<Role>) -> StoreResult<u64> {
        let mut parts = vec!["select=id".to_string()];
        if let Some(role) = role {
            parts.push(eq("role", role));
        }
        let rows: Vec<Value> = self
            .client
            .request(Method::GET, &with_query(USERS, parts), None)
            .await?;
        Ok(rows.len() as u64)
    }
}

#[async_trait]
impl AppointmentStore for SupabaseStore {
    async fn insert_appointment(&self, appointment: Appointment) -> StoreResult<Appointment> {
        let rows: Vec<Appointment> = self
            .client
            .mutate(Method::POST, PATIENTS, Some(json!(appointment)))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create appointment").into())
    }

    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        let path = with_query(PATIENTS, vec![eq("id", id)]);
        let rows: Vec<Appointment> = self.client.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let mut parts = appointment_query(filter);
        parts.push("order=createdAt.desc".to_string());
        self.client
            .request(Method::GET, &with_query(PATIENTS, parts), None)
            .await
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        hospital_id: Uuid,
        update: &AppointmentUpdate,
    ) -> StoreResult<Option<Appointment>> {
        let path = with_query(PATIENTS, vec![eq("id", id), eq("hospitalId", hospital_id)]);
        let rows: Vec<Appointment> = self
            .client
            .mutate(Method::PATCH, &path, Some(update_body(update)))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_appointments(&self, filter: &AppointmentFilter) -> StoreResult<u64> {
        let parts = appointment_query(filter);
        // PostgREST refuses unfiltered deletes; so do we.
        if parts.is_empty() {
            return Err(anyhow!("Refusing to delete appointments without a filter").into());
        }
        let rows: Vec<Value> = self
            .client
            .mutate(Method::DELETE, &with_query(PATIENTS, parts), None)
            .await?;
        Ok(rows.len() as u64)
    }

    async fn count_appointments(&self, filter: &AppointmentFilter) -> StoreResult<u64> {
        let mut parts = vec!["select=id".to_string()];
        parts.extend(appointment_query(filter));
        let rows: Vec<Value> = self
            .client
            .request(Method::GET, &with_query(PATIENTS, parts), None)
            .await?;
        Ok(rows.len() as u64)
    }
}
