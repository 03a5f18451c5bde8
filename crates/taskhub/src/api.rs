//! Backend REST API.
//!
//! [`DashboardApi`] is the seam the rest of the crate talks to; [`HttpApi`]
//! implements it over reqwest. Collections come back already normalized by
//! [`crate::ingest`], so nothing past this module sees backend field aliases.

use crate::error::{ApiError, ApiResult};
use crate::ingest;
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde_json::Value;
use taskhub_types::{
    CalendarEvent, ErrorResponse, EventInput, MemberRequest, Project, ProjectInput,
    RoleUpdateRequest, SignInRequest, SignUpRequest, SocialLoginRequest, Team, TeamInput, User,
    UserUpdate,
};
use uuid::Uuid;

/// Operations the dashboard needs from the backend.
///
/// Writes return nothing the caller relies on; the cache re-fetches after a
/// successful write. Auth and profile calls return the raw user record for
/// the session to normalize.
#[allow(async_fn_in_trait)]
pub trait DashboardApi {
    async fn list_projects(&self) -> ApiResult<Vec<Project>>;
    async fn create_project(&self, input: &ProjectInput) -> ApiResult<()>;
    async fn update_project(&self, id: Uuid, input: &ProjectInput) -> ApiResult<()>;
    async fn delete_project(&self, id: Uuid) -> ApiResult<()>;

    async fn list_events(&self) -> ApiResult<Vec<CalendarEvent>>;
    async fn create_event(&self, input: &EventInput) -> ApiResult<()>;
    async fn update_event(&self, id: Uuid, input: &EventInput) -> ApiResult<()>;
    async fn delete_event(&self, id: Uuid) -> ApiResult<()>;

    async fn list_teams(&self) -> ApiResult<Vec<Team>>;
    async fn create_team(&self, input: &TeamInput) -> ApiResult<()>;
    async fn add_team_member(&self, team_id: Uuid, request: &MemberRequest) -> ApiResult<()>;
    async fn remove_team_member(&self, team_id: Uuid, request: &MemberRequest) -> ApiResult<()>;

    async fn list_users(&self) -> ApiResult<Vec<User>>;
    async fn update_user(&self, id: Uuid, update: &UserUpdate) -> ApiResult<Value>;
    async fn update_user_role(&self, id: Uuid, request: &RoleUpdateRequest) -> ApiResult<()>;

    async fn sign_in(&self, request: &SignInRequest) -> ApiResult<Value>;
    async fn sign_up(&self, request: &SignUpRequest) -> ApiResult<Value>;
    async fn social_login(&self, request: &SocialLoginRequest) -> ApiResult<Value>;
}

/// reqwest-backed [`DashboardApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<Value> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, url, e);
            ApiError::from(e)
        })?;
        let response = Self::check(response).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Turn a non-success response into [`ApiError::Status`], preferring the
    /// backend's `message` (or `error`) field over the raw body.
    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .filter(|m| !m.is_empty());
        let message = match parsed {
            Some(message) => message,
            None if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            None => body,
        };

        tracing::warn!("Backend answered {}: {}", status, message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn list(&self, path: &str) -> ApiResult<Vec<Value>> {
        let body = self.request::<()>(Method::GET, path, None).await?;
        list_items(path, body)
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> ApiResult<()> {
        self.request(method, path, Some(body)).await.map(|_| ())
    }
}

fn list_items(path: &str, body: Value) -> ApiResult<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::UnexpectedResponse(format!(
            "expected a list from {}, got {}",
            path,
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl DashboardApi for HttpApi {
    async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        Ok(ingest::projects(&self.list("projects").await?))
    }

    async fn create_project(&self, input: &ProjectInput) -> ApiResult<()> {
        self.send(Method::POST, "projects", input).await
    }

    async fn update_project(&self, id: Uuid, input: &ProjectInput) -> ApiResult<()> {
        self.send(Method::PUT, &format!("projects/{}", id), input).await
    }

    async fn delete_project(&self, id: Uuid) -> ApiResult<()> {
        self.request::<()>(Method::DELETE, &format!("projects/{}", id), None)
            .await
            .map(|_| ())
    }

    async fn list_events(&self) -> ApiResult<Vec<CalendarEvent>> {
        Ok(ingest::events(&self.list("events").await?))
    }

    async fn create_event(&self, input: &EventInput) -> ApiResult<()> {
        self.send(Method::POST, "events", input).await
    }

    async fn update_event(&self, id: Uuid, input: &EventInput) -> ApiResult<()> {
        self.send(Method::PUT, &format!("events/{}", id), input).await
    }

    async fn delete_event(&self, id: Uuid) -> ApiResult<()> {
        self.request::<()>(Method::DELETE, &format!("events/{}", id), None)
            .await
            .map(|_| ())
    }

    async fn list_teams(&self) -> ApiResult<Vec<Team>> {
        Ok(ingest::teams(&self.list("teams").await?))
    }

    async fn create_team(&self, input: &TeamInput) -> ApiResult<()> {
        self.send(Method::POST, "teams", input).await
    }

    async fn add_team_member(&self, team_id: Uuid, request: &MemberRequest) -> ApiResult<()> {
        self.send(Method::POST, &format!("teams/{}/members", team_id), request)
            .await
    }

    async fn remove_team_member(&self, team_id: Uuid, request: &MemberRequest) -> ApiResult<()> {
        self.send(Method::DELETE, &format!("teams/{}/members", team_id), request)
            .await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(ingest::users(&self.list("users").await?))
    }

    async fn update_user(&self, id: Uuid, update: &UserUpdate) -> ApiResult<Value> {
        self.request(Method::PUT, &format!("users/{}", id), Some(update))
            .await
    }

    async fn update_user_role(&self, id: Uuid, request: &RoleUpdateRequest) -> ApiResult<()> {
        self.send(Method::PUT, &format!("users/{}/role", id), request)
            .await
    }

    async fn sign_in(&self, request: &SignInRequest) -> ApiResult<Value> {
        self.request(Method::POST, "auth/signin", Some(request)).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> ApiResult<Value> {
        self.request(Method::POST, "auth/signup", Some(request)).await
    }

    async fn social_login(&self, request: &SocialLoginRequest) -> ApiResult<Value> {
        self.request(Method::POST, "auth/social-login", Some(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = HttpApi::new("http://localhost:8080/api/");
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.url("events"), "http://localhost:8080/api/events");
        assert_eq!(api.url("/teams/1/members"), "http://localhost:8080/api/teams/1/members");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(kind(&serde_json::json!({})), "an object");
        assert_eq!(kind(&serde_json::json!([1])), "a list");
    }

    #[test]
    fn test_list_body_shapes() {
        let items = list_items("events", serde_json::json!([{ "id": 1 }])).unwrap();
        assert_eq!(items.len(), 1);
        assert!(list_items("events", Value::Null).unwrap().is_empty());

        let err = list_items("events", serde_json::json!({ "events": [] })).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponse(_)));
        assert!(!err.is_validation());
        assert!(err.to_string().contains("an object"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let api = HttpApi::new("http://127.0.0.1:9/api");
        let err = api.list_events().await.unwrap_err();
        assert!(err.is_transport());
    }
}
