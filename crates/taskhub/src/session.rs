//! Signed-in user session.
//!
//! The profile returned by the backend is cached under [`AUTH_USER_KEY`] so a
//! restarted client comes back signed in. Authentication itself is the
//! backend's (or an external identity provider's) business: the session only
//! cares that it gets a user profile back.

use crate::api::DashboardApi;
use crate::error::{ApiError, ApiResult, StoreError};
use crate::ingest;
use crate::storage::LocalStore;
use serde_json::Value;
use taskhub_types::{
    SignInRequest, SignUpRequest, SocialLoginRequest, SocialProfile, User, UserUpdate,
    DEFAULT_AVATAR,
};
use validator::Validate;

/// Storage key of the cached profile.
pub const AUTH_USER_KEY: &str = "auth_user";

/// Third-party sign-in (e.g. Google). Returns the provider's profile or fails.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Name sent to the backend as `provider`.
    fn name(&self) -> &str;

    async fn authenticate(&self) -> ApiResult<SocialProfile>;
}

#[derive(Debug)]
pub struct AuthSession {
    store: LocalStore,
    user: Option<User>,
    loading: bool,
}

impl AuthSession {
    /// Resume from the cached profile. An unreadable cache means signed out.
    pub fn restore(store: LocalStore) -> Self {
        let user = match store.get_json::<User>(AUTH_USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("Cached user profile is unreadable, signing out: {}", e);
                None
            }
        };
        if let Some(user) = &user {
            tracing::debug!("Restored session for {}", user.email);
        }

        Self {
            store,
            user,
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn require_user(&self) -> ApiResult<&User> {
        self.user.as_ref().ok_or(ApiError::Unauthenticated)
    }

    /// Password sign-in. A profile without an avatar gets the default one.
    pub async fn login<A: DashboardApi>(
        &mut self,
        api: &A,
        email: &str,
        password: &str,
    ) -> ApiResult<&User> {
        let request = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        self.loading = true;
        let response = api.sign_in(&request).await;
        self.loading = false;

        let mut user = profile_from(response, "sign in")?;
        if user.avatar.as_deref().map_or(true, str::is_empty) {
            user.avatar = Some(DEFAULT_AVATAR.to_string());
        }
        self.establish(user)
    }

    /// Create an account and sign in. New accounts always start with the
    /// default avatar.
    pub async fn signup<A: DashboardApi>(
        &mut self,
        api: &A,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<&User> {
        let request = SignUpRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        self.loading = true;
        let response = api.sign_up(&request).await;
        self.loading = false;

        let mut user = profile_from(response, "sign up")?;
        user.avatar = Some(DEFAULT_AVATAR.to_string());
        self.establish(user)
    }

    /// Sign in through a third-party provider, then exchange its profile for
    /// a backend user.
    pub async fn login_with_provider<A: DashboardApi, P: IdentityProvider>(
        &mut self,
        api: &A,
        provider: &P,
    ) -> ApiResult<&User> {
        self.loading = true;
        let result = self.social_exchange(api, provider).await;
        self.loading = false;

        let user = result?;
        self.establish(user)
    }

    async fn social_exchange<A: DashboardApi, P: IdentityProvider>(
        &self,
        api: &A,
        provider: &P,
    ) -> ApiResult<User> {
        let profile = provider.authenticate().await.map_err(|e| {
            tracing::error!("{} sign-in failed: {}", provider.name(), e);
            e
        })?;

        let request = SocialLoginRequest {
            name: profile.display_name,
            email: profile.email,
            avatar: profile.photo_url,
            provider: provider.name().to_string(),
        };
        request.validate()?;

        profile_from(api.social_login(&request).await, "social sign in")
    }

    /// Send a partial profile update and merge the backend's answer into the
    /// cached profile.
    pub async fn update_user<A: DashboardApi>(
        &mut self,
        api: &A,
        update: &UserUpdate,
    ) -> ApiResult<&User> {
        update.validate()?;
        let current = self.require_user()?.clone();

        let response = api.update_user(current.id, update).await.map_err(|e| {
            tracing::error!("Failed to update user {}: {}", current.id, e);
            e
        })?;

        let merged = merge_profile(&current, update, response)?;
        self.establish(merged)
    }

    /// Forget the signed-in user and clear the cache.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        if let Some(user) = self.user.take() {
            tracing::info!("Signed out {}", user.email);
        }
        self.store.remove(AUTH_USER_KEY)
    }

    fn establish(&mut self, user: User) -> ApiResult<&User> {
        self.store.set_json(AUTH_USER_KEY, &user)?;
        tracing::info!("Signed in as {} ({})", user.email, user.role);
        Ok(self.user.insert(user))
    }
}

fn profile_from(response: ApiResult<Value>, action: &str) -> ApiResult<User> {
    let value = response.map_err(|e| {
        tracing::error!("Failed to {}: {}", action, e);
        e
    })?;
    ingest::user(&value)
        .ok_or_else(|| ApiError::Identity(format!("{} returned no usable user profile", action)))
}

/// Overlay the backend's answer on the current profile. When the backend
/// answers with no body, the update itself is applied.
///
/// Fields are read through the user alias table, so `team_id` and `teamId`
/// in the answer both replace the cached team.
fn merge_profile(current: &User, update: &UserUpdate, response: Value) -> ApiResult<User> {
    use ingest::aliases::user as a;

    let overlay = match response {
        Value::Object(fields) => fields,
        _ => match serde_json::to_value(update)? {
            Value::Object(fields) => fields,
            _ => serde_json::Map::new(),
        },
    };

    let mut merged = current.clone();
    if let Some(name) = ingest::resolve_str(&overlay, a::NAME) {
        merged.name = name.to_string();
    }
    if let Some(email) = ingest::resolve_str(&overlay, a::EMAIL) {
        merged.email = email.to_string();
    }
    if let Some(role) = ingest::resolve_str(&overlay, a::ROLE) {
        merged.role = role.to_string();
    }
    if let Some(avatar) = ingest::resolve_str(&overlay, a::AVATAR) {
        merged.avatar = Some(avatar.to_string());
    }
    if let Some(phone) = ingest::resolve_str(&overlay, a::PHONE) {
        merged.phone = Some(phone.to_string());
    }
    if let Some(team_id) = ingest::resolve_uuid(&overlay, a::TEAM_ID) {
        merged.team_id = Some(team_id);
    }
    Ok(merged)
}
