use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest, UpdateProfileRequest},
        extractors::AuthUser,
        repo_types::{ProfileChanges, User},
        services::{hash_password, is_valid_email, normalize_email, verify_password, JwtKeys, MIN_PASSWORD_LEN},
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me))
}

fn auth_response(keys: &JwtKeys, user: User) -> ApiResult<AuthResponse> {
    let (access_token, refresh_token) = keys.sign_pair(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}

fn check_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    check_password(&payload.password)?;

    // Ensure email is not taken
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email is already in use".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        payload.first_name.trim(),
        payload.last_name.trim(),
        &payload.email,
        &hash,
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, is_admin = user.is_admin, "user registered");
    let keys = JwtKeys::from_ref(&state);
    Ok((StatusCode::CREATED, Json(auth_response(&keys, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.email = normalize_email(&payload.email);

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required".into()));
    }

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(auth_response(&keys, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(auth_response(&keys, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    Ok(Json(user.into()))
}

/// Blank strings count as "not provided", matching how the settings form
/// submits untouched fields.
fn provided(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn profile_changes(payload: UpdateProfileRequest) -> ApiResult<ProfileChanges> {
    let email = provided(payload.email).map(|e| normalize_email(&e));
    if let Some(email) = &email {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }

    let password_hash = match (payload.new_password, payload.confirm_password) {
        (None, None) => None,
        (Some(p), _) | (_, Some(p)) if p.is_empty() => None,
        (Some(new), Some(confirm)) if new == confirm => {
            check_password(&new)?;
            Some(hash_password(&new)?)
        }
        _ => return Err(ApiError::Validation("Passwords do not match".into())),
    };

    Ok(ProfileChanges {
        first_name: provided(payload.first_name),
        last_name: provided(payload.last_name),
        email,
        password_hash,
    })
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<PublicUser>> {
    let changes = profile_changes(payload)?;
    let password_changed = changes.password_hash.is_some();
    let user = User::update_profile(&state.db, user_id, changes).await?;
    info!(user_id = %user.id, password_changed, "profile updated");
    Ok(Json(user.into()))
}

#[cfg(test)]
mod me_tests {
    use super::*;
    use time::OffsetDateTime;

    fn user() -> User {
        User {
            id: uuid::Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            is_admin: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_me_response_serialization() {
        let response: PublicUser = user().into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"is_admin\":true"));
        assert!(json.contains("1970-01-01T00:00:00Z"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn blank_fields_are_left_untouched() {
        let changes = profile_changes(UpdateProfileRequest {
            first_name: Some("  ".into()),
            last_name: Some(" Byron ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.first_name, None);
        assert_eq!(changes.last_name.as_deref(), Some("Byron"));
        assert!(changes.password_hash.is_none());
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let err = profile_changes(UpdateProfileRequest {
            new_password: Some("longenough1".into()),
            confirm_password: Some("longenough2".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }

    #[test]
    fn matching_passwords_are_hashed() {
        let changes = profile_changes(UpdateProfileRequest {
            new_password: Some("longenough1".into()),
            confirm_password: Some("longenough1".into()),
            ..Default::default()
        })
        .unwrap();
        let hash = changes.password_hash.unwrap();
        assert!(verify_password("longenough1", &hash).unwrap());
    }

    #[test]
    fn email_changes_are_normalized_and_validated() {
        let changes = profile_changes(UpdateProfileRequest {
            email: Some(" New@Example.com ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.email.as_deref(), Some("new@example.com"));

        assert!(profile_changes(UpdateProfileRequest {
            email: Some("nope".into()),
            ..Default::default()
        })
        .is_err());
    }
}
