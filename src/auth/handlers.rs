use axum::{
    extract::{DefaultBodyLimit, FromRef, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookies::{with_auth_cookies, without_auth_cookies, REFRESH_COOKIE_NAME},
        dto::{LoginData, LoginRequest, PublicUser, RefreshData, RefreshRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
        validate::{is_valid_email, required_trimmed},
    },
    error::{ApiError, ApiResponse},
    media::{upload_image, UploadItem},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/users/refresh-token", post(refresh_token))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[derive(Default)]
struct RegisterForm {
    username: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
    avatar: Option<UploadItem>,
    cover_image: Option<UploadItem>,
}

async fn read_register_form(mp: &mut Multipart) -> Result<RegisterForm, ApiError> {
    let mut form = RegisterForm::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => form.username = Some(field.text().await.map_err(bad)?),
            "email" => form.email = Some(field.text().await.map_err(bad)?),
            "fullName" => form.full_name = Some(field.text().await.map_err(bad)?),
            "password" => form.password = Some(field.text().await.map_err(bad)?),
            // First file wins for each image field.
            "avatar" if form.avatar.is_none() => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(bad)?;
                form.avatar = Some(UploadItem { body, content_type });
            }
            "coverImage" if form.cover_image.is_none() => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(bad)?;
                form.cover_image = Some(UploadItem { body, content_type });
            }
            _ => {}
        }
    }
    Ok(form)
}

fn bad(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(e.to_string())
}

#[instrument(skip(state, mp))]
pub async fn register(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PublicUser>>), ApiError> {
    let form = read_register_form(&mut mp).await?;

    let username = required_trimmed(form.username.as_deref().unwrap_or(""), "username")?
        .to_lowercase();
    let email = required_trimmed(form.email.as_deref().unwrap_or(""), "email")?;
    let full_name = required_trimmed(form.full_name.as_deref().unwrap_or(""), "fullName")?;
    let password = required_trimmed(form.password.as_deref().unwrap_or(""), "password")?;

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }

    let avatar = form
        .avatar
        .ok_or_else(|| ApiError::BadRequest("avatar file is required".into()))?;

    if User::find_by_username_or_email(&state.db, &username, &email)
        .await?
        .is_some()
    {
        warn!(username = %username, email = %email, "username or email already taken");
        return Err(ApiError::Conflict(
            "user with username or email already exists".into(),
        ));
    }

    let avatar_url = upload_image(&state, "avatars", avatar)
        .await
        .map_err(|e| ApiError::BadRequest(format!("avatar upload failed: {e}")))?;

    // Cover image is optional; a failed upload degrades to no cover.
    let cover_image_url = match form.cover_image {
        Some(item) => match upload_image(&state, "covers", item).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, "cover image upload failed");
                None
            }
        },
        None => None,
    };

    let hash = hash_password(&password)?;
    let user = User::create(
        &state.db,
        &username,
        &email,
        &full_name,
        &hash,
        &avatar_url,
        cover_image_url.as_deref(),
    )
    .await?;

    let created = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| {
            ApiError::Internal("something went wrong while registering the user".into())
        })?;

    info!(user_id = %created.id, username = %created.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED,
            PublicUser::from(created),
            "user created successfully",
        )),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginData>>), ApiError> {
    let username = payload
        .username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    if username.is_none() && email.is_none() {
        return Err(ApiError::BadRequest(
            "username and email both are required".into(),
        ));
    }
    let password = payload
        .password
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("password is required".into()))?;

    // Every provided credential field must match the same record.
    let user = User::find_for_login(&state.db, username.as_deref(), email.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("user does not exist".into()))?;

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::BadRequest("invalid user credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    User::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    let jar = with_auth_cookies(
        jar,
        &access_token,
        keys.access_ttl,
        &refresh_token,
        keys.refresh_ttl,
    );

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((
        jar,
        Json(ApiResponse::ok(
            LoginData {
                user: PublicUser::from(user),
                access_token,
                refresh_token,
            },
            "user logged in successfully",
        )),
    ))
}

#[instrument(skip(state, jar, user), fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthUser(user): AuthUser,
) -> Result<(CookieJar, Json<ApiResponse<serde_json::Value>>), ApiError> {
    User::set_refresh_token(&state.db, user.id, None).await?;

    info!(user_id = %user.id, "user logged out");
    Ok((
        without_auth_cookies(jar),
        Json(ApiResponse::ok(json!({}), "user logged out successfully")),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, Json<ApiResponse<RefreshData>>), ApiError> {
    let presented = jar
        .get(REFRESH_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .or_else(|| payload.and_then(|Json(p)| p.refresh_token))
        .ok_or_else(|| ApiError::Unauthorized("unauthorized request".into()))?;

    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&presented)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthorized("invalid refresh token".into()))?;

    // Rotation check: only the most recently issued refresh token is live.
    // Compare-then-write is not guarded by a version check, so two
    // concurrent refreshes with the same token race and the last writer
    // wins.
    if user.refresh_token.as_deref() != Some(presented.as_str()) {
        warn!(user_id = %user.id, "stale or reused refresh token");
        return Err(ApiError::Unauthorized(
            "refresh token is expired or already used".into(),
        ));
    }

    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    User::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    let jar = with_auth_cookies(
        jar,
        &access_token,
        keys.access_ttl,
        &refresh_token,
        keys.refresh_ttl,
    );

    info!(user_id = %user.id, "access token refreshed");
    Ok((
        jar,
        Json(ApiResponse::ok(
            RefreshData {
                access_token,
                refresh_token,
            },
            "access token refreshed",
        )),
    ))
}
