use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::PublicUser,
        extractors::AuthUser,
        password::{hash_password, verify_password},
        repo_types::User,
        validate::{is_valid_email, required_trimmed},
    },
    error::{ApiError, ApiResponse},
    media::{upload_image, UploadItem},
    state::AppState,
};

use super::dto::{ChangePasswordRequest, UpdateAccountRequest};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users/change-password", post(change_password))
        .route("/users/current-user", get(current_user))
        .route("/users/update-account", patch(update_account))
        .route("/users/avatar", patch(update_avatar))
        .route("/users/cover-image", patch(update_cover_image))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// First file part of the multipart body, whatever its field name.
async fn first_file(mp: &mut Multipart) -> Result<Option<UploadItem>, ApiError> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        return Ok(Some(UploadItem { body, content_type }));
    }
    Ok(None)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if !verify_password(&payload.old_password, &user.password_hash)? {
        warn!(user_id = %user.id, "old password mismatch");
        return Err(ApiError::BadRequest("invalid old password".into()));
    }
    let new_password = required_trimmed(&payload.new_password, "newPassword")?;

    let hash = hash_password(&new_password)?;
    User::set_password_hash(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(ApiResponse::ok(
        json!({}),
        "password changed successfully",
    )))
}

#[instrument(skip(user), fields(user_id = %user.id))]
pub async fn current_user(
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    // The extractor already loaded the row; no extra store access.
    Ok(Json(ApiResponse::ok(
        PublicUser::from(user),
        "current user fetched successfully",
    )))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let full_name = required_trimmed(&payload.full_name, "fullName")?;
    let email = required_trimmed(&payload.email, "email")?;
    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("invalid email".into()));
    }

    let updated = User::update_profile(&state.db, user.id, &full_name, &email).await?;

    info!(user_id = %updated.id, "account details updated");
    Ok(Json(ApiResponse::ok(
        PublicUser::from(updated),
        "account details updated successfully",
    )))
}

#[instrument(skip(state, user, mp), fields(user_id = %user.id))]
pub async fn update_avatar(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut mp: Multipart,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let item = first_file(&mut mp)
        .await?
        .ok_or_else(|| ApiError::BadRequest("avatar file is required".into()))?;

    let url = upload_image(&state, "avatars", item)
        .await
        .map_err(|e| ApiError::BadRequest(format!("avatar upload failed: {e}")))?;

    // TODO: delete the previous avatar object from storage once updated.
    let updated = User::set_avatar_url(&state.db, user.id, &url).await?;

    info!(user_id = %updated.id, "avatar updated");
    Ok(Json(ApiResponse::ok(
        PublicUser::from(updated),
        "avatar updated successfully",
    )))
}

#[instrument(skip(state, user, mp), fields(user_id = %user.id))]
pub async fn update_cover_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut mp: Multipart,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let item = first_file(&mut mp)
        .await?
        .ok_or_else(|| ApiError::BadRequest("cover image file is required".into()))?;

    let url = upload_image(&state, "covers", item)
        .await
        .map_err(|e| ApiError::BadRequest(format!("cover image upload failed: {e}")))?;

    let updated = User::set_cover_image_url(&state.db, user.id, &url).await?;

    info!(user_id = %updated.id, "cover image updated");
    Ok(Json(ApiResponse::ok(
        PublicUser::from(updated),
        "cover image updated successfully",
    )))
}
