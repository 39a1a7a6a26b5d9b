use axum::{Extension, Json, extract::State, response::IntoResponse};
use utoipa_axum::router::OpenApiRouter;

use crate::{
    common::{
        app_error::{AppError, StdResponse},
        app_state::AppState,
        auth::AuthUser,
    },
    models::{FeedbackEntity, ProfileEntity, UserEntity},
    usecases::accounts::{AccountUseCase, ProfilePatch, SubmitFeedback},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(utoipa_axum::routes!(sync_me))
        .routes(utoipa_axum::routes!(get_profile, update_profile))
        .routes(utoipa_axum::routes!(submit_feedback))
}

/// Stores the signed-in user's record on first visit and returns it.
#[utoipa::path(
    post,
    path = "/users/me",
    tags = ["Users"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Stored user", body = StdResponse<UserEntity, String>)
    )
)]
async fn sync_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let stored = AccountUseCase::new(state.accounts.clone())
        .sync_user(&user)
        .await?;

    Ok(StdResponse::<UserEntity, String> {
        data: Some(stored),
        message: None,
    })
}

#[utoipa::path(
    get,
    path = "/profile",
    tags = ["Users"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Profile, blank when never saved", body = StdResponse<ProfileEntity, String>)
    )
)]
async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let profile = AccountUseCase::new(state.accounts.clone())
        .get_profile(&user.user_id)
        .await?;

    Ok(StdResponse::<ProfileEntity, String> {
        data: Some(profile),
        message: None,
    })
}

#[utoipa::path(
    put,
    path = "/profile",
    tags = ["Users"],
    security(("bearerAuth" = [])),
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Profile saved", body = StdResponse<ProfileEntity, String>)
    )
)]
async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(patch): Json<ProfilePatch>,
) -> Result<impl IntoResponse, AppError> {
    let profile = AccountUseCase::new(state.accounts.clone())
        .update_profile(&user.user_id, patch)
        .await?;

    Ok(StdResponse {
        data: Some(profile),
        message: Some("Profile saved"),
    })
}

#[utoipa::path(
    post,
    path = "/feedback",
    tags = ["Users"],
    security(("bearerAuth" = [])),
    request_body = SubmitFeedback,
    responses(
        (status = 200, description = "Feedback stored", body = StdResponse<FeedbackEntity, String>),
        (status = 400, description = "Blank feedback or rating outside 1..5")
    )
)]
async fn submit_feedback(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SubmitFeedback>,
) -> Result<impl IntoResponse, AppError> {
    let entry = AccountUseCase::new(state.accounts.clone())
        .submit_feedback(&user, payload)
        .await?;

    Ok(StdResponse {
        data: Some(entry),
        message: Some("Thank you for your feedback"),
    })
}
