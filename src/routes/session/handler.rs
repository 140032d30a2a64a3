use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    client::ClientError,
    error::AppError,
    gate::{self, Area},
    models::Credentials,
    result::EmptyResponse,
    session::SessionError,
    utils::success_to_api_response,
};

use super::model::{AreaLink, LandingResponse, LoginRequest, LoginResponse, SessionResponse};

/// 公共区域：当前用户以及每个区域是否可进入
pub async fn landing(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.current().await;

    let areas = Area::ALL
        .into_iter()
        .map(|area| AreaLink {
            area,
            path: area.path(),
            allowed: gate::navigate(session.as_ref(), area).is_allowed(),
        })
        .collect();

    (
        StatusCode::OK,
        success_to_api_response(LandingResponse {
            user: session.map(|s| s.user),
            areas,
        }),
    )
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("email and password are required".into()));
    }

    let credentials = Credentials {
        email: email.to_string(),
        password: req.password,
    };
    let (user, token) = state
        .authenticator
        .login(&credentials)
        .await
        .map_err(|e| match e {
            ClientError::Rejected => {
                tracing::info!("Login rejected for {}", credentials.email);
                AppError::AuthFailed
            }
            e => {
                tracing::error!("Login request failed: {}", e);
                AppError::Upstream
            }
        })?;

    // 新身份不能看到上一个身份的仪表盘
    state.unmount_dashboard().await;

    let session = state.session.login(user, token).await.map_err(|e| match e {
        SessionError::EmptyToken => {
            tracing::error!("Authentication service returned an empty token");
            AppError::Upstream
        }
        e => {
            tracing::error!("Failed to persist session: {}", e);
            AppError::SessionStorage
        }
    })?;

    let redirect = gate::home_area(session.user.role).path().to_string();
    Ok((
        StatusCode::OK,
        success_to_api_response(LoginResponse {
            user: session.user,
            redirect,
        }),
    ))
}

pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.unmount_dashboard().await;

    state.session.logout().await.map_err(|e| {
        tracing::error!("Failed to clear persisted session: {}", e);
        AppError::SessionStorage
    })?;

    Ok((StatusCode::OK, success_to_api_response(EmptyResponse {})))
}

pub async fn current(State(state): State<AppState>) -> impl IntoResponse {
    let user = state.session.current().await.map(|s| s.user);
    (StatusCode::OK, success_to_api_response(SessionResponse { user }))
}
