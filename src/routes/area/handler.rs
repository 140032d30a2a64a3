use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    dashboard::wait_until_settled,
    error::AppError,
    gate::{self, Access, Area},
    result::EmptyResponse,
    session::Session,
    utils::success_to_api_response,
};

use super::model::AreaResponse;

fn parse_area(segment: &str) -> Result<Area, AppError> {
    Area::from_segment(segment).ok_or_else(|| AppError::UnknownArea(segment.to_string()))
}

/// 每次导航都按当前会话重新判断，拒绝时返回重定向
async fn admit(state: &AppState, area: Area) -> Result<Session, Response> {
    let session = state.session.current().await;
    match gate::navigate(session.as_ref(), area) {
        Access::Allow => session.ok_or_else(|| Redirect::to(Area::Public.path()).into_response()),
        Access::DenyRedirect(target) => {
            tracing::debug!("Redirecting {} to {}", area.path(), target.path());
            Err(Redirect::to(target.path()).into_response())
        }
    }
}

/// 进入区域：挂载新的仪表盘，等待总览加载结束后返回视图
pub async fn enter(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, AppError> {
    let area = parse_area(&segment)?;
    let session = match admit(&state, area).await {
        Ok(session) => session,
        Err(redirect) => return Ok(redirect),
    };

    let mount = state.orchestrator_for(&session).mount(area);
    let mount_id = mount.id();
    let rx = mount.subscribe();
    // 替换掉的旧仪表盘在这里被卸载
    state.dashboard.lock().await.replace(mount);

    let view = wait_until_settled(rx).await;
    Ok((
        StatusCode::OK,
        success_to_api_response(AreaResponse {
            area,
            mount_id,
            user: session.user,
            view,
        }),
    )
        .into_response())
}

/// 当前视图快照，区域尚未挂载时先挂载
pub async fn view(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, AppError> {
    let area = parse_area(&segment)?;
    let session = match admit(&state, area).await {
        Ok(session) => session,
        Err(redirect) => return Ok(redirect),
    };

    let mut slot = state.dashboard.lock().await;
    if slot.as_ref().is_some_and(|mount| mount.area() != area) {
        slot.take();
    }
    let mount = slot.get_or_insert_with(|| state.orchestrator_for(&session).mount(area));
    let (mount_id, view) = (mount.id(), mount.snapshot());
    drop(slot);

    Ok((
        StatusCode::OK,
        success_to_api_response(AreaResponse {
            area,
            mount_id,
            user: session.user,
            view,
        }),
    )
        .into_response())
}

/// 离开区域并丢弃其视图模型
pub async fn leave(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let area = parse_area(&segment)?;

    let mut slot = state.dashboard.lock().await;
    if slot.as_ref().is_some_and(|mount| mount.area() == area) {
        if let Some(mount) = slot.take() {
            mount.unmount();
        }
    }
    drop(slot);

    Ok((StatusCode::OK, success_to_api_response(EmptyResponse {})))
}
