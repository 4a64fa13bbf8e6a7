use crate::api::api_error::APIError;
use crate::api::model::{valid_hostname, AvailableResult, NewHostResult, UpdateHostResult};
use crate::api::server::AppState;
use crate::error::Error;
use crate::host_store::Host;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::json;
use std::net::{IpAddr, SocketAddr};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const REAL_IP_HEADER: &str = "x-real-ip";

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/available/:hostname", get(available))
        .route("/new/:hostname", get(new_host))
        .route("/update/:hostname/:token", get(update_host))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

/// The caller's address: the `X-Real-IP` header set by a reverse proxy, or the peer address.
fn client_ip(
    headers: &HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<IpAddr, Error> {
    let real_ip = headers
        .get(REAL_IP_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());
    real_ip
        .or(connect_info.map(|ConnectInfo(addr)| addr.ip()))
        .ok_or(Error::UnknownClientAddr)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

async fn available(
    State(state): State<AppState>,
    WithRejection(Path(hostname), _): WithRejection<Path<String>, APIError>,
) -> Result<Json<AvailableResult>, APIError> {
    valid_hostname(&hostname)?;
    let available = state.hosts.available(&hostname).await?;
    Ok(Json(AvailableResult { available }))
}

async fn new_host(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    WithRejection(Path(hostname), _): WithRejection<Path<String>, APIError>,
) -> Result<Json<NewHostResult>, APIError> {
    valid_hostname(&hostname)?;
    let ip = client_ip(&headers, connect_info)?;

    if !state.hosts.available(&hostname).await? {
        tracing::debug!("rejected registration from {ip} for taken \"{hostname}\"");
        return Err(Error::HostnameTaken(hostname).into());
    }

    let host = Host::register(hostname, ip.to_string());
    state.hosts.set_host(&host).await?;
    tracing::info!("registered \"{}\" at {ip}", host.hostname);
    Ok(Json(NewHostResult {
        hostname: host.hostname,
        ip: host.ip,
        token: host.token,
    }))
}

async fn update_host(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    WithRejection(Path((hostname, token)), _): WithRejection<Path<(String, String)>, APIError>,
) -> Result<Json<UpdateHostResult>, APIError> {
    let ip = client_ip(&headers, connect_info)?;
    let mut host = state.hosts.get_host(&hostname).await?;

    if host.token != token {
        tracing::debug!("rejected update from {ip} for \"{hostname}\"");
        return Err(Error::AuthForbidden(hostname).into());
    }

    host.ip = ip.to_string();
    state.hosts.set_host(&host).await?;
    tracing::info!("updated \"{}\" to {ip}", host.hostname);
    Ok(Json(UpdateHostResult {
        hostname: host.hostname,
        ip: host.ip,
    }))
}
