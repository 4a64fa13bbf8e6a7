use crate::api::routes;
use crate::config::Shared;
use crate::host_store::DynHostStore;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: Shared,
    pub hosts: DynHostStore,
}

/// The API routes, without a listener.
pub fn router(config: Shared, hosts: DynHostStore) -> Router {
    routes::new(AppState { config, hosts })
}

pub fn new(
    config: Shared,
    hosts: DynHostStore,
) -> impl Future<Output = hyper::Result<()>> {
    let bind_addr = config.api_bind_addr;
    axum::Server::bind(&bind_addr)
        .serve(router(config, hosts).into_make_service_with_connect_info::<SocketAddr>())
}
