mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::server::handlers::{bids, carriers, registrations, rfps, tender};
use crate::api::{interface::DynAPI, API};

pub async fn serve<T: API + Sync + Send + 'static>(api: T) {
    tracing_subscriber::fmt::init();

    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/registrations", post(registrations::create))
        .route("/registrations/:id", get(registrations::find))
        .route("/registrations/:id/confirm", post(registrations::confirm))
        .route("/carriers", get(carriers::list))
        .route(
            "/carriers/:id",
            get(carriers::find)
                .patch(carriers::update)
                .delete(carriers::remove),
        )
        .route("/rfps", post(rfps::create).get(rfps::list))
        .route("/rfps/:id", get(rfps::find))
        .route("/rfps/:id/publish", patch(rfps::publish))
        .route("/rfps/:id/close", patch(rfps::close))
        .route("/rfps/:id/reopen", patch(rfps::reopen))
        .route("/rfps/:id/lanes", post(rfps::add_lanes).get(rfps::list_lanes))
        .route(
            "/rfps/:id/invites",
            post(rfps::create_invites).get(rfps::list_invites),
        )
        .route("/rfps/:id/bids", get(bids::list))
        .route(
            "/rfps/:rfp_id/carriers/:carrier_id/accept",
            patch(bids::accept_carrier),
        )
        .route("/bids/:id/accept", patch(bids::accept))
        .route("/tender/:token", get(tender::open))
        .route("/tender/:token/bids", post(tender::submit))
        .layer(Extension(api));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
