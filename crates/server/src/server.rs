use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::{
    activities,
    auth::{self, AuthConfig, JwtService},
    bookings, companies, currencies, geo, media, packages, users,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    pub fn new(engine: Engine, auth: AuthConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            jwt: Arc::new(JwtService::new(auth)),
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Routes anyone can call: sign-in, catalog reads and quotes.
fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/currencies", get(currencies::list))
        .route("/currencies/{id}", get(currencies::get))
        .route("/countries", get(geo::list_countries))
        .route("/countries/{id}/regions", get(geo::list_regions))
        .route("/cities", get(geo::list_cities))
        .route("/cities/{id}", get(geo::get_city))
        .route("/languages", get(geo::list_languages))
        .route("/packages", get(packages::list))
        .route("/packages/{id}", get(packages::get))
        .route("/activities", get(activities::list))
        .route("/activities/{id}", get(activities::get))
        .route("/bookings/quote", post(bookings::quote))
}

/// Routes behind [`auth::require_auth`].
fn protected_routes() -> Router<ServerState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/users", get(users::list))
        .route(
            "/users/{id}",
            get(users::get).patch(users::update).delete(users::remove),
        )
        .route("/currencies", post(currencies::create))
        .route(
            "/currencies/{id}",
            patch(currencies::update).delete(currencies::remove),
        )
        .route("/countries", post(geo::create_country))
        .route("/regions", post(geo::create_region))
        .route("/cities", post(geo::create_city))
        .route("/languages", post(geo::create_language))
        .route("/companies", get(companies::list).post(companies::create))
        .route("/packages", post(packages::create))
        .route(
            "/packages/{id}",
            patch(packages::update).delete(packages::remove),
        )
        .route(
            "/packages/{id}/pricing-options",
            post(packages::add_pricing_option),
        )
        .route(
            "/packages/{id}/pricing-options/{option_id}",
            delete(packages::remove_pricing_option),
        )
        .route("/activities", post(activities::create))
        .route(
            "/activities/{id}",
            patch(activities::update).delete(activities::remove),
        )
        .route("/media", post(media::create))
        .route("/media/{id}", delete(media::remove))
        .route("/bookings", get(bookings::list).post(bookings::create))
        .route("/bookings/{id}", get(bookings::get))
        .route("/bookings/{id}/cancel", post(bookings::cancel))
        .route("/bookings/{id}/confirm", post(bookings::confirm))
}

pub fn router(state: ServerState) -> Router {
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public_routes()
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
