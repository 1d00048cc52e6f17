pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, map_response},
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::permissions;
use crate::config::SecurityConfig;
use crate::middleware::{envelope_method_not_allowed, require_scope, ScopeGuard};

pub use crate::state::AppState;

/// Full router for every service. CORS is added separately by [`cors_layer`].
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .merge(greeting_routes(&state))
        .merge(trivia_routes())
        .merge(drink_routes(&state))
        .merge(donor_routes(&state))
        .fallback(handlers::root::not_found)
        // Global middleware
        .layer(map_response(envelope_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Attach `guard` to a single method router
fn guarded(method_router: MethodRouter<AppState>, guard: ScopeGuard) -> MethodRouter<AppState> {
    method_router.route_layer(from_fn_with_state(guard, require_scope))
}

fn greeting_routes(state: &AppState) -> Router<AppState> {
    use handlers::greeting;

    Router::new()
        .route("/greeting", get(greeting::all).post(greeting::add))
        .route("/greeting/:lang", get(greeting::one))
        // Bearer token required, no particular permission
        .route("/headers", guarded(get(greeting::whoami), state.auth.clone()))
        .route("/image", guarded(get(greeting::whoami), state.auth.clone()))
}

fn trivia_routes() -> Router<AppState> {
    use handlers::trivia::{categories, questions, quizzes, search};

    Router::new()
        .route("/categories", get(categories::list))
        .route("/categories/:id/questions", get(categories::questions))
        .route("/questions", get(questions::list).post(questions::create))
        .route("/questions/:id", delete(questions::delete))
        .route("/search", post(search::search))
        .route("/quizzes", post(quizzes::play))
}

fn drink_routes(state: &AppState) -> Router<AppState> {
    use handlers::drinks;

    let scope = |permission| state.auth.requiring(permission);

    Router::new()
        .route("/drinks", get(drinks::list))
        .route("/drinks", guarded(post(drinks::create), scope(permissions::POST_DRINKS)))
        .route(
            "/drinks-detail",
            guarded(get(drinks::detail), scope(permissions::GET_DRINKS_DETAIL)),
        )
        .route("/drinks/:id", guarded(patch(drinks::update), scope(permissions::PATCH_DRINKS)))
        .route("/drinks/:id", guarded(delete(drinks::delete), scope(permissions::DELETE_DRINKS)))
}

fn donor_routes(state: &AppState) -> Router<AppState> {
    use handlers::donors;

    let scope = |permission| state.auth.requiring(permission);

    Router::new()
        .route("/donors", guarded(get(donors::list), scope(permissions::GET_DONORS)))
        .route("/donors", guarded(post(donors::create), scope(permissions::POST_DONORS)))
        .route("/donors/:id", guarded(get(donors::show), scope(permissions::GET_DONORS)))
        .route("/donors/:id", guarded(patch(donors::update), scope(permissions::PATCH_DONORS)))
        .route("/donors/:id", guarded(delete(donors::delete), scope(permissions::DELETE_DONORS)))
}

/// CORS for the configured origins; `*` allows any origin.
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            security
                .cors_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
