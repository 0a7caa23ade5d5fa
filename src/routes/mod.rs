use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, bookings, catalog, search};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::middleware::rate_limit::{create_public_governor, create_user_governor};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let public_governor = create_public_governor();
    let user_governor = create_user_governor();

    // Public routes (IP rate limited)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public catalog and search
    let public_routes = Router::new()
        .route("/items/{kind}", get(catalog::list_items))
        .route("/items/{kind}/{id}", get(catalog::get_item))
        .route("/search", get(search::search))
        .layer(public_governor);

    // Booking routes (requires auth, per-user rate limit)
    let booking_routes = Router::new()
        .route("/", post(bookings::create_booking))
        .route("/", get(bookings::my_bookings))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .layer(user_governor.clone())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Profile routes (requires auth)
    let profile_routes = Router::new()
        .route("/profile", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .layer(user_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Travel item management
        .route("/items", post(admin::create_item))
        .route("/items/{id}", put(admin::update_item))
        .route("/items/{id}", delete(admin::delete_item))
        // User management
        .route("/users", get(admin::list_all_users))
        .route("/users/{id}", delete(admin::delete_user))
        // Booking management
        .route("/bookings", get(admin::list_all_bookings))
        .route("/bookings/{id}", delete(admin::delete_booking))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/user", profile_routes)
        .with_state(state)
}
