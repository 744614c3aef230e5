//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod apartments;
pub mod auth;
pub mod bookings;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every API handler and the extractor error handlers.
///
/// The caller mounts this inside the `/api/v1` scope and wraps it with the
/// session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        // `/users/me*` before `/users/{id}` so `me` is not parsed as an id.
        .service(users::current_user)
        .service(users::update_current_user)
        .service(users::list_own_bookings)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(apartments::list_apartments)
        .service(apartments::check_availability)
        .service(apartments::get_apartment)
        .service(apartments::create_apartment)
        .service(apartments::update_apartment)
        .service(apartments::delete_apartment)
        .service(bookings::create_booking)
        .service(bookings::list_bookings)
        .service(bookings::cancel_booking)
        .service(bookings::get_booking)
        .service(bookings::update_booking)
        .service(bookings::delete_booking);
}
