pub mod auth;
pub mod config;
pub mod db;
pub mod err;
pub mod forms;
pub mod models;
pub mod session;
pub mod student;
pub mod views;

use axum::handler::Handler;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Router};
use axum_extra::extract::cookie::Key;
use tower::ServiceBuilder;

use crate::db::DynStore;
use crate::session::Session;
use crate::views::{render, HomePage};

/// Builds the full application around a store and a cookie signing key.
pub fn app(store: DynStore, key: Key) -> Router {
    Router::new()
        .route("/", get(home))
        .route(
            "/student",
            get(student::submission_form).post(student::submit_certificates),
        )
        .route(
            "/studentview",
            get(student::lookup_form).post(student::lookup_submissions),
        )
        .route("/admin", get(auth::login_form).post(auth::login_admin))
        .route("/adminview", get(auth::list_submissions))
        .route("/logout", get(auth::logout))
        .fallback(err::handler404.into_service())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(store))
                .layer(Extension(key)),
        )
}

async fn home(session: Session) -> Response {
    render(session, |flashes| HomePage { flashes })
}
