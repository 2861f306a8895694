//! IABOT Soluciones backend
//!
//! Serves the pre-built front-end, exposes the plan/feature catalog,
//! records contact submissions, and creates Stripe checkout sessions.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod notifications;
pub mod payments;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared application state injected into every handler. The database
/// connection is the only cross-request resource; services hold no caches.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// The JSON API, meant to be nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    handlers::routes()
}
