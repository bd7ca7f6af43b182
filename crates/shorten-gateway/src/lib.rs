//! HTTP gateway of the Shorten URL shortener.
//!
//! Exposes `POST /` to shorten a URL, `GET /{key}` to redirect to it and
//! `DELETE /{key}` to remove it, on top of any [`Shortener`](shorten_core::Shortener).

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
