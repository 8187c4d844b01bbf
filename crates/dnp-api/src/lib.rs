// dnp-api: Async Rust client for the do-not-play backend REST API
//
// Every endpoint answers with the `{success, data?, message?}` envelope.
// The client strips it and hands callers the typed payload or an `Error`.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod analytics;
mod artists;
mod categories;
mod connections;
mod dnp_list;
mod enforcement;
mod offenses;
mod sync;

pub use auth::Session;
pub use client::DnpClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
