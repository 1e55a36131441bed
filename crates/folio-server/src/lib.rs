//! Folio HTTP server.
//!
//! Wires the portfolio repository, credential resolver and token codec from
//! `folio-core` to a document store from `folio-storage`, and serves the
//! JSON API at `/api/*`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use routes::build_router;
