//! Core library for Folio.
//!
//! Contains the typed portfolio document and its built-in defaults, the
//! repository that binds a [`folio_storage::DocumentStore`] to the single
//! well-known portfolio document, the admin credential resolver, and the
//! HMAC token codec. This crate knows nothing about HTTP.

pub mod credential;
pub mod defaults;
pub mod document;
pub mod error;
pub mod repository;
pub mod token;
