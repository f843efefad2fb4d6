//! Query client for the external video catalog service.
//!
//! The catalog indexes scenes, tagged time-ranges within them (markers),
//! tags, and performers, and answers structured GraphQL queries over HTTP.
//! This crate is strictly read-only: the engine never mutates the catalog.

pub mod client;
pub mod queries;

pub use client::{CatalogClient, CatalogError};
pub use queries::{Marker, MarkerScene};
