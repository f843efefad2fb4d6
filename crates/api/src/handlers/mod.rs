//! HTTP handler implementations, one module per resource.

pub mod actors;
pub mod health;
pub mod history;
pub mod jobs;
pub mod playlists;
pub mod schedules;
pub mod settings;
pub mod templates;
