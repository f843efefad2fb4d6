//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod actor;
pub mod item;
pub mod job_run;
pub mod playlist;
pub mod playlist_item;
pub mod setting;
pub mod sync;
pub mod template;
