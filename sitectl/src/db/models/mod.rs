//! Database row models.

pub mod projects;
pub mod workers;
