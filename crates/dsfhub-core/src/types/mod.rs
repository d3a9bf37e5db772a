//! Type definitions for resource configurations, field schemas and query parameters

mod configuration;
mod params;
mod schema;
mod unordered_set;

pub use configuration::*;
pub use params::*;
pub use schema::*;
pub use unordered_set::*;

pub(crate) use configuration::join_path;
