//! Factory profiles.
//!
//! A profile ("factory") is a flat `KEY=VALUE` file describing one
//! conversion or streaming recipe. `ProfileStore` loads profiles by name,
//! lists the factory directory and resolves which profile owns a file
//! handed over by an external file-system event source.

mod error;
mod store;
mod types;

pub use error::ProfileError;
pub use store::ProfileStore;
pub use types::{is_truthy, keys, Profile, ProfileDescriptor};
