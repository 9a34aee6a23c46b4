//! Route authorization core
//!
//! This module holds the permission table and option types, the capability
//! contract to the identity layer, and the guard object that resolves and
//! checks routes.

pub mod types;
pub mod capability;
pub mod route_guard;

pub use types::*;
pub use capability::*;
pub use route_guard::*;
