//! Shared domain and API types for the snackquest portal.

pub mod api;
mod constants;
mod error;
mod resources;
mod user;

pub use constants::*;
pub use error::EngineError;
pub use resources::{Balances, Character, GrantSet, SnackKind};
pub use user::{NewUser, User, UserSummary};
