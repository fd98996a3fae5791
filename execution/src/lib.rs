//! Portal engine for snackquest.
//!
//! Every component talks to storage through [`store::Store`]; the HTTP
//! node layers cookies and routing on top without ever reaching into the
//! tables directly. Ledger concurrency is delegated to the storage
//! layer's atomic upsert-with-addition, so no component holds an
//! application-level lock.

pub mod auth;
pub mod directory;
pub mod ledger;
pub mod register;
pub mod rewards;
pub mod store;

pub use auth::SessionAuthority;
pub use rewards::{resolve_outcome, RewardOutcome, RewardSchedule};
pub use store::Store;
