//! Data models
//!
//! Each resource lives in one JSON document in the key-value store; the
//! `*Document` types are those documents. Field names are camelCase on the
//! wire because the site scripts read them directly.

pub mod admin_user;
pub mod board;
pub mod event;
pub mod member;
pub mod position;
pub mod task;
pub mod ticket;
pub mod verification;

// Re-exports
pub use admin_user::*;
pub use board::*;
pub use event::*;
pub use member::*;
pub use position::*;
pub use task::*;
pub use ticket::*;
pub use verification::*;
