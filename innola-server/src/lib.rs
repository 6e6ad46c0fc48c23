//! innola-server: the IN-NOLA community site service
//!
//! Serves the static site plus its JSON API: board bios, events, volunteer
//! tech tickets, the dashboard task board, village map positions, the
//! contact form, and the member roster with signed QR verification. Every
//! resource is a JSON document in a key-value store.

pub mod api;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod kv;
pub mod membership;
pub mod seed;
pub mod state;

pub use config::Config;
pub use state::AppState;
