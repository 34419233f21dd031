//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `TokenStore`: durable persistence of the credential record
//! - `Session`: the in-memory authority for who is signed in
//!
//! The credential record is persisted as JSON under a single file in
//! the app data directory and loaded once at startup via `hydrate()`.

pub mod session;
pub mod store;

pub use session::{Credentials, Session, SessionStatus};
pub use store::TokenStore;
