//! Sentinela core - session, authenticated API client, and data models
//! for the Sentinela community safety app.
//!
//! The UI shell (screens, maps, navigation) talks to the backend only
//! through this crate. The intended lifecycle:
//!
//! 1. Build a [`Session`] over a [`TokenStore`] and `hydrate()` it once
//!    at startup, before any authenticated screen is shown.
//! 2. Hand the session (behind `Arc`) to an [`AppClient`]; every
//!    request then carries `Authorization: Bearer <token>` while the
//!    session is signed in.
//! 3. Wire a [`LoginRedirect`] over the shell's [`Router`] so a 401 on
//!    any call navigates back to the login screen. The failing call
//!    still gets its error; the session is never cleared implicitly.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;
pub mod utils;

pub use api::{ApiError, ApiResult, AppClient, CityDirectory, ImagePart};
pub use auth::{Credentials, Session, SessionStatus, TokenStore};
pub use config::Config;
pub use router::{LoginRedirect, Route, Router, UnauthorizedObserver};
