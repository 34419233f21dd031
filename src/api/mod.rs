//! REST API client module for the Sentinela backend.
//!
//! `AppClient` is the single shared HTTP transport: it injects the
//! session's bearer token into every request, maps responses to tagged
//! `ApiError`s, and notifies the unauthorized observer on 401 so a
//! policy layer can redirect to login. `CityDirectory` is a separate,
//! unauthenticated client for the public municipality directory.

pub mod cities;
pub mod client;
pub mod error;

pub use cities::{CityDirectory, DEFAULT_DIRECTORY_URL};
pub use client::{read_image_parts, AppClient, ImagePart};
pub use error::{ApiError, ApiResult};
