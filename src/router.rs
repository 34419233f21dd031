//! Navigation collaborator for authorization failures.
//!
//! The HTTP client reports a 401 as a tagged error to its caller and,
//! separately, notifies an `UnauthorizedObserver`. `LoginRedirect` is
//! the policy that turns that notification into a navigation call on
//! the app router, keeping transport and UI routing decoupled.

use std::sync::Arc;

use tracing::info;

/// Route targets the core can ask the app shell to navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
}

/// Navigation surface implemented by the app shell
pub trait Router: Send + Sync {
    /// Replace the current route without pushing history
    fn replace(&self, route: Route);
}

/// Observer notified when a request comes back 401.
/// The triggering call still resolves or rejects normally to its
/// caller; this is a side channel, not error handling.
pub trait UnauthorizedObserver: Send + Sync {
    fn on_unauthorized(&self);
}

/// Redirects to the login route whenever a request is unauthorized
pub struct LoginRedirect<R: Router> {
    router: Arc<R>,
}

impl<R: Router> LoginRedirect<R> {
    pub fn new(router: Arc<R>) -> Self {
        Self { router }
    }
}

impl<R: Router> UnauthorizedObserver for LoginRedirect<R> {
    fn on_unauthorized(&self) {
        info!("Unauthorized response, redirecting to login");
        self.router.replace(Route::Login);
    }
}
