//! Redirect port used when a session expires
//!
//! The API client never decides on its own how to "send the user to the
//! login page". It asks a [`Navigator`] for the current route and, unless
//! that route or the failing endpoint is public, asks it to redirect.

use std::sync::Mutex;

use colored::Colorize;

use crate::config::NavigationConfig;

/// Where the user currently is and how to move them
pub trait Navigator: Send + Sync + std::fmt::Debug {
    /// Route currently shown to the user.
    fn current_route(&self) -> String;

    /// Send the user to `route`.
    fn redirect(&self, route: &str);
}

/// True when `route` is public: an exact match, or a listed prefix followed
/// by `/`.
///
/// The root route `/` only ever matches exactly, otherwise every route
/// would be public.
///
/// # Examples
///
/// ```
/// use clubnet::navigation::is_public_route;
///
/// let public = vec!["/".to_string(), "/download".to_string()];
/// assert!(is_public_route("/download/linux", &public));
/// assert!(!is_public_route("/downloads", &public));
/// assert!(!is_public_route("/clubs", &public));
/// ```
pub fn is_public_route(route: &str, public_routes: &[String]) -> bool {
    public_routes.iter().any(|public| {
        if route == public {
            return true;
        }
        if public == "/" {
            return false;
        }
        route
            .strip_prefix(public.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// True when the request path contains one of the public endpoint fragments.
pub fn is_public_endpoint(path: &str, public_endpoints: &[String]) -> bool {
    public_endpoints
        .iter()
        .any(|fragment| path.contains(fragment.as_str()))
}

/// Decide whether an expired session on `path` should redirect away from
/// the navigator's current route.
pub fn should_redirect(navigator: &dyn Navigator, path: &str, config: &NavigationConfig) -> bool {
    let route = navigator.current_route();
    !is_public_route(&route, &config.public_routes)
        && !is_public_endpoint(path, &config.public_endpoints)
}

/// Navigator for the command-line binary
///
/// The CLI has no pages; its "login surface" is the `clubnet login`
/// command, so a redirect prints a hint on stderr.
#[derive(Debug, Clone)]
pub struct TerminalNavigator {
    route: String,
}

impl TerminalNavigator {
    /// Navigator reporting `route` as the current location.
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

impl Navigator for TerminalNavigator {
    fn current_route(&self) -> String {
        self.route.clone()
    }

    fn redirect(&self, route: &str) {
        tracing::debug!("Redirecting to {}", route);
        eprintln!(
            "{} Your session has expired. Run {} to sign in again.",
            "!".yellow().bold(),
            "clubnet login".cyan()
        );
    }
}

/// Navigator that records redirects instead of performing them
#[derive(Debug)]
pub struct RecordingNavigator {
    route: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Start at `route` with no redirects recorded.
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: Mutex::new(route.into()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Routes passed to [`Navigator::redirect`], oldest first.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Move to a different route.
    pub fn set_route(&self, route: impl Into<String>) {
        if let Ok(mut current) = self.route.lock() {
            *current = route.into();
        }
    }
}

impl Navigator for RecordingNavigator {
    fn current_route(&self) -> String {
        self.route
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn redirect(&self, route: &str) {
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(route.to_string());
        }
        self.set_route(route);
    }
}
