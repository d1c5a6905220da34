//! Backend endpoint paths
//!
//! Paths are relative to the configured server URL. Identifiers are
//! inserted as given.

/// Account endpoints
pub mod auth {
    /// `POST` credentials, returns user and token pair
    pub const LOGIN: &str = "/auth/login";
    /// `POST` new account, returns an unverified access token
    pub const REGISTER: &str = "/auth/register";
    /// `POST {"refresh_token"}`, returns a new access token
    pub const REFRESH: &str = "/auth/refresh";
    /// `POST {"email"}`
    pub const RESEND_VERIFICATION: &str = "/auth/resend-verification-email";

    /// True for endpoints whose 401 means rejected credentials rather than
    /// an expired session.
    pub fn is_credential_endpoint(path: &str) -> bool {
        path.contains(LOGIN) || path.contains(REGISTER)
    }
}

/// Club endpoints
pub mod clubs {
    /// List (`GET`) or create (`POST`)
    pub const LIST: &str = "/clubs";
    /// Full-text search
    pub const SEARCH: &str = "/clubs/search";
    /// Clubs ranked by activity
    pub const POPULAR: &str = "/clubs/popular";
    /// Suggestions for the signed-in user
    pub const RECOMMENDED: &str = "/clubs/recommended";
    /// Clubs the signed-in user belongs to
    pub const MINE: &str = "/clubs/me/clubs";

    pub fn detail(id: &str) -> String {
        format!("/clubs/{}", id)
    }

    pub fn members(id: &str) -> String {
        format!("/clubs/{}/members", id)
    }

    /// `POST`, adds the signed-in user to the club
    pub fn join(id: &str) -> String {
        format!("/clubs/{}/join", id)
    }

    /// `POST`, removes the signed-in user from the club
    pub fn leave(id: &str) -> String {
        format!("/clubs/{}/leave", id)
    }
}

/// University endpoints
pub mod universities {
    /// List (`GET`) or create (`POST`)
    pub const LIST: &str = "/clubs/universities";

    pub fn detail(id: &str) -> String {
        format!("/clubs/universities/{}", id)
    }
}

/// Event endpoints
///
/// Events are scoped to a club for listing and creation, and addressed
/// globally by id otherwise.
pub mod events {
    pub fn list(club_id: &str) -> String {
        format!("/clubs/{}/events", club_id)
    }

    pub fn detail(id: &str) -> String {
        format!("/clubs/events/{}", id)
    }

    pub fn register(id: &str) -> String {
        format!("/clubs/events/{}/register", id)
    }

    pub fn unregister(id: &str) -> String {
        format!("/clubs/events/{}/unregister", id)
    }

    pub fn attendees(id: &str) -> String {
        format!("/clubs/events/{}/attendees", id)
    }
}

/// Vertical (sub-group) endpoints
pub mod verticals {
    pub fn list(club_id: &str) -> String {
        format!("/clubs/{}/verticals", club_id)
    }

    pub fn detail(vertical_id: &str) -> String {
        format!("/clubs/verticals/{}", vertical_id)
    }
}
