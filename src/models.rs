//! Records returned by the clubs backend

use serde::{Deserialize, Serialize};

/// Verification state of a university
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniversityStatus {
    Pending,
    Verified,
    Rejected,
}

/// A university registered on the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub university_id: String,
    pub name: String,
    /// Email domain students sign up with
    pub domain: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub status: UniversityStatus,
}

/// A student club
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub club_id: String,
    pub university_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub member_count: u64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Role of a member within a club, most privileged first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Lead,
    Member,
}

impl MemberRole {
    /// Owners and admins manage membership.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Pending,
    Suspended,
}

/// Membership of a user in a club
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubMember {
    pub member_id: String,
    pub club_id: String,
    pub user_id: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    /// ISO-8601 timestamp as sent by the backend
    pub joined_at: String,
}

/// A club event
///
/// Times are kept exactly as the backend formats them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub club_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub attendee_count: u64,
}

impl Event {
    /// Where the event happens, for display.
    pub fn venue(&self) -> &str {
        match (&self.location, self.is_virtual) {
            (Some(location), _) => location,
            (None, true) => "online",
            (None, false) => "TBA",
        }
    }
}

/// List response, either a bare array or wrapped in `{"data": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Wrapped {
        #[serde(alias = "items", alias = "results")]
        data: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Wrapped { data: items } => items,
        }
    }
}
