//! Genre and privilege enumerations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Genre of a music track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackGenre {
    Rock,
    Pop,
    HipHop,
    Electronic,
    Classic,
}

impl TrackGenre {
    /// Every track genre
    pub const ALL: [TrackGenre; 5] = [
        Self::Rock,
        Self::Pop,
        Self::HipHop,
        Self::Electronic,
        Self::Classic,
    ];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Pop => "pop",
            Self::HipHop => "hip-hop",
            Self::Electronic => "electronic",
            Self::Classic => "classic",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.as_str() == s)
    }
}

impl fmt::Display for TrackGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Genre of an audiobook
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioBookGenre {
    Comedy,
    Horror,
    Thriller,
    Novel,
    Novella,
}

impl AudioBookGenre {
    /// Every audiobook genre
    pub const ALL: [AudioBookGenre; 5] = [
        Self::Comedy,
        Self::Horror,
        Self::Thriller,
        Self::Novel,
        Self::Novella,
    ];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comedy => "comedy",
            Self::Horror => "horror",
            Self::Thriller => "thriller",
            Self::Novel => "novel",
            Self::Novella => "novella",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.as_str() == s)
    }
}

impl fmt::Display for AudioBookGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Administrator privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewUsers,
    EditUsers,
    BanUsers,
    SeeAnalytics,
    InviteAdmins,
}

impl Permission {
    /// Every privilege, in declaration order
    #[must_use]
    pub fn all() -> Vec<Permission> {
        vec![
            Self::ViewUsers,
            Self::EditUsers,
            Self::BanUsers,
            Self::SeeAnalytics,
            Self::InviteAdmins,
        ]
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewUsers => "view_users",
            Self::EditUsers => "edit_users",
            Self::BanUsers => "ban_users",
            Self::SeeAnalytics => "see_analytics",
            Self::InviteAdmins => "invite_admins",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|permission| permission.as_str() == s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
