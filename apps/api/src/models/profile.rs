use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A full row from `profiles`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ProfileRow {
    pub id: i32,
    pub profile_name: String,
    pub profile_text_base: String,
    pub profile_text_addon: String,
}

/// Listing projection of a profile. The base text is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ProfileSummary {
    pub id: i32,
    pub profile_name: String,
    pub profile_text_addon: String,
}

impl From<&ProfileRow> for ProfileSummary {
    fn from(row: &ProfileRow) -> Self {
        ProfileSummary {
            id: row.id,
            profile_name: row.profile_name.clone(),
            profile_text_addon: row.profile_text_addon.clone(),
        }
    }
}

/// The editable subset of a profile, one variant per combination of supplied fields.
/// `profile_text_base` has no variant: it cannot be changed after creation.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileChanges {
    Name(String),
    Addon(String),
    Both { name: String, addon: String },
}

impl ProfileChanges {
    /// Returns `None` when neither field is supplied.
    pub fn from_parts(name: Option<String>, addon: Option<String>) -> Option<Self> {
        match (name, addon) {
            (Some(name), Some(addon)) => Some(ProfileChanges::Both { name, addon }),
            (Some(name), None) => Some(ProfileChanges::Name(name)),
            (None, Some(addon)) => Some(ProfileChanges::Addon(addon)),
            (None, None) => None,
        }
    }
}
