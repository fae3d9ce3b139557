// src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fallback shown when a user has neither a name nor an email on file.
pub const ANONYMOUS: &str = "Anonymous";

/// Represents the 'profiles' table, owned by the auth provider. Read only.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Picks the best available label for a possibly missing profile.
pub fn display_name(profile: Option<&Profile>) -> String {
    profile
        .and_then(|p| {
            p.full_name
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .or(p.email.as_deref())
        })
        .unwrap_or(ANONYMOUS)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name_then_email() {
        let mut profile = Profile {
            id: Uuid::new_v4(),
            full_name: Some("Ada Lovelace".into()),
            email: Some("ada@example.com".into()),
        };
        assert_eq!(display_name(Some(&profile)), "Ada Lovelace");

        profile.full_name = Some("   ".into());
        assert_eq!(display_name(Some(&profile)), "ada@example.com");

        profile.email = None;
        assert_eq!(display_name(Some(&profile)), ANONYMOUS);
        assert_eq!(display_name(None), ANONYMOUS);
    }
}
