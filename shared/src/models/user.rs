//! User Model
//!
//! Minimal staff directory: enough to attribute cuts and expenses to an
//! operator and render a display name. Authentication lives outside this
//! service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// admin | empleado
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// "First Last", falling back to the username when both names are empty.
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Create user payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "empleado".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_username() {
        let u = User {
            id: 1,
            username: "lhernandez".into(),
            first_name: None,
            last_name: None,
            email: None,
            role: "admin".into(),
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(u.display_name(), "lhernandez");

        let named = User {
            first_name: Some("Luis".into()),
            last_name: Some("Hernández".into()),
            ..u
        };
        assert_eq!(named.display_name(), "Luis Hernández");
    }
}
