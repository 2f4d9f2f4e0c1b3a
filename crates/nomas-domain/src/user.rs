//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role stored on every user profile.
///
/// Wire format: the upper-case name (`"ADMIN"`, `"CLIENTE"`, `"PROFESIONAL"`).
/// Same text is persisted in the `user_profiles.rol` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rol {
    Admin,
    #[default]
    Cliente,
    Profesional,
}

/// Returned when a string is not one of the known [`Rol`] names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rol: {0}")]
pub struct UnknownRol(pub String);

impl Rol {
    pub const ALL: [Rol; 3] = [Rol::Admin, Rol::Cliente, Rol::Profesional];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Cliente => "CLIENTE",
            Self::Profesional => "PROFESIONAL",
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rol {
    type Err = UnknownRol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rol::ALL
            .into_iter()
            .find(|rol| rol.as_str() == s)
            .ok_or_else(|| UnknownRol(s.to_owned()))
    }
}

/// Human-readable name for a user: `"first last"` trimmed, or the username
/// when both name parts are blank.
pub fn display_name(first_name: &str, last_name: &str, username: &str) -> String {
    let full = format!("{first_name} {last_name}");
    let full = full.trim();
    if full.is_empty() {
        username.to_owned()
    } else {
        full.to_owned()
    }
}
