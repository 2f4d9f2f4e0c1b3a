//! Training-session (clase) domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a clase request.
///
/// New requests start as [`EstadoClase::Pendiente`]. Any other value is set
/// explicitly through an update; there are no automatic transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoClase {
    #[default]
    Pendiente,
    Asignada,
    Aceptada,
    Rechazada,
    Completada,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown estado: {0}")]
pub struct UnknownEstado(pub String);

impl EstadoClase {
    pub const ALL: [EstadoClase; 5] = [
        EstadoClase::Pendiente,
        EstadoClase::Asignada,
        EstadoClase::Aceptada,
        EstadoClase::Rechazada,
        EstadoClase::Completada,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::Asignada => "ASIGNADA",
            Self::Aceptada => "ACEPTADA",
            Self::Rechazada => "RECHAZADA",
            Self::Completada => "COMPLETADA",
        }
    }
}

impl fmt::Display for EstadoClase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoClase {
    type Err = UnknownEstado;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EstadoClase::ALL
            .into_iter()
            .find(|estado| estado.as_str() == s)
            .ok_or_else(|| UnknownEstado(s.to_owned()))
    }
}
