/// Plataformas soportadas por el escáner.
///
/// Se modela como enum cerrado para que cada `match` sea exhaustivo:
/// añadir una plataforma obliga a revisar parsers, resolver y killer.
use serde::Serialize;
use std::fmt;

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    #[serde(rename = "linux")]
    Linux,
    #[serde(rename = "darwin")]
    MacOs,
    #[serde(rename = "win32")]
    Windows,
}

impl Platform {
    /// Detecta la plataforma en la que corre el proceso actual.
    ///
    /// # Returns
    /// `Err(ScanError::UnsupportedPlatform)` si no es Linux, macOS ni Windows.
    pub fn current() -> Result<Self, ScanError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Convierte un nombre de sistema operativo (`std::env::consts::OS`
    /// o los identificadores `darwin`/`win32`) en una plataforma.
    pub fn from_os(os: &str) -> Result<Self, ScanError> {
        match os {
            "linux" => Ok(Platform::Linux),
            "macos" | "darwin" => Ok(Platform::MacOs),
            "windows" | "win32" => Ok(Platform::Windows),
            other => Err(ScanError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Identificador corto usado en la salida (`linux`, `darwin`, `win32`).
    pub fn identifier(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "darwin",
            Platform::Windows => "win32",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
