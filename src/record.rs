/// Modelo normalizado de sockets.
///
/// Todas las herramientas (ss, netstat, lsof) terminan produciendo el mismo
/// [`SocketRecord`], sin importar el dialecto de texto de origen.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::platform::Platform;

/// Estado asignado cuando la herramienta no informa ninguno.
pub const UNKNOWN_STATE: &str = "UNKNOWN";

/// Protocolo de transporte de un socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Nombre en minúsculas (`tcp` / `udp`).
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un socket observado en el momento del escaneo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketRecord {
    /// Número del puerto local
    pub port: u16,
    /// Protocolo del socket
    pub protocol: Protocol,
    /// Estado (LISTEN, ESTABLISHED...) o `UNKNOWN`
    pub state: String,
    /// PID del proceso dueño, si la herramienta lo informa
    pub pid: Option<u32>,
    /// Nombre corto del proceso según la herramienta de escaneo
    pub process_name: Option<String>,
    /// Usuario dueño (solo algunas herramientas lo reportan)
    pub user: Option<String>,
    /// Dirección local sin el sufijo de puerto
    pub local_address: String,
    /// Extremo remoto completo (`addr:port`) si el socket está conectado
    pub remote_address: Option<String>,
    /// Ruta del ejecutable, rellenada por el paso de enriquecimiento
    pub source: Option<String>,
}

impl SocketRecord {
    /// Crea un registro con los campos obligatorios y el resto ausente.
    ///
    /// El estado arranca como `UNKNOWN`.
    pub fn new(port: u16, protocol: Protocol, local_address: impl Into<String>) -> Self {
        Self {
            port,
            protocol,
            state: UNKNOWN_STATE.to_string(),
            pid: None,
            process_name: None,
            user: None,
            local_address: local_address.into(),
            remote_address: None,
            source: None,
        }
    }
}

impl fmt::Display for SocketRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.protocol.as_str().to_uppercase(),
            self.port,
            self.local_address
        )?;
        match (&self.process_name, self.pid) {
            (Some(name), Some(pid)) => write!(f, " → {} [PID {}]", name, pid),
            (None, Some(pid)) => write!(f, " → [PID {}]", pid),
            (Some(name), None) => write!(f, " → {}", name),
            (None, None) => write!(f, " → desconocido"),
        }
    }
}

/// Resultado de una invocación de escaneo.
///
/// Se crea nuevo en cada escaneo; no se cachea ni se persiste.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub records: Vec<SocketRecord>,
    pub timestamp: DateTime<Utc>,
    pub platform: Platform,
}

/// Conjunto de predicados opcionales, aplicados con AND.
///
/// Un campo `None` no impone ninguna restricción.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Puerto exacto
    pub port: Option<u16>,
    /// Protocolo exacto
    pub protocol: Option<Protocol>,
    /// Subcadena del estado (sin distinguir mayúsculas)
    pub state: Option<String>,
    /// Subcadena del nombre de proceso (sin distinguir mayúsculas)
    pub process_name: Option<String>,
    /// Subcadena de la ruta del ejecutable (sin distinguir mayúsculas)
    pub source: Option<String>,
}

impl FilterSpec {
    /// Indica si el filtro no tiene ningún predicado.
    pub fn is_empty(&self) -> bool {
        self == &FilterSpec::default()
    }
}
