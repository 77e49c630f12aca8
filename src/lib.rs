//! # PortScout 🔎
//!
//! Enumera los sockets abiertos de la máquina local y los cruza con los
//! procesos que los poseen.
//!
//! ## Flujo
//! 1. [`port_scanner`] elige la herramienta de la plataforma (`ss`, `lsof`
//!    o `netstat`) con fallback.
//! 2. [`parser`] convierte su salida de texto en [`SocketRecord`]s.
//! 3. [`resolver`] añade la ruta del ejecutable de cada PID.
//! 4. [`filter`] aplica un [`FilterSpec`] opcional.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod killer;
pub mod parser;
pub mod platform;
pub mod port_scanner;
pub mod record;
pub mod resolver;

pub use error::{KillError, ScanError, ToolError};
pub use filter::{filter_records, ScanSummary};
pub use platform::Platform;
pub use port_scanner::{scan, scan_with};
pub use record::{FilterSpec, Protocol, ScanResult, SocketRecord};
