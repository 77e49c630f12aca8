//! Tipos de error de PortScout.
//!
//! Solo [`ScanError`] cruza el límite del núcleo de escaneo. Las líneas
//! mal formadas y los fallos de enriquecimiento nunca se convierten en
//! errores: se degradan a datos ausentes.
use thiserror::Error;

/// Fallos a nivel de escaneo completo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// El sistema operativo actual no está soportado (no hay fallback posible).
    #[error("plataforma no soportada: {0}")]
    UnsupportedPlatform(String),

    /// Se agotó la cadena de herramientas (primaria + fallback).
    #[error("no hay ninguna herramienta compatible disponible: {0}")]
    NoCompatibleTool(String),
}

/// Fallo al invocar una herramienta externa (ss, netstat, lsof, ps, wmic...).
///
/// Es interno: el orquestador lo usa para decidir el fallback y nunca
/// lo devuelve directamente al llamador.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("comando no encontrado: {0}")]
    NotFound(String),

    #[error("no se pudo ejecutar {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} terminó con código {code:?}: {stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errores de la operación de terminación de procesos.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KillError {
    #[error("la terminación de procesos está deshabilitada")]
    Disabled,

    #[error("modo demo activo: no se terminan procesos")]
    DemoMode,

    #[error("PID inválido: {0}")]
    InvalidPid(u32),

    #[error("no se pudo matar el proceso {pid}: {reason}")]
    Failed { pid: u32, reason: String },
}
