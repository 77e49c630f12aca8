/// Ejecución de herramientas externas del sistema.
///
/// Todas las invocaciones pasan un vector de argumentos directamente a
/// `std::process::Command`: nunca se construye una línea de shell, así que
/// ningún PID ni ruta se interpola en un intérprete.
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ToolError;

/// Acceso del núcleo a las herramientas y pseudo-ficheros del sistema.
///
/// Existe como trait para poder sustituirlo por un doble en los tests.
pub trait ToolRunner {
    /// Ejecuta `program` con `args` y devuelve su stdout.
    ///
    /// Un código de salida distinto de cero se considera fallo.
    fn run(&self, program: &str, args: &[&str]) -> Result<String, ToolError>;

    /// Lee el destino de un enlace simbólico (p. ej. `/proc/<pid>/exe`).
    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }
}

/// Implementación real basada en `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, ToolError> {
        log::debug!("Ejecutando: {} {}", program, args.join(" "));

        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ToolError::NotFound(program.to_string())
            } else {
                ToolError::Spawn {
                    program: program.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !output.status.success() {
            return Err(ToolError::NonZeroExit {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // netstat en Windows puede escribir en la página de códigos local
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_not_found() {
        let result = SystemRunner.run("portscout-herramienta-inexistente", &[]);
        assert_eq!(
            result,
            Err(ToolError::NotFound(
                "portscout-herramienta-inexistente".to_string()
            ))
        );
    }
}
