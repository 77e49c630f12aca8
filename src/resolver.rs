/// Resolución de la ruta del ejecutable dueño de un PID.
///
/// Es un enriquecimiento de mejor esfuerzo: cualquier fallo (proceso
/// terminado, permisos, herramienta ausente) se traduce en `None`.
use std::path::PathBuf;

use crate::command::ToolRunner;
use crate::platform::Platform;

/// Obtiene la ruta del ejecutable de `pid` en `platform`.
///
/// - Linux: lee el enlace `/proc/<pid>/exe`, sin subprocesos.
/// - macOS: `ps -p <pid> -o comm=`.
/// - Windows: `wmic process where ProcessId=<pid> get ExecutablePath /format:list`.
///
/// # Arguments
/// * `runner` - Acceso a las herramientas del sistema
/// * `pid` - PID del proceso; si es `None` no se hace ninguna llamada
/// * `platform` - Plataforma que determina el método de consulta
///
/// # Returns
/// `Some(ruta)` si se pudo resolver, `None` en cualquier otro caso.
pub fn resolve_process_path(
    runner: &dyn ToolRunner,
    pid: Option<u32>,
    platform: Platform,
) -> Option<String> {
    let pid = pid?;

    let resolved = match platform {
        Platform::Linux => resolve_linux(runner, pid),
        Platform::MacOs => resolve_macos(runner, pid),
        Platform::Windows => resolve_windows(runner, pid),
    };

    if resolved.is_none() {
        log::debug!("No se pudo resolver el ejecutable del PID {pid}");
    }
    resolved
}

fn resolve_linux(runner: &dyn ToolRunner, pid: u32) -> Option<String> {
    let link = PathBuf::from(format!("/proc/{pid}/exe"));
    let target = runner.read_link(&link).ok()?;
    Some(target.to_string_lossy().into_owned())
}

fn resolve_macos(runner: &dyn ToolRunner, pid: u32) -> Option<String> {
    let pid = pid.to_string();
    let output = runner.run("ps", &["-p", &pid, "-o", "comm="]).ok()?;
    let command = output.trim();
    (!command.is_empty()).then(|| command.to_string())
}

fn resolve_windows(runner: &dyn ToolRunner, pid: u32) -> Option<String> {
    let filter = format!("ProcessId={pid}");
    let output = runner
        .run(
            "wmic",
            &["process", "where", &filter, "get", "ExecutablePath", "/format:list"],
        )
        .ok()?;
    extract_executable_path(&output)
}

/// Extrae el valor de `ExecutablePath=` de la salida de wmic.
fn extract_executable_path(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("ExecutablePath="))
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}
