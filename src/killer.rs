/// Terminación de procesos por PID.
///
/// Operación separada del escaneo y protegida por la configuración:
/// en modo demo o con la terminación deshabilitada no se ejecuta nada.
use crate::command::ToolRunner;
use crate::config::Config;
use crate::error::KillError;
use crate::platform::Platform;
use crate::record::SocketRecord;

/// Mata un proceso por su PID de forma forzada.
///
/// - Linux: `kill -9 <pid>`; si falla por permisos, reintenta con `pkexec`
///   para pedir credenciales de forma gráfica.
/// - macOS: `kill -9 <pid>`.
/// - Windows: `taskkill /PID <pid> /F`.
///
/// # Arguments
/// * `runner` - Acceso a las herramientas del sistema
/// * `pid` - ID del proceso a terminar
/// * `platform` - Plataforma que determina el comando
/// * `config` - Configuración con los flags `demo_mode` / `enable_kill`
///
/// # Returns
/// `Ok(())` si el proceso fue terminado, `Err(KillError)` en caso contrario.
pub fn kill_process(
    runner: &dyn ToolRunner,
    pid: u32,
    platform: Platform,
    config: &Config,
) -> Result<(), KillError> {
    check_allowed(config)?;
    if pid == 0 {
        return Err(KillError::InvalidPid(pid));
    }

    log::info!("Intentando matar proceso con PID: {}", pid);
    let pid_arg = pid.to_string();

    let result = match platform {
        Platform::Windows => runner.run("taskkill", &["/PID", &pid_arg, "/F"]),
        Platform::Linux | Platform::MacOs => runner.run("kill", &["-9", &pid_arg]),
    };

    match result {
        Ok(_) => {
            log::info!("Proceso {} terminado exitosamente", pid);
            Ok(())
        }
        Err(e) if platform == Platform::Linux => {
            log::warn!("Kill sin permisos falló ({e}), intentando con pkexec...");
            runner
                .run("pkexec", &["kill", "-9", &pid_arg])
                .map(|_| log::info!("Proceso {} terminado con permisos elevados", pid))
                .map_err(|e| KillError::Failed {
                    pid,
                    reason: e.to_string(),
                })
        }
        Err(e) => Err(KillError::Failed {
            pid,
            reason: e.to_string(),
        }),
    }
}

/// Mata todos los procesos dueños de los registros indicados.
///
/// Recopila PIDs únicos para no intentar matar el mismo proceso varias
/// veces; los registros sin PID se ignoran.
///
/// # Returns
/// `Ok(cantidad)` con el número de procesos terminados, o el primer
/// error si no se pudo terminar ninguno.
pub fn kill_all(
    runner: &dyn ToolRunner,
    records: &[SocketRecord],
    platform: Platform,
    config: &Config,
) -> Result<usize, KillError> {
    check_allowed(config)?;

    let mut unique_pids: Vec<u32> = records.iter().filter_map(|r| r.pid).collect();
    unique_pids.sort_unstable();
    unique_pids.dedup();

    let mut killed_count = 0;
    let mut errors: Vec<KillError> = Vec::new();

    for pid in unique_pids {
        match kill_process(runner, pid, platform, config) {
            Ok(()) => killed_count += 1,
            Err(e) => errors.push(e),
        }
    }

    match errors.into_iter().next() {
        Some(first) if killed_count == 0 => Err(first),
        Some(first) => {
            log::warn!(
                "Se mataron {} procesos, pero hubo errores (primero: {})",
                killed_count,
                first
            );
            Ok(killed_count)
        }
        None => Ok(killed_count),
    }
}

fn check_allowed(config: &Config) -> Result<(), KillError> {
    if config.demo_mode {
        return Err(KillError::DemoMode);
    }
    if !config.enable_kill {
        return Err(KillError::Disabled);
    }
    Ok(())
}
