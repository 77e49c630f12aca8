/// Configuración de PortScout leída de variables de entorno.
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Intervalo de actualización automática por defecto (segundos).
pub const DEFAULT_REFRESH_SECS: u64 = 10;

/// Tamaño de página por defecto de la bandeja.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Ajustes que controlan las operaciones con efectos (matar procesos)
/// y la vista de la bandeja.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// En modo demo nunca se termina ningún proceso
    pub demo_mode: bool,
    /// Habilita la terminación de procesos
    pub enable_kill: bool,
    /// Cada cuánto se reescanea en la bandeja
    pub refresh_interval: Duration,
    /// Puertos por página en la bandeja
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            enable_kill: true,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Construye la configuración desde el entorno del proceso.
    ///
    /// Variables: `PORTSCOUT_DEMO_MODE`, `PORTSCOUT_ENABLE_KILL`,
    /// `PORTSCOUT_REFRESH_SECS`, `PORTSCOUT_PAGE_SIZE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que [`Config::from_env`] pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let refresh_secs = parse_number(
            "PORTSCOUT_REFRESH_SECS",
            lookup("PORTSCOUT_REFRESH_SECS"),
            DEFAULT_REFRESH_SECS,
        );
        let page_size = parse_number(
            "PORTSCOUT_PAGE_SIZE",
            lookup("PORTSCOUT_PAGE_SIZE"),
            DEFAULT_PAGE_SIZE,
        );

        Self {
            demo_mode: parse_bool(lookup("PORTSCOUT_DEMO_MODE"), defaults.demo_mode),
            enable_kill: parse_bool(lookup("PORTSCOUT_ENABLE_KILL"), defaults.enable_kill),
            refresh_interval: Duration::from_secs(refresh_secs.max(1)),
            page_size: page_size.max(1),
        }
    }
}

/// `true` o `1` (sin distinguir mayúsculas) activan; cualquier otro valor desactiva.
fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(raw) => {
            let raw = raw.trim();
            raw.eq_ignore_ascii_case("true") || raw == "1"
        }
        None => default,
    }
}

fn parse_number<T: FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Valor inválido en {key}: {raw:?}, se usa el valor por defecto");
            default
        }),
        None => default,
    }
}
