/// Módulo del system tray (bandeja del sistema).
///
/// Muestra los sockets detectados usando el protocolo
/// StatusNotifierItem/AppIndicator de Linux.
///
/// ## Características del menú:
/// - Filtro por protocolo (TCP / UDP / Todos)
/// - Paginación configurable (5 o 10 puertos por página)
/// - Cierre individual y masivo de procesos
/// - Actualización automática periódica
use ksni::{self, menu::StandardItem, menu::SubMenu, Tray};
use std::process;
use std::sync::{Arc, Mutex};

use portscout::command::SystemRunner;
use portscout::config::Config;
use portscout::{filter_records, killer, port_scanner, FilterSpec, Platform, Protocol, SocketRecord};

// ─────────────────────────────────────────────────────────────
// Filtro de protocolo y paginación
// ─────────────────────────────────────────────────────────────

/// Filtro de protocolo seleccionable desde el menú.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFilter {
    All,
    Tcp,
    Udp,
}

impl ProtocolFilter {
    fn label(self) -> &'static str {
        match self {
            ProtocolFilter::All => "Todos",
            ProtocolFilter::Tcp => "TCP",
            ProtocolFilter::Udp => "UDP",
        }
    }

    /// Traduce la opción del menú al filtro del núcleo.
    fn to_filter_spec(self) -> FilterSpec {
        let protocol = match self {
            ProtocolFilter::All => None,
            ProtocolFilter::Tcp => Some(Protocol::Tcp),
            ProtocolFilter::Udp => Some(Protocol::Udp),
        };
        FilterSpec {
            protocol,
            ..Default::default()
        }
    }
}

/// Número de páginas necesarias para `total` elementos.
fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Elementos de la página `page` (base 0); vacío si está fuera de rango.
fn page_slice(records: &[SocketRecord], page: usize, page_size: usize) -> &[SocketRecord] {
    let start = page.saturating_mul(page_size).min(records.len());
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// Escanea y devuelve los registros; un fallo de escaneo deja la lista vacía.
fn scan_records() -> Vec<SocketRecord> {
    match port_scanner::scan() {
        Ok(result) => result.records,
        Err(e) => {
            log::error!("Error escaneando puertos: {}", e);
            Vec::new()
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Estado del tray con filtros y paginación
// ─────────────────────────────────────────────────────────────

/// Estado compartido del tray: registros del último escaneo y
/// configuración de visualización.
#[derive(Debug)]
pub struct ScoutTray {
    /// Registros detectados en el último escaneo
    records: Arc<Mutex<Vec<SocketRecord>>>,
    /// Filtro de protocolo activo
    protocol_filter: ProtocolFilter,
    /// Página actual (base 0)
    current_page: usize,
    /// Cantidad de registros por página
    page_size: usize,
    config: Config,
}

impl ScoutTray {
    /// Crea el tray con un escaneo inicial.
    pub fn new(config: Config) -> Self {
        let records = scan_records();
        log::info!("Escaneo inicial: {} sockets detectados", records.len());
        Self {
            records: Arc::new(Mutex::new(records)),
            protocol_filter: ProtocolFilter::All,
            current_page: 0,
            page_size: config.page_size,
            config,
        }
    }

    /// Referencia compartida a los registros para el hilo de actualización.
    pub fn records_handle(&self) -> Arc<Mutex<Vec<SocketRecord>>> {
        Arc::clone(&self.records)
    }

    /// Reescanea y vuelve a la primera página.
    fn refresh(&mut self) {
        log::info!("Actualizando lista de puertos...");
        let new_records = scan_records();
        if let Ok(mut records) = self.records.lock() {
            *records = new_records;
        }
        self.current_page = 0;
    }

    fn filtered_records(&self) -> Vec<SocketRecord> {
        let current = match self.records.lock() {
            Ok(records) => records.clone(),
            Err(_) => Vec::new(),
        };
        filter_records(&current, &self.protocol_filter.to_filter_spec())
    }
}

// ─────────────────────────────────────────────────────────────
// Implementación del menú contextual del tray
// ─────────────────────────────────────────────────────────────

impl Tray for ScoutTray {
    fn icon_name(&self) -> String {
        "network-server".into()
    }

    fn title(&self) -> String {
        "PortScout 🔎".into()
    }

    fn id(&self) -> String {
        "portscout".into()
    }

    /// Construye el menú contextual dinámico.
    ///
    /// ```text
    /// 🔄 Actualizar
    /// 📊 Filtro: [Todos|TCP|UDP] ▸
    /// 📋 Por página: [5|10] ▸
    /// ⚔️ Cerrar Todos (N puertos)
    /// 🔴 TCP 8080 (0.0.0.0) → node [PID 1234]
    /// ◀ Anterior | Página X/Y | ▶ Siguiente
    /// ❌ Salir
    /// ```
    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        let mut items: Vec<ksni::MenuItem<Self>> = vec![
            build_refresh_item(),
            ksni::MenuItem::Separator,
            build_filter_submenu(self.protocol_filter),
            build_page_size_submenu(self.page_size),
            ksni::MenuItem::Separator,
        ];

        let filtered = self.filtered_records();
        let total = filtered.len();
        let pages = total_pages(total, self.page_size);
        let safe_page = self.current_page.min(pages.saturating_sub(1));

        if total == 0 {
            items.push(build_empty_message());
        } else {
            items.push(build_kill_all_item(total));
            items.push(ksni::MenuItem::Separator);
            items.push(build_count_header(total, self.protocol_filter));
            for record in page_slice(&filtered, safe_page, self.page_size) {
                items.push(build_record_item(record));
            }
        }

        if pages > 1 {
            items.push(ksni::MenuItem::Separator);
            items.extend(build_navigation_items(safe_page, pages));
        }

        items.push(ksni::MenuItem::Separator);
        items.push(build_exit_item());

        items
    }
}

// ─────────────────────────────────────────────────────────────
// Constructores de items del menú
// ─────────────────────────────────────────────────────────────

fn build_refresh_item() -> ksni::MenuItem<ScoutTray> {
    StandardItem {
        label: "🔄 Actualizar".into(),
        activate: Box::new(|tray: &mut ScoutTray| tray.refresh()),
        ..Default::default()
    }
    .into()
}

/// Submenú de filtro de protocolo, con ● en la opción activa.
fn build_filter_submenu(current_filter: ProtocolFilter) -> ksni::MenuItem<ScoutTray> {
    let filters = [ProtocolFilter::All, ProtocolFilter::Tcp, ProtocolFilter::Udp];

    let submenu: Vec<ksni::MenuItem<ScoutTray>> = filters
        .iter()
        .map(|&filter| {
            let indicator = if filter == current_filter { "●" } else { "○" };
            StandardItem {
                label: format!("{} {}", indicator, filter.label()),
                activate: Box::new(move |tray: &mut ScoutTray| {
                    log::info!("Filtro cambiado a: {}", filter.label());
                    tray.protocol_filter = filter;
                    tray.current_page = 0;
                }),
                ..Default::default()
            }
            .into()
        })
        .collect();

    SubMenu {
        label: format!("📊 Filtro: {}", current_filter.label()),
        submenu,
        ..Default::default()
    }
    .into()
}

fn build_page_size_submenu(current_size: usize) -> ksni::MenuItem<ScoutTray> {
    let submenu: Vec<ksni::MenuItem<ScoutTray>> = [5usize, 10]
        .iter()
        .map(|&size| {
            let indicator = if size == current_size { "●" } else { "○" };
            StandardItem {
                label: format!("{} {} puertos", indicator, size),
                activate: Box::new(move |tray: &mut ScoutTray| {
                    log::info!("Tamaño de página cambiado a: {}", size);
                    tray.page_size = size;
                    tray.current_page = 0;
                }),
                ..Default::default()
            }
            .into()
        })
        .collect();

    SubMenu {
        label: format!("📋 Por página: {}", current_size),
        submenu,
        ..Default::default()
    }
    .into()
}

fn build_empty_message() -> ksni::MenuItem<ScoutTray> {
    StandardItem {
        label: "✅ No hay puertos abiertos".into(),
        enabled: false,
        ..Default::default()
    }
    .into()
}

fn build_count_header(total: usize, filter: ProtocolFilter) -> ksni::MenuItem<ScoutTray> {
    let filter_label = match filter {
        ProtocolFilter::All => String::new(),
        _ => format!(" ({})", filter.label()),
    };

    StandardItem {
        label: format!("📡 {} puertos encontrados{}", total, filter_label),
        enabled: false,
        ..Default::default()
    }
    .into()
}

/// "⚔️ Cerrar Todos": termina los procesos de los registros visibles con el filtro actual.
fn build_kill_all_item(total: usize) -> ksni::MenuItem<ScoutTray> {
    StandardItem {
        label: format!("⚔️ Cerrar Todos ({} puertos)", total),
        activate: Box::new(|tray: &mut ScoutTray| {
            log::info!("Cerrando todos los puertos...");
            let records = tray.filtered_records();
            match Platform::current() {
                Ok(platform) => {
                    match killer::kill_all(&SystemRunner, &records, platform, &tray.config) {
                        Ok(count) => log::info!("{} procesos terminados", count),
                        Err(e) => log::error!("Error al cerrar puertos: {}", e),
                    }
                }
                Err(e) => log::error!("{}", e),
            }
            tray.refresh();
        }),
        ..Default::default()
    }
    .into()
}

/// Item de un registro; sin PID no se puede cerrar y aparece deshabilitado.
///
/// - 🔴 PID conocido
/// - 🟡 PID desconocido (p. ej. proceso de otro usuario sin permisos)
fn build_record_item(record: &SocketRecord) -> ksni::MenuItem<ScoutTray> {
    let icon = if record.pid.is_some() { "🔴" } else { "🟡" };
    let label = format!("{} {}", icon, record);
    let pid = record.pid;
    let port = record.port;

    StandardItem {
        label,
        enabled: pid.is_some(),
        activate: Box::new(move |tray: &mut ScoutTray| {
            let Some(pid) = pid else { return };
            log::info!("Cerrando puerto {} (PID: {})", port, pid);
            let result = Platform::current()
                .map_err(|e| e.to_string())
                .and_then(|platform| {
                    killer::kill_process(&SystemRunner, pid, platform, &tray.config)
                        .map_err(|e| e.to_string())
                });
            match result {
                Ok(()) => log::info!("Puerto {} cerrado exitosamente", port),
                Err(e) => log::error!("Error cerrando puerto {}: {}", port, e),
            }
            tray.refresh();
        }),
        ..Default::default()
    }
    .into()
}

/// ◀ Anterior | Página X/Y | ▶ Siguiente
fn build_navigation_items(current_page: usize, pages: usize) -> Vec<ksni::MenuItem<ScoutTray>> {
    vec![
        StandardItem {
            label: "◀ Anterior".into(),
            enabled: current_page > 0,
            activate: Box::new(|tray: &mut ScoutTray| {
                tray.current_page = tray.current_page.saturating_sub(1);
            }),
            ..Default::default()
        }
        .into(),
        StandardItem {
            label: format!("📄 Página {}/{}", current_page + 1, pages),
            enabled: false,
            ..Default::default()
        }
        .into(),
        StandardItem {
            label: "▶ Siguiente".into(),
            enabled: current_page + 1 < pages,
            activate: Box::new(move |tray: &mut ScoutTray| {
                if tray.current_page + 1 < pages {
                    tray.current_page += 1;
                }
            }),
            ..Default::default()
        }
        .into(),
    ]
}

fn build_exit_item() -> ksni::MenuItem<ScoutTray> {
    StandardItem {
        label: "❌ Salir".into(),
        activate: Box::new(|_: &mut ScoutTray| {
            log::info!("PortScout cerrándose...");
            process::exit(0);
        }),
        ..Default::default()
    }
    .into()
}

// ─────────────────────────────────────────────────────────────
// Inicio del servicio system tray
// ─────────────────────────────────────────────────────────────

/// Inicia el system tray y bloquea el hilo principal.
///
/// Un hilo aparte reescanea cada `config.refresh_interval` y pide al
/// tray que reconstruya el menú.
pub fn run_tray(config: Config) {
    log::info!("Iniciando PortScout system tray...");

    let interval = config.refresh_interval;
    let tray = ScoutTray::new(config);
    let records_handle = tray.records_handle();

    let service = ksni::TrayService::new(tray);
    let handle = service.handle();

    std::thread::spawn(move || loop {
        std::thread::sleep(interval);

        let new_records = scan_records();
        if let Ok(mut records) = records_handle.lock() {
            *records = new_records;
        }

        handle.update(|_tray: &mut ScoutTray| {
            log::debug!("Menú actualizado automáticamente");
        });
    });

    if let Err(e) = service.run() {
        log::error!("Error ejecutando el servicio de tray: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(count: u16) -> Vec<SocketRecord> {
        (1..=count)
            .map(|port| SocketRecord::new(port, Protocol::Tcp, "0.0.0.0"))
            .collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 0), 0);
    }

    #[test]
    fn test_page_slice_bounds() {
        let all = records(12);
        assert_eq!(page_slice(&all, 0, 5).len(), 5);
        assert_eq!(page_slice(&all, 2, 5).len(), 2);
        assert_eq!(page_slice(&all, 2, 5)[0].port, 11);
        assert!(page_slice(&all, 9, 5).is_empty());
    }

    #[test]
    fn test_protocol_filter_spec() {
        assert!(ProtocolFilter::All.to_filter_spec().is_empty());
        assert_eq!(
            ProtocolFilter::Udp.to_filter_spec().protocol,
            Some(Protocol::Udp)
        );
    }
}
