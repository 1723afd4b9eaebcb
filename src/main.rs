// ==========================================
// TIPO DE PROCESO 分类系统 - 命令行入口
// ==========================================
// 命令:
// - procesar <reporte> [-o salida] [--formato csv|json]
// - estadisticas
// - nuevos <reporte>
// - convertir <origen> <destino.json>
// - agregar-item <item> --formato-codigo <codigo> [--descripcion texto]
// - agregar-codigo <item> --observaciones <texto> [--criterio texto]
// - config mostrar | set <clave> <valor> | limpiar
// - limpiar-archivos
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tipo_proceso::api::{
    CatalogApi, ConfigApi, DashboardApi, ProcessReportRequest, ReportApi,
};
use tipo_proceso::config::ConfigManager;
use tipo_proceso::engine::{PipelineProgress, PipelineStage};
use tipo_proceso::exporter::ExportFormat;
use tipo_proceso::logging;

#[derive(Debug, Parser)]
#[command(name = "tipo-proceso", version, about = "Clasificador de TIPO DE PROCESO")]
struct Cli {
    /// Archivo de configuración (por defecto en el directorio de configuración del usuario)
    #[arg(long, global = true, env = "TIPO_PROCESO_CONFIG")]
    config: Option<PathBuf>,

    /// Logs en formato JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Procesa un reporte de mercancía y genera la tabla TIPO DE PROCESO
    Procesar {
        reporte: PathBuf,
        #[arg(short = 'o', long)]
        salida: Option<PathBuf>,
        #[arg(long)]
        formato: Option<ExportFormat>,
    },
    /// Estadísticas de códigos cumple y archivos procesados
    Estadisticas,
    /// Items del reporte que no existen en la base general
    Nuevos { reporte: PathBuf },
    /// Convierte un catálogo Excel/CSV a JSON de registros
    Convertir { origen: PathBuf, destino: PathBuf },
    /// Agrega o reemplaza un item en la base general (JSON)
    AgregarItem {
        item: i64,
        #[arg(long)]
        formato_codigo: String,
        #[arg(long, default_value = "")]
        descripcion: String,
    },
    /// Agrega o reemplaza un item en los códigos cumple (JSON)
    AgregarCodigo {
        item: i64,
        #[arg(long)]
        observaciones: String,
        #[arg(long, default_value = "")]
        criterio: String,
    },
    /// Consulta o modifica la configuración
    Config {
        #[command(subcommand)]
        accion: ConfigAction,
    },
    /// Limpia la lista de archivos procesados
    LimpiarArchivos,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Mostrar,
    Set { clave: String, valor: String },
    Limpiar,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_format(cli.log_json);

    tracing::info!("{} v{}", tipo_proceso::APP_NAME, tipo_proceso::VERSION);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ConfigManager::default_config_path);
    let mut manager = ConfigManager::load_or_init(&config_path)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("no se pudo cargar {}", config_path.display()))?;
    if !matches!(cli.command, Command::Config { .. }) {
        manager.apply_env_overrides();
    }

    match cli.command {
        Command::Procesar {
            reporte,
            salida,
            formato,
        } => {
            let api = ReportApi::new(manager);
            let request = ProcessReportRequest {
                reporte,
                salida,
                formato,
            };
            let mut last_stage = None;
            let mut sink = |p: PipelineProgress| {
                let checkpoint = p.stage == PipelineStage::Resolviendo && p.processed % 500 == 0;
                if last_stage != Some(p.stage) || checkpoint {
                    tracing::info!(stage = %p.stage, percent = p.fraction * 100.0, "progreso");
                    last_stage = Some(p.stage);
                }
            };
            let response = api.process_report(&request, &mut sink)?;
            for advertencia in &response.advertencias {
                eprintln!("Advertencia: {}", advertencia);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Estadisticas => {
            let stats = DashboardApi::new(&manager).dashboard_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Nuevos { reporte } => {
            let items = ReportApi::new(manager).find_new_items(&reporte)?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Convertir { origen, destino } => {
            let summary = ReportApi::new(manager).convert_catalog(&origen, &destino)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::AgregarItem {
            item,
            formato_codigo,
            descripcion,
        } => {
            let outcome =
                CatalogApi::new(&manager).add_catalog_item(item, &descripcion, &formato_codigo)?;
            println!("{}", serde_json::to_string(&outcome)?);
        }
        Command::AgregarCodigo {
            item,
            observaciones,
            criterio,
        } => {
            let outcome =
                CatalogApi::new(&manager).add_compliance_item(item, &observaciones, &criterio)?;
            println!("{}", serde_json::to_string(&outcome)?);
        }
        Command::Config { accion } => {
            let mut api = ConfigApi::new(&mut manager);
            match accion {
                ConfigAction::Mostrar => println!("{}", api.get_config_snapshot()?),
                ConfigAction::Set { clave, valor } => api.update_config(&clave, &valor)?,
                ConfigAction::Limpiar => api.clear_paths()?,
            }
        }
        Command::LimpiarArchivos => {
            DashboardApi::new(&manager).clear_processed_files()?;
        }
    }

    Ok(())
}
