use axum::extract::{FromRef, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use expediente_alertas::config::{AppConfig, DataConfig};
use expediente_alertas::error::AppError;
use expediente_alertas::expedientes::report::views::{
    AsesorGroup, CaducidadReport, ExpedienteRow, StatusCounts,
};
use expediente_alertas::expedientes::{
    build_report, Expediente, ExpedienteImporter, FilterCriteria, StatusFilter,
};
use expediente_alertas::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    data: DataConfig,
}

impl FromRef<AppState> for DataConfig {
    fn from_ref(state: &AppState) -> Self {
        state.data.clone()
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "Alertas de Caducidad",
    about = "Track expediente expiry alerts from the command line or as an HTTP service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render the expiry report for a workbook to stdout
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Workbook to read (defaults to EXPEDIENTES_WORKBOOK)
    #[arg(long)]
    workbook: Option<PathBuf>,
    /// Sheet holding the expedientes (defaults to EXPEDIENTES_SHEET)
    #[arg(long)]
    sheet: Option<String>,
    /// Evaluation date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Status filter: all, expired, expires_today, expiring_soon, current, exempt
    #[arg(long, value_parser = parse_status, default_value = "all")]
    status: StatusFilter,
    /// Only expedientes with this tema
    #[arg(long)]
    tema: Option<String>,
    /// Only expedientes assigned to this asesor
    #[arg(long)]
    asesor: Option<String>,
    /// Include the flat table listing in the output
    #[arg(long)]
    table: bool,
}

#[derive(Debug, Deserialize)]
struct ReportRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    today: Option<NaiveDate>,
    #[serde(default)]
    status: StatusFilter,
    #[serde(default)]
    tema: Option<String>,
    #[serde(default)]
    asesor: Option<String>,
    #[serde(default)]
    include_table: bool,
    /// Inline CSV export; when absent the configured workbook is read.
    #[serde(default)]
    csv: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    today: NaiveDate,
    data_source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_warning: Option<String>,
    counts: StatusCounts,
    filtered_counts: StatusCounts,
    total_filtered: usize,
    groups: Vec<AsesorGroup>,
    temas: Vec<String>,
    asesores: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<Vec<ExpedienteRow>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum DataSource {
    Workbook,
    InlineCsv,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Report(args) => run_report(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_status(raw: &str) -> Result<StatusFilter, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" | "todos" => Ok(StatusFilter::All),
        "expired" | "caducados" => Ok(StatusFilter::Expired),
        "expires_today" | "hoy" => Ok(StatusFilter::ExpiresToday),
        "expiring_soon" | "proximos" => Ok(StatusFilter::ExpiringSoon),
        "current" | "vigentes" => Ok(StatusFilter::Current),
        "exempt" | "no_aplica" => Ok(StatusFilter::Exempt),
        other => Err(format!("unknown status filter '{other}'")),
    }
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        data: config.data.clone(),
    };

    let app = app_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, workbook = %config.data.workbook.display(), "expediente alert service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/expedientes/report", post(expedientes_report_endpoint))
        .with_state(state)
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let workbook = args.workbook.unwrap_or(config.data.workbook);
    let sheet = args.sheet.unwrap_or(config.data.sheet);

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let criteria = FilterCriteria {
        status: args.status,
        tema: args.tema,
        asesor: args.asesor,
    };

    let (records, load_warning) = load_workbook_or_empty(&workbook, &sheet);
    let report = build_report(&records, &criteria, today, args.table);

    render_report(&workbook, &sheet, &report, load_warning.as_deref());
    Ok(())
}

/// A broken or missing workbook degrades to an empty record set with a
/// visible warning; the rest of the output stays usable.
fn load_workbook_or_empty(
    workbook: &std::path::Path,
    sheet: &str,
) -> (Vec<Expediente>, Option<String>) {
    match ExpedienteImporter::from_workbook(workbook, sheet) {
        Ok(records) => (records, None),
        Err(err) => {
            warn!(workbook = %workbook.display(), %err, "could not load expedientes");
            (Vec::new(), Some(err.to_string()))
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        serde_json::json!({ "status": "ready" })
    } else {
        serde_json::json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn expedientes_report_endpoint(
    State(data): State<DataConfig>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let (records, data_source, load_warning) = match payload.csv {
        Some(csv) => {
            let records = ExpedienteImporter::from_csv_reader(Cursor::new(csv.into_bytes()))?;
            (records, DataSource::InlineCsv, None)
        }
        None => {
            let (records, warning) = load_workbook_or_empty(&data.workbook, &data.sheet);
            (records, DataSource::Workbook, warning)
        }
    };

    let today = payload.today.unwrap_or_else(|| Local::now().date_naive());
    let criteria = FilterCriteria {
        status: payload.status,
        tema: payload.tema,
        asesor: payload.asesor,
    };

    let report = build_report(&records, &criteria, today, payload.include_table);

    Ok(Json(ReportResponse {
        today: report.today,
        data_source,
        load_warning,
        counts: report.counts,
        filtered_counts: report.filtered_counts,
        total_filtered: report.total_filtered,
        groups: report.groups,
        temas: report.temas,
        asesores: report.asesores,
        table: report.table,
    }))
}

fn render_report(
    workbook: &std::path::Path,
    sheet: &str,
    report: &CaducidadReport,
    load_warning: Option<&str>,
) {
    println!("Alertas de caducidad");
    println!(
        "Archivo: {} (hoja {}), evaluado el {}",
        workbook.display(),
        sheet,
        report.today.format("%d/%m/%Y")
    );

    if let Some(warning) = load_warning {
        println!("Aviso: {warning}");
    }

    println!("\nResumen de expedientes");
    let (filtered, counts) = (&report.filtered_counts, &report.counts);
    println!("- Caducados: {} de {}", filtered.expired, counts.expired);
    println!(
        "- Caducan hoy: {} de {}",
        filtered.expiring_today, counts.expiring_today
    );
    println!(
        "- Próximos a caducar: {} de {}",
        filtered.expiring_soon, counts.expiring_soon
    );
    println!("- Vigentes: {} de {}", filtered.current, counts.current);
    println!("- No aplica: {} de {}", filtered.exempt, counts.exempt);
    println!("- Total: {} de {}", filtered.total, counts.total);

    if report.groups.is_empty() {
        println!("\nNo se encontraron expedientes con los filtros seleccionados.");
    } else {
        println!("\nExpedientes por asesor");
        for group in &report.groups {
            println!("\n{} ({} expedientes)", group.asesor, group.total);
            for view in &group.expedientes {
                println!(
                    "- {} | reparto {} | {} | {}",
                    view.expediente, view.fecha_reparto, view.mensaje, view.tema
                );
            }
        }
    }

    if let Some(table) = &report.table {
        println!("\nTabla de expedientes");
        for row in table {
            println!(
                "- {} | {} | {} | {} | {} | {}",
                row.asesor,
                row.expediente,
                row.fecha_reparto,
                row.tema,
                row.seguimiento,
                row.estado_caducidad
            );
        }
    }
}
