use axum::extract::State;
use axum::{response::IntoResponse, routing::get, Router};
use clap::Parser;
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use igptemp::common::SysfsPci;
use igptemp::sensor::{IgpDevice, SensorEndpoint};
use igptemp::{AgentConfig, Result, TempMetricExporter};
use igptemp_raw::decode::MobileDecode;

#[derive(Parser, Debug)]
#[command(name = "igptemp")]
#[command(about = "Temperature monitor for Intel GM965-family IGP chipsets")]
struct Args {
    #[arg(
        long,
        value_enum,
        default_value_t = DecodeArg::Pair,
        help = "Mobile decode strategy: calibrated RTR1+TOF1 pair or raw TR1"
    )]
    decode: DecodeArg,

    #[arg(long, default_value_t = 1, help = "Seconds between sensor reads")]
    interval: u64,

    #[arg(long, default_value_t = 9100, help = "Port for the /metrics endpoint")]
    port: u16,

    #[arg(long, help = "Print one reading and exit")]
    once: bool,

    #[arg(short, long, help = "Enable verbose logging (shows raw register values)")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DecodeArg {
    /// Sum of the relative reading and its calibration offset (default)
    Pair,
    /// Uncorrected TR1 byte
    Single,
}

impl From<DecodeArg> for MobileDecode {
    fn from(arg: DecodeArg) -> Self {
        match arg {
            DecodeArg::Pair => MobileDecode::RegisterPair,
            DecodeArg::Single => MobileDecode::SingleRegister,
        }
    }
}

struct AppState {
    exporter: TempMetricExporter,
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    let metric_families = state.exporter.registry().gather();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }

    let content_type = encoder.format_type().to_string();
    (
        [("Content-Type", content_type)],
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

fn check_permissions() {
    let mem_path = "/dev/mem";
    if std::fs::metadata(mem_path).is_err() {
        eprintln!("\nERROR: {mem_path} is not available on this system\n");
        std::process::exit(1);
    }

    if let Err(e) = std::fs::File::open(mem_path) {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            eprintln!("\nERROR: Permission denied accessing {mem_path}\n\nRun as root or grant CAP_SYS_RAWIO.\n");
            std::process::exit(1);
        }
    }
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Shutdown triggered by Ctrl+C");
        },
        _ = terminate => {
            tracing::warn!("Shutdown triggered by SIGTERM");
        },
    }

    cancel_token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    check_permissions();

    let config = AgentConfig::new(args.decode.into(), args.interval, args.port);

    let pci = SysfsPci::new();
    let device = Arc::new(IgpDevice::probe(&pci, config.strategy)?);
    let identity = device.identity();
    tracing::info!(
        "monitoring GMCH {:#06x} ({:?})",
        identity.device_id,
        identity.family
    );

    let endpoint = SensorEndpoint::new(device);

    if args.once {
        let reader = endpoint.clone();
        let millidegrees = tokio::task::spawn_blocking(move || reader.read_temperature())
            .await
            .unwrap_or_default();
        println!(
            "{} ({}): {:.3} C, crit {:.3} C",
            endpoint.read_name(),
            endpoint.read_label(),
            millidegrees as f64 / 1000.0,
            endpoint.read_critical_temperature() as f64 / 1000.0
        );
        return Ok(());
    }

    let exporter = TempMetricExporter::new(endpoint)?;
    let state = Arc::new(AppState { exporter });

    let cancel_token = CancellationToken::new();
    let loop_state = Arc::clone(&state);
    let loop_token = cancel_token.clone();
    let collection_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.interval);
        loop {
            tokio::select! {
                _ = loop_token.cancelled() => break,
                _ = interval.tick() => loop_state.exporter.collect().await,
            }
        }
    });

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    tracing::warn!("Starting HTTP server on {}", config.listen);
    let listener = tokio::net::TcpListener::bind(config.listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    let _ = collection_handle.await;
    tracing::info!("Shutdown complete");

    Ok(())
}
