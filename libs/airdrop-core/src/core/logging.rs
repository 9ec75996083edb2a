use std::{
    sync::{Once, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_appender::rolling::{self, Builder};
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::telemetry::{create_otlp_logger_provider, create_otlp_tracer};

static INIT_LOG: Once = Once::new();
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static LOGGER_PROVIDER: OnceLock<SdkLoggerProvider> = OnceLock::new();

const SERVICE_NAME: &str = "solace-airdrop";

/// Where log output goes, beside the filter
#[derive(Debug, Clone, Default)]
pub struct LogOutputs {
    /// Directory for daily-rotated log files (file logging off when None)
    pub log_path: Option<String>,

    /// Disable the ANSI terminal layer
    pub term_log_off: bool,

    /// Export spans to this OTLP endpoint
    pub otlp_trace_url: Option<String>,

    /// Export log events to this OTLP endpoint
    pub otlp_log_url: Option<String>,
}

pub fn log_init(filter: String, outputs: LogOutputs) {
    INIT_LOG.call_once(|| {
        // Set up the file output layer, with daily rotation in tracing_appender
        let file_layer = outputs.log_path.as_deref().and_then(|log_directory| {
            let unique_id = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();

            let filename_suffix = format!("{}.log", unique_id);
            match Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(SERVICE_NAME)
                .filename_suffix(&filename_suffix)
                .build(log_directory)
            {
                Ok(file_appender) => {
                    let (non_blocking_file_writer, guard) =
                        tracing_appender::non_blocking(file_appender);

                    // Guard must live for the program lifetime, or buffered lines are lost
                    let _ = LOG_GUARD.set(guard);

                    Some(
                        Layer::new()
                            .with_writer(non_blocking_file_writer)
                            .with_ansi(false),
                    )
                }
                Err(err) => {
                    eprintln!("Failed to build rolling file appender: {:?}", err);
                    None
                }
            }
        });

        let terminal_layer = (!outputs.term_log_off).then(|| {
            Layer::new()
                .with_writer(std::io::stdout)
                .with_ansi(true)
        });

        let trace_layer = outputs.otlp_trace_url.map(|url| {
            create_otlp_tracer(SERVICE_NAME, Some(url))
                .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer))
        });
        let trace_layer = match trace_layer {
            Some(Ok(layer)) => Some(layer),
            Some(Err(err)) => {
                eprintln!("Failed to create OTLP tracer: {:?}", err);
                None
            }
            None => None,
        };

        let log_layer = match outputs
            .otlp_log_url
            .map(|url| create_otlp_logger_provider(SERVICE_NAME, Some(url)))
        {
            Some(Ok(provider)) => {
                let layer = OpenTelemetryTracingBridge::new(&provider);
                let _ = LOGGER_PROVIDER.set(provider);
                Some(layer)
            }
            Some(Err(err)) => {
                eprintln!("Failed to create OTLP logger: {:?}", err);
                None
            }
            None => None,
        };

        // Set up the global filter from RUST_LOG or fallback to the provided filter
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| filter.into());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(terminal_layer)
            .with(trace_layer)
            .with(log_layer)
            .init();
    });
}

/// Default initialize tracing log.
///
/// Must also import [`airdrop_core::core::logging::log_init`] function.
///
/// ## Using
/// ```rust
/// use airdrop_core::{core::logging::log_init, init_log};
///
/// init_log!();
/// tracing::info!("Claim from: {}", "0xd8da…6045");
/// ```
///
/// # Configuring
/// Standard `RUST_LOG` environment variable can be used to configure, e.g.:
///
/// ```bash
/// export RUST_LOG="solace_airdrop=debug"
/// ```
#[macro_export]
macro_rules! init_log {
    () => {
        log_init(
            format!("{}=info", env!("CARGO_CRATE_NAME")),
            Default::default(),
        );
    };
    ($outputs:expr) => {
        log_init(format!("{}=info", env!("CARGO_CRATE_NAME")), $outputs);
    };
}
