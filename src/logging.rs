use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Console verbosity: errors only in JSON mode, otherwise whatever the
/// global filter lets through.
fn console_level(config: &AppConfig) -> LevelFilter {
    if config.use_json {
        LevelFilter::ERROR
    } else {
        LevelFilter::TRACE
    }
}

/// Install the global subscriber. Keep the guard alive until exit or the
/// file writer drops buffered lines.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // sqlx logs every statement at info; one line per insert drowns the timing output
    let filter_str = format!("{},sqlx::query=warn", config.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let registry = tracing_subscriber::registry().with(filter);

    // stderr keeps stdout clean for --json reports
    macro_rules! console_layer {
        () => {
            fmt::layer()
                .with_target(false)
                .with_ansi(!config.use_json)
                .with_writer(std::io::stderr)
                .with_filter(console_level(config))
        };
    }

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).with(console_layer!()).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).with(console_layer!()).init();
    }

    guard
}
