use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Environment variable with per-target directives such as `nebpp=trace,neb=info`.
pub const LOG_ENV: &str = "NEB_LOG";

/// The engine library and this binary. Other crates are capped at warnings on the console.
const OWN_TARGETS: [&str; 2] = ["nebpp", "neb"];

/// The log file always records engine detail, independent of `-v`.
const FILE_LEVEL: LevelFilter = LevelFilter::DEBUG;

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::OFF
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Console filter. `--quiet` wins, then explicit directives, then the verbosity count.
pub fn console_targets(verbosity: u8, quiet: bool, directives: Option<&str>) -> Result<Targets> {
    if quiet {
        return Ok(Targets::new().with_default(LevelFilter::OFF));
    }
    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => directives.parse::<Targets>().map_err(|e| {
            CliError::Other(anyhow::anyhow!(
                "Invalid {} directives '{}': {}",
                LOG_ENV,
                directives,
                e
            ))
        }),
        None => {
            let level = level_filter(verbosity, false);
            Ok(Targets::new()
                .with_targets(OWN_TARGETS.map(|target| (target, level)))
                .with_default(level.min(LevelFilter::WARN)))
        }
    }
}

fn file_targets() -> Targets {
    Targets::new()
        .with_targets(OWN_TARGETS.map(|target| (target, FILE_LEVEL)))
        .with_default(LevelFilter::INFO)
}

/// Installs the global subscriber: a compact stderr layer and, optionally, a plain-text file
/// layer that also records how long each relaxation span took.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let directives = std::env::var(LOG_ENV).ok();
    let console = console_targets(verbosity, quiet, directives.as_deref())?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(console);

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::Io)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(file_targets()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;
    use std::sync::Once;
    use tracing::{Level, debug, error, info, info_span, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_level_filters() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    fn verbosity_applies_to_engine_targets_only() {
        let targets = console_targets(2, false, None).unwrap();
        assert!(targets.would_enable("nebpp::workflows::relax", &Level::DEBUG));
        assert!(targets.would_enable("neb::commands::run", &Level::DEBUG));
        assert!(!targets.would_enable("nebpp::workflows::relax", &Level::TRACE));
        assert!(!targets.would_enable("rayon_core::registry", &Level::INFO));
        assert!(targets.would_enable("rayon_core::registry", &Level::WARN));
    }

    #[test]
    fn explicit_directives_replace_the_verbosity_mapping() {
        let targets = console_targets(0, false, Some("nebpp::engine=trace")).unwrap();
        assert!(targets.would_enable("nebpp::engine::integrator", &Level::TRACE));
        assert!(!targets.would_enable("nebpp::workflows::relax", &Level::ERROR));

        let blank = console_targets(1, false, Some("  ")).unwrap();
        assert!(blank.would_enable("nebpp", &Level::INFO));
    }

    #[test]
    fn quiet_silences_even_explicit_directives() {
        let targets = console_targets(3, true, Some("nebpp=trace")).unwrap();
        assert!(!targets.would_enable("nebpp", &Level::ERROR));
    }

    #[test]
    fn malformed_directives_are_rejected() {
        let result = console_targets(0, false, Some("nebpp=loudest"));
        assert!(matches!(result, Err(CliError::Other(_))));
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn second_initialization_reports_an_error() {
        ensure_global_logger_is_set();
        assert!(matches!(setup_logging(0, false, None), Err(CliError::Other(_))));
    }

    #[test]
    #[serial]
    fn file_layer_records_engine_debug_and_span_timing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("neb.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(file_targets());
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            let span = info_span!(target: "nebpp::workflows::relax", "neb_relaxation");
            span.in_scope(|| {
                debug!(target: "nebpp::workflows::relax", "Iteration complete.");
                debug!(target: "plotters::svg", "Dropped third-party detail.");
            });
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Iteration complete."));
        assert!(content.contains("ThreadId"));
        assert!(content.contains("neb_relaxation"));
        assert!(content.contains("close"));
        assert!(!content.contains("Dropped third-party detail."));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(&invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
