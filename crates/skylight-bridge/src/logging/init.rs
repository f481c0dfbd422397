use std::io::Write as _;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "skylight_bridge=debug,wgpu=warn"). `write_style` controls ANSI coloring.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored. Intended usage
/// is early in `main`, before any thread is spawned.
///
/// Every record is prefixed with the name of the thread that emitted it.
/// The interesting part of this system is how the lifecycle and render
/// threads interleave, and an unattributed log line is useless for that.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        builder.format(|buf, record| {
            let thread = std::thread::current();
            writeln!(
                buf,
                "[{}] {:<5} {}: {}",
                thread.name().unwrap_or("?"),
                record.level(),
                record.target(),
                record.args()
            )
        });

        builder.init();

        log::debug!("logging initialized");
    });
}
