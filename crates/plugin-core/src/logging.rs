use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize a tracing subscriber for deployer logs.
///
/// This sets up a subscriber that prints compact, formatted events to stdout,
/// including target, level, file and line. The `RUST_LOG` environment
/// variable selects the level (e.g. `RUST_LOG=plugin_core=debug` to follow
/// each extraction and install step), falling back to "info" when it is
/// unset or unparsable.
///
/// Returns an error if a global subscriber has already been installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .compact(); // Use compact format for cleaner output

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
