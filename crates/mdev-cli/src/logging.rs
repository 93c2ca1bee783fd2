use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map the `-v` count to a filter directive.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so that `--json` output on stdout stays parseable.
/// Without `-v`, `RUST_LOG` decides the filter, defaulting to "warn"; any
/// `-v` overrides it.
pub fn init(verbose: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .with_level(true)
        .compact();

    let filter_layer = if verbose == 0 {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level_for(0)))?
    } else {
        EnvFilter::try_new(level_for(verbose))?
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(3), "trace");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn test_logging_init() {
        // We can only init once per process
        let _ = init(1);

        tracing::info!("This is an info message");
        tracing::warn!("This is a warning message");
    }
}
