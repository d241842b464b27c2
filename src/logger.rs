use tracing_subscriber::EnvFilter;

/// Default filter for the crate's diagnostics; `RUST_LOG` takes precedence.
pub fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "img_shrink=error"
    } else if verbose {
        "img_shrink=debug"
    } else {
        "img_shrink=warn"
    }
}

/// Installs the global subscriber. Diagnostics go to stderr so stdout only
/// carries status lines and the summary.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false, false), "img_shrink=warn");
        assert_eq!(default_filter(true, false), "img_shrink=debug");
        assert_eq!(default_filter(false, true), "img_shrink=error");
    }
}
