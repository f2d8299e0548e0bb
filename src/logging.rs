use tracing_subscriber::EnvFilter;

/// Install the console subscriber shared by both binaries.
///
/// `RUST_LOG` wins over `default_level`. Output goes to stderr so captured
/// MSBuild output on stdout stays readable.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding callers).
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
    fn test_init_twice_is_harmless() {
        init("info");
        init("debug");
        tracing::info!("still logging");
    }
}
