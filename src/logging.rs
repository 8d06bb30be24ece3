use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `filter` uses `EnvFilter` directive syntax; an unparsable value falls back
/// to the crate default. Calling this twice is harmless.
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_and_tolerates_bad_filter() {
        init("docchat=debug");
        init("this is [not a filter");
        tracing::debug!("still logging");
    }
}
