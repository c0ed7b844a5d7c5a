//! Diagnostic logging for the binary.
//!
//! Standard output carries the TAP stream, so the subscriber always writes to standard error.

use tracing_subscriber::EnvFilter;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};

/// Build the filter for `directives`, rejecting malformed input.
pub fn filter(directives: &str) -> HarnessResult<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|source| HarnessError::InvalidLogFilter {
        filter: directives.to_string(),
        source,
    })
}

/// Install the global subscriber. A subscriber that is already set is left in place.
pub fn init(config: &HarnessConfig) -> HarnessResult<()> {
    let filter = filter(&config.log_filter)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_directives() {
        assert!(filter("warn").is_ok());
        assert!(filter("just_test=debug,info").is_ok());
    }

    #[test]
    fn test_rejects_malformed_directive() {
        let err = filter("just_test=notalevel").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidLogFilter { .. }));
    }

    #[test]
    fn test_init_rejects_configured_filter() {
        let config = HarnessConfig::default().with_log_filter("just_test=notalevel");
        let err = init(&config).unwrap_err();
        assert!(err.to_string().starts_with("invalid log filter 'just_test=notalevel': "));
    }
}
