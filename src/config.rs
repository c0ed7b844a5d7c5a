//! Harness configuration.
//!
//! Defaults come from the environment (`JUST_TEST_INTERCEPT`, `JUST_TEST_LOG`); everything else is set in code
//! through the `with_*` builders. The stream fields exist so a run can be captured in-process.

use std::env;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use crate::error::{HarnessError, HarnessResult};
use crate::harness::GroupHook;
use crate::interceptor::Interceptor;

pub const INTERCEPT_ENV: &str = "JUST_TEST_INTERCEPT";
pub const LOG_ENV: &str = "JUST_TEST_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub struct HarnessConfig {
    /// Install the process-wide fault interceptor on the first group.
    pub intercept_faults: bool,
    /// `tracing` filter directive for the binary's subscriber.
    pub log_filter: String,
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
    pub hook: Option<Box<dyn GroupHook>>,
    /// Use this interceptor instead of installing the process one.
    pub interceptor: Option<Arc<Interceptor>>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            intercept_faults: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
            hook: None,
            interceptor: None,
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> HarnessResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HarnessResult<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(INTERCEPT_ENV) {
            config.intercept_faults = parse_bool(INTERCEPT_ENV, &value)?;
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        Ok(config)
    }

    pub fn with_intercept_faults(mut self, intercept: bool) -> Self {
        self.intercept_faults = intercept;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_stdout(mut self, out: impl Write + Send + 'static) -> Self {
        self.stdout = Box::new(out);
        self
    }

    pub fn with_stderr(mut self, err: impl Write + Send + 'static) -> Self {
        self.stderr = Box::new(err);
        self
    }

    pub fn with_hook(mut self, hook: impl GroupHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("intercept_faults", &self.intercept_faults)
            .field("log_filter", &self.log_filter)
            .field("hook", &self.hook.is_some())
            .field("interceptor", &self.interceptor.is_some())
            .finish_non_exhaustive()
    }
}

fn parse_bool(key: &'static str, value: &str) -> HarnessResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(HarnessError::InvalidConfig {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.intercept_faults);
        assert_eq!(config.log_filter, "warn");
        assert!(config.hook.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = HarnessConfig::from_lookup(lookup(&[(INTERCEPT_ENV, "Off"), (LOG_ENV, "just_test=debug")])).unwrap();
        assert!(!config.intercept_faults);
        assert_eq!(config.log_filter, "just_test=debug");
    }

    #[test]
    fn test_invalid_bool_is_config_error() {
        let err = HarnessConfig::from_lookup(lookup(&[(INTERCEPT_ENV, "sometimes")])).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidConfig { key: INTERCEPT_ENV, .. }));
        assert_eq!(err.to_string(), "invalid value 'sometimes' for JUST_TEST_INTERCEPT");
    }
}
