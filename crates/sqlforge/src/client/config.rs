//! Client configuration.

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Configuration applied by [`QueryClient`](super::QueryClient) to every
/// statement it creates.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Debug flag forwarded to the executor; also raises SQL logs to INFO.
    pub debug: bool,
    /// Truncate logged SQL (in chars). `None` means no truncation.
    pub max_logged_sql: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_logged_sql: Some(200),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with defaults (debug off, 200-char logs).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `APP_ENV`: `development` turns debug on.
    pub fn from_env() -> Self {
        Self::from_app_env(std::env::var(APP_ENV_VAR).ok().as_deref())
    }

    pub(crate) fn from_app_env(app_env: Option<&str>) -> Self {
        let debug = app_env.is_some_and(|env| env.trim().eq_ignore_ascii_case("development"));
        if debug {
            tracing::debug!(
                target: "sqlforge.config",
                "debug rendering enabled from {APP_ENV_VAR}"
            );
        }
        Self::default().with_debug(debug)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql(mut self, len: usize) -> Self {
        self.max_logged_sql = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql = None;
        self
    }
}
