//! Mock server configuration.

use std::path::PathBuf;

/// Runtime environment of the mock server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Seeds the store at startup and simulates network latency
    #[default]
    Development,
    /// Starts with an empty store and answers immediately
    Test,
}

impl Environment {
    /// Default response delay for the environment in milliseconds.
    pub fn default_timing_ms(self) -> u64 {
        match self {
            Environment::Development => 400,
            Environment::Test => 0,
        }
    }

    /// Whether fixtures are loaded automatically at startup.
    pub fn seeds_on_start(self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Mock server configuration.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path prefix for every route, without slashes
    pub namespace: String,
    /// Runtime environment
    pub environment: Environment,
    /// Artificial delay added to every response in milliseconds
    pub timing_ms: u64,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Directory holding fixture files (embedded fixtures when None)
    pub fixtures_dir: Option<PathBuf>,
}

impl MockConfig {
    /// Creates a configuration with the defaults of the given environment.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            timing_ms: environment.default_timing_ms(),
            ..Default::default()
        }
    }

    /// Route prefix with a leading slash, or an empty string.
    pub fn route_prefix(&self) -> String {
        let trimmed = self.namespace.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            namespace: "api".to_string(),
            environment: Environment::Development,
            timing_ms: 400,
            request_timeout_ms: 5000, // 5 seconds default
            fixtures_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults() {
        let config = MockConfig::for_environment(Environment::Test);
        assert_eq!(config.timing_ms, 0);
        assert!(!config.environment.seeds_on_start());
        assert_eq!(MockConfig::default().timing_ms, 400);
    }

    #[test]
    fn test_route_prefix() {
        let mut config = MockConfig::default();
        assert_eq!(config.route_prefix(), "/api");
        config.namespace = "/v2/".to_string();
        assert_eq!(config.route_prefix(), "/v2");
        config.namespace = String::new();
        assert_eq!(config.route_prefix(), "");
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("Test".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }
}
