use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default clock-skew tolerance for inbound webhook timestamps, in seconds.
pub const DEFAULT_WEBHOOK_TIMESTAMP_TOLERANCE_SECS: i64 = 300;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The deployment URL of the Convex backend that stores users, bookings,
    /// testimonials and contacts (e.g. https://<deployment>.convex.cloud).
    #[arg(long, env)]
    convex_deployment_url: Option<String>,

    /// The Clerk-issued signing secret for webhook deliveries, in the
    /// `whsec_<base64>` form shown in the Clerk dashboard. When unset the
    /// webhook endpoint answers 500 until an operator fixes the configuration.
    #[arg(long, env)]
    clerk_webhook_signing_secret: Option<String>,

    /// Maximum accepted skew in seconds between a webhook's claimed send time
    /// and this server's clock.
    #[arg(long, env, default_value_t = DEFAULT_WEBHOOK_TIMESTAMP_TOLERANCE_SECS)]
    webhook_timestamp_tolerance_secs: i64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the Convex deployment URL, if configured.
    pub fn convex_deployment_url(&self) -> Option<String> {
        self.convex_deployment_url.clone()
    }

    pub fn set_convex_deployment_url(mut self, url: String) -> Self {
        self.convex_deployment_url = Some(url);
        self
    }

    /// Returns the Clerk webhook signing secret, if configured.
    pub fn clerk_webhook_signing_secret(&self) -> Option<String> {
        self.clerk_webhook_signing_secret.clone()
    }

    pub fn set_clerk_webhook_signing_secret(mut self, secret: String) -> Self {
        self.clerk_webhook_signing_secret = Some(secret);
        self
    }

    /// Returns the accepted webhook timestamp skew in seconds.
    pub fn webhook_timestamp_tolerance_secs(&self) -> i64 {
        self.webhook_timestamp_tolerance_secs
    }

    pub fn set_webhook_timestamp_tolerance_secs(mut self, tolerance_secs: i64) -> Self {
        self.webhook_timestamp_tolerance_secs = tolerance_secs;
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        // This could check an environment variable, or a config field
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::parse_from(["booking_platform_rs"])
    }

    #[test]
    fn test_defaults() {
        let config = base_config();
        assert_eq!(config.port, 4000);
        assert_eq!(config.webhook_timestamp_tolerance_secs(), 300);
        assert_eq!(config.runtime_env(), RustEnv::Development);
        assert!(!config.is_production());
    }

    #[test]
    fn test_builder_setters() {
        let config = base_config()
            .set_convex_deployment_url("http://127.0.0.1:3210".to_string())
            .set_clerk_webhook_signing_secret("whsec_dGVzdHNlY3JldA==".to_string())
            .set_webhook_timestamp_tolerance_secs(60);

        assert_eq!(
            config.convex_deployment_url().as_deref(),
            Some("http://127.0.0.1:3210")
        );
        assert_eq!(
            config.clerk_webhook_signing_secret().as_deref(),
            Some("whsec_dGVzdHNlY3JldA==")
        );
        assert_eq!(config.webhook_timestamp_tolerance_secs(), 60);
    }

    #[test]
    fn test_rust_env_parsing() {
        assert_eq!("production".parse::<RustEnv>().unwrap(), RustEnv::Production);
        assert_eq!("STAGING".parse::<RustEnv>().unwrap(), RustEnv::Staging);
        assert!("qa".parse::<RustEnv>().is_err());
    }
}
