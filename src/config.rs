use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_APP_NAME: &str = "maintenance-tracker";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub seed_demo_data: bool,
    pub app_name: String,
}

impl Config {
    /// Reads the listener settings from the environment, loading `.env` first if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn new(host: impl Into<String>, port: u16, seed_demo_data: bool) -> Self {
        Self {
            host: host.into(),
            port,
            seed_demo_data,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    field: "PORT",
                    value: value.clone(),
                })?,
            None => DEFAULT_PORT,
        };
        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                field: "SEED_DEMO_DATA",
                value,
            })?,
            None => true,
        };
        let app_name = lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        Ok(Self {
            host,
            port,
            seed_demo_data,
            app_name,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
