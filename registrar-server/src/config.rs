use clap::{ArgAction, Parser, ValueEnum};
use registrar_core::WriteMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Dynamodb,
    /// Process-local map; records are lost on exit.
    Memory,
}

/// Server settings, read from flags or the matching environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "registrar-server", about = "Registers users in a key-value store")]
pub struct ServerConfig {
    #[arg(long, env = "TABLE_NAME", default_value = "table")]
    pub table_name: String,

    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Origin returned in `Access-Control-Allow-Origin`.
    #[arg(long, env = "FRONTEND_ENDPOINT")]
    pub frontend_endpoint: Option<String>,

    /// Override the DynamoDB endpoint, e.g. `http://localhost:8000`.
    #[arg(long, env = "DYNAMODB_ENDPOINT")]
    pub dynamodb_endpoint: Option<String>,

    #[arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreBackend::Dynamodb)]
    pub store_backend: StoreBackend,

    #[arg(long, env = "WRITE_MODE", default_value_t = WriteMode::Overwrite)]
    pub write_mode: WriteMode,

    /// Listen address when running outside Lambda.
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    pub bind_address: String,

    #[arg(long, env = "LOG_CALLER_IDENTITY", default_value_t = true, action = ArgAction::Set)]
    pub log_caller_identity: bool,
}

impl ServerConfig {
    pub fn frontend_origin(&self) -> &str {
        self.frontend_endpoint.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "registrar-server",
            "--table-name",
            "users",
            "--region",
            "eu-west-1",
            "--frontend-endpoint",
            "https://app.example.com",
            "--store-backend",
            "memory",
            "--write-mode",
            "if-absent",
            "--log-caller-identity",
            "false",
        ])
        .unwrap();

        assert_eq!(config.table_name, "users");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.frontend_origin(), "https://app.example.com");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.write_mode, WriteMode::IfAbsent);
        assert!(!config.log_caller_identity);
    }

    const ENV_VARS: [&str; 8] = [
        "TABLE_NAME",
        "AWS_REGION",
        "FRONTEND_ENDPOINT",
        "DYNAMODB_ENDPOINT",
        "STORE_BACKEND",
        "WRITE_MODE",
        "BIND_ADDRESS",
        "LOG_CALLER_IDENTITY",
    ];

    // Defaults and environment lookup share one test so the process
    // environment is never mutated by two tests at once.
    #[test]
    fn test_defaults_and_environment() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }

        let config = ServerConfig::try_parse_from(["registrar-server"]).unwrap();
        assert_eq!(config.table_name, "table");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.frontend_origin(), "");
        assert_eq!(config.dynamodb_endpoint, None);
        assert_eq!(config.store_backend, StoreBackend::Dynamodb);
        assert_eq!(config.write_mode, WriteMode::Overwrite);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert!(config.log_caller_identity);

        std::env::set_var("TABLE_NAME", "users");
        std::env::set_var("AWS_REGION", "ap-southeast-2");
        std::env::set_var("FRONTEND_ENDPOINT", "https://app.example.com");
        std::env::set_var("DYNAMODB_ENDPOINT", "http://localhost:8000");
        std::env::set_var("STORE_BACKEND", "memory");
        std::env::set_var("WRITE_MODE", "if-absent");
        std::env::set_var("BIND_ADDRESS", "127.0.0.1:9000");
        std::env::set_var("LOG_CALLER_IDENTITY", "false");

        let config = ServerConfig::try_parse_from(["registrar-server"]).unwrap();
        for var in ENV_VARS {
            std::env::remove_var(var);
        }

        assert_eq!(config.table_name, "users");
        assert_eq!(config.region, "ap-southeast-2");
        assert_eq!(config.frontend_origin(), "https://app.example.com");
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.write_mode, WriteMode::IfAbsent);
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert!(!config.log_caller_identity);
    }

    #[test]
    fn test_unknown_write_mode_is_rejected() {
        let result = ServerConfig::try_parse_from(["registrar-server", "--write-mode", "upsert"]);
        assert!(result.is_err());
    }
}
