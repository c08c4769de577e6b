use clap::Parser;
use sqlbatch_driver::{
    ConnectionConfig, Credentials, DEFAULT_SQLSERVER_DATABASE, DEFAULT_SQLSERVER_PORT,
    DuckDbConfig, Encryption, SqlServerConfig,
};
use sqlbatch_formatters::OutputFormat;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Invalid or contradictory command line arguments
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("--duckdb and --server cannot be used together")]
    ConflictingBackends,
    #[error("one of --duckdb or --server is required")]
    MissingBackend,
    #[error("--trusted cannot be combined with --user or --password")]
    ConflictingCredentials,
    #[error("SQL Server requires --user or --trusted")]
    MissingCredentials,
    #[error("--query and --input-file cannot be used together")]
    ConflictingQuerySource,
    #[error("one of --query or --input-file is required")]
    MissingQuerySource,
    #[error("input file not found: {}", .0.display())]
    QueryFileNotFound(PathBuf),
    #[error("invalid value [{value}] for {name}")]
    InvalidValue { name: String, value: String },
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Parser)]
pub struct ClientArgs {
    /// DuckDB database file
    #[arg(long, value_name = "FILE")]
    pub duckdb: Option<PathBuf>,

    /// Create the DuckDB database file if it does not exist
    #[arg(long)]
    pub create: bool,

    /// SQL Server host
    #[arg(short = 'S', long, value_name = "HOST")]
    pub server: Option<String>,

    /// SQL Server port
    #[arg(short = 'P', long, default_value_t = DEFAULT_SQLSERVER_PORT)]
    pub port: u16,

    /// SQL Server login name
    #[arg(short = 'U', long)]
    pub user: Option<String>,

    /// SQL Server password
    #[arg(short = 'p', long, env = "SQLBATCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// SQL Server database
    #[arg(short = 'd', long, default_value = DEFAULT_SQLSERVER_DATABASE)]
    pub database: String,

    /// Use integrated (trusted) authentication
    #[arg(short = 'T', long)]
    pub trusted: bool,

    /// Accept the server certificate without validation
    #[arg(long)]
    pub trust_server_certificate: bool,

    /// TLS encryption level
    #[arg(
        long,
        default_value = "required",
        value_parser = ["off", "on", "not-supported", "required"]
    )]
    pub encryption: String,

    /// SQL to execute
    #[arg(short = 'Q', long, value_name = "SQL")]
    pub query: Option<String>,

    /// File containing the SQL script to execute
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// The output format
    #[arg(
        short = 'o',
        long,
        default_value = "table",
        value_parser = ["table", "csv", "json", "excel"]
    )]
    pub output: String,
}

impl Default for ClientArgs {
    fn default() -> Self {
        ClientArgs {
            duckdb: None,
            create: false,
            server: None,
            port: DEFAULT_SQLSERVER_PORT,
            user: None,
            password: None,
            database: DEFAULT_SQLSERVER_DATABASE.to_string(),
            trusted: false,
            trust_server_certificate: false,
            encryption: Encryption::default().to_string(),
            query: None,
            input_file: None,
            output: OutputFormat::default().to_string(),
        }
    }
}

/// A validated batch: where to run it, what to run and how to render it.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchRequest {
    pub connection: ConnectionConfig,
    pub script: String,
    pub format: OutputFormat,
}

impl ClientArgs {
    /// Check the arguments for consistency and resolve them into a [`BatchRequest`]. No
    /// connection is attempted; the only side effect is reading the input file.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] describing the first problem found
    pub fn validate(&self) -> Result<BatchRequest, ConfigError> {
        let connection = self.connection_config()?;
        let script = self.script()?;
        let format =
            OutputFormat::from_str(&self.output).map_err(|_| ConfigError::InvalidValue {
                name: "--output".to_string(),
                value: self.output.clone(),
            })?;

        Ok(BatchRequest {
            connection,
            script,
            format,
        })
    }

    fn connection_config(&self) -> Result<ConnectionConfig, ConfigError> {
        match (&self.duckdb, &self.server) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingBackends),
            (None, None) => Err(ConfigError::MissingBackend),
            (Some(path), None) => Ok(ConnectionConfig::DuckDb(
                DuckDbConfig::new(path).with_create(self.create),
            )),
            (None, Some(host)) => {
                let encryption = Encryption::from_str(&self.encryption).map_err(|_| {
                    ConfigError::InvalidValue {
                        name: "--encryption".to_string(),
                        value: self.encryption.clone(),
                    }
                })?;
                // A trusted connection always accepts the server certificate
                let trust_server_certificate = self.trust_server_certificate || self.trusted;
                let config = SqlServerConfig::new(host, self.credentials()?)
                    .with_port(self.port)
                    .with_database(&self.database)
                    .with_trust_server_certificate(trust_server_certificate)
                    .with_encryption(encryption);
                Ok(ConnectionConfig::SqlServer(config))
            }
        }
    }

    fn credentials(&self) -> Result<Credentials, ConfigError> {
        if self.trusted {
            if self.user.is_some() || self.password.is_some() {
                return Err(ConfigError::ConflictingCredentials);
            }
            return Ok(Credentials::Integrated);
        }

        let Some(username) = &self.user else {
            return Err(ConfigError::MissingCredentials);
        };
        Ok(Credentials::Password {
            username: username.clone(),
            password: self.password.clone().unwrap_or_default(),
        })
    }

    fn script(&self) -> Result<String, ConfigError> {
        match (&self.query, &self.input_file) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingQuerySource),
            (None, None) => Err(ConfigError::MissingQuerySource),
            (Some(query), None) => Ok(query.clone()),
            (None, Some(path)) => {
                if !path.is_file() {
                    return Err(ConfigError::QueryFileNotFound(path.clone()));
                }
                fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn duckdb_args() -> ClientArgs {
        ClientArgs {
            duckdb: Some(PathBuf::from("census.duckdb")),
            query: Some("SELECT 1".to_string()),
            ..Default::default()
        }
    }

    fn sqlserver_args() -> ClientArgs {
        ClientArgs {
            server: Some("db.example.com".to_string()),
            user: Some("sa".to_string()),
            password: Some("secret".to_string()),
            query: Some("SELECT 1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default() {
        let args = ClientArgs::default();
        assert_eq!(args.port, 1433);
        assert_eq!(args.database, "master");
        assert_eq!(args.encryption, "required");
        assert_eq!(args.output, "table");
    }

    #[test]
    fn test_parse() -> anyhow::Result<()> {
        let args = ClientArgs::try_parse_from([
            "sqlbatch", "-S", "db", "-U", "sa", "-p", "pw", "-d", "census", "-P", "14330",
            "-Q", "SELECT 1", "-o", "csv",
        ])?;
        assert_eq!(args.server.as_deref(), Some("db"));
        assert_eq!(args.user.as_deref(), Some("sa"));
        assert_eq!(args.database, "census");
        assert_eq!(args.port, 14330);
        assert_eq!(args.output, "csv");
        Ok(())
    }

    #[test]
    fn test_parse_invalid_output() {
        let result = ClientArgs::try_parse_from(["sqlbatch", "--duckdb", "x", "-o", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_duckdb() -> anyhow::Result<()> {
        let args = ClientArgs {
            create: true,
            ..duckdb_args()
        };
        let request = args.validate()?;
        assert_eq!(
            request.connection,
            ConnectionConfig::DuckDb(DuckDbConfig::new("census.duckdb").with_create(true))
        );
        assert_eq!(request.script, "SELECT 1");
        assert_eq!(request.format, OutputFormat::Table);
        Ok(())
    }

    #[test]
    fn test_validate_sqlserver() -> anyhow::Result<()> {
        let args = ClientArgs {
            encryption: "not-supported".to_string(),
            trust_server_certificate: true,
            output: "json".to_string(),
            ..sqlserver_args()
        };
        let request = args.validate()?;
        let ConnectionConfig::SqlServer(config) = request.connection else {
            panic!("expected a SQL Server configuration");
        };
        assert_eq!(config.host, "db.example.com");
        assert_eq!(config.port, 1433);
        assert_eq!(config.database, "master");
        assert_eq!(config.encryption, Encryption::NotSupported);
        assert!(config.trust_server_certificate);
        assert_eq!(
            config.credentials,
            Credentials::Password {
                username: "sa".to_string(),
                password: "secret".to_string(),
            }
        );
        assert_eq!(request.format, OutputFormat::Json);
        Ok(())
    }

    #[test]
    fn test_validate_password_defaults_to_empty() -> anyhow::Result<()> {
        let args = ClientArgs {
            password: None,
            ..sqlserver_args()
        };
        let ConnectionConfig::SqlServer(config) = args.validate()?.connection else {
            panic!("expected a SQL Server configuration");
        };
        assert_eq!(
            config.credentials,
            Credentials::Password {
                username: "sa".to_string(),
                password: String::new(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_validate_trusted() -> anyhow::Result<()> {
        let args = ClientArgs {
            user: None,
            password: None,
            trusted: true,
            ..sqlserver_args()
        };
        let ConnectionConfig::SqlServer(config) = args.validate()?.connection else {
            panic!("expected a SQL Server configuration");
        };
        assert_eq!(config.credentials, Credentials::Integrated);
        assert!(config.trust_server_certificate);
        Ok(())
    }

    #[test]
    fn test_validate_sql_auth_validates_certificate() -> anyhow::Result<()> {
        let ConnectionConfig::SqlServer(config) = sqlserver_args().validate()?.connection else {
            panic!("expected a SQL Server configuration");
        };
        assert!(!config.trust_server_certificate);
        Ok(())
    }

    #[test]
    fn test_validate_conflicting_backends() {
        let args = ClientArgs {
            server: Some("db".to_string()),
            ..duckdb_args()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::ConflictingBackends)
        ));
    }

    #[test]
    fn test_validate_missing_backend() {
        let args = ClientArgs {
            query: Some("SELECT 1".to_string()),
            ..Default::default()
        };
        assert!(matches!(args.validate(), Err(ConfigError::MissingBackend)));
    }

    #[test]
    fn test_validate_conflicting_credentials() {
        let args = ClientArgs {
            trusted: true,
            ..sqlserver_args()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::ConflictingCredentials)
        ));
    }

    #[test]
    fn test_validate_missing_credentials() {
        let args = ClientArgs {
            user: None,
            ..sqlserver_args()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn test_validate_query_sources() {
        let args = ClientArgs {
            input_file: Some(PathBuf::from("script.sql")),
            ..duckdb_args()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::ConflictingQuerySource)
        ));

        let args = ClientArgs {
            query: None,
            ..duckdb_args()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::MissingQuerySource)
        ));
    }

    #[test]
    fn test_validate_input_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "SELECT 1;\nSELECT 2;")?;
        let args = ClientArgs {
            query: None,
            input_file: Some(file.path().to_path_buf()),
            ..duckdb_args()
        };
        assert_eq!(args.validate()?.script, "SELECT 1;\nSELECT 2;");
        Ok(())
    }

    #[test]
    fn test_validate_input_file_not_found() -> anyhow::Result<()> {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("missing.sql");
        let args = ClientArgs {
            query: None,
            input_file: Some(path.clone()),
            ..duckdb_args()
        };
        let Err(ConfigError::QueryFileNotFound(missing)) = args.validate() else {
            panic!("expected QueryFileNotFound");
        };
        assert_eq!(missing, path);
        Ok(())
    }

    #[test]
    fn test_validate_invalid_value() {
        let args = ClientArgs {
            encryption: "always".to_string(),
            ..sqlserver_args()
        };
        let Err(ConfigError::InvalidValue { name, value }) = args.validate() else {
            panic!("expected InvalidValue");
        };
        assert_eq!(name, "--encryption");
        assert_eq!(value, "always");
    }
}
