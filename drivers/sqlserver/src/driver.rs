use crate::results::convert_row;
use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use sqlbatch_driver::{
    BackendKind, CommandOutcome, ConnectionError, Credentials, Encryption, Result, ResultSet,
    SqlServerConfig,
};
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, QueryItem};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

/// SQL Server error number for a rejected login
const LOGIN_FAILED: u32 = 18456;
const COMMIT_SQL: &str = "IF @@TRANCOUNT > 0 COMMIT TRANSACTION";

/// Open a session to the SQL Server instance described by the configuration.
///
/// # Errors
/// * [`ConnectionError::Network`] if the host cannot be reached
/// * [`ConnectionError::Auth`] if the login is rejected
/// * [`ConnectionError::Driver`] for any other failure
pub async fn connect(config: &SqlServerConfig) -> Result<Connection> {
    Connection::open(config).await
}

#[derive(Debug)]
pub struct Connection {
    target: String,
    client: Option<Client<Compat<TcpStream>>>,
}

impl Connection {
    async fn open(sqlserver_config: &SqlServerConfig) -> Result<Connection> {
        let mut config = Config::new();
        config.host(&sqlserver_config.host);
        config.port(sqlserver_config.port);
        config.database(&sqlserver_config.database);
        config.authentication(authentication(&sqlserver_config.credentials)?);

        if sqlserver_config.trust_server_certificate {
            config.trust_cert();
        }

        config.encryption(match sqlserver_config.encryption {
            Encryption::Off => EncryptionLevel::Off,
            Encryption::On => EncryptionLevel::On,
            Encryption::NotSupported => EncryptionLevel::NotSupported,
            Encryption::Required => EncryptionLevel::Required,
        });

        let target = sqlserver_config.target();
        debug!("connecting to sql server {target}");
        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|error| ConnectionError::Network(error.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|error| ConnectionError::Network(error.to_string()))?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(connection_error)?;

        Ok(Connection {
            target,
            client: Some(client),
        })
    }

    fn client(&mut self) -> Result<&mut Client<Compat<TcpStream>>> {
        self.client
            .as_mut()
            .ok_or_else(|| ConnectionError::Driver("connection is closed".to_string()).into())
    }
}

fn authentication(credentials: &Credentials) -> Result<AuthMethod> {
    match credentials {
        Credentials::Password { username, password } => {
            Ok(AuthMethod::sql_server(username, password))
        }
        #[cfg(any(windows, feature = "integrated-auth"))]
        Credentials::Integrated => Ok(AuthMethod::Integrated),
        #[cfg(not(any(windows, feature = "integrated-auth")))]
        Credentials::Integrated => Err(ConnectionError::Auth(
            "integrated authentication is not supported by this build".to_string(),
        )
        .into()),
    }
}

/// Classify a failure raised while establishing the session
fn connection_error(error: tiberius::error::Error) -> sqlbatch_driver::Error {
    let error = match error {
        tiberius::error::Error::Server(token) if token.code() == LOGIN_FAILED => {
            ConnectionError::Auth(token.message().to_string())
        }
        tiberius::error::Error::Io { message, .. } => ConnectionError::Network(message),
        error => ConnectionError::Driver(error.to_string()),
    };
    error.into()
}

/// Failure raised while running a statement; server errors keep only the server message
fn execution_error(error: tiberius::error::Error) -> sqlbatch_driver::Error {
    let message = match error {
        tiberius::error::Error::Server(token) => token.message().to_string(),
        error => error.to_string(),
    };
    sqlbatch_driver::Error::ExecutionError(message)
}

#[async_trait]
impl sqlbatch_driver::Connection for Connection {
    fn backend(&self) -> BackendKind {
        BackendKind::SqlServer
    }

    fn target(&self) -> &String {
        &self.target
    }

    async fn query(&mut self, sql: &str) -> Result<ResultSet> {
        let client = self.client()?;
        let mut query_stream = client.query(sql, &[]).await.map_err(execution_error)?;
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::new();

        while let Some(item) = query_stream.try_next().await.map_err(execution_error)? {
            match item {
                QueryItem::Metadata(meta) if meta.result_index() == 0 => {
                    columns = meta
                        .columns()
                        .iter()
                        .map(|column| column.name().to_string())
                        .collect();
                }
                QueryItem::Row(row) if row.result_index() == 0 => {
                    rows.push(convert_row(row)?);
                }
                _ => {}
            }
        }

        Ok(ResultSet::new(columns, rows))
    }

    async fn execute(&mut self, sql: &str) -> Result<CommandOutcome> {
        let client = self.client()?;
        let result = client.execute(sql, &[]).await.map_err(execution_error)?;
        Ok(CommandOutcome::new(Some(result.total())))
    }

    async fn commit(&mut self) -> Result<()> {
        let client = self.client()?;
        client
            .execute(COMMIT_SQL, &[])
            .await
            .map_err(execution_error)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            debug!("closing sql server connection {}", self.target);
            client
                .close()
                .await
                .map_err(|error| ConnectionError::Driver(error.to_string()))?;
        }
        Ok(())
    }
}
