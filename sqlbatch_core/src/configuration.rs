use anyhow::{Result, bail};
use config::{Config, FileFormat};
use dirs::home_dir;
use num_format::Locale;
use sqlbatch_formatters::FormatterOptions;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use supports_color::Stream;
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub(crate) static DEFAULT_CONFIG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/resources/sqlbatch.toml"
));

/// A builder for creating a [Configuration] instance.
#[derive(Clone, Debug, Default)]
pub struct ConfigurationBuilder {
    configuration: Configuration,
}

impl ConfigurationBuilder {
    #[must_use]
    pub fn new<S: Into<String>>(program_name: S, version: S) -> Self {
        let mut configuration = Configuration::default();
        configuration.program_name = program_name.into();
        configuration.version = version.into();
        Self { configuration }
    }

    /// Initialize configuration from the configuration file.  The configuration file is located
    /// in the user's home directory in a hidden directory named after the program name
    /// (e.g. `.sqlbatch`) or in the current working directory if the home directory is not
    /// available. The configuration file is named after the program name with a `.toml` extension
    /// (e.g. `sqlbatch.toml`) and is optional.
    ///
    /// # Errors
    /// Returns an error if the configuration contains invalid values
    pub fn with_config(self) -> Result<Self> {
        let home_dir = home_dir().unwrap_or_else(|| env::current_dir().unwrap_or_default());
        let config_dir = home_dir.join(format!(".{}", &self.configuration.program_name));
        self.with_config_dir(config_dir)
    }

    /// Initialize configuration from the configuration file in the given directory, layered
    /// over the defaults and overridden by environment variables.
    ///
    /// # Errors
    /// Returns an error if the configuration contains invalid values
    pub fn with_config_dir<P: Into<PathBuf>>(mut self, config_dir: P) -> Result<Self> {
        let config_dir = config_dir.into();
        let config = load_config(&self.configuration.program_name, &config_dir)?;
        self.configuration.config_dir = Some(config_dir.clone());
        self.configuration.log_dir = Some(config_dir.join("logs"));
        apply_config(&config, &mut self.configuration)?;
        Ok(self)
    }

    /// Set the log level to use.
    #[must_use]
    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.configuration.log_level = log_level;
        self
    }

    /// Set the log directory to use.
    #[must_use]
    pub fn with_log_dir<P: Into<PathBuf>>(mut self, log_dir: P) -> Self {
        self.configuration.log_dir = Some(log_dir.into());
        self
    }

    /// Set the log rotation to use.
    #[must_use]
    pub fn with_log_rotation(mut self, log_rotation: Rotation) -> Self {
        self.configuration.log_rotation = log_rotation;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.configuration.color = color;
        self
    }

    #[must_use]
    pub fn with_locale<S: Into<String>>(mut self, locale: S) -> Self {
        self.configuration.locale = locale.into();
        self
    }

    /// Set the number of characters shown when a statement is echoed.
    #[must_use]
    pub fn with_preview_length(mut self, preview_length: usize) -> Self {
        self.configuration.preview_length = preview_length;
        self
    }

    #[must_use]
    pub fn with_results_footer(mut self, results_footer: bool) -> Self {
        self.configuration.results_footer = results_footer;
        self
    }

    #[must_use]
    pub fn with_results_timer(mut self, results_timer: bool) -> Self {
        self.configuration.results_timer = results_timer;
        self
    }

    #[must_use]
    pub fn with_results_directory<P: Into<PathBuf>>(mut self, results_directory: P) -> Self {
        self.configuration.results_directory = results_directory.into();
        self
    }

    /// Build a [Configuration] instance and install the file logger when a log level is set.
    ///
    /// # Errors
    /// Returns an error if the log file appender cannot be created
    pub fn build(self) -> Result<Configuration> {
        init_logging(&self.configuration)?;
        Ok(self.configuration)
    }
}

/// The configuration for the application.
#[derive(Clone, Debug)]
pub struct Configuration {
    pub program_name: String,
    pub version: String,
    pub config_dir: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub log_dir: Option<PathBuf>,
    pub log_rotation: Rotation,
    pub color: bool,
    pub locale: String,
    pub preview_length: usize,
    pub results_footer: bool,
    pub results_timer: bool,
    pub results_directory: PathBuf,
}

impl Configuration {
    #[must_use]
    pub fn get_formatter_options(&self) -> FormatterOptions {
        FormatterOptions {
            color: self.color,
            footer: self.results_footer,
            locale: self.locale.clone(),
            results_directory: self.results_directory.clone(),
            timer: self.results_timer,
            ..FormatterOptions::default()
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            program_name: String::new(),
            version: String::new(),
            config_dir: None,
            log_level: LevelFilter::OFF,
            log_dir: None,
            log_rotation: Rotation::DAILY,
            color: false,
            locale: "en".to_string(),
            preview_length: 60,
            results_footer: true,
            results_timer: true,
            results_directory: PathBuf::from("."),
        }
    }
}

fn load_config(program_name: &str, config_dir: &Path) -> Result<Config> {
    let config_file = config_dir.join(format!("{program_name}.toml"));
    debug!("Configuration file: {}", config_file.display());

    let prefix = program_name.to_uppercase().replace('-', "_");
    debug!("Configuration environment prefix: {prefix}");

    let config = Config::builder()
        .add_source(config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(
            config::File::from(config_file)
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(config::Environment::with_prefix(prefix.as_str()).separator("_"))
        .build()?;
    Ok(config)
}

fn apply_config(config: &Config, configuration: &mut Configuration) -> Result<()> {
    let log_level = config.get::<String>("log.level")?;
    configuration.log_level = match LevelFilter::from_str(log_level.as_str()) {
        Ok(log_level) => log_level,
        Err(_) => bail!("Invalid log.level: {log_level}"),
    };

    configuration.log_rotation = match config.get::<String>("log.rotation")?.as_str() {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "never" => Rotation::NEVER,
        rotation => bail!("Invalid log.rotation: {rotation}"),
    };

    configuration.color = match config.get::<bool>("results.color") {
        Ok(color) => color,
        Err(config::ConfigError::NotFound(_)) => supports_color::on(Stream::Stderr).is_some(),
        Err(error) => bail!("Invalid results.color: {error}"),
    };
    configuration.locale = get_locale(config);
    configuration.results_footer = config.get::<bool>("results.footer")?;
    configuration.results_timer = config.get::<bool>("results.timer")?;
    configuration.results_directory = config.get::<PathBuf>("results.directory")?;

    let preview_length = config.get::<usize>("statement.preview")?;
    if preview_length == 0 {
        bail!("Invalid statement.preview: {preview_length}");
    }
    configuration.preview_length = preview_length;

    Ok(())
}

fn get_locale(config: &Config) -> String {
    let locale = config
        .get::<String>("results.locale")
        .unwrap_or_else(|_| "en".to_string());
    if Locale::from_name(&locale).is_ok() {
        return locale;
    }

    warn!("Invalid locale: {locale}; defaulting to \"en\"");
    "en".to_string()
}

fn init_logging(configuration: &Configuration) -> Result<()> {
    let Some(level) = configuration.log_level.into_level() else {
        return Ok(());
    };

    let log_dir = configuration.log_dir.clone().unwrap_or_default();
    let file_appender = RollingFileAppender::builder()
        .rotation(configuration.log_rotation.clone())
        .filename_prefix(&configuration.program_name)
        .filename_suffix("log")
        .build(log_dir)?
        .with_max_level(level);

    // a subscriber installed earlier in the process wins
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .try_init();
    Ok(())
}
