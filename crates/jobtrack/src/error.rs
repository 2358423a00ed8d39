use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobtrackError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Email error: {0}")]
    Email(#[from] crate::email::EmailError),

    #[error("Summary error: {0}")]
    Summary(#[from] crate::summary::SummaryError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid position rule '{title}': {reason}")]
    InvalidPositionRule { title: String, reason: String },

    #[error("No configuration directory available on this platform")]
    NoConfigDirectory,
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write table '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace table '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode workbook: {0}")]
    Encode(String),

    #[error("Failed to read table '{path}': {message}")]
    ReadFile { path: PathBuf, message: String },

    #[error("Table '{0}' contains no worksheet")]
    NoWorksheet(PathBuf),
}

pub type Result<T> = std::result::Result<T, JobtrackError>;
