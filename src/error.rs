//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: go.mod reading, parsing and writing
//! - RegistryError: module proxy communication
//! - ConfigError: invalid flags or environment
//! - IoError: file system operation failures
//! - CommandError: external processes (go, git, goimports)
//! - SourceError: Go source files handled by the import sorter

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Module proxy related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// External command errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Go source errors
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors related to go.mod files
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// go.mod syntax error
    #[error("failed to parse {path}:{line}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// go.mod has no module directive
    #[error("no module directive in {path}")]
    MissingModule { path: PathBuf },

    /// Version string that is not a valid module version
    #[error("invalid version '{version}' for {module}")]
    InvalidVersion { module: String, version: String },
}

/// Errors related to module proxy communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Module or version not found on the proxy
    #[error("module '{module}' not found on {proxy}")]
    ModuleNotFound { module: String, proxy: String },

    /// Network request failed
    #[error("failed to fetch '{module}' from {proxy}: {message}")]
    NetworkError {
        module: String,
        proxy: String,
        message: String,
    },

    /// Response body could not be read or parsed
    #[error("invalid response from {proxy} for '{module}': {message}")]
    InvalidResponse {
        module: String,
        proxy: String,
        message: String,
    },

    /// Request exceeded its deadline
    #[error("timeout while fetching '{module}' from {proxy}")]
    Timeout { module: String, proxy: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid toolchain version given with --go
    #[error("invalid go version '{value}': expected major.minor[.patch]")]
    InvalidGoVersion { value: String },

    /// Module cache location could not be determined
    #[error("module cache root is not set")]
    MissingModCache,
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Path exists but is not a directory
    #[error("expected a directory, got {path}")]
    NotADirectory { path: PathBuf },

    /// Failed to walk a directory tree
    #[error("failed to walk directory {path}: {message}")]
    WalkError { path: PathBuf, message: String },

    /// Failed to remove a cache entry
    #[error("failed to remove {path}: {source}")]
    RemoveError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by external programs
#[derive(Error, Debug)]
pub enum CommandError {
    /// Program could not be started
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Program exited unsuccessfully
    #[error("{command} failed in {dir}: {stderr}")]
    Failed {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// Program output could not be decoded
    #[error("unexpected output from {command}: {message}")]
    InvalidOutput { command: String, message: String },
}

/// Errors related to Go source files
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to read a source file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a source file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Import section could not be parsed
    #[error("failed to parse {path}:{line}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// goimports rejected the file
    #[error("goimports failed on {path}: {message}")]
    NormalizeError { path: PathBuf, message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return ManifestError::not_found(path);
        }
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ManifestError::ParseError {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates a new InvalidVersion error
    pub fn invalid_version(module: impl Into<String>, version: impl Into<String>) -> Self {
        ManifestError::InvalidVersion {
            module: module.into(),
            version: version.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new ModuleNotFound error
    pub fn module_not_found(module: impl Into<String>, proxy: impl Into<String>) -> Self {
        RegistryError::ModuleNotFound {
            module: module.into(),
            proxy: proxy.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        module: impl Into<String>,
        proxy: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            module: module.into(),
            proxy: proxy.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        module: impl Into<String>,
        proxy: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            module: module.into(),
            proxy: proxy.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(module: impl Into<String>, proxy: impl Into<String>) -> Self {
        RegistryError::Timeout {
            module: module.into(),
            proxy: proxy.into(),
        }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new NotADirectory error
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        IoError::NotADirectory { path: path.into() }
    }
}

impl CommandError {
    /// Creates a new Spawn error
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a new Failed error
    pub fn failed(
        command: impl Into<String>,
        dir: impl Into<PathBuf>,
        stderr: impl Into<String>,
    ) -> Self {
        CommandError::Failed {
            command: command.into(),
            dir: dir.into(),
            stderr: stderr.into(),
        }
    }
}

impl SourceError {
    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        SourceError::ParseError {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/go.mod");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("go.mod"));
    }

    #[test]
    fn test_manifest_read_error_maps_missing_file() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ManifestError::read_error("/path/to/go.mod", source);
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn test_manifest_error_parse() {
        let err = ManifestError::parse_error("/path/to/go.mod", 7, "unterminated block");
        let msg = format!("{}", err);
        assert!(msg.contains("go.mod:7"));
        assert!(msg.contains("unterminated block"));
    }

    #[test]
    fn test_manifest_error_invalid_version() {
        let err = ManifestError::invalid_version("github.com/pkg/errors", "latest");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid version 'latest'"));
        assert!(msg.contains("github.com/pkg/errors"));
    }

    #[test]
    fn test_registry_error_module_not_found() {
        let err = RegistryError::module_not_found("example.com/missing", "https://proxy.golang.org");
        let msg = format!("{}", err);
        assert!(msg.contains("module 'example.com/missing' not found"));
        assert!(msg.contains("proxy.golang.org"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("golang.org/x/mod", "proxy", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("golang.org/x/mod", "proxy");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("golang.org/x/mod"));
    }

    #[test]
    fn test_config_error_invalid_go_version() {
        let err = ConfigError::InvalidGoVersion {
            value: "go1".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("invalid go version 'go1'"));
    }

    #[test]
    fn test_io_error_not_a_directory() {
        let err = IoError::not_a_directory("/tmp/file.txt");
        let msg = format!("{}", err);
        assert!(msg.contains("expected a directory"));
    }

    #[test]
    fn test_command_error_failed() {
        let err = CommandError::failed("go list -m -json all", "/work", "no go.mod");
        let msg = format!("{}", err);
        assert!(msg.contains("go list"));
        assert!(msg.contains("/work"));
        assert!(msg.contains("no go.mod"));
    }

    #[test]
    fn test_source_error_parse() {
        let err = SourceError::parse_error("main.go", 3, "expected import path");
        let msg = format!("{}", err);
        assert!(msg.contains("main.go:3"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let app_err: AppError = ManifestError::not_found("/path").into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("manifest file not found"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let app_err: AppError = RegistryError::module_not_found("m", "p").into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("module 'm' not found"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let app_err: AppError = IoError::directory_not_found("/missing").into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("directory not found"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
