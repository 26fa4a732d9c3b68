//! Error types for the cache janitor service

use std::fmt;

#[derive(Debug)]
pub enum JanitorError {
    Cache(bounded_dir_cache::CacheError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for JanitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JanitorError::Cache(err) => write!(f, "Cache error: {}", err),
            JanitorError::Io(err) => write!(f, "IO error: {}", err),
            JanitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for JanitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JanitorError::Cache(err) => Some(err),
            JanitorError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<bounded_dir_cache::CacheError> for JanitorError {
    fn from(err: bounded_dir_cache::CacheError) -> Self {
        JanitorError::Cache(err)
    }
}

impl From<std::io::Error> for JanitorError {
    fn from(err: std::io::Error) -> Self {
        JanitorError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for JanitorError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        JanitorError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JanitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = JanitorError::Cache(bounded_dir_cache::CacheError::AutoCleanerRunning);
        assert_eq!(
            format!("{}", err),
            "Cache error: Auto-cleaner is already running"
        );
    }

    #[test]
    fn test_io_error_maps_to_io() {
        let err: JanitorError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        assert!(matches!(err, JanitorError::Io(_)));
        assert_eq!(format!("{}", err), "IO error: address in use");
    }

    #[test]
    fn test_config_error_display() {
        let err = JanitorError::Config("missing CACHE_DIR".to_string());
        assert_eq!(format!("{}", err), "Configuration error: missing CACHE_DIR");
    }

    #[test]
    fn test_error_is_debug() {
        let err = JanitorError::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
