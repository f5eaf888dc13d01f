/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    SerializationError(String),
    ModelNotFound(String),
    AmbiguousModel(String),
    FormRequestNotFound(String),
    AmbiguousFormRequest(String),
    UnknownErrorHandler { reference: String, handler: String },
    UnsupportedSecurityType(String),
    UnsupportedAuthFlow(String),
    Factory { model: String, message: String },
    VersionNotFound(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::ModelNotFound(name) => write!(f, "Model not found: {}", name),
            Error::AmbiguousModel(name) => {
                write!(f, "Model name {} matches more than one model", name)
            }
            Error::FormRequestNotFound(name) => write!(f, "Form request not found: {}", name),
            Error::AmbiguousFormRequest(name) => {
                write!(f, "Form request name {} matches more than one form request", name)
            }
            Error::UnknownErrorHandler { reference, handler } => {
                write!(
                    f,
                    "Unknown definition handler '{}' for error definition '{}'",
                    handler, reference
                )
            }
            Error::UnsupportedSecurityType(ty) => write!(f, "Unsupported security type: {}", ty),
            Error::UnsupportedAuthFlow(flow) => {
                write!(f, "Unsupported authentication flow: {}", flow)
            }
            Error::Factory { model, message } => {
                write!(f, "Factory for {} failed: {}", model, message)
            }
            Error::VersionNotFound(version) => {
                write!(f, "No configuration for API version: {}", version)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_model_not_found() {
        let err = Error::ModelNotFound("App\\Models\\Ghost".to_string());
        assert_eq!(err.to_string(), "Model not found: App\\Models\\Ghost");
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(Error::VersionNotFound("x".to_string()).source().is_none());
    }
}
