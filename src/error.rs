use thiserror::Error;

use crate::{
    api::ClientError, configuration::ConfigurationError, exit_codes::ReportExitCode,
    http_utils::ApiError, input::InputError, report::ReportError,
};

/// Any failure that ends a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("Input error: {0}")]
    InputError(#[from] InputError),
    #[error("{0}")]
    ReportError(#[from] ReportError),
}

impl From<ClientError> for RunError {
    fn from(e: ClientError) -> Self {
        RunError::ReportError(ReportError::ClientError(e))
    }
}

impl RunError {
    pub fn exit_code(&self) -> ReportExitCode {
        match self {
            RunError::ConfigurationError(_) => ReportExitCode::ConfigError,
            RunError::InputError(InputError::Io { .. }) => ReportExitCode::NoInput,
            RunError::InputError(_) => ReportExitCode::DataError,
            RunError::ReportError(ReportError::ClientError(e)) => match e {
                ClientError::Authentication(_) => ReportExitCode::AuthError,
                ClientError::Request(ApiError::RemoteRequest { .. }) => ReportExitCode::ApiError,
                ClientError::Request(ApiError::HttpError(_)) => ReportExitCode::NetworkError,
                ClientError::Request(ApiError::JsonError(_)) => ReportExitCode::DataError,
                ClientError::Request(ApiError::InvalidUrl(_)) => ReportExitCode::ConfigError,
            },
            RunError::ReportError(ReportError::WriteError { .. }) => ReportExitCode::CantCreate,
            RunError::ReportError(ReportError::JsonError(_)) => ReportExitCode::SoftwareError,
        }
    }
}
