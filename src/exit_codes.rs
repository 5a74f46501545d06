//! Process exit codes.
//!
//! Standard failures reuse the BSD sysexits.h values from the `exitcode`
//! crate; codes from 100 up are specific to this tool.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportExitCode {
    /// Report written
    Success = exitcode::OK as isize,

    /// Input data was incorrect (bad CSV, unexpected API payload)
    DataError = exitcode::DATAERR as isize,

    /// Input CSV could not be opened
    NoInput = exitcode::NOINPUT as isize,

    /// Unexpected application error
    SoftwareError = exitcode::SOFTWARE as isize,

    /// Report file could not be created
    CantCreate = exitcode::CANTCREAT as isize,

    /// Missing or invalid configuration
    ConfigError = exitcode::CONFIG as isize,

    /// Token exchange rejected
    AuthError = 100,

    /// Connection or communication issues
    NetworkError = 101,

    /// Remote API returned a non-success status
    ApiError = 102,
}

impl ReportExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReportExitCode::Success => "Success",
            ReportExitCode::DataError => "Data format error",
            ReportExitCode::NoInput => "Cannot open input file",
            ReportExitCode::SoftwareError => "Internal software error",
            ReportExitCode::CantCreate => "Cannot create output file",
            ReportExitCode::ConfigError => "Configuration error",
            ReportExitCode::AuthError => "Authentication error",
            ReportExitCode::NetworkError => "Network communication error",
            ReportExitCode::ApiError => "Remote API error",
        }
    }
}

impl From<ReportExitCode> for i32 {
    fn from(code: ReportExitCode) -> Self {
        code.code()
    }
}
