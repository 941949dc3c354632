use semflow_core::Failure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// The pipeline ran and failed; the text is the run's failure message.
    #[error("{0}")]
    Pipeline(#[from] Failure),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("command failed: {0}")]
    Command(String),
}

impl CliError {
    // 0: success
    // 1: pipeline failure
    // 11: config error
    // 20: io / setup error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Pipeline(_) => 1,
            CliError::Config(_) => 11,
            CliError::Io(_) | CliError::Command(_) => 20,
        }
    }
}
