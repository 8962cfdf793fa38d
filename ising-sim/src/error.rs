use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IsingError {
    #[error("invalid lattice shape: {0}")]
    InvalidShape(String),

    /// A simulation step needed a parameter that was never set.
    #[error("{0} is not set; call the matching setter before simulating")]
    Unconfigured(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, IsingError>;

impl From<validator::ValidationErrors> for IsingError {
    fn from(err: validator::ValidationErrors) -> Self {
        IsingError::Config(err.to_string())
    }
}
