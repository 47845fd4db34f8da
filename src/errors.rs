use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("Contract error: {0}")]
    Contract(
        #[from]
        ethers::contract::ContractError<ethers::providers::Provider<ethers::providers::Http>>,
    ),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }
}
