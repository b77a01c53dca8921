use thiserror::Error;

/// Failures surfaced by asset builders, transaction models and the provider.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid amount")]
    InvalidAmount,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("unauthorized address")]
    UnauthorizedAddress,
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("rpc request error: {0}")]
    RpcRequest(String),
    #[error("associated account derivation failed: {0}")]
    Derivation(String),
    #[error("invalid network config: {0}")]
    InvalidConfig(String),
    #[error("provider is not initialized")]
    ProviderNotInitialized,
    #[error("provider is already initialized")]
    ProviderAlreadyInitialized,
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

impl AssetError {
    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::InvalidAddress(message.into())
    }

    pub fn rpc_request(message: impl Into<String>) -> Self {
        Self::RpcRequest(message.into())
    }

    /// True for the three precondition failures a builder can report.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount | Self::InsufficientBalance | Self::UnauthorizedAddress
        )
    }
}
