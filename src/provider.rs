use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::assets::{Coin, Nft, Token};
use crate::config::{NetworkConfig, Node};
use crate::core::error::AssetError;
use crate::models::{CoinTransaction, ContractTransaction, NftTransaction, TokenTransaction, Transaction};
use crate::rpc::{Connection, RpcConnection};

static INSTANCE: OnceCell<Provider> = OnceCell::new();

/// Resolved network plus the connection handed to every asset and model it
/// creates.
#[derive(Clone)]
pub struct Provider {
    config: NetworkConfig,
    node: Node,
    connection: Arc<dyn Connection>,
}

impl Provider {
    pub fn new(config: NetworkConfig) -> Result<Self, AssetError> {
        let node = config.node()?;
        let connection: Arc<dyn Connection> = Arc::new(RpcConnection::from_node(&node));
        Ok(Self {
            config,
            node,
            connection,
        })
    }

    /// Provider over a caller-supplied connection.
    pub fn with_connection(config: NetworkConfig, connection: Arc<dyn Connection>) -> Result<Self, AssetError> {
        let node = config.node()?;
        Ok(Self {
            config,
            node,
            connection,
        })
    }

    /// Installs the process-wide provider. Fails if one is already installed.
    pub fn initialize(config: NetworkConfig) -> Result<&'static Provider, AssetError> {
        let provider = Self::new(config)?;
        INSTANCE
            .set(provider)
            .map_err(|_| AssetError::ProviderAlreadyInitialized)?;
        Self::instance()
    }

    pub fn instance() -> Result<&'static Provider, AssetError> {
        INSTANCE.get().ok_or(AssetError::ProviderNotInitialized)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn is_testnet(&self) -> bool {
        self.config.testnet
    }

    pub fn connection(&self) -> Arc<dyn Connection> {
        self.connection.clone()
    }

    /// True when the node answers a slot query.
    pub fn check_rpc_connection(&self) -> bool {
        match self.connection.get_slot() {
            Ok(slot) => {
                tracing::debug!(rpc_url = %self.node.rpc_url, slot, "rpc connection ok");
                true
            }
            Err(err) => {
                tracing::warn!(rpc_url = %self.node.rpc_url, "rpc connection failed: {err:#}");
                false
            }
        }
    }

    pub fn coin(&self) -> Coin {
        Coin::new(self.connection())
    }

    pub fn token(&self, address: &str) -> Result<Token, AssetError> {
        Token::new(address, self.connection())
    }

    pub fn nft(&self, address: &str) -> Result<Nft, AssetError> {
        Nft::new(address, self.connection())
    }

    pub fn transaction(&self, id: &str) -> Transaction {
        Transaction::new(id, self.connection())
    }

    pub fn coin_transaction(&self, id: &str) -> CoinTransaction {
        CoinTransaction::new(id, self.connection())
    }

    pub fn contract_transaction(&self, id: &str) -> ContractTransaction {
        ContractTransaction::new(id, self.connection())
    }

    pub fn token_transaction(&self, id: &str) -> TokenTransaction {
        TokenTransaction::new(id, self.connection())
    }

    pub fn nft_transaction(&self, id: &str) -> NftTransaction {
        NftTransaction::new(id, self.connection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_initializes_once() {
        assert!(matches!(
            Provider::instance(),
            Err(AssetError::ProviderNotInitialized)
        ));
        let provider = Provider::initialize(NetworkConfig::testnet()).unwrap();
        assert!(provider.is_testnet());
        assert_eq!(provider.node().cluster, "devnet");
        assert!(matches!(
            Provider::initialize(NetworkConfig::mainnet()),
            Err(AssetError::ProviderAlreadyInitialized)
        ));
        assert!(Provider::instance().unwrap().is_testnet());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = NetworkConfig::mainnet().with_rpc_url("ftp://example.com");
        assert!(matches!(
            Provider::new(config),
            Err(AssetError::InvalidConfig(_))
        ));
    }
}
