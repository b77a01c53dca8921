use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::error::AssetError;

pub const MAINNET_CLUSTER: &str = "mainnet-beta";
pub const DEVNET_CLUSTER: &str = "devnet";

/// Network selection supplied by the application.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default)]
    pub testnet: bool,
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub ws_url: Option<String>,
}

/// Resolved endpoints of a cluster.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub cluster: String,
    pub rpc_url: String,
    pub explorer_url: String,
    #[serde(default)]
    pub ws_url: Option<String>,
}

impl Node {
    pub fn mainnet() -> Self {
        Self {
            name: "Mainnet".to_string(),
            cluster: MAINNET_CLUSTER.to_string(),
            rpc_url: "https://api.mainnet-beta.solana.com/".to_string(),
            explorer_url: "https://solscan.io/".to_string(),
            ws_url: None,
        }
    }

    pub fn devnet() -> Self {
        Self {
            name: "Devnet".to_string(),
            cluster: DEVNET_CLUSTER.to_string(),
            rpc_url: "https://api.devnet.solana.com/".to_string(),
            explorer_url: "https://solscan.io/".to_string(),
            ws_url: None,
        }
    }

    /// Explorer link for a transaction id.
    pub fn transaction_url(&self, id: &str) -> String {
        let mut url = format!("{}tx/{}", self.explorer_url, id);
        if self.cluster != MAINNET_CLUSTER {
            url.push_str("?cluster=");
            url.push_str(&self.cluster);
        }
        url
    }
}

impl NetworkConfig {
    pub fn mainnet() -> Self {
        Self::default()
    }

    pub fn testnet() -> Self {
        Self {
            testnet: true,
            ..Self::default()
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    /// Cluster defaults with any configured URL overrides applied.
    pub fn node(&self) -> Result<Node, AssetError> {
        let mut node = if self.testnet {
            Node::devnet()
        } else {
            Node::mainnet()
        };
        if let Some(rpc_url) = &self.rpc_url {
            node.rpc_url = validate_url(rpc_url, &["http", "https"])?;
        }
        if let Some(ws_url) = &self.ws_url {
            node.ws_url = Some(validate_url(ws_url, &["ws", "wss"])?);
        }
        Ok(node)
    }
}

fn validate_url(raw: &str, schemes: &[&str]) -> Result<String, AssetError> {
    let url = Url::parse(raw).map_err(|err| AssetError::InvalidConfig(format!("{raw}: {err}")))?;
    if !schemes.contains(&url.scheme()) {
        return Err(AssetError::InvalidConfig(format!(
            "{raw}: unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(raw.to_string())
}
