use anyhow::{Context, Result, anyhow};
use bb_chain_base::{BASE_MAINNET, BaseNetwork, DEFAULT_WALLET_RPC_URL};
use bb_lookup::OPEN_LIBRARY_URL;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATA_DIR: &str = "./data/bookbase";

/// Service settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub(crate) struct ServiceConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_dir: PathBuf,
    pub(crate) openlibrary_url: String,
    pub(crate) wallet_rpc_url: String,
    pub(crate) network: BaseNetwork,
}

impl ServiceConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("BOOKBASE_BIND_ADDR")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .with_context(|| format!("invalid BOOKBASE_BIND_ADDR {bind_addr:?}"))?;

        let data_dir = lookup("BOOKBASE_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned());

        let openlibrary_url = lookup("OPENLIBRARY_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| OPEN_LIBRARY_URL.to_owned());

        // an explicitly empty value disables the wallet connector
        let wallet_rpc_url =
            lookup("BOOKBASE_WALLET_RPC_URL").unwrap_or_else(|| DEFAULT_WALLET_RPC_URL.to_owned());

        let chain = lookup("BOOKBASE_CHAIN")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| BASE_MAINNET.to_owned());
        let network = BaseNetwork::from_slug(chain.trim())
            .ok_or_else(|| anyhow!("unsupported BOOKBASE_CHAIN {chain:?}; expected base or base-sepolia"))?;

        Ok(Self {
            bind_addr,
            data_dir: PathBuf::from(data_dir),
            openlibrary_url,
            wallet_rpc_url,
            network,
        })
    }
}
