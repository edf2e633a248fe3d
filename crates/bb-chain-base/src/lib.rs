use alloy_primitives::hex;
use async_trait::async_trait;
use bb_api_types::{TxHash, WalletAddress};
use bb_chain_client::{
    ChainAdapter, ChainError, LogBookRequest, LogBookResult, ProviderError, WalletProvider,
    encode_log_book,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

pub const BASE_MAINNET: &str = "base";
pub const BASE_SEPOLIA: &str = "base-sepolia";

/// Local wallet RPC (Frame's default listener).
pub const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:1248";

const USER_REJECTED: i64 = 4001;
const UNAUTHORIZED: i64 = 4100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseNetwork {
    Mainnet,
    Sepolia,
}

impl BaseNetwork {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            BASE_MAINNET => Some(Self::Mainnet),
            BASE_SEPOLIA => Some(Self::Sepolia),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Mainnet => BASE_MAINNET,
            Self::Sepolia => BASE_SEPOLIA,
        }
    }

    pub fn chain_id_numeric(self) -> u64 {
        match self {
            Self::Mainnet => 8453,
            Self::Sepolia => 84532,
        }
    }
}

/// EIP-1193 JSON-RPC adapter for a wallet that signs for Base.
///
/// Reads `BOOKBASE_WALLET_RPC_URL` from environment at construction time
/// (default: `http://127.0.0.1:1248`). An empty URL means no connector.
pub struct BaseAdapter {
    endpoint: Option<String>,
    network: BaseNetwork,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl BaseAdapter {
    pub fn new(endpoint: Option<String>, network: BaseNetwork) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("BOOKBASE_WALLET_RPC_URL").ok())
            .unwrap_or_else(|| DEFAULT_WALLET_RPC_URL.to_string());
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        Self {
            endpoint: (!endpoint.is_empty()).then_some(endpoint),
            network,
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcFailure> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Err(RpcFailure::NoEndpoint);
        };

        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| RpcFailure::Transport(format!("{method} transport: {err}")))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        // Providers report JSON-RPC errors with a non-2xx status too, so the
        // envelope is checked before the status.
        let envelope: RpcResponse = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(RpcFailure::Transport(format!("{method} HTTP {status}: {text}")));
            }
            Err(err) => return Err(RpcFailure::Malformed(format!("{method} parse: {err}"))),
        };

        if let Some(error) = envelope.error {
            return Err(RpcFailure::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| RpcFailure::Malformed(format!("{method}: missing result")))
    }
}

// ── JSON-RPC envelope ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionObject {
    from: String,
    to: String,
    data: String,
    chain_id: String,
}

#[derive(Debug)]
enum RpcFailure {
    NoEndpoint,
    Transport(String),
    Malformed(String),
    Rpc { code: i64, message: String },
}

impl From<RpcFailure> for ProviderError {
    fn from(failure: RpcFailure) -> Self {
        match failure {
            RpcFailure::NoEndpoint => ProviderError::Unavailable("no wallet RPC configured".to_owned()),
            RpcFailure::Transport(message) => ProviderError::Unavailable(message),
            RpcFailure::Malformed(message) => ProviderError::Rpc {
                code: -32700,
                message,
            },
            RpcFailure::Rpc { code, message } if code == USER_REJECTED || code == UNAUTHORIZED => {
                ProviderError::Rejected(message)
            }
            RpcFailure::Rpc { code, message } => ProviderError::Rpc { code, message },
        }
    }
}

impl From<RpcFailure> for ChainError {
    fn from(failure: RpcFailure) -> Self {
        match failure {
            RpcFailure::NoEndpoint => ChainError::Transport("no wallet RPC configured".to_owned()),
            RpcFailure::Transport(message) | RpcFailure::Malformed(message) => {
                ChainError::Transport(message)
            }
            RpcFailure::Rpc { code, message } if code == USER_REJECTED => {
                ChainError::Rejected(message)
            }
            RpcFailure::Rpc { code, message } => ChainError::Rpc { code, message },
        }
    }
}

#[async_trait]
impl WalletProvider for BaseAdapter {
    fn has_connector(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        let result = self.call("eth_requestAccounts", json!([])).await?;
        let accounts: Vec<String> = serde_json::from_value(result).map_err(|err| ProviderError::Rpc {
            code: -32700,
            message: format!("eth_requestAccounts parse: {err}"),
        })?;
        debug!("wallet returned {} accounts", accounts.len());
        Ok(accounts.into_iter().map(WalletAddress).collect())
    }

    async fn revoke(&self) -> Result<(), ProviderError> {
        self.call("wallet_revokePermissions", json!([{ "eth_accounts": {} }]))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChainAdapter for BaseAdapter {
    fn chain_id(&self) -> &str {
        self.network.slug()
    }

    async fn log_book(&self, req: LogBookRequest) -> Result<LogBookResult, ChainError> {
        if req.chain.0 != self.network.slug() {
            return Err(ChainError::UnsupportedChain(req.chain.0));
        }

        let tx = TransactionObject {
            from: req.from.0.clone(),
            to: req.contract.0.clone(),
            data: hex::encode_prefixed(encode_log_book(&req.call)),
            chain_id: format!("{:#x}", self.network.chain_id_numeric()),
        };

        let result = self.call("eth_sendTransaction", json!([tx])).await?;
        let tx_hash = result
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| ChainError::Transport("eth_sendTransaction: result is not a hash".to_owned()))?;

        info!(
            "logBook sent to {} on {} from {}: {}",
            req.contract, req.chain.0, req.from, tx_hash
        );

        Ok(LogBookResult {
            tx_hash: TxHash(tx_hash),
            chain: req.chain,
        })
    }
}
