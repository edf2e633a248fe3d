mod abi;

pub use abi::{LOG_BOOK_SIGNATURE, encode_log_book, log_book_selector};

use async_trait::async_trait;
use bb_api_types::{ChainId, TxHash, WalletAddress};
use std::collections::HashMap;
use std::sync::Arc;

/// Arguments of `logBook`, in contract parameter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBookCall {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub place: String,
    pub mood: String,
    pub time_label: String,
    pub fragment: String,
    pub photo_uri: String,
    pub cover_uri: String,
    pub finished_at: u64,
}

impl LogBookCall {
    /// The nine string parameters, in contract order.
    pub fn string_args(&self) -> [&str; 9] {
        [
            self.title.as_str(),
            self.author.as_str(),
            self.isbn.as_str(),
            self.place.as_str(),
            self.mood.as_str(),
            self.time_label.as_str(),
            self.fragment.as_str(),
            self.photo_uri.as_str(),
            self.cover_uri.as_str(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct LogBookRequest {
    pub from: WalletAddress,
    pub contract: WalletAddress,
    pub chain: ChainId,
    pub call: LogBookCall,
}

#[derive(Debug, Clone)]
pub struct LogBookResult {
    pub tx_hash: TxHash,
    pub chain: ChainId,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("wallet provider unavailable: {0}")]
    Unavailable(String),

    #[error("wallet request rejected: {0}")]
    Rejected(String),

    #[error("wallet provider error {code}: {message}")]
    Rpc { code: i64, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),
}

impl ChainError {
    /// Short machine-supplied summary, when the failure carries one.
    pub fn short_message(&self) -> Option<&str> {
        match self {
            ChainError::Rejected(message) | ChainError::Rpc { message, .. } => {
                let message = message.trim();
                (!message.is_empty()).then_some(message)
            }
            ChainError::Transport(_) => None,
            ChainError::UnsupportedChain(_) => Some("Unsupported chain"),
        }
    }
}

/// Account access on the user's wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether a compatible connector is present at all.
    fn has_connector(&self) -> bool;
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError>;
    async fn revoke(&self) -> Result<(), ProviderError>;
}

/// The contract write endpoint.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    fn chain_id(&self) -> &str;
    async fn log_book(&self, req: LogBookRequest) -> Result<LogBookResult, ChainError>;
}

#[derive(Default, Clone)]
pub struct ChainRegistry {
    adapters: HashMap<String, Arc<dyn ChainAdapter>>,
}

impl ChainRegistry {
    pub fn register(&mut self, adapter: Arc<dyn ChainAdapter>) {
        self.adapters.insert(adapter.chain_id().to_owned(), adapter);
    }

    pub fn adapter(&self, chain_id: &str) -> Option<Arc<dyn ChainAdapter>> {
        self.adapters.get(chain_id).cloned()
    }
}
