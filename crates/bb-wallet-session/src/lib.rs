use bb_api_types::{Outcome, OutcomeKind, WalletAddress, WalletSessionResponse};
use bb_chain_client::{ProviderError, WalletProvider};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletState {
    Disconnected,
    Connecting,
    Connected(WalletAddress),
}

impl WalletState {
    pub fn label(&self) -> &'static str {
        match self {
            WalletState::Disconnected => "disconnected",
            WalletState::Connecting => "connecting",
            WalletState::Connected(_) => "connected",
        }
    }
}

/// Read-only view of the wallet handed to the submission workflow.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Option<WalletAddress>,
    pub is_connected: bool,
}

impl WalletSession {
    pub fn connected(address: WalletAddress) -> Self {
        Self {
            address: Some(address),
            is_connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// The signing account, only when the session is connected with an address.
    pub fn active_account(&self) -> Option<&WalletAddress> {
        if self.is_connected {
            self.address.as_ref().filter(|address| !address.0.is_empty())
        } else {
            None
        }
    }
}

impl From<&WalletState> for WalletSession {
    fn from(state: &WalletState) -> Self {
        match state {
            WalletState::Connected(address) => Self::connected(address.clone()),
            WalletState::Disconnected | WalletState::Connecting => Self::disconnected(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("no wallet found")]
    NoWalletAvailable,

    #[error("wallet refused connection: {0}")]
    WalletConnectionRejected(String),
}

impl WalletError {
    pub fn outcome(&self) -> Outcome {
        match self {
            WalletError::NoWalletAvailable => Outcome::new(
                OutcomeKind::NoWalletAvailable,
                "No browser wallet found. Install MetaMask or Rabby.",
            ),
            WalletError::WalletConnectionRejected(_) => Outcome::new(
                OutcomeKind::WalletConnectionRejected,
                "Wallet refused connection",
            ),
        }
    }
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(_) => WalletError::NoWalletAvailable,
            ProviderError::Rejected(message) => WalletError::WalletConnectionRejected(message),
            ProviderError::Rpc { code, message } => {
                WalletError::WalletConnectionRejected(format!("{code}: {message}"))
            }
        }
    }
}

/// Owns the process-wide wallet connection state.
///
/// Never retries: a failed `connect` leaves the manager `Disconnected`
/// until the user asks again.
pub struct WalletSessionManager {
    provider: Arc<dyn WalletProvider>,
    state: RwLock<WalletState>,
}

impl WalletSessionManager {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(WalletState::Disconnected),
        }
    }

    pub async fn state(&self) -> WalletState {
        self.state.read().await.clone()
    }

    pub async fn session(&self) -> WalletSession {
        WalletSession::from(&*self.state.read().await)
    }

    pub async fn response(&self) -> WalletSessionResponse {
        let state = self.state.read().await;
        let session = WalletSession::from(&*state);
        WalletSessionResponse {
            state: state.label().to_owned(),
            address: session.address.map(|address| address.0),
            is_connected: session.is_connected,
            notice: None,
        }
    }

    pub async fn connect(&self) -> Result<WalletAddress, WalletError> {
        {
            let mut state = self.state.write().await;
            if let WalletState::Connected(address) = &*state {
                return Ok(address.clone());
            }
            *state = WalletState::Connecting;
        }

        let result = self.attach().await;

        let mut state = self.state.write().await;
        match &result {
            Ok(address) => {
                info!("wallet connected: {}", address);
                *state = WalletState::Connected(address.clone());
            }
            Err(err) => {
                warn!("wallet connection failed: {}", err);
                *state = WalletState::Disconnected;
            }
        }
        result
    }

    async fn attach(&self) -> Result<WalletAddress, WalletError> {
        let accounts = self.provider.request_accounts().await?;

        if !self.provider.has_connector() {
            return Err(WalletError::NoWalletAvailable);
        }

        accounts
            .into_iter()
            .find(|account| !account.0.trim().is_empty())
            .ok_or(WalletError::NoWalletAvailable)
    }

    /// Always ends `Disconnected`; provider teardown is best-effort.
    pub async fn disconnect(&self) {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut *state, WalletState::Disconnected)
        };

        if let WalletState::Connected(address) = previous {
            if let Err(err) = self.provider.revoke().await {
                warn!("wallet revoke for {} failed: {}. Session cleared locally", address, err);
            }
            info!("wallet disconnected: {}", address);
        }
    }
}
