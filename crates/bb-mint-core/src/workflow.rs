use alloy_primitives::Address;
use bb_api_types::{ChainId, ContractConfig, TxHash, WalletAddress};
use bb_chain_client::{ChainRegistry, LogBookCall, LogBookRequest};
use bb_wallet_session::WalletSession;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::MintError;
use crate::finished_at::finished_at_from_local_date;
use crate::form::{Draft, FormState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    AwaitingWalletWrite,
    Settled { success: bool },
}

impl SubmissionPhase {
    pub fn label(self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Validating => "validating",
            SubmissionPhase::AwaitingWalletWrite => "awaiting_wallet_write",
            SubmissionPhase::Settled { success: true } => "settled_success",
            SubmissionPhase::Settled { success: false } => "settled_failure",
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(
            self,
            SubmissionPhase::Validating | SubmissionPhase::AwaitingWalletWrite
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub tx_hash: TxHash,
    pub chain: ChainId,
}

/// Builds the ordered `logBook` arguments from the form.
pub fn build_call(form: &FormState) -> Result<LogBookCall, MintError> {
    let finished_at = finished_at_from_local_date(&form.finished_at_local_date)
        .map_err(|err| MintError::SubmissionFailed(Some(err.to_string())))?;

    Ok(LogBookCall {
        title: form.title.clone(),
        author: form.author.clone(),
        isbn: form.isbn.clone(),
        place: form.place.clone(),
        mood: form.mood.clone(),
        time_label: form.time_label.clone(),
        fragment: form.fragment.clone(),
        photo_uri: form.photo_uri.clone(),
        cover_uri: form.cover_uri.clone(),
        finished_at,
    })
}

/// Drives one mint attempt per `submit` call. Never retries.
pub struct SubmissionWorkflow {
    chains: ChainRegistry,
    chain: ChainId,
    phase: RwLock<SubmissionPhase>,
}

impl SubmissionWorkflow {
    pub fn new(chains: ChainRegistry, chain: ChainId) -> Self {
        Self {
            chains,
            chain,
            phase: RwLock::new(SubmissionPhase::Idle),
        }
    }

    pub fn chain(&self) -> &ChainId {
        &self.chain
    }

    pub async fn phase(&self) -> SubmissionPhase {
        *self.phase.read().await
    }

    async fn enter(&self, phase: SubmissionPhase) {
        debug!("submission phase -> {}", phase.label());
        *self.phase.write().await = phase;
    }

    /// On success the draft is cleared; on failure it is left as it was.
    pub async fn submit(
        &self,
        draft: &mut Draft,
        config: &ContractConfig,
        wallet: &WalletSession,
    ) -> Result<SubmitReceipt, MintError> {
        self.enter(SubmissionPhase::Validating).await;

        let result = self.dispatch(&draft.form, config, wallet).await;

        self.enter(SubmissionPhase::Settled {
            success: result.is_ok(),
        })
        .await;

        match &result {
            Ok(receipt) => {
                info!("book logged on {}: {}", receipt.chain.0, receipt.tx_hash);
                draft.clear();
            }
            Err(err) => warn!("book submission failed: {}", err),
        }

        result
    }

    async fn dispatch(
        &self,
        form: &FormState,
        config: &ContractConfig,
        wallet: &WalletSession,
    ) -> Result<SubmitReceipt, MintError> {
        let request = self.build_request(form, config, wallet)?;

        let adapter = self
            .chains
            .adapter(&self.chain.0)
            .ok_or_else(|| MintError::SubmissionFailed(Some(format!("unsupported chain: {}", self.chain.0))))?;

        self.enter(SubmissionPhase::AwaitingWalletWrite).await;

        let result = adapter
            .log_book(request)
            .await
            .map_err(|err| {
                warn!("logBook write failed: {}", err);
                MintError::SubmissionFailed(err.short_message().map(ToOwned::to_owned))
            })?;

        Ok(SubmitReceipt {
            tx_hash: result.tx_hash,
            chain: result.chain,
        })
    }

    fn build_request(
        &self,
        form: &FormState,
        config: &ContractConfig,
        wallet: &WalletSession,
    ) -> Result<LogBookRequest, MintError> {
        if !config.is_configured() {
            return Err(MintError::MissingContractAddress);
        }

        let Some(from) = wallet.active_account() else {
            return Err(MintError::WalletNotConnected);
        };

        if form.title.trim().is_empty() {
            return Err(MintError::MissingField("title"));
        }
        if form.author.trim().is_empty() {
            return Err(MintError::MissingField("author"));
        }

        let contract = parse_contract_address(&config.address)?;
        let call = build_call(form)?;

        Ok(LogBookRequest {
            from: from.clone(),
            contract,
            chain: self.chain.clone(),
            call,
        })
    }
}

fn parse_contract_address(raw: &str) -> Result<WalletAddress, MintError> {
    let raw = raw.trim();
    let invalid = || MintError::SubmissionFailed(Some(format!("invalid contract address: {raw}")));

    if !raw.starts_with("0x") {
        return Err(invalid());
    }
    Address::from_str(raw).map_err(|_| invalid())?;

    Ok(WalletAddress(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bb_api_types::Candidate;
    use bb_chain_client::{ChainAdapter, ChainError, LogBookResult};
    use std::sync::{Arc, Mutex};

    const CHAIN: &str = "base";
    const CONTRACT: &str = "0x2222222222222222222222222222222222222222";
    const ACCOUNT: &str = "0x1111111111111111111111111111111111111111";

    #[derive(Default)]
    struct RecordingAdapter {
        calls: Mutex<Vec<LogBookRequest>>,
        fail_with: Mutex<Option<ChainError>>,
    }

    impl RecordingAdapter {
        fn failing(err: ChainError) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Mutex::new(Some(err)),
            }
        }

        fn calls(&self) -> Vec<LogBookRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainAdapter for RecordingAdapter {
        fn chain_id(&self) -> &str {
            CHAIN
        }

        async fn log_book(&self, req: LogBookRequest) -> Result<LogBookResult, ChainError> {
            self.calls.lock().unwrap().push(req.clone());
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            Ok(LogBookResult {
                tx_hash: TxHash("0xfeed".into()),
                chain: req.chain,
            })
        }
    }

    fn workflow(adapter: Arc<RecordingAdapter>) -> SubmissionWorkflow {
        let mut chains = ChainRegistry::default();
        chains.register(adapter);
        SubmissionWorkflow::new(chains, ChainId(CHAIN.into()))
    }

    fn valid_draft() -> Draft {
        Draft {
            form: FormState {
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                isbn: "9780441013593".into(),
                cover_uri: "https://covers.openlibrary.org/b/id/11481354-L.jpg".into(),
                finished_at_local_date: String::new(),
                place: "Plane".into(),
                mood: "Inspired".into(),
                time_label: "late night".into(),
                fragment: "Fear is the mind-killer.".into(),
                photo_uri: "ipfs://photo".into(),
            },
            candidates: vec![Candidate::default()],
        }
    }

    fn connected() -> WalletSession {
        WalletSession::connected(WalletAddress(ACCOUNT.into()))
    }

    #[tokio::test]
    async fn missing_contract_address_short_circuits() {
        let adapter = Arc::new(RecordingAdapter::default());
        let workflow = workflow(adapter.clone());
        let mut draft = valid_draft();

        for wallet in [connected(), WalletSession::disconnected()] {
            let err = workflow
                .submit(&mut draft, &ContractConfig::default(), &wallet)
                .await
                .unwrap_err();
            assert_eq!(err, MintError::MissingContractAddress);
        }

        assert!(adapter.calls().is_empty());
        assert_eq!(draft, valid_draft());
    }

    #[tokio::test]
    async fn disconnected_wallet_is_rejected_without_a_write() {
        let adapter = Arc::new(RecordingAdapter::default());
        let workflow = workflow(adapter.clone());
        let mut draft = valid_draft();

        let err = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &WalletSession::disconnected())
            .await
            .unwrap_err();

        assert_eq!(err, MintError::WalletNotConnected);
        assert!(adapter.calls().is_empty());
        assert_eq!(workflow.phase().await, SubmissionPhase::Settled { success: false });
    }

    #[tokio::test]
    async fn title_and_author_are_required() {
        let adapter = Arc::new(RecordingAdapter::default());
        let workflow = workflow(adapter.clone());

        let mut draft = valid_draft();
        draft.set_field(crate::FormField::Title, "  ");
        let err = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &connected())
            .await
            .unwrap_err();
        assert_eq!(err, MintError::MissingField("title"));

        let mut draft = valid_draft();
        draft.set_field(crate::FormField::Author, "");
        let err = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &connected())
            .await
            .unwrap_err();
        assert_eq!(err, MintError::MissingField("author"));

        assert!(adapter.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_contract_address_fails_construction() {
        let adapter = Arc::new(RecordingAdapter::default());
        let workflow = workflow(adapter.clone());

        for bad in ["2222222222222222222222222222222222222222", "0x1234", "0xzz22222222222222222222222222222222222222"] {
            let mut draft = valid_draft();
            let err = workflow
                .submit(&mut draft, &ContractConfig::new(bad), &connected())
                .await
                .unwrap_err();
            assert!(matches!(err, MintError::SubmissionFailed(Some(_))));
            assert_eq!(draft, valid_draft());
        }
        assert!(adapter.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_finished_date_fails_construction() {
        let adapter = Arc::new(RecordingAdapter::default());
        let workflow = workflow(adapter.clone());
        let mut draft = valid_draft();
        draft.set_field(crate::FormField::FinishedAtLocalDate, "2024-02-30");

        let err = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &connected())
            .await
            .unwrap_err();
        assert!(matches!(err, MintError::SubmissionFailed(Some(_))));
        assert!(adapter.calls().is_empty());
    }

    #[tokio::test]
    async fn success_sends_one_ordered_call_and_clears_the_draft() -> anyhow::Result<()> {
        let adapter = Arc::new(RecordingAdapter::default());
        let workflow = workflow(adapter.clone());
        let mut draft = valid_draft();

        let receipt = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &connected())
            .await?;

        assert_eq!(receipt.tx_hash, TxHash("0xfeed".into()));
        assert_eq!(draft.form, FormState::reset());
        assert!(draft.candidates.is_empty());
        assert_eq!(workflow.phase().await, SubmissionPhase::Settled { success: true });

        let calls = adapter.calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.from.0, ACCOUNT);
        assert_eq!(request.contract.0, CONTRACT);
        assert_eq!(request.chain.0, CHAIN);
        assert_eq!(
            request.call.string_args(),
            [
                "Dune",
                "Frank Herbert",
                "9780441013593",
                "Plane",
                "Inspired",
                "late night",
                "Fear is the mind-killer.",
                "ipfs://photo",
                "https://covers.openlibrary.org/b/id/11481354-L.jpg",
            ]
        );
        assert_eq!(request.call.finished_at, 0);

        Ok(())
    }

    #[tokio::test]
    async fn write_failure_keeps_the_form_and_reports_short_message() {
        let adapter = Arc::new(RecordingAdapter::failing(ChainError::Rejected(
            "User rejected the request.".into(),
        )));
        let workflow = workflow(adapter.clone());
        let mut draft = valid_draft();

        let err = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &connected())
            .await
            .unwrap_err();

        assert_eq!(err, MintError::SubmissionFailed(Some("User rejected the request.".into())));
        assert_eq!(draft, valid_draft());
        assert_eq!(adapter.calls().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_uses_generic_message() {
        let adapter = Arc::new(RecordingAdapter::failing(ChainError::Transport("reset".into())));
        let workflow = workflow(adapter.clone());
        let mut draft = valid_draft();

        let err = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &connected())
            .await
            .unwrap_err();
        assert_eq!(err.outcome().message, "Transaction failed");
    }

    #[tokio::test]
    async fn unregistered_chain_fails_without_a_write() {
        let adapter = Arc::new(RecordingAdapter::default());
        let mut chains = ChainRegistry::default();
        chains.register(adapter.clone());
        let workflow = SubmissionWorkflow::new(chains, ChainId("base-sepolia".into()));

        let mut draft = valid_draft();
        let err = workflow
            .submit(&mut draft, &ContractConfig::new(CONTRACT), &connected())
            .await
            .unwrap_err();
        assert!(matches!(err, MintError::SubmissionFailed(Some(_))));
        assert!(adapter.calls().is_empty());
    }

    #[test]
    fn build_call_converts_the_finished_date() {
        let form = FormState {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            finished_at_local_date: "2024-01-15".into(),
            ..FormState::default()
        };
        let call = build_call(&form).unwrap();
        assert_eq!(
            call.finished_at,
            crate::finished_at_from_local_date("2024-01-15").unwrap()
        );
        assert!(call.finished_at > 0);
    }

    #[test]
    fn phase_labels_and_pending() {
        assert!(SubmissionPhase::AwaitingWalletWrite.is_pending());
        assert!(!SubmissionPhase::Settled { success: true }.is_pending());
        assert_eq!(SubmissionPhase::Idle.label(), "idle");
    }
}
