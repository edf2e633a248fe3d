use bb_api_types::{Outcome, OutcomeKind};

const GENERIC_FAILURE: &str = "Transaction failed";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MintError {
    #[error("no contract address configured")]
    MissingContractAddress,

    #[error("wallet not connected")]
    WalletNotConnected,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("submission failed: {}", .0.as_deref().unwrap_or(GENERIC_FAILURE))]
    SubmissionFailed(Option<String>),
}

impl MintError {
    pub fn outcome(&self) -> Outcome {
        match self {
            MintError::MissingContractAddress => Outcome::new(
                OutcomeKind::MissingContractAddress,
                "Paste deployed V2 contract address first",
            ),
            MintError::WalletNotConnected => {
                Outcome::new(OutcomeKind::WalletNotConnected, "Connect your wallet first")
            }
            MintError::MissingField(field) => {
                Outcome::new(OutcomeKind::MissingField, format!("{field} is required"))
            }
            MintError::SubmissionFailed(short) => Outcome::new(
                OutcomeKind::SubmissionFailed,
                short.as_deref().unwrap_or(GENERIC_FAILURE),
            ),
        }
    }
}
