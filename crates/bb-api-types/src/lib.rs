use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletAddress(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxHash(pub String);

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One normalized lookup suggestion used to pre-fill the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_uri: Option<String>,
}

/// How the reader felt finishing the book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mood {
    Peaceful,
    Curious,
    Heartbroken,
    Inspired,
    Cozy,
    #[serde(rename = "Mind-blown")]
    MindBlown,
    Anxious,
    Nostalgic,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Peaceful,
        Mood::Curious,
        Mood::Heartbroken,
        Mood::Inspired,
        Mood::Cozy,
        Mood::MindBlown,
        Mood::Anxious,
        Mood::Nostalgic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Peaceful => "Peaceful",
            Mood::Curious => "Curious",
            Mood::Heartbroken => "Heartbroken",
            Mood::Inspired => "Inspired",
            Mood::Cozy => "Cozy",
            Mood::MindBlown => "Mind-blown",
            Mood::Anxious => "Anxious",
            Mood::Nostalgic => "Nostalgic",
        }
    }

    pub fn parse(value: &str) -> Option<Mood> {
        Self::ALL.into_iter().find(|mood| mood.as_str() == value)
    }
}

/// The single persisted configuration value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractConfig {
    pub address: String,
}

impl ContractConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.address.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Saved,
    CandidatesFound,
    NoResults,
    Connected,
    Disconnected,
    Submitted,
    EmptyQuery,
    LookupFailed,
    NoWalletAvailable,
    WalletConnectionRejected,
    MissingContractAddress,
    WalletNotConnected,
    MissingField,
    SubmissionFailed,
    Busy,
}

/// A single user-visible notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfigRequest {
    pub contract_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub loading: bool,
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSessionResponse {
    pub state: String,
    pub address: Option<String>,
    pub is_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub tx_hash: String,
    pub chain: String,
    pub notice: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitStatusResponse {
    pub chain: String,
    pub phase: String,
    pub pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_round_trips_through_display_names() {
        for mood in Mood::ALL {
            assert_eq!(Mood::parse(mood.as_str()), Some(mood));
        }
        assert_eq!(Mood::parse("Mind-blown"), Some(Mood::MindBlown));
        assert_eq!(Mood::parse("mind-blown"), None);
        assert_eq!(Mood::parse(""), None);
    }

    #[test]
    fn mood_serializes_with_display_name() {
        let json = serde_json::to_string(&Mood::MindBlown).unwrap();
        assert_eq!(json, "\"Mind-blown\"");
    }

    #[test]
    fn blank_contract_config_is_not_configured() {
        assert!(!ContractConfig::default().is_configured());
        assert!(!ContractConfig::new("   ").is_configured());
        assert!(ContractConfig::new("0xabc").is_configured());
    }

    #[test]
    fn candidate_omits_absent_optionals() {
        let candidate = Candidate {
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            isbn: None,
            cover_uri: None,
        };
        let value = serde_json::to_value(&candidate).unwrap();
        assert!(value.get("isbn").is_none());
        assert!(value.get("cover_uri").is_none());
    }

    #[test]
    fn outcome_kinds_serialize_in_snake_case() {
        let outcome = Outcome::new(OutcomeKind::MissingContractAddress, "Paste it first");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["kind"], "missing_contract_address");
        assert_eq!(value["message"], "Paste it first");
    }
}
