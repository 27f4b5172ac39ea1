use serde::{Deserialize, Serialize};
use std::fmt;

/// Width every CCP account number is zero-padded to.
pub const ACCOUNT_WIDTH: usize = 10;

/// Bank and branch code of Algérie Poste, leading every RIP.
pub const RIP_PREFIX: &str = "00799999";

/// Prefix + padded account + 2-digit key.
pub const RIP_LEN: usize = RIP_PREFIX.len() + ACCOUNT_WIDTH + 2;

/// What to do with account numbers wider than [`ACCOUNT_WIDTH`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LengthPolicy {
    /// Reject them.
    #[default]
    Strict,
    /// Keep only the low-order digits.
    Lenient,
}

/// Why an input could not be derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidReason {
    /// Empty or whitespace-only; the user has not typed anything yet.
    Empty,
    /// `position` is a char offset into the trimmed input.
    NonDigit { position: usize, found: char },
    TooLong { digits: usize },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Empty => write!(f, "no account number entered"),
            InvalidReason::NonDigit { position, found } => {
                write!(f, "unexpected character {:?} at position {}", found, position)
            }
            InvalidReason::TooLong { digits } => write!(
                f,
                "{} digits, at most {} allowed",
                digits, ACCOUNT_WIDTH
            ),
        }
    }
}

/// The identifiers derived from one valid CCP account number.
///
/// Only the engine builds these, so every instance satisfies the length
/// and suffix invariants checked in [`CcpDetails::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CcpDetails {
    account_number: String,
    check_key: String,
    rip: String,
    rip_check_key: String,
}

impl CcpDetails {
    pub(crate) fn new(account_number: String, check_key: String, rip: String) -> Self {
        debug_assert_eq!(account_number.len(), ACCOUNT_WIDTH);
        debug_assert_eq!(check_key.len(), 2);
        debug_assert_eq!(rip.len(), RIP_LEN);

        let rip_check_key = format!("{:0>2}", &rip[rip.len().saturating_sub(2)..]);
        Self {
            account_number,
            check_key,
            rip,
            rip_check_key,
        }
    }

    /// Zero-padded account number.
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// The CCP "clé".
    pub fn check_key(&self) -> &str {
        &self.check_key
    }

    pub fn rip(&self) -> &str {
        &self.rip
    }

    pub fn rip_check_key(&self) -> &str {
        &self.rip_check_key
    }
}

/// Outcome of deriving one raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    Valid(CcpDetails),
    Invalid(InvalidReason),
}

impl Derivation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Derivation::Valid(_))
    }

    pub fn details(&self) -> Option<&CcpDetails> {
        match self {
            Derivation::Valid(details) => Some(details),
            Derivation::Invalid(_) => None,
        }
    }

    pub fn invalid_reason(&self) -> Option<&InvalidReason> {
        match self {
            Derivation::Valid(_) => None,
            Derivation::Invalid(reason) => Some(reason),
        }
    }

    /// True when a form should show a validation hint: something was
    /// entered and it is not a usable account number.
    pub fn should_warn(&self) -> bool {
        matches!(self, Derivation::Invalid(reason) if *reason != InvalidReason::Empty)
    }

    pub fn to_result(&self) -> CcpDerivationResult {
        CcpDerivationResult::from(self)
    }
}

/// Flat view of a [`Derivation`] for display and serialization.
/// Invalid derivations leave every string empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CcpDerivationResult {
    pub account_number: String,
    pub check_key: String,
    pub rip: String,
    pub rip_check_key: String,
    pub is_valid: bool,
}

impl From<&Derivation> for CcpDerivationResult {
    fn from(derivation: &Derivation) -> Self {
        match derivation {
            Derivation::Valid(details) => Self {
                account_number: details.account_number.clone(),
                check_key: details.check_key.clone(),
                rip: details.rip.clone(),
                rip_check_key: details.rip_check_key.clone(),
                is_valid: true,
            },
            Derivation::Invalid(_) => Self::default(),
        }
    }
}

impl From<Derivation> for CcpDerivationResult {
    fn from(derivation: Derivation) -> Self {
        Self::from(&derivation)
    }
}

/// Result of checking a RIP someone else produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RipVerification {
    Valid(CcpDetails),
    Malformed(String),
    UnknownPrefix(String),
    KeyMismatch { expected: String, found: String },
}

impl RipVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, RipVerification::Valid(_))
    }
}

impl fmt::Display for RipVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RipVerification::Valid(details) => write!(f, "valid (CCP {})", details.account_number),
            RipVerification::Malformed(reason) => write!(f, "malformed: {}", reason),
            RipVerification::UnknownPrefix(prefix) => {
                write!(f, "prefix {} is not {}", prefix, RIP_PREFIX)
            }
            RipVerification::KeyMismatch { expected, found } => {
                write!(f, "key {} does not match expected {}", found, expected)
            }
        }
    }
}

/// How the batch pipeline treats rows whose account number is invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum InvalidRowPolicy {
    /// Emit the row with empty derived columns.
    #[default]
    Keep,
    Skip,
    /// Abort the run on the first invalid row.
    Fail,
}

/// Client rows as read from the input, headers first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Counters and outputs of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub rows: usize,
    pub valid: usize,
    pub invalid: usize,
    pub pending: usize,
    pub skipped: usize,
    pub outputs: Vec<String>,
}

/// Client rows after derivation, ready to be written out.
#[derive(Debug, Clone, Default)]
pub struct DerivedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub report: BatchReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rip_len_matches_composition() {
        assert_eq!(RIP_LEN, 20);
    }

    #[test]
    fn test_invalid_projects_to_empty_fields() {
        let result = Derivation::Invalid(InvalidReason::Empty).to_result();
        assert_eq!(result, CcpDerivationResult::default());
        assert!(!result.is_valid);
    }

    #[test]
    fn test_should_warn_only_for_entered_input() {
        assert!(!Derivation::Invalid(InvalidReason::Empty).should_warn());
        assert!(Derivation::Invalid(InvalidReason::NonDigit {
            position: 0,
            found: 'a'
        })
        .should_warn());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let details = CcpDetails::new(
            "1234567890".to_string(),
            "45".to_string(),
            "00799999123456789006".to_string(),
        );
        let json = serde_json::to_value(Derivation::Valid(details).to_result()).unwrap();
        assert_eq!(json["accountNumber"], "1234567890");
        assert_eq!(json["checkKey"], "45");
        assert_eq!(json["ripCheckKey"], "06");
        assert_eq!(json["isValid"], true);
    }

    #[test]
    fn test_invalid_reason_messages() {
        let reason = InvalidReason::NonDigit {
            position: 2,
            found: '-',
        };
        assert_eq!(reason.to_string(), "unexpected character '-' at position 2");
        assert_eq!(
            InvalidReason::TooLong { digits: 12 }.to_string(),
            "12 digits, at most 10 allowed"
        );
    }
}
