//! Algérie Poste CCP account keys and RIP derivation.
//!
//! Everything here is pure: no I/O, no logging, no shared state.

use crate::domain::model::{
    CcpDetails, Derivation, InvalidReason, LengthPolicy, RipVerification, ACCOUNT_WIDTH,
    RIP_LEN, RIP_PREFIX,
};

/// Derives with the default [`LengthPolicy::Strict`] engine.
pub fn derive(raw: &str) -> Derivation {
    CcpEngine::default().derive(raw)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CcpEngine {
    policy: LengthPolicy,
}

impl CcpEngine {
    pub fn new(policy: LengthPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    /// Validates `raw` and derives the CCP key, the RIP and the RIP key.
    /// Never panics; bad input comes back as [`Derivation::Invalid`].
    pub fn derive(&self, raw: &str) -> Derivation {
        let account_number = match self.normalize(raw) {
            Ok(digits) => digits,
            Err(reason) => return Derivation::Invalid(reason),
        };

        // At most 10 digits, so this cannot overflow.
        let account = account_number
            .bytes()
            .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));

        let check_key = check_key(&account_number);
        let rip = format!("{}{}{:02}", RIP_PREFIX, account_number, rip_key(account));

        Derivation::Valid(CcpDetails::new(account_number, check_key, rip))
    }

    /// Checks a complete RIP: shape, bank prefix, then its key against
    /// the one derived from the embedded account number.
    pub fn verify_rip(&self, raw: &str) -> RipVerification {
        let rip = raw.trim();

        if !rip.bytes().all(|b| b.is_ascii_digit()) {
            return RipVerification::Malformed("a RIP contains digits only".to_string());
        }
        if rip.len() != RIP_LEN {
            return RipVerification::Malformed(format!(
                "expected {} digits, got {}",
                RIP_LEN,
                rip.len()
            ));
        }

        let (prefix, rest) = rip.split_at(RIP_PREFIX.len());
        if prefix != RIP_PREFIX {
            return RipVerification::UnknownPrefix(prefix.to_string());
        }

        let (account, found) = rest.split_at(ACCOUNT_WIDTH);
        match CcpEngine::new(LengthPolicy::Strict).derive(account) {
            Derivation::Valid(details) if details.rip_check_key() == found => {
                RipVerification::Valid(details)
            }
            Derivation::Valid(details) => RipVerification::KeyMismatch {
                expected: details.rip_check_key().to_string(),
                found: found.to_string(),
            },
            Derivation::Invalid(reason) => RipVerification::Malformed(reason.to_string()),
        }
    }

    /// Trims, checks the digits, and pads to [`ACCOUNT_WIDTH`].
    fn normalize(&self, raw: &str) -> Result<String, InvalidReason> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidReason::Empty);
        }

        if let Some((position, found)) = trimmed
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_digit())
        {
            return Err(InvalidReason::NonDigit { position, found });
        }

        // ASCII only from here, so byte length == digit count.
        let digits = trimmed.len();
        if digits <= ACCOUNT_WIDTH {
            return Ok(format!("{:0>width$}", trimmed, width = ACCOUNT_WIDTH));
        }

        match self.policy {
            LengthPolicy::Strict => Err(InvalidReason::TooLong { digits }),
            LengthPolicy::Lenient => Ok(trimmed[digits - ACCOUNT_WIDTH..].to_string()),
        }
    }
}

/// CCP "clé": digits right to left weighted 4..=13, sum mod 100.
fn check_key(padded: &str) -> String {
    debug_assert_eq!(padded.len(), ACCOUNT_WIDTH);

    let sum: u32 = padded
        .bytes()
        .rev()
        .zip(4u32..=13)
        .map(|(b, multiplier)| u32::from(b - b'0') * multiplier)
        .sum();

    format!("{:02}", sum % 100)
}

fn rip_key(account: u64) -> u64 {
    key_from_remainder(account * 100 % 97)
}

fn key_from_remainder(remainder: u64) -> u64 {
    let candidate = remainder + 85;
    let key = if candidate > 97 {
        97 - (candidate - 97)
    } else {
        97 - candidate
    };

    debug_assert!(key < 97, "RIP key {} out of range", key);
    key
}
