//! Pure password policy evaluator
//!
//! Re-evaluated on every keystroke by the registration and password-change
//! surfaces, so it must stay pure: no I/O, no side effects, deterministic.
//! Each rule reports its own status so a checklist UI can show *why* a
//! candidate is invalid, not just that it is.

use profilesync_domain::constants::{PASSWORD_MAX_LEN, PASSWORD_MIN_LEN};

/// The ordered set of policy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Length,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordRule {
    /// Stable identifier, usable as a UI key.
    pub fn id(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Uppercase => "upper",
            Self::Lowercase => "lower",
            Self::Digit => "number",
            Self::Special => "special",
        }
    }

    /// Human-readable requirement label.
    pub fn label(self) -> String {
        match self {
            Self::Length => format!("{PASSWORD_MIN_LEN}-{PASSWORD_MAX_LEN} characters"),
            Self::Uppercase => "At least 1 uppercase letter (A-Z)".to_string(),
            Self::Lowercase => "At least 1 lowercase letter (a-z)".to_string(),
            Self::Digit => "At least 1 number (0-9)".to_string(),
            Self::Special => "At least 1 special character".to_string(),
        }
    }
}

/// Status of one rule for a given candidate.
///
/// `Violated` is distinct from `Unmet` only for the length rule: a candidate
/// longer than the maximum can never become valid by typing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    Unmet,
    Met,
    Violated,
}

/// One rule plus its evaluation for a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEvaluation {
    pub rule: PasswordRule,
    pub status: RuleStatus,
}

/// Ordered evaluation of every rule against one candidate secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyReport {
    pub rules: Vec<RuleEvaluation>,
}

impl PolicyReport {
    /// Overall validity: every rule `Met`.
    pub fn is_valid(&self) -> bool {
        self.rules.iter().all(|r| r.status == RuleStatus::Met)
    }

    pub fn status_of(&self, rule: PasswordRule) -> Option<RuleStatus> {
        self.rules.iter().find(|r| r.rule == rule).map(|r| r.status)
    }
}

/// Evaluate the full rule set against `candidate`.
pub fn evaluate(candidate: &str) -> PolicyReport {
    let len = candidate.chars().count();
    let length_status = if (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        RuleStatus::Met
    } else if len > PASSWORD_MAX_LEN {
        RuleStatus::Violated
    } else {
        RuleStatus::Unmet
    };

    let met_if = |hit: bool| if hit { RuleStatus::Met } else { RuleStatus::Unmet };

    let rules = vec![
        RuleEvaluation { rule: PasswordRule::Length, status: length_status },
        RuleEvaluation {
            rule: PasswordRule::Uppercase,
            status: met_if(candidate.chars().any(|c| c.is_ascii_uppercase())),
        },
        RuleEvaluation {
            rule: PasswordRule::Lowercase,
            status: met_if(candidate.chars().any(|c| c.is_ascii_lowercase())),
        },
        RuleEvaluation {
            rule: PasswordRule::Digit,
            status: met_if(candidate.chars().any(|c| c.is_ascii_digit())),
        },
        RuleEvaluation {
            rule: PasswordRule::Special,
            status: met_if(candidate.chars().any(|c| !c.is_ascii_alphanumeric())),
        },
    ];

    PolicyReport { rules }
}
