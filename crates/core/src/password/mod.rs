//! Password policy evaluation

mod policy;

pub use policy::{evaluate, PasswordRule, PolicyReport, RuleEvaluation, RuleStatus};
