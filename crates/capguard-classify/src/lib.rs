//! # capguard-classify
//!
//! Classification sources. Each one turns a command line into a
//! [`ClassificationInput`](capguard_core::classification::ClassificationInput);
//! callers only ever see them as `dyn IClassifier`.

pub mod chain;
pub mod curated;
pub mod family;
pub mod heuristic;
pub mod rules;

pub use chain::ChainClassifier;
pub use curated::CuratedClassifier;
pub use family::classify_family;
pub use heuristic::{HeuristicClassifier, HeuristicRule};

/// Collapse runs of whitespace so `git   status` and `git status` match.
pub(crate) fn normalize_command(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}
