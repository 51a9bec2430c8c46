use capguard_core::classification::{
    CapabilityFlags, Classification, ClassificationInput, RiskLevel,
};
use capguard_core::errors::ClassifierError;
use capguard_core::traits::IClassifier;
use regex::Regex;
use tracing::{debug, warn};

use crate::normalize_command;
use crate::rules;

/// One ordered pattern → classification rule.
#[derive(Debug, Clone)]
pub struct HeuristicRule {
    name: String,
    regex: Regex,
    classification: Classification,
}

impl HeuristicRule {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        classification: Classification,
    ) -> Result<Self, ClassifierError> {
        let regex = Regex::new(pattern).map_err(|e| ClassifierError::InvalidRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.into(),
            regex,
            classification,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }
}

/// Pattern-based classifier: rules are tried in order and the first match
/// wins. Commands no rule matches get the fallback, `Low` by default.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    rules: Vec<HeuristicRule>,
    fallback: Classification,
}

impl HeuristicClassifier {
    /// The built-in rule set.
    pub fn new() -> Self {
        let mut rules = Vec::new();
        for builtin in rules::all_rules() {
            match &**builtin.regex {
                Some(regex) => rules.push(HeuristicRule {
                    name: builtin.name.to_string(),
                    regex: regex.clone(),
                    classification: Classification::new(builtin.risk, builtin.capabilities),
                }),
                None => warn!(rule = builtin.name, "built-in rule failed to compile, skipped"),
            }
        }
        Self {
            rules,
            fallback: Self::default_fallback(),
        }
    }

    /// No rules; everything gets the fallback.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Self::default_fallback(),
        }
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: HeuristicRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Insert a rule ahead of every existing one.
    pub fn with_priority_rule(mut self, rule: HeuristicRule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    pub fn with_fallback(mut self, fallback: Classification) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(HeuristicRule::name).collect()
    }

    /// The rule that decides `command`, if any.
    pub fn matching_rule(&self, command: &str) -> Option<&HeuristicRule> {
        let command = normalize_command(command);
        self.rules.iter().find(|rule| rule.matches(&command))
    }

    fn default_fallback() -> Classification {
        Classification::new(RiskLevel::Low, CapabilityFlags::empty())
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IClassifier for HeuristicClassifier {
    fn classify(&self, command: &str) -> Result<ClassificationInput, ClassifierError> {
        match self.matching_rule(command) {
            Some(rule) => {
                debug!(command, rule = rule.name(), "heuristic rule matched");
                Ok(rule.classification.to_input())
            }
            None => {
                debug!(command, "no heuristic rule matched, using fallback");
                Ok(self.fallback.to_input())
            }
        }
    }

    fn source_name(&self) -> &str {
        "heuristic"
    }
}
