use capguard_core::classification::ClassificationInput;
use capguard_core::errors::{ClassifierError, ErrorCode};
use capguard_core::traits::IClassifier;
use tracing::debug;

/// Tries each classifier in order and returns the first success.
///
/// A typical chain is curated first, heuristic last, so a hand-written entry
/// always overrides a pattern guess.
#[derive(Default)]
pub struct ChainClassifier {
    classifiers: Vec<Box<dyn IClassifier>>,
}

impl ChainClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, classifier: Box<dyn IClassifier>) -> Self {
        self.classifiers.push(classifier);
        self
    }

    pub fn push(&mut self, classifier: Box<dyn IClassifier>) {
        self.classifiers.push(classifier);
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

impl IClassifier for ChainClassifier {
    fn classify(&self, command: &str) -> Result<ClassificationInput, ClassifierError> {
        let mut last_error = None;
        for classifier in &self.classifiers {
            match classifier.classify(command) {
                Ok(input) => {
                    debug!(command, source = classifier.source_name(), "chain resolved");
                    return Ok(input);
                }
                Err(e) => {
                    debug!(
                        command,
                        source = classifier.source_name(),
                        code = e.error_code(),
                        "chain link declined"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ClassifierError::UnknownCommand {
            name: command.to_string(),
        }))
    }

    fn source_name(&self) -> &str {
        "chain"
    }
}
