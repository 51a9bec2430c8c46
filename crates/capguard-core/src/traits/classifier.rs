use crate::classification::ClassificationInput;
use crate::errors::ClassifierError;

/// Decides what a command's classification is.
///
/// Heuristic, curated and model-backed sources all sit behind this one
/// operation; callers hold `dyn IClassifier` and never look further.
pub trait IClassifier: Send + Sync {
    fn classify(&self, command: &str) -> Result<ClassificationInput, ClassifierError>;

    /// Short label for logs.
    fn source_name(&self) -> &str {
        "classifier"
    }
}
