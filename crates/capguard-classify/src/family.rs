use capguard_core::classification::ClassifiedCommand;
use capguard_core::errors::ClassifierError;
use capguard_core::traits::IClassifier;

/// Classify `family sub` for every subcommand.
///
/// Children are named by subcommand only, ready to go into a `FamilyInput`.
/// The first classifier error aborts the whole family.
pub fn classify_family(
    classifier: &dyn IClassifier,
    family: &str,
    subcommands: &[&str],
) -> Result<Vec<ClassifiedCommand>, ClassifierError> {
    subcommands
        .iter()
        .map(|sub| {
            let input = classifier.classify(&format!("{family} {sub}"))?;
            Ok(ClassifiedCommand::new(*sub, input))
        })
        .collect()
}
