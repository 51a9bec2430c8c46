mod aggregator;
mod classifier;
mod store;

pub use aggregator::IAggregator;
pub use classifier::IClassifier;
pub use store::IDescriptorStore;
