use crate::models::{DeltaDescriptor, FamilyDescriptor, ToolDescriptor};

/// Key→descriptor store. A miss is `None`, not an error.
pub trait IDescriptorStore: Send + Sync {
    /// Insert or replace the descriptor stored under `name`.
    fn put(&self, name: &str, descriptor: ToolDescriptor);

    fn get(&self, name: &str) -> Option<ToolDescriptor>;

    /// Parent and deltas of a family, always from the same publication.
    fn get_family(&self, name: &str) -> Option<(FamilyDescriptor, Vec<DeltaDescriptor>)>;
}
