//! Wire layouts of the two family record kinds.

pub mod delta;
pub mod family;
