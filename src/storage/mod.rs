pub mod catalog;
pub mod references;

pub use catalog::Catalog;
pub use references::ReferenceSet;
