mod document;
mod profiles;
mod snapshot;

pub use document::DocumentStore;
#[cfg(test)]
pub use document::MemoryStore;
pub use profiles::ProfileDirectory;
pub use snapshot::load_snapshot;
