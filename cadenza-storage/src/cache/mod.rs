pub mod accountant;

pub use accountant::{StorageAccountant, StoreOutcome};
