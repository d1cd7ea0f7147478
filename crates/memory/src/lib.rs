pub mod store;
pub mod types;

pub use store::{ChatLogStore, MemoryError};
pub use types::{ChatEntry, ChatLog};
