pub mod config;
pub mod error;
pub mod item;
pub mod llm;
pub mod menu;
pub mod order;
pub mod parser;
pub mod router;
pub mod session;
pub mod slot;

// Re-export common error type
pub use error::{Result, StallError};
pub use item::{ItemFrame, ItemKind, ItemType, ParsedFrame};
pub use session::{Session, SessionContext, SessionStatus};
pub use slot::Slot;
