//! Deterministic language collaborators: the keyword router, the six
//! category parsers and the utterance splitter.

pub mod carrier;
pub mod drink;
pub mod egg_pancake;
pub mod jam_toast;
pub mod numerals;
pub mod registry;
pub mod riceball;
pub mod router;
pub mod snack;
pub mod text;

pub use crate::registry::ParserRegistry;
pub use crate::router::KeywordRouter;
pub use crate::text::{normalize_text, split_spans};
