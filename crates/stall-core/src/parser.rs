//! Category parser contract.

use crate::error::Result;
use crate::item::{ItemType, ParsedFrame};

/// Turns a text span into a raw attribute frame for one category.
///
/// Finding nothing is not an error: absent attributes are left unset. The
/// only error a parser returns is [`crate::StallError::MenuUnavailable`],
/// for a backing dataset that cannot be loaded.
pub trait CategoryParser: Send + Sync {
    fn item_type(&self) -> ItemType;

    fn parse(&self, text: &str) -> Result<ParsedFrame>;
}
