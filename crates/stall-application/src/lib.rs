//! Order-taking core: the dialogue state machine and the services it drives.

pub mod bootstrap;
pub mod combo_resolver;
pub mod dialogue;
pub mod pricing;
pub mod replies;
pub mod session_store;

pub use crate::bootstrap::{build_manager, build_manager_with, build_order_repository};
pub use crate::combo_resolver::ComboResolver;
pub use crate::dialogue::{DialogueManager, OrderSummary};
pub use crate::pricing::{PricingAggregator, Quote};
pub use crate::session_store::SessionStore;
