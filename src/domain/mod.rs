//! Pure domain model: no I/O, every function here is a plain computation.
//!
//! The services layer resolves repository state (uniqueness lookups, joined
//! rows) and hands plain values to these modules, so the rules themselves are
//! testable without a database.

pub mod price;
pub mod session;
pub mod status;
pub mod validate;

pub use price::Price;
pub use session::{Identity, Session};
pub use status::{ItemStatus, OrderStatus};
pub use validate::{Rule, ValidationError, Violation};

/// Image reference returned for items that never had a photo uploaded.
pub const PLACEHOLDER_PHOTO: &str = "/Fat_unicorn.jpg";
