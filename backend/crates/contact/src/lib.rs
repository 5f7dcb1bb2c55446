//! Contact Form Module
//!
//! The contact slice of the campus site: a public form whose submissions
//! are validated, stored, and listed. Follows the same
//! flash-message-plus-redirect contract as the accounts crate.

pub mod domain;
pub mod error;
pub mod postgres;
pub mod presentation;

pub use domain::{ContactMessage, ContactRepository};
pub use error::{ContactError, ContactResult};
pub use postgres::PgContactRepository;
pub use presentation::contact_router;
