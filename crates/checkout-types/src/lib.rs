//! Common types for the checkout workspace.
//!
//! This crate defines the order data collected by the checkout forms, the
//! events broadcast while the forms are filled in and submitted, and the
//! types exchanged with the remote order API. It is shared by every other
//! crate of the workspace so they agree on one vocabulary.

/// API request and response bodies.
pub mod api;
/// Events published on the checkout event bus.
pub mod events;
/// The in-progress order, its editable fields and form errors.
pub mod order;
/// Registry trait for pluggable implementations.
pub mod registry;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

pub use api::*;
pub use events::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use validation::*;
