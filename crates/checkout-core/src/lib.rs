//! Core of the checkout flow.
//!
//! The [`OrderModel`] holds the order being filled in and validates it as the
//! customer edits the forms; the [`EventBus`] carries its announcements to
//! whoever renders them.

pub mod event_bus;
pub mod model;

pub use event_bus::EventBus;
pub use model::OrderModel;
