//! Event types broadcast by the order model.
//!
//! Views subscribe to these events to re-render form state, show validation
//! messages and report the outcome of a submission.

use crate::{FormErrors, FormGroup};
use serde::{Deserialize, Serialize};

/// Validity of one form group together with the errors behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityPayload {
	pub is_valid: bool,
	pub errors: FormErrors,
}

impl ValidityPayload {
	/// Payload derived from a validation pass: valid iff there are no errors.
	pub fn from_errors(errors: FormErrors) -> Self {
		Self {
			is_valid: errors.is_empty(),
			errors,
		}
	}

	/// Payload announcing a form that has not been validated yet.
	pub fn reset() -> Self {
		Self {
			is_valid: false,
			errors: FormErrors::new(),
		}
	}
}

/// Events published on the checkout event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum CheckoutEvent {
	/// Result of validating payment method and delivery address.
	#[serde(rename = "order:valid")]
	OrderValid(ValidityPayload),
	/// Result of validating email and phone.
	#[serde(rename = "contacts:valid")]
	ContactsValid(ValidityPayload),
	/// The API accepted the order. `total` is the amount it reported.
	#[serde(rename = "order:success")]
	OrderSuccess { total: u64 },
	/// The API refused the order or could not be reached.
	#[serde(rename = "order:error")]
	OrderError { error: String },
}

impl CheckoutEvent {
	/// Builds the validity event of the given form group.
	pub fn validity(group: FormGroup, payload: ValidityPayload) -> Self {
		match group {
			FormGroup::Order => CheckoutEvent::OrderValid(payload),
			FormGroup::Contacts => CheckoutEvent::ContactsValid(payload),
		}
	}

	/// Name of the event as seen by subscribers.
	pub fn name(&self) -> &'static str {
		match self {
			CheckoutEvent::OrderValid(_) => "order:valid",
			CheckoutEvent::ContactsValid(_) => "contacts:valid",
			CheckoutEvent::OrderSuccess { .. } => "order:success",
			CheckoutEvent::OrderError { .. } => "order:error",
		}
	}
}
