//! Order types for the checkout flow.
//!
//! This module defines the in-progress order collected by the checkout forms,
//! the scalar fields that can be edited one at a time, and the field-keyed
//! error mapping produced by form validation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Payment method selected on the delivery form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
	/// Online card payment.
	Card,
	/// Cash on delivery.
	Cash,
}

impl PaymentMethod {
	/// Returns the wire name of the payment method.
	pub fn as_str(&self) -> &'static str {
		match self {
			PaymentMethod::Card => "card",
			PaymentMethod::Cash => "cash",
		}
	}

	/// Parses a form value, returning `None` for anything that is not a known method.
	pub fn from_form_value(value: &str) -> Option<Self> {
		match value {
			"card" => Some(PaymentMethod::Card),
			"cash" => Some(PaymentMethod::Cash),
			_ => None,
		}
	}
}

impl fmt::Display for PaymentMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a string does not name an editable order field.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown order field: {0}")]
pub struct UnknownFieldError(pub String);

/// Scalar order fields that can be set individually from a form.
///
/// `items` and `total` are deliberately absent: they are replaced wholesale
/// and never go through form validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
	Payment,
	Address,
	Email,
	Phone,
}

impl OrderField {
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderField::Payment => "payment",
			OrderField::Address => "address",
			OrderField::Email => "email",
			OrderField::Phone => "phone",
		}
	}

	/// The form group this field is validated with.
	pub fn group(&self) -> FormGroup {
		match self {
			OrderField::Payment | OrderField::Address => FormGroup::Order,
			OrderField::Email | OrderField::Phone => FormGroup::Contacts,
		}
	}
}

impl fmt::Display for OrderField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderField {
	type Err = UnknownFieldError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"payment" => Ok(OrderField::Payment),
			"address" => Ok(OrderField::Address),
			"email" => Ok(OrderField::Email),
			"phone" => Ok(OrderField::Phone),
			other => Err(UnknownFieldError(other.to_string())),
		}
	}
}

/// The two independently validated parts of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormGroup {
	/// Payment method and delivery address.
	Order,
	/// Email and phone.
	Contacts,
}

/// Validation failures keyed by field. An empty mapping means the form is valid.
pub type FormErrors = BTreeMap<OrderField, String>;

/// The in-progress checkout order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	/// Selected payment method, `None` while nothing valid is chosen.
	#[serde(
		default,
		serialize_with = "serialize_payment",
		deserialize_with = "deserialize_payment"
	)]
	pub payment: Option<PaymentMethod>,
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub phone: String,
	/// Item identifiers in basket order.
	#[serde(default)]
	pub items: Vec<String>,
	#[serde(default)]
	pub total: u64,
}

impl Default for Order {
	fn default() -> Self {
		Self {
			payment: Some(PaymentMethod::Card),
			address: String::new(),
			email: String::new(),
			phone: String::new(),
			items: Vec::new(),
			total: 0,
		}
	}
}

// The API expects an empty string rather than null when no method is chosen.
fn serialize_payment<S>(payment: &Option<PaymentMethod>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(payment.map(|p| p.as_str()).unwrap_or(""))
}

fn deserialize_payment<'de, D>(deserializer: D) -> Result<Option<PaymentMethod>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<String>::deserialize(deserializer)?;
	Ok(value.as_deref().and_then(PaymentMethod::from_form_value))
}
