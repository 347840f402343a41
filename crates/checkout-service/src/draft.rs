//! Order drafts read from disk and applied to the order model.
//!
//! A draft is what a customer would have typed into the forms. Applying it
//! goes through the model setters field by field, so the same validation
//! events fire as in an interactive session.

use checkout_core::OrderModel;
use checkout_types::{OrderField, UnknownFieldError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a draft.
#[derive(Debug, Error)]
pub enum DraftError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Invalid order draft: {0}")]
	Parse(String),
	#[error(transparent)]
	UnknownField(#[from] UnknownFieldError),
	#[error("Invalid override '{0}', expected field=value")]
	Override(String),
}

impl From<toml::de::Error> for DraftError {
	fn from(err: toml::de::Error) -> Self {
		DraftError::Parse(err.message().to_string())
	}
}

/// Form input for one checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDraft {
	#[serde(default)]
	pub payment: String,
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub items: Vec<String>,
	#[serde(default)]
	pub total: u64,
}

impl OrderDraft {
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DraftError> {
		let content = tokio::fs::read_to_string(path).await?;
		Ok(toml::from_str(&content)?)
	}

	/// Applies a `field=value` override, e.g. `email=buyer@example.com`.
	pub fn apply_override(&mut self, assignment: &str) -> Result<(), DraftError> {
		let (name, value) = assignment
			.split_once('=')
			.ok_or_else(|| DraftError::Override(assignment.to_string()))?;
		let value = value.to_string();

		match name.trim().parse::<OrderField>()? {
			OrderField::Payment => self.payment = value,
			OrderField::Address => self.address = value,
			OrderField::Email => self.email = value,
			OrderField::Phone => self.phone = value,
		}
		Ok(())
	}

	/// Feeds the draft into the model the way the forms would.
	pub fn apply(self, model: &mut OrderModel) {
		model.set_items(self.items);
		model.set_total(self.total);
		model.set_order_field(OrderField::Payment, self.payment);
		model.set_order_field(OrderField::Address, self.address);
		model.set_order_field(OrderField::Email, self.email);
		model.set_order_field(OrderField::Phone, self.phone);
	}
}
