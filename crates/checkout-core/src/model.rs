//! Order model holding the state of the checkout forms.
//!
//! The model owns the order being filled in, validates the delivery form
//! (payment and address) and the contacts form (email and phone) separately,
//! submits the order through the order API and announces every outcome on the
//! event bus. Views never get mutable access to the order: all changes go
//! through the setters so validation runs where it must.

use crate::event_bus::EventBus;
use checkout_api::OrderApiService;
use checkout_config::Messages;
use checkout_types::{
	CheckoutEvent, FormErrors, FormGroup, Order, OrderField, PaymentMethod, ValidityPayload,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Form-state holder for one checkout.
pub struct OrderModel {
	api: Arc<OrderApiService>,
	event_bus: EventBus,
	messages: Messages,
	order: Order,
	/// Findings of the most recent validation pass, whichever group it was.
	errors: FormErrors,
	/// Latest findings per group since the last clear.
	group_errors: HashMap<FormGroup, FormErrors>,
}

impl OrderModel {
	pub fn new(api: Arc<OrderApiService>, event_bus: EventBus, messages: Messages) -> Self {
		Self {
			api,
			event_bus,
			messages,
			order: Order::default(),
			errors: FormErrors::new(),
			group_errors: HashMap::new(),
		}
	}

	/// Sets one scalar field and revalidates the form it belongs to.
	///
	/// For `payment`, only "card" and "cash" select a method; any other value
	/// leaves the order without one, which the next validation reports.
	/// Matching is exact, so "Card" or " cash" also unset the method.
	pub fn set_order_field(&mut self, field: OrderField, value: impl Into<String>) {
		let value = value.into();
		tracing::debug!(%field, "Updating order field");

		match field {
			OrderField::Payment => self.order.payment = PaymentMethod::from_form_value(&value),
			OrderField::Address => self.order.address = value,
			OrderField::Email => self.order.email = value,
			OrderField::Phone => self.order.phone = value,
		}

		match field.group() {
			FormGroup::Contacts => self.validate_contacts(),
			FormGroup::Order => self.validate_order(),
		};
	}

	/// Replaces the basket items. Does not validate.
	pub fn set_items(&mut self, items: Vec<String>) {
		self.order.items = items;
	}

	/// Replaces the order total. Does not validate.
	pub fn set_total(&mut self, total: u64) {
		self.order.total = total;
	}

	/// Validates payment method and delivery address and publishes `order:valid`.
	///
	/// Returns whether the delivery form is valid.
	pub fn validate_order(&mut self) -> bool {
		let mut errors = FormErrors::new();
		if self.order.payment.is_none() {
			errors.insert(OrderField::Payment, self.messages.payment_required.clone());
		}
		if self.order.address.trim().is_empty() {
			errors.insert(OrderField::Address, self.messages.address_required.clone());
		}

		self.record(FormGroup::Order, errors)
	}

	/// Validates email and phone and publishes `contacts:valid`.
	///
	/// Returns whether the contacts form is valid.
	pub fn validate_contacts(&mut self) -> bool {
		let mut errors = FormErrors::new();
		if self.order.email.trim().is_empty() {
			errors.insert(OrderField::Email, self.messages.email_required.clone());
		}
		if self.order.phone.trim().is_empty() {
			errors.insert(OrderField::Phone, self.messages.phone_required.clone());
		}

		self.record(FormGroup::Contacts, errors)
	}

	fn record(&mut self, group: FormGroup, errors: FormErrors) -> bool {
		let payload = ValidityPayload::from_errors(errors);
		tracing::debug!(
			?group,
			is_valid = payload.is_valid,
			errors = payload.errors.len(),
			"Validated form"
		);

		self.errors = payload.errors.clone();
		self.group_errors.insert(group, payload.errors.clone());

		let is_valid = payload.is_valid;
		self.event_bus
			.publish(CheckoutEvent::validity(group, payload))
			.ok();
		is_valid
	}

	/// Submits the current order.
	///
	/// On success publishes `order:success` with the total reported by the API
	/// and clears the model. On failure publishes `order:error` and keeps the
	/// order so the customer can correct it and retry. Failures are never
	/// returned to the caller; the result only tells whether the API accepted
	/// the order.
	#[instrument(skip_all, fields(items = self.order.items.len(), total = self.order.total))]
	pub async fn submit_order(&mut self) -> bool {
		match self.api.submit_order(&self.order).await {
			Ok(response) => {
				tracing::info!(
					order_id = response.id.as_deref().unwrap_or("-"),
					total = response.total,
					"Order accepted"
				);
				self.event_bus
					.publish(CheckoutEvent::OrderSuccess {
						total: response.total,
					})
					.ok();
				self.clear();
				true
			},
			Err(e) => {
				tracing::warn!(error = %e, "Order submission failed");
				let message = e
					.message()
					.map(str::to_string)
					.unwrap_or_else(|| self.messages.unknown_error.clone());
				self.event_bus
					.publish(CheckoutEvent::OrderError { error: message })
					.ok();
				false
			},
		}
	}

	/// Resets the order and all errors, then announces both forms as not
	/// validated (`isValid: false` with no errors).
	pub fn clear(&mut self) {
		self.order = Order::default();
		self.errors.clear();
		self.group_errors.clear();

		self.event_bus
			.publish(CheckoutEvent::OrderValid(ValidityPayload::reset()))
			.ok();
		self.event_bus
			.publish(CheckoutEvent::ContactsValid(ValidityPayload::reset()))
			.ok();
	}

	/// Read-only view of the current order.
	pub fn get_order(&self) -> &Order {
		&self.order
	}

	/// Errors found by the most recent validation pass.
	pub fn errors(&self) -> &FormErrors {
		&self.errors
	}

	/// Latest errors of one form group, `None` if it has not been validated
	/// since the last clear.
	pub fn errors_for(&self, group: FormGroup) -> Option<&FormErrors> {
		self.group_errors.get(&group)
	}

	/// Whether both forms have been validated since the last clear and passed.
	pub fn is_valid(&self) -> bool {
		[FormGroup::Order, FormGroup::Contacts]
			.iter()
			.all(|group| self.errors_for(*group).is_some_and(|errors| errors.is_empty()))
	}
}
