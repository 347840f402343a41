//! Mock order API for development and tests.
//!
//! Answers every submission with a configured outcome instead of calling a
//! remote service: either success, echoing the order total (or a fixed
//! override), or a rejection with an optional message.

use crate::{ApiError, OrderApiFactory, OrderApiInterface, OrderApiRegistry};
use async_trait::async_trait;
use checkout_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Order, OrderResponse, Schema,
	ValidationError,
};
use serde::{Deserialize, Serialize};

/// How the mock answers submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockOutcome {
	#[default]
	Success,
	Reject,
}

/// Configuration for the mock order API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockOrderApiConfig {
	#[serde(default)]
	pub outcome: MockOutcome,
	/// Message attached to rejections.
	#[serde(default)]
	pub error: Option<String>,
	/// Total reported on success instead of the submitted order's total.
	#[serde(default)]
	pub total: Option<u64>,
}

/// Mock order API answering with a fixed outcome.
pub struct MockOrderApi {
	config: MockOrderApiConfig,
}

impl MockOrderApi {
	pub fn new(config: MockOrderApiConfig) -> Self {
		Self { config }
	}

	/// Mock that accepts every order.
	pub fn accepting() -> Self {
		Self::new(MockOrderApiConfig::default())
	}

	/// Mock that rejects every order with the given message.
	pub fn rejecting(error: Option<&str>) -> Self {
		Self::new(MockOrderApiConfig {
			outcome: MockOutcome::Reject,
			error: error.map(str::to_string),
			total: None,
		})
	}
}

/// Configuration schema for the mock order API.
pub struct MockOrderApiSchema;

impl ConfigSchema for MockOrderApiSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("outcome", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some("success") | Some("reject") => Ok(()),
						_ => Err("outcome must be 'success' or 'reject'".to_string()),
					}
				}),
				Field::new("error", FieldType::String),
				Field::new(
					"total",
					FieldType::Integer {
						min: Some(0),
						max: None,
					},
				),
			],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl OrderApiInterface for MockOrderApi {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MockOrderApiSchema)
	}

	async fn submit_order(&self, order: &Order) -> Result<OrderResponse, ApiError> {
		match self.config.outcome {
			MockOutcome::Success => Ok(OrderResponse {
				id: Some(format!("mock-{}", order.items.len())),
				total: self.config.total.unwrap_or(order.total),
			}),
			MockOutcome::Reject => Err(ApiError::Rejected {
				error: self.config.error.clone(),
			}),
		}
	}
}

/// Registry for the mock order API implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "mock";
	type Factory = OrderApiFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn OrderApiInterface>, ApiError> {
			let mock_config: MockOrderApiConfig = config
				.clone()
				.try_into()
				.map_err(|e| ApiError::Configuration(format!("Invalid mock config: {}", e)))?;

			Ok(Box::new(MockOrderApi::new(mock_config)))
		}
	}
}

impl OrderApiRegistry for Registry {}
