//! Order API module for the checkout service.
//!
//! This module provides the interface the order model submits orders through
//! and the implementations behind it. Implementations are selected by name
//! from configuration and built through their registry factories, the same
//! way for the real HTTP endpoint and for the mock used in development.

use async_trait::async_trait;
use checkout_types::{ConfigSchema, ImplementationRegistry, Order, OrderResponse};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod mock;
}

/// Errors that can occur while submitting an order.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The API answered and refused the order, optionally explaining why.
	#[error("Order rejected: {}", .error.as_deref().unwrap_or("no reason given"))]
	Rejected { error: Option<String> },
	/// The API could not be reached.
	#[error("Network error: {0}")]
	Network(String),
	/// The API answered with a body that could not be understood.
	#[error("Decode error: {0}")]
	Decode(String),
	/// The implementation is misconfigured.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl ApiError {
	/// Message the API attached to a rejection, if any.
	///
	/// Transport and decoding failures carry no customer-facing message, and
	/// neither does a rejection with an empty `error`.
	pub fn message(&self) -> Option<&str> {
		match self {
			ApiError::Rejected { error } => error.as_deref().filter(|m| !m.is_empty()),
			_ => None,
		}
	}
}

/// Trait defining the interface for order API implementations.
#[async_trait]
pub trait OrderApiInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Submits the complete order and returns the API's answer.
	async fn submit_order(&self, order: &Order) -> Result<OrderResponse, ApiError>;
}

/// Type alias for order API factory functions.
pub type OrderApiFactory = fn(&toml::Value) -> Result<Box<dyn OrderApiInterface>, ApiError>;

/// Registry trait for order API implementations.
pub trait OrderApiRegistry: ImplementationRegistry<Factory = OrderApiFactory> {}

/// Get all registered order API implementations.
pub fn get_all_implementations() -> Vec<(&'static str, OrderApiFactory)> {
	use implementations::{http, mock};

	vec![
		(http::Registry::NAME, http::Registry::factory()),
		(mock::Registry::NAME, mock::Registry::factory()),
	]
}

/// Service that submits orders through the primary configured implementation.
pub struct OrderApiService {
	implementations: HashMap<String, Arc<dyn OrderApiInterface>>,
	primary_implementation: String,
}

impl OrderApiService {
	/// Creates a new service, failing if `primary_implementation` is not among
	/// the given implementations.
	pub fn new(
		implementations: HashMap<String, Arc<dyn OrderApiInterface>>,
		primary_implementation: String,
	) -> Result<Self, ApiError> {
		if !implementations.contains_key(&primary_implementation) {
			return Err(ApiError::Configuration(format!(
				"Primary implementation '{}' not found in available implementations",
				primary_implementation
			)));
		}

		Ok(Self {
			implementations,
			primary_implementation,
		})
	}

	/// Convenience constructor for a single implementation.
	pub fn single(name: impl Into<String>, implementation: Arc<dyn OrderApiInterface>) -> Self {
		let name = name.into();
		let mut implementations = HashMap::new();
		implementations.insert(name.clone(), implementation);
		Self {
			implementations,
			primary_implementation: name,
		}
	}

	/// Builds every configured implementation with its registered factory.
	///
	/// Each configuration table is validated against the implementation's
	/// schema before it is accepted.
	pub fn from_config(
		configs: &HashMap<String, toml::Value>,
		primary_implementation: &str,
	) -> Result<Self, ApiError> {
		let factories: HashMap<&str, OrderApiFactory> =
			get_all_implementations().into_iter().collect();

		let mut implementations: HashMap<String, Arc<dyn OrderApiInterface>> = HashMap::new();
		for (name, config) in configs {
			let factory = factories.get(name.as_str()).ok_or_else(|| {
				ApiError::Configuration(format!("Unknown order API implementation '{}'", name))
			})?;
			let implementation = factory(config)?;
			implementation
				.config_schema()
				.validate(config)
				.map_err(|e| ApiError::Configuration(format!("{}: {}", name, e)))?;
			tracing::debug!(implementation = %name, "Loaded order API implementation");
			implementations.insert(name.clone(), Arc::from(implementation));
		}

		Self::new(implementations, primary_implementation.to_string())
	}

	/// Name of the implementation orders are submitted through.
	pub fn primary(&self) -> &str {
		&self.primary_implementation
	}

	/// Submits an order using the primary implementation.
	pub async fn submit_order(&self, order: &Order) -> Result<OrderResponse, ApiError> {
		let implementation = self
			.implementations
			.get(&self.primary_implementation)
			.ok_or_else(|| {
				ApiError::Configuration(format!(
					"Primary implementation '{}' not available",
					self.primary_implementation
				))
			})?;

		implementation.submit_order(order).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejection_message() {
		let err = ApiError::Rejected {
			error: Some("Out of stock".to_string()),
		};
		assert_eq!(err.message(), Some("Out of stock"));
		assert_eq!(err.to_string(), "Order rejected: Out of stock");

		assert_eq!(ApiError::Rejected { error: None }.message(), None);
		assert_eq!(
			ApiError::Rejected {
				error: Some(String::new())
			}
			.message(),
			None
		);
		assert_eq!(ApiError::Network("refused".into()).message(), None);
	}

	#[test]
	fn test_unknown_primary() {
		let result = OrderApiService::new(HashMap::new(), "http".to_string());
		assert!(matches!(result, Err(ApiError::Configuration(_))));
	}

	#[test]
	fn test_from_config() {
		let mut configs = HashMap::new();
		configs.insert(
			"mock".to_string(),
			toml::from_str::<toml::Value>("total = 42").unwrap(),
		);
		configs.insert(
			"http".to_string(),
			toml::from_str::<toml::Value>(r#"base_url = "http://localhost:8080""#).unwrap(),
		);

		let service = OrderApiService::from_config(&configs, "mock").unwrap();
		assert_eq!(service.primary(), "mock");

		configs.insert(
			"carrier_pigeon".to_string(),
			toml::Value::Table(Default::default()),
		);
		assert!(matches!(
			OrderApiService::from_config(&configs, "mock"),
			Err(ApiError::Configuration(_))
		));
	}

	#[test]
	fn test_from_config_rejects_invalid_table() {
		let mut configs = HashMap::new();
		configs.insert(
			"http".to_string(),
			toml::from_str::<toml::Value>("timeout_seconds = 5").unwrap(),
		);
		let err = OrderApiService::from_config(&configs, "http").err().unwrap();
		assert!(err.to_string().contains("http"));
	}

	#[tokio::test]
	async fn test_submit_through_primary() {
		let mut configs = HashMap::new();
		configs.insert(
			"mock".to_string(),
			toml::from_str::<toml::Value>("total = 42").unwrap(),
		);
		let service = OrderApiService::from_config(&configs, "mock").unwrap();

		let response = service.submit_order(&Order::default()).await.unwrap();
		assert_eq!(response.total, 42);
	}
}
