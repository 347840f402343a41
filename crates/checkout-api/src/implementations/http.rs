//! HTTP order API implementation.
//!
//! Posts the order as JSON to `{base_url}{order_path}`. A 2xx answer is parsed
//! as an [`OrderResponse`]; any other status is a rejection whose body may
//! carry an `error` message.

use crate::{ApiError, OrderApiFactory, OrderApiInterface, OrderApiRegistry};
use async_trait::async_trait;
use checkout_types::{
	ApiErrorBody, ConfigSchema, Field, FieldType, ImplementationRegistry, Order, OrderResponse,
	Schema, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the HTTP order API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpOrderApiConfig {
	/// Root of the shop API, e.g. `https://shop.example/api`.
	pub base_url: String,
	#[serde(default = "default_order_path")]
	pub order_path: String,
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

fn default_order_path() -> String {
	"/order".to_string()
}

fn default_timeout_seconds() -> u64 {
	30
}

/// Order API client speaking JSON over HTTP.
pub struct HttpOrderApi {
	client: reqwest::Client,
	endpoint: String,
}

impl HttpOrderApi {
	pub fn new(config: HttpOrderApiConfig) -> Result<Self, ApiError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(config.timeout_seconds))
			.build()
			.map_err(|e| ApiError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			endpoint: join_url(&config.base_url, &config.order_path),
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

fn join_url(base_url: &str, path: &str) -> String {
	format!(
		"{}/{}",
		base_url.trim_end_matches('/'),
		path.trim_start_matches('/')
	)
}

/// Configuration schema for the HTTP order API.
pub struct HttpOrderApiSchema;

impl ConfigSchema for HttpOrderApiSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("base_url", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
						Ok(())
					},
					_ => Err("base_url must start with http:// or https://".to_string()),
				}
			})],
			vec![
				Field::new("order_path", FieldType::String),
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
			],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl OrderApiInterface for HttpOrderApi {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpOrderApiSchema)
	}

	async fn submit_order(&self, order: &Order) -> Result<OrderResponse, ApiError> {
		tracing::debug!(endpoint = %self.endpoint, items = order.items.len(), "Posting order");

		let response = self
			.client
			.post(&self.endpoint)
			.json(order)
			.send()
			.await
			.map_err(|e| ApiError::Network(e.to_string()))?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| ApiError::Network(e.to_string()))?;

		if status.is_success() {
			serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
		} else {
			tracing::debug!(%status, "Order API refused the order");
			Err(rejection_from_body(&body))
		}
	}
}

// A refusal without a readable body still counts as a rejection, just without a message.
fn rejection_from_body(body: &str) -> ApiError {
	let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
	ApiError::Rejected {
		error: parsed.error,
	}
}

/// Registry for the HTTP order API implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = OrderApiFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn OrderApiInterface>, ApiError> {
			let http_config: HttpOrderApiConfig = config
				.clone()
				.try_into()
				.map_err(|e| ApiError::Configuration(format!("Invalid http config: {}", e)))?;

			Ok(Box::new(HttpOrderApi::new(http_config)?))
		}
	}
}

impl OrderApiRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_endpoint_joining() {
		assert_eq!(
			join_url("https://shop.example/api/", "/order"),
			"https://shop.example/api/order"
		);
		assert_eq!(
			join_url("https://shop.example/api", "order"),
			"https://shop.example/api/order"
		);
	}

	#[test]
	fn test_factory_defaults() {
		let config: toml::Value =
			toml::from_str(r#"base_url = "https://shop.example/api""#).unwrap();
		let config: HttpOrderApiConfig = config.try_into().unwrap();
		assert_eq!(config.order_path, "/order");
		assert_eq!(config.timeout_seconds, 30);

		let api = HttpOrderApi::new(config).unwrap();
		assert_eq!(api.endpoint(), "https://shop.example/api/order");
	}

	#[test]
	fn test_factory_requires_base_url() {
		let config = toml::Value::Table(Default::default());
		let result = Registry::factory()(&config);
		assert!(matches!(result, Err(ApiError::Configuration(_))));
	}

	#[test]
	fn test_schema_rejects_non_http_url() {
		let config: toml::Value = toml::from_str(r#"base_url = "shop.example""#).unwrap();
		assert!(HttpOrderApiSchema.validate(&config).is_err());
	}

	#[test]
	fn test_rejection_bodies() {
		let err = rejection_from_body(r#"{"error":"Out of stock"}"#);
		assert_eq!(err.message(), Some("Out of stock"));

		let err = rejection_from_body("<html>502 Bad Gateway</html>");
		assert!(matches!(err, ApiError::Rejected { error: None }));
	}

	#[tokio::test]
	async fn test_unreachable_endpoint_is_network_error() {
		let api = HttpOrderApi::new(HttpOrderApiConfig {
			base_url: "http://127.0.0.1:9".to_string(),
			order_path: default_order_path(),
			timeout_seconds: 2,
		})
		.unwrap();

		let err = api.submit_order(&Order::default()).await.unwrap_err();
		assert!(matches!(err, ApiError::Network(_)));
		assert_eq!(err.message(), None);
	}
}
