//! Configuration module for the checkout service.
//!
//! Configuration is read from a TOML file. Values may reference environment
//! variables as `${VAR}` or `${VAR:-default}`; they are substituted before
//! the file is parsed, so secrets and endpoints can be injected at deploy time.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only, not the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the checkout service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this checkout instance.
	pub checkout: CheckoutConfig,
	/// Event bus settings.
	#[serde(default)]
	pub events: EventsConfig,
	/// Texts shown to the customer.
	#[serde(default)]
	pub messages: Messages,
	/// Order API implementations.
	pub api: ApiConfig,
}

/// Configuration specific to the checkout instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutConfig {
	/// Unique identifier, used in logs.
	pub id: String,
}

/// Configuration for the event bus.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
	/// Number of events buffered per subscriber before the oldest are dropped.
	#[serde(default = "default_event_capacity")]
	pub capacity: usize,
}

impl Default for EventsConfig {
	fn default() -> Self {
		Self {
			capacity: default_event_capacity(),
		}
	}
}

fn default_event_capacity() -> usize {
	100
}

/// Customer-facing validation and failure messages.
///
/// Every entry has an English default; a localized deployment overrides
/// them in the `[messages]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Messages {
	#[serde(default = "default_payment_required")]
	pub payment_required: String,
	#[serde(default = "default_address_required")]
	pub address_required: String,
	#[serde(default = "default_email_required")]
	pub email_required: String,
	#[serde(default = "default_phone_required")]
	pub phone_required: String,
	/// Reported when a failed submission carries no message of its own.
	#[serde(default = "default_unknown_error")]
	pub unknown_error: String,
}

impl Default for Messages {
	fn default() -> Self {
		Self {
			payment_required: default_payment_required(),
			address_required: default_address_required(),
			email_required: default_email_required(),
			phone_required: default_phone_required(),
			unknown_error: default_unknown_error(),
		}
	}
}

fn default_payment_required() -> String {
	"Choose a payment method".to_string()
}

fn default_address_required() -> String {
	"Provide a delivery address".to_string()
}

fn default_email_required() -> String {
	"Provide an email".to_string()
}

fn default_phone_required() -> String {
	"Provide a phone number".to_string()
}

fn default_unknown_error() -> String {
	"Unknown error".to_string()
}

impl Messages {
	fn entries(&self) -> [(&'static str, &str); 5] {
		[
			("payment_required", self.payment_required.as_str()),
			("address_required", self.address_required.as_str()),
			("email_required", self.email_required.as_str()),
			("phone_required", self.phone_required.as_str()),
			("unknown_error", self.unknown_error.as_str()),
		]
	}
}

/// Configuration for the order API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Name of the implementation orders are submitted through.
	pub primary: String,
	/// Map of implementation names to their configuration tables.
	pub implementations: HashMap<String, toml::Value>,
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of `VAR_NAME`, or with the default of
/// `${VAR_NAME:-default}` when the variable is unset.
///
/// Input is limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// - checkout id is not empty
	/// - event capacity is positive
	/// - at least one API implementation exists and the primary one is among them
	/// - no message is empty
	fn validate(&self) -> Result<(), ConfigError> {
		if self.checkout.id.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Checkout ID cannot be empty".into(),
			));
		}

		if self.events.capacity == 0 {
			return Err(ConfigError::Validation(
				"Event bus capacity must be greater than zero".into(),
			));
		}

		if self.api.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one API implementation must be configured".into(),
			));
		}

		if !self.api.implementations.contains_key(&self.api.primary) {
			return Err(ConfigError::Validation(format!(
				"Primary API implementation '{}' not found in configured implementations",
				self.api.primary
			)));
		}

		for (name, text) in self.messages.entries() {
			if text.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Message '{}' cannot be empty",
					name
				)));
			}
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
[checkout]
id = "web-shop"

[api]
primary = "mock"
[api.implementations.mock]
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("CHECKOUT_TEST_HOST", "localhost");
		std::env::set_var("CHECKOUT_TEST_PORT", "8080");

		let input = "base_url = \"http://${CHECKOUT_TEST_HOST}:${CHECKOUT_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "base_url = \"http://localhost:8080\"");

		std::env::remove_var("CHECKOUT_TEST_HOST");
		std::env::remove_var("CHECKOUT_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${CHECKOUT_MISSING_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${CHECKOUT_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.unwrap_err().to_string().contains("CHECKOUT_MISSING_VAR"));
	}

	#[test]
	fn test_minimal_config_uses_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.checkout.id, "web-shop");
		assert_eq!(config.events.capacity, 100);
		assert_eq!(config.messages, Messages::default());
		assert_eq!(config.messages.unknown_error, "Unknown error");
		assert!(config.api.implementations.contains_key("mock"));
	}

	#[test]
	fn test_localized_messages() {
		let config_str = format!(
			"{}\n[messages]\npayment_required = \"Выберите способ оплаты\"\nunknown_error = \"Неизвестная ошибка\"\n",
			MINIMAL
		);
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.messages.payment_required, "Выберите способ оплаты");
		assert_eq!(config.messages.unknown_error, "Неизвестная ошибка");
		assert_eq!(config.messages.address_required, "Provide a delivery address");
	}

	#[test]
	fn test_unknown_primary_rejected() {
		let config_str = r#"
[checkout]
id = "web-shop"

[api]
primary = "http"
[api.implementations.mock]
"#;
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
		assert!(err.to_string().contains("http"));
	}

	#[test]
	fn test_empty_values_rejected() {
		let empty_id = MINIMAL.replace("web-shop", " ");
		assert!(matches!(
			empty_id.parse::<Config>(),
			Err(ConfigError::Validation(_))
		));

		let zero_capacity = format!("{}\n[events]\ncapacity = 0\n", MINIMAL);
		assert!(matches!(
			zero_capacity.parse::<Config>(),
			Err(ConfigError::Validation(_))
		));

		let blank_message = format!("{}\n[messages]\nphone_required = \"\"\n", MINIMAL);
		let err = blank_message.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("phone_required"));
	}

	#[test]
	fn test_parse_error() {
		let err = "[checkout".parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn test_bundled_config() {
		let config: Config = include_str!("../../../config/checkout.toml").parse().unwrap();
		assert!(config.api.implementations.contains_key("http"));
		assert!(config.api.implementations.contains_key(&config.api.primary));
	}

	#[tokio::test]
	async fn test_from_file() {
		let dir = tempfile::TempDir::new().unwrap();
		let path = dir.path().join("checkout.toml");
		std::fs::write(&path, MINIMAL).unwrap();

		let config = Config::from_file(&path).await.unwrap();
		assert_eq!(config.api.primary, "mock");

		let missing = Config::from_file(dir.path().join("absent.toml")).await;
		assert!(matches!(missing, Err(ConfigError::Io(_))));
	}
}
