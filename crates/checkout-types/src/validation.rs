//! Schema validation for implementation configuration tables.
//!
//! Each API implementation describes the TOML table it accepts with a
//! [`Schema`]. The schema is checked before the implementation is built so a
//! misconfigured endpoint fails at startup instead of on the first checkout.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// Integer with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
}

/// Custom check run after the type check; returns a message on failure.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named, typed field of a schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a custom validator to this field.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		validate_field_type(&self.name, value, &self.field_type)?;

		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}

		Ok(())
	}
}

/// Required and optional fields of a configuration table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML table against this schema.
	///
	/// Required fields must be present; optional fields are only checked when
	/// present. Keys not named by the schema are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	let mismatch = |expected: &str| ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	};

	match expected_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(mismatch("string"));
			}
		},
		FieldType::Integer { min, max } => {
			let int_val = value.as_integer().ok_or_else(|| mismatch("integer"))?;

			if let Some(min_val) = min {
				if int_val < *min_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is less than minimum {}", int_val, min_val),
					});
				}
			}

			if let Some(max_val) = max {
				if int_val > *max_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is greater than maximum {}", int_val, max_val),
					});
				}
			}
		},
	}

	Ok(())
}

/// A configuration schema that can validate TOML values.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn endpoint_schema() -> Schema {
		Schema::new(
			vec![Field::new("base_url", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some(url) if url.starts_with("http") => Ok(()),
					_ => Err("must be an http(s) URL".to_string()),
				}
			})],
			vec![Field::new(
				"timeout_seconds",
				FieldType::Integer {
					min: Some(1),
					max: Some(300),
				},
			)],
		)
	}

	#[test]
	fn test_valid_table() {
		let config: toml::Value = toml::from_str(
			r#"
base_url = "https://shop.example"
timeout_seconds = 10
"#,
		)
		.unwrap();
		assert!(endpoint_schema().validate(&config).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let config: toml::Value = toml::from_str("timeout_seconds = 10").unwrap();
		let err = endpoint_schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(ref f) if f == "base_url"));
	}

	#[test]
	fn test_type_mismatch_and_bounds() {
		let config: toml::Value = toml::from_str(
			r#"
base_url = "https://shop.example"
timeout_seconds = "ten"
"#,
		)
		.unwrap();
		assert!(matches!(
			endpoint_schema().validate(&config),
			Err(ValidationError::TypeMismatch { .. })
		));

		let config: toml::Value = toml::from_str(
			r#"
base_url = "https://shop.example"
timeout_seconds = 0
"#,
		)
		.unwrap();
		assert!(matches!(
			endpoint_schema().validate(&config),
			Err(ValidationError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_custom_validator() {
		let config: toml::Value = toml::from_str(r#"base_url = "ftp://shop.example""#).unwrap();
		let err = endpoint_schema().validate(&config).unwrap_err();
		assert!(err.to_string().contains("http(s) URL"));
	}
}
