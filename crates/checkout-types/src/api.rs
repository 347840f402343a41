//! Types exchanged with the remote order API.

use serde::{Deserialize, Serialize};

/// Successful answer to an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
	/// Identifier assigned by the API, if it returns one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Amount charged, as computed by the API.
	pub total: u64,
}

/// Failure body returned by the API, e.g. `{"error": "Out of stock"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
	#[serde(default)]
	pub error: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_response_and_error_body() {
		let response: OrderResponse =
			serde_json::from_str(r#"{"id":"28c57cb4","total":2200}"#).unwrap();
		assert_eq!(response.id.as_deref(), Some("28c57cb4"));
		assert_eq!(response.total, 2200);

		let body: ApiErrorBody = serde_json::from_str(r#"{"error":"Out of stock"}"#).unwrap();
		assert_eq!(body.error.as_deref(), Some("Out of stock"));

		let empty: ApiErrorBody = serde_json::from_str("{}").unwrap();
		assert_eq!(empty.error, None);
	}
}
