//! Event listener that logs every checkout event.
//!
//! Stands in for the views of an interactive checkout: it consumes the bus
//! until every publisher is gone. The bus drops events for a subscriber that
//! falls behind, so the summary is a log digest, not the submission outcome.

use checkout_types::CheckoutEvent;
use tokio::sync::broadcast::{self, error::RecvError};

/// What the listener saw of the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionSummary {
	/// Events received.
	pub events: usize,
	/// Events lost because the listener fell behind.
	pub lagged: u64,
	pub total: Option<u64>,
	pub error: Option<String>,
}

/// Logs events until the bus is closed.
pub async fn log_events(mut receiver: broadcast::Receiver<CheckoutEvent>) -> SubmissionSummary {
	let mut summary = SubmissionSummary::default();

	loop {
		match receiver.recv().await {
			Ok(event) => {
				summary.events += 1;
				let payload = serde_json::to_string(&event).unwrap_or_default();
				match &event {
					CheckoutEvent::OrderValid(p) | CheckoutEvent::ContactsValid(p)
						if !p.is_valid && !p.errors.is_empty() =>
					{
						tracing::warn!(event = event.name(), %payload, "Form invalid");
					},
					CheckoutEvent::OrderSuccess { total } => {
						summary.total = Some(*total);
						tracing::info!(event = event.name(), total, "Order placed");
					},
					CheckoutEvent::OrderError { error } => {
						summary.error = Some(error.clone());
						tracing::error!(event = event.name(), %error, "Order failed");
					},
					_ => tracing::debug!(event = event.name(), %payload, "Event"),
				}
			},
			Err(RecvError::Lagged(skipped)) => {
				summary.lagged += skipped;
				tracing::warn!(skipped, "Event listener lagged behind");
			},
			Err(RecvError::Closed) => break,
		}
	}

	summary
}

#[cfg(test)]
mod tests {
	use super::*;
	use checkout_core::EventBus;
	use checkout_types::ValidityPayload;

	#[tokio::test]
	async fn test_summary_until_closed() {
		let bus = EventBus::new(16);
		let listener = tokio::spawn(log_events(bus.subscribe()));

		bus.publish(CheckoutEvent::OrderValid(ValidityPayload::reset()))
			.unwrap();
		bus.publish(CheckoutEvent::OrderError {
			error: "Out of stock".to_string(),
		})
		.unwrap();
		drop(bus);

		let summary = listener.await.unwrap();
		assert_eq!(
			summary,
			SubmissionSummary {
				events: 2,
				lagged: 0,
				total: None,
				error: Some("Out of stock".to_string()),
			}
		);
	}

	#[tokio::test]
	async fn test_lagged_events_are_counted() {
		let bus = EventBus::new(2);
		let receiver = bus.subscribe();

		bus.publish(CheckoutEvent::OrderSuccess { total: 500 }).unwrap();
		bus.publish(CheckoutEvent::OrderValid(ValidityPayload::reset()))
			.unwrap();
		bus.publish(CheckoutEvent::ContactsValid(ValidityPayload::reset()))
			.unwrap();
		drop(bus);

		let summary = log_events(receiver).await;
		assert_eq!(
			summary,
			SubmissionSummary {
				events: 2,
				lagged: 1,
				total: None,
				error: None,
			}
		);
	}
}
