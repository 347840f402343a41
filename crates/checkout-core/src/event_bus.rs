//! Event bus implementation for checkout events.
//!
//! A broadcast channel: every subscriber receives every event published after
//! it subscribed. Publishing is fire-and-forget for the order model, which
//! ignores the result; with no subscriber the event is simply dropped.

use checkout_types::CheckoutEvent;
use tokio::sync::broadcast;

/// Cloneable handle to the checkout event channel.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<CheckoutEvent>,
}

impl EventBus {
	/// Creates a new event bus buffering `capacity` events per subscriber.
	///
	/// A subscriber that falls further behind loses the oldest events.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Creates a new receiver for events published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<CheckoutEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Fails only when nobody is subscribed.
	pub fn publish(
		&self,
		event: CheckoutEvent,
	) -> Result<(), broadcast::error::SendError<CheckoutEvent>> {
		self.sender.send(event)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use checkout_types::ValidityPayload;

	#[tokio::test]
	async fn test_every_subscriber_receives_events() {
		let bus = EventBus::new(16);
		let mut first = bus.subscribe();
		let mut second = bus.subscribe();

		bus.publish(CheckoutEvent::OrderSuccess { total: 500 }).unwrap();

		assert_eq!(
			first.recv().await.unwrap(),
			CheckoutEvent::OrderSuccess { total: 500 }
		);
		assert_eq!(
			second.recv().await.unwrap(),
			CheckoutEvent::OrderSuccess { total: 500 }
		);
	}

	#[test]
	fn test_publish_without_subscribers() {
		let bus = EventBus::new(16);
		assert!(bus
			.publish(CheckoutEvent::OrderValid(ValidityPayload::reset()))
			.is_err());
	}

	#[tokio::test]
	async fn test_lagging_subscriber() {
		let bus = EventBus::new(2);
		let mut receiver = bus.subscribe();

		for total in 1..=3 {
			bus.publish(CheckoutEvent::OrderSuccess { total }).unwrap();
		}

		assert!(matches!(
			receiver.recv().await,
			Err(broadcast::error::RecvError::Lagged(1))
		));
		assert_eq!(
			receiver.recv().await.unwrap(),
			CheckoutEvent::OrderSuccess { total: 2 }
		);
	}
}
