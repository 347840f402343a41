//! Main entry point for the checkout service.
//!
//! Runs one checkout from an order draft: the draft is fed into the order
//! model field by field, and once both forms validate the order is submitted
//! through the configured order API. Every event the model publishes is
//! logged.

use checkout_api::OrderApiService;
use checkout_config::Config;
use checkout_core::{EventBus, OrderModel};
use checkout_types::FormGroup;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

mod draft;
mod listener;

use draft::OrderDraft;
use listener::SubmissionSummary;

/// Command-line arguments for the checkout service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Path to the order draft
	#[arg(short, long)]
	order: PathBuf,

	/// Override a draft field, e.g. --set email=buyer@example.com
	#[arg(long = "set", value_name = "FIELD=VALUE")]
	overrides: Vec<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info", env = "CHECKOUT_LOG_LEVEL")]
	log_level: String,
}

/// Reasons a checkout run ends unsuccessfully.
#[derive(Debug, Error)]
enum CheckoutError {
	#[error("Order forms are not valid: {0}")]
	InvalidForms(String),
	#[error("Order was not placed: {0}")]
	NotPlaced(String),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt().with_env_filter(env_filter).with_target(true).init();

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.checkout.id);

	let api = OrderApiService::from_config(&config.api.implementations, &config.api.primary)?;
	tracing::info!(implementation = api.primary(), "Order API ready");

	let mut draft = OrderDraft::from_file(&args.order).await?;
	for assignment in &args.overrides {
		draft.apply_override(assignment)?;
	}

	let event_bus = EventBus::new(config.events.capacity);
	let listener_task = tokio::spawn(listener::log_events(event_bus.subscribe()));

	let mut model = OrderModel::new(Arc::new(api), event_bus, config.messages.clone());
	draft.apply(&mut model);

	let outcome = if model.is_valid() {
		Ok(model.submit_order().await)
	} else {
		let problems = [FormGroup::Order, FormGroup::Contacts]
			.iter()
			.filter_map(|group| model.errors_for(*group))
			.flat_map(|errors| errors.values().cloned())
			.collect::<Vec<_>>()
			.join("; ");
		Err(CheckoutError::InvalidForms(problems))
	};

	// Closing the bus lets the listener finish
	drop(model);
	let summary = listener_task.await?;
	let placed = outcome?;

	checkout_result(placed, &summary, &config.messages.unknown_error)?;
	Ok(())
}

/// Decides how the run ends. `placed` is what the model reported; the
/// listener summary only contributes the failure message, if it saw one.
fn checkout_result(
	placed: bool,
	summary: &SubmissionSummary,
	unknown_error: &str,
) -> Result<(), CheckoutError> {
	if summary.lagged > 0 {
		tracing::warn!(lagged = summary.lagged, "Some checkout events were not logged");
	}

	if placed {
		tracing::info!(
			total = ?summary.total,
			events = summary.events,
			"Checkout complete"
		);
		return Ok(());
	}

	Err(CheckoutError::NotPlaced(
		summary
			.error
			.clone()
			.unwrap_or_else(|| unknown_error.to_string()),
	))
}
