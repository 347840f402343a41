//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Every pluggable implementation module provides a `Registry` struct that
/// declares the name it is configured under and the factory that builds it.
pub trait ImplementationRegistry {
	/// Key used in the configuration, e.g. "http" for `api.implementations.http`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
