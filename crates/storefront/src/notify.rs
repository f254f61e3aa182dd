//! User-facing notification sink.
//!
//! Cart operations report every failure here with the exact message the
//! user should see. Reporting is fire-and-forget; the sink never affects
//! the outcome of the operation.

/// Sink for one-line user-facing error messages.
pub trait Notifier: Send + Sync {
    /// Surface `message` to the user.
    fn report(&self, message: &str);
}

/// Notifier backed by the tracing pipeline.
///
/// The message still reaches the browser as a toast through the route
/// layer; this sink gives operators the same line in the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report(&self, message: &str) {
        tracing::warn!(user_message = %message, "Cart operation failed");
    }
}
