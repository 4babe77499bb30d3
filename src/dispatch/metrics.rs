// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for authenticator traffic and for the callers that avoided it.
///
/// `attempts` counts logins actually sent. `coalesced` counts callers that queued behind a
/// login and reused its outcome (the token, or the failure) instead of sending their own.
#[derive(Debug, Default)]
pub struct AuthMetrics {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: AtomicU64,
	coalesced: AtomicU64,
}
impl AuthMetrics {
	/// Returns the number of login requests sent.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of logins that produced a token.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Returns the number of logins that failed.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Returns the number of callers served by another caller's login.
	pub fn coalesced(&self) -> u64 {
		self.coalesced.load(Ordering::Relaxed)
	}

	/// Returns the number of logins still waiting on the authenticator.
	pub fn in_flight(&self) -> u64 {
		self.attempts().saturating_sub(self.successes() + self.failures())
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_coalesced(&self) {
		self.coalesced.fetch_add(1, Ordering::Relaxed);
	}
}
