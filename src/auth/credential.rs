//! Process-wide bearer credentials and the store that guards them.

// std
use std::{
	env,
	sync::atomic::{AtomicU64, Ordering},
};
// crates.io
use async_lock::MutexGuard as AsyncMutexGuard;
// self
use crate::{_prelude::*, auth::Secret, error::AuthError};

/// Fixed lifetime granted to a bearer token before it must be refreshed.
pub const FRESHNESS_WINDOW: Duration = Duration::hours(1);
/// Environment variable that carries a shared bearer token between processes.
pub const TOKEN_ENV: &str = "_WAVECREST_AUTH_TOKEN";
/// Environment variable that carries the shared token's issue time in unix seconds.
pub const ISSUED_AT_ENV: &str = "_WAVECREST_AUTH_TOKEN_ISSUED";

/// Bearer token paired with the instant it was issued.
///
/// Both halves always travel together; a store holding no [`Credentials`] has never
/// authenticated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Bearer token; callers must avoid logging it.
	pub token: Secret,
	/// Instant the authenticator issued the token.
	#[serde(with = "time::serde::timestamp")]
	pub issued_at: OffsetDateTime,
}
impl Credentials {
	/// Pairs a token with its issue time.
	pub fn new(token: impl Into<Secret>, issued_at: OffsetDateTime) -> Self {
		Self { token: token.into(), issued_at }
	}

	/// Returns `true` once `issued_at + FRESHNESS_WINDOW` is strictly before `now`.
	pub fn is_stale_at(&self, now: OffsetDateTime) -> bool {
		self.issued_at.checked_add(FRESHNESS_WINDOW).is_some_and(|deadline| deadline < now)
	}

	/// Reads credentials shared by another process through [`TOKEN_ENV`] and [`ISSUED_AT_ENV`].
	pub fn from_env() -> Option<Self> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Reads credentials through an arbitrary variable lookup.
	///
	/// A token without a parseable issue time is treated as absent.
	pub fn from_lookup<F>(lookup: F) -> Option<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let token = lookup(TOKEN_ENV).filter(|value| !value.is_empty())?;
		let issued_secs = lookup(ISSUED_AT_ENV)?.trim().parse::<i64>().ok()?;
		let issued_at = OffsetDateTime::from_unix_timestamp(issued_secs).ok()?;

		Some(Self::new(token, issued_at))
	}

	/// Returns the variable pairs that [`Credentials::from_env`] understands.
	///
	/// The value of the token pair is the raw secret.
	pub fn env_pairs(&self) -> [(&'static str, String); 2] {
		[
			(TOKEN_ENV, self.token.expose().to_owned()),
			(ISSUED_AT_ENV, self.issued_at.unix_timestamp().to_string()),
		]
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

/// Single source of truth for the current bearer token.
///
/// Reads and replacements are atomic with respect to each other, so a reader never sees a token
/// paired with another token's issue time. The embedded refresh guard serializes the
/// check-authenticate-write sequence so at most one authentication is in flight, and it keeps
/// the outcome of the last completed login for the callers that queued behind it.
#[derive(Debug, Default)]
pub struct CredentialStore {
	current: RwLock<Option<Credentials>>,
	logins: AtomicU64,
	refresh: AsyncMutex<Option<Arc<AuthError>>>,
}
impl CredentialStore {
	/// Creates an empty store that has never authenticated.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-populated with shared credentials.
	pub fn seeded(credentials: Credentials) -> Self {
		Self { current: RwLock::new(Some(credentials)), ..Default::default() }
	}

	/// Returns `true` if no token is held or the held token is stale.
	pub fn needs_refresh(&self) -> bool {
		self.needs_refresh_at(OffsetDateTime::now_utc())
	}

	/// Evaluates [`CredentialStore::needs_refresh`] against an explicit instant.
	pub fn needs_refresh_at(&self, now: OffsetDateTime) -> bool {
		self.fresh_token_at(now).is_none()
	}

	/// Atomically replaces the stored credentials.
	pub fn set(&self, token: impl Into<Secret>, issued_at: OffsetDateTime) {
		self.replace(Credentials::new(token, issued_at));
	}

	/// Atomically replaces the stored credentials with a prepared pair.
	pub fn replace(&self, credentials: Credentials) {
		*self.current.write() = Some(credentials);
	}

	/// Returns the stored token, fresh or not.
	pub fn current(&self) -> Option<Secret> {
		self.current.read().as_ref().map(|credentials| credentials.token.clone())
	}

	/// Returns a copy of the stored credentials.
	pub fn snapshot(&self) -> Option<Credentials> {
		self.current.read().clone()
	}

	/// Returns the stored token only if it is still fresh at `now`.
	///
	/// The freshness check and the read happen under one lock acquisition.
	pub fn fresh_token_at(&self, now: OffsetDateTime) -> Option<Secret> {
		self.current
			.read()
			.as_ref()
			.filter(|credentials| !credentials.is_stale_at(now))
			.map(|credentials| credentials.token.clone())
	}

	/// Returns the number of logins that ran to completion, successful or not.
	pub fn completed_logins(&self) -> u64 {
		self.logins.load(Ordering::Acquire)
	}

	pub(crate) async fn refresh_guard(&self) -> RefreshGuard<'_> {
		RefreshGuard { store: self, last_failure: self.refresh.lock().await }
	}
}

/// Exclusive right to run a login against a [`CredentialStore`].
///
/// Dropping the guard without recording an outcome (e.g. on cancellation) leaves the store as
/// it was, so the next caller in line runs its own login.
pub(crate) struct RefreshGuard<'a> {
	store: &'a CredentialStore,
	last_failure: AsyncMutexGuard<'a, Option<Arc<AuthError>>>,
}
impl RefreshGuard<'_> {
	/// Returns the failure of a login that completed after `observed` was read from
	/// [`CredentialStore::completed_logins`].
	pub(crate) fn failure_since(&self, observed: u64) -> Option<Arc<AuthError>> {
		if self.store.completed_logins() == observed {
			return None;
		}

		self.last_failure.clone()
	}

	pub(crate) fn succeed(mut self, credentials: Credentials) {
		self.store.replace(credentials);
		*self.last_failure = None;
		self.store.logins.fetch_add(1, Ordering::AcqRel);
	}

	pub(crate) fn fail(mut self, failure: Arc<AuthError>) {
		*self.last_failure = Some(failure);
		self.store.logins.fetch_add(1, Ordering::AcqRel);
	}
}
