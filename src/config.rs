//! Immutable client configuration: endpoint, developer credentials, partner, and proxy.

// std
use std::{env, time::Duration as StdDuration};
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Path prefix shared by every card API service.
pub const SERVICE_PREFIX: &str = "/v3/services";
/// Path of the authentication service, relative to [`SERVICE_PREFIX`].
pub const AUTHENTICATOR_PATH: &str = "/authenticator";
/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const ENDPOINT_ENV: &str = "WAVECREST_ENDPOINT";
const USER_ENV: &str = "WAVECREST_USER";
const PASSWORD_ENV: &str = "WAVECREST_PASSWORD";
const PARTNER_ID_ENV: &str = "WAVECREST_PARTNER_ID";
const PROXY_ENV: &str = "WAVECREST_PROXY";
const TIMEOUT_ENV: &str = "WAVECREST_TIMEOUT_SECS";

/// Settings consumed by the dispatcher and authenticator.
///
/// Built once at process start and shared read-only behind an [`Arc`].
#[derive(Clone)]
pub struct Config {
	/// Base endpoint, e.g. `https://sandbox.wavecrest.example`.
	pub endpoint: Url,
	/// Developer identifier sent as `DeveloperId`.
	pub user: String,
	/// Developer password sent as `DeveloperPassword`.
	pub password: Secret,
	/// Business-partner identifier used by partner-scoped endpoints.
	pub partner_id: String,
	/// Optional forward proxy; userinfo in the URL becomes proxy credentials.
	pub proxy: Option<Url>,
	/// Upper bound for every outbound request.
	pub timeout: StdDuration,
}
impl Config {
	/// Returns a builder seeded with the required settings.
	pub fn builder(
		endpoint: Url,
		user: impl Into<String>,
		password: impl Into<Secret>,
		partner_id: impl Into<String>,
	) -> ConfigBuilder {
		ConfigBuilder {
			endpoint,
			user: user.into(),
			password: password.into(),
			partner_id: partner_id.into(),
			proxy: None,
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Loads the configuration from `WAVECREST_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Loads the configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &'static str| {
			lookup(name)
				.filter(|value| !value.trim().is_empty())
				.ok_or(ConfigError::MissingVariable { name })
		};
		let endpoint = Url::parse(&required(ENDPOINT_ENV)?)
			.map_err(|source| ConfigError::InvalidUrl { role: "endpoint", source })?;
		let mut builder = Self::builder(
			endpoint,
			required(USER_ENV)?,
			required(PASSWORD_ENV)?,
			required(PARTNER_ID_ENV)?,
		);

		if let Some(raw) = lookup(PROXY_ENV).filter(|value| !value.trim().is_empty()) {
			let proxy = Url::parse(raw.trim())
				.map_err(|source| ConfigError::InvalidUrl { role: "proxy", source })?;

			builder = builder.proxy(proxy);
		}
		if let Some(raw) = lookup(TIMEOUT_ENV) {
			let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidVariable {
				name: TIMEOUT_ENV,
				reason: e.to_string(),
			})?;

			builder = builder.timeout(StdDuration::from_secs(secs));
		}

		builder.build()
	}

	/// Builds the absolute URL for a service path.
	///
	/// `path` must start with `/`; it is appended verbatim.
	pub fn service_url(&self, path: &str) -> String {
		format!("{}{SERVICE_PREFIX}{path}", self.endpoint.as_str().trim_end_matches('/'))
	}

	/// Builds the absolute URL of the authentication service.
	pub fn authenticator_url(&self) -> String {
		self.service_url(AUTHENTICATOR_PATH)
	}
}
impl Debug for Config {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Config")
			.field("endpoint", &self.endpoint.as_str())
			.field("user", &self.user)
			.field("password", &self.password)
			.field("partner_id", &self.partner_id)
			.field("proxy", &self.proxy.as_ref().map(|url| (url.host_str(), url.port())))
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Builder for [`Config`].
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
	endpoint: Url,
	user: String,
	password: Secret,
	partner_id: String,
	proxy: Option<Url>,
	timeout: StdDuration,
}
impl ConfigBuilder {
	/// Routes every request through a forward proxy.
	pub fn proxy(mut self, proxy: Url) -> Self {
		self.proxy = Some(proxy);

		self
	}

	/// Overrides the request timeout (defaults to [`DEFAULT_TIMEOUT`]).
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Validates the settings and produces an immutable [`Config`].
	pub fn build(self) -> Result<Config, ConfigError> {
		match self.endpoint.scheme() {
			"http" | "https" => {},
			other => return Err(ConfigError::UnsupportedScheme { scheme: other.to_owned() }),
		}

		Ok(Config {
			endpoint: self.endpoint,
			user: self.user,
			password: self.password,
			partner_id: self.partner_id,
			proxy: self.proxy,
			timeout: self.timeout,
		})
	}
}
