//! Async client for the Wavecrest prepaid-card processing API.
//!
//! One [`Dispatcher`](dispatch::Dispatcher) owns the configuration, an HTTP transport, and a
//! [`CredentialStore`](auth::CredentialStore). Every call goes through
//! [`Dispatcher::send`](dispatch::Dispatcher::send), which authenticates on demand (once per
//! freshness window, at most once in flight), attaches the developer and bearer headers, and
//! normalizes transport and decoding failures into [`Error`](error::Error). Endpoint wrappers
//! such as [`Dispatcher::balance`](dispatch::Dispatcher::balance) live in [`api`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod obs;
pub mod reference;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Value, json};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
