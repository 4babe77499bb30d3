// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind, stage, and request line.
	pub fn new(kind: CallKind, stage: &'static str, method: &'static str, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("wavecrest.call", call = kind.as_str(), stage, method, path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage, method, path);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Notes that a fresh bearer token replaced the stored one.
pub(crate) fn trace_token_refreshed(issued_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%issued_at, "bearer token refreshed");
	#[cfg(not(feature = "tracing"))]
	let _ = issued_at;
}

/// Notes that a transport failure was answered with a structured error body.
pub(crate) fn trace_recovered_failure(status: Option<u16>, source: &(dyn StdError + Send + Sync)) {
	#[cfg(feature = "tracing")]
	tracing::warn!(?status, error = %source, "transport failed; returning recovered error body");
	#[cfg(not(feature = "tracing"))]
	let _ = (status, source);
}
