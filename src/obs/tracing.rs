// self
use crate::{_prelude::*, obs::Stage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// A span builder used by sign-in stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage + step.
	pub fn new(stage: Stage, step: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("steam_openid_broker.stage", stage = stage.as_str(), step);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, step);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> StageSpanGuard {
		#[cfg(feature = "tracing")]
		{
			StageSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			StageSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
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

/// RAII guard returned by [`StageSpan::entered`].
pub struct StageSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for StageSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("StageSpanGuard(..)")
	}
}

/// Emits a debug event naming why an assertion was rejected.
///
/// The reason stays in logs only; callers see a bare rejection.
pub fn log_rejection(reason: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(reason, "Assertion rejected.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reason;
	}
}

/// Emits a warning when a verified sign-in falls back to a minimal profile.
pub fn log_degraded_profile(steam_id: &str, error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			steam_id,
			error = %error,
			"Profile lookup failed; issuing a minimal profile."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (steam_id, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn stage_span_guard_exists_in_every_build() {
		let _guard = StageSpan::new(Stage::Authorization, "test").entered();
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = StageSpan::new(Stage::Verification, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
