// std
use std::time::Duration as StdDuration;
// self
use crate::{
	http::Method,
	obs::{FlowKind, FlowOutcome},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"phonebook_client_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records the latency of a single backend call (when enabled).
pub fn record_call_duration(method: Method, status: Option<u16>, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		let status = status.map_or_else(|| "transport_error".to_owned(), |code| code.to_string());

		metrics::histogram!(
			"phonebook_client_request_duration_seconds",
			"method" => method.as_str(),
			"status" => status
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, status, elapsed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_flow_outcome(FlowKind::Login, FlowOutcome::Failure);
		record_call_duration(Method::Get, Some(200), StdDuration::from_millis(5));
	}
}
