use std::time::Duration;

/// Summary statistics for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
	pub requests_sent: u32,
	pub responses_received: usize,
	pub lost_percent: f64,
	pub min_ms: f64,
	pub avg_ms: f64,
	pub max_ms: f64,
	pub stddev_ms: f64,
}

/// Convert a duration to fractional milliseconds.
pub fn in_millis(d: Duration) -> f64 {
	d.as_nanos() as f64 / 1_000_000.0
}

/// Calculate the arithmetic mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
	if values.is_empty() {
		return None;
	}
	let sum: f64 = values.iter().sum();
	Some(sum / values.len() as f64)
}

/// Calculate the population standard deviation of a slice of values.
pub fn stddev(values: &[f64]) -> Option<f64> {
	let avg = mean(values)?;
	let variance = values.iter()
		.map(|v| (v - avg).powi(2))
		.sum::<f64>() / values.len() as f64;
	Some(variance.sqrt())
}

/// Percentage of requests that got no timed response.
pub fn lost_percent(requests_sent: u32, responses_received: usize) -> f64 {
	if requests_sent == 0 {
		return 0.0;
	}
	let lost = (requests_sent as usize).saturating_sub(responses_received);
	(100 * lost) as f64 / requests_sent as f64
}

/// Reduce the round-trip samples of a run to summary statistics.
///
/// Every figure is 0.0 when there are no samples.
pub fn compute_run_stats(samples: &[Duration], requests_sent: u32) -> RunStats {
	let samples_ms: Vec<f64> = samples.iter().copied().map(in_millis).collect();

	let min_ms = samples_ms.iter().copied().reduce(f64::min).unwrap_or(0.0);
	let max_ms = samples_ms.iter().copied().reduce(f64::max).unwrap_or(0.0);

	RunStats {
		requests_sent,
		responses_received: samples.len(),
		lost_percent: lost_percent(requests_sent, samples.len()),
		min_ms,
		avg_ms: mean(&samples_ms).unwrap_or(0.0),
		max_ms,
		stddev_ms: stddev(&samples_ms).unwrap_or(0.0),
	}
}
