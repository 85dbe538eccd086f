use std::time::Duration;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::cancel::Cancellation;
use crate::dns::DnsExchange;
use crate::error::ExchangeError;
use crate::output;
use crate::transport::{AttemptOutcome, ProbeRun, RunConfig};

/// How long to wait after an attempt so attempts start `interval` apart.
///
/// None when the attempt itself took at least `interval`.
pub fn pacing_delay(interval: Duration, elapsed: Duration) -> Option<Duration> {
	interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}

/// Sleep for `delay` unless the token fires first.
async fn pace(delay: Duration, token: &CancellationToken) {
	tokio::select! {
		_ = tokio::time::sleep(delay) => {}
		_ = token.cancelled() => debug!("pacing sleep interrupted"),
	}
}

/// Run up to `config.count` sequential query attempts.
///
/// Each attempt is printed as soon as it completes. Timeouts are skipped,
/// an interrupt ends the loop early, and any other exchange error aborts
/// the run and is returned.
pub async fn run_probe<C: DnsExchange>(
	client: &C,
	config: &RunConfig,
	cancel: &Cancellation,
) -> Result<ProbeRun, ExchangeError> {
	let mut run = ProbeRun::default();

	for seq in 0..config.count {
		if cancel.is_stopping() {
			debug!("stop requested, ending after {} requests", run.requests_sent);
			break;
		}

		run.requests_sent += 1;
		let result = client.exchange(config, cancel.token()).await;
		let outcome = AttemptOutcome::classify(seq, result);
		output::print_attempt(&outcome, config.server);

		match outcome {
			AttemptOutcome::Success { rtt, .. } => {
				run.samples.push(rtt);
				if let Some(delay) = pacing_delay(config.interval, rtt) {
					pace(delay, cancel.token()).await;
				}
			}
			AttemptOutcome::Timeout { .. } => continue,
			AttemptOutcome::Interrupted { seq } => {
				debug!("seq {} aborted by interrupt", seq);
				break;
			}
			AttemptOutcome::Failed { error, .. } => return Err(error),
		}
	}

	Ok(run)
}
