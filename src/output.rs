use std::net::IpAddr;

use crate::resolver::record_type_mnemonic;
use crate::stats::{in_millis, RunStats};
use crate::transport::{AttemptOutcome, RunConfig};

/// Render the line announcing what is being measured.
pub fn format_header(config: &RunConfig) -> String {
	format!(
		"PING DNS: {}:{}, hostname: {}, rdatatype: {}",
		config.server, config.port, config.host, record_type_mnemonic(config.record_type),
	)
}

pub fn print_header(config: &RunConfig) {
	println!("{}", format_header(config));
}

/// Render the progress line for one attempt.
///
/// Failed and interrupted attempts have no progress line; failures are
/// reported on stderr by the caller.
pub fn format_attempt(outcome: &AttemptOutcome, server: IpAddr) -> Option<String> {
	match outcome {
		AttemptOutcome::Success { seq, response_size, rtt, has_answer } => {
			// No error but no answer: the server does not know the name
			let invalid = if *has_answer { "" } else { " (invalid hostname)" };
			Some(format!(
				"{} bytes from {}: seq={:<3} time={:.3} ms{}",
				response_size, server, seq, in_millis(*rtt), invalid,
			))
		}
		AttemptOutcome::Timeout { seq } => Some(format!("Request timeout for seq {}", seq)),
		AttemptOutcome::Interrupted { .. } | AttemptOutcome::Failed { .. } => None,
	}
}

pub fn print_attempt(outcome: &AttemptOutcome, server: IpAddr) {
	if let Some(line) = format_attempt(outcome, server) {
		println!("{}", line);
	}
}

/// Render the closing statistics block.
pub fn format_summary(server: IpAddr, stats: &RunStats) -> String {
	format!(
		"\n--- {} dnsping statistics ---\n\
		{} requests transmitted, {} responses received, {:.1}% lost\n\
		round-trip min/avg/max/stddev = {:.3}/{:.3}/{:.3}/{:.3} ms",
		server,
		stats.requests_sent, stats.responses_received, stats.lost_percent,
		stats.min_ms, stats.avg_ms, stats.max_ms, stats.stddev_ms,
	)
}

pub fn print_summary(server: IpAddr, stats: &RunStats) {
	println!("{}", format_summary(server, stats));
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	use crate::error::ExchangeError;
	use crate::stats::compute_run_stats;

	fn server() -> IpAddr {
		"1.1.1.1".parse().unwrap()
	}

	fn config(server: &str, record_type: &str) -> RunConfig {
		RunConfig {
			server: server.parse().unwrap(),
			port: 53,
			host: "wikipedia.org".to_string(),
			record_type: crate::resolver::parse_record_type(record_type).unwrap(),
			count: 10,
			interval: Duration::from_secs(1),
			timeout: Duration::from_secs(2),
		}
	}

	#[test]
	fn test_header_line() {
		assert_eq!(
			format_header(&config("1.1.1.1", "A")),
			"PING DNS: 1.1.1.1:53, hostname: wikipedia.org, rdatatype: A",
		);
		assert_eq!(
			format_header(&config("2606:4700::1111", "DNAME")),
			"PING DNS: 2606:4700::1111:53, hostname: wikipedia.org, rdatatype: DNAME",
		);
	}

	#[test]
	fn test_success_line() {
		let outcome = AttemptOutcome::Success {
			seq: 3,
			response_size: 56,
			rtt: Duration::from_micros(12_345),
			has_answer: true,
		};
		assert_eq!(
			format_attempt(&outcome, server()).unwrap(),
			"56 bytes from 1.1.1.1: seq=3   time=12.345 ms",
		);
	}

	#[test]
	fn test_empty_answer_line() {
		let outcome = AttemptOutcome::Success {
			seq: 120,
			response_size: 104,
			rtt: Duration::from_millis(8),
			has_answer: false,
		};
		assert_eq!(
			format_attempt(&outcome, server()).unwrap(),
			"104 bytes from 1.1.1.1: seq=120 time=8.000 ms (invalid hostname)",
		);
	}

	#[test]
	fn test_timeout_and_silent_outcomes() {
		assert_eq!(
			format_attempt(&AttemptOutcome::Timeout { seq: 7 }, server()).unwrap(),
			"Request timeout for seq 7",
		);
		assert!(format_attempt(&AttemptOutcome::Interrupted { seq: 1 }, server()).is_none());
		let failed = AttemptOutcome::Failed { seq: 2, error: ExchangeError::Protocol("x".into()) };
		assert!(format_attempt(&failed, server()).is_none());
	}

	#[test]
	fn test_summary() {
		let samples: Vec<Duration> = [10, 20, 30].iter().map(|&v| Duration::from_millis(v)).collect();
		let stats = compute_run_stats(&samples, 4);
		assert_eq!(
			format_summary(server(), &stats),
			"\n--- 1.1.1.1 dnsping statistics ---\n\
			4 requests transmitted, 3 responses received, 25.0% lost\n\
			round-trip min/avg/max/stddev = 10.000/20.000/30.000/8.165 ms",
		);
	}
}
