use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use hickory_proto::rr::RecordType;

use crate::error::ExchangeError;

/// Validated configuration for one dnsping run
#[derive(Debug, Clone)]
pub struct RunConfig {
	/// Literal address of the DNS server being measured
	pub server: IpAddr,
	pub port: u16,
	/// Name the server is asked to resolve
	pub host: String,
	pub record_type: RecordType,
	pub count: u32,
	/// Target spacing between the start of consecutive attempts
	pub interval: Duration,
	/// Upper bound on a single query exchange
	pub timeout: Duration,
}

impl RunConfig {
	pub fn server_addr(&self) -> SocketAddr {
		SocketAddr::new(self.server, self.port)
	}
}

/// A completed query exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
	pub response_size: usize,
	pub rtt: Duration,
	pub answer_count: usize,
}

/// Outcome of a single probe attempt
#[derive(Debug)]
pub enum AttemptOutcome {
	Success {
		seq: u32,
		response_size: usize,
		rtt: Duration,
		/// False when the server answered with an empty answer section
		has_answer: bool,
	},
	Timeout {
		seq: u32,
	},
	/// The first interrupt aborted the exchange in flight
	Interrupted {
		seq: u32,
	},
	Failed {
		seq: u32,
		error: ExchangeError,
	},
}

impl AttemptOutcome {
	/// Classify the result of an exchange for attempt `seq`.
	pub fn classify(seq: u32, result: Result<Exchange, ExchangeError>) -> Self {
		match result {
			Ok(exchange) => AttemptOutcome::Success {
				seq,
				response_size: exchange.response_size,
				rtt: exchange.rtt,
				has_answer: exchange.answer_count > 0,
			},
			Err(error) if error.is_fatal() => AttemptOutcome::Failed { seq, error },
			Err(ExchangeError::Cancelled) => AttemptOutcome::Interrupted { seq },
			Err(_) => AttemptOutcome::Timeout { seq },
		}
	}
}

/// Result of the probe loop: how many requests went out and the
/// round-trip times of those that were answered, in attempt order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeRun {
	pub requests_sent: u32,
	pub samples: Vec<Duration>,
}
