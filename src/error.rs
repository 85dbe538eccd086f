use std::io;

use thiserror::Error;

/// Errors raised while turning command-line input into a run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("cannot resolve dns server hostname: {0}")]
	Resolution(String),

	#[error("invalid DNS record type {0}")]
	InvalidRecordType(String),
}

/// Errors from a single query exchange with the DNS server
#[derive(Error, Debug)]
pub enum ExchangeError {
	/// No matching response arrived within the per-attempt timeout
	#[error("request timed out")]
	Timeout,

	/// The exchange was aborted by an interrupt
	#[error("request cancelled")]
	Cancelled,

	#[error("network error")]
	Io(#[from] io::Error),

	#[error("invalid DNS message: {0}")]
	Protocol(String),
}

impl ExchangeError {
	/// True for errors that end the whole run
	pub fn is_fatal(&self) -> bool {
		matches!(self, ExchangeError::Io(_) | ExchangeError::Protocol(_))
	}
}
