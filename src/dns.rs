use std::net::SocketAddr;
use std::time::Instant;

use hickory_proto::op::{Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::{Name, RecordType};
use log::{debug, trace};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use crate::error::ExchangeError;
use crate::transport::{Exchange, RunConfig};

/// DNS response information extracted from a parsed message
#[derive(Debug)]
pub struct DnsResponse {
	pub rcode: ResponseCode,
	pub answer_count: usize,
}

/// Something that can send one DNS query and time the response.
pub trait DnsExchange {
	/// Query `config.host` / `config.record_type` at the configured server.
	///
	/// Must return `Timeout` once `config.timeout` elapses and `Cancelled`
	/// as soon as `cancel` fires.
	async fn exchange(
		&self,
		config: &RunConfig,
		cancel: &CancellationToken,
	) -> Result<Exchange, ExchangeError>;
}

/// Build a DNS query message for the given host and record type.
///
/// The host is made fully qualified and recursion is requested.
/// Returns the serialized query bytes ready to send over UDP.
pub fn build_query(
	host: &str,
	record_type: RecordType,
	txid: u16,
) -> Result<Vec<u8>, ExchangeError> {
	let mut name = Name::from_ascii(host)
		.map_err(|e| ExchangeError::Protocol(format!("invalid host name '{}': {}", host, e)))?;
	name.set_fqdn(true);

	let mut message = Message::new();
	message.set_id(txid);
	message.set_message_type(MessageType::Query);
	message.set_recursion_desired(true);
	message.add_query(Query::query(name, record_type));

	message.to_vec()
		.map_err(|e| ExchangeError::Protocol(format!("failed to serialize DNS query: {}", e)))
}

/// Parse a DNS response, validating the transaction ID.
pub fn parse_response(bytes: &[u8], expected_txid: u16) -> Result<DnsResponse, ExchangeError> {
	let message = Message::from_vec(bytes)
		.map_err(|e| ExchangeError::Protocol(format!("failed to parse DNS response: {}", e)))?;

	if message.id() != expected_txid {
		return Err(ExchangeError::Protocol(format!(
			"txid mismatch: expected {}, got {}",
			expected_txid, message.id()
		)));
	}

	if message.message_type() != MessageType::Response {
		return Err(ExchangeError::Protocol("received a query instead of a response".to_string()));
	}

	Ok(DnsResponse {
		rcode: message.response_code(),
		answer_count: message.answers().len(),
	})
}

/// Read the transaction ID from a raw DNS header, if there is one.
fn peek_txid(bytes: &[u8]) -> Option<u16> {
	match bytes {
		[hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
		_ => None,
	}
}

/// Plain DNS over UDP, one fresh socket per query.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpExchanger;

impl DnsExchange for UdpExchanger {
	async fn exchange(
		&self,
		config: &RunConfig,
		cancel: &CancellationToken,
	) -> Result<Exchange, ExchangeError> {
		let txid: u16 = rand::random();
		let query = build_query(&config.host, config.record_type, txid)?;

		tokio::select! {
			biased;
			_ = cancel.cancelled() => Err(ExchangeError::Cancelled),
			result = tokio::time::timeout(
				config.timeout,
				send_udp_query(config.server_addr(), &query, txid),
			) => result.unwrap_or(Err(ExchangeError::Timeout)),
		}
	}
}

/// Send a single DNS query over UDP and measure latency.
///
/// Datagrams carrying another transaction ID are dropped and the wait
/// continues; the caller bounds the total wait.
async fn send_udp_query(
	server: SocketAddr,
	query: &[u8],
	txid: u16,
) -> Result<Exchange, ExchangeError> {
	let bind_addr = if server.is_ipv4() {
		"0.0.0.0:0"
	} else {
		"[::]:0"
	};
	let socket = UdpSocket::bind(bind_addr).await?;
	// Connected socket: only the server's datagrams are delivered, and
	// ICMP unreachable surfaces as an error
	socket.connect(server).await?;

	// Start timing immediately around send+recv
	let start = Instant::now();
	socket.send(query).await?;

	// Use 4096-byte buffer to handle EDNS-extended responses
	let mut buf = vec![0u8; 4096];
	loop {
		let len = socket.recv(&mut buf).await?;
		let rtt = start.elapsed();

		if peek_txid(&buf[..len]) != Some(txid) {
			trace!("dropping {} byte datagram with foreign txid", len);
			continue;
		}

		let response = parse_response(&buf[..len], txid)?;
		debug!(
			"txid {} answered in {:?}: rcode {}, {} answers",
			txid, rtt, response.rcode, response.answer_count,
		);
		return Ok(Exchange {
			response_size: len,
			rtt,
			answer_count: response.answer_count,
		});
	}
}
