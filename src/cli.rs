use std::time::Duration;

use clap::Parser;

/// Measure response time to the given DNS server by asking it to resolve
/// a specified host.
#[derive(Parser, Debug)]
#[command(name = "dnsping")]
#[command(about = "Measure response time of a DNS server, like ping for DNS")]
pub struct Cli {
	/// DNS server hostname or IP address
	pub server: String,

	/// Port to connect to the DNS server
	#[arg(long = "port", default_value = "53")]
	pub port: u16,

	/// Host name to ask the DNS server to resolve
	#[arg(long = "host", default_value = "wikipedia.org")]
	pub host: String,

	/// DNS record type of the query
	#[arg(long = "rdatatype", default_value = "A")]
	pub rdatatype: String,

	/// Number of times to query
	#[arg(short = 'c', long = "count", default_value = "10")]
	pub count: u32,

	/// Wait time between pings (e.g. 1s, 500ms)
	#[arg(short = 'W', long = "interval", default_value = "1s", value_parser = parse_duration)]
	pub interval: Duration,

	/// Amount of time to wait for a server response
	#[arg(short = 't', long = "timeout", default_value = "2s", value_parser = parse_duration)]
	pub timeout: Duration,

	/// Log filter for diagnostics on stderr (overridden by RUST_LOG)
	#[arg(long = "log-level", default_value = "warn")]
	pub log_level: String,
}

/// Parse a duration such as "1s", "250ms", "1m30s" or "1.5s".
///
/// Units: ns, us (or µs), ms, s, m, h. A bare "0" is allowed.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
	let s = input.trim();
	if s == "0" {
		return Ok(Duration::ZERO);
	}
	if s.is_empty() {
		return Err("empty duration".to_string());
	}

	let mut total_nanos: f64 = 0.0;
	let mut rest = s;
	while !rest.is_empty() {
		let num_len = rest
			.find(|c: char| !(c.is_ascii_digit() || c == '.'))
			.unwrap_or(rest.len());
		if num_len == 0 {
			return Err(format!("invalid duration '{}'", input));
		}
		let value: f64 = rest[..num_len]
			.parse()
			.map_err(|_| format!("invalid number in duration '{}'", input))?;
		rest = &rest[num_len..];

		let unit_len = rest
			.find(|c: char| c.is_ascii_digit() || c == '.')
			.unwrap_or(rest.len());
		let scale = match &rest[..unit_len] {
			"ns" => 1.0,
			"us" | "µs" => 1e3,
			"ms" => 1e6,
			"s" => 1e9,
			"m" => 60e9,
			"h" => 3600e9,
			"" => return Err(format!("missing unit in duration '{}'", input)),
			unit => return Err(format!("unknown unit '{}' in duration '{}'", unit, input)),
		};
		rest = &rest[unit_len..];
		total_nanos += value * scale;
	}

	if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
		return Err(format!("duration '{}' out of range", input));
	}
	Ok(Duration::from_nanos(total_nanos.round() as u64))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let cli = Cli::try_parse_from(["dnsping", "1.1.1.1"]).unwrap();
		assert_eq!(cli.server, "1.1.1.1");
		assert_eq!(cli.port, 53);
		assert_eq!(cli.host, "wikipedia.org");
		assert_eq!(cli.rdatatype, "A");
		assert_eq!(cli.count, 10);
		assert_eq!(cli.interval, Duration::from_secs(1));
		assert_eq!(cli.timeout, Duration::from_secs(2));
	}

	#[test]
	fn test_all_flags() {
		let cli = Cli::try_parse_from([
			"dnsping", "--port", "5353", "--host", "example.com",
			"--rdatatype", "AAAA", "-c", "3", "-W", "250ms", "-t", "1.5s",
			"dns.google",
		]).unwrap();
		assert_eq!(cli.server, "dns.google");
		assert_eq!(cli.port, 5353);
		assert_eq!(cli.host, "example.com");
		assert_eq!(cli.rdatatype, "AAAA");
		assert_eq!(cli.count, 3);
		assert_eq!(cli.interval, Duration::from_millis(250));
		assert_eq!(cli.timeout, Duration::from_millis(1500));
	}

	#[test]
	fn test_server_argument_required() {
		let err = Cli::try_parse_from(["dnsping"]).unwrap_err();
		assert_eq!(err.exit_code(), 2);
		assert!(Cli::try_parse_from(["dnsping", "a", "b"]).is_err());
	}

	#[test]
	fn test_parse_duration_units() {
		assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
		assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
		assert_eq!(parse_duration("100ms"), Ok(Duration::from_millis(100)));
		assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
		assert_eq!(parse_duration("10µs"), Ok(Duration::from_micros(10)));
		assert_eq!(parse_duration("5ns"), Ok(Duration::from_nanos(5)));
		assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
		assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
		assert_eq!(parse_duration("0.5s"), Ok(Duration::from_millis(500)));
	}

	#[test]
	fn test_parse_duration_invalid() {
		assert!(parse_duration("").is_err());
		assert!(parse_duration("10").is_err());
		assert!(parse_duration("s").is_err());
		assert!(parse_duration("3d").is_err());
		assert!(parse_duration("-1s").is_err());
		assert!(parse_duration("1..5s").is_err());
	}
}
