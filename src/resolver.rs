use std::net::IpAddr;

use anyhow::Result;
use hickory_proto::rr::RecordType;
use hickory_resolver::TokioResolver;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::transport::RunConfig;

/// Record type mnemonics accepted on the command line, with their type
/// codes. Matching is exact and case-sensitive.
const RECORD_TYPES: &[(&str, u16)] = &[
	("None", 0), ("A", 1), ("NS", 2), ("MD", 3), ("MF", 4), ("CNAME", 5),
	("SOA", 6), ("MB", 7), ("MG", 8), ("MR", 9), ("NULL", 10), ("PTR", 12),
	("HINFO", 13), ("MINFO", 14), ("MX", 15), ("TXT", 16), ("RP", 17),
	("AFSDB", 18), ("X25", 19), ("ISDN", 20), ("RT", 21), ("NSAP-PTR", 23),
	("SIG", 24), ("KEY", 25), ("PX", 26), ("GPOS", 27), ("AAAA", 28),
	("LOC", 29), ("NXT", 30), ("EID", 31), ("NIMLOC", 32), ("SRV", 33),
	("ATMA", 34), ("NAPTR", 35), ("KX", 36), ("CERT", 37), ("DNAME", 39),
	("OPT", 41), ("APL", 42), ("DS", 43), ("SSHFP", 44), ("IPSECKEY", 45),
	("RRSIG", 46), ("NSEC", 47), ("DNSKEY", 48), ("DHCID", 49), ("NSEC3", 50),
	("NSEC3PARAM", 51), ("TLSA", 52), ("SMIMEA", 53), ("HIP", 55),
	("NINFO", 56), ("RKEY", 57), ("TALINK", 58), ("CDS", 59), ("CDNSKEY", 60),
	("OPENPGPKEY", 61), ("CSYNC", 62), ("ZONEMD", 63), ("SVCB", 64),
	("HTTPS", 65), ("SPF", 99), ("UINFO", 100), ("UID", 101), ("GID", 102),
	("UNSPEC", 103), ("NID", 104), ("L32", 105), ("L64", 106), ("LP", 107),
	("EUI48", 108), ("EUI64", 109), ("TKEY", 249), ("TSIG", 250),
	("IXFR", 251), ("AXFR", 252), ("MAILB", 253), ("MAILA", 254), ("ANY", 255),
	("URI", 256), ("CAA", 257), ("AVC", 258), ("AMTRELAY", 260),
	("TA", 32768), ("DLV", 32769), ("Reserved", 65535),
];

/// Resolves a hostname to its addresses.
pub trait HostLookup {
	async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>>;
}

/// Lookup through the system resolver configuration (/etc/resolv.conf
/// on Unix). The resolver is only built when a lookup is needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLookup;

impl HostLookup for SystemLookup {
	async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>> {
		let resolver = TokioResolver::builder_tokio()?.build();
		let response = resolver.lookup_ip(host).await?;
		Ok(response.iter().collect())
	}
}

/// Parse a record type mnemonic such as "A", "AAAA" or "MX".
///
/// Types hickory has no variant for come back as `RecordType::Unknown`.
pub fn parse_record_type(input: &str) -> Result<RecordType, ConfigError> {
	RECORD_TYPES.iter()
		.find(|(name, _)| *name == input)
		.map(|&(_, code)| RecordType::from(code))
		.ok_or_else(|| ConfigError::InvalidRecordType(input.to_string()))
}

/// The mnemonic for a record type, falling back to hickory's rendering.
pub fn record_type_mnemonic(record_type: RecordType) -> String {
	let code = u16::from(record_type);
	RECORD_TYPES.iter()
		.find(|(_, c)| *c == code)
		.map(|(name, _)| name.to_string())
		.unwrap_or_else(|| record_type.to_string())
}

/// Turn the server argument into a literal IP.
///
/// Literal IPv4/IPv6 addresses pass through without a lookup. Otherwise
/// the first address returned by `lookup` is used. A cancelled lookup
/// counts as a resolution failure.
pub async fn resolve_server<L: HostLookup>(
	input: &str,
	lookup: &L,
	cancel: &CancellationToken,
) -> Result<IpAddr, ConfigError> {
	if let Ok(ip) = input.parse::<IpAddr>() {
		return Ok(ip);
	}

	let result = tokio::select! {
		biased;
		_ = cancel.cancelled() => {
			debug!("lookup of {} interrupted", input);
			return Err(ConfigError::Resolution(input.to_string()));
		}
		result = lookup.lookup(input) => result,
	};

	match result {
		Ok(addrs) => match addrs.first() {
			Some(ip) => {
				debug!("resolved {} to {} ({} addresses)", input, ip, addrs.len());
				Ok(*ip)
			}
			None => Err(ConfigError::Resolution(input.to_string())),
		},
		Err(e) => {
			debug!("lookup of {} failed: {:#}", input, e);
			Err(ConfigError::Resolution(input.to_string()))
		}
	}
}

/// Build the run configuration from parsed command-line arguments.
///
/// The record type is checked before any network lookup happens.
pub async fn resolve_config<L: HostLookup>(
	cli: &Cli,
	lookup: &L,
	cancel: &CancellationToken,
) -> Result<RunConfig, ConfigError> {
	let record_type = parse_record_type(&cli.rdatatype)?;
	let server = resolve_server(&cli.server, lookup, cancel).await?;

	Ok(RunConfig {
		server,
		port: cli.port,
		host: cli.host.clone(),
		record_type,
		count: cli.count,
		interval: cli.interval,
		timeout: cli.timeout,
	})
}
