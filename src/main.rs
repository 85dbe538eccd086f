mod cancel;
mod cli;
mod dns;
mod error;
mod output;
mod probe;
mod resolver;
mod stats;
mod transport;

use clap::Parser;
use log::info;

use crate::cancel::Cancellation;
use crate::cli::Cli;
use crate::dns::UdpExchanger;
use crate::resolver::SystemLookup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// Usage errors exit with status 2 here
	let cli = Cli::parse();

	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
		.init();

	// First Ctrl-C stops after the current attempt, the second exits at once
	let cancel = Cancellation::new();
	cancel::spawn_interrupt_listener(cancel.clone());

	let config = resolver::resolve_config(&cli, &SystemLookup, cancel.token()).await?;
	info!(
		"probing {} {} times, interval {:?}, timeout {:?}",
		config.server_addr(), config.count, config.interval, config.timeout,
	);
	output::print_header(&config);

	// A fatal exchange error ends the process here without a summary
	let run = probe::run_probe(&UdpExchanger, &config, &cancel).await?;

	let stats = stats::compute_run_stats(&run.samples, run.requests_sent);
	output::print_summary(config.server, &stats);

	Ok(())
}
