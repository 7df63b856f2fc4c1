use anyhow::Context as _;
use clap::Parser;
use cli::Invokable;
use config::AppConfig;
use invoker::Invoker;

mod cli;
mod config;
mod invoker;

#[tokio::main]
async fn main() {
	if let Err(err) = start().await {
		eprintln!("{:#}", err);
		std::process::exit(1);
	}
}

async fn start() -> anyhow::Result<()> {
	let cli = cli::Cli::parse();

	let config = AppConfig::parse(&cli.config).context("failed to load config")?;
	config.logging.init().context("failed to init logging")?;

	let invoker = Invoker::new(config, &cli);

	cli.command
		.invoke(&invoker, &cli)
		.await
		.context("failed to invoke command")?;

	Ok(())
}
