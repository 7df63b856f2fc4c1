use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

static RELOAD_HANDLE: OnceCell<reload::Handle<EnvFilter, Registry>> = OnceCell::new();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	#[default]
	Default,
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("invalid log filter: {0}")]
	InvalidFilter(#[from] tracing_subscriber::filter::ParseError),
	#[error("failed to init logger: {0}")]
	Init(#[from] tracing_subscriber::util::TryInitError),
	#[error("failed to reload logger: {0}")]
	Reload(#[from] reload::Error),
}

/// Installs the global subscriber on the first call, writing to stderr. Later calls only swap
/// the filter, the output mode is fixed for the lifetime of the process.
pub fn init(level: &str, mode: Mode) -> Result<(), LoggingError> {
	let env_filter = EnvFilter::from_str(level)?;

	let handle = RELOAD_HANDLE.get_or_try_init(|| {
		let (filter, handle) = reload::Layer::new(EnvFilter::from_str(level)?);

		let layer = tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.with_line_number(true)
			.with_file(true);

		let layer = match mode {
			Mode::Default => layer.boxed(),
			Mode::Json => layer.json().boxed(),
			Mode::Pretty => layer.pretty().boxed(),
			Mode::Compact => layer.compact().boxed(),
		};

		tracing_subscriber::registry().with(filter).with(layer).try_init()?;

		Ok::<_, LoggingError>(handle)
	})?;

	handle.reload(env_filter)?;

	Ok(())
}
