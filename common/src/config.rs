use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::logging;

/// File loaded when no explicit config file is given. It is allowed to be
/// missing.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

impl LoggingConfig {
	pub fn init(&self) -> Result<(), logging::LoggingError> {
		logging::init(&self.level, self.mode)
	}
}

/// Builds `C` from its defaults, then every file in `files` in order, then
/// environment variables named `{env_prefix}_{SECTION}__{KEY}`.
pub fn parse<C>(files: &[String], env_prefix: &str) -> anyhow::Result<C>
where
	C: DeserializeOwned + Serialize + Default,
{
	parse_with_env(files, env_prefix, std::env::vars())
}

pub fn parse_with_env<C, I>(files: &[String], env_prefix: &str, env: I) -> anyhow::Result<C>
where
	C: DeserializeOwned + Serialize + Default,
	I: IntoIterator<Item = (String, String)>,
{
	let mut root = toml::Value::try_from(C::default()).context("failed to serialize default config")?;

	let files = if files.is_empty() {
		vec![(DEFAULT_CONFIG_FILE.to_string(), true)]
	} else {
		files.iter().map(|file| (file.clone(), false)).collect()
	};

	for (file, optional) in files {
		if let Some(incoming) = load_file(&file, optional)? {
			tracing::debug!(file = %file, "loaded config file");
			merge(&mut root, incoming);
		}
	}

	let prefix = format!("{}_", env_prefix.to_uppercase());
	for (key, value) in env {
		let Some(key) = key.strip_prefix(&prefix) else {
			continue;
		};

		let path = key.split("__").map(|part| part.to_lowercase()).collect::<Vec<_>>();
		if path.iter().any(|part| part.is_empty()) {
			continue;
		}

		set_path(&mut root, &path, &value);
	}

	root.try_into().context("failed to parse config")
}

fn load_file(file: &str, optional: bool) -> anyhow::Result<Option<toml::Value>> {
	let contents = match std::fs::read_to_string(file) {
		Ok(contents) => contents,
		Err(err) if optional && err.kind() == std::io::ErrorKind::NotFound => {
			tracing::debug!(file = %file, "optional config file not found");
			return Ok(None);
		}
		Err(err) => return Err(err).with_context(|| format!("failed to read config file: {file}")),
	};

	let incoming = toml::from_str(&contents).with_context(|| format!("failed to parse config file: {file}"))?;

	Ok(Some(incoming))
}

/// Tables are merged key by key, everything else is replaced.
fn merge(root: &mut toml::Value, incoming: toml::Value) {
	match (root, incoming) {
		(toml::Value::Table(root), toml::Value::Table(incoming)) => {
			for (key, value) in incoming {
				match root.get_mut(&key) {
					Some(existing) => merge(existing, value),
					None => {
						root.insert(key, value);
					}
				}
			}
		}
		(root, incoming) => *root = incoming,
	}
}

fn set_path(root: &mut toml::Value, path: &[String], raw: &str) {
	let Some((last, parents)) = path.split_last() else {
		return;
	};

	let mut current = root;
	for part in parents {
		let toml::Value::Table(table) = current else {
			return;
		};

		current = table
			.entry(part.clone())
			.or_insert_with(|| toml::Value::Table(Default::default()));
	}

	let toml::Value::Table(table) = current else {
		return;
	};

	// Existing strings stay strings, so a secret of "1234" does not turn into an
	// integer.
	let value = match table.get(last) {
		Some(toml::Value::String(_)) => toml::Value::String(raw.to_string()),
		_ => parse_scalar(raw),
	};

	table.insert(last.clone(), value);
}

fn parse_scalar(raw: &str) -> toml::Value {
	#[derive(serde::Deserialize)]
	struct Scalar {
		v: toml::Value,
	}

	toml::from_str::<Scalar>(&format!("v = {raw}"))
		.map(|scalar| scalar.v)
		.unwrap_or_else(|_| toml::Value::String(raw.to_string()))
}
