use anyhow::Context as _;
use community_access::session::{FileStore, Session};

use crate::cli::Cli;
use crate::config::AppConfig;

pub struct Invoker {
	config: AppConfig,
	json_output: bool,
}

#[derive(serde::Serialize)]
struct DisplayOutput<'a, T> {
	#[serde(rename = "__type")]
	object_type: &'static str,
	#[serde(flatten)]
	value: &'a T,
}

fn object_type<T>() -> &'static str {
	let object_type = std::any::type_name::<T>();
	object_type.split("::").last().unwrap_or(object_type)
}

impl Invoker {
	pub fn new(config: AppConfig, args: &Cli) -> Self {
		Self {
			config,
			json_output: args.json,
		}
	}

	pub fn config(&self) -> &AppConfig {
		&self.config
	}

	pub async fn session(&self) -> anyhow::Result<Session> {
		let path = &self.config.session.path;

		Session::start(FileStore::new(path))
			.await
			.with_context(|| format!("failed to open session: {}", path.display()))
	}

	fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<String> {
		let output = if self.json_output {
			serde_json::to_string_pretty(value).context("failed to display response")?
		} else {
			serde_yaml::to_string(value).context("failed to display response")?
		};

		Ok(output.trim().to_string())
	}

	pub fn display<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
		let output = self.render(&DisplayOutput {
			object_type: object_type::<T>(),
			value,
		})?;

		println!("{output}");

		Ok(())
	}

	pub fn display_array<T: serde::Serialize>(&self, values: &[T]) -> anyhow::Result<()> {
		let object_type = object_type::<T>();

		let values = values
			.iter()
			.map(|value| DisplayOutput { object_type, value })
			.collect::<Vec<_>>();

		println!("{}", self.render(&values)?);

		Ok(())
	}
}
