use crate::invoker::Invoker;

pub mod check;
pub mod matrix;
pub mod session;
pub mod token;

/// Inspect community permissions, access tokens and the local session
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Configuration files, applied in order
	#[clap(long, short = 'c', env = "COMMUNITY_CONFIG_PATH", value_delimiter = ',')]
	pub config: Vec<String>,

	/// Json output
	#[clap(long)]
	pub json: bool,

	#[clap(subcommand)]
	pub command: Commands,
}

#[derive(Debug, clap::Args)]
pub struct SubCommand<T: clap::Subcommand> {
	#[clap(subcommand)]
	pub command: T,
}

#[async_trait::async_trait]
pub trait Invokable {
	async fn invoke(&self, invoker: &Invoker, args: &Cli) -> anyhow::Result<()>;
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
	/// Decide what a user may do with a resource
	Check(check::Check),

	/// Print what every role may do with resources it does not own
	Matrix(matrix::Matrix),

	/// Access token commands
	Token(SubCommand<token::Commands>),

	/// Local session commands
	Session(SubCommand<session::Commands>),
}

#[async_trait::async_trait]
impl Invokable for Commands {
	async fn invoke(&self, invoker: &Invoker, args: &Cli) -> anyhow::Result<()> {
		match self {
			Self::Check(cmd) => cmd.invoke(invoker, args).await,
			Self::Matrix(cmd) => cmd.invoke(invoker, args).await,
			Self::Token(cmd) => cmd.command.invoke(invoker, args).await,
			Self::Session(cmd) => cmd.command.invoke(invoker, args).await,
		}
	}
}

/// Resource kinds as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Kind {
	Alert,
	Request,
	Response,
}

impl From<Kind> for community_access::ResourceKind {
	fn from(kind: Kind) -> Self {
		match kind {
			Kind::Alert => Self::Alert,
			Kind::Request => Self::Request,
			Kind::Response => Self::Response,
		}
	}
}
