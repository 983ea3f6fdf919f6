use crate::commands;
use crate::config::Config;
use crate::types::DaoContext;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "whisper",
    version,
    about = "Whisper signal proposals into a Moloch v3 DAO"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Baal (DAO) address override.
    #[arg(long, global = true)]
    pub dao: Option<String>,

    /// Treasury safe address override.
    #[arg(long, global = true)]
    pub safe: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub async fn run(self, config: Config) -> Result<()> {
        let context =
            DaoContext::from_config_and_flags(&config, self.dao.as_deref(), self.safe.as_deref())?;

        match self.command {
            Command::Send(cmd) => commands::send::run(cmd.args, config, context).await,
            Command::Status(cmd) => commands::status::run(cmd.args, config, context).await,
            Command::Contracts(cmd) => commands::contracts::run(cmd.args, config, context).await,
            Command::Chains(cmd) => cmd.run(config, context).await,
            Command::Links(cmd) => commands::links::run(cmd.args, config, context),
            Command::Doctor(cmd) => commands::doctor::run(cmd.args, config, context).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a whisper as a signal proposal.
    Send(SendCommand),
    /// Inspect a submitted transaction and recover its proposal id.
    Status(StatusCommand),
    /// Show the deployed contract set for a chain.
    Contracts(ContractsCommand),
    /// Manage configured chain aliases.
    Chains(ChainsCommand),
    /// Print share and explorer links without touching the network.
    Links(LinksCommand),
    /// Check RPC, chain, and signer readiness.
    Doctor(DoctorCommand),
}

#[derive(Parser, Debug)]
pub struct SendCommand {
    #[command(flatten)]
    pub args: SendArgs,
}

#[derive(Parser, Debug)]
pub struct StatusCommand {
    #[command(flatten)]
    pub args: StatusArgs,
}

#[derive(Parser, Debug)]
pub struct ContractsCommand {
    #[command(flatten)]
    pub args: ContractsArgs,
}

#[derive(Parser, Debug)]
pub struct LinksCommand {
    #[command(flatten)]
    pub args: LinksArgs,
}

#[derive(Parser, Debug)]
pub struct DoctorCommand {
    #[command(flatten)]
    pub args: DoctorArgs,
}

#[derive(Parser, Debug)]
pub struct ChainsCommand {
    #[command(subcommand)]
    pub command: ChainsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ChainsSubcommand {
    List(ChainsListArgs),
    Add(ChainsAddArgs),
    Remove(ChainsRemoveArgs),
}

impl ChainsCommand {
    pub async fn run(self, config: Config, context: DaoContext) -> Result<()> {
        match self.command {
            ChainsSubcommand::List(args) => commands::chains::run_list(args, config, context).await,
            ChainsSubcommand::Add(args) => commands::chains::run_add(args, config, context).await,
            ChainsSubcommand::Remove(args) => {
                commands::chains::run_remove(args, config, context).await
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct RpcArgs {
    #[arg(long)]
    pub rpc: Option<String>,

    #[arg(long)]
    pub chain: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignerArgs {
    #[arg(long)]
    pub private_key: Option<String>,

    #[arg(long)]
    pub private_key_env: Option<String>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub signer: SignerArgs,

    /// The whisper itself; must be longer than 5 characters.
    pub message: String,

    /// Prepare and print the call without signing or sending.
    #[arg(long)]
    pub dry_run: bool,

    /// Return right after submission instead of waiting for the receipt.
    #[arg(long)]
    pub no_wait: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub rpc: RpcArgs,

    pub tx_hash: String,

    /// Keep polling until the transaction is mined.
    #[arg(long)]
    pub wait: bool,

    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long)]
    pub poll_ms: Option<u64>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ContractsArgs {
    #[command(flatten)]
    pub rpc: RpcArgs,

    /// Skip RPC probing and only print the static table.
    #[arg(long)]
    pub offline: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChainsListArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChainsAddArgs {
    pub alias: String,

    #[arg(long)]
    pub rpc: String,
}

#[derive(Args, Debug)]
pub struct ChainsRemoveArgs {
    pub alias: String,
}

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Proposal id to build the share link for.
    #[arg(long)]
    pub propid: Option<u64>,

    /// Transaction hash to build the explorer link for.
    #[arg(long)]
    pub tx: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(flatten)]
    pub signer: SignerArgs,

    #[arg(long)]
    pub json: bool,
}
