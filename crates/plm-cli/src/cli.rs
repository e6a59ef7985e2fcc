use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use plm_lists::{FIFO_LIST, FILE_PROVIDER, LIFO_LIST, MEMORY_PROVIDER};

#[derive(Parser)]
#[command(
    name = "plm",
    about = "Persistent List Manager: named, durable lists",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML). Missing file means defaults.
    #[arg(short, long, global = true, default_value = "plm.toml")]
    pub config: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every registered list
    Lists,
    /// Show a list's metadata and items
    Show(KeyArgs),
    /// Create a list if it does not exist
    Ensure(EnsureArgs),
    /// Remove a list and its metadata record
    Remove(KeyArgs),
    /// Append an item to a list
    Push(PushArgs),
    /// Show (or take) the next item of a list
    Next(NextArgs),
    /// Remove every item from a list
    Clear(KeyArgs),
    /// Show the registered list and provider types
    Types,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct EnsureArgs {
    pub key: String,
    #[arg(short, long, value_enum, default_value = "fifo")]
    pub list: ListKind,
    #[arg(short, long, value_enum, default_value = "file")]
    pub provider: ProviderKind,
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct PushArgs {
    pub key: String,
    pub cargo: String,
}

#[derive(Args)]
pub struct NextArgs {
    pub key: String,
    /// Remove the item as well
    #[arg(long)]
    pub take: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ListKind {
    Fifo,
    Lifo,
}

impl ListKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ListKind::Fifo => FIFO_LIST,
            ListKind::Lifo => LIFO_LIST,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProviderKind {
    Memory,
    File,
}

impl ProviderKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ProviderKind::Memory => MEMORY_PROVIDER,
            ProviderKind::File => FILE_PROVIDER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_defaults() {
        let cli = Cli::try_parse_from(["plm", "ensure", "queue"]).unwrap();
        let Command::Ensure(args) = cli.command else {
            panic!("expected ensure");
        };
        assert_eq!(args.key, "queue");
        assert_eq!(args.list.type_name(), FIFO_LIST);
        assert_eq!(args.provider.type_name(), FILE_PROVIDER);
        assert_eq!(cli.config, PathBuf::from("plm.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["plm", "lists", "--verbose", "--config", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn lifo_memory_list() {
        let cli =
            Cli::try_parse_from(["plm", "ensure", "s", "--list", "lifo", "--provider", "memory"])
                .unwrap();
        let Command::Ensure(args) = cli.command else {
            panic!("expected ensure");
        };
        assert_eq!(args.list.type_name(), LIFO_LIST);
        assert_eq!(args.provider.type_name(), MEMORY_PROVIDER);
    }
}
