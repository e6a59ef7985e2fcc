use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use plm_lists::{register_builtin_types, BuiltinConfig};
use plm_registry::{PersistentList, PersistentListRegistry, TypeRegistry};
use plm_store::FileMetadataStore;
use plm_types::ListItem;
use tracing::debug;

use crate::cli::*;
use crate::config::PlmConfig;

pub fn run_command(cli: Cli, config: &PlmConfig) -> anyhow::Result<()> {
    let registry = open_registry(config)?;
    let result = match cli.command {
        Command::Lists => cmd_lists(&registry),
        Command::Show(args) => cmd_show(&registry, &args.key),
        Command::Ensure(args) => cmd_ensure(&registry, args),
        Command::Remove(args) => cmd_remove(&registry, &args.key),
        Command::Push(args) => cmd_push(&registry, args),
        Command::Next(args) => cmd_next(&registry, args),
        Command::Clear(args) => cmd_clear(&registry, &args.key),
        Command::Types => cmd_types(&registry),
    };
    registry.on_shutdown();
    result
}

/// Open the metadata store, register the built-in types and run the
/// startup load.
pub fn open_registry(config: &PlmConfig) -> anyhow::Result<PersistentListRegistry> {
    debug!(data_dir = %config.data_dir.display(), "opening registry");
    let store = FileMetadataStore::open(config.metadata_path())
        .with_context(|| format!("opening {}", config.metadata_path().display()))?;

    let mut builder = TypeRegistry::builder();
    register_builtin_types(
        &mut builder,
        &BuiltinConfig {
            items_dir: config.items_dir(),
        },
    );

    let registry = PersistentListRegistry::new(Arc::new(store), builder.build());
    let report = registry.on_startup().context("loading lists")?;
    for skipped in &report.skipped {
        eprintln!(
            "{} list {} not loaded: {}",
            "warning:".yellow().bold(),
            skipped.key.bold(),
            skipped.error
        );
    }
    Ok(registry)
}

fn require(registry: &PersistentListRegistry, key: &str) -> anyhow::Result<Arc<dyn PersistentList>> {
    match registry.get_list(key)? {
        Some(list) => Ok(list),
        None => bail!("no list named '{key}'"),
    }
}

fn cmd_lists(registry: &PersistentListRegistry) -> anyhow::Result<()> {
    let mut lists = registry.get_lists();
    if lists.is_empty() {
        println!("No lists.");
        return Ok(());
    }
    lists.sort_by(|a, b| a.key().cmp(b.key()));
    for list in lists {
        let provider = list.provider().map_or("-", |p| p.type_name());
        let size = list
            .size()
            .map_or_else(|e| format!("error: {e}").red().to_string(), |n| n.to_string());
        println!(
            "{}  {}  {}  {} items",
            list.key().bold(),
            list.type_name().cyan(),
            provider.dimmed(),
            size
        );
    }
    Ok(())
}

fn cmd_show(registry: &PersistentListRegistry, key: &str) -> anyhow::Result<()> {
    let list = require(registry, key)?;
    println!("List {}", list.key().yellow().bold());
    println!("  Id: {}", list.id());
    println!("  Type: {}", list.type_name().cyan());
    if let Some(provider) = list.provider() {
        println!("  Provider: {}", provider.type_name().cyan());
    }
    if !list.description().is_empty() {
        println!("  Description: {}", list.description());
    }
    let items = list.items()?;
    println!("  Items: {}", items.len().to_string().bold());
    for (idx, item) in items.iter().enumerate() {
        println!("    {idx:>3}  {}  {}", item.cargo, item.created_at.to_rfc3339().dimmed());
    }
    Ok(())
}

fn cmd_ensure(registry: &PersistentListRegistry, args: EnsureArgs) -> anyhow::Result<()> {
    if registry.contains(&args.key) {
        println!("List {} already exists.", args.key.yellow());
        return Ok(());
    }
    let instance = registry.types().instantiate(
        &args.key,
        &args.description,
        args.provider.type_name(),
        args.list.type_name(),
    )?;
    let list = registry.ensure_list(instance)?;
    println!(
        "{} Created list {} ({})",
        "✓".green().bold(),
        list.key().yellow(),
        list.type_name().cyan()
    );
    Ok(())
}

fn cmd_remove(registry: &PersistentListRegistry, key: &str) -> anyhow::Result<()> {
    // Items outlive the record otherwise, and a later `ensure` of the same
    // key would pick them up again.
    if let Some(list) = registry.get_list(key)? {
        list.clear().with_context(|| format!("clearing items of '{key}'"))?;
    }
    if registry.remove_list(key)? {
        println!("{} Removed list {}", "✓".green().bold(), key.yellow());
    } else {
        println!("No list named {}.", key.yellow());
    }
    Ok(())
}

fn cmd_push(registry: &PersistentListRegistry, args: PushArgs) -> anyhow::Result<()> {
    let list = require(registry, &args.key)?;
    list.add(ListItem::new(args.cargo))?;
    println!("{} {} now holds {} items", "✓".green(), list.key().yellow(), list.size()?);
    Ok(())
}

fn cmd_next(registry: &PersistentListRegistry, args: NextArgs) -> anyhow::Result<()> {
    let list = require(registry, &args.key)?;
    let item = if args.take { list.take_next()? } else { list.next()? };
    match item {
        Some(item) => println!("{}", item.cargo),
        None => println!("{} is empty.", list.key().yellow()),
    }
    Ok(())
}

fn cmd_clear(registry: &PersistentListRegistry, key: &str) -> anyhow::Result<()> {
    let list = require(registry, key)?;
    list.clear()?;
    println!("{} Cleared {}", "✓".green(), key.yellow());
    Ok(())
}

fn cmd_types(registry: &PersistentListRegistry) -> anyhow::Result<()> {
    println!("{}", "List types:".bold());
    for name in registry.types().list_types() {
        println!("  {}", name.cyan());
    }
    println!("{}", "Provider types:".bold());
    for name in registry.types().provider_types() {
        println!("  {}", name.cyan());
    }
    Ok(())
}
