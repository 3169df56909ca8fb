//! recap-gen - resolve a parsed API header dump into serialization
//! descriptors
//!
//! Usage:
//!   recap-gen <dump.json>              Print a resolution summary
//!   recap-gen <dump.json> structs      Emit the struct member table
//!   recap-gen <dump.json> functions    Emit the function signature table
//!   recap-gen <dump.json> methods      Emit the method signature table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recap_types::{DescriptorResolver, SourceDict};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recap-gen")]
#[command(about = "Resolve a parsed API header dump into serialization descriptors", long_about = None)]
struct Cli {
    /// Path to the parse dump (JSON)
    dump: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exclude a struct from selection (repeatable)
    #[arg(long = "deny", value_name = "STRUCT")]
    denied: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the resolved struct member table as JSON
    Structs,
    /// Emit the resolved free-function signature table as JSON
    Functions,
    /// Emit the resolved method signature table as JSON
    Methods,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dump = fs::read_to_string(&cli.dump)
        .with_context(|| format!("Failed to read dump: {}", cli.dump.display()))?;
    let source = SourceDict::from_json(&dump)
        .with_context(|| format!("Failed to parse dump: {}", cli.dump.display()))?;

    let mut resolver = DescriptorResolver::new(source);
    if !cli.denied.is_empty() {
        resolver.set_denylist(cli.denied.iter().cloned());
        resolver.set_check_denylist(true);
    }
    resolver.resolve();

    let rendered = match cli.command {
        Some(Commands::Structs) => serde_json::to_string_pretty(resolver.struct_members())
            .context("Failed to serialize struct members")?,
        Some(Commands::Functions) => serde_json::to_string_pretty(resolver.command_params())
            .context("Failed to serialize function signatures")?,
        Some(Commands::Methods) => serde_json::to_string_pretty(resolver.method_params())
            .context("Failed to serialize method signatures")?,
        None => summarize(&resolver),
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}

fn summarize(resolver: &DescriptorResolver) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "structs: {} selected, {} listed\n",
        resolver.struct_members().len(),
        resolver.filtered_struct_names().len()
    ));
    out.push_str(&format!("functions: {}\n", resolver.command_params().len()));
    out.push_str(&format!("methods: {}\n", resolver.method_params().len()));

    for (name, members) in resolver.struct_members() {
        let arrays = members.iter().filter(|m| m.is_dynamic_array()).count();
        out.push_str(&format!(
            "  {} ({} fields, {} dynamic arrays)\n",
            name,
            members.len(),
            arrays
        ));
    }
    for (name, signature) in resolver.command_params() {
        out.push_str(&format!(
            "  {} -> {} ({} params)\n",
            name,
            signature.return_type,
            signature.parameters.len()
        ));
    }

    out
}
