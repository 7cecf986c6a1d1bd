//! Writes the Vulkan function-list header for the crater loader from `vk.xml`.

mod logging;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use vulkan_api_registry::emit::{DEFAULT_DEVICE_MACRO, DEFAULT_EXPORTED_MACRO, DEFAULT_INSTANCE_MACRO};
use vulkan_api_registry::{HeaderWriter, MacroNames, Registry};

#[derive(Parser)]
#[command(name = "crater-vk-gen", version, about = "Generate the Vulkan function-list header from vk.xml")]
struct Cli {
    /// Path to the registry document (vk.xml). Nothing is written without it.
    registry: Option<PathBuf>,
    /// Write the header to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write the prologue before loading the registry, as older generators did
    #[arg(long)]
    stream: bool,
    /// Macro invoked for functions exported by the loader library
    #[arg(long, value_name = "MACRO", default_value = DEFAULT_EXPORTED_MACRO)]
    exported_macro: String,
    /// Macro invoked for instance extension functions
    #[arg(long, value_name = "MACRO", default_value = DEFAULT_INSTANCE_MACRO)]
    instance_macro: String,
    /// Macro invoked for device extension functions
    #[arg(long, value_name = "MACRO", default_value = DEFAULT_DEVICE_MACRO)]
    device_macro: String,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn macro_names(&self) -> MacroNames {
        MacroNames {
            exported: self.exported_macro.clone(),
            instance: self.instance_macro.clone(),
            device: self.device_macro.clone(),
        }
    }

    fn open_output(&self) -> Result<Box<dyn Write>> {
        Ok(match self.output {
            Some(ref path) => {
                let file = fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
                Box::new(io::BufWriter::new(file))
            }
            None => Box::new(io::BufWriter::new(io::stdout().lock())),
        })
    }
}

fn load(path: &Path) -> Result<Registry> {
    let registry = Registry::load(path).with_context(|| format!("failed to read registry {}", path.display()))?;
    info!(
        platforms = registry.platforms.len(),
        functions = registry.functions.len(),
        "loaded {}",
        path.display()
    );
    Ok(registry)
}

/// Renders the whole header in memory, so nothing is written unless the registry built.
fn generate_buffered(cli: &Cli, path: &Path, macros: &MacroNames) -> Result<()> {
    let registry = load(path)?;
    let mut header = Vec::new();
    registry.write_header(&mut header, macros)?;
    let mut out = cli.open_output()?;
    out.write_all(&header)?;
    out.flush()?;
    Ok(())
}

/// Writes the prologue before the registry is read. A load failure leaves a truncated header.
fn generate_streaming(cli: &Cli, path: &Path, macros: &MacroNames) -> Result<()> {
    let writer = HeaderWriter::new(macros);
    let mut out = cli.open_output()?;
    writer.write_prologue(&mut out)?;
    let registry = match load(path) {
        Ok(registry) => registry,
        Err(e) => {
            out.flush()?;
            return Err(e);
        }
    };
    writer.write_functions(&mut out, &registry.functions, &registry.platforms)?;
    writer.write_epilogue(&mut out)?;
    out.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let path = match cli.registry {
        Some(ref path) => path,
        None => return Ok(()),
    };
    let macros = cli.macro_names();
    if cli.stream {
        generate_streaming(&cli, path, &macros)
    } else {
        generate_buffered(&cli, path, &macros)
    }
}

fn main() {
    let cli = Cli::parse();
    logging::initialize_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
