//! Ledgercast CLI - convert account records to the canonical layout
//!
//! # Main Commands
//!
//! ```bash
//! ledgercast convert input.txt --format statement   # Convert with a built-in format
//! ledgercast convert input.csv --mapping map.json   # Convert with a mapping file
//! ledgercast mapping list                           # Manage stored mappings
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! ledgercast inspect input.csv      # Show encoding and line structure
//! ledgercast formats                # List built-in formats
//! ledgercast conversions            # Show available conversion steps
//! ledgercast example-mapping        # Show an example mapping spec
//! ```

use clap::{Parser, Subcommand};
use ledgercast::{
    builtin, builtin_names, conversions_description, convert_file, ConvertOptions, MappingRegistry,
    RawDocument,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ledgercast")]
#[command(about = "Convert account records between layouts and the canonical schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source file to the canonical layout
    Convert {
        /// Input file
        input: PathBuf,

        /// Mapping spec JSON file
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Stored mapping id from the registry
        #[arg(short, long)]
        stored: Option<String>,

        /// Built-in format name (see `ledgercast formats`)
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show encoding and line structure of an input file
    Inspect {
        /// Input file
        input: PathBuf,
    },

    /// List built-in formats
    Formats,

    /// Show available conversion steps
    Conversions,

    /// Show an example mapping spec
    ExampleMapping,

    /// Manage stored mapping specs
    Mapping {
        #[command(subcommand)]
        action: MappingAction,
    },
}

#[derive(Subcommand)]
enum MappingAction {
    /// List all stored mappings
    List,

    /// Import a mapping spec JSON file
    Import {
        /// Mapping spec file to import
        file: PathBuf,
        /// Name for the stored mapping
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show details of a stored mapping
    Show {
        /// Mapping id
        id: String,
    },

    /// Delete a stored mapping
    Delete {
        /// Mapping id
        id: String,
    },

    /// Convert an input file with a stored mapping
    Use {
        /// Mapping id
        id: String,
        /// Input file
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            mapping,
            stored,
            format,
            output,
        } => cmd_convert(&input, mapping, stored, format, output.as_deref()),

        Commands::Inspect { input } => cmd_inspect(&input),

        Commands::Formats => cmd_formats(),

        Commands::Conversions => cmd_conversions(),

        Commands::ExampleMapping => cmd_example_mapping(),

        Commands::Mapping { action } => cmd_mapping(action),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    mapping: Option<PathBuf>,
    stored: Option<String>,
    format: Option<String>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting: {}", input.display());

    let options = ConvertOptions {
        mapping_path: mapping,
        stored,
        format,
    };

    let report = convert_file(input, &options)?;

    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("   Lines: {}", report.line_count);
    if !report.spec.description.is_empty() {
        eprintln!("   Mapping: {}", report.spec.description);
    }
    if let Some(ref id) = report.stored_id {
        eprintln!("   Stored id: {}", id);
    }
    if report.output.dropped_lines > 0 {
        eprintln!(
            "   ⚠️  {} trailing lines did not fill a record and were dropped",
            report.output.dropped_lines
        );
    }
    eprintln!("✅ Converted {}", report.output.summary());

    write_output(&report.output.text, output)?;
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Inspecting: {}", input.display());

    let decoded = ledgercast::read_input(input)?;
    let doc = RawDocument::parse(&decoded.content);

    eprintln!("   Encoding: {}", decoded.encoding);
    eprintln!("   Lines: {}", doc.line_count());

    // a comma count hints at row-oriented sources
    if let Some(first) = doc.lines().first() {
        let columns = first.split(',').count();
        if columns > 1 {
            eprintln!("   First line has {} comma-separated columns", columns);
        }
    }

    for (i, line) in doc.lines().iter().take(10).enumerate() {
        println!("[{:3}] {}", i, line);
    }
    if doc.line_count() > 10 {
        eprintln!("   ... {} more lines", doc.line_count() - 10);
    }

    Ok(())
}

fn cmd_formats() -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📋 Built-in formats:\n");
    for name in builtin_names() {
        if let Some(spec) = builtin(name) {
            println!("  {} - {}", name, spec.description);
        }
    }
    Ok(())
}

fn cmd_conversions() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", conversions_description());
    Ok(())
}

fn cmd_example_mapping() -> Result<(), Box<dyn std::error::Error>> {
    let spec = builtin("statement").ok_or("built-in 'statement' mapping missing")?;
    println!("{}", spec.to_json()?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

fn cmd_mapping(action: MappingAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = MappingRegistry::new();

    match action {
        MappingAction::List => {
            let mappings = registry.list();
            if mappings.is_empty() {
                eprintln!("📋 No mappings stored yet.");
                eprintln!("   Use 'ledgercast mapping import <file>' to add one.");
                return Ok(());
            }

            eprintln!("📋 Stored mappings ({}):\n", mappings.len());
            for m in mappings {
                println!("  📄 {} ({})", m.name, m.id);
                if !m.source_headers.is_empty() {
                    println!("     Source headers: {}", m.source_headers.join(", "));
                }
                println!("     Uses: {}", m.use_count);
                if let Some(ref last) = m.last_used {
                    println!("     Last used: {}", last);
                }
                println!();
            }
        }

        MappingAction::Import { file, name } => {
            eprintln!("📥 Importing mapping from: {}", file.display());
            let id = registry.import(&file, name.as_deref())?;
            eprintln!("✅ Mapping saved with id: {}", id);
        }

        MappingAction::Show { id } => match registry.get(&id) {
            Some(m) => {
                println!("📄 Mapping: {} ({})\n", m.name, m.id);
                println!("Created: {}", m.created_at);
                println!("Uses: {}", m.use_count);
                println!("\nSpec:");
                println!("{}", m.spec.to_json()?);
            }
            None => {
                return Err(format!("Stored mapping not found: {}", id).into());
            }
        },

        MappingAction::Delete { id } => {
            registry.delete(&id)?;
            eprintln!("🗑️  Mapping deleted: {}", id);
        }

        MappingAction::Use { id, input, output } => {
            let name = registry
                .get(&id)
                .map(|m| m.name.clone())
                .ok_or_else(|| format!("Stored mapping not found: {}", id))?;
            eprintln!("📄 Using mapping: {} ({})", name, id);

            let options = ConvertOptions {
                stored: Some(id),
                ..Default::default()
            };
            let report = convert_file(&input, &options)?;
            eprintln!("✅ Converted {}", report.output.summary());

            write_output(&report.output.text, output.as_deref())?;
        }
    }

    Ok(())
}
