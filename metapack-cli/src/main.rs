//! MetaPack CLI - Command-line tool for schema-driven binary packing
//!
//! This binary provides command-line interfaces for:
//! - pack: encode a JSON document against a schema → binary package
//! - unpack: decode a binary package against a schema → JSON
//! - size: compare packed size with JSON size
//! - inspect: show a schema tree with per-field widths

use clap::{Args, Parser, Subcommand, ValueEnum};
use metapack_codec::{pack, unpack, PackConfig, Schema, Value};
use metapack_format::DataType;
use serde_json::json;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metapack")]
#[command(about = "Schema-driven binary packing CLI tool")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a JSON document into a binary package
    Pack {
        /// Input JSON document
        input: PathBuf,
        /// Schema description (JSON)
        #[arg(short, long)]
        schema: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Unpack a binary package into JSON
    Unpack {
        /// Input package
        input: PathBuf,
        /// Schema description (JSON)
        #[arg(short, long)]
        schema: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Compare packed size against JSON size
    ///
    /// Examples:
    ///   metapack size state.json --schema state.schema.json
    ///   metapack size state.json --schema state.schema.json --no-checksum
    Size {
        /// Input JSON document
        input: PathBuf,
        /// Schema description (JSON)
        #[arg(short, long)]
        schema: PathBuf,
        /// Output format (table, json)
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Show a schema tree with encoded widths
    Inspect {
        /// Schema description (JSON)
        schema: PathBuf,
        /// Output format (table, json)
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
}

/// Options shared by commands that pack or unpack
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// TOML file with pack options
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not append or verify the checksum footer
    #[arg(long)]
    no_checksum: bool,
    /// Do not obfuscate the payload
    #[arg(long)]
    no_encrypt: bool,
    /// Obfuscation secret
    #[arg(long, allow_hyphen_values = true)]
    secret: Option<i64>,
    /// Initial output buffer capacity
    #[arg(long)]
    chunk_size: Option<usize>,
}

impl ConfigArgs {
    /// Config file values, then command-line overrides
    fn resolve(&self) -> Result<PackConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("reading {} failed: {e}", path.display()))?;
                toml::from_str(&text)?
            }
            None => PackConfig::default(),
        };
        if self.no_checksum {
            config.use_checksum = false;
        }
        if self.no_encrypt {
            config.use_encrypt = false;
        }
        if let Some(secret) = self.secret {
            config.secret = secret;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        debug!(?config, "resolved pack configuration");
        Ok(config)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Pack {
            input,
            schema,
            output,
            config,
        } => handle_pack(&input, &schema, &output, &config)?,
        Commands::Unpack {
            input,
            schema,
            output,
            pretty,
            config,
        } => handle_unpack(&input, &schema, output.as_deref(), pretty, &config)?,
        Commands::Size {
            input,
            schema,
            format,
            config,
        } => handle_size(&input, &schema, format, &config)?,
        Commands::Inspect { schema, format } => handle_inspect(&schema, format)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_schema(path: &Path) -> Result<Schema, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("reading schema {} failed: {e}", path.display()))?;
    Ok(text.parse::<Schema>()?)
}

fn load_json(path: &Path) -> Result<serde_json::Value, Box<dyn Error>> {
    let text =
        fs::read(path).map_err(|e| format!("reading input {} failed: {e}", path.display()))?;
    Ok(serde_json::from_slice(&text)?)
}

fn handle_pack(
    input: &Path,
    schema_path: &Path,
    output: &Path,
    config: &ConfigArgs,
) -> Result<(), Box<dyn Error>> {
    let schema = load_schema(schema_path)?;
    let config = config.resolve()?;
    let value = Value::from_json(&load_json(input)?, &schema)?;

    let packed = pack(&value, &schema, &config)?;
    fs::write(output, &packed)
        .map_err(|e| format!("writing {} failed: {e}", output.display()))?;
    info!(bytes = packed.len(), output = %output.display(), "wrote package");

    let mut stderr = std::io::stderr().lock();
    writeln!(
        &mut stderr,
        "Packed to {} ({} bytes)",
        output.display(),
        packed.len()
    )?;
    Ok(())
}

fn handle_unpack(
    input: &Path,
    schema_path: &Path,
    output: Option<&Path>,
    pretty: bool,
    config: &ConfigArgs,
) -> Result<(), Box<dyn Error>> {
    let schema = load_schema(schema_path)?;
    let config = config.resolve()?;
    let data =
        fs::read(input).map_err(|e| format!("reading input {} failed: {e}", input.display()))?;

    let value = unpack(&data, &schema, &config)?;
    let json = value.to_json();
    let mut rendered = if pretty {
        serde_json::to_vec_pretty(&json)?
    } else {
        serde_json::to_vec(&json)?
    };
    rendered.push(b'\n');

    match output {
        Some(path) => fs::write(path, &rendered)
            .map_err(|e| format!("writing {} failed: {e}", path.display()))?,
        None => std::io::stdout().lock().write_all(&rendered)?,
    }
    Ok(())
}

fn handle_size(
    input: &Path,
    schema_path: &Path,
    format: ReportFormat,
    config: &ConfigArgs,
) -> Result<(), Box<dyn Error>> {
    let schema = load_schema(schema_path)?;
    let config = config.resolve()?;
    let json_value = load_json(input)?;
    let value = Value::from_json(&json_value, &schema)?;

    let packed_len = pack(&value, &schema, &config)?.len();
    let json_len = serde_json::to_vec(&json_value)?.len();
    let ratio = if json_len == 0 {
        0.0
    } else {
        packed_len as f64 / json_len as f64
    };

    let mut stdout = std::io::stdout().lock();
    match format {
        ReportFormat::Table => {
            writeln!(&mut stdout, "metapack: {} bytes", packed_len)?;
            writeln!(&mut stdout, "json:     {} bytes", json_len)?;
            writeln!(&mut stdout, "ratio:    {:.1}%", ratio * 100.0)?;
        }
        ReportFormat::Json => {
            let report = json!({
                "metapack_bytes": packed_len,
                "json_bytes": json_len,
                "ratio": ratio,
            });
            serde_json::to_writer(&mut stdout, &report)?;
            writeln!(&mut stdout)?;
        }
    }
    Ok(())
}

fn handle_inspect(schema_path: &Path, format: ReportFormat) -> Result<(), Box<dyn Error>> {
    let schema = load_schema(schema_path)?;
    let mut stdout = std::io::stdout().lock();

    match format {
        ReportFormat::Table => {
            let mut rows = Vec::new();
            collect_rows(&schema, "<root>", 0, &mut rows);
            let name_width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
            for row in &rows {
                writeln!(
                    &mut stdout,
                    "{:<width$}  {:<8}  {}",
                    row.label,
                    row.kind,
                    row.width,
                    width = name_width
                )?;
            }
            writeln!(
                &mut stdout,
                "minimum encoded size: {} bytes",
                schema.min_encoded_len()
            )?;
        }
        ReportFormat::Json => {
            let report = json!({
                "schema": schema.to_json(),
                "min_encoded_len": schema.min_encoded_len(),
            });
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(&mut stdout)?;
        }
    }
    Ok(())
}

struct SchemaRow {
    label: String,
    kind: String,
    width: String,
}

fn scalar_width(ty: DataType) -> String {
    match ty.fixed_width() {
        Some(width) => width.to_string(),
        None => "4+N".to_string(),
    }
}

fn collect_rows(schema: &Schema, name: &str, depth: usize, rows: &mut Vec<SchemaRow>) {
    let label = format!("{}{}", "  ".repeat(depth), name);
    match schema {
        Schema::Scalar(ty) => rows.push(SchemaRow {
            label,
            kind: ty.name().to_string(),
            width: scalar_width(*ty),
        }),
        Schema::Sequence(elements) => {
            rows.push(SchemaRow {
                label,
                kind: "sequence".to_string(),
                width: format!("4+{}x", elements.len()),
            });
            for (i, element) in elements.iter().enumerate() {
                collect_rows(element, &format!("[{}]", i), depth + 1, rows);
            }
        }
        Schema::Mapping(fields) => {
            rows.push(SchemaRow {
                label,
                kind: "mapping".to_string(),
                width: schema.min_encoded_len().to_string(),
            });
            for (field_name, field_schema) in fields {
                collect_rows(field_schema, field_name, depth + 1, rows);
            }
        }
    }
}
