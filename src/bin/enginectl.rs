use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use stability_engine::wire::{self, Record};
use stability_engine::{ColumnType, Schema};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "enginectl", version, about = "Inspect and build record-batch wire buffers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a JSON schema + JSON rows file into one wire batch.
    Encode(EncodeArgs),
    /// Dump a wire buffer's header and per-column descriptors.
    Inspect(InspectArgs),
}

#[derive(Parser)]
struct EncodeArgs {
    /// Schema file: a JSON array of `{ name, type, maxContentChars, fixedWidth? }`.
    #[arg(long)]
    schema: PathBuf,

    /// Rows file: a JSON array of objects keyed by column name.
    rows: PathBuf,

    /// Batch sequence number to stamp into the header.
    #[arg(long, default_value_t = 0)]
    seq: u32,

    /// Output path for the encoded buffer. Prints to stdout if omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser)]
struct InspectArgs {
    input: PathBuf,

    /// Emit JSON instead of human-readable output.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Encode(args) => run_encode(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_encode(args: &EncodeArgs) -> Result<(), AnyError> {
    let schema: Vec<Schema> = serde_json::from_reader(File::open(&args.schema)?)?;
    let rows: Vec<Record> = serde_json::from_reader(File::open(&args.rows)?)?;

    let buffer = wire::encode(&schema, &rows, args.seq);

    match &args.out {
        Some(path) => File::create(path)?.write_all(&buffer)?,
        None => std::io::stdout().write_all(&buffer)?,
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<(), AnyError> {
    let mut buffer = Vec::new();
    File::open(&args.input)?.read_to_end(&mut buffer)?;

    let parsed = wire::parse(&buffer)?;

    if args.json {
        let columns: Vec<_> = parsed
            .columns
            .iter()
            .map(|column| {
                let mut entry = BTreeMap::new();
                entry.insert("type", format!("{:?}", column.column_type()));
                entry
            })
            .collect();
        let summary = serde_json::json!({
            "seq": parsed.seq,
            "rowCount": parsed.row_count,
            "columns": columns,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("seq:       {}", parsed.seq);
    println!("row count: {}", parsed.row_count);
    println!("columns:");
    for (index, column) in parsed.columns.iter().enumerate() {
        println!("  [{index}] {}", describe(column.column_type()));
    }
    Ok(())
}

fn describe(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::F64 => "f64",
        ColumnType::I32 => "i32",
        ColumnType::U32 => "u32",
        ColumnType::Bool => "bool",
        ColumnType::TimestampMs => "timestamp_ms",
        ColumnType::Utf8 => "utf8",
        ColumnType::ListUtf8 => "list_utf8",
    }
}

