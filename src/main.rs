//! csv-dialect CLI - sniff and convert delimited text files

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use csv_dialect::{
    CsvContext, Dialect, DialectRef, IoSink, Metadata, SampleSize, Writer, decode_text,
    text_lines,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Sniff, inspect and convert CSV dialects.
#[derive(Parser, Debug)]
#[command(name = "csv-dialect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the dialect and header of one or more files
    Sniff(SniffArgs),
    /// Re-encode a file from one dialect to another
    Convert(ConvertArgs),
    /// List the built-in dialects
    Dialects {
        /// Show every dialect parameter
        #[arg(short = 'v', long)]
        verbose: bool,
    },
}

#[derive(Args, Debug)]
struct SniffArgs {
    /// Input file(s) to sniff
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Candidate delimiter characters (default: , ; tab | ^ ~)
    #[arg(short = 'd', long)]
    delimiters: Option<String>,

    /// Number of records to sample
    #[arg(short = 'n', long, default_value = "100")]
    sample_records: usize,

    /// Number of bytes to sample (overrides --sample-records)
    #[arg(short = 'b', long)]
    sample_bytes: Option<usize>,

    /// Read the entire file instead of sampling
    #[arg(short = 'a', long)]
    all: bool,

    /// Output format
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Show field names and inferred types
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input file
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Dialect of the input
    #[arg(long, default_value = "excel")]
    from: String,

    /// Dialect of the output
    #[arg(long, default_value = "excel")]
    to: String,

    /// Input dialect parameter override, e.g. -i delimiter=';'
    #[arg(short = 'i', long = "in-param", value_parser = parse_key_val)]
    in_params: Vec<(String, String)>,

    /// Output dialect parameter override, e.g. -p quoting=all
    #[arg(short = 'p', long = "out-param", value_parser = parse_key_val)]
    out_params: Vec<(String, String)>,

    /// Sniff the input dialect instead of using --from
    #[arg(long, conflicts_with = "from")]
    sniff: bool,

    /// Longest field accepted while reading
    #[arg(long)]
    field_size_limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid parameter '{s}': expected name=value"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Sniff(args) => run_sniff(&args),
        Command::Convert(args) => match convert(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error converting {}: {}", args.input.display(), e);
                ExitCode::FAILURE
            }
        },
        Command::Dialects { verbose } => {
            list_dialects(verbose);
            ExitCode::SUCCESS
        }
    }
}

fn run_sniff(args: &SniffArgs) -> ExitCode {
    let mut exit_code = ExitCode::SUCCESS;

    if args.format == OutputFormat::Csv {
        println!(
            "file,encoding,delimiter,quotechar,doublequote,escapechar,skipinitialspace,lineterminator,has_header,num_fields,avg_record_len"
        );
    }

    for file in &args.files {
        if let Err(e) = sniff_file(file, args) {
            eprintln!("Error processing {}: {}", file.display(), e);
            exit_code = ExitCode::FAILURE;
        }
    }

    exit_code
}

fn sniff_file(path: &Path, args: &SniffArgs) -> CliResult<()> {
    let bytes = fs::read(path)?;
    let decoded = decode_text(&bytes);
    debug!(
        file = %path.display(),
        encoding = decoded.encoding,
        bom = decoded.had_bom,
        "decoded input"
    );

    let mut sniffer = CsvContext::new().sniffer();
    if args.all {
        sniffer.sample_size(SampleSize::All);
    } else if let Some(bytes) = args.sample_bytes {
        sniffer.sample_size(SampleSize::Bytes(bytes));
    } else {
        sniffer.sample_size(SampleSize::Records(args.sample_records));
    }

    let metadata = sniffer.analyze(&decoded.text, args.delimiters.as_deref())?;

    match args.format {
        OutputFormat::Text => print_text_output(path, decoded.encoding, &metadata, args.verbose),
        OutputFormat::Json => print_json_output(path, decoded.encoding, &metadata, args.verbose),
        OutputFormat::Csv => print_csv_output(path, decoded.encoding, &metadata)?,
    }

    Ok(())
}

fn print_text_output(path: &Path, encoding: &str, metadata: &Metadata, verbose: bool) {
    let dialect = &metadata.dialect;
    println!("File: {}", path.display());
    println!("  Encoding: {encoding}");
    println!("  Delimiter: {:?}", dialect.delimiter());
    println!("  Quote char: {}", char_or_none(dialect.quotechar()));
    println!("  Double quote: {}", dialect.doublequote());
    println!("  Escape char: {}", char_or_none(dialect.escapechar()));
    println!("  Skip initial space: {}", dialect.skipinitialspace());
    println!("  Line terminator: {:?}", dialect.lineterminator());
    println!("  Has header: {}", metadata.has_header);
    println!("  Fields: {}", metadata.num_fields);
    println!("  Avg record length: {} chars", metadata.avg_record_len);

    if verbose {
        println!("  Field details:");
        for (i, (name, typ)) in metadata.fields.iter().zip(&metadata.types).enumerate() {
            println!("    {}: {} ({})", i + 1, name, typ);
        }
    }

    println!();
}

fn print_json_output(path: &Path, encoding: &str, metadata: &Metadata, verbose: bool) {
    let dialect = &metadata.dialect;
    let json_char = |c: Option<char>| c.map_or_else(|| "null".to_string(), |c| json_string(&c.to_string()));

    print!(
        r#"{{"file":{},"encoding":{},"dialect":{{"delimiter":{},"quotechar":{},"doublequote":{},"escapechar":{},"skipinitialspace":{},"lineterminator":{},"quoting":"{}"}},"has_header":{},"num_fields":{},"avg_record_len":{}"#,
        json_string(&path.display().to_string()),
        json_string(encoding),
        json_string(&dialect.delimiter().to_string()),
        json_char(dialect.quotechar()),
        dialect.doublequote(),
        json_char(dialect.escapechar()),
        dialect.skipinitialspace(),
        json_string(dialect.lineterminator()),
        dialect.quoting(),
        metadata.has_header,
        metadata.num_fields,
        metadata.avg_record_len
    );

    if verbose {
        let fields: Vec<String> = metadata
            .fields
            .iter()
            .zip(&metadata.types)
            .map(|(name, typ)| format!(r#"{{"name":{},"type":"{}"}}"#, json_string(name), typ))
            .collect();
        print!(r#","fields":[{}]"#, fields.join(","));
    }

    println!("}}");
}

/// One report row, written with this crate's own writer.
fn print_csv_output(path: &Path, encoding: &str, metadata: &Metadata) -> CliResult<()> {
    let dialect = &metadata.dialect;
    let row_dialect = Dialect::builder().lineterminator("\n").build()?;
    let mut writer = Writer::new(IoSink::new(io::stdout().lock()), row_dialect);
    writer.write_record([
        path.display().to_string(),
        encoding.to_string(),
        dialect.delimiter().to_string(),
        char_or_none(dialect.quotechar()),
        dialect.doublequote().to_string(),
        char_or_none(dialect.escapechar()),
        dialect.skipinitialspace().to_string(),
        format!("{:?}", dialect.lineterminator()),
        metadata.has_header.to_string(),
        metadata.num_fields.to_string(),
        metadata.avg_record_len.to_string(),
    ])?;
    writer.into_inner().into_inner()?;
    Ok(())
}

fn char_or_none(c: Option<char>) -> String {
    c.map_or_else(|| "none".to_string(), |c| c.to_string())
}

fn json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn convert(args: &ConvertArgs) -> CliResult<()> {
    let bytes = fs::read(&args.input)?;
    let decoded = decode_text(&bytes);

    let mut ctx = CsvContext::new();
    if let Some(limit) = args.field_size_limit {
        ctx.set_field_size_limit(limit)?;
    }

    let input_base = if args.sniff {
        ctx.sniffer().sniff(&decoded.text, None)?
    } else {
        ctx.dialect(args.from.as_str())?.clone()
    };
    let input_dialect = with_params(&ctx, &input_base, &args.in_params)?;
    let output_dialect = with_params(&ctx, args.to.as_str(), &args.out_params)?;
    info!(input = %input_dialect, output = %output_dialect, "converting");

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = ctx.writer(IoSink::new(out), &output_dialect)?;

    let mut count = 0usize;
    for record in ctx.reader(text_lines(&decoded.text), &input_dialect)? {
        writer.write_record(record?)?;
        count += 1;
    }
    writer.into_inner().into_inner()?;

    debug!(records = count, "conversion finished");
    Ok(())
}

/// Derive a dialect from `base` with text parameter overrides.
fn with_params<'a>(
    ctx: &'a CsvContext,
    base: impl Into<DialectRef<'a>>,
    params: &[(String, String)],
) -> CliResult<Dialect> {
    let mut builder = ctx.registry().derive(base)?;
    builder.params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    Ok(builder.build()?)
}

fn list_dialects(verbose: bool) {
    let ctx = CsvContext::new();
    for name in ctx.registry().list() {
        match ctx.dialect(name) {
            Ok(dialect) if verbose => println!("{name}: {dialect}"),
            _ => println!("{name}"),
        }
    }
}
