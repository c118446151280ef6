use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use clap::{Parser, Subcommand};
use mailsift_lib::{
    ListAggregator, ListOrder, ParserConfig, ValidationConfig, count_email_domains, parse_with,
};

use std::io::{self, BufRead};

#[derive(Parser)]
#[command(name = "mailsift-cli")]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Commands>,

    /// validation rules: generic|strict
    #[arg(long, default_value = "generic")]
    validation: String,

    /// list order: alphabetical|domain|occurrences
    #[arg(long, default_value = "alphabetical")]
    order: String,

    /// cap ranked results (only applies with --order occurrences)
    #[arg(long)]
    max_results: Option<usize>,

    /// lower-case local parts when canonicalizing
    #[arg(long)]
    ignore_case: bool,

    /// keep comment text in canonical output
    #[arg(long)]
    include_comments: bool,

    /// drop sub-addresses ("+tag") from canonical output
    #[arg(long)]
    strip_sub_addresses: bool,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    format: String,

    /// write output to file instead of stdout
    #[arg(long)]
    out: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single address and print the verdict
    Check { address: String },
    /// Read addresses from stdin (one per line) and print the valid ones
    Validate,
    /// Read addresses from stdin and print unique canonical addresses
    Dedupe,
    /// Read addresses from stdin and print per-domain statistics
    Domains,
    /// Read addresses from stdin and print per-address statistics
    Addresses,
    /// Read addresses from stdin and print the regex-based top-10 domains
    Quickcount,
}

fn validation_from_str(s: &str) -> Result<ValidationConfig> {
    match s {
        "generic" => Ok(ValidationConfig::generic()),
        "strict" => Ok(ValidationConfig::strict()),
        other => bail!("unknown --validation '{other}', use: generic|strict"),
    }
}

fn order_from_str(s: &str) -> Result<ListOrder> {
    match s {
        "alphabetical" => Ok(ListOrder::Alphabetical),
        "domain" => Ok(ListOrder::DomainAlphabetical),
        "occurrences" => Ok(ListOrder::Occurrences),
        other => bail!("unknown --order '{other}', use: alphabetical|domain|occurrences"),
    }
}

fn read_stdin() -> Result<Vec<String>> {
    let mut addresses = Vec::new();
    for line in io::stdin().lock().lines() {
        addresses.push(line.context("read stdin")?);
    }
    Ok(addresses)
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let validation = validation_from_str(&cli.validation)?;
    let order = order_from_str(&cli.order)?;

    let mut parser_builder = ParserConfig::builder()
        .case_sensitive(!cli.ignore_case)
        .include_comments(cli.include_comments)
        .include_sub_addresses(!cli.strip_sub_addresses)
        .list_order(order);
    if let Some(max_results) = cli.max_results {
        parser_builder = parser_builder.max_results(max_results);
    }
    let parser = parser_builder.build();

    let Some(cmd) = cli.cmd.take() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match cmd {
        Commands::Check { address } => {
            let parsed = parse_with(&address, &validation, &parser);
            match cli.format.as_str() {
                "human" => {
                    if let Some(reason) = parsed.invalid_reason() {
                        println!("[INVALID] {address} :: {reason}");
                    } else {
                        println!(
                            "[OK]    {address} -> {}",
                            parsed.canonical_address().unwrap_or_default()
                        );
                    }
                }
                "json" => emit_serialized(&parsed, &cli)?,
                "ndjson" => emit_ndjson(std::slice::from_ref(&parsed), &cli)?,
                other => bail!("unknown --format '{other}' for check, use: human|json|ndjson"),
            }
            if !parsed.is_valid() {
                std::process::exit(2);
            }
        }
        Commands::Validate => {
            let addresses = read_stdin()?;
            let aggregator = ListAggregator::new(validation, parser);
            let rows = aggregator.validate(&addresses);
            let dropped = addresses.len() - rows.len();
            emit_lines(rows, &cli)?;
            if dropped > 0 {
                std::process::exit(2);
            }
        }
        Commands::Dedupe => {
            let addresses = read_stdin()?;
            let aggregator = ListAggregator::new(validation, parser);
            emit_lines(aggregator.deduplicate(&addresses), &cli)?;
        }
        Commands::Domains => {
            let addresses = read_stdin()?;
            let aggregator = ListAggregator::new(validation, parser);
            let rows = aggregator.analyze_domains(&addresses);
            match cli.format.as_str() {
                "human" => {
                    let lines = rows
                        .iter()
                        .map(|d| format!("{} {}", d.domain(), d.total_address_count()))
                        .collect();
                    emit_lines(lines, &cli)?;
                }
                "csv" => {
                    let records = rows
                        .iter()
                        .map(|d| {
                            vec![
                                d.domain().to_string(),
                                d.total_address_count().to_string(),
                                d.unique_address_count().to_string(),
                                d.unique_sub_address_count().to_string(),
                            ]
                        })
                        .collect();
                    emit_csv(records, &cli)?;
                }
                "json" => emit_serialized(&rows, &cli)?,
                "ndjson" => emit_ndjson(&rows, &cli)?,
                other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
            }
        }
        Commands::Addresses => {
            let addresses = read_stdin()?;
            let aggregator = ListAggregator::new(validation, parser);
            let rows = aggregator.analyze_addresses(&addresses);
            match cli.format.as_str() {
                "human" => {
                    let lines = rows
                        .iter()
                        .map(|a| format!("{} {}", a.canonical_address(), a.total_count()))
                        .collect();
                    emit_lines(lines, &cli)?;
                }
                "csv" => {
                    let records = rows
                        .iter()
                        .map(|a| {
                            vec![
                                a.canonical_address().to_string(),
                                a.domain().to_string(),
                                a.total_count().to_string(),
                                a.unique_variation_count().to_string(),
                                a.unique_sub_address_count().to_string(),
                            ]
                        })
                        .collect();
                    emit_csv(records, &cli)?;
                }
                "json" => emit_serialized(&rows, &cli)?,
                "ndjson" => emit_ndjson(&rows, &cli)?,
                other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
            }
        }
        Commands::Quickcount => {
            let addresses = read_stdin()?;
            emit_lines(count_email_domains(&addresses), &cli)?;
        }
    }
    Ok(())
}

/// Plain line-per-entry output; `--format csv` writes one column.
fn emit_lines(lines: Vec<String>, cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => {
            if let Some(path) = &cli.out {
                let mut body = lines.join("\n");
                body.push('\n');
                write_all_atomically(path, body.as_bytes())?;
            } else {
                for line in &lines {
                    println!("{line}");
                }
            }
            Ok(())
        }
        "json" => emit_serialized(&lines, cli),
        "ndjson" => emit_ndjson(&lines, cli),
        "csv" => emit_csv(lines.into_iter().map(|l| vec![l]).collect(), cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

#[cfg(feature = "with-serde")]
fn emit_serialized<T: serde::Serialize>(value: &T, cli: &Cli) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, body.as_bytes())?;
    } else {
        println!("{body}");
    }
    Ok(())
}

#[cfg(feature = "with-serde")]
fn emit_ndjson<T: serde::Serialize>(rows: &[T], cli: &Cli) -> Result<()> {
    let mut body = String::new();
    for row in rows {
        body.push_str(&serde_json::to_string(row)?);
        body.push('\n');
    }
    if let Some(path) = &cli.out {
        write_all_atomically(path, body.as_bytes())?;
    } else {
        print!("{body}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn emit_serialized<T>(_value: &T, _cli: &Cli) -> Result<()> {
    eprintln!("--format json/ndjson requires the 'with-serde' feature");
    std::process::exit(1);
}

#[cfg(not(feature = "with-serde"))]
fn emit_ndjson<T>(_rows: &[T], _cli: &Cli) -> Result<()> {
    eprintln!("--format json/ndjson requires the 'with-serde' feature");
    std::process::exit(1);
}

#[cfg(feature = "with-csv")]
fn emit_csv(records: Vec<Vec<String>>, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &records {
            writer.write_record(record)?;
        }
        let data = writer.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut writer = csv::Writer::from_writer(std::io::stdout());
        for record in &records {
            writer.write_record(record)?;
        }
        writer.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn emit_csv(_records: Vec<Vec<String>>, _cli: &Cli) -> Result<()> {
    eprintln!("--format csv requires the 'with-csv' feature");
    std::process::exit(1);
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let tmp = format!("{}.tmp", path);
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
