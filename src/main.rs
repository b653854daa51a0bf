use anyhow::{Context, Result};
use clap::Parser;
use impala2trino::rules::rule_table;
use impala2trino::{ArgumentCapture, ConversionConfig, ConversionOutput, SqlConverter};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "impala2trino", version, about = "Convert Impala SQL to Trino SQL")]
struct Cli {
    /// Input SQL file (reads stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// Write the converted SQL here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trace every rule as it is applied
    #[arg(long)]
    debug: bool,

    /// Capture arguments with a parenthesis-aware scanner
    #[arg(long)]
    balanced_args: bool,

    /// Print the rule table and exit
    #[arg(long)]
    list_rules: bool,

    /// Print conversion statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Emit sql, warnings and stats as JSON (needs the json_output feature)
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.debug { "info" } else { "warn" }),
    )
    .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.list_rules {
        for rule in rule_table() {
            println!("{:<20} {}", rule.name, rule.description);
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => ConversionConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConversionConfig::default(),
    };
    if cli.debug {
        config.debug = true;
    }
    if cli.balanced_args {
        config.argument_capture = ArgumentCapture::Balanced;
    }

    let sql = read_input(cli.input.as_deref())?;
    let converter = SqlConverter::new(config);

    let output = match converter.convert(&sql) {
        Ok(output) => output,
        Err(e) => {
            print_warnings(e.warnings());
            return Err(e).context("Conversion failed");
        }
    };

    if cli.json {
        return write_output(cli.output.as_deref(), &render_json(&output)?);
    }

    print_warnings(&output.warnings);
    if cli.stats {
        print_stats(&output);
    }

    write_output(cli.output.as_deref(), &output.sql)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut sql = String::new();
            io::stdin()
                .read_to_string(&mut sql)
                .context("Failed to read stdin")?;
            Ok(sql)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("Warnings ({}):", warnings.len());
    for warning in warnings {
        eprintln!("  - {}", warning);
    }
}

fn print_stats(output: &ConversionOutput) {
    let stats = &output.stats;
    eprintln!("Conversion statistics:");
    eprintln!("  Total conversions: {}", stats.total_conversions);
    for (rule, count) in &stats.functions_converted {
        eprintln!("    {:<20} {}", rule, count);
    }
    eprintln!("  Errors: {}", stats.errors);
}

#[cfg(feature = "json_output")]
fn render_json(output: &ConversionOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

#[cfg(not(feature = "json_output"))]
fn render_json(_output: &ConversionOutput) -> Result<String> {
    anyhow::bail!("--json requires building with the json_output feature")
}
