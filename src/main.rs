use std::io::Write;

use anyhow::Context;
use clap::Parser;

use eksport2ynab::{convert_path, output, paths};

/// Convert a bank eksport.csv into a YNAB import file
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Path to the semicolon separated export
    #[arg(short, long, default_value = paths::DEFAULT_INPUT)]
    input: String,

    /// Where to write the YNAB csv, `{date}` becomes today as YYYYMMDD.
    /// Written to stdout when left out or `-`
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = paths::resolve_input(&args.input);
    let today = chrono::Local::now().date_naive();
    let destination = paths::resolve_output(args.output.as_deref(), today);

    let rows = convert_path(&input)
        .with_context(|| format!("failed to convert {}", input.display()))?;

    match destination {
        Some(path) => {
            output::write_to_path(&path, &rows)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Successfully converted {} into {}",
                input.display(),
                path.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            output::write_rows(&mut lock, &rows).context("failed to write to stdout")?;
            lock.flush().context("failed to flush stdout")?;
            eprintln!("Successfully converted {} into <stdout>", input.display());
        }
    }

    Ok(())
}
