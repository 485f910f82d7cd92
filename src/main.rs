use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use heatfig::figures::{self, FigureEntry};
use heatfig::FigureSpec;

/// Render the heat vulnerability report figures as PNG files
#[derive(Parser, Debug)]
#[command(name = "heatfig", version, about)]
struct Cli {
    /// Directory the PNG files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Render only the named figure (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    /// Figures rendered concurrently
    #[arg(long, default_value_t = num_cpus::get())]
    jobs: usize,

    /// Print each figure's display list as JSON instead of writing PNGs
    #[arg(long)]
    display_list: bool,

    /// List the available figures and exit
    #[arg(long)]
    list: bool,
}

fn selected(cli: &Cli) -> anyhow::Result<Vec<FigureEntry>> {
    let catalog = figures::catalog();
    for name in &cli.only {
        if !catalog.iter().any(|e| e.name == name) {
            bail!("unknown figure '{}' (try --list)", name);
        }
    }
    Ok(catalog
        .into_iter()
        .filter(|e| cli.only.is_empty() || cli.only.iter().any(|n| n == e.name))
        .collect())
}

/// Print one JSON document per figure. A figure that fails is reported and skipped.
fn print_display_lists(figures: &[FigureSpec]) -> anyhow::Result<bool> {
    let mut ok = true;
    for fig in figures {
        match heatfig::display_list(fig) {
            Ok(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
            Err(err) => {
                eprintln!("Error: {}", err);
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let entries = selected(&cli)?;

    if cli.list {
        for e in &entries {
            println!("{:<12} {}", e.name, e.file_name);
        }
        return Ok(true);
    }

    // A figure whose data fails to build is reported and skipped.
    let mut ok = true;
    let mut specs = Vec::with_capacity(entries.len());
    for e in &entries {
        match (e.build)() {
            Ok(spec) => specs.push(spec),
            Err(err) => {
                eprintln!("Error: {}", err.in_figure(e.name));
                ok = false;
            }
        }
    }

    if cli.display_list {
        let printed = print_display_lists(&specs)?;
        return Ok(ok && printed);
    }

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating output directory {}", cli.out_dir.display()))?;

    for (spec, result) in specs.iter().zip(heatfig::render_all(&specs, &cli.out_dir, cli.jobs)) {
        match result {
            Ok(rendered) => {
                log::debug!("{} digest {}", spec.file_name, rendered.digest());
                println!("[Saved: {}]", spec.file_name);
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                ok = false;
            }
        }
    }
    println!("DONE.");
    Ok(ok)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
