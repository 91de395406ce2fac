use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::Path;

// Import from refdoc-core
use refdoc_core::{BatchRunner, DocumentLoader, FixupConfig};

// Import CLI utilities
use refdoc_fixup::{logging, report};

#[derive(Parser)]
#[command(name = "refdoc-fixup")]
#[command(about = "Removes bogus QML type info from generated JavaScript reference pages")]
struct Args {
    /// Output directory of the generated html files
    #[arg(required_unless_present = "print_default_config")]
    outputdir: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Report what would change without rewriting any file
    #[arg(long)]
    dry_run: bool,

    /// Write the run summary as JSON to this path
    #[arg(short, long)]
    report: Option<String>,

    /// Do not print progress dots while scanning
    #[arg(long)]
    no_progress: bool,

    /// Print the default config (YAML) and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    if args.print_default_config {
        print!("{}", FixupConfig::default().to_yaml()?);
        return Ok(());
    }

    let Some(outputdir) = args.outputdir.as_deref() else {
        anyhow::bail!("missing required argument <OUTPUTDIR>");
    };

    // Load config, then apply CLI overrides
    let mut config = match FixupConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    if let Some(config_path) = &args.config {
        tracing::debug!(config = %config_path, "loaded config");
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if args.no_progress {
        config.progress = false;
    }

    // Backend check comes before touching the directory
    let loader = match DocumentLoader::with_default_backend() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let runner = match BatchRunner::new(&config, loader) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!("📄 Processing: {outputdir}");
    if config.dry_run {
        println!("🔍 Dry run - no files will be written");
    }

    let summary = match runner.run(Path::new(outputdir)) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            std::process::exit(1);
        }
    };

    print!("{}", report::format_summary(&summary));
    let elapsed = Utc::now() - summary.started_at;
    println!("⏱️  Finished in {}ms", elapsed.num_milliseconds());

    if let Some(report_path) = &args.report {
        report::save_report(&summary, report_path)?;
        println!("💾 Report saved to: {report_path}");
    }

    Ok(())
}
