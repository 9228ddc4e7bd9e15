use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use name_linker::cli::{Cli, Command};
use name_linker::config::AppConfig;
use name_linker::db::{MySqlSink, load_names, make_pool};
use name_linker::export::{export_approximate_csv, export_exact_csv, export_summary_csv};
use name_linker::logging::init_logging;
use name_linker::matching::generate_variants;
use name_linker::orchestrator::{PipelineConfig, run_pipeline};
use name_linker::sink::MemorySink;
use name_linker::util::envfile::{load_dotenv_if_present, write_env_template};

fn main() {
    // Before any thread exists: .env is applied with set_var
    if let Err(e) = load_dotenv_if_present() {
        eprintln!("Warning: failed to read .env: {:#}", e);
    }
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::EnvTemplate { path } => {
            write_env_template(&path)?;
            println!("Wrote {}. Copy to .env and edit values as needed.", path);
            Ok(())
        }
        Command::Variants { names } => print_variants(&names),
        Command::Link(args) => {
            let cfg = args.to_app_config()?;
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            rt.block_on(link(cfg))
        }
    }
}

fn print_variants(names: &[String]) -> Result<()> {
    for name in names {
        let variants =
            generate_variants(name).with_context(|| format!("Cannot expand {:?}", name))?;
        println!("{}", name);
        for v in variants {
            println!("  {}", v);
        }
    }
    Ok(())
}

async fn link(cfg: AppConfig) -> Result<()> {
    info!("Connecting to {:?}", cfg.database);
    let pool = make_pool(&cfg.database).await?;

    let src = &cfg.sources;
    let source = load_names(&pool, &src.source_table, &src.source_column, true).await?;
    let reference = load_names(&pool, &src.reference_table, &src.reference_column, false).await?;
    info!(
        "Loaded {} source names ({}.{}) and {} reference names ({}.{})",
        source.len(),
        src.source_table,
        src.source_column,
        reference.len(),
        src.reference_table,
        src.reference_column
    );

    let pipeline = PipelineConfig::from(&cfg.matching);
    let scorer = cfg.matching.scorer;
    let (set, mut summary) = if cfg.sink.dry_run {
        info!("Dry run: matches are kept in memory");
        let mut sink = MemorySink::new();
        run_pipeline(source, reference, &scorer, &mut sink, &pipeline).await?
    } else {
        let mut sink = MySqlSink::open(
            pool.clone(),
            &cfg.sink.exact_table,
            &cfg.sink.approximate_table,
        )
        .await?;
        run_pipeline(source, reference, &scorer, &mut sink, &pipeline).await?
    };
    summary.scorer = scorer.to_string();
    summary.log();

    if let Some(prefix) = cfg.export.out_path.as_deref() {
        let exact_path = format!("{}_exact.csv", prefix);
        let approx_path = format!("{}_approx.csv", prefix);
        export_exact_csv(&exact_path, &set.exact)?;
        export_approximate_csv(&approx_path, &set.approximate)?;
        info!("Wrote {} and {}", exact_path, approx_path);
    }
    if let Some(path) = cfg.export.summary_path.as_deref() {
        export_summary_csv(path, &summary)?;
        info!("Wrote summary {}", path);
    }

    pool.close().await;
    Ok(())
}
