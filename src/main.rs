use anyhow::{Context, Result};
use clap::Parser;
use cnweather::config::LoggingConfig;
use cnweather::{
    chart, CnWeatherConfig, ForecastNormalizer, RegionPicker, RegionSelection, RegionTree,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 15-day weather forecast for Chinese regions
#[derive(Parser)]
#[command(name = "cnweather", author, version, about, long_about = None)]
struct Cli {
    /// Region code; skips the interactive picker
    #[arg(short, long)]
    code: Option<String>,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the records as JSON instead of a chart
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("cnweather={level}").into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn resolve_region(cli: &Cli, config: &CnWeatherConfig) -> Result<RegionSelection> {
    if let Some(code) = &cli.code {
        // a name is nice to have for the chart title, but not required
        let named = RegionTree::load(&config.region.data_path)
            .ok()
            .and_then(|tree| tree.find_by_code(code));
        return Ok(named.unwrap_or_else(|| RegionSelection::from_code(code.as_str())));
    }

    let tree = RegionTree::load(&config.region.data_path).with_context(|| {
        format!("Failed to load region data from {}", config.region.data_path)
    })?;

    let picker = RegionPicker::new(&tree, &config.region);
    let stdin = io::stdin();
    let selection = picker
        .select(&mut stdin.lock(), &mut io::stdout())
        .context("Region selection failed")?;
    Ok(selection)
}

fn run(cli: &Cli, config: &CnWeatherConfig) -> Result<ExitCode> {
    let region = resolve_region(cli, config)?;
    debug!("Using region {} ({})", region.breadcrumb(), region.code);

    let normalizer = ForecastNormalizer::from_config(&config.source)?;
    let records = match normalizer.fetch(&region.code) {
        Ok(records) => records,
        Err(e) => {
            error!("Forecast fetch failed: {}", e);
            println!("获取天气数据失败");
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.json {
        println!("{}", chart::render_json(&records)?);
    } else {
        println!("\n正在生成天气数据图表...\n");
        print!("{}", chart::render(&records, Some(region.name.as_str()), &config.chart));
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = CnWeatherConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    init_tracing(&config.logging, cli.verbose);

    if !cli.json {
        println!("欢迎使用天气工具！");
    }
    run(&cli, &config)
}
