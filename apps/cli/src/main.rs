use annuaire_cli::cli::CliArgs;
use annuaire_cli::config::init_app_config;
use annuaire_cli::fetcher::NativeFetcher;
use annuaire_cli::headless;
use clap::Parser;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let settings = init_app_config()?;
    init_logging(settings.debug);

    let fetcher = NativeFetcher::new(settings.base_dir.clone())?;
    headless::run(&args, &settings, &fetcher).await
}

// RUST_LOG wins over --debug / DEBUG when set
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
