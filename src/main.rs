use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trend_suggest::artifacts::{pointer_exists, ArtifactPointer, ModelArtifactSet};
use trend_suggest::bootstrap::{launch, HealthProbe};
use trend_suggest::config::{default_config_path, ServiceConfig};
use trend_suggest::preprocessing::{fit_from_csv, DEFAULT_MAX_FEATURES};
use trend_suggest::service::TrendService;
use trend_suggest::{format_float, server, Candidate};

#[derive(Parser)]
#[command(name = "trend-suggest", about = "Trending content suggestion service")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API.
    Serve(ServeArgs),
    /// Print ranked suggestions.
    Suggest(SuggestArgs),
    /// Score a single combination.
    Score(ScoreArgs),
    /// Write a basic artifact set if none exists.
    InitModel(InitModelArgs),
    /// Fit preprocessing artifacts and a prior classifier on a CSV dataset.
    FitPreprocessing(FitPreprocessingArgs),
    /// Write the effective configuration to a TOML file.
    InitConfig(InitConfigArgs),
    /// Poll the health endpoint until the service is ready.
    Wait(WaitArgs),
    /// Start the server in a child process and wait for it to be healthy.
    Launch(WaitArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct SuggestArgs {
    #[arg(long, allow_negative_numbers = true)]
    count: Option<i64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[arg(long)]
    hashtag: String,
    #[arg(long)]
    content_type: String,
    #[arg(long)]
    platform: String,
    #[arg(long)]
    region: String,
}

#[derive(Args, Debug, Clone)]
struct InitModelArgs {
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug, Clone)]
struct FitPreprocessingArgs {
    #[arg(long)]
    data: PathBuf,
    #[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
    max_features: usize,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    /// Destination; defaults to `--config` or `config/service.toml`.
    #[arg(long)]
    path: Option<PathBuf>,
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug, Clone)]
struct WaitArgs {
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    attempts: Option<u32>,
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (mut config, config_path) = ServiceConfig::load(cli.config.clone())?;
    if let Some(path) = config_path.as_ref().filter(|path| path.exists()) {
        info!(config = %path.display(), "loaded configuration");
    }

    let command = cli.command.unwrap_or(Command::Serve(ServeArgs::default()));
    match command {
        Command::Serve(args) => {
            apply_serve_args(&mut config, args);
            let service = TrendService::from_config(&config)?;
            server::serve(&config, service).await
        }
        Command::Suggest(args) => run_suggest(&config, args),
        Command::Score(args) => run_score(&config, args),
        Command::InitModel(args) => run_init_model(&config.model.dir, args),
        Command::FitPreprocessing(args) => run_fit_preprocessing(&config.model.dir, args),
        Command::InitConfig(args) => run_init_config(&config, args, config_path),
        Command::Wait(args) => {
            apply_wait_args(&mut config, args);
            let probe = HealthProbe::from_config(&config.bootstrap)?;
            let health = probe.wait().await?;
            println!(
                "Service healthy (model loaded: {})",
                health.model_loaded
            );
            Ok(())
        }
        Command::Launch(args) => {
            apply_wait_args(&mut config, args);
            run_launch(&config, cli.config).await
        }
    }
}

fn run_suggest(config: &ServiceConfig, args: SuggestArgs) -> Result<(), String> {
    let count = match args.count {
        Some(count) => config.suggestions.check_count(count)?,
        None => config.suggestions.default_count,
    };
    let service = TrendService::from_config(config)?;
    let suggestions = service.generate(count);

    if args.json {
        let payload = serde_json::to_string_pretty(&suggestions)
            .map_err(|err| format!("failed to serialize suggestions: {}", err))?;
        println!("{}", payload);
        return Ok(());
    }

    for suggestion in suggestions {
        println!(
            "{:>3}. {} [{} | {}] {}% ({})",
            suggestion.id,
            suggestion.title,
            suggestion.platform,
            suggestion.region,
            format_float(suggestion.trending_score, 1),
            suggestion.engagement_level.label()
        );
        println!("     {}", suggestion.description);
    }
    Ok(())
}

fn run_score(config: &ServiceConfig, args: ScoreArgs) -> Result<(), String> {
    let service = TrendService::from_config(config)?;
    let candidate = Candidate::new(args.hashtag, args.content_type, args.platform, args.region);
    let report = service.score(&candidate);

    println!(
        "Trending score: {}% ({})",
        format_float(report.trending_score, 1),
        report.engagement_level.label()
    );
    println!("Recommendation: {}", report.recommendation.label());
    let outcome = serde_json::to_string(&report.prediction.outcome)
        .map_err(|err| format!("failed to serialize outcome: {}", err))?;
    println!("Source: {}", outcome);
    Ok(())
}

fn run_init_model(model_dir: &Path, args: InitModelArgs) -> Result<(), String> {
    if pointer_exists(model_dir) && !args.force {
        println!(
            "Model pointer already present in {}; pass --force to replace it",
            model_dir.display()
        );
        return Ok(());
    }

    let pointer = ArtifactPointer::timestamped(&artifact_stamp());
    ModelArtifactSet::basic()
        .save(model_dir, &pointer)
        .map_err(|err| err.to_string())?;
    info!(model_dir = %model_dir.display(), version = %pointer.fingerprint(), "wrote basic artifact set");
    println!("Wrote basic model {} to {}", pointer.classifier, model_dir.display());
    Ok(())
}

fn run_fit_preprocessing(model_dir: &Path, args: FitPreprocessingArgs) -> Result<(), String> {
    if args.max_features == 0 {
        return Err("max-features must be at least 1".to_string());
    }
    let set = fit_from_csv(&args.data, args.max_features).map_err(|err| err.to_string())?;
    let pointer = ArtifactPointer::timestamped(&artifact_stamp());
    set.save(model_dir, &pointer).map_err(|err| err.to_string())?;
    info!(model_dir = %model_dir.display(), version = %pointer.fingerprint(), "wrote fitted artifact set");
    println!(
        "Fitted {} vocabulary terms and {} platforms from {}; wrote {} to {}",
        set.vectorizer.width(),
        set.label_encoder.classes.len(),
        args.data.display(),
        pointer.classifier,
        model_dir.display()
    );
    Ok(())
}

fn run_init_config(
    config: &ServiceConfig,
    args: InitConfigArgs,
    config_path: Option<PathBuf>,
) -> Result<(), String> {
    let path = args
        .path
        .or(config_path)
        .or_else(default_config_path)
        .ok_or_else(|| "no config path given".to_string())?;
    if path.exists() && !args.force {
        println!(
            "Config already present at {}; pass --force to overwrite it",
            path.display()
        );
        return Ok(());
    }
    config.write(&path)?;
    println!("Wrote config to {}", path.display());
    Ok(())
}

fn artifact_stamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

async fn run_launch(config: &ServiceConfig, config_path: Option<PathBuf>) -> Result<(), String> {
    let program = std::env::current_exe()
        .map_err(|err| format!("failed to locate executable: {}", err))?;
    let mut serve_args = Vec::new();
    if let Some(path) = config_path {
        serve_args.push("--config".to_string());
        serve_args.push(path.display().to_string());
    }

    let probe = HealthProbe::from_config(&config.bootstrap)?;
    let mut child = launch(program, serve_args, &probe).await?;
    println!("Trend suggestion service is ready");

    let status = child
        .wait()
        .await
        .map_err(|err| format!("failed waiting for server: {}", err))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("server exited with {}", status))
    }
}

fn apply_serve_args(config: &mut ServiceConfig, args: ServeArgs) {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.model_dir {
        config.model.dir = dir;
    }
}

fn apply_wait_args(config: &mut ServiceConfig, args: WaitArgs) {
    if let Some(url) = args.url {
        config.bootstrap.health_url = url;
    }
    if let Some(attempts) = args.attempts {
        config.bootstrap.attempts = attempts;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.bootstrap.interval_ms = interval_ms;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
