use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use stylecam::credential::CredentialProvider;
use stylecam::{
    http, AppState, Collaborators, Config, HttpCredentialProvider, LoopbackSink, Presentation,
    SessionBootstrapper, SyntheticCamera,
};
use tokio::io::BufReader;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "stylecam", version, about = "Real-time camera style transfer")]
struct Cli {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/stylecam")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the API key endpoint
    Serve,
    /// Run a session; each stdin line applies a new style prompt
    Run {
        /// Override the prompt applied when the session goes live
        #[arg(long)]
        prompt: Option<String>,
        /// Also serve the API key endpoint from this process
        #[arg(long)]
        serve: bool,
    },
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Stylecam v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    match cli.command {
        Command::Serve => {
            info!("Serving API key from ${}", cfg.credential.api_key_env);
            http::serve(&cfg.http_addr(), AppState::new(cfg.secret_source()), shutdown_signal()).await
        }
        Command::Run { prompt, serve } => run(cfg, prompt, serve).await,
    }
}

async fn run(cfg: Config, prompt: Option<String>, serve: bool) -> Result<()> {
    let mut session_config = cfg.session_config()?;
    if let Some(prompt) = prompt {
        session_config.initial_prompt = prompt;
    }

    if serve {
        let addr = cfg.http_addr();
        let state = AppState::new(cfg.secret_source());
        tokio::spawn(async move {
            if let Err(e) = http::serve(&addr, state, std::future::pending()).await {
                error!("API key endpoint stopped: {:#}", e);
            }
        });
    }

    let credentials: Arc<dyn CredentialProvider> = match &cfg.credential.endpoint {
        Some(url) => Arc::new(HttpCredentialProvider::new(url.clone())),
        None => Arc::new(cfg.secret_source()),
    };

    let collaborators = Collaborators {
        credentials,
        camera: Arc::new(SyntheticCamera::new(cfg.capture.clone())),
        sink: Arc::new(LoopbackSink::default()),
    };

    let mut presentation = Presentation::new(session_config.initial_prompt.clone());
    let session = SessionBootstrapper::start(collaborators, session_config);

    info!("Type a style prompt and press Enter to apply it; Ctrl-C to quit");

    let stdin = BufReader::new(tokio::io::stdin());
    let result = presentation.run(&session, stdin, shutdown_signal()).await;

    session.teardown();
    info!(
        "Rendered {} camera frames, {} edited frames",
        presentation.input.frames_rendered(),
        presentation.output.frames_rendered()
    );

    result
}
