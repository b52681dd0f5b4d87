//! Line-oriented front end: one utterance per line on stdin.
//!
//! Usage: `cargo run --bin voicebot -- --responses my-responses.json`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voicebot::command::{is_help_request, is_quit_command};
use voicebot::config::VOICEBOT_CONFIG_FILENAME;
use voicebot::{load_or_default, Core, CoreResponse};

/// Voice command router with a conversational fallback.
#[derive(Parser)]
#[command(name = "voicebot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = VOICEBOT_CONFIG_FILENAME)]
    config: PathBuf,

    /// Intent catalog replacing the built-in one
    #[arg(long)]
    intents: Option<PathBuf>,

    /// Conversation catalog
    #[arg(long)]
    responses: Option<PathBuf>,

    /// Seed for reply selection
    #[arg(long)]
    seed: Option<u64>,

    /// Handle a single utterance and exit
    #[arg(long)]
    once: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicebot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = load_or_default(&cli.config);
    if let Some(path) = cli.intents {
        config.router.intents_path = Some(path);
    }
    if let Some(path) = cli.responses {
        config.conversation.responses_path = Some(path);
    }
    if cli.seed.is_some() {
        config.conversation.seed = cli.seed;
    }

    let core = match Core::from_config(&config) {
        Ok(core) => core,
        Err(error) => {
            eprintln!("voicebot: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(text) = cli.once {
        println!("{}", render(&core.handle(&text).await));
        return ExitCode::SUCCESS;
    }

    match run_session(&core).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("voicebot: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run_session(core: &Core) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"Voicebot ready. Type 'help' for commands or 'quit' to leave.\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        if text.eq_ignore_ascii_case("reload") {
            let summary = core.reload();
            let message = format!(
                "Reloaded {} intents and {} conversation buckets\n",
                summary.intents, summary.buckets
            );
            stdout.write_all(message.as_bytes()).await?;
            continue;
        }

        // Intents take precedence, so "quit safari" closes an app.
        let routed = core.router().matching_intent(text).is_some();
        if !routed && is_quit_command(text) {
            stdout.write_all(b"Goodbye!\n").await?;
            break;
        }
        if !routed && is_help_request(text) {
            stdout.write_all(core.help().as_bytes()).await?;
            continue;
        }

        let reply = format!("{}\n", render(&core.handle(text).await));
        stdout.write_all(reply.as_bytes()).await?;
    }
    stdout.flush().await
}

fn render(response: &CoreResponse) -> String {
    match response {
        CoreResponse::Conversation(scored) => {
            format!("{} (confidence {:.2})", scored.reply, scored.confidence)
        }
        other => other.reply().to_string(),
    }
}
