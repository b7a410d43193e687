use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quotevox::{
    DEFAULT_VOICE, GenerateClient, QuoteCard, QuoteFinder, QuoteSource, RequestTracker,
    SpeechSynthesizer,
};

/// Quotevox - find a quotation matching your thought and hear it spoken
#[derive(Parser)]
#[command(name = "quotevox", version, about)]
struct Cli {
    /// Your thought or perspective, in free text
    thought: String,

    /// API key for the generative language API
    #[arg(long, env = "GEMINI_API_KEY")]
    api_key: String,

    /// Synthesize spoken audio of the quote and write it to a WAV file
    #[arg(short, long)]
    speak: bool,

    /// Prebuilt voice for speech synthesis
    #[arg(long, default_value = DEFAULT_VOICE)]
    voice: String,

    /// Output path for the synthesized WAV file
    #[arg(short, long, default_value = "quote.wav")]
    output: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,quotevox=info",
        1 => "info,quotevox=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.thought.trim().is_empty() {
        anyhow::bail!("enter a thought first");
    }

    let tracker = RequestTracker::new();
    let finder = QuoteFinder::new(GenerateClient::new(cli.api_key.clone())?);

    let token = tracker.begin();
    let card = match finder.find(&cli.thought).await {
        Ok(card) => card,
        Err(e) => {
            tracing::debug!(error = %e, "quote lookup failed");
            anyhow::bail!("could not find a quote - please try again");
        }
    };

    if !token.is_current() {
        tracing::debug!("discarding stale quote result");
        return Ok(());
    }

    render_quote(&card);

    if cli.speak {
        speak(&card, &cli, &tracker).await;
    }

    Ok(())
}

/// Synthesize the quote to a WAV file. Failures are logged, never fatal.
async fn speak(card: &QuoteCard, cli: &Cli, tracker: &RequestTracker) {
    let client = match GenerateClient::new(cli.api_key.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "speech synthesis unavailable");
            return;
        }
    };
    let synthesizer = SpeechSynthesizer::with_voice(client, cli.voice.clone());

    let token = tracker.begin();
    match synthesizer.synthesize(&card.quote).await {
        Ok(wav) if token.is_current() => {
            if let Err(e) = std::fs::write(&cli.output, &wav) {
                tracing::warn!(path = %cli.output.display(), error = %e, "failed to write WAV file");
            } else {
                println!("\nSpoken audio written to {}", cli.output.display());
            }
        }
        Ok(_) => tracing::debug!("discarding stale audio result"),
        Err(e) => tracing::warn!(error = %e, "speech synthesis failed"),
    }
}

fn render_quote(card: &QuoteCard) {
    println!("\n\"{}\"", card.quote);
    println!("\nSource: {}", card.source_description);

    match &card.source {
        QuoteSource::Person {
            nationality,
            field,
            lifespan,
        } => {
            println!("Person: {}", card.author);
            if let Some(lifespan) = lifespan {
                println!("Lifespan: {lifespan}");
            }
            if let Some(nationality) = nationality {
                println!("Nationality: {nationality}");
            }
            if let Some(field) = field {
                println!("Field: {field}");
            }
        }
        QuoteSource::Book { book_title } => {
            println!("Author: {}", card.author);
            println!("Book: {book_title}");
        }
    }
}
