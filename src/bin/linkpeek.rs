//! linkpeek: link preview CLI
//!
//! Resolve previews from the command line, run the extractor over a saved
//! page, or serve the resolver protocol over stdio.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use linkpeek::{Config, PreviewRequest, PreviewResponse, Resolver, ResolverBuilder};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

/// Link preview resolver
#[derive(Parser)]
#[command(name = "linkpeek")]
#[command(version)]
#[command(about = "Resolve hover previews for links")]
struct Args {
    /// Config file (default: ~/.linkpeek/config.toml, then /etc/linkpeek/config.toml)
    #[arg(short, long, env = "LINKPEEK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one or more URLs and print their preview records as JSON
    Resolve {
        /// URLs to resolve
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Extract metadata from a saved HTML document
    Extract {
        /// HTML file (or omit to read from stdin)
        file: Option<PathBuf>,
        /// Base URL for resolving relative image URLs
        #[arg(short, long, default_value = "")]
        base_url: String,
    },

    /// Answer fetchPreview requests, one JSON object per line on stdin/stdout
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    // Logs go to stderr so they never interleave with protocol output.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    // Extraction needs neither config nor network.
    if let Command::Extract { file, base_url } = &args.command {
        let html = read_document(file.as_ref())?;
        let metadata = linkpeek::extract::parse_metadata(&html, base_url);
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    let config = Config::load_or_default(args.config.as_deref())?;
    let resolver = ResolverBuilder::from_config(&config).build()?;

    match args.command {
        Command::Resolve { urls } => {
            let records = join_all(urls.iter().map(|url| resolver.classify_and_resolve(url))).await;
            for record in records {
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        }

        Command::Serve => serve(&resolver).await?,

        Command::Extract { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Serve the request/response protocol over stdio until stdin closes.
///
/// Requests are answered in order. A line that is not a valid request is
/// logged and skipped, since there is no URL to build a fallback for.
async fn serve(resolver: &Resolver) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: PreviewRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "skipping malformed request");
                continue;
            }
        };
        debug!(url = request.url(), "serving request");

        let response: PreviewResponse = resolver.handle(request).await;
        let mut payload = serde_json::to_vec(&response)?;
        payload.push(b'\n');
        stdout.write_all(&payload).await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Read the document from `file`, or from stdin when no file is given.
fn read_document(file: Option<&PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err("extract: no file given and nothing piped on stdin".into());
    }
    let mut html = String::new();
    stdin.lock().read_to_string(&mut html)?;
    Ok(html)
}
