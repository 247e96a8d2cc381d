//! site-chat: terminal front end for the site chat widget.
//! Asks the question given as an argument, or each line read from stdin, and
//! prints the bot reply followed by the source line.

use clap::Parser;
use site_chat_client::config::{self, Config};
use site_chat_client::{ChatWidget, HttpTransport};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_PAGE_CONTEXT: &str = "about:blank";

#[derive(Debug, Parser)]
#[command(name = "site-chat", about = "Ask the site chat endpoint from a terminal")]
struct Cli {
    /// Config file (defaults to ~/.site-chat/config.yaml when present).
    #[arg(long, env = "SITE_CHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Answer endpoint URL.
    #[arg(long, env = "SITE_CHAT_API")]
    endpoint: Option<String>,

    /// Page URL sent as `page_context`.
    #[arg(long)]
    page_context: Option<String>,

    /// Check the answer service's /healthz and exit.
    #[arg(long)]
    health: bool,

    /// Write the resolved endpoint and page context to the config file and exit.
    #[arg(long)]
    save_config: bool,

    /// Question to ask once; without it, questions are read from stdin.
    question: Option<String>,
}

/// Load the config file. A missing explicit file is only acceptable when it is
/// about to be written.
fn load_config(path: Option<&PathBuf>, allow_missing: bool) -> Config {
    if let Some(path) = path {
        if allow_missing && !path.exists() {
            return Config::default();
        }
        return config::load(path).unwrap_or_else(|e| {
            eprintln!("Error: failed to load config from {}: {}", path.display(), e);
            process::exit(1);
        });
    }
    match config::default_config_path() {
        Some(path) if path.exists() => config::load(&path).unwrap_or_else(|e| {
            eprintln!("Error: failed to load config from {}: {}", path.display(), e);
            process::exit(1);
        }),
        _ => Config::default(),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

/// Print everything the widget appended after `from`, except the echoed
/// question, then the source line.
fn print_reply(out: &mut impl Write, widget: &ChatWidget, from: usize) -> io::Result<()> {
    for msg in widget.transcript().iter().skip(from + 1) {
        writeln!(out, "{}", msg.text)?;
    }
    if !widget.sources_line().is_empty() {
        writeln!(out, "{}", widget.sources_line())?;
    }
    out.flush()
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_ref(), cli.save_config);

    let endpoint = config::resolve_endpoint(cli.endpoint.as_deref(), cfg.api.endpoint.as_deref());
    let page_context = cli
        .page_context
        .or_else(|| cfg.widget.page_context.clone())
        .unwrap_or_else(|| DEFAULT_PAGE_CONTEXT.to_string());

    let transport = HttpTransport::new(&endpoint).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if cli.save_config {
        let path = cli
            .config
            .clone()
            .or_else(config::default_config_path)
            .unwrap_or_else(|| {
                eprintln!("Error: unable to determine config path (set --config or SITE_CHAT_CONFIG)");
                process::exit(1);
            });
        let mut saved = cfg;
        saved.api.endpoint = Some(endpoint.clone());
        saved.widget.page_context = Some(page_context.clone());
        if let Err(e) = config::save(&path, &saved) {
            eprintln!("Error: failed to save config to {}: {}", path.display(), e);
            process::exit(1);
        }
        println!("saved {}", path.display());
        return;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    if cli.health {
        match rt.block_on(transport.health()) {
            Ok(status) if status.ok => println!("ok ({} docs)", status.docs),
            Ok(_) => {
                eprintln!("Error: service at {} reports not ok", endpoint);
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: health check failed: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let mut widget = ChatWidget::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let questions: Box<dyn Iterator<Item = io::Result<String>>> = match cli.question {
        Some(q) => Box::new(std::iter::once(Ok(q))),
        None => Box::new(io::stdin().lock().lines()),
    };

    rt.block_on(async {
        for line in questions {
            let question = line.unwrap_or_else(|e| {
                eprintln!("Error: failed to read question from stdin: {}", e);
                process::exit(1);
            });
            let before = widget.transcript().len();
            widget.set_input(question);
            if !widget.submit(&transport, &page_context).await {
                continue;
            }
            if let Err(e) = print_reply(&mut out, &widget, before) {
                eprintln!("Error: failed to write reply: {}", e);
                process::exit(1);
            }
        }
    });
}
