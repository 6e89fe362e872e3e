use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vocabdrill::app::App;
use vocabdrill::config::Config;
use vocabdrill::corpus::TopicScope;
use vocabdrill::session::QuizMode;
use vocabdrill::store::MasteryStatus;
use vocabdrill::ui;

#[derive(Parser)]
#[command(
    name = "vocabdrill",
    version,
    about = "Spanish vocabulary drills: study, test and dictation"
)]
struct Cli {
    #[arg(long, global = true, help = "Vocabulary JSON file (defaults to the built-in set)")]
    corpus: Option<String>,

    #[arg(long, global = true, help = "Directory for saved mastery marks")]
    data_dir: Option<String>,

    #[arg(long, global = true, help = "Disable speech output")]
    mute: bool,

    #[arg(long, global = true, help = "Seed for reproducible shuffling")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List units and their topics
    Units,
    /// Show the words of a scope with their mastery marks
    Cards(ScopeArgs),
    /// Tag a word as green (known), yellow (shaky) or red (unknown)
    Mark {
        word_id: String,
        #[arg(value_enum)]
        status: MasteryStatus,
    },
    /// Clear every mastery mark in a scope
    Reset {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Run a quiz session
    Quiz {
        #[arg(value_enum)]
        mode: QuizMode,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Write a default config file if none exists and print its path
    Config,
}

#[derive(Args)]
struct ScopeArgs {
    #[arg(short, long, help = "Unit id")]
    unit: String,

    #[arg(short, long, default_value = "all", help = "Topic id, or `all`")]
    topic: String,
}

impl ScopeArgs {
    fn topic_scope(&self) -> TopicScope {
        TopicScope::parse(&self.topic)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vocabdrill=warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });

    if let Command::Config = cli.command {
        let path = Config::config_path();
        if path.exists() {
            println!("{}", path.display());
        } else {
            config.save()?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    if let Some(corpus) = cli.corpus {
        config.corpus_path = Some(corpus);
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.validate();

    let mut app = App::from_config(config, cli.mute, cli.seed)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Units => ui::render::units(&mut out, &app.vocab)?,
        Command::Cards(scope) => {
            let words = app.scope(&scope.unit, &scope.topic_scope())?;
            ui::render::cards(&mut out, &words, app.store.as_ref())?;
        }
        Command::Mark { word_id, status } => {
            app.mark(&word_id, status)?;
            writeln!(out, "{word_id} -> {status}")?;
        }
        Command::Reset { scope, yes } => {
            let words = app.scope(&scope.unit, &scope.topic_scope())?;
            let prompt = format!("Clear mastery marks for {} words? [y/N] ", words.len());
            if yes || confirm(&prompt, &mut io::stdin().lock(), &mut out)? {
                app.reset_scope(&words)?;
                writeln!(out, "Cleared.")?;
            } else {
                writeln!(out, "Cancelled.")?;
            }
        }
        Command::Quiz { mode, scope } => {
            let words = app.scope(&scope.unit, &scope.topic_scope())?;
            app.run_quiz(mode, &words, &mut io::stdin().lock(), &mut out)?;
        }
        Command::Config => {}
    }

    Ok(())
}

fn confirm<I: BufRead, O: Write>(prompt: &str, input: &mut I, out: &mut O) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
