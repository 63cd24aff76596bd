use anyhow::Result;
use clap::{Parser, Subcommand};

use taskpad::tasks::Controller;
use taskpad::view::{self, Filter};
use taskpad::{config, logging, store, tui};

#[derive(Parser)]
#[command(
    name = "taskpad",
    version = env!("TASKPAD_VERSION"),
    about = "A terminal task list backed by a document store"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the task list (default)
    Ui,
    /// Create ~/.taskpad/ and a commented config.toml
    Init,
    /// Print tasks, newest first
    List {
        /// Which tasks to show: all, done or todo
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    /// Add a task
    Add {
        /// Task text (at least 5 characters, not starting with a digit)
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    config::ensure_dirs()?;
    let cfg = config::load()?;
    logging::init(&config::log_path()?, &cfg.log_level)?;
    tracing::info!(backend = ?cfg.backend, "starting taskpad");

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Init => {
            let path = config::config_path()?;
            if config::write_default(&path)? {
                println!("wrote {}", path.display());
            } else {
                println!("{} already exists, leaving it alone", path.display());
            }
            Ok(())
        }
        Commands::List { filter } => {
            let mut controller = Controller::new(store::open(&cfg)?);
            controller.load()?;
            let state = controller.state();
            let list = view::build(&state.tasks, filter, false);
            if let Some(message) = list.empty_message {
                println!("{message}");
            }
            for row in &list.rows {
                let mark = if row.completed { "x" } else { " " };
                println!("  [{mark}] {}  ({})", row.text, row.id);
            }
            Ok(())
        }
        Commands::Add { text } => {
            let mut controller = Controller::new(store::open(&cfg)?);
            controller.add(&text)?;
            if let Some(task) = controller.state().tasks.first() {
                println!("Added '{}' ({})", task.text, task.id);
            }
            Ok(())
        }
        Commands::Ui => {
            let controller = Controller::new(store::open(&cfg)?);
            tui::run(controller, cfg.theme.build())
        }
    }
}
