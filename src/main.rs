use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, time::Duration};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mergelens::config::{DEFAULT_API_BASE, DEFAULT_REPOSITORY};
use mergelens::services::{self, resolve_token};
use mergelens::{ui, update, App, Command, FetchConfig, Message, Page, RepoRef};

/// Issues of a GitHub repository and whether a linked pull request was merged
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to query (owner/name or GitHub URL)
    #[arg(
        short,
        long,
        global = true,
        env = "MERGELENS_REPOSITORY",
        default_value = DEFAULT_REPOSITORY
    )]
    repository: String,

    /// GitHub token; falls back to `gh auth token`
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    api_url: String,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the issues query and print the raw JSON response (default)
    Query {
        /// Write the response to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print one line per issue
    Issues {
        /// Only list issues with a merged pull request
        #[arg(long)]
        only_merged: bool,
    },
    /// Write index.html and merged.html
    Render {
        /// Output directory
        #[arg(short, long, default_value = "site")]
        output: PathBuf,
    },
    /// Write a page of default-branch commits with their pull requests
    Commits {
        /// Output file
        #[arg(short, long, default_value = "commits.html")]
        output: PathBuf,
    },
    /// Write a page of issues and pull requests ordered by creation time
    Summary {
        /// Output file
        #[arg(short, long, default_value = "summary.html")]
        output: PathBuf,
    },
    /// Browse issues in the terminal
    Browse,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Query { output: None });

    // stderr would corrupt the terminal UI
    if !matches!(command, Commands::Browse) {
        init_logging(cli.verbose);
    }

    let repository: RepoRef = cli.repository.parse()?;
    let config = FetchConfig::new(repository, resolve_token(cli.token)).with_api_base(cli.api_url);
    tracing::debug!(?config, "Resolved configuration");

    match command {
        Commands::Query { output } => {
            let rt = tokio::runtime::Runtime::new()?;
            let response = rt.block_on(services::fetch_issues_raw(&config))?;
            let json = services::format_response(&response)?;
            match output {
                Some(path) => {
                    services::write_file(&path, &json)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Issues { only_merged } => {
            let rt = tokio::runtime::Runtime::new()?;
            let issues = rt.block_on(services::fetch_issues(&config))?;
            let mut page = Page::new(issues);
            if only_merged {
                page.activate_toggle();
            }
            for item in page.visible_items() {
                let mark = if item.issue.has_merged_pr { "x" } else { " " };
                match item.issue.number {
                    Some(n) => println!("[{mark}] #{n} {}", item.issue.title),
                    None => println!("[{mark}] {}", item.issue.title),
                }
            }
        }
        Commands::Render { output } => {
            let rt = tokio::runtime::Runtime::new()?;
            let issues = rt.block_on(services::fetch_issues(&config))?;
            for path in services::write_site(&output, &config.repository, &issues)? {
                eprintln!("Wrote {}", path.display());
            }
        }
        Commands::Commits { output } => {
            let rt = tokio::runtime::Runtime::new()?;
            let commits = rt.block_on(services::fetch_commits(&config))?;
            let html = services::render_commits_page(&config.repository, &commits);
            services::write_file(&output, &html)?;
            eprintln!("Wrote {}", output.display());
        }
        Commands::Summary { output } => {
            let rt = tokio::runtime::Runtime::new()?;
            let entries = rt.block_on(services::fetch_activity(&config))?;
            let html = services::render_summary_page(&config.repository, &entries);
            services::write_file(&output, &html)?;
            eprintln!("Wrote {}", output.display());
        }
        Commands::Browse => browse(config)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn browse(config: FetchConfig) -> Result<()> {
    let mut app = App::new(config);
    app.start_fetch();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Check for async fetch results
        if let Some(result) = app.check_fetch_result() {
            if let Some(cmd) = update(app, Message::FetchComplete(result)) {
                if handle_command(app, cmd) {
                    return Ok(());
                }
            }
        }

        // Update spinner
        if let Some(cmd) = update(app, Message::Tick) {
            if handle_command(app, cmd) {
                return Ok(());
            }
        }

        terminal.draw(|f| ui(f, app))?;

        // Handle input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(msg) = key_to_message(app, key.code) {
                        if let Some(cmd) = update(app, msg) {
                            if handle_command(app, cmd) {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Handle a command returned from update. Returns true to quit.
fn handle_command(app: &mut App, cmd: Command) -> bool {
    match cmd {
        Command::Quit => true,
        Command::StartFetch => {
            app.start_fetch();
            false
        }
    }
}

/// Convert a key press to a message based on current app state
fn key_to_message(app: &App, key: KeyCode) -> Option<Message> {
    // Help popup - any key dismisses
    if app.show_help_popup {
        return Some(Message::DismissHelp);
    }

    if app.show_error_popup {
        return match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Message::DismissError),
            _ => None,
        };
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
        KeyCode::Char('m') => Some(Message::ToggleMergedFilter),
        KeyCode::Char('j') | KeyCode::Down => Some(Message::NextItem),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::PreviousItem),
        KeyCode::Char('g') => Some(Message::GoToTop),
        KeyCode::Char('G') => Some(Message::GoToBottom),
        KeyCode::Char('o') | KeyCode::Enter => Some(Message::OpenSelected),
        KeyCode::Char('r') => Some(Message::Refresh),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        _ => None,
    }
}
