use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, IsTerminal};
use todo_core::app::TodoApp;
use todo_core::config::{self, Config};
use todo_core::error::AppError;
use todo_core::storage::FileStorage;
use todo_core::task_store::TaskStore;
use todo_core::theme::{self, Palette};
use todo_shell::cli::{Cli, Command, collect_overrides, split_command_line};
use todo_shell::view;
use tracing::{Level, warn};

const LOG_ENV_VAR: &str = "TODOAPP_LOG";

type App = TodoApp<FileStorage>;

fn init_logging() {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn palette_for(app: &App) -> Palette {
    if io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        Palette::for_mode(app.theme())
    } else {
        Palette::plain()
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn open_app(cli: &Cli) -> Result<App, AppError> {
    let overrides = collect_overrides(&cli.config_override)?;
    let loaded = config::load_config_with_fallback();
    let config: Config = config::merge_overrides(&loaded.config, &overrides);

    let storage = FileStorage::from_env()?;
    let store = TaskStore::open(storage, config.restore_on_startup);
    let mode = config.theme_mode().unwrap_or_else(theme::ambient_preference);

    Ok(TodoApp::new(store, mode))
}

fn print_tasks(app: &App, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", view::tasks_json(app.tasks())?);
    } else {
        print!("{}", view::render_tasks(app.tasks(), &palette_for(app)));
    }
    Ok(())
}

/// Applies one command. Returns whether any visible state changed.
fn apply_command(app: &mut App, command: Command) -> bool {
    match command {
        Command::Input { text } => {
            app.set_input(text.unwrap_or_default());
            true
        }
        Command::Submit => app.submit().is_some(),
        Command::Add { text } => {
            if let Some(text) = text {
                app.set_input(text);
            }
            app.submit().is_some()
        }
        Command::Toggle { row } => app.toggle_row(row).is_some(),
        Command::Remove { row } => app.remove_row(row).is_some(),
        Command::List => true,
        Command::Theme => {
            app.toggle_theme();
            true
        }
    }
}

fn run_once(app: &mut App, command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::Add { text } => {
            app.set_input(text.unwrap_or_default());
            if let Some(task) = app.submit()
                && !json
            {
                println!("Added task: {}", task.text);
            }
        }
        Command::Toggle { row } => {
            if let Some(task) = app.toggle_row(row)
                && !json
            {
                let verb = if task.completed { "Completed" } else { "Reopened" };
                println!("{verb} task: {}", task.text);
            }
        }
        Command::Remove { row } => {
            if let Some(task) = app.remove_row(row)
                && !json
            {
                println!("Deleted task: {}", task.text);
            }
        }
        Command::Theme => {
            let mode = app.toggle_theme();
            if !json {
                println!("Theme: {mode}");
            }
        }
        Command::List => {
            if !json {
                print_tasks(app, false)?;
            }
        }
        Command::Input { .. } | Command::Submit => {
            return Err(AppError::invalid_input(
                "input and submit only work in the interactive shell",
            ));
        }
    }

    if json {
        print_tasks(app, true)?;
    }

    Ok(())
}

fn run_interactive(app: &mut App) -> Result<(), AppError> {
    let mut buffer = Vec::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    print!("{}", view::render(app, &palette_for(app)));

    loop {
        buffer.clear();
        let bytes = stdin_lock.read_until(b'\n', &mut buffer)?;

        if bytes == 0 {
            break;
        }

        let Ok(input) = std::str::from_utf8(&buffer) else {
            warn!(bytes, "ignoring input line that is not valid UTF-8");
            continue;
        };

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("todo_shell".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if !cli.config_override.is_empty() {
            eprintln!(
                "ERROR: {}",
                AppError::invalid_input("--config-override only applies at startup")
            );
            continue;
        }

        let Some(command) = cli.command else {
            continue;
        };

        let changed = apply_command(app, command);
        if cli.json {
            print_tasks(app, true)?;
        } else if changed {
            print!("{}", view::render(app, &palette_for(app)));
        }
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut app = open_app(&cli)?;
    match cli.command {
        Some(command) => run_once(&mut app, command, cli.json),
        None => run_interactive(&mut app),
    }
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
