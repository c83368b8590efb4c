//!
//! hierchat CLI binary
//! -------------------
//! Terminal front-end for the treemap chat. Answers one question with
//! `--query`, otherwise starts an interactive interpreter against a local
//! Parquet file.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{fmt, EnvFilter};

use hierchat::chat::{ChatService, EXAMPLE_QUESTIONS};
use hierchat::cli::{daily_message, print_messages, render_schema};
use hierchat::config::Settings;
use hierchat::storage::HierarchyStore;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--data <parquet>]                  # start interactive interpreter\n  {program} --query \"<question>\" [--data <parquet>]\n  {program} -q \"<question>\" [--data <parquet>]\n\nFlags:\n  --data <path>            Parquet file with the hierarchy data (env HIERCHAT_DATA_PATH)\n  -q, --query <text>       Answer one question and exit\n  -h, --help               Show this help\n\nInteractive commands:\n  examples                 list example questions (select one by number)\n  schema                   show the columns of the data file\n  daily [metric]           total revenue (or sales/stock) per day as a line chart\n  help                     show this help\n  quit | exit              exit the interpreter\n  <question>               ask a question, e.g.\n                           Show the relative total revenue of hierarchy 1 in 2019"
    );
}

fn main() -> Result<()> {
    // Warnings only by default; the REPL output is the chat itself
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut query: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--query" | "-q" => {
                if i + 1 >= args.len() { eprintln!("--query requires a value"); print_usage(&program); std::process::exit(2); }
                query = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--data" => {
                if i + 1 >= args.len() { eprintln!("--data requires a value"); print_usage(&program); std::process::exit(2); }
                i += 2; continue;
            }
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            unk => {
                eprintln!("Unrecognized argument: {}", unk);
                print_usage(&program);
                std::process::exit(2);
            }
        }
    }

    let settings = Settings::from_env_and_args(&args);
    let store = Arc::new(
        HierarchyStore::open(&settings.data_path)
            .with_context(|| format!("Failed to open data file {}", settings.data_path.display()))?,
    );
    let chat = ChatService::new(store.clone());

    if let Some(q) = query {
        print_messages(&chat.handle_message(&q)?);
        return Ok(());
    }
    run_repl(&chat, &store)
}

fn run_repl(chat: &ChatService, store: &HierarchyStore) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to start line editor")?;
    print_messages(&[chat.welcome()]);
    println!("Type 'help' for commands.");
    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = input.trim();
        if line.is_empty() { continue; }
        let _ = rl.add_history_entry(line);

        let up = line.to_uppercase();
        if up == "EXIT" || up == "QUIT" { break; }
        if up == "HELP" {
            print_usage("hierchat_cli");
            continue;
        }
        if up == "EXAMPLES" {
            print_messages(&[chat.welcome()]);
            continue;
        }
        if up == "SCHEMA" {
            match store.describe() {
                Ok(cols) => render_schema(&cols).iter().for_each(|l| println!("{}", l)),
                Err(e) => eprintln!("error: {}", e),
            }
            continue;
        }
        if up == "DAILY" || up.starts_with("DAILY ") {
            match daily_message(store, line["daily".len()..].trim()) {
                Ok(msg) => print_messages(&[msg]),
                Err(e) => eprintln!("error: {}", e),
            }
            continue;
        }

        // A bare number picks an example question, like clicking its shortcut
        let result = match line.parse::<usize>() {
            Ok(n) if (1..=EXAMPLE_QUESTIONS.len()).contains(&n) => chat.select_action(EXAMPLE_QUESTIONS[n - 1]),
            _ => chat.handle_message(line),
        };
        match result {
            Ok(msgs) => print_messages(&msgs),
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}

