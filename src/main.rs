use std::io;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod store;
mod task;
mod timer;

use commands::CommandLoop;
use store::TodoStore;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr, away from the prompt on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    println!("-------------------------------------------");
    println!("Welcome to the todo CLI");
    println!("{}", commands::MENU);

    let store = TodoStore::load(store::DEFAULT_FILE)
        .with_context(|| format!("failed to load {}", store::DEFAULT_FILE))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = CommandLoop::new(store);
    repl.run(&mut stdin.lock(), &mut stdout.lock())?;
    Ok(())
}
