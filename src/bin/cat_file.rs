extern crate git_codec;

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use git_codec::errors::{ ErrorKind, Result };
use git_codec::stores::fs as gitfs;
use git_codec::id::Id;

/// Print loose objects the way `git cat-file -p` does.
#[derive(Parser)]
struct Args {
    #[clap(long)]
    cwd: Option<PathBuf>,

    #[clap(required = true)]
    ids: Vec<String>,
}

pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let current_dir = match args.cwd {
        Some(xs) => xs,
        None => std::env::current_dir()?
    };
    let store = gitfs::from(current_dir.as_path());

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    for query in &args.ids {
        let id: Id = query.parse()?;
        let object = store.get(&id)?
            .ok_or_else(|| ErrorKind::Msg(format!("no loose object {}", id)))?;
        object.pretty(&mut output)?;
    }
    output.flush()?;

    Ok(())
}
