extern crate git_codec;

use clap::Parser;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use git_codec::errors::Result;
use git_codec::stores::fs as gitfs;
use git_codec::stores::loose::Store;
use git_codec::id::Id;

/// Decode and re-encode every loose object, checking that each one still
/// hashes to the id it is stored under.
#[derive(Parser)]
struct Args {
    #[clap(long)]
    cwd: Option<PathBuf>,

    /// Worker threads; defaults to one per cpu.
    #[clap(long)]
    jobs: Option<usize>,
}

enum Outcome {
    Mismatch(Id),
    Missing,
}

fn check(store: &Store, id: &Id) -> Result<Option<Outcome>> {
    let object = match store.get(id)? {
        Some(xs) => xs,
        None => return Ok(Some(Outcome::Missing))
    };

    let actual = object.id()?;
    if &actual != id {
        return Ok(Some(Outcome::Mismatch(actual)))
    }
    Ok(None)
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

    let ids = gitfs::loose_ids(current_dir.as_path())?;
    let store = gitfs::from(current_dir.as_path());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .map_err(|e| e.to_string())?;

    let failures: Vec<String> = pool.install(|| {
        ids.par_iter().filter_map(|id| {
            debug!(%id, "checking");
            match check(&store, id) {
                Ok(None) => None,
                Ok(Some(Outcome::Missing)) => Some(format!("{}: vanished while checking", id)),
                Ok(Some(Outcome::Mismatch(actual))) => Some(format!("{}: re-encodes as {}", id, actual)),
                Err(e) => Some(format!("{}: {}", id, e))
            }
        }).collect()
    });

    for failure in &failures {
        eprintln!("{}", failure);
    }
    println!("checked {} objects, {} failed", ids.len(), failures.len());

    if !failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
