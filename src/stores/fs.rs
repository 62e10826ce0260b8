use std::path::{ Path, PathBuf };
use tracing::{ debug, trace };

use crate::stores::loose::Store as LooseStore;
use crate::errors::Result;
use crate::id::Id;

fn objects_dir(path: &Path) -> PathBuf {
    let mut root = std::path::PathBuf::new();
    root.push(path);
    root.push(".git");
    root.push("objects");
    root
}

/// A loose store reading `<path>/.git/objects/ab/cdef...`.
pub fn from(path: &Path) -> LooseStore {
    let root = objects_dir(path);

    LooseStore::new(move |id| {
        let as_str = id.to_string();
        let mut pb = root.clone();
        pb.push(&as_str[0..2]);
        pb.push(&as_str[2..]);
        match std::fs::File::open(pb.as_path()) {
            Ok(f) => Ok(Some(Box::new(f))),
            Err(e) => {
                match e.kind() {
                    std::io::ErrorKind::NotFound => Ok(None),
                    _ => Err(e.into())
                }
            }
        }
    })
}

/// Every loose object id under `<path>/.git/objects`, sorted.
///
/// `info/` and `pack/` are skipped, as is anything whose path is not a
/// valid id.
pub fn loose_ids(path: &Path) -> Result<Vec<Id>> {
    let root = objects_dir(path);
    let mut ids = Vec::new();

    for entry in std::fs::read_dir(root.as_path())? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue
        }

        let os_dirname = entry.file_name();
        let dirname = match os_dirname.to_str() {
            Some(xs) if xs.len() == 2 => xs.to_string(),
            _ => {
                trace!(path = ?entry.path(), "skipping");
                continue
            }
        };

        for file in std::fs::read_dir(entry.path())? {
            let file = file?;
            let os_filename = file.file_name();
            let candidate = match os_filename.to_str() {
                Some(xs) => format!("{}{}", dirname, xs),
                None => continue
            };

            match candidate.parse::<Id>() {
                Ok(id) => ids.push(id),
                Err(_) => trace!(path = ?file.path(), "skipping"),
            }
        }
    }

    ids.sort();
    debug!(count = ids.len(), root = ?root, "listed loose objects");
    Ok(ids)
}
