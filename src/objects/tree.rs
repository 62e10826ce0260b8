use std::fmt;
use std::io::Write;

use crate::errors::{ ErrorKind, Result };
use crate::id::{ Id, ID_LEN };
use crate::objects::Type;

/// The ascii mode of a tree entry, kept as written (`100644`, `40000`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileMode(Vec<u8>);

impl FileMode {
    pub fn new(mode: &[u8]) -> Result<FileMode> {
        if mode.is_empty() || !mode.iter().all(u8::is_ascii_digit) {
            return Err(ErrorKind::MalformedTree(format!(
                "bad mode '{}'", String::from_utf8_lossy(mode)
            )).into())
        }
        Ok(FileMode(mode.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The kind of object an entry with this mode points at.
    pub fn kind(&self) -> Type {
        match &self.0[..] {
            b"40000" | b"040000" => Type::Tree,
            b"160000" => Type::Commit,
            _ => Type::Blob
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: Vec<u8>,
    id: Id
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: Vec<u8>, id: Id) -> Result<TreeEntry> {
        if name.is_empty() || name.contains(&0) {
            return Err(ErrorKind::MalformedTree(format!(
                "bad entry name '{}'", String::from_utf8_lossy(&name)
            )).into())
        }
        Ok(TreeEntry { mode, name, id })
    }

    pub fn mode(&self) -> &FileMode {
        &self.mode
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn id(&self) -> &Id {
        &self.id
    }
}

/// Entries in the order they were stored. Nothing here sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>
}

// layout is: ascii octal mode SP name NUL raw hash (20 bytes)
impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    pub fn load(body: &[u8]) -> Result<Tree> {
        #[derive(Debug)]
        enum Mode {
            FindSpace,
            FindNull(usize),
            CollectHash((usize, usize))
        }

        let mut entries = Vec::new();
        let mut anchor = 0;
        let mut mode = Mode::FindSpace;

        for (idx, &byte) in body.iter().enumerate() {
            mode = match (byte, mode) {
                (b' ', Mode::FindSpace) => Mode::FindNull(idx),
                (_,    Mode::FindSpace) => Mode::FindSpace,

                (0,    Mode::FindNull(space)) => Mode::CollectHash((space, idx)),
                (_,    Mode::FindNull(space)) => Mode::FindNull(space),

                (_,    Mode::CollectHash((space, null))) if idx - null < ID_LEN => {
                    Mode::CollectHash((space, null))
                },
                (_,    Mode::CollectHash((space, null))) => {
                    entries.push(TreeEntry::new(
                        FileMode::new(&body[anchor..space])?,
                        body[space + 1..null].to_vec(),
                        Id::from_bytes(&body[null + 1..=idx])?
                    )?);
                    anchor = idx + 1;
                    Mode::FindSpace
                }
            };
        }

        match mode {
            Mode::FindSpace if anchor == body.len() => Ok(Tree { entries }),
            _ => Err(ErrorKind::UnexpectedEOF.into())
        }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|xs| xs.name == name)
    }

    pub fn encode<W: Write>(&self, output: &mut W) -> Result<()> {
        for entry in &self.entries {
            output.write_all(entry.mode.as_bytes())?;
            output.write_all(b" ")?;
            output.write_all(&entry.name)?;
            output.write_all(&[0])?;
            output.write_all(entry.id.bytes())?;
        }
        Ok(())
    }
}

impl IntoIterator for Tree {
    type Item = TreeEntry;
    type IntoIter = std::vec::IntoIter<TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a TreeEntry;
    type IntoIter = std::slice::Iter<'a, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
