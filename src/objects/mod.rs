pub mod blob;
pub mod commit;
pub mod tag;
pub mod tree;

use std::fmt;
use std::io::{ BufRead, Read, Write };
use std::str::FromStr;
use tracing::debug;

use crate::errors::{ Error, ErrorKind, Result };
use crate::header::Header;
use crate::id::Id;

use self::blob::Blob;
use self::commit::Commit;
use self::tag::Tag;
use self::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Commit,
    Tree,
    Blob,
    Tag
}

impl Type {
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Commit => "commit",
            Type::Tree => "tree",
            Type::Blob => "blob",
            Type::Tag => "tag"
        }
    }

    pub fn from_bytes(input: &[u8]) -> Result<Type> {
        match input {
            b"commit" => Ok(Type::Commit),
            b"tree" => Ok(Type::Tree),
            b"blob" => Ok(Type::Blob),
            b"tag" => Ok(Type::Tag),
            _ => Err(ErrorKind::UnsupportedKind(String::from_utf8_lossy(input).into_owned()).into())
        }
    }

    /// Parse a body (everything after the header) as an object of this type.
    pub fn load(&self, body: &[u8]) -> Result<Object> {
        Ok(match self {
            Type::Commit => Object::Commit(Commit::load(body)?),
            Type::Tree => Object::Tree(Tree::load(body)?),
            Type::Blob => Object::Blob(Blob::load(body)?),
            Type::Tag => Object::Tag(Tag::load(body)?)
        })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Type> {
        Type::from_bytes(s.as_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Commit(Commit),
    Tree(Tree),
    Blob(Blob),
    Tag(Tag)
}

impl Object {
    /// Parse a decompressed loose object: header, then body.
    ///
    /// The declared length is not checked against the body here.
    pub fn parse(input: &[u8]) -> Result<Object> {
        let (header, body) = Header::parse(input)?;
        debug!(kind = %header.kind, size = header.size, "parsing object");
        header.kind.load(body)
    }

    /// Like `parse`, reading the body to the end of `reader`. Returns the
    /// header alongside the object so the caller can check the length.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<(Header, Object, u64)> {
        let header = Header::read(reader)?;
        debug!(kind = %header.kind, size = header.size, "reading object");

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        let object = header.kind.load(&body)?;
        Ok((header, object, body.len() as u64))
    }

    pub fn kind(&self) -> Type {
        match self {
            Object::Commit(_) => Type::Commit,
            Object::Tree(_) => Type::Tree,
            Object::Blob(_) => Type::Blob,
            Object::Tag(_) => Type::Tag
        }
    }

    /// Write the canonical body.
    pub fn encode<W: Write>(&self, output: &mut W) -> Result<()> {
        match self {
            Object::Commit(xs) => xs.encode(output),
            Object::Tree(xs) => xs.encode(output),
            Object::Blob(xs) => xs.encode(output),
            Object::Tag(xs) => xs.encode(output)
        }
    }

    pub fn to_body_bytes(&self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        self.encode(&mut body)?;
        Ok(body)
    }

    /// The header followed by the canonical body; what a loose object
    /// inflates to, and what its id is computed over.
    pub fn to_loose_bytes(&self) -> Result<Vec<u8>> {
        let body = self.to_body_bytes()?;
        let mut output = Vec::with_capacity(body.len() + 32);
        Header::new(self.kind(), body.len() as u64).write(&mut output)?;
        output.extend_from_slice(&body);
        Ok(output)
    }

    pub fn id(&self) -> Result<Id> {
        Ok(Id::digest(&self.to_loose_bytes()?))
    }

    /// Write the object the way `git cat-file -p` shows it.
    pub fn pretty<W: Write>(&self, output: &mut W) -> Result<()> {
        match self {
            Object::Tree(tree) => {
                for entry in tree.iter() {
                    write!(output, "{:0>6} {} {}\t", entry.mode(), entry.mode().kind(), entry.id())?;
                    output.write_all(entry.name())?;
                    output.write_all(b"\n")?;
                }
                Ok(())
            },
            _ => self.encode(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ Object, Type };
    use crate::errors::ErrorKind;

    #[test]
    fn parses_type_names() {
        assert_eq!("commit".parse::<Type>().expect("known"), Type::Commit);
        assert_eq!(Type::from_bytes(b"tag").expect("known"), Type::Tag);
        match "foobar".parse::<Type>().map_err(|e| e.0) {
            Err(ErrorKind::UnsupportedKind(kind)) => assert_eq!(kind, "foobar"),
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn dispatches_on_header() {
        let object = Object::parse(b"blob 11\0hello world").expect("valid blob");
        assert_eq!(object.kind(), Type::Blob);

        let object = Object::parse(b"tree 0\0").expect("valid tree");
        match object {
            Object::Tree(tree) => assert!(tree.is_empty()),
            other => panic!("expected tree, got {:?}", other)
        }
    }

    #[test]
    fn reads_from_a_stream() {
        let mut input = &b"blob 99\0hello world"[..];
        let (header, object, actual) = Object::read(&mut input).expect("valid blob");
        assert_eq!(header.size, 99);
        assert_eq!(actual, 11);
        assert_eq!(object.kind(), Type::Blob);
    }

    #[test]
    fn well_known_ids() {
        let empty_blob = Object::parse(b"blob 0\0").expect("valid blob");
        assert_eq!(empty_blob.id().expect("encodable").to_string(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");

        let empty_tree = Object::parse(b"tree 0\0").expect("valid tree");
        assert_eq!(empty_tree.id().expect("encodable").to_string(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");

        let hello = Object::parse(b"blob 12\0hello world\n").expect("valid blob");
        assert_eq!(hello.id().expect("encodable").to_string(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
    }

    #[test]
    fn round_trips_every_fixture() {
        for raw in &[
            &include_bytes!("../../fixtures/commit")[..],
            &include_bytes!("../../fixtures/signed_commit")[..],
            &include_bytes!("../../fixtures/merge_commit")[..],
            &include_bytes!("../../fixtures/tag")[..],
            &include_bytes!("../../fixtures/tree")[..],
            &include_bytes!("../../fixtures/blob")[..]
        ] {
            let object = Object::parse(raw).expect("valid fixture");
            assert_eq!(object.to_loose_bytes().expect("encodable"), *raw);
        }
    }

    // ids of the fixture bytes, hashed outside this crate
    #[test]
    fn fixture_ids_are_stable() {
        for (raw, expected) in &[
            (&include_bytes!("../../fixtures/commit")[..], "a8fefd7db9817724b9202fac41cb9f4183229920"),
            (&include_bytes!("../../fixtures/signed_commit")[..], "18f8e5a0a0890b1a6573839b01b6c59c47303067"),
            (&include_bytes!("../../fixtures/merge_commit")[..], "e3f23f16b173c6c923ea2259f7cffc00bf7e0f5f"),
            (&include_bytes!("../../fixtures/tag")[..], "604f42ebc4d672134ffcf2fa626cbed91ee143b1"),
            (&include_bytes!("../../fixtures/tree")[..], "8d345eacd0b07f487b508fce925dc2ddcf7a14e8")
        ] {
            let object = Object::parse(raw).expect("valid fixture");
            assert_eq!(object.id().expect("encodable").to_string(), *expected);
        }
    }

    #[test]
    fn pretty_prints_trees() {
        let object = Object::parse(include_bytes!("../../fixtures/tree")).expect("valid tree");
        let mut out = Vec::new();
        object.pretty(&mut out).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("100644 blob "));
        assert!(lines[0].ends_with("\t.gitignore"));
        assert!(lines.iter().any(|xs| xs.starts_with("040000 tree ") && xs.ends_with("\tsrc")));
    }
}
