use std::io::Write;

use crate::attributes::{ self, write_attribute, Attribute };
use crate::errors::{ ErrorKind, Result };
use crate::human_metadata::HumanMetadata;
use crate::id::Id;

/// A commit, split into the fields git gives meaning to plus every other
/// header (`gpgsig`, `mergetag`, `encoding`, ...) in the order it appeared.
///
/// Encoding writes `tree`, `parent`s, `author`, `committer`, the remaining
/// headers, a blank line and the message. Commits git writes use that order,
/// so they come back byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree: Id,
    parents: Vec<Id>,
    author: Option<HumanMetadata>,
    committer: Option<HumanMetadata>,
    extra: Vec<Attribute>,
    message: Vec<u8>
}

impl Commit {
    pub fn new(
        tree: Id,
        parents: Vec<Id>,
        author: Option<HumanMetadata>,
        committer: Option<HumanMetadata>,
        extra: Vec<Attribute>,
        message: Vec<u8>
    ) -> Self {
        Commit {
            tree,
            parents,
            author,
            committer,
            extra,
            message
        }
    }

    pub fn tree(&self) -> &Id {
        &self.tree
    }

    pub fn parents(&self) -> &[Id] {
        &self.parents
    }

    pub fn author(&self) -> Option<&HumanMetadata> {
        self.author.as_ref()
    }

    pub fn committer(&self) -> Option<&HumanMetadata> {
        self.committer.as_ref()
    }

    /// Headers without a dedicated field, in stored order.
    pub fn extra_headers(&self) -> &[Attribute] {
        &self.extra
    }

    /// The first extra header named `key`, continuation lines included.
    pub fn extra(&self, key: &[u8]) -> Option<&[u8]> {
        self.extra.iter().find(|xs| xs.key() == key).map(Attribute::value)
    }

    pub fn message(&self) -> &[u8] {
        self.message.as_slice()
    }
}

impl Commit {
    pub fn load(body: &[u8]) -> Result<Commit> {
        // attr SP value NL
        // NL
        // message
        let headers = attributes::parse(body, ErrorKind::MalformedCommit)?;

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;
        let mut extra = Vec::new();

        for line in &headers.lines {
            match line.key {
                b"tree" => {
                    if tree.is_some() {
                        return Err(duplicate("tree"))
                    }
                    tree = Some(Id::from_hex(line.value)?);
                },
                b"parent" => parents.push(Id::from_hex(line.value)?),
                b"author" => {
                    if author.is_some() {
                        return Err(duplicate("author"))
                    }
                    author = Some(HumanMetadata::parse(line.value)?);
                },
                b"committer" => {
                    if committer.is_some() {
                        return Err(duplicate("committer"))
                    }
                    committer = Some(HumanMetadata::parse(line.value)?);
                },
                _ => extra.push(line.to_attribute())
            }
        }

        let tree = tree.ok_or(ErrorKind::MissingRequiredField("tree"))?;
        let message = headers.message.ok_or(ErrorKind::UnexpectedEOF)?;

        Ok(Commit {
            tree,
            parents,
            author,
            committer,
            extra,
            message: message.to_vec()
        })
    }

    pub fn encode<W: Write>(&self, output: &mut W) -> Result<()> {
        write_attribute(output, b"tree", self.tree.to_hex().as_bytes())?;
        for parent in &self.parents {
            write_attribute(output, b"parent", parent.to_hex().as_bytes())?;
        }
        if let Some(author) = &self.author {
            write_attribute(output, b"author", author.as_bytes())?;
        }
        if let Some(committer) = &self.committer {
            write_attribute(output, b"committer", committer.as_bytes())?;
        }
        for attribute in &self.extra {
            attribute.write(output)?;
        }
        output.write_all(b"\n")?;
        output.write_all(&self.message)?;
        Ok(())
    }
}

fn duplicate(field: &str) -> crate::errors::Error {
    ErrorKind::MalformedCommit(format!("more than one '{}' line", field)).into()
}

#[cfg(test)]
mod tests {
    use super::Commit;
    use crate::attributes::Attribute;
    use crate::errors::ErrorKind;
    use crate::human_metadata::HumanMetadata;
    use crate::id::Id;

    fn encoded(commit: &Commit) -> Vec<u8> {
        let mut out = Vec::new();
        commit.encode(&mut out).expect("write to vec");
        out
    }

    fn body(raw: &[u8]) -> &[u8] {
        let nul = raw.iter().position(|&xs| xs == 0).expect("fixture has a header");
        &raw[nul + 1..]
    }

    fn error_of(input: &[u8]) -> ErrorKind {
        Commit::load(input).expect_err("should not parse").0
    }

    #[test]
    fn commit_read_works() {
        let bytes = body(include_bytes!("../../fixtures/commit"));
        let commit = Commit::load(bytes).expect("valid commit");

        let message = std::str::from_utf8(commit.message()).expect("not utf8");
        assert_eq!(message, "golf down the commit identity parser\n");
        assert_eq!(commit.tree().to_string(), "36a82dd9132a48f3beb8543c9ad174ec391111da");
        assert_eq!(commit.parents().len(), 1);
        assert_eq!(commit.parents()[0].to_string(), "52a9830591232fbabe56fba67200e09e53ff560e");

        let author = commit.author().expect("author");
        assert_eq!(author.name(), "Chris Dickinson");
        assert_eq!(author.raw_at(), Some(&b"1650783883"[..]));
        let committer = commit.committer().expect("committer");
        assert_eq!(committer.raw_at(), Some(&b"1650784360"[..]));

        assert!(commit.extra_headers().is_empty());
        assert_eq!(encoded(&commit), bytes);
    }

    #[test]
    fn signed_commit_keeps_signature() {
        let bytes = body(include_bytes!("../../fixtures/signed_commit"));
        let commit = Commit::load(bytes).expect("valid commit");

        let signature = commit.extra(b"gpgsig").expect("signature");
        assert!(signature.starts_with(b"-----BEGIN PGP SIGNATURE-----\n \n "));
        assert!(signature.ends_with(b"\n -----END PGP SIGNATURE-----"));
        assert_eq!(encoded(&commit), bytes);
    }

    #[test]
    fn merge_commit_with_mergetag() {
        let bytes = body(include_bytes!("../../fixtures/merge_commit"));
        let commit = Commit::load(bytes).expect("valid commit");

        assert_eq!(commit.parents().len(), 2);
        let keys: Vec<&[u8]> = commit.extra_headers().iter().map(|xs| xs.key()).collect();
        assert_eq!(keys, vec![&b"encoding"[..], &b"mergetag"[..]]);
        assert_eq!(commit.extra(b"encoding"), Some(&b"ISO-8859-1"[..]));
        assert!(commit.extra(b"mergetag").expect("mergetag").starts_with(b"object "));
        assert_eq!(encoded(&commit), bytes);
    }

    #[test]
    fn root_commit_with_empty_message() {
        let bytes = b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
author A <a@b> 0 +0000\n\
committer A <a@b> 0 +0000\n\n";
        let commit = Commit::load(bytes).expect("valid commit");
        assert!(commit.parents().is_empty());
        assert!(commit.message().is_empty());
        assert_eq!(encoded(&commit), &bytes[..]);
    }

    #[test]
    fn missing_author_stays_missing() {
        let bytes = b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\nmessage\n";
        let commit = Commit::load(bytes).expect("valid commit");
        assert!(commit.author().is_none());
        assert!(commit.committer().is_none());
        assert_eq!(encoded(&commit), &bytes[..]);
    }

    #[test]
    fn missing_tree() {
        let bytes = b"author A <a@b> 0 +0000\ncommitter A <a@b> 0 +0000\n\nmessage\n";
        match error_of(bytes) {
            ErrorKind::MissingRequiredField(field) => assert_eq!(field, "tree"),
            other => panic!("unexpected {:?}", other)
        }

        assert!(matches!(error_of(b""), ErrorKind::MissingRequiredField("tree")));
    }

    #[test]
    fn duplicate_fields() {
        let tree = "tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n";
        for bytes in &[
            format!("{}{}\nmessage", tree, tree),
            format!("{}author A <a@b>\nauthor B <b@c>\n\n", tree),
            format!("{}committer A <a@b>\ncommitter B <b@c>\n\n", tree)
        ] {
            assert!(matches!(error_of(bytes.as_bytes()), ErrorKind::MalformedCommit(_)), "{}", bytes);
        }
    }

    #[test]
    fn malformed_hashes() {
        assert!(matches!(error_of(b"tree 4b825dc6\n\n"), ErrorKind::MalformedHash(_)));
        assert!(matches!(
            error_of(b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\nparent nothex\n\n"),
            ErrorKind::MalformedHash(_)
        ));
    }

    #[test]
    fn malformed_person_line() {
        let bytes = b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\nauthor nobody\n\n";
        assert!(matches!(error_of(bytes), ErrorKind::MalformedPersonLine(_)));
    }

    #[test]
    fn missing_separator() {
        let bytes = b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n";
        assert!(matches!(error_of(bytes), ErrorKind::UnexpectedEOF));
    }

    #[test]
    fn encodes_hand_built_commit() {
        let tree: Id = "4b825dc642cb6eb9a060e54bf8d69288fbee4904".parse().expect("valid id");
        let person = HumanMetadata::from_parts(b"A U Thor", b"author@example.com", Some((&b"1112912053"[..], &b"-0700"[..])))
            .expect("canonical person");
        let commit = Commit::new(
            tree,
            vec![],
            Some(person.clone()),
            Some(person),
            vec![Attribute::new(b"encoding".to_vec(), b"UTF-8".to_vec())],
            b"hello\n".to_vec()
        );

        assert_eq!(
            encoded(&commit),
            &b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
author A U Thor <author@example.com> 1112912053 -0700\n\
committer A U Thor <author@example.com> 1112912053 -0700\n\
encoding UTF-8\n\
\n\
hello\n"[..]
        );
    }
}
