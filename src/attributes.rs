//! The `attr SP value LF` header block shared by commit and tag bodies.
//!
//! ```text
//! tree 36a82dd9132a48f3beb8543c9ad174ec391111da
//! author Chris Dickinson <chris@neversaw.us> 1650783883 -0700
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  <continuation lines start with a single space>
//!  -----END PGP SIGNATURE-----
//!
//! message
//! ```
//!
//! Continuation lines belong to the value of the field above them and are
//! kept verbatim, `\n ` included.

use std::io::Write;

use crate::errors::{ ErrorKind, Result };

/// A header field the body parsers keep without interpreting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    key: Vec<u8>,
    value: Vec<u8>
}

impl Attribute {
    pub fn new(key: Vec<u8>, value: Vec<u8>) -> Self {
        Attribute { key, value }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn write<W: Write>(&self, output: &mut W) -> Result<()> {
        write_attribute(output, &self.key, &self.value)
    }
}

/// One parsed header line, borrowed from the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8]
}

impl<'a> Line<'a> {
    pub fn to_attribute(&self) -> Attribute {
        Attribute::new(self.key.to_vec(), self.value.to_vec())
    }
}

#[derive(Debug)]
pub struct Headers<'a> {
    pub lines: Vec<Line<'a>>,

    /// Everything after the blank separator line, or `None` if the body
    /// ended cleanly without one.
    pub message: Option<&'a [u8]>
}

/// Split `key SP value` at the first space.
pub fn split_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let space = line.iter().position(|&xs| xs == b' ')?;
    Some((&line[..space], &line[space + 1..]))
}

pub fn write_attribute<W: Write>(output: &mut W, key: &[u8], value: &[u8]) -> Result<()> {
    output.write_all(key)?;
    output.write_all(b" ")?;
    output.write_all(value)?;
    output.write_all(b"\n")?;
    Ok(())
}

/// Read header lines up to the blank separator line.
///
/// `malformed` builds the body-specific error for structural problems (a
/// line with no space, or a continuation line with nothing to continue).
/// A line cut off before its LF is `UnexpectedEOF`.
pub fn parse<F>(body: &[u8], malformed: F) -> Result<Headers<'_>>
    where F: Fn(String) -> ErrorKind {

    let mut lines = Vec::new();
    let mut rest = body;

    loop {
        match rest.first() {
            None => return Ok(Headers { lines, message: None }),
            Some(b'\n') => return Ok(Headers { lines, message: Some(&rest[1..]) }),
            Some(b' ') => return Err(malformed("continuation line without a field".to_string()).into()),
            Some(_) => {}
        }

        let end = logical_line_end(rest)?;
        let line = &rest[..end];

        let (key, value) = match split_line(line) {
            Some((key, value)) if !key.contains(&b'\n') => (key, value),
            _ => {
                let first = line.split(|&xs| xs == b'\n').next().unwrap_or(line);
                return Err(malformed(format!(
                    "header line without a value: '{}'", String::from_utf8_lossy(first)
                )).into())
            }
        };

        lines.push(Line { key, value });
        rest = &rest[end + 1..];
    }
}

// Index of the LF that ends the line starting at `buf[0]`, skipping over any
// LFs followed by a continuation space.
fn logical_line_end(buf: &[u8]) -> Result<usize> {
    let mut start = 0;
    loop {
        let lf = match buf[start..].iter().position(|&xs| xs == b'\n') {
            Some(xs) => start + xs,
            None => return Err(ErrorKind::UnexpectedEOF.into())
        };

        if buf.get(lf + 1) == Some(&b' ') {
            start = lf + 1;
        } else {
            return Ok(lf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ parse, split_line };
    use crate::errors::ErrorKind;

    #[test]
    fn splits_at_first_space() {
        assert_eq!(split_line(b"author A <a@b> 1 +0000"), Some((&b"author"[..], &b"A <a@b> 1 +0000"[..])));
        assert_eq!(split_line(b"nospace"), None);
    }

    #[test]
    fn reads_lines_and_message() {
        let headers = parse(b"a 1\nb 2\n\nmessage\n", ErrorKind::MalformedCommit).expect("valid headers");
        assert_eq!(headers.lines.len(), 2);
        assert_eq!(headers.lines[1].key, b"b");
        assert_eq!(headers.lines[1].value, b"2");
        assert_eq!(headers.message, Some(&b"message\n"[..]));
    }

    #[test]
    fn keeps_continuation_lines_verbatim() {
        let body = b"gpgsig -----BEGIN-----\n \n abc\n -----END-----\nnext 1\n\n";
        let headers = parse(body, ErrorKind::MalformedCommit).expect("valid headers");
        assert_eq!(headers.lines[0].key, b"gpgsig");
        assert_eq!(headers.lines[0].value, b"-----BEGIN-----\n \n abc\n -----END-----");
        assert_eq!(headers.lines[1].key, b"next");
        assert_eq!(headers.message, Some(&b""[..]));
    }

    #[test]
    fn values_may_contain_spaces_and_be_empty() {
        let headers = parse(b"encoding \nx a b c\n\n", ErrorKind::MalformedCommit).expect("valid headers");
        assert_eq!(headers.lines[0].value, b"");
        assert_eq!(headers.lines[1].value, b"a b c");
    }

    #[test]
    fn clean_end_without_separator() {
        let headers = parse(b"a 1\n", ErrorKind::MalformedCommit).expect("valid headers");
        assert_eq!(headers.lines.len(), 1);
        assert!(headers.message.is_none());
    }

    #[test]
    fn truncated_line() {
        let err = parse(b"a 1\nb 2", ErrorKind::MalformedCommit).expect_err("truncated");
        assert!(matches!(err.kind(), ErrorKind::UnexpectedEOF));
    }

    #[test]
    fn line_without_space() {
        let err = parse(b"a 1\nbogus\n\n", ErrorKind::MalformedTag).expect_err("malformed");
        assert!(matches!(err.kind(), ErrorKind::MalformedTag(_)));
    }

    #[test]
    fn leading_continuation() {
        let err = parse(b" a 1\n\n", ErrorKind::MalformedCommit).expect_err("malformed");
        assert!(matches!(err.kind(), ErrorKind::MalformedCommit(_)));
    }
}
