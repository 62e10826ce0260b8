use std::io::{ BufRead, Write };

use crate::errors::{ ErrorKind, Result };
use crate::objects::Type;

/// The `<kind> SP <decimal length> NUL` prefix of a loose object.
///
/// The declared size is advisory: it is returned as read, and comparing it
/// against the body is left to whoever owns the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: Type,
    pub size: u64
}

impl Header {
    pub fn new(kind: Type, size: u64) -> Self {
        Header { kind, size }
    }

    /// Consume the header from `reader`, leaving it positioned at the body.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Header> {
        let mut type_vec = Vec::new();
        let mut size_vec = Vec::new();

        reader.read_until(b' ', &mut type_vec)?;
        if type_vec.pop() != Some(b' ') {
            return Err(ErrorKind::UnexpectedEOF.into())
        }
        let kind = Type::from_bytes(&type_vec)?;

        reader.read_until(0, &mut size_vec)?;
        let terminated = size_vec.last() == Some(&0);
        if terminated {
            size_vec.pop();
        }

        if size_vec.iter().any(|xs| !xs.is_ascii_digit()) {
            return Err(ErrorKind::MalformedHeader.into())
        }

        if !terminated {
            return Err(ErrorKind::UnexpectedEOF.into())
        }

        // digits only, so this is valid utf8; it can still be empty or overflow
        let size = std::str::from_utf8(&size_vec)
            .ok()
            .and_then(|xs| xs.parse::<u64>().ok())
            .ok_or(ErrorKind::MalformedHeader)?;

        Ok(Header { kind, size })
    }

    /// Split a header off the front of an in-memory object.
    pub fn parse(input: &[u8]) -> Result<(Header, &[u8])> {
        let mut body = input;
        let header = Header::read(&mut body)?;
        Ok((header, body))
    }

    pub fn write<W: Write>(&self, output: &mut W) -> Result<()> {
        write!(output, "{} {}\0", self.kind, self.size)?;
        Ok(())
    }
}
