use std::io::Write;

use crate::errors::Result;

/// File contents, kept exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    contents: Vec<u8>
}

impl Blob {
    pub fn new(contents: Vec<u8>) -> Self {
        Blob { contents }
    }

    pub fn load(body: &[u8]) -> Result<Blob> {
        Ok(Blob::new(body.to_vec()))
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.contents
    }

    pub fn encode<W: Write>(&self, output: &mut W) -> Result<()> {
        output.write_all(&self.contents)?;
        Ok(())
    }
}
