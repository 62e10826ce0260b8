use sha1::{ Digest, Sha1 };
use std::fmt;
use std::str::FromStr;

use crate::errors::{ Error, ErrorKind, Result };

/// Width in bytes of a raw object hash.
pub const ID_LEN: usize = 20;

/// A raw, fixed-width object hash.
///
/// Commit and tag headers carry ids as 40 hex characters; tree entries carry
/// the 20 raw bytes directly.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id {
    id: [u8; ID_LEN]
}

impl fmt::Debug for Id {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "Id({})", hex::encode(self.id))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        hex::encode(self.id).fmt(formatter)
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        &self.id
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(id: [u8; ID_LEN]) -> Self {
        Id { id }
    }
}

impl FromStr for Id {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Id::from_hex(s.as_bytes())
    }
}

impl Id {
    /// Decode 40 lowercase hex characters. Anything else is a `MalformedHash`:
    /// uppercase digits would not survive re-encoding.
    pub fn from_hex(inp: &[u8]) -> Result<Id> {
        let mut id = [0u8; ID_LEN];
        let lowercase = inp.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if inp.len() != ID_LEN * 2 || !lowercase || hex::decode_to_slice(inp, &mut id).is_err() {
            return Err(ErrorKind::MalformedHash(
                String::from_utf8_lossy(inp).into_owned()
            ).into())
        }
        Ok(Id { id })
    }

    pub fn from_bytes(inp: &[u8]) -> Result<Id> {
        if inp.len() != ID_LEN {
            return Err(ErrorKind::MalformedHash(hex::encode(inp)).into())
        }
        let mut id = [0u8; ID_LEN];
        id.copy_from_slice(inp);
        Ok(Id { id })
    }

    /// SHA-1 of `data`. For an object id, `data` must include the header.
    pub fn digest(data: &[u8]) -> Id {
        let mut hasher = Sha1::new();
        hasher.update(data);
        let mut id = [0u8; ID_LEN];
        id.copy_from_slice(&hasher.finalize());
        Id { id }
    }

    pub fn bytes(&self) -> &[u8; ID_LEN] {
        &self.id
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.id)
    }
}
