use flate2::bufread::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::prelude::*;
use std::io::BufReader;
use tracing::{ debug, trace };

use crate::errors::{ ErrorKind, Result };
use crate::objects::Object;
use crate::id::Id;

type Reader = dyn Fn(&Id) -> Result<Option<Box<dyn std::io::Read>>> + Send + Sync;

/// Loose objects, found through a closure that maps an id to a readable
/// zlib stream (or `None` if there is no such object).
pub struct Store {
    read: Box<Reader>
}

impl Store {
    pub fn new<C>(func: C) -> Self
        where C: Fn(&Id) -> Result<Option<Box<dyn std::io::Read>>> + 'static + Send + Sync {
        Store {
            read: Box::new(func)
        }
    }

    pub fn get(&self, id: &Id) -> Result<Option<Object>> {
        let maybe_reader = (self.read)(id)?;
        let handle = match maybe_reader {
            Some(xs) => xs,
            None => {
                trace!(%id, "no loose object");
                return Ok(None)
            }
        };

        let mut reader = BufReader::new(
            ZlibDecoder::new(BufReader::new(handle))
        );

        let object = read(&mut reader)?;
        debug!(%id, kind = %object.kind(), "loaded loose object");
        Ok(Some(object))
    }
}

/// Read an inflated loose object, holding the body to its declared length.
pub fn read<R: BufRead>(reader: &mut R) -> Result<Object> {
    let (header, object, actual) = Object::read(reader)?;
    if header.size != actual {
        return Err(ErrorKind::LengthMismatch(header.size, actual).into())
    }
    Ok(object)
}

/// Deflate `object` into its loose form, returning its id alongside.
pub fn encode(object: &Object) -> Result<(Id, Vec<u8>)> {
    let raw = object.to_loose_bytes()?;
    let id = Id::digest(&raw);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    Ok((id, encoder.finish()?))
}
