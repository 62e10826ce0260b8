use std::io::Write;

use crate::attributes::{ self, write_attribute, Attribute };
use crate::errors::{ ErrorKind, Result };
use crate::human_metadata::HumanMetadata;
use crate::objects::Type;
use crate::id::Id;

/// An annotated tag.
///
/// `object`, `type` and `tag` are required; `tagger` is missing on some old
/// tags. Any other header is kept in order and written after `tagger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    object: Id,
    kind: Type,
    name: Vec<u8>,
    tagger: Option<HumanMetadata>,
    extra: Vec<Attribute>,
    message: Vec<u8>
}

impl Tag {
    pub fn new(
        object: Id,
        kind: Type,
        name: Vec<u8>,
        tagger: Option<HumanMetadata>,
        extra: Vec<Attribute>,
        message: Vec<u8>
    ) -> Self {
        Tag {
            object,
            kind,
            name,
            tagger,
            extra,
            message
        }
    }

    pub fn object(&self) -> &Id {
        &self.object
    }

    /// The type the tag claims its object has. Whether it really does is
    /// not checked here.
    pub fn kind(&self) -> Type {
        self.kind
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn tagger(&self) -> Option<&HumanMetadata> {
        self.tagger.as_ref()
    }

    pub fn extra_headers(&self) -> &[Attribute] {
        &self.extra
    }

    pub fn message(&self) -> &[u8] {
        self.message.as_slice()
    }

    pub fn load(body: &[u8]) -> Result<Tag> {
        let headers = attributes::parse(body, ErrorKind::MalformedTag)?;

        let mut object = None;
        let mut kind = None;
        let mut name = None;
        let mut tagger = None;
        let mut extra = Vec::new();

        for line in &headers.lines {
            match line.key {
                b"object" => {
                    once(&object, "object")?;
                    object = Some(Id::from_hex(line.value)?);
                },
                b"type" => {
                    once(&kind, "type")?;
                    kind = Some(Type::from_bytes(line.value)?);
                },
                b"tag" => {
                    once(&name, "tag")?;
                    name = Some(line.value.to_vec());
                },
                b"tagger" => {
                    once(&tagger, "tagger")?;
                    tagger = Some(HumanMetadata::parse(line.value)?);
                },
                _ => extra.push(line.to_attribute())
            }
        }

        let object = object.ok_or(ErrorKind::MissingRequiredField("object"))?;
        let kind = kind.ok_or(ErrorKind::MissingRequiredField("type"))?;
        let name = name.ok_or(ErrorKind::MissingRequiredField("tag"))?;
        let message = headers.message.ok_or(ErrorKind::UnexpectedEOF)?;

        Ok(Tag {
            object,
            kind,
            name,
            tagger,
            extra,
            message: message.to_vec()
        })
    }

    pub fn encode<W: Write>(&self, output: &mut W) -> Result<()> {
        write_attribute(output, b"object", self.object.to_hex().as_bytes())?;
        write_attribute(output, b"type", self.kind.as_str().as_bytes())?;
        write_attribute(output, b"tag", &self.name)?;
        if let Some(tagger) = &self.tagger {
            write_attribute(output, b"tagger", tagger.as_bytes())?;
        }
        for attribute in &self.extra {
            attribute.write(output)?;
        }
        output.write_all(b"\n")?;
        output.write_all(&self.message)?;
        Ok(())
    }
}

fn once<T>(seen: &Option<T>, field: &str) -> Result<()> {
    match seen {
        Some(_) => Err(ErrorKind::MalformedTag(format!("more than one '{}' line", field)).into()),
        None => Ok(())
    }
}
