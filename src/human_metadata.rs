use chrono::{ DateTime, FixedOffset, Utc };
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::errors::{ Error, ErrorKind, Result };

/// Metadata about a human taking an action in the Git database.
/// This includes information about the human's name, email, the UNIX epoch instant they took the
/// action, and the timezone offset at the time they took the action.
///
/// Most commonly, you'll see this information in a commit as the Author
/// or Committer data. See this output from `git log --pretty=raw`:
///
/// ```text
/// commit a8fefd7db9817724b9202fac41cb9f4183229920
/// tree 36a82dd9132a48f3beb8543c9ad174ec391111da
/// parent 52a9830591232fbabe56fba67200e09e53ff560e
/// author Chris Dickinson <chris@neversaw.us> 1650783883 -0700
/// committer Chris Dickinson <chris@neversaw.us> 1650784360 -0700
///
///    golf down the commit identity parser
///
/// ```
///
/// `HumanMetadata` holds the value after the `author `/`committer `/`tagger `
/// label. The bytes it was parsed from are kept and are what gets written
/// back out; the parsed fields are views into them. The email is whatever
/// sits between the brackets, so `a@b, c@d` is one email.
///
/// The ` <seconds> <+|-hhmm>` suffix is optional. When it is missing,
/// `raw_at` and `raw_offset` are `None`.
#[derive(Debug, Clone)]
pub struct HumanMetadata {
    data: Vec<u8>,
    offsets: Offsets,
    at: OnceCell<Option<DateTime<FixedOffset>>>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Offsets {
    name_end: usize,
    email_start: usize,
    email_end: usize,

    // (time_start, offset_start); the timestamp ends one byte before the offset
    when: Option<(usize, usize)>
}

/// The fields of a person line, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Date,
    Timezone
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Field> {
        match s {
            "Name" | "name" => Ok(Field::Name),
            "Email" | "email" => Ok(Field::Email),
            "Date" | "date" => Ok(Field::Date),
            "Timezone" | "timezone" => Ok(Field::Timezone),
            _ => Err(format!("no person field named '{}'", s).into())
        }
    }
}

impl Offsets {
    fn new(input: &[u8]) -> Result<Self> {
        #[derive(Debug)]
        enum Mode {
            FindEmailEnd,
            FindEmailStart(usize),
            Done((usize, usize))
        }

        let mut mode = Mode::FindEmailEnd;

        // Chris Dickinson <christopher.s.dickinson@gmail.com> 1546491006 -0800
        for (idx, &ch) in input.iter().enumerate().rev() {
            mode = match (ch, mode) {
                (b'>', Mode::FindEmailEnd)            => Mode::FindEmailStart(idx),
                (_,    Mode::FindEmailEnd)            => Mode::FindEmailEnd,

                (b'<', Mode::FindEmailStart(end))     => Mode::Done((idx + 1, end)),
                (_,    Mode::FindEmailStart(end))     => Mode::FindEmailStart(end),

                (_,    mode @ Mode::Done(_))          => mode
            };

            if let Mode::Done(_) = &mode {
                break
            }
        }

        let (email_start, email_end) = match mode {
            Mode::Done(xs) => xs,
            _ => return Err(malformed(input))
        };

        // one space separates the name from the email; any others are part of the name
        let name_end = match email_start {
            1 => 0,
            _ if input[email_start - 2] == b' ' => email_start - 2,
            _ => email_start - 1
        };

        let suffix_start = email_end + 1;
        let when = match parse_when(&input[suffix_start..]) {
            Some((time_start, offset_start)) => Some((suffix_start + time_start, suffix_start + offset_start)),
            None if suffix_start == input.len() => None,
            None => return Err(malformed(input))
        };

        Ok(Offsets {
            name_end,
            email_start,
            email_end,
            when
        })
    }
}

// Match ` <digits> <sign><4 digits>` exactly, returning where the digits and
// the offset start.
fn parse_when(suffix: &[u8]) -> Option<(usize, usize)> {
    let rest = suffix.strip_prefix(b" ")?;
    let digits = rest.iter().take_while(|xs| xs.is_ascii_digit()).count();
    if digits == 0 {
        return None
    }

    match rest[digits..].strip_prefix(b" ")? {
        [sign, offset @ ..] if (*sign == b'+' || *sign == b'-')
            && offset.len() == 4
            && offset.iter().all(u8::is_ascii_digit) => Some((1, 2 + digits)),
        _ => None
    }
}

fn malformed(input: &[u8]) -> Error {
    ErrorKind::MalformedPersonLine(String::from_utf8_lossy(input).into_owned()).into()
}

impl HumanMetadata {
    pub fn parse(input: &[u8]) -> Result<Self> {
        let offsets = Offsets::new(input)?;
        Ok(HumanMetadata {
            data: input.to_vec(),
            offsets,
            at: OnceCell::new()
        })
    }

    /// Build the canonical `name <email>[ seconds offset]` text from parts.
    ///
    /// Fails if the parts would not read back as themselves.
    pub fn from_parts(name: &[u8], email: &[u8], when: Option<(&[u8], &[u8])>) -> Result<Self> {
        let data = canonical(name, email, when);
        let parsed = HumanMetadata::parse(&data)?;

        if parsed.raw_name() != name || parsed.raw_email() != email || parsed.raw_when() != when {
            return Err(malformed(&data))
        }

        Ok(parsed)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// The verbatim bytes this value was parsed from.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Rebuild the text from the parsed fields alone.
    ///
    /// This matches `as_bytes` for anything git writes; a difference means
    /// the line carried something the fields cannot express.
    pub fn reconstruct(&self) -> Vec<u8> {
        canonical(self.raw_name(), self.raw_email(), self.raw_when())
    }

    pub fn raw_name(&self) -> &[u8] {
        &self.data[0..self.offsets.name_end]
    }

    pub fn raw_email(&self) -> &[u8] {
        &self.data[self.offsets.email_start..self.offsets.email_end]
    }

    pub fn raw_at(&self) -> Option<&[u8]> {
        self.offsets.when.map(|(time_start, offset_start)| {
            &self.data[time_start..offset_start - 1]
        })
    }

    pub fn raw_offset(&self) -> Option<&[u8]> {
        self.offsets.when.map(|(_, offset_start)| &self.data[offset_start..])
    }

    fn raw_when(&self) -> Option<(&[u8], &[u8])> {
        self.raw_at().zip(self.raw_offset())
    }

    pub fn get(&self, field: Field) -> Option<&[u8]> {
        match field {
            Field::Name => Some(self.raw_name()),
            Field::Email => Some(self.raw_email()),
            Field::Date => self.raw_at(),
            Field::Timezone => self.raw_offset()
        }
    }

    /// Look a field up by name (`Name`, `Email`, `Date`, `Timezone`).
    /// Unknown names and absent optional fields both come back `None`.
    pub fn lookup(&self, field: &str) -> Option<&[u8]> {
        self.get(field.parse().ok()?)
    }

    pub fn name(&self) -> Cow<str> {
        String::from_utf8_lossy(self.raw_name())
    }

    pub fn email(&self) -> Cow<str> {
        String::from_utf8_lossy(self.raw_email())
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let seconds = std::str::from_utf8(self.raw_at()?).ok()?.parse::<i64>().ok()?;
        DateTime::<Utc>::from_timestamp(seconds, 0)
    }

    /// `None` when absent, or when the offset is out of chrono's range (`+4321`).
    pub fn timezone_offset(&self) -> Option<FixedOffset> {
        let raw = self.raw_offset()?;
        let digits = std::str::from_utf8(&raw[1..]).ok()?;
        let hours: i32 = digits[0..2].parse().ok()?;
        let minutes: i32 = digits[2..4].parse().ok()?;
        let seconds = hours * 60 * 60 + minutes * 60;

        match raw[0] {
            b'-' => FixedOffset::west_opt(seconds),
            _ => FixedOffset::east_opt(seconds)
        }
    }

    /// The instant in the author's own timezone.
    pub fn at(&self) -> Option<&DateTime<FixedOffset>> {
        self.at.get_or_init(|| {
            let offset = self.timezone_offset()?;
            self.timestamp().map(|ts| ts.with_timezone(&offset))
        }).as_ref()
    }
}

fn canonical(name: &[u8], email: &[u8], when: Option<(&[u8], &[u8])>) -> Vec<u8> {
    let mut data = Vec::with_capacity(name.len() + email.len() + 32);
    data.extend_from_slice(name);
    data.extend_from_slice(b" <");
    data.extend_from_slice(email);
    data.push(b'>');
    if let Some((at, offset)) = when {
        data.push(b' ');
        data.extend_from_slice(at);
        data.push(b' ');
        data.extend_from_slice(offset);
    }
    data
}

impl PartialEq for HumanMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for HumanMetadata {}

impl fmt::Display for HumanMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}
