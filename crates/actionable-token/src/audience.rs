//! The `aud` claim: a single string or an array of strings

use miniserde::de::{Deserialize, Seq, Visitor};
use miniserde::make_place;
use std::fmt;
use std::mem;

make_place!(Place);

/// Audience of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// The audience when the token names exactly one
    pub fn single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(values) if values.len() == 1 => Some(&values[0]),
            Self::Multiple(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values = match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values.as_slice(),
        };
        values.iter().map(String::as_str)
    }

    /// Ordinal match against any entry
    pub fn contains(&self, audience: &str) -> bool {
        self.iter().any(|value| value == audience)
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Self::Single(value.into())
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => f.write_str(value),
            Self::Multiple(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

impl Visitor for Place<Audience> {
    fn string(&mut self, s: &str) -> miniserde::Result<()> {
        self.out = Some(Audience::Single(s.to_owned()));
        Ok(())
    }

    fn seq(&mut self) -> miniserde::Result<Box<dyn Seq + '_>> {
        Ok(Box::new(AudienceSeq {
            out: &mut self.out,
            values: Vec::new(),
            element: None,
        }))
    }
}

struct AudienceSeq<'a> {
    out: &'a mut Option<Audience>,
    values: Vec<String>,
    element: Option<String>,
}

impl Seq for AudienceSeq<'_> {
    fn element(&mut self) -> miniserde::Result<&mut dyn Visitor> {
        self.values.extend(self.element.take());
        Ok(Deserialize::begin(&mut self.element))
    }

    fn finish(&mut self) -> miniserde::Result<()> {
        self.values.extend(self.element.take());
        *self.out = Some(Audience::Multiple(mem::take(&mut self.values)));
        Ok(())
    }
}

impl Deserialize for Audience {
    fn begin(out: &mut Option<Self>) -> &mut dyn Visitor {
        Place::new(out)
    }
}
