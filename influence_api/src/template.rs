//! Path templates with `:name` placeholders (`/aggregates/pol/:entity_id/contributors.json`).
//!
//! A placeholder is a `:` followed by an identifier (`[A-Za-z_][A-Za-z0-9_]*`)
//! and may sit inside a segment, as in `top_:limit.json`. A colon that is not
//! followed by an identifier character is kept literally.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::TemplateError;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(String),
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    parts: Vec<Part>,
}

impl UriTemplate {
    /// Parses a template, rejecting placeholders that appear twice.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            let starts_name = matches!(chars.peek(), Some(n) if n.is_ascii_alphabetic() || *n == '_');
            if c != ':' || !starts_name {
                literal.push(c);
                continue;
            }
            let mut name = String::new();
            while let Some(&n) = chars.peek() {
                if n.is_ascii_alphanumeric() || n == '_' {
                    name.push(n);
                    chars.next();
                } else {
                    break;
                }
            }
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            if parts.contains(&Part::Placeholder(name.clone())) {
                return Err(TemplateError::DuplicatePlaceholder {
                    template: raw.to_string(),
                    placeholder: name,
                });
            }
            parts.push(Part::Placeholder(name));
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    /// The template as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            Part::Placeholder(name) => Some(name.as_str()),
            Part::Literal(_) => None,
        })
    }

    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders().any(|p| p == name)
    }

    /// Substitutes every placeholder with its percent-encoded value.
    ///
    /// `lookup` returns `None` for names it cannot supply, which fails the
    /// whole expansion with [`TemplateError::Unresolved`]. Values `.` and `..`
    /// fail with [`TemplateError::DotSegment`].
    pub fn expand<V, F>(&self, lookup: F) -> Result<String, TemplateError>
    where
        V: AsRef<str>,
        F: Fn(&str) -> Option<V>,
    {
        let mut out = String::with_capacity(self.raw.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder(name) => {
                    let value = lookup(name).ok_or_else(|| TemplateError::Unresolved {
                        template: self.raw.clone(),
                        placeholder: name.clone(),
                    })?;
                    if matches!(value.as_ref(), "." | "..") {
                        return Err(TemplateError::DotSegment {
                            template: self.raw.clone(),
                            placeholder: name.clone(),
                        });
                    }
                    out.extend(utf8_percent_encode(value.as_ref(), PATH_SEGMENT));
                }
            }
        }
        Ok(out)
    }
}

impl serde::Serialize for UriTemplate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl std::fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
