//! Output file name templates.
//!
//! A template is literal text with `{field}` placeholders, parsed once at
//! startup so that a bad template is reported before any job runs.

use std::fmt;

use super::{NamingError, NamingResult};

/// Placeholder names a template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    /// Input file name without its final extension.
    Basename,
    /// Sanitized offset tag.
    Tag,
    /// Four-digit numeric suffix.
    Suffix,
    /// Input extension without the dot.
    Ext,
    /// 1-based segment number (split only).
    Index,
}

impl TemplateField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "basename" => Some(TemplateField::Basename),
            "tag" => Some(TemplateField::Tag),
            "suffix" => Some(TemplateField::Suffix),
            "ext" => Some(TemplateField::Ext),
            "index" => Some(TemplateField::Index),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TemplateField::Basename => "basename",
            TemplateField::Tag => "tag",
            TemplateField::Suffix => "suffix",
            TemplateField::Ext => "ext",
            TemplateField::Index => "index",
        }
    }
}

impl fmt::Display for TemplateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(TemplateField),
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct NameParts<'a> {
    pub basename: &'a str,
    pub tag: Option<&'a str>,
    pub suffix: u32,
    pub extension: &'a str,
    pub index: Option<u32>,
}

/// A parsed output file name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl OutputTemplate {
    /// Parse a template such as `{basename}_{tag}_{suffix}.{ext}`.
    ///
    /// Fails on unknown placeholders, unbalanced braces, path separators,
    /// and templates without `{basename}`.
    pub fn parse(template: &str) -> NamingResult<Self> {
        let invalid = |message: &str| NamingError::InvalidTemplate {
            template: template.to_string(),
            message: message.to_string(),
        };

        if template.contains(['/', '\\']) {
            return Err(invalid("path separators are not allowed"));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        if inner == '{' {
                            return Err(invalid("nested '{'"));
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(invalid("unclosed '{'"));
                    }
                    let field = TemplateField::from_name(&name)
                        .ok_or_else(|| invalid(&format!("unknown placeholder {{{}}}", name)))?;

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(invalid("unmatched '}'")),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let template = Self {
            source: template.to_string(),
            segments,
        };

        if !template.uses(TemplateField::Basename) {
            return Err(invalid("{basename} is required"));
        }

        Ok(template)
    }

    /// The template text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the template contains the given placeholder.
    pub fn uses(&self, field: TemplateField) -> bool {
        self.segments.contains(&Segment::Field(field))
    }

    /// Substitute values into the template.
    pub fn render(&self, parts: &NameParts<'_>) -> NamingResult<String> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => match field {
                    TemplateField::Basename => out.push_str(parts.basename),
                    TemplateField::Tag => {
                        let tag = parts
                            .tag
                            .ok_or(NamingError::MissingField { field: *field })?;
                        out.push_str(tag);
                    }
                    TemplateField::Suffix => out.push_str(&parts.suffix.to_string()),
                    TemplateField::Ext => out.push_str(parts.extension),
                    TemplateField::Index => {
                        let index = parts
                            .index
                            .ok_or(NamingError::MissingField { field: *field })?;
                        out.push_str(&index.to_string());
                    }
                },
            }
        }

        Ok(out)
    }
}

impl fmt::Display for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
