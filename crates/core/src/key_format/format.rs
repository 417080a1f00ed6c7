//! Key format templates.
//!
//! A key format is literal text with placeholders, for example
//! `USER#{email|lower|md5}`. A placeholder names an item field and an optional
//! chain of filters applied left to right. `{{` and `}}` produce literal
//! braces.

use serde_json::{Map, Value};

use super::error::{KeyFormatError, Result};
use super::resolver::KeyFormatResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { field: String, filters: Vec<String> },
}

/// A parsed key format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFormat {
    source: String,
    segments: Vec<Segment>,
}

impl KeyFormat {
    /// Parse a key format template.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(KeyFormatError::NestedPlaceholder(source.to_string())),
                            c => body.push(c),
                        }
                    }
                    if !closed {
                        return Err(KeyFormatError::Unterminated(source.to_string()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(source, &body)?);
                }
                '}' => return Err(KeyFormatError::UnmatchedBrace(source.to_string())),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template this format was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Item fields referenced by placeholders, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder { field, .. } => Some(field.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Filter names used by placeholders, in order of appearance.
    pub fn filters(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder { filters, .. } => Some(filters.iter().map(String::as_str)),
                Segment::Literal(_) => None,
            })
            .flatten()
    }

    /// Render the key from item field values.
    ///
    /// Without a resolver, any placeholder that names a filter fails with
    /// [`KeyFormatError::UnknownFilter`].
    pub fn render(
        &self,
        values: &Map<String, Value>,
        resolver: Option<&KeyFormatResolver>,
    ) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { field, filters } => {
                    let mut value = field_value(values, field)?;
                    for name in filters {
                        let filter = resolver
                            .and_then(|r| r.filter(name))
                            .ok_or_else(|| KeyFormatError::UnknownFilter(name.clone()))?;
                        value = filter.apply(&value);
                    }
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

fn parse_placeholder(source: &str, body: &str) -> Result<Segment> {
    let mut parts = body.split('|').map(str::trim);
    let field = match parts.next() {
        Some(field) if !field.is_empty() => field.to_string(),
        _ => return Err(KeyFormatError::EmptyPlaceholder(source.to_string())),
    };

    let mut filters = Vec::new();
    for name in parts {
        if name.is_empty() {
            return Err(KeyFormatError::EmptyFilter(source.to_string()));
        }
        filters.push(name.to_string());
    }

    Ok(Segment::Placeholder { field, filters })
}

fn field_value(values: &Map<String, Value>, field: &str) -> Result<String> {
    match values.get(field) {
        None | Some(Value::Null) => Err(KeyFormatError::MissingField(field.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(KeyFormatError::InvalidValue(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_parse_literal_only() {
        let format = KeyFormat::parse("CONFIG").unwrap();
        assert_eq!(format.fields().count(), 0);
        assert_eq!(format.render(&Map::new(), None).unwrap(), "CONFIG");
    }

    #[test]
    fn test_render_placeholders() {
        let format = KeyFormat::parse("USER#{id}#{version}").unwrap();
        let rendered = format
            .render(&values(json!({"id": "abc", "version": 3})), None)
            .unwrap();

        assert_eq!(rendered, "USER#abc#3");
        assert_eq!(format.fields().collect::<Vec<_>>(), vec!["id", "version"]);
    }

    #[test]
    fn test_filters_listed_in_order() {
        let format = KeyFormat::parse("EMAIL#{ email | lower | md5 }#{kind|upper}").unwrap();
        assert_eq!(
            format.filters().collect::<Vec<_>>(),
            vec!["lower", "md5", "upper"]
        );
        assert_eq!(format.fields().collect::<Vec<_>>(), vec!["email", "kind"]);
    }

    #[test]
    fn test_escaped_braces() {
        let format = KeyFormat::parse("{{literal}}#{id}").unwrap();
        let rendered = format.render(&values(json!({"id": 1})), None).unwrap();
        assert_eq!(rendered, "{literal}#1");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            KeyFormat::parse("USER#{id"),
            Err(KeyFormatError::Unterminated(_))
        ));
        assert!(matches!(
            KeyFormat::parse("USER#id}"),
            Err(KeyFormatError::UnmatchedBrace(_))
        ));
        assert!(matches!(
            KeyFormat::parse("USER#{a{b}}"),
            Err(KeyFormatError::NestedPlaceholder(_))
        ));
        assert!(matches!(
            KeyFormat::parse("USER#{ }"),
            Err(KeyFormatError::EmptyPlaceholder(_))
        ));
        assert!(matches!(
            KeyFormat::parse("USER#{id|}"),
            Err(KeyFormatError::EmptyFilter(_))
        ));
    }

    #[test]
    fn test_missing_and_invalid_values() {
        let format = KeyFormat::parse("USER#{id}").unwrap();

        assert_eq!(
            format.render(&Map::new(), None),
            Err(KeyFormatError::MissingField("id".to_string()))
        );
        assert_eq!(
            format.render(&values(json!({"id": null})), None),
            Err(KeyFormatError::MissingField("id".to_string()))
        );
        assert_eq!(
            format.render(&values(json!({"id": ["a"]})), None),
            Err(KeyFormatError::InvalidValue("id".to_string()))
        );
    }

    #[test]
    fn test_filter_without_resolver_is_unknown() {
        let format = KeyFormat::parse("USER#{id|upper}").unwrap();
        assert_eq!(
            format.render(&values(json!({"id": "abc"})), None),
            Err(KeyFormatError::UnknownFilter("upper".to_string()))
        );
    }
}
