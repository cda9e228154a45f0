/// parse document with structure like
/// ```text
/// title1
///  key1: value1, value2
///  key2: value3
/// title2
///  key3: value4
/// ```
/// into titled sections of key -> vector of values. Lines starting with `//`, `#`, `%` or `;`
/// are comments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, not, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

pub type SectionMap = HashMap<String, Vec<Value>>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    Io(String),
    Syntax(String),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Io(msg) => write!(f, "cannot read document: {}", msg),
            DocumentError::Syntax(rest) => write!(f, "cannot parse document near '{}'", rest),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Parsed document: section title -> (key -> values).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    sections: HashMap<String, SectionMap>,
}

impl Document {
    pub fn section(&self, title: &str) -> Option<&SectionMap> {
        self.sections.get(title)
    }

    pub fn get(&self, title: &str, key: &str) -> Option<&[Value]> {
        self.sections
            .get(title)
            .and_then(|section| section.get(key))
            .map(|values| values.as_slice())
    }

    /// The first value of a key, if the key is present and not empty.
    pub fn first(&self, title: &str, key: &str) -> Option<&Value> {
        self.get(title, key).and_then(|values| values.first())
    }

    pub fn titles(&self) -> Vec<&String> {
        let mut titles: Vec<&String> = self.sections.keys().collect();
        titles.sort();
        titles
    }
}

fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// a single value runs up to a comma, whitespace or semicolon
fn value_text(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';')).parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    let (input, text) = value_text(input)?;
    let value = if let Ok(val) = text.parse::<i64>() {
        Value::Integer(val)
    } else if let Ok(val) = text.parse::<f64>() {
        Value::Float(val)
    } else if let Ok(val) = text.parse::<bool>() {
        Value::Boolean(val)
    } else {
        Value::String(text.to_string())
    };
    Ok((input, value))
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator = delimited(space0, tag(","), space0);
    separated_list0(separator, parse_value).parse(input)
}

/// key: value1, value2
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon = delimited(space0, char(':'), space0);
    terminated(separated_pair(identifier, colon, parse_value_list), space0).parse(input)
}

/// A title (not followed by a colon) and its key-value pairs.
fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = terminated(identifier, not(preceded(space0, char(':')))).parse(input)?;
    let (input, pairs) = many0(preceded(multispace0, parse_key_value_pair)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document. An empty document (or one made of comments) is valid.
/// Sections with the same title are merged, later keys winning.
pub fn parse_document(input: &str) -> Result<Document, DocumentError> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Ok(Document::default());
    }
    let mut parser = many1(preceded(multispace0, parse_section));
    let (rest, sections) = parser
        .parse(filtered.as_str())
        .map_err(|e| DocumentError::Syntax(format!("{:?}", e)))?;
    let rest = rest.trim();
    if !rest.is_empty() {
        return Err(DocumentError::Syntax(rest.chars().take(24).collect()));
    }
    let mut document = Document::default();
    for (title, section) in sections {
        document.sections.entry(title).or_default().extend(section);
    }
    Ok(document)
}

pub fn read_document(path: &Path) -> Result<Document, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentError::Io(format!("{}: {}", path.display(), e)))?;
    parse_document(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("value1, value2").unwrap();
        assert_eq!(value, Value::String("value1".to_string()));
        assert_eq!(remaining, ", value2");

        let (_, value) = parse_value("123").unwrap();
        assert_eq!(value, Value::Integer(123));
        let (_, value) = parse_value("0.5").unwrap();
        assert_eq!(value, Value::Float(0.5));
        let (_, value) = parse_value("true").unwrap();
        assert_eq!(value, Value::Boolean(true));
        let (_, value) = parse_value("calc_{time}.log").unwrap();
        assert_eq!(value, Value::String("calc_{time}.log".to_string()));
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) = parse_key_value_pair("key1 : a, 2,3.5\nnext").unwrap();
        assert_eq!(key, "key1");
        assert_eq!(
            values,
            vec![
                Value::String("a".to_string()),
                Value::Integer(2),
                Value::Float(3.5)
            ]
        );
        assert_eq!(remaining, "\nnext");
    }

    #[test]
    fn test_parse_document() {
        let input = "
            // calculator settings
            display
              history_window: 5
              output: plain
            logging
              level: info
              file: calc_{time}.log
        ";
        let document = parse_document(input).unwrap();
        assert_eq!(document.titles(), vec!["display", "logging"]);
        assert_eq!(
            document.first("display", "history_window"),
            Some(&Value::Integer(5))
        );
        assert_eq!(
            document.first("display", "output").and_then(|v| v.as_string()).map(|s| s.as_str()),
            Some("plain")
        );
        assert_eq!(document.get("logging", "level").map(|v| v.len()), Some(1));
        assert!(document.get("logging", "missing").is_none());
        assert!(document.section("absent").is_none());
    }

    #[test]
    fn test_single_line_and_empty_sections() {
        let document = parse_document("display history_window: 3 logging").unwrap();
        assert_eq!(document.first("display", "history_window"), Some(&Value::Integer(3)));
        assert!(document.section("logging").unwrap().is_empty());
    }

    #[test]
    fn test_empty_and_comment_only_documents() {
        assert_eq!(parse_document("").unwrap(), Document::default());
        assert_eq!(parse_document("# nothing\n% here\n").unwrap(), Document::default());
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(parse_document(": value"), Err(DocumentError::Syntax(_))));
        assert!(matches!(
            parse_document("display\n history_window: 5\n !!!"),
            Err(DocumentError::Syntax(_))
        ));
    }

    #[test]
    fn test_read_document_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calc.conf");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "display\n precision: 7").unwrap();
        let document = read_document(&path).unwrap();
        assert_eq!(document.first("display", "precision"), Some(&Value::Integer(7)));
        assert!(matches!(
            read_document(&dir.path().join("missing.conf")),
            Err(DocumentError::Io(_))
        ));
    }
}
