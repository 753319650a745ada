//! Document model: front matter metadata plus an opaque body.
//!
//! # Front Matter
//!
//! A document starts with a fenced metadata block. The fence selects the
//! format:
//!
//! | Fence | Format |
//! |-------|--------|
//! | `---` | YAML   |
//! | `+++` | TOML   |
//!
//! ```text
//! ---
//! title: JavaScript Fundamentals
//! author: Jane
//! date: 2025-01-12
//! category: javascript
//! tags: [basics, web]
//! ---
//! Body text, passed through untouched.
//! ```
//!
//! # Recognized Fields
//!
//! | Field                   | Type            | Required |
//! |-------------------------|-----------------|----------|
//! | `title`                 | string          | yes      |
//! | `author`                | string          | yes (or site default) |
//! | `date`                  | date string     | yes      |
//! | `category`/`collection` | string          | no, defaults to [`UNCATEGORIZED`] |
//! | `tags`                  | list of strings | no       |
//! | `excerpt`               | string          | no       |
//! | `toc`                   | bool            | no       |
//! | `slug`                  | string          | no       |
//! | `draft`                 | bool            | no       |
//!
//! String fields also accept a bare number, read in its written form.
//! Every other key is kept as-is in [`DocumentMeta::extra`].

use crate::{date::PublishDate, error::BuildError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Collection assigned to documents that declare none.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Front matter syntax, chosen by the opening fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
}

impl FrontMatterFormat {
    const fn fence(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }

    fn from_fence(line: &str) -> Option<Self> {
        match line.trim_end() {
            "---" => Some(Self::Yaml),
            "+++" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Split raw text into `(format, front matter, body)`.
///
/// Returns `None` when the text does not open with a fence or the block is
/// never closed. The body is everything after the closing fence line.
pub fn split_front_matter(raw: &str) -> Option<(FrontMatterFormat, &str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let (first, rest) = raw.split_once('\n')?;
    let format = FrontMatterFormat::from_fence(first)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == format.fence() {
            return Some((format, &rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Options applied while parsing documents.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Author used when a document has no `author` field.
    pub default_author: Option<String>,
}

/// Validated metadata of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMeta {
    pub title: String,
    pub author: String,
    pub date: PublishDate,
    /// Declared collection, `None` when the document declares none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub toc: bool,
    /// Route override for the title part of the path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    /// Unrecognized front matter keys, passed through opaquely.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// A loaded content unit. Identity is its source path.
///
/// Documents are immutable once parsed; a rebuild parses again from source.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    source: PathBuf,
    meta: DocumentMeta,
    body: String,
}

impl Document {
    /// Parse a document with default options.
    pub fn parse(source: impl Into<PathBuf>, raw: &str) -> Result<Self, BuildError> {
        Self::parse_with(source, raw, &ParseOptions::default())
    }

    /// Parse front matter and body from raw text.
    ///
    /// # Errors
    ///
    /// - [`BuildError::MalformedDocument`] when the front matter block is
    ///   missing or unparsable, a required field is absent, or a recognized
    ///   field has the wrong type.
    /// - [`BuildError::InvalidDate`] when `date` is present but unparsable.
    pub fn parse_with(
        source: impl Into<PathBuf>,
        raw: &str,
        options: &ParseOptions,
    ) -> Result<Self, BuildError> {
        let source = source.into();
        let (format, front, body) = split_front_matter(raw)
            .ok_or_else(|| BuildError::malformed(&source, "missing front matter block"))?;

        let fields = parse_fields(format, front).map_err(|e| BuildError::malformed(&source, e))?;
        let meta = FieldReader::new(&source, fields).into_meta(options)?;

        Ok(Self {
            source,
            meta,
            body: body.to_owned(),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub const fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Body text exactly as it followed the front matter.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Collection name this document belongs to, [`UNCATEGORIZED`] if undeclared.
    pub fn collection(&self) -> &str {
        self.meta.collection.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Parse the raw front matter block into an open key/value map.
fn parse_fields(format: FrontMatterFormat, text: &str) -> Result<Map<String, Value>, String> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    let value = match format {
        FrontMatterFormat::Yaml => serde_yaml::from_str::<Value>(text)
            .map_err(|e| format!("invalid YAML front matter: {e}"))?,
        FrontMatterFormat::Toml => {
            let table = toml::from_str::<toml::Table>(text)
                .map_err(|e| format!("invalid TOML front matter: {e}"))?;
            toml_to_json(toml::Value::Table(table))
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err("front matter must be a key/value mapping".into()),
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Takes recognized keys out of the field map, leaving the rest as extras.
struct FieldReader<'a> {
    source: &'a Path,
    fields: Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    const fn new(source: &'a Path, fields: Map<String, Value>) -> Self {
        Self { source, fields }
    }

    fn wrong_type(&self, key: &str, expected: &str) -> BuildError {
        BuildError::malformed(self.source, format!("`{key}` must be {expected}"))
    }

    /// Non-blank string field. Blank strings count as absent, numbers keep
    /// their written form (`title: 1984`).
    fn string(&mut self, key: &str) -> Result<Option<String>, BuildError> {
        match self.fields.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_owned())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.wrong_type(key, "a string")),
        }
    }

    fn flag(&mut self, key: &str) -> Result<bool, BuildError> {
        match self.fields.remove(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(b),
            Some(_) => Err(self.wrong_type(key, "a boolean")),
        }
    }

    fn strings(&mut self, key: &str) -> Result<Vec<String>, BuildError> {
        match self.fields.remove(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.trim().to_owned()),
                    _ => Err(self.wrong_type(key, "a list of strings")),
                })
                .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
                .collect(),
            Some(_) => Err(self.wrong_type(key, "a list of strings")),
        }
    }

    /// Raw date text. Non-string scalars are kept as text so they surface as
    /// [`BuildError::InvalidDate`].
    fn date_text(&mut self) -> Result<Option<String>, BuildError> {
        match self.fields.remove("date") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
            Some(_) => Err(self.wrong_type("date", "a date string")),
        }
    }

    /// `category` and `collection` are aliases; declaring both with
    /// different values would put the document in two collections.
    fn collection(&mut self) -> Result<Option<String>, BuildError> {
        let category = self.string("category")?;
        let collection = self.string("collection")?;
        match (category, collection) {
            (Some(a), Some(b)) if a != b => Err(BuildError::malformed(
                self.source,
                format!("conflicting `category` ({a}) and `collection` ({b})"),
            )),
            (a, b) => Ok(a.or(b)),
        }
    }

    fn into_meta(mut self, options: &ParseOptions) -> Result<DocumentMeta, BuildError> {
        let title = self.string("title")?;
        let author = self.string("author")?.or_else(|| {
            options
                .default_author
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_owned)
        });
        let date = self.date_text()?;

        let missing: Vec<_> = [
            ("title", title.is_none()),
            ("author", author.is_none()),
            ("date", date.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then(|| format!("`{key}`")))
        .collect();

        let (Some(title), Some(author), Some(date)) = (title, author, date) else {
            let noun = if missing.len() == 1 { "field" } else { "fields" };
            return Err(BuildError::malformed(
                self.source,
                format!("missing required {noun} {}", missing.join(", ")),
            ));
        };

        let date = PublishDate::parse(&date).ok_or_else(|| BuildError::InvalidDate {
            path: self.source.to_path_buf(),
            value: date.clone(),
        })?;

        let collection = self.collection()?;
        let tags = self.strings("tags")?;
        let excerpt = self.string("excerpt")?;
        let toc = self.flag("toc")?;
        let draft = self.flag("draft")?;
        if matches!(self.fields.get("slug"), Some(Value::String(s)) if s.trim().is_empty()) {
            return Err(BuildError::malformed(self.source, "`slug` must not be empty"));
        }
        let slug = self.string("slug")?;

        Ok(DocumentMeta {
            title,
            author,
            date,
            collection,
            tags,
            excerpt,
            toc,
            slug,
            draft,
            extra: self.fields.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS_POST: &str = "---\n\
        title: JavaScript Fundamentals\n\
        author: Jane\n\
        date: 2025-01-12\n\
        category: javascript\n\
        tags: [basics, web]\n\
        excerpt: Where to start.\n\
        toc: true\n\
        ---\n\
        # Heading\n\n```js\nconsole.log(1)\n```\n";

    fn parse(raw: &str) -> Result<Document, BuildError> {
        Document::parse("posts/post.md", raw)
    }

    // ========================================================================
    // split_front_matter
    // ========================================================================

    #[test]
    fn test_split_yaml_block() {
        let (format, front, body) = split_front_matter("---\ntitle: a\n---\nbody\n").unwrap();
        assert_eq!(format, FrontMatterFormat::Yaml);
        assert_eq!(front, "title: a\n");
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_split_toml_block() {
        let (format, front, body) = split_front_matter("+++\ntitle = 'a'\n+++\n").unwrap();
        assert_eq!(format, FrontMatterFormat::Toml);
        assert_eq!(front, "title = 'a'\n");
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_handles_crlf_and_bom() {
        let (_, front, body) = split_front_matter("\u{feff}---\r\ntitle: a\r\n---\r\nbody").unwrap();
        assert_eq!(front, "title: a\r\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_closing_fence_without_newline() {
        let (_, front, body) = split_front_matter("---\ntitle: a\n---").unwrap();
        assert_eq!(front, "title: a\n");
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_rejects_missing_or_unclosed_block() {
        assert!(split_front_matter("no front matter\n").is_none());
        assert!(split_front_matter("---\ntitle: a\n").is_none());
        assert!(split_front_matter("---").is_none());
    }

    #[test]
    fn test_split_does_not_mix_fences() {
        assert!(split_front_matter("---\ntitle: a\n+++\nbody").is_none());
    }

    // ========================================================================
    // Document::parse
    // ========================================================================

    #[test]
    fn test_parse_full_document() {
        let doc = parse(JS_POST).unwrap();
        let meta = doc.meta();
        assert_eq!(meta.title, "JavaScript Fundamentals");
        assert_eq!(meta.author, "Jane");
        assert_eq!(meta.date.to_string(), "2025-01-12");
        assert_eq!(doc.collection(), "javascript");
        assert_eq!(meta.tags, vec!["basics", "web"]);
        assert_eq!(meta.excerpt.as_deref(), Some("Where to start."));
        assert!(meta.toc);
        assert!(!meta.draft);
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_body_is_verbatim() {
        let doc = parse(JS_POST).unwrap();
        assert_eq!(doc.body(), "# Heading\n\n```js\nconsole.log(1)\n```\n");
    }

    #[test]
    fn test_parse_toml_front_matter() {
        let raw = "+++\n\
            title = \"Python Fundamentals\"\n\
            author = \"Sam\"\n\
            date = 2025-01-11\n\
            collection = \"python\"\n\
            toc = false\n\
            +++\nbody";
        let doc = parse(raw).unwrap();
        assert_eq!(doc.meta().title, "Python Fundamentals");
        assert_eq!(doc.meta().date.to_string(), "2025-01-11");
        assert_eq!(doc.collection(), "python");
    }

    #[test]
    fn test_missing_collection_is_uncategorized() {
        let doc = parse("---\ntitle: t\nauthor: a\ndate: 2025-01-01\n---\n").unwrap();
        assert_eq!(doc.meta().collection, None);
        assert_eq!(doc.collection(), UNCATEGORIZED);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let raw = "---\ntitle: t\nauthor: a\ndate: 2025-01-01\nlayout: post\nseries:\n  name: intro\n  part: 2\n---\n";
        let doc = parse(raw).unwrap();
        let extra = &doc.meta().extra;
        assert_eq!(extra["layout"], Value::String("post".into()));
        assert_eq!(extra["series"]["part"], Value::from(2));
    }

    #[test]
    fn test_missing_date_is_malformed() {
        let err = parse("---\ntitle: t\nauthor: a\n---\n").unwrap_err();
        match err {
            BuildError::MalformedDocument { path, reason } => {
                assert_eq!(path, PathBuf::from("posts/post.md"));
                assert_eq!(reason, "missing required field `date`");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let err = parse("---\nauthor: a\n---\n").unwrap_err();
        assert!(err.to_string().contains("missing required fields `title`, `date`"));
    }

    #[test]
    fn test_blank_title_counts_as_missing() {
        let err = parse("---\ntitle: '  '\nauthor: a\ndate: 2025-01-01\n---\n").unwrap_err();
        assert!(err.to_string().contains("`title`"));
    }

    #[test]
    fn test_default_author_fills_gap() {
        let options = ParseOptions {
            default_author: Some("Site Owner".into()),
        };
        let doc = Document::parse_with("a.md", "---\ntitle: t\ndate: 2025-01-01\n---\n", &options)
            .unwrap();
        assert_eq!(doc.meta().author, "Site Owner");

        let err = parse("---\ntitle: t\ndate: 2025-01-01\n---\n").unwrap_err();
        assert!(err.to_string().contains("`author`"));
    }

    #[test]
    fn test_blank_default_author_is_ignored() {
        let options = ParseOptions {
            default_author: Some("   ".into()),
        };
        let err = Document::parse_with("a.md", "---\ntitle: t\ndate: 2025-01-01\n---\n", &options)
            .unwrap_err();
        assert!(err.to_string().contains("missing required field `author`"), "{err}");

        let options = ParseOptions {
            default_author: Some("  Site Owner ".into()),
        };
        let doc = Document::parse_with("a.md", "---\ntitle: t\ndate: 2025-01-01\n---\n", &options)
            .unwrap();
        assert_eq!(doc.meta().author, "Site Owner");
    }

    #[test]
    fn test_numeric_scalars_read_as_text() {
        let doc = parse("---\ntitle: 1984\nauthor: 42\ndate: 2025-01-01\nexcerpt: 3.5\n---\n").unwrap();
        assert_eq!(doc.meta().title, "1984");
        assert_eq!(doc.meta().author, "42");
        assert_eq!(doc.meta().excerpt.as_deref(), Some("3.5"));

        let doc = parse("+++\ntitle = 2001\nauthor = \"a\"\ndate = \"2025-01-01\"\n+++\n").unwrap();
        assert_eq!(doc.meta().title, "2001");
    }

    #[test]
    fn test_invalid_date() {
        let err = parse("---\ntitle: t\nauthor: a\ndate: 2025-02-30\n---\n").unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidDate {
                path: "posts/post.md".into(),
                value: "2025-02-30".into(),
            }
        );
    }

    #[test]
    fn test_numeric_date_is_invalid_date() {
        let err = parse("---\ntitle: t\nauthor: a\ndate: 2025\n---\n").unwrap_err();
        assert!(matches!(err, BuildError::InvalidDate { value, .. } if value == "2025"));
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let cases = [
            ("title: [a]\nauthor: a\ndate: 2025-01-01", "`title` must be a string"),
            ("title: t\nauthor: a\ndate: 2025-01-01\ntoc: yes-please", "`toc` must be a boolean"),
            ("title: t\nauthor: a\ndate: 2025-01-01\ntags: rust", "`tags` must be a list of strings"),
            ("title: t\nauthor: a\ndate: 2025-01-01\ntags: [1, 2]", "`tags` must be a list of strings"),
        ];
        for (front, expected) in cases {
            let err = parse(&format!("---\n{front}\n---\n")).unwrap_err();
            assert!(err.to_string().contains(expected), "{front}: {err}");
        }
    }

    #[test]
    fn test_conflicting_collection_aliases() {
        let raw = "---\ntitle: t\nauthor: a\ndate: 2025-01-01\ncategory: rust\ncollection: go\n---\n";
        let err = parse(raw).unwrap_err();
        assert!(err.to_string().contains("conflicting"));

        let raw = "---\ntitle: t\nauthor: a\ndate: 2025-01-01\ncategory: rust\ncollection: rust\n---\n";
        assert_eq!(parse(raw).unwrap().collection(), "rust");
    }

    #[test]
    fn test_empty_slug_is_rejected() {
        let raw = "---\ntitle: t\nauthor: a\ndate: 2025-01-01\nslug: ''\n---\n";
        assert!(parse(raw).unwrap_err().to_string().contains("`slug`"));
    }

    #[test]
    fn test_no_front_matter_is_malformed() {
        let err = parse("# Just markdown\n").unwrap_err();
        assert!(err.to_string().contains("missing front matter block"));
    }

    #[test]
    fn test_non_mapping_front_matter_is_malformed() {
        let err = parse("---\n- a\n- b\n---\n").unwrap_err();
        assert!(err.to_string().contains("key/value mapping"));
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = parse("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn test_meta_serialization_skips_empty_fields() {
        let doc = parse("---\ntitle: t\nauthor: a\ndate: 2025-01-01\n---\n").unwrap();
        let json = serde_json::to_value(doc.meta()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "t",
                "author": "a",
                "date": "2025-01-01",
                "toc": false,
            })
        );
    }
}
