use serde::{Deserialize, Serialize};

/// A parsed article.
///
/// The title comes from a leading level-1 heading. `header` and `footer` are
/// empty after parsing and are filled by callers that strip content from the
/// ends of `body` (see [`Document::move_start_to_header`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document title, without the leading `# `.
    pub title: String,
    /// Blocks rendered before the body, separated from it by a rule.
    pub header: Vec<Block>,
    /// Ordered sequence of blocks in the document body.
    pub body: Vec<Block>,
    /// Blocks rendered after the body, separated from it by a rule.
    pub footer: Vec<Block>,
}

impl Document {
    /// An empty document with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// A document with a title and body, no header or footer.
    pub fn with_body(title: impl Into<String>, body: Vec<Block>) -> Self {
        Self {
            title: title.into(),
            body,
            ..Default::default()
        }
    }
}

/// One block-level element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// `## text`
    Heading(Heading),
    /// Raw text lines up to the next empty line or block start.
    NormalParagraph(Paragraph),
    /// `---` or `***`.
    HorizontalRule,
    /// `![caption](uri)` on a line of its own.
    Image(Image),
    /// Consecutive `>` lines, parsed again as a nested block sequence.
    Quote(Quote),
    /// Fenced with ```` ``` ````; content is not parsed.
    CodeBlock(CodeBlock),
    /// Fenced with `$$`; content is not parsed.
    MathBlock(MathBlock),
}

impl Block {
    /// A heading block. Levels below 1 are raised to 1 so the block still
    /// renders as a heading.
    pub fn heading(level: usize, text: impl Into<String>) -> Self {
        Block::Heading(Heading {
            level: level.max(1),
            text: text.into(),
        })
    }

    pub fn paragraph<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Block::NormalParagraph(Paragraph {
            lines: lines.into_iter().map(Into::into).collect(),
        })
    }

    pub fn image(caption: impl Into<String>, uri: impl Into<String>) -> Self {
        Block::Image(Image {
            caption: caption.into(),
            uri: uri.into(),
        })
    }

    pub fn quote(blocks: Vec<Block>) -> Self {
        Block::Quote(Quote { blocks })
    }

    pub fn code<S: Into<String>>(language: impl Into<String>, lines: impl IntoIterator<Item = S>) -> Self {
        Block::CodeBlock(CodeBlock {
            language: language.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        })
    }

    pub fn math<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Block::MathBlock(MathBlock {
            lines: lines.into_iter().map(Into::into).collect(),
        })
    }

    /// Short lowercase name of the variant, used by the terminal view and the CLI.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::NormalParagraph(_) => "paragraph",
            Block::HorizontalRule => "rule",
            Block::Image(_) => "image",
            Block::Quote(_) => "quote",
            Block::CodeBlock(_) => "code block",
            Block::MathBlock(_) => "math block",
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading(_))
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::NormalParagraph(_))
    }

    pub fn is_horizontal_rule(&self) -> bool {
        matches!(self, Block::HorizontalRule)
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image(_))
    }

    pub fn is_quote(&self) -> bool {
        matches!(self, Block::Quote(_))
    }

    pub fn is_code_block(&self) -> bool {
        matches!(self, Block::CodeBlock(_))
    }

    pub fn is_math_block(&self) -> bool {
        matches!(self, Block::MathBlock(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Number of `#` characters, at least 1.
    pub level: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub caption: String,
    pub uri: String,
}

impl Image {
    /// True when the URI points at the web rather than a file next to the article.
    pub fn is_online(&self) -> bool {
        self.uri.starts_with("http://") || self.uri.starts_with("https://")
    }

    pub fn is_local(&self) -> bool {
        !self.is_online()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Info string after the opening fence; empty when none was given.
    pub language: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathBlock {
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn heading_level_is_at_least_one() {
        assert_eq!(Block::heading(0, "x"), Block::heading(1, "x"));
        assert!(matches!(Block::heading(0, "x"), Block::Heading(Heading { level: 1, .. })));
    }

    #[test]
    fn image_locality() {
        let local = Image {
            caption: "a".into(),
            uri: "images/a.png".into(),
        };
        let http = Image {
            caption: "b".into(),
            uri: "http://example.com/b.png".into(),
        };
        let https = Image {
            caption: "c".into(),
            uri: "https://example.com/c.png".into(),
        };
        assert!(local.is_local());
        assert!(http.is_online());
        assert!(https.is_online());
        assert!(!https.is_local());
    }

    #[test]
    fn scheme_check_is_case_sensitive_prefix() {
        let img = Image {
            caption: String::new(),
            uri: "ftp://example.com/x.png".into(),
        };
        assert!(img.is_local());
    }

    #[test]
    fn block_serializes_with_kind_tag() {
        let json = serde_json::to_value(Block::image("cat", "cat.png")).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["uri"], "cat.png");

        let rule = serde_json::to_value(Block::HorizontalRule).unwrap();
        assert_eq!(rule["kind"], "horizontal_rule");
    }

    #[test]
    fn document_json_round_trip() {
        let doc = Document::with_body(
            "Title",
            vec![
                Block::quote(vec![Block::paragraph(["quoted"])]),
                Block::code("rust", ["fn main() {}"]),
            ],
        );
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
