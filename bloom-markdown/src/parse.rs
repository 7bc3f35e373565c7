use std::sync::OnceLock;

use regex::Regex;

use crate::error::{FenceKind, ParseError};
use crate::line::{Line, LineKind};
use crate::types::{Block, CodeBlock, Document, Heading, Image, MathBlock, Paragraph, Quote};

/// How to treat a code or math fence that is never closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FenceMode {
    /// Report [`ParseError::UnterminatedBlock`].
    #[default]
    Strict,
    /// Take everything up to the end of input as the block's content.
    Lenient,
}

/// Knobs for [`parse_with`] and [`Parser::with_options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub fences: FenceMode,
}

impl ParseOptions {
    pub fn lenient() -> Self {
        Self {
            fences: FenceMode::Lenient,
        }
    }
}

/// Parse markdown text into a [`Document`].
///
/// The input is split with [`str::lines`], so both `\n` and `\r\n` endings work.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    parse_with(input, ParseOptions::default())
}

/// Like [`parse`], with explicit options.
pub fn parse_with(input: &str, options: ParseOptions) -> Result<Document, ParseError> {
    let lines: Vec<&str> = input.lines().collect();
    Parser::with_options(&lines, options).parse()
}

/// Parse an already split line sequence into a [`Document`].
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Document, ParseError> {
    Parser::new(lines).parse()
}

/// Parse a line sequence into blocks without hoisting a title.
pub fn parse_blocks<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Block>, ParseError> {
    Parser::new(lines).parse_blocks()
}

// ------------------------------------------------------------------
// Patterns
// ------------------------------------------------------------------

fn heading_re() -> &'static Regex {
    static HEADING_RE: OnceLock<Regex> = OnceLock::new();
    HEADING_RE.get_or_init(|| Regex::new(r"^(#+)\s+(.+)$").expect("Invalid heading regex"))
}

fn image_re() -> &'static Regex {
    static IMAGE_RE: OnceLock<Regex> = OnceLock::new();
    IMAGE_RE.get_or_init(|| Regex::new(r"^!\[(.*)\]\((.+)\)$").expect("Invalid image regex"))
}

fn code_fence_re() -> &'static Regex {
    static CODE_FENCE_RE: OnceLock<Regex> = OnceLock::new();
    CODE_FENCE_RE.get_or_init(|| Regex::new(r"^```(\S*)").expect("Invalid code fence regex"))
}

// ------------------------------------------------------------------
// Parser
// ------------------------------------------------------------------

/// Recursive-descent block parser over a fixed line buffer.
///
/// The cursor only moves forward. Quotes are handled by running a fresh
/// `Parser` over the de-indented quote lines.
#[derive(Debug)]
pub struct Parser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    /// 1-based source line number of `lines[0]`.
    first_line: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new<S: AsRef<str>>(lines: &'a [S]) -> Self {
        Self::with_options(lines, ParseOptions::default())
    }

    pub fn with_options<S: AsRef<str>>(lines: &'a [S], options: ParseOptions) -> Self {
        Self {
            lines: lines.iter().map(AsRef::as_ref).collect(),
            pos: 0,
            first_line: 1,
            options,
        }
    }

    fn nested(lines: Vec<&'a str>, first_line: usize, options: ParseOptions) -> Self {
        Self {
            lines,
            pos: 0,
            first_line,
            options,
        }
    }

    /// Parse the whole buffer, hoisting a leading level-1 heading into the title.
    ///
    /// Only the first block is inspected. A level-1 heading further down stays
    /// in the body.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        let mut body = self.parse_blocks()?;

        let title = match body.first_mut() {
            Some(Block::Heading(heading)) if heading.level == 1 => {
                Some(std::mem::take(&mut heading.text))
            }
            _ => None,
        };
        let title = match title {
            Some(title) => {
                body.remove(0);
                log::debug!("hoisted title {title:?}");
                title
            }
            None => String::new(),
        };

        Ok(Document {
            title,
            body,
            ..Default::default()
        })
    }

    /// Parse blocks until the buffer is exhausted, skipping empty lines between them.
    pub fn parse_blocks(&mut self) -> Result<Vec<Block>, ParseError> {
        let mut blocks = Vec::new();
        loop {
            self.consume_while(|line| line.is_empty());
            let Some(line) = self.peek() else {
                break;
            };
            blocks.push(self.parse_block(line.kind())?);
        }
        Ok(blocks)
    }

    /// Parse one block starting at the cursor, which sits on a non-empty line of `kind`.
    fn parse_block(&mut self, kind: LineKind) -> Result<Block, ParseError> {
        match kind {
            LineKind::Heading => self.parse_heading(),
            LineKind::HorizontalRule => {
                self.advance();
                Ok(Block::HorizontalRule)
            }
            LineKind::Image => self.parse_image(),
            LineKind::Quote => self.parse_quote(),
            LineKind::CodeFence => self.parse_code_block(),
            LineKind::MathFence => self.parse_math_block(),
            LineKind::Empty | LineKind::Normal => Ok(self.parse_normal_paragraph()),
        }
    }

    fn parse_heading(&mut self) -> Result<Block, ParseError> {
        let line_no = self.line_number();
        let text = self.advance().map(|line| line.text()).unwrap_or_default();
        let caps = heading_re()
            .captures(text)
            .ok_or_else(|| ParseError::MalformedHeading {
                line: line_no,
                text: text.to_string(),
            })?;
        Ok(Block::Heading(Heading {
            level: caps[1].len(),
            text: caps[2].to_string(),
        }))
    }

    fn parse_image(&mut self) -> Result<Block, ParseError> {
        let line_no = self.line_number();
        let text = self.advance().map(|line| line.text()).unwrap_or_default();
        let caps = image_re()
            .captures(text)
            .ok_or_else(|| ParseError::MalformedImage {
                line: line_no,
                text: text.to_string(),
            })?;
        Ok(Block::Image(Image {
            caption: caps[1].to_string(),
            uri: caps[2].to_string(),
        }))
    }

    fn parse_quote(&mut self) -> Result<Block, ParseError> {
        let first_line = self.line_number();
        let inner: Vec<&'a str> = self
            .consume_while(|line| line.is_quote())
            .into_iter()
            .map(|text| Line::new(text).unindent_quote())
            .collect();

        log::debug!(
            "parsing quote of {} lines starting at line {first_line}",
            inner.len()
        );
        let blocks = Parser::nested(inner, first_line, self.options).parse_blocks()?;
        Ok(Block::Quote(Quote { blocks }))
    }

    fn parse_code_block(&mut self) -> Result<Block, ParseError> {
        let line_no = self.line_number();
        let text = self.advance().map(|line| line.text()).unwrap_or_default();
        let language = code_fence_re()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ParseError::MalformedCodeFence {
                line: line_no,
                text: text.to_string(),
            })?;
        let lines = self.fenced_lines(FenceKind::Code, line_no)?;
        Ok(Block::CodeBlock(CodeBlock { language, lines }))
    }

    fn parse_math_block(&mut self) -> Result<Block, ParseError> {
        let line_no = self.line_number();
        self.advance();
        let lines = self.fenced_lines(FenceKind::Math, line_no)?;
        Ok(Block::MathBlock(MathBlock { lines }))
    }

    /// Take raw lines up to the closing fence and consume the fence itself.
    fn fenced_lines(&mut self, kind: FenceKind, opened_at: usize) -> Result<Vec<String>, ParseError> {
        let marker = kind.marker();
        let lines: Vec<String> = self
            .consume_while(|line| !line.text().starts_with(marker))
            .into_iter()
            .map(String::from)
            .collect();

        if self.advance().is_none() {
            match self.options.fences {
                FenceMode::Strict => {
                    return Err(ParseError::UnterminatedBlock {
                        kind,
                        line: opened_at,
                    });
                }
                FenceMode::Lenient => {
                    log::debug!("{kind} opened at line {opened_at} runs to end of input");
                }
            }
        }
        Ok(lines)
    }

    fn parse_normal_paragraph(&mut self) -> Block {
        let lines = self.consume_while(|line| !line.is_empty() && !line.starts_block());
        Block::NormalParagraph(Paragraph {
            lines: lines.into_iter().map(String::from).collect(),
        })
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied().map(Line::new)
    }

    fn advance(&mut self) -> Option<Line<'a>> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// 1-based source line number of the line under the cursor.
    fn line_number(&self) -> usize {
        self.first_line + self.pos
    }

    fn consume_while(&mut self, mut predicate: impl FnMut(&Line<'a>) -> bool) -> Vec<&'a str> {
        let mut taken = Vec::new();
        while let Some(line) = self.peek() {
            if !predicate(&line) {
                break;
            }
            taken.push(line.text());
            self.pos += 1;
        }
        taken
    }
}
