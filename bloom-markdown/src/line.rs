//! Line classification.
//!
//! Every predicate here is a prefix or exact-match test on a single line. The
//! parser asks [`Line::kind`] which block a line opens, so the priority order
//! lives in one place.

/// What a single line opens when it is seen at a block boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    Heading,
    HorizontalRule,
    Image,
    Quote,
    CodeFence,
    MathFence,
    Normal,
}

/// A borrowed view of one raw input line (no trailing newline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_heading(&self) -> bool {
        self.text.starts_with('#')
    }

    pub fn is_horizontal_rule(&self) -> bool {
        self.text == "---" || self.text == "***"
    }

    pub fn is_image(&self) -> bool {
        self.text.starts_with('!')
    }

    pub fn is_quote(&self) -> bool {
        self.text.starts_with('>')
    }

    pub fn is_code_fence(&self) -> bool {
        self.text.starts_with("```")
    }

    pub fn is_math_fence(&self) -> bool {
        self.text.starts_with("$$")
    }

    /// Primary classification, first match wins:
    /// heading, rule, image, quote, code fence, math fence, normal.
    pub fn kind(&self) -> LineKind {
        if self.is_empty() {
            LineKind::Empty
        } else if self.is_heading() {
            LineKind::Heading
        } else if self.is_horizontal_rule() {
            LineKind::HorizontalRule
        } else if self.is_image() {
            LineKind::Image
        } else if self.is_quote() {
            LineKind::Quote
        } else if self.is_code_fence() {
            LineKind::CodeFence
        } else if self.is_math_fence() {
            LineKind::MathFence
        } else {
            LineKind::Normal
        }
    }

    /// True when the line opens a block other than a normal paragraph.
    pub fn starts_block(&self) -> bool {
        !matches!(self.kind(), LineKind::Empty | LineKind::Normal)
    }

    /// Remove one level of quoting: the leading `>` and at most one space after it.
    ///
    /// Lines that are not quoted are returned unchanged.
    pub fn unindent_quote(&self) -> &'a str {
        match self.text.strip_prefix('>') {
            Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
            None => self.text,
        }
    }
}
