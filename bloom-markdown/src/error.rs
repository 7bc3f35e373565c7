use serde::{Deserialize, Serialize};

/// Errors that can occur during parsing.
///
/// Every variant is fatal: the parser stops at the first one and returns no
/// partial document. Line numbers are 1-based and refer to the original input,
/// including lines nested inside quotes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid heading at line {line}: `{text}`")]
    MalformedHeading { line: usize, text: String },

    #[error("Invalid image at line {line}: `{text}`")]
    MalformedImage { line: usize, text: String },

    #[error("Invalid code block start at line {line}: `{text}`")]
    MalformedCodeFence { line: usize, text: String },

    #[error("Unterminated {kind} opened at line {line}")]
    UnterminatedBlock { kind: FenceKind, line: usize },
}

impl ParseError {
    /// 1-based line number the error points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedHeading { line, .. }
            | ParseError::MalformedImage { line, .. }
            | ParseError::MalformedCodeFence { line, .. }
            | ParseError::UnterminatedBlock { line, .. } => *line,
        }
    }
}

/// The two fenced block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceKind {
    Code,
    Math,
}

impl FenceKind {
    /// The marker a line must start with to open or close this fence.
    pub fn marker(self) -> &'static str {
        match self {
            FenceKind::Code => "```",
            FenceKind::Math => "$$",
        }
    }
}

impl std::fmt::Display for FenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FenceKind::Code => write!(f, "code block"),
            FenceKind::Math => write!(f, "math block"),
        }
    }
}

/// Returned by [`crate::Document::insert`] when the index is past the end of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid block index {index} (body has {len} blocks)")]
pub struct BlockIndexError {
    pub index: usize,
    pub len: usize,
}
