//! Markdown serializer.
//!
//! The inverse of [`crate::parse`]: every block renders to lines that parse
//! back to an equal block. Blocks are separated by one empty line.

use crate::types::{Block, Document, Heading, Image};

const RULE: &str = "---";

impl Block {
    /// Source lines for this block, without separators.
    pub fn render_lines(&self) -> Vec<String> {
        match self {
            Block::Heading(heading) => vec![heading.to_string()],

            Block::NormalParagraph(paragraph) => paragraph.lines.clone(),

            Block::HorizontalRule => vec![RULE.to_string()],

            Block::Image(image) => vec![image.to_string()],

            Block::Quote(quote) => {
                let inner = join_blocks(&quote.blocks);
                if inner.is_empty() {
                    // A bare `>` parses back to an empty quote.
                    return vec![">".to_string()];
                }
                inner.into_iter().map(|line| format!("> {line}")).collect()
            }

            Block::CodeBlock(code) => {
                let mut lines = Vec::with_capacity(code.lines.len() + 2);
                lines.push(format!("```{}", code.language));
                lines.extend(code.lines.iter().cloned());
                lines.push("```".to_string());
                lines
            }

            Block::MathBlock(math) => {
                let mut lines = Vec::with_capacity(math.lines.len() + 2);
                lines.push("$$".to_string());
                lines.extend(math.lines.iter().cloned());
                lines.push("$$".to_string());
                lines
            }
        }
    }

    /// This block as a single newline-joined string.
    pub fn render(&self) -> String {
        self.render_lines().join("\n")
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // A zero level set directly on the struct still writes one `#`.
        write!(f, "{} {}", "#".repeat(self.level.max(1)), self.text)
    }
}

impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "![{}]({})", self.caption, self.uri)
    }
}

/// Lines of all `blocks`, with one empty line between consecutive blocks.
pub fn join_blocks(blocks: &[Block]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(block.render_lines());
    }
    lines
}

fn render_section(blocks: &[Block]) -> String {
    join_blocks(blocks).join("\n")
}

impl Document {
    /// Render the whole document: title, header, body and footer.
    ///
    /// The title line is always written, even when the title is empty.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![
            Heading {
                level: 1,
                text: self.title.clone(),
            }
            .to_string(),
            String::new(),
        ];

        if !self.header.is_empty() {
            lines.extend(join_blocks(&self.header));
            lines.extend([String::new(), RULE.to_string(), String::new()]);
        }

        lines.extend(join_blocks(&self.body));

        if !self.footer.is_empty() {
            lines.extend([String::new(), RULE.to_string(), String::new()]);
            lines.extend(join_blocks(&self.footer));
        }

        lines
    }

    /// [`Document::render_lines`] joined with `\n`, no trailing newline.
    pub fn to_markdown(&self) -> String {
        self.render_lines().join("\n")
    }

    pub fn body_string(&self) -> String {
        render_section(&self.body)
    }

    pub fn header_string(&self) -> String {
        render_section(&self.header)
    }

    pub fn footer_string(&self) -> String {
        render_section(&self.footer)
    }

    /// Header, body and footer with their separating rules, but no title line.
    pub fn full_body_string(&self) -> String {
        let mut blocks: Vec<Block> = Vec::new();
        blocks.extend(self.header.iter().cloned());
        if !self.header.is_empty() {
            blocks.push(Block::HorizontalRule);
        }
        blocks.extend(self.body.iter().cloned());
        if !self.footer.is_empty() {
            blocks.push(Block::HorizontalRule);
        }
        blocks.extend(self.footer.iter().cloned());
        render_section(&blocks)
    }
}
