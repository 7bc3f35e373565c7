//! ANSI terminal structure view.
//!
//! Prints a document block by block with a colored tag per block kind, so the
//! parse result can be inspected from the CLI. Quotes are indented one level
//! per nesting depth.

use colored::{ColoredString, Colorize};

use crate::types::{Block, Document};

/// Render a `Document` as an annotated, ANSI-colored block listing.
pub fn to_terminal(doc: &Document) -> String {
    let mut lines = vec![format!("{} {}", "(title)".magenta().bold(), doc.title)];

    for (label, blocks) in [("header", &doc.header), ("body", &doc.body), ("footer", &doc.footer)] {
        if blocks.is_empty() && label != "body" {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{}", format!("[{label}: {} blocks]", blocks.len()).dimmed()));
        for block in blocks.iter() {
            render_block(block, 0, &mut lines);
        }
    }

    lines.join("\n")
}

fn render_block(block: &Block, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let tag = tag(block);

    match block {
        Block::Heading(heading) => {
            out.push(format!("{indent}{tag} {}", heading.text.bold()));
        }

        Block::NormalParagraph(paragraph) => {
            out.push(format!("{indent}{tag}"));
            for line in &paragraph.lines {
                out.push(format!("{indent}  {line}"));
            }
        }

        Block::HorizontalRule => out.push(format!("{indent}{tag}")),

        Block::Image(image) => {
            let location = if image.is_local() {
                "local".yellow()
            } else {
                "online".green()
            };
            out.push(format!(
                "{indent}{tag} {} {} {}",
                image.caption,
                image.uri.underline(),
                format!("({location})").dimmed()
            ));
        }

        Block::Quote(quote) => {
            out.push(format!("{indent}{tag} {}", format!("{} blocks", quote.blocks.len()).dimmed()));
            for inner in &quote.blocks {
                render_block(inner, depth + 1, out);
            }
        }

        Block::CodeBlock(code) => {
            let language = if code.language.is_empty() {
                "plain"
            } else {
                code.language.as_str()
            };
            out.push(format!(
                "{indent}{tag} language: {language}, {} lines",
                code.lines.len()
            ));
        }

        Block::MathBlock(math) => {
            out.push(format!("{indent}{tag} {} lines", math.lines.len()));
        }
    }
}

fn tag(block: &Block) -> ColoredString {
    let text = match block {
        Block::Heading(heading) => format!("(heading {})", heading.level),
        other => format!("({})", other.kind_name()),
    };
    match block {
        Block::Heading(_) => text.blue().bold(),
        Block::NormalParagraph(_) => text.white(),
        Block::HorizontalRule => text.dimmed(),
        Block::Image(_) => text.yellow(),
        Block::Quote(_) => text.cyan(),
        Block::CodeBlock(_) => text.green(),
        Block::MathBlock(_) => text.red(),
    }
}
