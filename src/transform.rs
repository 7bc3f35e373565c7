//! Publishing transforms applied to a parsed article.
//!
//! Each step is a thin composition of the document query/mutation API.

use anyhow::Result;
use bloom_markdown::{Block, Document, Image};
use std::path::Path;

use crate::config::BloomConfig;

const MATH_LINE_BREAK: &str = r"\\";

#[derive(Debug, Default, Clone, Copy)]
pub struct TransformOpts {
    pub public_images: bool,
    pub math_newline: bool,
    pub header_quotes: bool,
    pub body_only: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub images: usize,
    pub math_lines: usize,
    pub header_blocks: usize,
}

/// Name images are published under: the directory holding the article,
/// falling back to the file stem for articles at a filesystem root.
pub fn article_name(file: &Path) -> String {
    file.parent()
        .and_then(Path::file_name)
        .or_else(|| file.file_stem())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Apply the selected transforms to `doc` in place.
pub fn apply(
    doc: &mut Document,
    article: &str,
    opts: &TransformOpts,
    config: &BloomConfig,
) -> Result<TransformReport> {
    let mut report = TransformReport::default();

    if opts.public_images {
        let mut failure = None;
        report.images = doc.transfer_image_uri(Image::is_local, |uri| {
            match config.image.public_url(article, uri) {
                Ok(url) => url,
                Err(e) => {
                    failure.get_or_insert(e);
                    uri.to_string()
                }
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }
    }

    if opts.math_newline {
        let replacement = &config.math.newline_replacement;
        report.math_lines = doc.transfer_math_block_by_line(
            |line| line.ends_with(MATH_LINE_BREAK),
            |line| {
                let kept = line.strip_suffix(MATH_LINE_BREAK).unwrap_or(line);
                format!("{kept}{replacement}")
            },
        );
    }

    if opts.header_quotes {
        report.header_blocks = doc.move_start_to_header(Block::is_quote);
    }

    log::debug!("transform report: {report:?}");
    Ok(report)
}

/// Final text for a transformed document, newline-terminated.
pub fn render(doc: &Document, body_only: bool) -> String {
    let mut text = if body_only {
        doc.body_string()
    } else {
        doc.to_markdown()
    };
    text.push('\n');
    text
}
