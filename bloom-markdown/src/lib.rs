//! `bloom-markdown`: structured markdown document model for bloom articles.
//!
//! Turns markdown text into a [`Document`]: a title plus a typed tree of
//! block-level elements. The tree can be queried and edited in place and is
//! serialized back to markdown with the same spacing and quoting conventions
//! it was parsed with.
//!
//! # Quick start
//!
//! ```
//! use bloom_markdown::{Block, Image};
//!
//! let mut doc = bloom_markdown::parse("# Hello\n\n![cat](cat.png)\n").unwrap();
//! assert_eq!(doc.title, "Hello");
//!
//! let n = doc.transfer_image_uri(Image::is_local, |uri| format!("https://img.example.com/{uri}"));
//! assert_eq!(n, 1);
//! assert_eq!(doc.to_markdown(), "# Hello\n\n![cat](https://img.example.com/cat.png)");
//! assert!(doc.find_one(Block::is_image).is_some());
//! ```

pub mod error;
pub mod line;
pub mod parse;
pub mod query;
pub mod render_md;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod types;

pub use error::*;
pub use parse::{FenceMode, ParseOptions, Parser, parse, parse_blocks, parse_lines, parse_with};
pub use types::*;

#[cfg(feature = "terminal")]
impl Document {
    /// Render this document as an ANSI-colored block listing.
    pub fn to_terminal(&self) -> String {
        render_term::to_terminal(self)
    }
}
