//! Structural queries and edits over a [`Document`] body.
//!
//! Predicates see top-level body blocks only, except for the image and math
//! helpers, which descend into quotes.

use crate::error::BlockIndexError;
use crate::types::{Block, CodeBlock, Document, Image, MathBlock};

impl Document {
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn find_one(&self, mut test: impl FnMut(&Block) -> bool) -> Option<&Block> {
        self.body.iter().find(|block| test(block))
    }

    pub fn find_all(&self, mut test: impl FnMut(&Block) -> bool) -> Vec<&Block> {
        self.body.iter().filter(|block| test(block)).collect()
    }

    /// Maximal runs of consecutive body blocks that pass `test`, in order.
    pub fn find_adjacent(&self, mut test: impl FnMut(&Block) -> bool) -> Vec<&[Block]> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, block) in self.body.iter().enumerate() {
            match (test(block), start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push(&self.body[s..i]);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(&self.body[s..]);
        }
        runs
    }

    /// Detach the first body block if it passes `test`.
    pub fn remove_start(&mut self, test: impl FnOnce(&Block) -> bool) -> Option<Block> {
        if self.body.first().is_some_and(test) {
            Some(self.body.remove(0))
        } else {
            None
        }
    }

    /// Detach the longest prefix of the body whose blocks all pass `test`.
    pub fn remove_start_while(&mut self, mut test: impl FnMut(&Block) -> bool) -> Vec<Block> {
        let end = self
            .body
            .iter()
            .position(|block| !test(block))
            .unwrap_or(self.body.len());
        self.body.drain(..end).collect()
    }

    /// Detach blocks from the start up to, not including, the first that passes `test`.
    pub fn remove_start_until(&mut self, mut test: impl FnMut(&Block) -> bool) -> Vec<Block> {
        self.remove_start_while(|block| !test(block))
    }

    /// Detach the last body block if it passes `test`.
    pub fn remove_end(&mut self, test: impl FnOnce(&Block) -> bool) -> Option<Block> {
        if self.body.last().is_some_and(test) {
            self.body.pop()
        } else {
            None
        }
    }

    /// Detach the longest suffix of the body whose blocks all pass `test`.
    ///
    /// The returned blocks keep document order.
    pub fn remove_end_while(&mut self, mut test: impl FnMut(&Block) -> bool) -> Vec<Block> {
        let start = self
            .body
            .iter()
            .rposition(|block| !test(block))
            .map_or(0, |i| i + 1);
        self.body.split_off(start)
    }

    pub fn remove_end_until(&mut self, mut test: impl FnMut(&Block) -> bool) -> Vec<Block> {
        self.remove_end_while(|block| !test(block))
    }

    /// Move the leading run of blocks passing `test` to the end of the header.
    ///
    /// Returns how many blocks moved.
    pub fn move_start_to_header(&mut self, test: impl FnMut(&Block) -> bool) -> usize {
        let moved = self.remove_start_while(test);
        let count = moved.len();
        self.header.extend(moved);
        count
    }

    /// Move the trailing run of blocks passing `test` to the start of the footer.
    pub fn move_end_to_footer(&mut self, test: impl FnMut(&Block) -> bool) -> usize {
        let mut moved = self.remove_end_while(test);
        let count = moved.len();
        moved.append(&mut self.footer);
        self.footer = moved;
        count
    }

    pub fn prepend(&mut self, block: Block) {
        self.body.insert(0, block);
    }

    pub fn append(&mut self, block: Block) {
        self.body.push(block);
    }

    /// Insert `block` so that it ends up at `index`. `index == len()` appends.
    pub fn insert(&mut self, index: usize, block: Block) -> Result<(), BlockIndexError> {
        if index > self.body.len() {
            return Err(BlockIndexError {
                index,
                len: self.body.len(),
            });
        }
        self.body.insert(index, block);
        Ok(())
    }

    /// Every image in the body, including those inside (nested) quotes.
    pub fn images(&self) -> Vec<&Image> {
        let mut found = Vec::new();
        collect_images(&self.body, &mut found);
        found
    }

    /// Every math block in the body, including those inside (nested) quotes.
    pub fn math_blocks(&self) -> Vec<&MathBlock> {
        let mut found = Vec::new();
        collect_math_blocks(&self.body, &mut found);
        found
    }

    /// Top-level code blocks.
    pub fn code_blocks(&self) -> Vec<&CodeBlock> {
        self.body
            .iter()
            .filter_map(|block| match block {
                Block::CodeBlock(code) => Some(code),
                _ => None,
            })
            .collect()
    }

    /// Replace the URI of every reachable image that passes `test`.
    ///
    /// Captions are left alone. Returns the number of images rewritten.
    pub fn transfer_image_uri(
        &mut self,
        mut test: impl FnMut(&Image) -> bool,
        mut transfer: impl FnMut(&str) -> String,
    ) -> usize {
        let mut images = Vec::new();
        collect_images_mut(&mut self.body, &mut images);

        let mut count = 0;
        for image in images {
            if test(&*image) {
                image.uri = transfer(&image.uri);
                count += 1;
            }
        }
        log::debug!("rewrote {count} image URIs");
        count
    }

    /// Replace every line passing `test` in every reachable math block.
    ///
    /// Returns the number of lines rewritten.
    pub fn transfer_math_block_by_line(
        &mut self,
        mut test: impl FnMut(&str) -> bool,
        mut transfer: impl FnMut(&str) -> String,
    ) -> usize {
        let mut blocks = Vec::new();
        collect_math_blocks_mut(&mut self.body, &mut blocks);

        let mut count = 0;
        for math in blocks {
            for line in &mut math.lines {
                if test(line.as_str()) {
                    *line = transfer(line.as_str());
                    count += 1;
                }
            }
        }
        log::debug!("rewrote {count} math lines");
        count
    }
}

// ------------------------------------------------------------------
// Recursive collection
// ------------------------------------------------------------------

fn collect_images<'a>(blocks: &'a [Block], found: &mut Vec<&'a Image>) {
    for block in blocks {
        match block {
            Block::Image(image) => found.push(image),
            Block::Quote(quote) => collect_images(&quote.blocks, found),
            _ => {}
        }
    }
}

fn collect_images_mut<'a>(blocks: &'a mut [Block], found: &mut Vec<&'a mut Image>) {
    for block in blocks {
        match block {
            Block::Image(image) => found.push(image),
            Block::Quote(quote) => collect_images_mut(&mut quote.blocks, found),
            _ => {}
        }
    }
}

fn collect_math_blocks<'a>(blocks: &'a [Block], found: &mut Vec<&'a MathBlock>) {
    for block in blocks {
        match block {
            Block::MathBlock(math) => found.push(math),
            Block::Quote(quote) => collect_math_blocks(&quote.blocks, found),
            _ => {}
        }
    }
}

fn collect_math_blocks_mut<'a>(blocks: &'a mut [Block], found: &mut Vec<&'a mut MathBlock>) {
    for block in blocks {
        match block {
            Block::MathBlock(math) => found.push(math),
            Block::Quote(quote) => collect_math_blocks_mut(&mut quote.blocks, found),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn a() -> Block {
        Block::paragraph(["a"])
    }

    fn b() -> Block {
        Block::HorizontalRule
    }

    fn doc(body: Vec<Block>) -> Document {
        Document::with_body("T", body)
    }

    #[test]
    fn find_one_and_all() {
        let d = doc(vec![a(), Block::heading(2, "x"), Block::heading(3, "y")]);
        assert_eq!(d.find_one(Block::is_heading), Some(&Block::heading(2, "x")));
        assert_eq!(d.find_all(Block::is_heading).len(), 2);
        assert_eq!(d.find_one(Block::is_image), None);
        assert!(d.find_all(Block::is_image).is_empty());
    }

    #[test]
    fn find_adjacent_groups_runs() {
        let d = doc(vec![a(), b(), b(), a(), b()]);
        let runs = d.find_adjacent(Block::is_horizontal_rule);
        assert_eq!(runs, vec![&[b(), b()][..], &[b()][..]]);
    }

    #[test]
    fn find_adjacent_without_matches() {
        let d = doc(vec![a(), a()]);
        assert!(d.find_adjacent(Block::is_quote).is_empty());
        assert!(doc(Vec::new()).find_adjacent(|_| true).is_empty());
    }

    #[test]
    fn remove_start_only_when_matching() {
        let mut d = doc(vec![b(), a()]);
        assert_eq!(d.remove_start(Block::is_paragraph), None);
        assert_eq!(d.len(), 2);
        assert_eq!(d.remove_start(Block::is_horizontal_rule), Some(b()));
        assert_eq!(d.body, vec![a()]);
    }

    #[test]
    fn remove_start_on_empty_body() {
        let mut d = doc(Vec::new());
        assert_eq!(d.remove_start(|_| true), None);
        assert_eq!(d.remove_end(|_| true), None);
        assert!(d.remove_start_while(|_| true).is_empty());
        assert!(d.remove_end_while(|_| true).is_empty());
    }

    #[test]
    fn remove_start_while_splits_prefix() {
        let original = vec![b(), b(), a(), b()];
        let mut d = doc(original.clone());
        let prefix = d.remove_start_while(Block::is_horizontal_rule);
        assert_eq!(prefix, vec![b(), b()]);
        assert_eq!(d.body, vec![a(), b()]);

        let mut rebuilt = prefix;
        rebuilt.extend(d.body);
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn remove_start_until_stops_before_match() {
        let mut d = doc(vec![a(), a(), b(), a()]);
        let removed = d.remove_start_until(Block::is_horizontal_rule);
        assert_eq!(removed, vec![a(), a()]);
        assert_eq!(d.body, vec![b(), a()]);
    }

    #[test]
    fn remove_end_variants() {
        let mut d = doc(vec![a(), b(), a(), a()]);
        assert_eq!(d.remove_end(Block::is_horizontal_rule), None);
        assert_eq!(d.remove_end(Block::is_paragraph), Some(a()));
        assert_eq!(d.body, vec![a(), b(), a()]);

        let mut d = doc(vec![a(), b(), Block::heading(2, "x"), a()]);
        let suffix = d.remove_end_until(Block::is_horizontal_rule);
        assert_eq!(suffix, vec![Block::heading(2, "x"), a()]);
        assert_eq!(d.body, vec![a(), b()]);
    }

    #[test]
    fn remove_end_while_takes_whole_body() {
        let mut d = doc(vec![a(), a()]);
        assert_eq!(d.remove_end_while(Block::is_paragraph), vec![a(), a()]);
        assert!(d.is_empty());
    }

    #[test]
    fn move_to_header_and_footer() {
        let quote = Block::quote(vec![a()]);
        let mut d = doc(vec![quote.clone(), quote.clone(), a(), b(), b()]);
        assert_eq!(d.move_start_to_header(Block::is_quote), 2);
        assert_eq!(d.move_end_to_footer(Block::is_horizontal_rule), 2);
        assert_eq!(d.header, vec![quote.clone(), quote]);
        assert_eq!(d.body, vec![a()]);
        assert_eq!(d.footer, vec![b(), b()]);
    }

    #[test]
    fn move_to_footer_keeps_existing_footer_last() {
        let mut d = doc(vec![a(), b()]);
        d.footer.push(Block::heading(2, "end"));
        d.move_end_to_footer(Block::is_horizontal_rule);
        assert_eq!(d.footer, vec![b(), Block::heading(2, "end")]);
    }

    #[test]
    fn insert_prepend_append() {
        let mut d = doc(vec![a()]);
        d.prepend(b());
        d.append(Block::heading(2, "z"));
        d.insert(1, Block::image("i", "i.png")).unwrap();
        assert_eq!(
            d.body,
            vec![b(), Block::image("i", "i.png"), a(), Block::heading(2, "z")]
        );
        assert_eq!(
            d.insert(9, a()),
            Err(BlockIndexError { index: 9, len: 4 })
        );
        assert!(d.insert(4, a()).is_ok());
        assert_eq!(d.len(), 5);
    }

    #[test]
    fn images_descend_into_quotes_in_order() {
        let d = doc(vec![
            Block::image("top", "top.png"),
            Block::quote(vec![
                a(),
                Block::image("nested", "nested.png"),
                Block::quote(vec![Block::image("deep", "deep.png")]),
            ]),
            Block::image("last", "https://cdn/last.png"),
        ]);
        let images = d.images();
        let captions: Vec<&str> = images.iter().map(|i| i.caption.as_str()).collect();
        assert_eq!(captions, vec!["top", "nested", "deep", "last"]);
    }

    #[test]
    fn transfer_image_uri_targets_matching_images() {
        let mut d = doc(vec![
            Block::image("top", "top.png"),
            Block::quote(vec![Block::image("nested", "nested.png")]),
        ]);
        let count = d.transfer_image_uri(
            |image| image.caption == "nested",
            |uri| format!("https://img.example.com/{uri}"),
        );
        assert_eq!(count, 1);
        assert_eq!(
            d.body,
            vec![
                Block::image("top", "top.png"),
                Block::quote(vec![Block::image(
                    "nested",
                    "https://img.example.com/nested.png"
                )]),
            ]
        );
    }

    #[test]
    fn transfer_local_images_only() {
        let mut d = doc(vec![
            Block::image("a", "a.png"),
            Block::image("b", "http://host/b.png"),
        ]);
        let count = d.transfer_image_uri(Image::is_local, |uri| format!("http://host/{uri}"));
        assert_eq!(count, 1);
        assert!(d.images().iter().all(|image| image.is_online()));
    }

    #[test]
    fn transfer_math_lines() {
        let mut d = doc(vec![
            Block::math([r"a = 1 \\", "b = 2"]),
            Block::quote(vec![Block::math([r"c = 3 \\", r"d = 4 \\"])]),
            Block::code("tex", [r"not math \\"]),
        ]);
        let count = d.transfer_math_block_by_line(
            |line| line.ends_with(r"\\"),
            |line| format!("{}\\newline", &line[..line.len() - 2]),
        );
        assert_eq!(count, 3);
        let math = d.math_blocks();
        assert_eq!(math.len(), 2);
        assert_eq!(math[0].lines, vec![r"a = 1 \newline", "b = 2"]);
        assert_eq!(math[1].lines, vec![r"c = 3 \newline", r"d = 4 \newline"]);
        assert_eq!(d.code_blocks()[0].lines, vec![r"not math \\"]);
    }

    #[test]
    fn transfers_without_matches_leave_document_alone() {
        let original = doc(vec![a(), Block::image("x", "http://h/x.png")]);
        let mut d = original.clone();
        assert_eq!(d.transfer_image_uri(Image::is_local, |uri| uri.to_string()), 0);
        assert_eq!(d.transfer_math_block_by_line(|_| true, |l| l.to_string()), 0);
        assert_eq!(d, original);
    }
}
