//! WASM bindings for `bloom-markdown`.
//!
//! Exposes the article parser to JavaScript via wasm-bindgen.
//! Call `parse()` with a string to get a JSON document tree, or use
//! `render_markdown()` to normalise an article's formatting.

use bloom_markdown::{Document, ParseError, ParseOptions};
use wasm_bindgen::prelude::*;

fn parse_doc(input: &str, lenient: Option<bool>) -> Result<Document, ParseError> {
    let options = if lenient.unwrap_or(false) {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    };
    bloom_markdown::parse_with(input, options)
}

fn error_json(err: &ParseError) -> serde_json::Value {
    serde_json::json!({
        "message": err.to_string(),
        "line": err.line(),
    })
}

/// Parse an article and return the document as JSON.
///
/// Returns `{ doc }` on success or `{ error: { message, line } }` when the
/// input is malformed. With `lenient`, unterminated fences run to the end
/// of the input instead of failing.
#[wasm_bindgen]
pub fn parse(input: &str, lenient: Option<bool>) -> String {
    let value = match parse_doc(input, lenient) {
        Ok(doc) => serde_json::json!({ "doc": doc }),
        Err(err) => serde_json::json!({ "error": error_json(&err) }),
    };
    value.to_string()
}

/// Parse an article straight into a JavaScript object.
#[wasm_bindgen(js_name = parseValue)]
pub fn parse_value(input: &str, lenient: Option<bool>) -> Result<JsValue, JsError> {
    let doc = parse_doc(input, lenient).map_err(|e| JsError::new(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&doc)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Parse an article and write it back out in canonical form.
///
/// Returns `{ markdown }` on success or the same `{ error }` object as
/// [`parse`].
#[wasm_bindgen]
pub fn render_markdown(input: &str) -> String {
    let value = match parse_doc(input, None) {
        Ok(doc) => serde_json::json!({ "markdown": doc.to_markdown() }),
        Err(err) => serde_json::json!({ "error": error_json(&err) }),
    };
    value.to_string()
}

/// List every image in the article, including those inside quotes.
///
/// Returns `{ images: [{ caption, uri, local }] }`, or the same `{ error }`
/// object as [`parse`] when the input does not parse.
#[wasm_bindgen]
pub fn images(input: &str) -> String {
    let doc = match parse_doc(input, None) {
        Ok(doc) => doc,
        Err(err) => return serde_json::json!({ "error": error_json(&err) }).to_string(),
    };
    let images: Vec<_> = doc
        .images()
        .into_iter()
        .map(|image| {
            serde_json::json!({
                "caption": image.caption,
                "uri": image.uri,
                "local": image.is_local(),
            })
        })
        .collect();
    serde_json::json!({ "images": images }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "# Notes\n\n> ![inner](a.png)\n\n![outer](https://x.io/b.png)\n";

    #[test]
    fn parse_returns_doc_json() {
        let value: serde_json::Value = serde_json::from_str(&parse(ARTICLE, None)).unwrap();
        assert_eq!(value["doc"]["title"], "Notes");
        assert_eq!(value["doc"]["body"][0]["kind"], "quote");
        assert_eq!(value["doc"]["body"][1]["kind"], "image");
    }

    #[test]
    fn parse_reports_error_line() {
        let value: serde_json::Value =
            serde_json::from_str(&parse("# T\n\n```rust\nfn main() {}\n", None)).unwrap();
        assert_eq!(value["error"]["line"], 3);
        assert!(value.get("doc").is_none());
    }

    #[test]
    fn lenient_parse_accepts_open_fence() {
        let value: serde_json::Value =
            serde_json::from_str(&parse("# T\n\n$$\nx\n", Some(true))).unwrap();
        assert_eq!(value["doc"]["body"][0]["kind"], "math_block");
    }

    #[test]
    fn images_flattens_quotes() {
        let value: serde_json::Value = serde_json::from_str(&images(ARTICLE)).unwrap();
        let list = &value["images"];
        assert_eq!(list.as_array().map(Vec::len), Some(2));
        assert_eq!(list[0]["uri"], "a.png");
        assert_eq!(list[0]["local"], true);
        assert_eq!(list[1]["local"], false);
    }

    #[test]
    fn images_reports_parse_error_apart_from_empty_list() {
        let empty: serde_json::Value = serde_json::from_str(&images("# T\n\ntext\n")).unwrap();
        assert_eq!(empty["images"].as_array().map(Vec::len), Some(0));

        let broken: serde_json::Value = serde_json::from_str(&images("# T\n\n![bad]\n")).unwrap();
        assert_eq!(broken["error"]["line"], 3);
        assert!(broken.get("images").is_none());
    }

    #[test]
    fn render_markdown_normalises() {
        let value: serde_json::Value =
            serde_json::from_str(&render_markdown("# T\n\n\n\ntext\n")).unwrap();
        assert_eq!(value["markdown"], "# T\n\ntext");
    }

    #[test]
    fn render_markdown_reports_parse_error() {
        let value: serde_json::Value =
            serde_json::from_str(&render_markdown("# T\n\n![bad]\n")).unwrap();
        assert_eq!(value["error"]["line"], 3);
        assert!(value["error"]["message"].as_str().unwrap().contains("line 3"));
        assert!(value.get("markdown").is_none());
    }
}
