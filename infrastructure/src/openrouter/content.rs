//! Reply content helpers.
//!
//! A completion's `content` is either a plain string or a list of typed
//! blocks. Images arrive as `image_url` blocks, as raw base64 `image`
//! blocks, or inline as data URIs in a string.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static INLINE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:image/[^;]+;base64,[A-Za-z0-9+/=]+").expect("valid regex")
});

/// Data-URIs of all images in `content`, in order of appearance.
pub fn extract_images(content: &Value) -> Vec<String> {
    match content {
        Value::Array(blocks) => blocks.iter().filter_map(block_image).collect(),
        Value::String(text) => INLINE_IMAGE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn block_image(block: &Value) -> Option<String> {
    match block.get("type")?.as_str()? {
        "image_url" => {
            let url = block.get("image_url")?.get("url")?.as_str()?;
            url.starts_with("data:image").then(|| url.to_string())
        }
        "image" => {
            let data = block.get("data")?;
            let data = data.as_str().map(str::to_string).unwrap_or_else(|| data.to_string());
            Some(format!("data:image/png;base64,{}", data))
        }
        _ => None,
    }
}

/// Text of `content`; text blocks are joined with newlines.
pub fn text_of(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}
