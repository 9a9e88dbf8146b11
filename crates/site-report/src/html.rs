//! HTML fragment handling
//!
//! Reports are built as a flat fragment of `<h1>` and `<p>` blocks. The
//! parser here understands exactly that subset; anything else is skipped.

/// Block-level element kinds understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Heading,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: text.into(),
        }
    }
}

/// Escape text for inclusion in an element body
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Split a fragment into heading and paragraph blocks, in document order
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        let name = after[..end]
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let body = &after[end + 1..];

        let make: fn(String) -> Block = match name.as_str() {
            "h1" => Block::heading,
            "p" => Block::paragraph,
            _ => {
                rest = body;
                continue;
            }
        };

        let close = format!("</{}>", name);
        let (inner, remainder) = match body.find(&close) {
            Some(pos) => (&body[..pos], &body[pos + close.len()..]),
            None => (body, ""),
        };

        blocks.push(make(unescape(strip_tags(inner).trim())));
        rest = remainder;
    }

    blocks
}
