//! Brace-delimited block scanning for devicetree-style sources.
//!
//! ZMK keymaps are not parsed with a grammar. The source is split into
//! `header { body }` blocks by counting braces, and each block's own
//! properties (`name = value;`) are then searched by name.

use regex::Regex;
use std::sync::LazyLock;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("valid line comment regex"));
static NUMBER_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\s*(\d+)\s*>").expect("valid number cell regex"));
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]*)""#).expect("valid quoted string regex"));

/// Removes `/* ... */` and `// ...` comments.
///
/// Comment bodies may contain unbalanced braces, so this must run before
/// [`scan_blocks`].
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let text = BLOCK_COMMENT.replace_all(text, "");
    LINE_COMMENT.replace_all(&text, "").into_owned()
}

/// A `header { body }` block found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Text before the opening brace (e.g. `mt0: mt0`, `&mt`, `keymap`)
    pub header: String,
    /// Text between the braces
    pub body: &'a str,
    /// Nesting depth (0 for top-level blocks)
    pub depth: usize,
    /// Byte offset of the opening brace
    pub open: usize,
    /// Byte offset just past the closing brace (end of text if unterminated)
    pub close: usize,
}

impl Block<'_> {
    /// Node label, if the header has the `label: name` form.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.header
            .split_once(':')
            .map(|(label, _)| label.trim())
            .filter(|label| !label.is_empty())
    }

    /// Node name: the part after `label:`, or the whole header.
    #[must_use]
    pub fn node_name(&self) -> &str {
        self.header
            .split_once(':')
            .map_or(self.header.as_str(), |(_, name)| name.trim())
    }

    /// True for `NAME: NAME { ... }` blocks.
    #[must_use]
    pub fn is_self_referential(&self) -> bool {
        self.label()
            .is_some_and(|label| is_identifier(label) && label == self.node_name())
    }

    /// The referenced node for `&name { ... }` override blocks.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.header
            .strip_prefix('&')
            .map(str::trim)
            .filter(|name| is_identifier(name))
    }

    /// True if `other` sits directly inside this block.
    #[must_use]
    pub fn is_parent_of(&self, other: &Block<'_>) -> bool {
        other.depth == self.depth + 1 && other.open > self.open && other.close <= self.close
    }

    /// The block's own properties, with nested child blocks removed.
    #[must_use]
    pub fn properties(&self) -> Properties {
        Properties::new(strip_nested(self.body))
    }
}

/// Splits text into blocks at every depth, in order of their opening brace.
///
/// Braces inside double-quoted strings are ignored and an unterminated
/// block runs to the end of the text. Stray closing braces are skipped.
#[must_use]
pub fn scan_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks: Vec<Block<'_>> = Vec::new();
    let mut open_stack: Vec<usize> = Vec::new();
    let mut segment_start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => {
                blocks.push(Block {
                    header: clean_header(&text[segment_start..i]),
                    body: "",
                    depth: open_stack.len(),
                    open: i,
                    close: text.len(),
                });
                open_stack.push(blocks.len() - 1);
                segment_start = i + 1;
            }
            '}' => {
                if let Some(idx) = open_stack.pop() {
                    let block = &mut blocks[idx];
                    block.body = &text[block.open + 1..i];
                    block.close = i + 1;
                }
                segment_start = i + 1;
            }
            ';' => segment_start = i + 1,
            _ => {}
        }
    }

    for idx in open_stack {
        let block = &mut blocks[idx];
        block.body = &text[block.open + 1..];
    }

    blocks
}

/// Header text without preprocessor lines, whitespace collapsed.
fn clean_header(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops everything inside nested braces (and the braces themselves).
fn strip_nested(body: &str) -> String {
    let mut own = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut in_string = false;

    for ch in body.chars() {
        if in_string {
            if depth == 0 {
                own.push(ch);
            }
            if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                if ch == '"' {
                    in_string = true;
                }
                own.push(ch);
            }
            '"' => in_string = true,
            _ => {}
        }
    }

    own
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// The `name = value;` assignments of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    text: String,
}

impl Properties {
    /// Wraps raw property text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Raw value of a property: everything between `=` and `;`, trimmed.
    ///
    /// The name must match exactly, so `bindings` does not match
    /// `sensor-bindings` or `#binding-cells`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let pattern = format!(r"(?:^|[^\w#-]){}\s*=\s*([^;]*)", regex::escape(name));
        let regex = Regex::new(&pattern).ok()?;
        regex
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .map(|value| value.as_str().trim())
    }

    /// True if the property is assigned.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whitespace-separated cells of a `<...>, <...>` value.
    #[must_use]
    pub fn cells(&self, name: &str) -> Option<Vec<&str>> {
        self.get(name).map(split_cells)
    }

    /// A `<N>` numeric value.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<u32> {
        let value = self.get(name)?;
        NUMBER_CELL
            .captures(value)
            .and_then(|caps| caps[1].parse().ok())
    }

    /// A `"..."` string value.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        let value = self.get(name)?;
        QUOTED
            .captures(value)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Splits a cell list, dropping the `<`, `>` and `,` delimiters.
#[must_use]
pub fn split_cells(value: &str) -> Vec<&str> {
    value
        .split(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | ','))
        .filter(|cell| !cell.is_empty())
        .collect()
}
