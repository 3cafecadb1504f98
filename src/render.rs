//! Canonical text form of a [`DataTree`].
//!
//! The output is a block-style YAML subset: two-space indentation, map
//! entries in insertion order, sequence items by position, strings always
//! double-quoted and reals always written with a fraction or an exponent so
//! that re-parsing recovers the exact scalar type.

use crate::error::TreeError;
use crate::node::{NodeKind, ScalarValue, TreeNode, Value, yaml_key};
use crate::tree::DataTree;
use std::fmt;

const INDENT: &str = "  ";

const RESERVED_WORDS: &[&str] = &[
    "true", "false", "null", "yes", "no", "on", "off", "y", "n", "inf", "infinity", "nan",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append a `# <type>` comment to every node line.
    pub annotate_types: bool,
}

struct Writer<'a> {
    tree: &'a DataTree,
    options: RenderOptions,
    out: String,
}

impl<'a> Writer<'a> {
    fn entry(&mut self, node: &TreeNode, depth: usize) {
        self.pad(depth);
        self.out.push_str(&quote_key(node.name()));
        self.out.push(':');
        self.value(node, depth);
    }

    fn item(&mut self, node: &TreeNode, depth: usize) {
        self.pad(depth);
        self.out.push('-');
        self.value(node, depth);
    }

    fn value(&mut self, node: &TreeNode, depth: usize) {
        if let Some(scalar) = node.value() {
            self.out.push(' ');
            self.out.push_str(&scalar.to_string());
            self.end_line(node);
            return;
        }

        let tree: &'a DataTree = self.tree;
        let mut children = tree.children(node.address()).peekable();
        if children.peek().is_none() {
            self.out.push_str(match node.kind() {
                NodeKind::Sequence => " []",
                _ => " {}",
            });
            self.end_line(node);
            return;
        }

        self.end_line(node);
        for child in children {
            match node.kind() {
                NodeKind::Sequence => self.item(child, depth + 1),
                _ => self.entry(child, depth + 1),
            }
        }
    }

    fn end_line(&mut self, node: &TreeNode) {
        if self.options.annotate_types {
            self.out.push_str(" # ");
            self.out.push_str(node.type_name());
        }
        self.out.push('\n');
    }

    fn pad(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }
}

fn quote_key(key: &str) -> String {
    let mut chars = key.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !RESERVED_WORDS.contains(&key.to_ascii_lowercase().as_str());
    if plain { key.to_string() } else { quote(key) }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // YAML treats the Unicode line and paragraph separators as breaks.
            c if c.is_control()
                || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}') =>
            {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Real(v) if v.is_nan() => f.write_str(".nan"),
            ScalarValue::Real(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { ".inf" } else { "-.inf" })
            }
            // Debug keeps the fraction (`1.0`) and switches to exponent form
            // at the extremes (`1e20`), both of which parse back as reals.
            ScalarValue::Real(v) => write!(f, "{:?}", v),
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::Str(v) => f.write_str(&quote(v)),
        }
    }
}

impl DataTree {
    pub fn serialize(&self) -> String {
        self.serialize_with(&RenderOptions::default())
    }

    pub fn serialize_with(&self, options: &RenderOptions) -> String {
        let mut writer = Writer {
            tree: self,
            options: *options,
            out: String::new(),
        };
        writer.entry(self.root(), 0);
        writer.out
    }

    /// Rebuilds a tree from its canonical text: a document holding a single
    /// map entry whose key is the tree name.
    pub fn from_yaml(text: &str) -> Result<Self, TreeError> {
        let document: serde_yaml::Value = serde_yaml::from_str(text)?;
        let serde_yaml::Value::Mapping(mapping) = document else {
            return Err(TreeError::MalformedDocument(
                "expected a map holding the tree".to_string(),
            ));
        };
        if mapping.len() != 1 {
            return Err(TreeError::MalformedDocument(format!(
                "expected exactly one root entry, found {}",
                mapping.len()
            )));
        }
        let Some((key, body)) = mapping.into_iter().next() else {
            return Err(TreeError::MalformedDocument("empty document".to_string()));
        };
        let name = yaml_key(key)?;
        let graph = Value::from_yaml(body)?;
        DataTree::build(&name, &graph)
    }
}
