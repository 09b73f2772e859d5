//! ESTree JSON import.
//!
//! External parsers (esprima, acorn, espree, ...) hand over their output in
//! the ESTree exchange form. Any JSON object carrying a string `type` is a
//! node; scalars become scalar properties; arrays become child lists; plain
//! objects without a `type` (`regex`, a template element's `value`) are
//! flattened into dotted keys such as `value.cooked`. Location metadata is
//! dropped.

use serde_json::{Map, Value as Json};
use smallvec::SmallVec;

use crate::builder::TreeBuilder;
use crate::tree::{Node, NodeId, Prop, SyntaxTree};
use crate::Name;
use estel_stack::ensure_sufficient_stack;

/// Keys that carry source positions or comments rather than structure.
const SKIPPED_KEYS: &[&str] = &[
    "loc",
    "range",
    "start",
    "end",
    "comments",
    "tokens",
    "leadingComments",
    "trailingComments",
];

/// Failure to convert ESTree JSON into a `SyntaxTree`.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid ESTree JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an ESTree node object at `{path}`")]
    NotANode { path: String },
    #[error("node at `{path}` has no string `type` field")]
    MissingType { path: String },
    #[error("unsupported list element at `{path}`: lists may only hold nodes or null")]
    UnsupportedListElement { path: String },
}

impl SyntaxTree {
    /// Parse ESTree JSON text into a tree.
    pub fn from_estree_json(text: &str) -> Result<SyntaxTree, ImportError> {
        let json: Json = serde_json::from_str(text)?;
        SyntaxTree::from_estree_value(&json)
    }

    /// Convert an already-parsed ESTree JSON value into a tree.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn from_estree_value(json: &Json) -> Result<SyntaxTree, ImportError> {
        let mut importer = Importer {
            builder: TreeBuilder::new(),
        };
        let root = importer.node(json, "$")?;
        tracing::debug!(nodes = importer.builder.len(), "imported ESTree");
        Ok(importer.builder.finish(root))
    }
}

struct Importer {
    builder: TreeBuilder,
}

impl Importer {
    fn node(&mut self, json: &Json, path: &str) -> Result<NodeId, ImportError> {
        ensure_sufficient_stack(|| {
            let Json::Object(object) = json else {
                return Err(ImportError::NotANode {
                    path: path.to_string(),
                });
            };
            let Some(Json::String(tag)) = object.get("type") else {
                return Err(ImportError::MissingType {
                    path: path.to_string(),
                });
            };

            let mut props = SmallVec::new();
            self.fields(object, "", path, &mut props)?;
            Ok(self.builder.push(Node::new(Name::new(tag), props)))
        })
    }

    fn fields(
        &mut self,
        object: &Map<String, Json>,
        prefix: &str,
        path: &str,
        props: &mut SmallVec<[(Name, Prop); 4]>,
    ) -> Result<(), ImportError> {
        for (key, value) in object {
            if (prefix.is_empty() && key == "type") || SKIPPED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let key = format!("{prefix}{key}");
            let child_path = format!("{path}.{key}");
            let prop = match value {
                Json::Null => Prop::Null,
                Json::Bool(b) => Prop::Bool(*b),
                Json::Number(n) => Prop::Num(n.as_f64().unwrap_or(f64::NAN)),
                Json::String(s) => Prop::Str(Name::new(s)),
                Json::Array(items) => Prop::List(self.list(items, &child_path)?),
                Json::Object(inner) if inner.contains_key("type") => {
                    Prop::Node(self.node(value, &child_path)?)
                }
                Json::Object(inner) => {
                    self.fields(inner, &format!("{key}."), &child_path, props)?;
                    continue;
                }
            };
            props.push((Name::from(key), prop));
        }
        Ok(())
    }

    fn list(&mut self, items: &[Json], path: &str) -> Result<Vec<Option<NodeId>>, ImportError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Json::Null => Ok(None),
                Json::Object(_) => self.node(item, &format!("{path}[{i}]")).map(Some),
                _ => Err(ImportError::UnsupportedListElement {
                    path: format!("{path}[{i}]"),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
