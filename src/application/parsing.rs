//! # Parsing Utils
//!
//! Decodes a model reply into the ordered batch of operations it requests.
//!
//! The reply must be a JSON array whose elements are objects with the keys
//! `shell` (string), `edit` (`{path, content}`) and `done` (bool). Keys match
//! case-insensitively, a repeated key keeps its last value, and `null` stands
//! for an absent field. Only the JSON itself and the field types are checked.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::types::Operation;

/// The reply was not a JSON array of operation objects. Fatal for the run.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ParseError(#[from] serde_json::Error);

#[derive(Debug, Default, Deserialize)]
struct WireOperation {
    #[serde(default)]
    shell: Option<String>,
    #[serde(default)]
    edit: Option<WireEdit>,
    #[serde(default)]
    done: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct WireEdit {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl WireOperation {
    fn from_fields(fields: Map<String, Value>) -> Result<Self, ParseError> {
        Ok(serde_json::from_value(fold_keys(fields))?)
    }

    fn is_done(&self) -> bool {
        self.done == Some(true)
    }

    /// An element normally maps to one operation; one that sets several keys
    /// yields them in shell, edit, done order.
    fn into_operations(self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(1);
        let done = self.is_done();

        if let Some(command) = self.shell.filter(|c| !c.is_empty()) {
            ops.push(Operation::Shell { command });
        }
        if let Some(edit) = self.edit {
            ops.push(Operation::Edit {
                path: edit.path.unwrap_or_default(),
                content: edit.content.unwrap_or_default(),
            });
        }
        if done {
            ops.push(Operation::Done);
        }

        if ops.is_empty() {
            ops.push(Operation::Noop);
        }
        ops
    }
}

/// Lowercase object keys, nested objects included. On a collision the key
/// visited last wins.
fn fold_keys(fields: Map<String, Value>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::Object(inner) => fold_keys(inner),
                    other => other,
                };
                (key.to_lowercase(), value)
            })
            .collect(),
    )
}

/// Parse a raw model reply into operations, preserving order.
///
/// A batch of exactly one element with `done: true` is the completion signal
/// and yields a lone [`Operation::Done`], whatever else that element sets.
pub fn parse_operations(raw: &str) -> Result<Vec<Operation>, ParseError> {
    let elements: Vec<Option<Map<String, Value>>> = serde_json::from_str(raw)?;

    let elements = elements
        .into_iter()
        .map(|element| match element {
            Some(fields) => WireOperation::from_fields(fields),
            None => Ok(WireOperation::default()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if matches!(elements.as_slice(), [element] if element.is_done()) {
        return Ok(vec![Operation::Done]);
    }

    Ok(elements
        .into_iter()
        .flat_map(WireOperation::into_operations)
        .collect())
}
