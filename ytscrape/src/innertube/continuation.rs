//! Finding continuation tokens.

use serde_json::Value;

const KNOWN_PATHS: [&str; 3] = [
    "/continuationEndpoint/continuationCommand/token",
    "/button/buttonRenderer/command/continuationCommand/token",
    "/trigger/continuationCommand/token",
];

/// Extracts the token from a continuation marker, looking inside a
/// `continuationItemRenderer` wrapper when there is one.
///
/// The known shapes are tried first; failing those, the whole subtree is searched.
pub fn continuation_token(node: &Value) -> Option<String> {
    let node = node.get("continuationItemRenderer").unwrap_or(node);
    KNOWN_PATHS
        .iter()
        .find_map(|path| node.pointer(path).and_then(Value::as_str))
        .or_else(|| {
            depth_first(node, |v| {
                v.pointer("/continuationCommand/token").and_then(Value::as_str)
            })
        })
        .map(str::to_string)
}

/// Returns the token of the first continuation marker among `entries`.
pub fn next_token<'a>(entries: impl IntoIterator<Item = &'a Value>) -> Option<String> {
    entries
        .into_iter()
        .filter(|e| e.get("continuationItemRenderer").is_some())
        .find_map(continuation_token)
}

/// Pre-order traversal that returns the first value `f` produces.
pub(crate) fn depth_first<'a, T>(
    root: &'a Value,
    mut f: impl FnMut(&'a Value) -> Option<T>,
) -> Option<T> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                if let Some(found) = f(node) {
                    return Some(found);
                }
                stack.extend(map.values().rev());
            }
            Value::Array(values) => stack.extend(values.iter().rev()),
            _ => {}
        }
    }
    None
}
