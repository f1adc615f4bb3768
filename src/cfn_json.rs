use crate::cfn_yaml::errors::{Error, Result};
use crate::cfn_yaml::types::Node;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

const INDENT: &[u8] = b"    ";

/// Parse a long-form (JSON) template. No tag handling takes place here.
pub fn parse_cf_json(json_str: &str) -> Result<Node> {
    let node: Node = serde_json::from_str(json_str)?;
    tracing::trace!("parsed JSON document");
    Ok(node)
}

/// Render a tree as JSON indented by four spaces, keeping key order.
///
/// Any short-form nodes are written as their single-key object.
pub fn render_cf_json(node: &Node) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    node.serialize(&mut serializer)
        .map_err(|e| Error::render(format!("Failed to render JSON: {}", e)))?;
    String::from_utf8(buf).map_err(|e| Error::render(format!("Failed to render JSON: {}", e)))
}
