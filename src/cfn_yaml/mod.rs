// CloudFormation YAML with short-form intrinsic function tags

pub mod codec;
pub mod errors;
pub mod mappings;
pub mod types;

use errors::{Error, Result};
use types::Node;

/// Parse CloudFormation YAML, returning the long-form tree.
///
/// JSON input is accepted too, since it is also valid YAML.
pub fn parse_cf_yaml(yaml_str: &str) -> Result<Node> {
    let value: serde_yml::Value = serde_yml::from_str(yaml_str)?;
    tracing::trace!("parsed YAML document");
    let node = Node::from_yaml(value)?;
    Ok(codec::expand(node))
}

/// Render a tree as block-style YAML, using short-form tags wherever a
/// function call is recognised.
pub fn render_cf_yaml(node: Node) -> Result<String> {
    let value = codec::collapse(node).to_yaml();
    serde_yml::to_string(&value)
        .map_err(|e| Error::render(format!("Failed to render YAML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_expands_tags() {
        let node = parse_cf_yaml(
            "Value: !GetAtt Bucket.Arn\nName: !Sub '${AWS::StackName}-x'\n",
        )
        .unwrap();
        let expected: Node = serde_json::from_str(
            r#"{"Value": {"Fn::GetAtt": ["Bucket", "Arn"]}, "Name": {"Fn::Sub": "${AWS::StackName}-x"}}"#,
        )
        .unwrap();
        assert_eq!(node, expected);
    }

    #[test]
    fn test_parse_accepts_json() {
        let node = parse_cf_yaml(r#"{"Ref": "Bucket"}"#).unwrap();
        let expected: Node = serde_json::from_str(r#"{"Ref": "Bucket"}"#).unwrap();
        assert_eq!(node, expected);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_cf_yaml("a: [1, 2\nb: c").unwrap_err().is_format_error());
        assert!(parse_cf_yaml("a: 1\na: 2\n").unwrap_err().is_format_error());
        assert!(parse_cf_yaml("a: !Cake lie\n").unwrap_err().is_format_error());
    }

    #[test]
    fn test_render_uses_short_form() {
        let node: Node = serde_json::from_str(
            r#"{"Bucket": {"Ref": "MyBucket"}, "Arn": {"Fn::GetAtt": ["MyBucket", "Arn"]}}"#,
        )
        .unwrap();
        assert_eq!(
            render_cf_yaml(node).unwrap(),
            "Bucket: !Ref MyBucket\nArn: !GetAtt MyBucket.Arn\n"
        );
    }

    #[test]
    fn test_render_keeps_key_order() {
        let node: Node = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        assert_eq!(render_cf_yaml(node).unwrap(), "z: 1\na: 2\nm: 3\n");
    }
}
