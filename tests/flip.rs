use cfn_flip::cfn_json::{parse_cf_json, render_cf_json};
use cfn_flip::cfn_yaml::codec::{collapse, expand};
use cfn_flip::cfn_yaml::{parse_cf_yaml, render_cf_yaml};
use cfn_flip::{flip, to_long_form, to_shorthand, Error, Intrinsic, Node, Options};
use pretty_assertions::assert_eq;

const TEST_JSON: &str = include_str!("fixtures/test.json");
const TEST_YAML: &str = include_str!("fixtures/test.yaml");
const TEST_CLEAN_JSON: &str = include_str!("fixtures/test_clean.json");
const TEST_INVALID_YAML: &str = include_str!("fixtures/test_invalid.yaml");

fn keys(node: &Node) -> Vec<String> {
    node.as_mapping().unwrap().keys().cloned().collect()
}

#[test]
fn test_yaml_fixture_matches_json_fixture() {
    assert_eq!(parse_cf_yaml(TEST_YAML).unwrap(), parse_cf_json(TEST_JSON).unwrap());
}

#[test]
fn test_to_long_form_from_yaml() {
    let output = to_long_form(TEST_YAML, Options::default()).unwrap();
    assert_eq!(output, TEST_JSON.trim_end());
}

#[test]
fn test_to_long_form_from_json() {
    let output = to_long_form(TEST_JSON, Options::default()).unwrap();
    assert_eq!(output, TEST_JSON.trim_end());
}

#[test]
fn test_to_shorthand_uses_tags() {
    let output = to_shorthand(TEST_JSON, Options::default()).unwrap();
    assert!(output.contains("!GetAtt Bucket.Arn"));
    assert!(output.contains("!GetAtt WebServer.PublicDnsName"));
    assert!(output.contains("!Ref Ami"));
    assert!(output.contains("!Condition IsProd"));
    assert!(output.contains("UserData: !Base64"));
    assert!(output.contains("Fn::Join:"), "nested call stays long form");
    assert!(!output.contains("Fn::GetAtt"));
    assert!(!output.contains('['), "block style only: {}", output);
}

#[test]
fn test_round_trip_keeps_structure_and_order() {
    let original = parse_cf_json(TEST_JSON).unwrap();
    let yaml = to_shorthand(TEST_JSON, Options::default()).unwrap();
    let back = parse_cf_yaml(&yaml).unwrap();
    assert_eq!(back, original);
    assert_eq!(
        keys(&back),
        vec![
            "AWSTemplateFormatVersion",
            "Description",
            "Parameters",
            "Conditions",
            "Resources",
            "Outputs"
        ]
    );
    assert_eq!(
        to_long_form(&yaml, Options::default()).unwrap(),
        TEST_JSON.trim_end()
    );
}

#[test]
fn test_reordered_keys_survive_round_trip() {
    let json = r#"{"Zebra": 1, "Apple": {"Ref": "Zebra"}, "Mango": [{"b": 1, "a": 2}]}"#;
    let yaml = to_shorthand(json, Options::default()).unwrap();
    let back = parse_cf_yaml(&yaml).unwrap();
    assert_eq!(keys(&back), vec!["Zebra", "Apple", "Mango"]);
    assert_eq!(back, parse_cf_json(json).unwrap());
}

#[test]
fn test_codec_properties_on_fixture() {
    let expanded = parse_cf_json(TEST_JSON).unwrap();
    let collapsed = collapse(expanded.clone());

    assert_eq!(expand(collapse(expanded.clone())), expanded);
    assert_eq!(collapse(expand(collapsed.clone())), collapsed);
    assert_eq!(collapse(collapsed.clone()), collapsed);
    assert_eq!(expand(expanded.clone()), expanded);
}

#[test]
fn test_get_att_normalisation() {
    let long = parse_cf_json(r#"{"Fn::GetAtt": ["Bucket", "Arn"]}"#).unwrap();
    let short = Node::Tagged(Intrinsic::GetAtt, Box::new(Node::from("Bucket.Arn")));
    assert_eq!(collapse(long.clone()), short);
    assert_eq!(expand(short), long);
}

#[test]
fn test_get_att_dotted_attribute_keeps_list() {
    let json = r#"{"Value": {"Fn::GetAtt": ["Database", "Endpoint.Address"]}}"#;
    let yaml = to_shorthand(json, Options::default()).unwrap();
    assert!(yaml.contains("!GetAtt"));
    assert!(!yaml.contains("Database.Endpoint.Address"));
    assert_eq!(parse_cf_yaml(&yaml).unwrap(), parse_cf_json(json).unwrap());
}

#[test]
fn test_get_att_string_argument_survives_round_trip() {
    let json = r#"{"A": {"Fn::GetAtt": "Bucket.Arn"}}"#;
    let yaml = to_shorthand(json, Options::default()).unwrap();
    assert!(!yaml.contains("!GetAtt"), "dotted string stays long form: {}", yaml);
    assert_eq!(parse_cf_yaml(&yaml).unwrap(), parse_cf_json(json).unwrap());

    let back = to_long_form(&yaml, Options::default()).unwrap();
    assert_eq!(parse_cf_json(&back).unwrap(), parse_cf_json(json).unwrap());
}

#[test]
fn test_yaml_get_att_with_dotted_attribute() {
    let node = parse_cf_yaml("Value: !GetAtt Database.Endpoint.Address\n").unwrap();
    assert_eq!(
        node,
        parse_cf_json(r#"{"Value": {"Fn::GetAtt": ["Database", "Endpoint.Address"]}}"#).unwrap()
    );
}

#[test]
fn test_flip_detects_json() {
    let output = flip(TEST_JSON, Options::default()).unwrap();
    assert_eq!(parse_cf_yaml(&output).unwrap(), parse_cf_json(TEST_JSON).unwrap());
    assert!(output.contains("!Sub"));
}

#[test]
fn test_flip_detects_yaml() {
    let output = flip(TEST_YAML, Options::default()).unwrap();
    assert_eq!(output, TEST_JSON.trim_end());
}

#[test]
fn test_flip_ambiguous_input() {
    let err = flip("Resources: [unclosed\n  - !Ref", Options::default()).unwrap_err();
    assert!(matches!(err, Error::AmbiguousFormat));
}

#[test]
fn test_flip_unknown_tag_is_ambiguous() {
    let err = flip("Value: !Cake lie\n", Options::default()).unwrap_err();
    assert!(matches!(err, Error::AmbiguousFormat));
}

#[test]
fn test_flip_with_validation() {
    let options = Options {
        clean: false,
        validate: true,
    };
    assert!(flip(TEST_JSON, options).is_ok());
    assert!(flip(TEST_YAML, options).is_ok());

    let err = flip(TEST_INVALID_YAML, options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Resource \"Test\" has unexpected properties: Cake, WeightInKilograms"
    );
}

#[test]
fn test_clean_rewrites_join() {
    let options = Options {
        clean: true,
        validate: false,
    };
    let output = to_long_form(TEST_CLEAN_JSON, options).unwrap();
    let node = parse_cf_json(&output).unwrap();
    let queue_name = node
        .get("Resources")
        .and_then(|r| r.get("Queue"))
        .and_then(|q| q.get("Properties"))
        .and_then(|p| p.get("QueueName"))
        .unwrap();
    assert_eq!(
        queue_name,
        &parse_cf_json(
            r#"{"Fn::Sub": ["${AWS::StackName}-${Param1}-queue", {"Param1": {"Fn::ImportValue": "SharedPrefix"}}]}"#
        )
        .unwrap()
    );
}

#[test]
fn test_render_adapters_directly() {
    let node = parse_cf_yaml("A: !Ref B\n").unwrap();
    assert_eq!(render_cf_json(&node).unwrap(), "{\n    \"A\": {\n        \"Ref\": \"B\"\n    }\n}");
    assert_eq!(render_cf_yaml(node).unwrap(), "A: !Ref B\n");
}
