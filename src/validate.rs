use crate::cfn_yaml::codec::as_function_call;
use crate::cfn_yaml::errors::{Result, ValidationError};
use crate::cfn_yaml::mappings::Intrinsic;
use crate::cfn_yaml::types::{Mapping, Node};
use crate::spec_table::{spec_table, ResourceSpec, SpecTable};

type Validation = std::result::Result<(), ValidationError>;

/// Confirm that the template conforms to the CloudFormation resource
/// specification. Stops at the first resource that fails.
pub fn validate(source: &Node) -> Result<()> {
    let table = spec_table()?;
    Ok(validate_with(source, table)?)
}

/// As [`validate`], against an explicit specification table.
pub fn validate_with(source: &Node, table: &SpecTable) -> Validation {
    let template = source
        .as_mapping()
        .ok_or_else(|| ValidationError::new("Badly formatted input"))?;

    let resources = template
        .get("Resources")
        .ok_or_else(|| ValidationError::new("Missing \"Resources\" property"))?
        .as_mapping()
        .ok_or_else(|| ValidationError::new("Badly formatted input"))?;

    for (resource_name, resource) in resources {
        validate_resource(resource_name, resource, table, template)?;
    }

    tracing::debug!(resources = resources.len(), "template validated");
    Ok(())
}

/// Confirm that a single resource is valid.
/// The whole template is passed so that references can be checked against it.
fn validate_resource(
    resource_name: &str,
    resource: &Node,
    table: &SpecTable,
    template: &Mapping,
) -> Validation {
    let badly_formatted =
        || ValidationError::new(format!("Badly formatted resource: {}", resource_name));

    let resource = resource.as_mapping().ok_or_else(badly_formatted)?;
    let resource_type = resource.get("Type").ok_or_else(badly_formatted)?;

    let spec = resource_type
        .as_str()
        .and_then(|name| table.resource_type(name))
        .ok_or_else(|| {
            ValidationError::new(format!(
                "Resource \"{}\" has invalid type: {}",
                resource_name,
                describe(resource_type)
            ))
        })?;

    let empty = Mapping::new();
    let properties = match resource.get("Properties") {
        Some(properties) => properties.as_mapping().ok_or_else(badly_formatted)?,
        None => &empty,
    };

    validate_properties(resource_name, properties, spec)?;

    let mut outcome = Ok(());
    let mut check = |function: Intrinsic, argument: &Node| {
        if outcome.is_ok() {
            outcome = match function {
                Intrinsic::Ref => validate_ref(argument, template),
                _ => validate_get_att(resource_name, argument, template),
            };
        }
    };
    for value in properties.values() {
        visit_references(value, &mut check);
    }
    outcome
}

/// Compare the declared properties against the resource type's spec.
fn validate_properties(
    resource_name: &str,
    properties: &Mapping,
    spec: &ResourceSpec,
) -> Validation {
    let missing: Vec<&str> = spec
        .required()
        .filter(|property| !properties.contains_key(*property))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::new(format!(
            "Resource \"{}\" has missing required properties: {}",
            resource_name,
            missing.join(", ")
        )));
    }

    let mut unexpected: Vec<&str> = properties
        .keys()
        .map(String::as_str)
        .filter(|property| !spec.is_allowed(property))
        .collect();
    if !unexpected.is_empty() {
        unexpected.sort_unstable();
        return Err(ValidationError::new(format!(
            "Resource \"{}\" has unexpected properties: {}",
            resource_name,
            unexpected.join(", ")
        )));
    }

    Ok(())
}

/// Confirm that the target of a `Ref` exists. Currently accepts everything.
pub fn validate_ref(_target: &Node, _template: &Mapping) -> Validation {
    Ok(())
}

/// Confirm that the resource named in a `Fn::GetAtt` has the attribute.
/// Currently accepts everything.
pub fn validate_get_att(_resource_name: &str, _target: &Node, _template: &Mapping) -> Validation {
    Ok(())
}

/// Calls `visit` with every `Ref` and `Fn::GetAtt` found below `node`.
fn visit_references(node: &Node, visit: &mut dyn FnMut(Intrinsic, &Node)) {
    match node {
        Node::Mapping(map) => {
            if let Some((function @ (Intrinsic::Ref | Intrinsic::GetAtt), argument)) =
                as_function_call(map)
            {
                visit(function, argument);
            }
            for value in map.values() {
                visit_references(value, visit);
            }
        }
        Node::Tagged(function, argument) => {
            if matches!(function, Intrinsic::Ref | Intrinsic::GetAtt) {
                visit(*function, argument);
            }
            visit_references(argument, visit);
        }
        Node::Sequence(items) => {
            for item in items {
                visit_references(item, visit);
            }
        }
        _ => {}
    }
}

fn describe(node: &Node) -> String {
    match node {
        Node::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
