// Conversion between long-form function objects and YAML short-form tags

use super::mappings::Intrinsic;
use super::types::{Mapping, Node};

/// Returns the function and its argument when `map` is exactly one known
/// function key. No arity or type checks are made on the argument.
pub fn as_function_call(map: &Mapping) -> Option<(Intrinsic, &Node)> {
    if map.len() != 1 {
        return None;
    }
    let (key, argument) = map.first()?;
    Intrinsic::from_long_name(key).map(|function| (function, argument))
}

/// Rewrites every short-form tag into its single-key mapping equivalent.
///
/// A `!GetAtt` whose argument is a dotted string is split at the first dot,
/// so `!GetAtt Bucket.Arn` becomes `{"Fn::GetAtt": ["Bucket", "Arn"]}`.
pub fn expand(node: Node) -> Node {
    match node {
        Node::Tagged(function, argument) => untag(function, expand(*argument)),
        Node::Mapping(map) => Node::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, expand(value)))
                .collect(),
        ),
        Node::Sequence(items) => Node::Sequence(items.into_iter().map(expand).collect()),
        scalar => scalar,
    }
}

/// Rewrites every single-key function mapping into its short-form tag.
///
/// A `Fn::GetAtt` over two plain names is written as the dotted string,
/// while one already holding a dotted string stays in long form.
/// A YAML node carries at most one tag, so a function whose whole argument
/// is another function call keeps that inner call in long form.
pub fn collapse(node: Node) -> Node {
    match node {
        Node::Mapping(map) => {
            let map: Mapping = map
                .into_iter()
                .map(|(key, value)| (key, collapse(value)))
                .collect();
            let function = match as_function_call(&map) {
                // A dotted string argument would be split apart on the way back
                Some((Intrinsic::GetAtt, Node::String(path))) if path.contains('.') => None,
                call => call.map(|(function, _)| function),
            };
            match function {
                Some(function) => {
                    let argument = map.into_iter().next().map(|(_, v)| v).unwrap_or(Node::Null);
                    tagged(function, argument)
                }
                None => Node::Mapping(map),
            }
        }
        Node::Tagged(function, argument) => tagged(function, collapse(*argument)),
        Node::Sequence(items) => Node::Sequence(items.into_iter().map(collapse).collect()),
        scalar => scalar,
    }
}

fn tagged(function: Intrinsic, argument: Node) -> Node {
    let argument = match (function, argument) {
        (_, Node::Tagged(inner, inner_argument)) => untag(inner, *inner_argument),
        (Intrinsic::GetAtt, argument) => join_get_att(argument),
        (_, argument) => argument,
    };
    Node::Tagged(function, Box::new(argument))
}

/// The long form of one tagged node. Its argument is taken as it is.
fn untag(function: Intrinsic, argument: Node) -> Node {
    let argument = match (function, argument) {
        (Intrinsic::GetAtt, Node::String(path)) => split_get_att(path),
        (_, argument) => argument,
    };
    Node::function_call(function, argument)
}

fn split_get_att(path: String) -> Node {
    match path.split_once('.') {
        Some((resource, attribute)) => Node::Sequence(vec![resource.into(), attribute.into()]),
        None => Node::String(path),
    }
}

// Names that themselves contain a dot keep the list form, since the dotted
// string could not be split back the same way.
fn join_get_att(argument: Node) -> Node {
    if let Node::Sequence(items) = &argument {
        if let [Node::String(resource), Node::String(attribute)] = items.as_slice() {
            if !resource.contains('.') && !attribute.contains('.') {
                return Node::String(format!("{}.{}", resource, attribute));
            }
        }
    }
    argument
}
