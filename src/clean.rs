use crate::cfn_yaml::codec::as_function_call;
use crate::cfn_yaml::mappings::Intrinsic;
use crate::cfn_yaml::types::{Mapping, Node};
use std::collections::HashSet;

/// Tidies up a template, rewriting `Fn::Join` calls as the equivalent,
/// more readable, `Fn::Sub`.
pub fn clean(source: Node) -> Node {
    match source {
        Node::Mapping(map) => {
            if let Some((Intrinsic::Join, argument)) = as_function_call(&map) {
                return convert_join(argument.clone());
            }
            Node::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, clean(value)))
                    .collect(),
            )
        }
        Node::Tagged(Intrinsic::Join, argument) => convert_join(*argument),
        Node::Tagged(function, argument) => Node::Tagged(function, Box::new(clean(*argument))),
        Node::Sequence(items) => Node::Sequence(items.into_iter().map(clean).collect()),
        scalar => scalar,
    }
}

/// Turns the arguments of a `Fn::Join` into a `Fn::Sub`, a plain string, or
/// back into a join when it cannot be expressed as a substitution.
fn convert_join(value: Node) -> Node {
    let Some((separator, parts)) = join_arguments(&value) else {
        return keep_join(value);
    };

    let parts: Vec<Node> = match parts {
        Node::String(s) => return Node::String(s),
        Node::Sequence(parts) => parts.into_iter().map(clean).collect(),
        _ => return keep_join(value),
    };

    let mut reserved = HashSet::new();
    for name in parts.iter().filter_map(named_variable) {
        if let Some((resource, _)) = name.split_once('.') {
            reserved.insert(resource.to_string());
        }
        reserved.insert(name);
    }
    let mut params = Mapping::new();
    let mut pieces = Vec::with_capacity(parts.len());

    for part in parts {
        match part {
            Node::String(s) => pieces.push(Piece::Text(s)),
            part => match placeholder(part, &reserved, &mut params) {
                Some(variable) => pieces.push(Piece::Variable(variable)),
                None => return keep_join(value),
            },
        }
    }

    if pieces.iter().all(|piece| matches!(piece, Piece::Text(_))) {
        let texts: Vec<String> = pieces
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Text(text) => Some(text),
                Piece::Variable(_) => None,
            })
            .collect();
        return Node::String(texts.join(&separator));
    }

    let source = Node::String(sub_source(pieces, &separator));
    if params.is_empty() {
        return Node::function_call(Intrinsic::Sub, source);
    }
    Node::function_call(Intrinsic::Sub, Node::Sequence(vec![source, Node::Mapping(params)]))
}

/// The delimiter and part list of a well-shaped join.
fn join_arguments(value: &Node) -> Option<(String, Node)> {
    match value.as_sequence()? {
        [Node::String(separator), parts] => Some((separator.clone(), parts.clone())),
        _ => None,
    }
}

fn function_of(part: &Node) -> Option<(Intrinsic, &Node)> {
    match part {
        Node::Mapping(map) => as_function_call(map),
        Node::Tagged(function, argument) => Some((*function, argument.as_ref())),
        _ => None,
    }
}

/// The name a `Ref` or `Fn::GetAtt` part is written as inside `${...}`.
fn named_variable(part: &Node) -> Option<String> {
    match function_of(part)? {
        (Intrinsic::Ref, Node::String(name)) => Some(name.clone()),
        (Intrinsic::GetAtt, Node::String(path)) => Some(path.clone()),
        (Intrinsic::GetAtt, Node::Sequence(items)) => {
            let names: Option<Vec<&str>> = items.iter().map(Node::as_str).collect();
            names.map(|names| names.join("."))
        }
        _ => None,
    }
}

/// The `${...}` variable standing in for a non-string join part. `Ref` and
/// `Fn::GetAtt` map onto their own names; any other function becomes a
/// numbered parameter, shared by identical parts and never reusing a name
/// in `reserved`.
fn placeholder(part: Node, reserved: &HashSet<String>, params: &mut Mapping) -> Option<String> {
    function_of(&part)?;
    if let Some(name) = named_variable(&part) {
        return Some(name);
    }

    if let Some((name, _)) = params.iter().find(|(_, existing)| **existing == part) {
        return Some(name.clone());
    }
    let name = (1..)
        .map(|n| format!("Param{}", n))
        .find(|name| !reserved.contains(name) && !params.contains_key(name))?;
    params.insert(name.clone(), part);
    Some(name)
}

enum Piece {
    Text(String),
    Variable(String),
}

/// Writes the pieces out as a `Fn::Sub` string. Literal runs, separators
/// included, are escaped as a whole so no `${` survives from them.
fn sub_source(pieces: Vec<Piece>, separator: &str) -> String {
    let mut source = String::new();
    let mut text = String::new();
    for (i, piece) in pieces.into_iter().enumerate() {
        if i > 0 {
            text.push_str(separator);
        }
        match piece {
            Piece::Text(literal) => text.push_str(&literal),
            Piece::Variable(name) => {
                source.push_str(&escape_sub(&text));
                text.clear();
                source.push_str("${");
                source.push_str(&name);
                source.push('}');
            }
        }
    }
    source.push_str(&escape_sub(&text));
    source
}

fn escape_sub(text: &str) -> String {
    text.replace("${", "${!")
}

fn keep_join(value: Node) -> Node {
    Node::function_call(Intrinsic::Join, clean(value))
}
