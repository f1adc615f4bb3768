// Format-agnostic, order-preserving template tree

use super::errors::{Error, Result};
use super::mappings::Intrinsic;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yml::value::{Tag, TaggedValue};
use std::fmt;

/// Ordered key/value pairs; iteration follows insertion order.
pub type Mapping = IndexMap<String, Node>;

/// A template document as parsed from either JSON or YAML.
#[derive(Debug, Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    /// A short-form intrinsic function call, e.g. `!GetAtt Bucket.Arn`.
    Tagged(Intrinsic, Box<Node>),
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Builds a single-key mapping, the long form of a function call.
    pub fn function_call(function: Intrinsic, argument: Node) -> Node {
        let mut map = Mapping::with_capacity(1);
        map.insert(function.long_name().to_string(), argument);
        Node::Mapping(map)
    }

    /// Converts a parsed YAML value, keeping short-form tags as `Node::Tagged`.
    pub(crate) fn from_yaml(value: serde_yml::Value) -> Result<Node> {
        Ok(match value {
            serde_yml::Value::Null => Node::Null,
            serde_yml::Value::Bool(b) => Node::Bool(b),
            serde_yml::Value::Number(n) => number_node(n.as_i64(), n.as_u64(), n.as_f64()),
            serde_yml::Value::String(s) => Node::String(s),
            serde_yml::Value::Sequence(items) => Node::Sequence(
                items
                    .into_iter()
                    .map(Node::from_yaml)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_yml::Value::Mapping(mapping) => {
                let mut map = Mapping::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let key = yaml_key(key)?;
                    if map.contains_key(&key) {
                        return Err(Error::format(format!("duplicate key: {}", key)));
                    }
                    map.insert(key, Node::from_yaml(value)?);
                }
                Node::Mapping(map)
            }
            serde_yml::Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                let tag = tag.to_string();
                let name = tag.trim_start_matches('!');
                if tag.starts_with("!!") {
                    // Core schema tags (!!str and friends) carry no function
                    return Node::from_yaml(value);
                }
                match Intrinsic::from_short_name(name) {
                    Some(function) => Node::Tagged(function, Box::new(Node::from_yaml(value)?)),
                    None => return Err(Error::format(format!("unknown tag: !{}", name))),
                }
            }
        })
    }

    /// Converts into a YAML value, writing `Node::Tagged` as a short-form tag.
    pub(crate) fn to_yaml(&self) -> serde_yml::Value {
        match self {
            Node::Null => serde_yml::Value::Null,
            Node::Bool(b) => serde_yml::Value::Bool(*b),
            Node::Int(i) => serde_yml::Value::Number((*i).into()),
            Node::Float(f) => serde_yml::Value::Number((*f).into()),
            Node::String(s) => serde_yml::Value::String(s.clone()),
            Node::Sequence(items) => {
                serde_yml::Value::Sequence(items.iter().map(Node::to_yaml).collect())
            }
            Node::Mapping(map) => {
                let mut mapping = serde_yml::Mapping::new();
                for (key, value) in map {
                    mapping.insert(serde_yml::Value::String(key.clone()), value.to_yaml());
                }
                serde_yml::Value::Mapping(mapping)
            }
            Node::Tagged(function, argument) => {
                serde_yml::Value::Tagged(Box::new(TaggedValue {
                    tag: Tag::new(function.short_name()),
                    value: argument.to_yaml(),
                }))
            }
        }
    }
}

fn number_node(int: Option<i64>, uint: Option<u64>, float: Option<f64>) -> Node {
    match (int, uint, float) {
        (Some(i), _, _) => Node::Int(i),
        (None, Some(u), _) => Node::Float(u as f64),
        (None, None, Some(f)) => Node::Float(f),
        (None, None, None) => Node::Null,
    }
}

fn yaml_key(key: serde_yml::Value) -> Result<String> {
    match key {
        serde_yml::Value::String(s) => Ok(s),
        serde_yml::Value::Bool(b) => Ok(b.to_string()),
        serde_yml::Value::Number(n) => Ok(n.to_string()),
        serde_yml::Value::Null => Ok("null".to_string()),
        other => Err(Error::format(format!(
            "mapping keys must be scalars, found {:?}",
            other
        ))),
    }
}

/// Mapping equality is order-sensitive, unlike `IndexMap`'s own.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::Float(a), Node::Float(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Sequence(a), Node::Sequence(b)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            (Node::Tagged(fa, a), Node::Tagged(fb, b)) => fa == fb && a == b,
            _ => false,
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::String(s) => serializer.serialize_str(s),
            Node::Sequence(items) => items.serialize(serializer),
            Node::Mapping(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
            // Long form: a single-key object
            Node::Tagged(function, argument) => {
                let mut state = serializer.serialize_map(Some(1))?;
                state.serialize_entry(function.long_name(), argument)?;
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a template value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Node, D::Error> {
        Node::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Node, E> {
        Ok(Node::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> std::result::Result<Node, E> {
        Ok(Node::Int(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> std::result::Result<Node, E> {
        Ok(number_node(i64::try_from(u).ok(), Some(u), Some(u as f64)))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Node, E> {
        Ok(Node::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Node, E> {
        Ok(Node::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Node, E> {
        Ok(Node::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Node, A::Error> {
        let mut map = Mapping::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_key::<String>()? {
            if map.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key: {}", key)));
            }
            let value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(Node::Mapping(map))
    }
}
