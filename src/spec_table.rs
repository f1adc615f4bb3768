use crate::cfn_yaml::errors::SpecLoadError;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Environment variable naming a resource specification file to use in
/// place of the bundled one.
pub const SPEC_FILE_ENV: &str = "CFN_FLIP_SPEC_FILE";

const BUNDLED_SPEC_NAME: &str = "bundled CloudFormationResourceSpecification.json";
const BUNDLED_SPEC: &str = include_str!("../data/CloudFormationResourceSpecification.json");

lazy_static! {
    static ref SPEC_TABLE: Result<SpecTable, SpecLoadError> = SpecTable::load_configured();
}

/// The process-wide specification, loaded on first use and never modified.
pub fn spec_table() -> Result<&'static SpecTable, SpecLoadError> {
    SPEC_TABLE.as_ref().map_err(Clone::clone)
}

#[derive(Deserialize)]
struct SpecDocument {
    #[serde(rename = "ResourceTypes")]
    resource_types: IndexMap<String, ResourceTypeDocument>,
}

#[derive(Deserialize)]
struct ResourceTypeDocument {
    #[serde(rename = "Properties", default)]
    properties: IndexMap<String, PropertyDocument>,
}

#[derive(Deserialize)]
struct PropertyDocument {
    #[serde(rename = "Required", default)]
    required: bool,
}

/// Property names declared for one resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSpec {
    required: BTreeSet<String>,
    allowed: BTreeSet<String>,
}

impl ResourceSpec {
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }

    pub fn is_allowed(&self, property: &str) -> bool {
        self.allowed.contains(property)
    }
}

/// Lookup table from resource type name to its declared properties.
#[derive(Debug, Clone, Default)]
pub struct SpecTable {
    resource_types: HashMap<String, ResourceSpec>,
}

impl SpecTable {
    pub fn from_json(source_name: &str, text: &str) -> Result<Self, SpecLoadError> {
        let document: SpecDocument =
            serde_json::from_str(text).map_err(|e| SpecLoadError {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;

        let resource_types = document
            .resource_types
            .into_iter()
            .map(|(name, resource)| {
                let mut spec = ResourceSpec::default();
                for (property, details) in resource.properties {
                    if details.required {
                        spec.required.insert(property.clone());
                    }
                    spec.allowed.insert(property);
                }
                (name, spec)
            })
            .collect::<HashMap<_, _>>();

        tracing::debug!(
            source = source_name,
            resource_types = resource_types.len(),
            "loaded resource specification"
        );
        Ok(SpecTable { resource_types })
    }

    pub fn load_from_path(path: &Path) -> Result<Self, SpecLoadError> {
        let source_name = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| SpecLoadError {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;
        Self::from_json(&source_name, &text)
    }

    pub fn bundled() -> Result<Self, SpecLoadError> {
        Self::from_json(BUNDLED_SPEC_NAME, BUNDLED_SPEC)
    }

    fn load_configured() -> Result<Self, SpecLoadError> {
        match std::env::var_os(SPEC_FILE_ENV) {
            Some(path) => Self::load_from_path(Path::new(&path)),
            None => Self::bundled(),
        }
    }

    pub fn resource_type(&self, name: &str) -> Option<&ResourceSpec> {
        self.resource_types.get(name)
    }

    pub fn len(&self) -> usize {
        self.resource_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resource_types.is_empty()
    }
}
