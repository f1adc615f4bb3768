//! Convert AWS CloudFormation templates between JSON and YAML.
//!
//! YAML output uses the short-form tags (`!Ref`, `!GetAtt`, `!Sub`, ...) for
//! intrinsic functions; JSON output uses the long-form `{"Fn::...": ...}`
//! objects. Key order is kept in both directions.
//!
//! ```no_run
//! use cfn_flip::{flip, Options};
//!
//! let yaml = flip(r#"{"Bucket": {"Ref": "MyBucket"}}"#, Options::default()).unwrap();
//! assert_eq!(yaml, "Bucket: !Ref MyBucket\n");
//! ```

pub mod cfn_json;
pub mod cfn_yaml;
pub mod clean;
pub mod flip;
pub mod spec_table;
pub mod validate;

pub use cfn_yaml::errors::{Error, Result, SpecLoadError, ValidationError};
pub use cfn_yaml::mappings::Intrinsic;
pub use cfn_yaml::types::{Mapping, Node};
pub use flip::{flip, to_long_form, to_shorthand, Options};
pub use validate::validate;
