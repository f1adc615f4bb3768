use crate::cfn_json::{parse_cf_json, render_cf_json};
use crate::cfn_yaml::errors::{Error, Result};
use crate::cfn_yaml::types::Node;
use crate::cfn_yaml::{parse_cf_yaml, render_cf_yaml};
use crate::clean::clean;
use crate::validate::validate;

/// Optional passes run between parsing and rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Rewrite `Fn::Join` calls as `Fn::Sub`.
    pub clean: bool,
    /// Check resources against the resource specification.
    pub validate: bool,
}

/// The two conversion directions, in the order `flip` tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    ToShorthand,
    ToLongForm,
}

impl Direction {
    fn convert(self, template: &str, options: Options) -> Result<String> {
        match self {
            Direction::ToShorthand => to_shorthand(template, options),
            Direction::ToLongForm => to_long_form(template, options),
        }
    }
}

/// Convert a template to JSON, undoing YAML short-form syntax.
///
/// JSON input is accepted as well, since it is valid YAML.
pub fn to_long_form(template: &str, options: Options) -> Result<String> {
    let data = parse_cf_yaml(template)?;
    let data = post_process(data, options)?;
    render_cf_json(&data)
}

/// Convert a JSON template to YAML, using short-form syntax for functions
/// wherever possible.
pub fn to_shorthand(template: &str, options: Options) -> Result<String> {
    let data = parse_cf_json(template)?;
    let data = post_process(data, options)?;
    render_cf_yaml(data)
}

/// Work out the input format and convert to the other one.
///
/// JSON is tried first. A parse failure falls through to YAML; a validation
/// failure is returned straight away.
pub fn flip(template: &str, options: Options) -> Result<String> {
    for direction in [Direction::ToShorthand, Direction::ToLongForm] {
        match direction.convert(template, options) {
            Err(err) if err.is_format_error() => {
                tracing::debug!(?direction, error = %err, "input not accepted");
            }
            outcome => {
                tracing::debug!(?direction, ok = outcome.is_ok(), "conversion finished");
                return outcome;
            }
        }
    }
    Err(Error::AmbiguousFormat)
}

fn post_process(data: Node, options: Options) -> Result<Node> {
    let data = if options.clean { clean(data) } else { data };
    if options.validate {
        validate(&data)?;
    }
    Ok(data)
}
