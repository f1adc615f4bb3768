use atty::Stream;
use cfn_flip::{flip, spec_table::spec_table, to_long_form, to_shorthand, Options};
use clap::Parser;
use console::style;
use std::error::Error;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Converts AWS CloudFormation templates between JSON and YAML",
    long_about = "Converts AWS CloudFormation templates between JSON and YAML.\n\n\
                  Without --json or --yaml the input format is detected and the \
                  template is converted to the other one."
)]
struct Args {
    /// Template to read; stdin when omitted or `-`
    input: Option<PathBuf>,

    /// File to write; stdout when omitted or `-`
    output: Option<PathBuf>,

    /// Always write JSON
    #[arg(short, long, conflicts_with = "yaml")]
    json: bool,

    /// Always write YAML
    #[arg(short, long)]
    yaml: bool,

    /// Rewrite Fn::Join calls as the equivalent Fn::Sub
    #[arg(short, long)]
    clean: bool,

    /// Check resources against the CloudFormation resource specification
    #[arg(short = 'v', long)]
    validate: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("{} {}", style("✘").red(), err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.validate {
        // A broken specification is fatal before any input is read
        spec_table()?;
    }

    let template = read_input(args.input.as_deref())?;
    let options = Options {
        clean: args.clean,
        validate: args.validate,
    };

    let output = if args.json {
        to_long_form(&template, options)?
    } else if args.yaml {
        to_shorthand(&template, options)?
    } else {
        flip(&template, options)?
    };

    write_output(args.output.as_deref(), &output)
}

fn is_stdio(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p == Path::new("-"))
}

fn read_input(path: Option<&Path>) -> Result<String, Box<dyn Error>> {
    match path {
        Some(path) if !is_stdio(Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read {}: {}", path.display(), e).into()),
        _ => {
            if atty::is(Stream::Stdin) {
                return Err("No input given. Pass a file name or pipe a template to stdin".into());
            }
            let mut template = String::new();
            std::io::stdin().read_to_string(&mut template)?;
            Ok(template)
        }
    }
}

fn write_output(path: Option<&Path>, output: &str) -> Result<(), Box<dyn Error>> {
    let mut output = output.to_string();
    if !output.ends_with('\n') {
        output.push('\n');
    }

    match path {
        Some(path) if !is_stdio(Some(path)) => std::fs::write(path, output)
            .map_err(|e| format!("Unable to write {}: {}", path.display(), e).into()),
        _ => {
            let mut stdout = std::io::stdout();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["cfn-flip", "-c", "-v", "-j", "in.yaml", "out.json"]);
        assert!(args.clean && args.validate && args.json && !args.yaml);
        assert_eq!(args.input, Some(PathBuf::from("in.yaml")));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_json_and_yaml_conflict() {
        assert!(Args::try_parse_from(["cfn-flip", "-j", "-y"]).is_err());
    }

    #[test]
    fn test_stdio_paths() {
        assert!(is_stdio(None));
        assert!(is_stdio(Some(Path::new("-"))));
        assert!(!is_stdio(Some(Path::new("template.json"))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("template.json");
        let output = dir.path().join("template.yaml");
        std::fs::write(&input, r#"{"Value": {"Ref": "Bucket"}}"#).unwrap();

        run(Args::parse_from([
            "cfn-flip",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "Value: !Ref Bucket\n"
        );
    }
}
