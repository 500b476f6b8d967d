use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use konwert::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE};
use konwert::verify::verify_file_with_options;
use konwert::{ConversionRequest, ConvertOptions, Format, Limits, XmlSourcePolicy};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "konwert",
    version,
    about = "Verify and convert JSON/YAML/XML files"
)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["verify_json", "verify_yml", "verify_xml", "convert"])
))]
struct Args {
    /// Check that PATH is well-formed JSON
    #[arg(long, value_name = "PATH")]
    verify_json: Option<PathBuf>,
    /// Check that PATH is well-formed YAML
    #[arg(long, visible_alias = "verify-yaml", value_name = "PATH")]
    verify_yml: Option<PathBuf>,
    /// Check that PATH is well-formed XML
    #[arg(long, value_name = "PATH")]
    verify_xml: Option<PathBuf>,
    /// Convert INPUT into OUTPUT; formats come from the file extensions
    #[arg(long, num_args = 2, value_names = ["INPUT", "OUTPUT"])]
    convert: Option<Vec<PathBuf>>,
    /// Root element name when writing JSON or YAML data as XML
    #[arg(long, value_name = "NAME", default_value = konwert::bridge::DEFAULT_ROOT_TAG)]
    root_tag: String,
    /// Spaces per indentation level in JSON output
    #[arg(long, value_name = "N", default_value_t = konwert::json::DEFAULT_INDENT)]
    indent: usize,
    /// Start XML output with an <?xml ...?> declaration
    #[arg(long)]
    xml_declaration: bool,
    /// How XML input is turned into JSON or YAML
    #[arg(long, value_enum, default_value_t = XmlSource::Structured)]
    xml_source: XmlSource,
    /// Maximum nesting depth of input documents (0 = the built-in ceiling of 1024;
    /// JSON and YAML parsers stop at 128 regardless)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u16,
    /// Maximum input size in bytes (0 = unlimited)
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum XmlSource {
    /// Elements become mappings, repeated tags become sequences
    Structured,
    /// Refuse to convert XML into JSON or YAML
    Reject,
}

impl From<XmlSource> for XmlSourcePolicy {
    fn from(value: XmlSource) -> Self {
        match value {
            XmlSource::Structured => Self::Structured,
            XmlSource::Reject => Self::Reject,
        }
    }
}

impl Args {
    fn options(&self) -> ConvertOptions {
        let limits = Limits::new(self.max_depth, self.max_size);

        let mut options = ConvertOptions {
            root_tag: self.root_tag.clone(),
            xml_source: self.xml_source.into(),
            ..ConvertOptions::default()
        };
        options.json.limits = limits;
        options.json.indent = self.indent;
        options.yaml.limits = limits;
        options.xml.limits = limits;
        options.xml.declaration = self.xml_declaration;
        options
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(&Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the selected action; `Ok(false)` means the file did not verify
fn run(args: &Args) -> Result<bool> {
    let options = args.options();

    let verify_target = [
        (&args.verify_json, Format::Json),
        (&args.verify_yml, Format::Yaml),
        (&args.verify_xml, Format::Xml),
    ]
    .into_iter()
    .find_map(|(path, format)| path.as_deref().map(|path| (path, format)));
    if let Some((path, format)) = verify_target {
        return Ok(verify(path, format, &options));
    }

    let Some([input, output]) = args.convert.as_deref() else {
        bail!("--convert expects an input and an output path");
    };
    if !konwert::bridge::is_valid_tag_name(&args.root_tag) {
        bail!("'{}' cannot be used as a root tag", args.root_tag);
    }
    let request = ConversionRequest::new(input, output).with_options(options);
    let report = konwert::convert_file(&request).with_context(|| {
        format!(
            "failed to convert '{}' to '{}'",
            input.display(),
            output.display()
        )
    })?;
    println!(
        "Converted {} ({}) to {} ({}, {} bytes)",
        input.display(),
        report.from,
        output.display(),
        report.to,
        report.bytes_written
    );
    Ok(true)
}

fn verify(path: &Path, format: Format, options: &ConvertOptions) -> bool {
    match verify_file_with_options(path, format, options) {
        Ok(()) => {
            println!("{} is valid {format}", path.display());
            true
        }
        Err(err) => {
            eprintln!("error: {err}");
            false
        }
    }
}
