//! Command-line interface.

use std::path::PathBuf;

use varcascade_core::logging::targets;
use varcascade_core::prelude::*;
use varcascade_report::prelude::*;

use crate::process::process_stylesheet;
use crate::{Error, Result};

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Resolve CSS custom properties and report their usage.

Usage: varcascade [OPTIONS] <STYLESHEET>...

Options:
  -c, --config <FILE>   Read settings from a TOML file
  -o, --out <FILE>      Write the JSON report to FILE [default: css-variables.json]
  -s, --sources <DIR>   Overlay usages scanned from source files under DIR
      --ignore-pseudo   Let pseudo-class scopes match plain selectors
  -h, --help            Print this help";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Process stylesheets and write a report.
    Run(RunArgs),
    /// Print usage.
    Help,
}

/// Arguments of a run. Flags override the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Stylesheets to process.
    pub inputs: Vec<PathBuf>,
    /// Configuration file.
    pub config: Option<PathBuf>,
    /// Report destination.
    pub out: Option<PathBuf>,
    /// Source directory to scan.
    pub sources: Option<PathBuf>,
    /// Widen pseudo-class scope matching.
    pub ignore_pseudo: bool,
}

/// The outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of stylesheets processed.
    pub stylesheets: usize,
    /// Number of variables in the report.
    pub variables: usize,
    /// Number of resolution warnings.
    pub warnings: usize,
    /// Where the report was written.
    pub output: PathBuf,
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut run = RunArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-c" | "--config" => run.config = Some(value_for(&arg, args.next())?),
            "-o" | "--out" => run.out = Some(value_for(&arg, args.next())?),
            "-s" | "--sources" => run.sources = Some(value_for(&arg, args.next())?),
            "--ignore-pseudo" => run.ignore_pseudo = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(Error::usage(format!("unknown option: {flag}")));
            }
            _ => run.inputs.push(PathBuf::from(&arg)),
        }
    }

    if run.inputs.is_empty() {
        return Err(Error::usage("no stylesheets given"));
    }
    Ok(Command::Run(run))
}

fn value_for(flag: &str, value: Option<String>) -> Result<PathBuf> {
    value
        .map(PathBuf::from)
        .ok_or_else(|| Error::usage(format!("{flag} requires a value")))
}

/// Process every stylesheet, merge their usages and write the report.
pub fn run(args: &RunArgs) -> Result<RunSummary> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(out) = &args.out {
        config.output = out.clone();
    }
    if let Some(sources) = &args.sources {
        config.source_dir = Some(sources.clone());
    }
    if args.ignore_pseudo {
        config.ignore_pseudo_scope = true;
    }
    let options = config.resolve_options();

    let mut compilations = Vec::with_capacity(args.inputs.len());
    let mut warnings = 0;
    for input in &args.inputs {
        let mut sheet = Stylesheet::from_file(input)?;
        let mut collector = UsageCollector::new();
        let summary = process_stylesheet(&mut sheet, &options, &mut collector)?;

        for warning in &summary.warnings {
            tracing::warn!(
                target: targets::CLI,
                file = %input.display(),
                property = sheet.declaration(warning.node).property(),
                "{}",
                warning.message
            );
        }
        warnings += summary.warnings.len();
        compilations.push(collector.into_records());
    }

    let mut report = merge_compilations(compilations);
    if let Some(dir) = &config.source_dir {
        report.overlay_source_usages(&scan_source_dir(dir, &config.source_extension)?);
    }
    report.write_json(&config.output)?;

    Ok(RunSummary {
        stylesheets: args.inputs.len(),
        variables: report.len(),
        warnings,
        output: config.output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Command> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags_and_inputs() {
        let command = args(&["-o", "out.json", "a.css", "--ignore-pseudo", "b.css", "--sources", "src"]).unwrap();

        assert_eq!(
            command,
            Command::Run(RunArgs {
                inputs: vec!["a.css".into(), "b.css".into()],
                config: None,
                out: Some("out.json".into()),
                sources: Some("src".into()),
                ignore_pseudo: true,
            })
        );
    }

    #[test]
    fn help_wins() {
        assert_eq!(args(&["a.css", "--help"]).unwrap(), Command::Help);
    }

    #[test]
    fn usage_errors() {
        assert!(matches!(args(&[]), Err(Error::Usage(_))));
        assert!(matches!(args(&["a.css", "--out"]), Err(Error::Usage(_))));
        assert!(matches!(args(&["--minify", "a.css"]), Err(Error::Usage(_))));
    }
}
