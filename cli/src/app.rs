//! Command assembly: fold flags over the loaded config, compose the pipeline
//! for the chosen subcommand and run it.

use semflow_core::config::{ColorChoice, Options, SemflowConfig};
use semflow_core::log::{parse_verbosity, DiagnosticStream};
use semflow_core::{Destination, FileSpec, Language, Pair, PairSource, Runner, Source, Task};
use semflow_plugins::factory::{build_collaborators, build_differ};
use semflow_plugins::render::OutputFormat;

use crate::commands::cli::{AnnotateArg, Args, ColorArg, Commands, DiffArgs, FormatArg, ParseArgs};
use crate::error::CliError;
use crate::pipeline::{diff_task, parse_task, Annotation, DiffPlan, ParsePlan};

/// Flags override config and environment.
pub fn apply_flags(options: &mut Options, args: &Args) -> Result<(), CliError> {
    if let Some(color) = args.color {
        options.color = match color {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        };
    }
    if let Some(level) = &args.log_level {
        options.verbosity = parse_verbosity(level).map_err(CliError::Config)?;
    }
    if args.print_source {
        options.echo_source_on_error = true;
    }
    Ok(())
}

pub fn destination(args: &Args) -> Destination {
    match &args.output {
        Some(path) => Destination::File(path.clone()),
        None => Destination::Stdout,
    }
}

pub fn diagnostics(args: &Args) -> DiagnosticStream {
    match &args.log_file {
        Some(path) => DiagnosticStream::File(path.clone()),
        None => DiagnosticStream::Stderr,
    }
}

fn output_format(format: FormatArg) -> OutputFormat {
    match format {
        FormatArg::Json => OutputFormat::Json,
        FormatArg::Sexp => OutputFormat::Sexpr,
    }
}

pub fn parse_plan(parse: &ParseArgs, destination: Destination) -> Result<ParsePlan, CliError> {
    let language = parse
        .language
        .as_deref()
        .map(|name| name.parse::<Language>().map_err(CliError::Command))
        .transpose()?;

    let source = if parse.stdin {
        Source::Stdin
    } else {
        Source::Files(
            parse
                .files
                .iter()
                .map(|path| FileSpec::new(path).with_language(language))
                .collect(),
        )
    };

    Ok(ParsePlan {
        source,
        format: output_format(parse.format),
        annotation: parse.annotate.map(|AnnotateArg::Size| Annotation::SubtreeSize),
        destination,
    })
}

pub fn diff_plan(diff: &DiffArgs, destination: Destination) -> Result<DiffPlan, CliError> {
    let source = if diff.stdin {
        PairSource::Stdin
    } else {
        match (&diff.before, &diff.after) {
            (Some(before), Some(after)) => {
                PairSource::Files(vec![Pair::Both(FileSpec::new(before), FileSpec::new(after))])
            }
            _ => {
                return Err(CliError::Command(
                    "diff needs --stdin or both BEFORE and AFTER paths".to_string(),
                ))
            }
        }
    };

    Ok(DiffPlan {
        source,
        format: output_format(diff.format),
        differ: build_differ(),
        destination,
    })
}

#[tracing::instrument(name = "cli.run_command", skip_all)]
pub async fn run_command(args: Args, cfg: SemflowConfig) -> Result<i32, CliError> {
    let mut options = cfg.options;
    apply_flags(&mut options, &args)?;

    let task: Task<()> = match &args.command {
        Commands::Parse(parse) => parse_task(parse_plan(parse, destination(&args))?),
        Commands::Diff(diff) => diff_task(diff_plan(diff, destination(&args))?),
    };
    tracing::debug!(operation = ?task.operation(), verbosity = ?options.verbosity, "pipeline composed");

    Runner::new(options, build_collaborators())
        .with_diagnostics(diagnostics(&args))
        .run(task)
        .await?;
    Ok(0)
}
