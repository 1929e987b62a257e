use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use nl_api::{check_project, index_scene, CheckProjectOptions, ProjectContext};
use nl_core::NodeLinkError;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod error_map;
mod report_render;

pub(crate) use cli_args::{CheckArgs, Cli, IndexArgs, Mode, OutputFormat};
pub(crate) use error_map::{emit_error, map_cli_output, map_cli_project_path};
pub(crate) use report_render::{render_index_text, render_project_text, Palette, SceneIndexView};

pub const LOG_ENV: &str = "NODELINK_LOG";

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second call in the same process keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn run(cli: Cli) -> Result<i32, NodeLinkError> {
    match cli.command {
        Mode::Check(args) => run_check(args),
        Mode::Index(args) => run_index(args),
    }
}

fn run_check(args: CheckArgs) -> Result<i32, NodeLinkError> {
    let project_root = resolve_project_root(&args.project_root)?;
    debug!(project_root = %project_root.display(), scenes_dir = %args.scenes_dir, "checking project");

    let report = check_project(&CheckProjectOptions {
        project_root,
        scenes_dir: args.scenes_dir,
        exclude_dirs: args.exclude,
        jobs: args.jobs,
    })?;

    match args.format {
        OutputFormat::Text => {
            for line in render_project_text(&report, Palette::new(!args.no_color)) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(map_cli_output)?
            );
        }
    }
    Ok(report.exit_code())
}

fn run_index(args: IndexArgs) -> Result<i32, NodeLinkError> {
    let project_root = resolve_project_root(&args.project_root)?;
    let context = ProjectContext::new(project_root, Vec::new());
    let analyzed = index_scene(&context, &args.scene)?;
    let view = SceneIndexView::from_analyzed(&analyzed);

    match args.format {
        OutputFormat::Text => {
            for line in render_index_text(&view, Palette::new(false)) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&view).map_err(map_cli_output)?
            );
        }
    }
    Ok(if view.verdict.is_valid() { 0 } else { 1 })
}

fn resolve_project_root(project_root: &str) -> Result<PathBuf, NodeLinkError> {
    let path = PathBuf::from(project_root);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()
        .map_err(map_cli_project_path)?
        .join(path))
}
