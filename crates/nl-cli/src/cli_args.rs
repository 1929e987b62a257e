use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "nodelink")]
#[command(about = "Godot scene/script node path consistency checker")]
pub(crate) struct Cli {
    /// Raise the default log level to debug (NODELINK_LOG still wins).
    #[arg(long, global = true)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Validate every scene under the scenes directory against its script.
    Check(CheckArgs),
    /// Print the structural verdict and canonical paths of one scene.
    Index(IndexArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "project-root", default_value = ".")]
    pub(crate) project_root: String,
    #[arg(long = "scenes-dir", default_value = "scenes")]
    pub(crate) scenes_dir: String,
    #[arg(long = "exclude")]
    pub(crate) exclude: Vec<String>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
    #[arg(long = "jobs")]
    pub(crate) jobs: Option<usize>,
    #[arg(long = "no-color")]
    pub(crate) no_color: bool,
}

#[derive(Debug, Args)]
pub(crate) struct IndexArgs {
    #[arg(long = "project-root", default_value = ".")]
    pub(crate) project_root: String,
    #[arg(long = "scene")]
    pub(crate) scene: String,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[cfg(test)]
mod cli_args_tests {
    use super::*;

    #[test]
    fn check_defaults() {
        let cli = Cli::try_parse_from(["nodelink", "check"]).expect("check should parse");
        let Mode::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.project_root, ".");
        assert_eq!(args.scenes_dir, "scenes");
        assert!(args.exclude.is_empty());
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.jobs, None);
        assert!(!args.no_color);
        assert!(!cli.verbose);
    }

    #[test]
    fn check_accepts_repeated_excludes_and_json() {
        let cli = Cli::try_parse_from([
            "nodelink",
            "--verbose",
            "check",
            "--project-root",
            "game",
            "--exclude",
            ".godot",
            "--exclude",
            "addons",
            "--format",
            "json",
            "--jobs",
            "4",
            "--no-color",
        ])
        .expect("check should parse");
        assert!(cli.verbose);
        let Mode::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.project_root, "game");
        assert_eq!(args.exclude, vec![".godot", "addons"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.jobs, Some(4));
        assert!(args.no_color);
    }

    #[test]
    fn index_requires_scene() {
        assert!(Cli::try_parse_from(["nodelink", "index"]).is_err());
        let cli = Cli::try_parse_from(["nodelink", "index", "--scene", "scenes/a.tscn"])
            .expect("index should parse");
        let Mode::Index(args) = cli.command else {
            panic!("expected index");
        };
        assert_eq!(args.scene, "scenes/a.tscn");
    }
}
