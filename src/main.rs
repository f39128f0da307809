use anyhow::Result;
use clap::Parser;
use relkit::build::Cargo;
use relkit::commands::{self, Config, DEFAULT_REMOTE, FormulaOptions};
use relkit::formula::DEFAULT_FORMULA_DIR;
use relkit::version::BumpKind;
use std::path::PathBuf;

/// relkit - release toolkit for a single Rust package
///
/// Keeps the manifest version, a persisted build number and a Homebrew
/// formula for tagged releases.
///
/// Examples:
///   relkit bump minor           # 1.4.9 -> 1.5.0
///   relkit build -- --release   # cargo build with BUILD_NUMBER exported
///   relkit formula 1.5.0        # write Formula/<repo>.rb
#[derive(Parser, Debug)]
#[command(author, version = env!("RELKIT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package manifest to read and edit
    #[arg(
        long = "manifest",
        short = 'm',
        env = "RELKIT_MANIFEST",
        value_name = "PATH",
        global = true
    )]
    pub manifest: Option<PathBuf>,

    /// Build counter state file
    #[arg(
        long = "state",
        env = "RELKIT_BUILD_STATE",
        value_name = "PATH",
        global = true
    )]
    pub state: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the manifest's current version
    Version,

    /// Set an exact version in the manifest
    SetVersion(SetVersionArgs),

    /// Bump the manifest version
    Bump(BumpArgs),

    /// Advance and print the persisted build number
    BuildNumber,

    /// Number the build and run `cargo build` with it exported
    Build(BuildArgs),

    /// Generate a Homebrew formula for a tagged release
    Formula(FormulaArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetVersionArgs {
    /// Semantic version, e.g. 1.2.3 or 2.0.0-rc.1
    #[arg(value_name = "SEMVER")]
    pub version: String,
}

#[derive(clap::Args, Debug)]
pub struct BumpArgs {
    #[arg(value_enum, value_name = "KIND")]
    pub kind: BumpKind,
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Extra arguments passed to `cargo build`
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct FormulaArgs {
    /// Released version; the archive of tag v<VERSION> is downloaded
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Git remote to read the repository URL from
    #[arg(long, default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Use this repository URL instead of asking git
    #[arg(long = "remote-url", value_name = "URL")]
    pub remote_url: Option<String>,

    /// Archive host (defaults to https://<remote host>)
    #[arg(long = "archive-host", env = "RELKIT_ARCHIVE_HOST", value_name = "URL")]
    pub archive_host: Option<String>,

    /// Directory the formula is written to
    #[arg(long = "formula-dir", default_value = DEFAULT_FORMULA_DIR, value_name = "DIR")]
    pub formula_dir: PathBuf,

    /// Template to render instead of the built-in one
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(relkit::runtime::RealRuntime, cli.manifest, cli.state);

    match cli.command {
        Commands::Version => {
            println!("{}", commands::show_version(&config)?);
        }
        Commands::SetVersion(args) => {
            let version = commands::set_version(&config, &args.version)?;
            println!("Version set to {}", version);
        }
        Commands::Bump(args) => {
            let change = commands::bump_version(&config, args.kind)?;
            println!("Version bumped {} -> {}", change.previous, change.current);
        }
        Commands::BuildNumber => {
            println!("{}", commands::build_number(&config)?);
        }
        Commands::Build(args) => {
            let number = commands::build(&config, &Cargo::new(), &args.args)?;
            println!("Build {} complete", number);
        }
        Commands::Formula(args) => {
            let options = FormulaOptions {
                version: args.version,
                remote: args.remote,
                remote_url: args.remote_url,
                archive_host: args.archive_host,
                formula_dir: args.formula_dir,
                template: args.template,
            };
            let path = commands::formula(&config, &options).await?;
            println!("Formula written to {}", path.display());
        }
    }
    Ok(())
}
