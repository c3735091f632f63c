use amdplant::commands::{
    InstallOptions, OutputFormat, ProcessInstaller, format_error, install, plant, spawn_renderer,
};
use amdplant::config::Config;
use amdplant::event::Logger;
use amdplant::loader::{MergeOptions, VendorRegistry};
use amdplant::package::ComponentsTree;
use amdplant::runtime::RealRuntime;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// amdplant - keep AMD loader configurations in sync with installed components
///
/// Reads the `rjsConfig` and `directory` settings from `.bowerrc`.
///
/// Examples:
///   amdplant install jquery#2     # Install, then update every configured loader
///   amdplant plant rjs --prune    # Rewrite the RequireJS packages list
#[derive(Parser, Debug)]
#[command(author, version = env!("AMDPLANT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory (defaults to the current directory; also via AMDPLANT_CWD)
    #[arg(long = "cwd", env = "AMDPLANT_CWD", value_name = "PATH", global = true)]
    pub cwd: Option<PathBuf>,

    /// Print progress as JSON lines
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install packages, then update configured loader configurations
    Install(InstallArgs),

    /// Update one loader's package configuration from installed components
    Plant(PlantArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Endpoints in the form [name=]source[#target]
    #[arg(value_name = "ENDPOINT")]
    pub endpoints: Vec<String>,

    /// Force latest version on conflict
    #[arg(long = "force-latest", short = 'F')]
    pub force_latest: bool,

    /// Do not install project devDependencies
    #[arg(long, short = 'p')]
    pub production: bool,

    /// Save installed packages into the project's dependencies
    #[arg(long, short = 'S')]
    pub save: bool,

    /// Save installed packages into the project's devDependencies
    #[arg(long = "save-dev", short = 'D')]
    pub save_dev: bool,
}

#[derive(clap::Args, Debug)]
pub struct PlantArgs {
    /// Loader vendor to configure (supported: rjs)
    #[arg(value_name = "VENDOR")]
    pub vendor: Option<String>,

    /// Remove loader packages that are not installed
    #[arg(long, short = 'p')]
    pub prune: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let config = Config::load(&runtime, cli.cwd)?;
    let registry = VendorRegistry::with_defaults();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Standard
    };

    let logger = Logger::new();
    let renderer = spawn_renderer(logger.subscribe(), format);
    let tree = ComponentsTree::new(&runtime, config.cwd.clone(), config.components_dir());

    let outcome = match cli.command {
        Commands::Install(args) => {
            let options = InstallOptions {
                force_latest: args.force_latest,
                production: args.production,
                save: args.save.then_some(true),
                save_dev: args.save_dev,
            };
            let installer = ProcessInstaller::new(&config.engine, config.cwd.clone(), logger.clone());
            let result = install(
                &runtime,
                &config,
                &registry,
                &installer,
                &tree,
                &args.endpoints,
                options,
                &logger,
            )
            .await
            .map(|_| ());
            drop(installer);
            result
        }
        Commands::Plant(args) => plant(
            &runtime,
            &config,
            &registry,
            &tree,
            args.vendor.as_deref(),
            MergeOptions { prune: args.prune },
            &logger,
        )
        .await
        .map(|_| ()),
    };

    // Closing the stream lets the renderer finish
    drop(logger);
    renderer.await?;

    if let Err(err) = outcome {
        eprintln!("{}", format_error(&err, format));
        std::process::exit(1);
    }
    Ok(())
}
