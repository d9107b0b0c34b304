use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use apitest::discovery::discover;
use apitest::http::ReqwestClient;
use apitest::output::ConsoleSink;
use apitest::runner::Runner;

#[derive(Parser)]
#[command(name = "apitest")]
#[command(version)]
#[command(about = "Declarative API-testing harness for rhai test scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every test case under a root directory
    Run {
        /// Test root containing globalScript.rhai and the test cases
        root: PathBuf,

        /// Optional subdirectory of the root to restrict the run to
        subset: Option<PathBuf>,

        /// List matched test scripts without running them
        #[arg(long)]
        list: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> Result<()> {
    println!("apitest v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            root,
            subset,
            list,
            no_color,
        } => {
            validate_paths(&root, subset.as_deref())?;

            if list {
                return list_discovered_tests(&root, subset.as_deref());
            }

            let runner = Runner::new(
                Rc::new(ReqwestClient::new()),
                Rc::new(ConsoleSink::new(!no_color)),
            );
            let report = runner.run(&root, subset.as_deref())?;

            if report.has_failures() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// The runner assumes its paths exist; check them here so bad arguments fail
/// before any test case executes.
fn validate_paths(root: &Path, subset: Option<&Path>) -> Result<()> {
    if !root.is_dir() {
        bail!("Test root directory {:?} does not exist", root);
    }

    if let Some(subset) = subset {
        if subset.is_absolute()
            || subset
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            bail!("Subset path {:?} must be a relative path inside {:?}", subset, root);
        }
        if !root.join(subset).is_dir() {
            bail!("Subset directory {:?} does not exist inside {:?}", subset, root);
        }
    }

    Ok(())
}

/// List discovered test scripts without running them.
fn list_discovered_tests(root: &Path, subset: Option<&Path>) -> Result<()> {
    let cases = discover(root, subset)?;

    println!();
    println!("Discovered {} test case(s):", cases.len());
    println!();

    for case in &cases {
        println!("  {}", case.script_path(root).display());
    }

    println!();
    Ok(())
}
