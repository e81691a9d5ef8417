// wrfsuewsrs/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use wrfsuewsrs::cli::{generate_driver, patch_configure};
use wrfsuewsrs::workdir::default_working_dir;
use wrfsuewsrs_drvgen::DRIVER_FILE_NAME;

#[derive(Parser)]
#[command(name = "wrfsuewsrs")]
#[command(about = "Coupling automation for the WRF-SUEWS modelling system", long_about = None)]
#[command(version = env!("WRFSUEWSRS_CLI_VERSION"))]
struct Cli {
    /// Compilation working directory (defaults to compilation-<today>)
    #[arg(short, long, value_name = "DIR", global = true)]
    workdir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the SUEWS sources into the single driver file WRF compiles
    Generate {
        /// Path to the SUEWS source tree (holding Makefile and src/)
        #[arg(short, long, value_name = "DIR", env = "SUEWS_DIR")]
        suews_dir: PathBuf,
        /// File name of the merged driver inside the working directory
        #[arg(short, long, value_name = "NAME", default_value = DRIVER_FILE_NAME)]
        output: String,
    },
    /// Inject the SUEWS link flags into configure.wrf (run after WRF's ./configure)
    PatchConfigure {
        /// Directory holding libsuews.a, spelled into the -L flag
        #[arg(short, long, value_name = "DIR")]
        lib_dir: Option<PathBuf>,
    },
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let workdir = cli.workdir.unwrap_or_else(default_working_dir);

    match cli.command {
        Commands::Generate { suews_dir, output } => generate_driver(&suews_dir, &workdir, &output),
        Commands::PatchConfigure { lib_dir } => patch_configure(&workdir, lib_dir.as_deref()),
    }
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
