use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use lfs_fetch::{catalog, fetch, FetchArgs, FetchConfig, LfsClient};

#[derive(Parser, Debug)]
#[command(
    name = "lfs-fetch",
    version,
    about = "Download one Git LFS object named by a pointer file",
    after_help = "Progress is logged to stderr; set RUST_LOG=warn to silence it."
)]
struct Cli {
    #[command(flatten)]
    fetch: FetchArgs,

    /// Print the model catalog and exit
    #[arg(long)]
    list_models: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    if cli.list_models {
        print_catalog();
        return ExitCode::SUCCESS;
    }

    match run(cli.fetch) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: FetchArgs) -> lfs_fetch::Result<()> {
    let config = FetchConfig::try_from(args)?;
    log::debug!("{:?}", config);
    let client = LfsClient::from_config(&config)?;
    fetch(&config, &client)?;
    Ok(())
}

fn print_catalog() {
    for category in catalog::MODELS {
        println!("{}", category.name);
        for model in category.models {
            println!("  {}", model);
        }
    }
}
