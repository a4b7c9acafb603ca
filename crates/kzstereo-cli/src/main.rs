mod commands;
mod summary;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use commands::matching::{MatchArgs, Outcome};

#[derive(Parser, Debug)]
#[command(
    name = "kzstereo",
    about = "Stereo matching with integer-weighted energy minimization",
    override_usage = "kzstereo [OPTIONS] im1.png im2.png dMin dMax [dispMap.tif]",
    allow_negative_numbers = true,
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub args: MatchArgs,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match commands::matching::run(&cli.args, cli.verbose) {
        Ok(Outcome::Usage) => {
            eprintln!("{}", Cli::command().render_help());
            ExitCode::FAILURE
        }
        Ok(Outcome::Report(normalized)) => {
            println!("{}", normalized.occlusion_line());
            println!("{}", normalized.lambda_line());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Config(toml_str)) => {
            print!("{toml_str}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Matched) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
