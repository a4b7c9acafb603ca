use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use kzstereo_core::io::image_io::StereoPair;
use kzstereo_core::params::{DataCost, NormalizedParameters};
use kzstereo_core::pipeline::config::{MatchConfig, WeightSetting};
use kzstereo_core::pipeline::{parse_disparity, prepare, run_matching, MatchOutputs};
use kzstereo_core::solver::{LocalMatcher, StereoSolver};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::config;

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Max number of iterations
    #[arg(short = 'i', long = "max_iter", value_name = "ITER")]
    pub max_iter: Option<u32>,

    /// Scaled disparity map
    #[arg(short = 'o', long = "output", value_name = "DISP")]
    pub output: Option<PathBuf>,

    /// Random label order at each iteration
    #[arg(short = 'r', long = "random")]
    pub random: bool,

    /// Data cost: L1 or L2
    #[arg(short = 'c', long = "data_cost", value_name = "DIST")]
    pub data_cost: Option<String>,

    /// Value of lambda (smoothness), as N, N/D or AUTO
    #[arg(short = 'l', long = "lambda", value_name = "LAMBDA")]
    pub lambda: Option<String>,

    /// Smoothness cost not across edge
    #[arg(long = "lambda1", value_name = "L1")]
    pub lambda1: Option<String>,

    /// Smoothness cost across edge
    #[arg(long = "lambda2", value_name = "L2")]
    pub lambda2: Option<String>,

    /// Intensity difference for 'edge'
    #[arg(short = 't', long = "threshold", value_name = "THRES")]
    pub threshold: Option<i32>,

    /// Cost for occlusion
    #[arg(short = 'k', value_name = "K")]
    pub k: Option<String>,

    /// Seed of the label order (default: from the clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Defaults from a TOML file; flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// im1 im2 dMin dMax [dispMap]
    #[arg(value_name = "ARGS", num_args = 0..)]
    pub positional: Vec<String>,
}

/// What a run ended with.
#[derive(Debug)]
pub enum Outcome {
    /// Wrong number of positional arguments.
    Usage,
    /// No output requested: the normalized weights to print.
    Report(NormalizedParameters),
    /// Effective configuration, rendered as TOML.
    Config(String),
    /// Optimization ran and its outputs were saved.
    Matched,
}

/// Flags override the values from the config file.
fn merge(args: &MatchArgs, file: MatchConfig) -> Result<MatchConfig> {
    let data_cost = match args.data_cost.as_deref() {
        Some(s) => Some(s.parse::<DataCost>()?),
        None => file.data_cost,
    };
    let weight = |flag: &Option<String>, fallback: Option<WeightSetting>| {
        flag.clone().map(WeightSetting::Token).or(fallback)
    };
    Ok(MatchConfig {
        data_cost,
        edge_threshold: args.threshold.or(file.edge_threshold),
        max_iterations: args.max_iter.or(file.max_iterations),
        randomize: if args.random { Some(true) } else { file.randomize },
        lambda: weight(&args.lambda, file.lambda),
        lambda1: weight(&args.lambda1, file.lambda1),
        lambda2: weight(&args.lambda2, file.lambda2),
        k: weight(&args.k, file.k),
        seed: args.seed.or(file.seed),
    })
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn run(args: &MatchArgs, verbose: bool) -> Result<Outcome> {
    if args.print_config {
        let merged = merge(args, config::load(args.config.as_deref())?)?;
        return Ok(Outcome::Config(config::render(&merged)?));
    }

    let [im1, im2, d_min, d_max, rest @ ..] = args.positional.as_slice() else {
        return Ok(Outcome::Usage);
    };
    if rest.len() > 1 {
        return Ok(Outcome::Usage);
    }

    let merged = merge(args, config::load(args.config.as_deref())?)?;
    let state = prepare(merged.cost_parameters(), &merged.fraction_inputs())?;

    let pair = StereoPair::load(Path::new(im1), Path::new(im2))?;
    info!(
        width = pair.left.width(),
        height = pair.left.height(),
        color = pair.is_color(),
        "Loaded stereo pair"
    );
    let mut matcher = LocalMatcher::new(pair);

    let (d_min, d_max) = (parse_disparity(d_min)?, parse_disparity(d_max)?);
    matcher.set_disparity_range(d_min, d_max);

    let seed = merged.seed.unwrap_or_else(clock_seed);
    info!(seed, "Seeding label order");
    let mut rng = StdRng::seed_from_u64(seed);

    let normalized = state.finalize(&mut matcher)?;
    if verbose {
        crate::summary::print_parameter_summary(&normalized, (d_min, d_max), seed, matcher.name());
    }

    let outputs = MatchOutputs {
        disparity: rest.first().map(PathBuf::from),
        scaled: args.output.clone(),
    };
    if outputs.is_empty() {
        return Ok(Outcome::Report(normalized));
    }

    let pb = ProgressBar::new(u64::from(normalized.params.max_iterations));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    run_matching(&mut matcher, &outputs, &mut rng, &mut |report| {
        pb.set_position(u64::from(report.iteration));
        if report.changed {
            pb.set_message(format!("energy {}", report.energy));
        } else {
            pb.set_message(format!("converged at {}", report.energy));
        }
    })?;
    pb.finish_with_message("Done");

    if let Some(ref path) = outputs.disparity {
        eprintln!("Disparity map saved to {}", path.display());
    }
    if let Some(ref path) = outputs.scaled {
        eprintln!("Scaled disparity map saved to {}", path.display());
    }
    Ok(Outcome::Matched)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use image::{GrayImage, Luma};
    use kzstereo_core::error::KzError;
    use kzstereo_core::params::Lambda;

    use super::*;

    #[derive(Parser)]
    #[command(allow_negative_numbers = true)]
    struct TestCli {
        #[command(flatten)]
        args: MatchArgs,
    }

    fn parse(argv: &[&str]) -> MatchArgs {
        let mut full = vec!["kzstereo"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    fn kz_error(err: &anyhow::Error) -> &KzError {
        err.downcast_ref::<KzError>().expect("core error")
    }

    /// Gray pair where the right view is the left one shifted by one column.
    fn write_pair(dir: &Path) -> (String, String) {
        let texture = |x: u32, y: u32| ((x * 17 + y * 3) % 256) as u8;
        let left = GrayImage::from_fn(12, 4, |x, y| Luma([texture(x, y)]));
        let right = GrayImage::from_fn(12, 4, |x, y| Luma([texture(x + 1, y)]));
        let l = dir.join("left.png");
        let r = dir.join("right.png");
        left.save(&l).unwrap();
        right.save(&r).unwrap();
        (l.display().to_string(), r.display().to_string())
    }

    #[test]
    fn test_wrong_positional_count_prints_usage() {
        for argv in [
            vec!["a.png", "b.png", "c.png"],
            vec!["-l", "abc", "a.png", "b.png", "0"],
            vec!["a", "b", "0", "1", "out.tif", "extra"],
        ] {
            let outcome = run(&parse(&argv), false).unwrap();
            assert!(matches!(outcome, Outcome::Usage), "{argv:?}");
        }
    }

    #[test]
    fn test_bad_fraction_aborts_before_loading_images() {
        let args = parse(&["-l", "abc", "missing1.png", "missing2.png", "0", "4"]);
        let err = run(&args, false).unwrap_err();
        assert!(matches!(kz_error(&err), KzError::InvalidFraction { .. }));
    }

    #[test]
    fn test_bad_data_cost() {
        let args = parse(&["-c", "L3", "missing1.png", "missing2.png", "0", "4"]);
        let err = run(&args, false).unwrap_err();
        assert!(matches!(kz_error(&err), KzError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_image() {
        let args = parse(&["-k", "30", "missing1.png", "missing2.png", "0", "4"]);
        let err = run(&args, false).unwrap_err();
        assert!(matches!(
            kz_error(&err),
            KzError::ResourceUnavailable { .. }
        ));
        assert!(err.to_string().contains("missing1.png"));
    }

    #[test]
    fn test_bad_disparity() {
        let dir = tempfile::tempdir().unwrap();
        let (l, r) = write_pair(dir.path());
        let args = parse(&["-k", "30", &l, &r, "-2", "0x"]);
        let err = run(&args, false).unwrap_err();
        assert_eq!(err.to_string(), "Error reading dMin or dMax");
    }

    #[test]
    fn test_report_without_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let (l, r) = write_pair(dir.path());
        let args = parse(&["-k", "30", &l, &r, "-2", "0"]);
        let Outcome::Report(n) = run(&args, false).unwrap() else {
            panic!("expected a report");
        };
        assert_eq!(n.occlusion_line(), "K=30");
        assert_eq!(n.lambda_line(), "lambda=6");

        let args = parse(&["--lambda", "5/2", &l, &r, "-2", "0"]);
        let Outcome::Report(n) = run(&args, false).unwrap() else {
            panic!("expected a report");
        };
        assert_eq!(n.lambda, Lambda { value: 5, denominator: 2 });
        assert_eq!(n.occlusion_line(), "K=25/2");
    }

    #[test]
    fn test_matching_saves_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let (l, r) = write_pair(dir.path());
        let raw = dir.path().join("disp.tif");
        let scaled = dir.path().join("disp.png");
        let raw_str = raw.display().to_string();
        let scaled_str = scaled.display().to_string();
        let args = parse(&[
            "--seed", "3", "-o", &scaled_str, &l, &r, "-2", "0", &raw_str,
        ]);
        assert!(matches!(run(&args, false).unwrap(), Outcome::Matched));
        assert!(raw.exists());
        assert!(scaled.exists());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.toml");
        std::fs::write(&path, "k = 30\nlambda = \"2\"\ndata_cost = \"L1\"\n").unwrap();
        let cfg = path.display().to_string();

        let args = parse(&["--config", &cfg, "-l", "3", "--print-config"]);
        let Outcome::Config(text) = run(&args, false).unwrap() else {
            panic!("expected config");
        };
        let merged: MatchConfig = toml::from_str(&text).unwrap();
        assert_eq!(merged.lambda, Some(WeightSetting::Token("3".into())));
        assert_eq!(merged.k, Some(WeightSetting::Integer(30)));
        assert_eq!(merged.data_cost, Some(DataCost::L1));
    }
}
