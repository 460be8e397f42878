use anyhow::{
    Context,
    Result,
};
use log::info;
use solver::{
    pipeline::{
        self,
        Approach,
        Frequency,
        PostHocInner,
        RunRequest,
    },
    BoundKind,
    Dataset,
};
use std::{
    fs,
    io::BufReader,
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "divmine", about = "Mines closed, frequent and pairwise diverse itemsets.")]
struct Opt {
    /// Logs the run configuration and the search statistics.
    #[structopt(short, long)]
    verbose: bool,
    /// The dataset, one transaction of 1-based item ids per line.
    #[structopt(short, long, parse(from_os_str))]
    dataset: PathBuf,
    /// The minimum frequency in percent of the transactions.
    #[structopt(short = "f", long)]
    threshold: f64,
    /// The result file, derived from the dataset path if omitted.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// The time limit in seconds.
    #[structopt(short, long, default_value = "60")]
    time_limit: u64,
    /// The number of requested solutions, `0` for no limit.
    #[structopt(short = "n", long, default_value = "0")]
    solutions: usize,
    /// The seed of the random strategies.
    #[structopt(short = "r", long, default_value = "97")]
    seed: u64,
    #[structopt(subcommand)]
    approach: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Closed itemsets whose covers are pairwise diverse.
    ClosedDiv {
        /// The maximum Jaccard similarity between two covers.
        #[structopt(long)]
        jmax: f64,
        /// Re-verify complete itemsets with the exact similarity.
        #[structopt(long)]
        exact: bool,
    },
    /// Random search restarting after every solution.
    Random,
    /// Always branch on the item least similar to the history.
    OrientedDet {
        /// `Exact` or `UB`.
        bound: BoundKind,
    },
    /// Sample branching items inversely to their similarity to the history.
    OrientedRandom {
        /// `Exact` or `UB`.
        bound: BoundKind,
    },
    /// Branch towards transactions rarely covered by the history.
    TransactionOriented,
    /// Oversample with an inner approach, then keep a diverse subset.
    PostHoc {
        /// The oversampling factor, greater than 1.
        #[structopt(long)]
        factor: f64,
        /// `all`, `random`, `orientedDet` or `orientedRandom`.
        #[structopt(long)]
        inner: PostHocInner,
    },
}

impl Command {
    fn into_approach(self) -> Approach {
        match self {
            Self::ClosedDiv { jmax, exact } => {
                Approach::ClosedDiversity {
                    bound: jmax,
                    check_exact: exact,
                }
            }
            Self::Random => Approach::RandomSearch,
            Self::OrientedDet { bound } => Approach::OrientedDeterministic(bound),
            Self::OrientedRandom { bound } => Approach::OrientedRandomized(bound),
            Self::TransactionOriented => Approach::TransactionOriented,
            Self::PostHoc { factor, inner } => Approach::PostHoc { factor, inner },
        }
    }
}

/// Returns the dataset path without its extension followed by the
/// threshold and the approach tag.
fn default_output(dataset: &Path, threshold: f64, approach: &Approach) -> PathBuf {
    let mut name = dataset.with_extension("").into_os_string();
    name.push(format!("-{:?}-{}.out", threshold, approach.tag()));
    PathBuf::from(name)
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let level = if opt.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let file = fs::File::open(&opt.dataset)
        .with_context(|| format!("failed to open dataset {}", opt.dataset.display()))?;
    let dataset = Dataset::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to load dataset {}", opt.dataset.display()))?;
    info!(
        "loaded {} items over {} transactions from {}",
        dataset.len_items(),
        dataset.len_transactions(),
        opt.dataset.display(),
    );
    let approach = opt.approach.into_approach();
    let request = RunRequest::new(Frequency::Percent(opt.threshold), approach)
        .with_solutions(opt.solutions)
        .with_time_limit(Duration::from_secs(opt.time_limit))
        .with_seed(opt.seed);
    let output = pipeline::run(&dataset, &request)
        .with_context(|| format!("failed to run {}", approach.tag()))?;
    let path = opt
        .output
        .unwrap_or_else(|| default_output(&opt.dataset, opt.threshold, &approach));
    fs::write(&path, output.to_string())
        .with_context(|| format!("failed to write result to {}", path.display()))?;
    info!("wrote result to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_replaces_the_extension() {
        let approach = Approach::OrientedDeterministic(BoundKind::UpperBound);
        assert_eq!(
            default_output(Path::new("data/mushroom.dat"), 10.0, &approach),
            PathBuf::from("data/mushroom-10.0-orientedDetUB.out")
        );
        let post_hoc = Approach::PostHoc {
            factor: 2.5,
            inner: PostHocInner::All,
        };
        assert_eq!(
            default_output(Path::new("chess.dat"), 0.5, &post_hoc),
            PathBuf::from("chess-0.5--postHoc(all,2.5).out")
        );
    }

    #[test]
    fn subcommands_map_to_approaches() {
        let opt = Opt::from_iter(&["divmine", "-d", "a.dat", "-f", "10", "oriented-random", "UB"]);
        assert_eq!(opt.time_limit, 60);
        assert_eq!(opt.seed, 97);
        assert_eq!(
            opt.approach.into_approach(),
            Approach::OrientedRandomized(BoundKind::UpperBound)
        );
        let opt = Opt::from_iter(&[
            "divmine", "-d", "a.dat", "-f", "10", "-n", "5", "post-hoc", "--factor", "3",
            "--inner", "orientedDet",
        ]);
        assert_eq!(opt.solutions, 5);
        assert_eq!(
            opt.approach.into_approach(),
            Approach::PostHoc {
                factor: 3.0,
                inner: PostHocInner::OrientedDeterministic,
            }
        );
    }
}
