use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "paperkit - post-processing, parameter sweeps and cluster submission for square-well and soft-sphere simulation studies.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Configuration file in TOML format.
    /// Defaults to ./paperkit.toml, then the user configuration directory.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S cluster.cores=6
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Print external commands instead of running them. Nothing is submitted.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Skip figure rendering.
    #[arg(long, global = true)]
    pub no_figures: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Internal energy, heat capacity and entropy of histogram runs against a reference.
    Thermo(ThermoArgs),
    /// Convergence of ln DOS movie frames against a reference density of states.
    Compare(CompareArgs),
    /// Triplet-correlation field and pair distribution along the contact path.
    Triplet(TripletArgs),
    /// Run the soft-sphere melting program over a temperature and density grid.
    Melting(MeltingArgs),
    /// Run the free-energy and Monte-Carlo scripts of one renormalization level.
    Renormalization(RenormalizationArgs),
    /// Build the square-well simulator and write (and optionally submit) a batch script.
    Submit(SubmitArgs),
}

/// Arguments for the `thermo` subcommand.
#[derive(Args, Debug)]
pub struct ThermoArgs {
    /// Well width.
    pub ww: f64,
    /// Filling fraction.
    pub ff: f64,
    /// Number of particles.
    #[arg(value_name = "N")]
    pub n: u32,

    /// Methods to compare, comma separated (e.g. nw,tmmc,kT0.5).
    #[arg(short, long, value_delimiter = ',', required = true, value_name = "METHODS")]
    pub methods: Vec<String>,

    /// Override the reference method.
    #[arg(long, value_name = "METHOD")]
    pub reference: Option<String>,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Energy (row index) at which round trips and the error are tracked.
    pub energy: usize,
    /// Reference ln DOS file, relative to the data directory.
    pub reference: String,
    /// Common prefix of the movie directories.
    pub filebase: String,
}

/// Arguments for the `triplet` subcommand.
#[derive(Args, Debug)]
pub struct TripletArgs {
    /// Filling fraction.
    pub ff: f64,
}

/// Arguments for the `melting` subcommand.
#[derive(Args, Debug)]
pub struct MeltingArgs {
    // --- Densities ---
    /// Reduced densities to run.
    #[arg(
        long = "n",
        num_args = 1..,
        value_name = "DENSITY",
        conflicts_with = "nstart",
        required_unless_present = "nstart"
    )]
    pub densities: Vec<f64>,

    /// First density of a stepped range.
    #[arg(long, value_name = "FLOAT", requires = "nend")]
    pub nstart: Option<f64>,

    /// Last density of a stepped range (inclusive).
    #[arg(long, value_name = "FLOAT", requires = "nstart")]
    pub nend: Option<f64>,

    #[arg(long, value_name = "FLOAT", default_value_t = 0.1)]
    pub nstep: f64,

    // --- Temperatures ---
    /// Temperatures to run. Defaults to 2.
    #[arg(long = "t", num_args = 1.., value_name = "TEMPERATURE", conflicts_with = "tstart")]
    pub temperatures: Vec<f64>,

    /// First temperature of a stepped range.
    #[arg(long, value_name = "FLOAT", requires = "tend")]
    pub tstart: Option<f64>,

    /// Last temperature of a stepped range (inclusive).
    #[arg(long, value_name = "FLOAT", requires = "tstart")]
    pub tend: Option<f64>,

    #[arg(long, value_name = "FLOAT", default_value_t = 1.0)]
    pub tstep: f64,

    // --- Passed through to the melting program ---
    #[arg(long, value_name = "FLOAT")]
    pub fvstart: Option<f64>,
    #[arg(long, value_name = "FLOAT")]
    pub fvend: Option<f64>,
    #[arg(long, value_name = "FLOAT")]
    pub fvstep: Option<f64>,
    #[arg(long, value_name = "FLOAT")]
    pub gwstart: Option<f64>,
    /// Gaussian width ends at the lattice constant divided by this.
    #[arg(long, value_name = "FLOAT")]
    pub gwlend: Option<f64>,
    /// Gaussian width steps by the lattice constant divided by this.
    #[arg(long, value_name = "FLOAT")]
    pub gwlstep: Option<f64>,

    /// Output directory of the melting program.
    #[arg(long = "d", value_name = "DIR")]
    pub dir: Option<String>,
}

/// Arguments for the `renormalization` subcommand.
#[derive(Args, Debug)]
pub struct RenormalizationArgs {
    /// Recursion level.
    pub level: u32,
    /// Well width.
    pub ww: f64,
    /// Cell length at level 0.
    #[arg(value_name = "L")]
    pub length: f64,
    /// Particle counts, e.g. "[2, 3, 4]", "2..10" or "range(2, 10)".
    #[arg(value_name = "NS")]
    pub counts: String,
    /// Overwrite existing free-energy results.
    #[arg(short = 'O', long)]
    pub overwrite: bool,
}

/// Arguments for the `submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Well width.
    pub ww: f64,
    /// Filling fraction.
    pub ff: f64,
    /// Number of particles.
    #[arg(value_name = "N")]
    pub n: u32,
    /// Sampling method (e.g. tmmc, nw, kT0.5).
    pub method: String,

    /// Suffix appended to output file names and the job name.
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Extra simulator parameters as name/value pairs.
    #[arg(long, num_args = 1.., value_name = "NAME VALUE")]
    pub values: Vec<String>,

    /// Extra simulator flags.
    #[arg(long = "toggle", num_args = 1.., value_name = "FLAG")]
    pub toggles: Vec<String>,

    /// Override the number of cores used to build the simulator.
    #[arg(long, value_name = "NUM")]
    pub cores: Option<usize>,

    /// Submit the written script, overriding `cluster.submit`.
    #[arg(long)]
    pub submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn thermo_methods_are_comma_separated() {
        let cli = Cli::parse_from(["paperkit", "thermo", "1.3", "0.3", "25", "-m", "nw,tmmc"]);
        let Commands::Thermo(args) = cli.command else {
            panic!("expected 'thermo' subcommand");
        };
        assert_eq!(args.n, 25);
        assert_eq!(args.methods, vec!["nw", "tmmc"]);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from([
            "paperkit",
            "renormalization",
            "1",
            "1.3",
            "5",
            "[2, 3]",
            "-O",
            "--dry-run",
            "-S",
            "sweep.python=python3",
        ]);
        assert!(cli.dry_run);
        assert_eq!(cli.set_values, vec!["sweep.python=python3"]);
        let Commands::Renormalization(args) = cli.command else {
            panic!("expected 'renormalization' subcommand");
        };
        assert!(args.overwrite);
        assert_eq!(args.counts, "[2, 3]");
    }

    #[test]
    fn melting_needs_densities() {
        assert!(Cli::try_parse_from(["paperkit", "melting"]).is_err());
        assert!(Cli::try_parse_from(["paperkit", "melting", "--nstart", "0.8"]).is_err());
        assert!(
            Cli::try_parse_from(["paperkit", "melting", "--n", "1.0", "--nstart", "0.8"]).is_err()
        );

        let cli = Cli::parse_from(["paperkit", "melting", "--nstart", "0.8", "--nend", "1.0"]);
        let Commands::Melting(args) = cli.command else {
            panic!("expected 'melting' subcommand");
        };
        assert_eq!(args.nstep, 0.1);
        assert_eq!(args.tstep, 1.0);
        assert!(args.temperatures.is_empty());
    }

    #[test]
    fn submit_collects_values_and_toggles() {
        let cli = Cli::parse_from([
            "paperkit",
            "submit",
            "1.3",
            "0.3",
            "10",
            "tmmc",
            "--values",
            "iterations",
            "1000",
            "--toggle",
            "transition_override",
        ]);
        let Commands::Submit(args) = cli.command else {
            panic!("expected 'submit' subcommand");
        };
        assert_eq!(args.values, vec!["iterations", "1000"]);
        assert_eq!(args.toggles, vec!["transition_override"]);
        assert!(!args.submit);
    }
}
