use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use htn_serializer::config::{ConvertConfig, IncompleteGroupPolicy, OutcomeOrder};
use htn_serializer::{batch, fond, ground, output, render};

#[derive(Parser)]
#[command(name = "htn-serializer")]
#[command(about = "Convert grounded HTN problems into FOND planner input")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one grounder output file
    Convert {
        /// Grounder output
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        merge: MergeArgs,

        /// Skip non-deterministic action reconstruction
        #[arg(long)]
        no_merge: bool,
    },
    /// Convert every grounder output file in a directory
    Batch {
        /// Directory of grounder outputs
        dir: PathBuf,

        /// Directory for the documents (default: the input directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Extension of the files to convert
        #[arg(long, default_value = "ground")]
        extension: String,

        /// Concurrent conversions
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Per-instance timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        #[command(flatten)]
        merge: MergeArgs,
    },
    /// Print the decomposition tree below the initial abstract task
    Inspect {
        /// Grounder output
        input: PathBuf,

        /// Maximum abstract-task depth to expand
        #[arg(short, long, default_value = "6")]
        depth: usize,
    },
}

#[derive(clap::Args)]
struct MergeArgs {
    /// Order of merged outcomes
    #[arg(long, value_enum)]
    outcome_order: Option<OutcomeOrderArg>,

    /// Handling of actions whose outcome group lost methods during grounding
    #[arg(long, value_enum)]
    incomplete_groups: Option<IncompleteGroupsArg>,

    /// Emit conditional effects in the output document (not readable by the planner)
    #[arg(long)]
    keep_conditional: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutcomeOrderArg {
    Index,
    Scan,
}

#[derive(Clone, Copy, ValueEnum)]
enum IncompleteGroupsArg {
    Prune,
    Keep,
}

impl MergeArgs {
    fn apply(&self, config: &mut ConvertConfig) {
        if let Some(order) = self.outcome_order {
            config.merge.outcome_order = match order {
                OutcomeOrderArg::Index => OutcomeOrder::Index,
                OutcomeOrderArg::Scan => OutcomeOrder::Scan,
            };
        }
        if let Some(policy) = self.incomplete_groups {
            config.merge.incomplete_groups = match policy {
                IncompleteGroupsArg::Prune => IncompleteGroupPolicy::Prune,
                IncompleteGroupsArg::Keep => IncompleteGroupPolicy::Keep,
            };
        }
        if self.keep_conditional {
            config.keep_conditional = true;
        }
    }
}

/// Initialize tracing on stderr so stdout stays clean for the document
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "htn_serializer=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ConvertConfig::from_env()?;

    match cli.command {
        Commands::Convert {
            input,
            output: destination,
            merge,
            no_merge,
        } => {
            merge.apply(&mut config);
            tracing::info!("Converting {}", input.display());

            let mut domain = ground::parse_file(&input)?;
            if !no_merge {
                fond::merge(&mut domain, &config.merge)?;
            }

            match destination {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    let mut writer = std::io::BufWriter::new(file);
                    output::write_json(&mut writer, &domain, config.keep_conditional)?;
                    writer.flush()?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut handle = stdout.lock();
                    output::write_json(&mut handle, &domain, config.keep_conditional)?;
                    writeln!(handle)?;
                }
            }
        }
        Commands::Batch {
            dir,
            out_dir,
            extension,
            jobs,
            timeout_secs,
            merge,
        } => {
            merge.apply(&mut config);
            if let Some(jobs) = jobs {
                config.jobs = jobs.max(1);
            }
            if let Some(secs) = timeout_secs {
                config.timeout = Duration::from_secs(secs);
            }

            let inputs = batch::collect_inputs(&dir, &extension)?;
            let out_dir = out_dir.unwrap_or(dir);
            let report = batch::run_batch(inputs, &out_dir, &config).await?;

            for (input, reason) in &report.failed {
                eprintln!("failed: {}: {}", input.display(), reason);
            }
            for input in &report.timed_out {
                eprintln!("timed out: {}", input.display());
            }
            println!(
                "{} of {} instances converted",
                report.converted.len(),
                report.total()
            );
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Inspect { input, depth } => {
            let mut domain = ground::parse_file(&input)?;
            fond::merge(&mut domain, &config.merge)?;
            print!("{}", render::render_decomposition(&domain, depth));
        }
    }

    Ok(())
}
