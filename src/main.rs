use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chatgraph::{
    AnnotationConfig, GraphDocument, GraphSummary, InputFormat, PipelineConfig, ResolveConfig,
    io::format_distribution, parse_transcript_file, run_pipeline,
};

#[derive(Parser)]
#[command(name = "chatgraph")]
#[command(author, version, about = "Social-interaction graphs from response-coded chat transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Tsv,
    Auto,
}

impl From<FormatArg> for InputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => InputFormat::Json,
            FormatArg::Tsv => InputFormat::Tsv,
            FormatArg::Auto => InputFormat::Auto,
        }
    }
}

#[derive(clap::Args)]
struct AnnotationArgs {
    /// Input transcript table (JSON or TSV)
    #[arg(short, long)]
    input: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value = "auto")]
    format: FormatArg,

    /// Marker for initiation annotations (repeatable; replaces the defaults)
    #[arg(long = "initiation-marker")]
    initiation_markers: Vec<String>,

    /// Marker for ambiguous annotations (repeatable; replaces the defaults)
    #[arg(long = "ambiguous-marker")]
    ambiguous_markers: Vec<String>,

    /// Separator between targets of a compound annotation
    #[arg(long, default_value = "+")]
    delimiter: char,

    /// Drop references to turns that come later in the transcript
    #[arg(long)]
    strict_order: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl AnnotationArgs {
    fn pipeline_config(&self) -> PipelineConfig {
        let defaults = AnnotationConfig::default();
        let pick = |given: &[String], fallback: Vec<String>| {
            if given.is_empty() {
                fallback
            } else {
                given.to_vec()
            }
        };

        PipelineConfig {
            annotation: AnnotationConfig {
                initiation_markers: pick(&self.initiation_markers, defaults.initiation_markers),
                ambiguous_markers: pick(&self.ambiguous_markers, defaults.ambiguous_markers),
                compound_delimiter: self.delimiter,
                ..AnnotationConfig::default()
            },
            resolve: ResolveConfig {
                strict_order: self.strict_order,
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the interaction graph and write the node/edge tables
    Build {
        #[command(flatten)]
        args: AnnotationArgs,

        /// Output file for the graph document (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for a human-readable summary (text)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Only write edges with at least this weight
        #[arg(long, default_value = "1")]
        min_weight: usize,
    },

    /// Print graph statistics without writing anything
    Analyze {
        #[command(flatten)]
        args: AnnotationArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            args,
            output,
            summary,
            min_weight,
        } => {
            setup_logging(args.verbose);
            build_graph(&args, output, summary, min_weight)
        }
        Commands::Analyze { args } => {
            setup_logging(args.verbose);
            analyze_transcript(&args)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder().with_max_level(level);
    // RUST_LOG takes precedence when set
    match EnvFilter::try_from_default_env() {
        Ok(filter) => {
            tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish()).ok()
        }
        Err(_) => tracing::subscriber::set_global_default(builder.finish()).ok(),
    };
}

fn build_graph(
    args: &AnnotationArgs,
    output: PathBuf,
    summary: Option<PathBuf>,
    min_weight: usize,
) -> Result<()> {
    info!("Loading transcript from {:?}", args.input);
    let rows = parse_transcript_file(&args.input, args.format.into())
        .context("Failed to parse input transcript")?;
    info!("Loaded {} rows", rows.len());

    let result = run_pipeline(&rows, &args.pipeline_config())
        .context("Transcript failed structural validation")?;

    let document = GraphDocument::from_graph(&result.graph, &result.report, min_weight);
    document.write_json(&output)?;
    info!(
        "Graph written to {:?} ({} nodes, {} of {} edges)",
        output,
        document.nodes.len(),
        document.edges.len(),
        result.graph.edges().len()
    );

    if let Some(path) = summary {
        GraphSummary::new(&result.graph, &result.report).write_file(&path)?;
        info!("Summary written to {:?}", path);
    }

    if result.report.dropped_links() > 0 || result.report.malformed_count() > 0 {
        warn!(
            "Incomplete graph: {} response links dropped, {} annotations unparsed",
            result.report.dropped_links(),
            result.report.malformed_count()
        );
    }

    Ok(())
}

fn analyze_transcript(args: &AnnotationArgs) -> Result<()> {
    info!("Analyzing transcript from {:?}", args.input);
    let rows = parse_transcript_file(&args.input, args.format.into())
        .context("Failed to parse input transcript")?;
    let result = run_pipeline(&rows, &args.pipeline_config())
        .context("Transcript failed structural validation")?;
    let graph = &result.graph;
    let report = &result.report;

    println!("Transcript Analysis");
    println!("===================");
    println!("Turns: {}", report.turns);
    println!("Speakers: {}", report.speakers);
    println!("Targeted turns: {}", report.targeted_turns);
    println!("Expanded annotations: {}", report.expanded_annotations);
    println!(
        "Response links: {} (total weight {})",
        report.links_resolved, report.multiplicity_total
    );
    println!();

    println!("Dropped");
    println!("-------");
    println!("Malformed annotations: {}", report.malformed_count());
    println!("Unresolved references: {}", report.unresolved_count());
    println!("Forward references: {}", report.forward_reference_count());
    println!();

    println!("Speaker Statistics");
    println!("------------------");
    let turn_counts = graph.turn_count_per_speaker();
    let inbound = graph.inbound_weight_per_node();
    let outbound = graph.outbound_weight_per_node();
    let ratios = graph.response_ratio_per_node();
    for node in graph.nodes() {
        let ratio = ratios[node.id]
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}: {} turns, {} inbound, {} outbound, response ratio {}",
            node.label, turn_counts[node.id], inbound[node.id], outbound[node.id], ratio
        );
    }
    println!();

    println!("Edge Weight Distribution");
    println!("------------------------");
    print!("{}", format_distribution(&graph.weight_distribution()));

    Ok(())
}
