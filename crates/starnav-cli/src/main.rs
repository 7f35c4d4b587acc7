use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use starnav_cli::output::{print_footer, OutputFormat};
use starnav_lib::DEFAULT_GRAPH_STAR_LIMIT;

mod commands;

use commands::distances::{handle_distances_command, DistancesCommandArgs};
use commands::graph::{handle_graph_command, GraphCommandArgs};
use commands::route::{handle_route_command, RouteCommandArgs};
use commands::CatalogArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Star catalog route planning and distance reports")]
struct Cli {
    /// Catalog file (CSV or JSON).
    #[arg(long, env = "STARNAV_CATALOG")]
    catalog: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    /// Print the elapsed time after the command finishes.
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Drop stars of this spectral type (e.g. `M`). Repeatable.
    #[arg(long = "exclude-class")]
    exclude_class: Vec<char>,

    /// Drop stars belonging to this polity. Repeatable.
    #[arg(long = "exclude-polity")]
    exclude_polity: Vec<String>,

    /// Refuse catalogs larger than this.
    #[arg(long, default_value_t = DEFAULT_GRAPH_STAR_LIMIT)]
    max_stars: usize,
}

impl FilterArgs {
    fn catalog_args(&self) -> CatalogArgs {
        CatalogArgs {
            exclude_classes: self.exclude_class.clone(),
            exclude_polities: self.exclude_polity.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route between two stars.
    Route {
        /// Starting star identifier.
        #[arg(long = "from")]
        from: String,
        /// Destination star identifier.
        #[arg(long = "to")]
        to: String,
        /// Longest single jump in light-years.
        #[arg(long)]
        max_jump: Option<f64>,
        /// Every jump must be longer than this many light-years.
        #[arg(long)]
        min_jump: Option<f64>,
        /// Star the route must pass through. Repeatable.
        #[arg(long = "via")]
        via: Vec<String>,
        /// Visit `--via` stars in the order given.
        #[arg(long)]
        in_order: bool,
        /// Star the route must not pass through. Repeatable.
        #[arg(long = "avoid")]
        avoid: Vec<String>,
        /// Show this many ranked alternatives.
        #[arg(long, default_value_t = 1)]
        paths: usize,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List distances from one star to every other, closest first.
    Distances {
        /// Reference star identifier.
        #[arg(long)]
        star: String,
        /// Show at most this many stars.
        #[arg(long)]
        limit: Option<usize>,
        /// Skip stars farther than this many light-years.
        #[arg(long)]
        max_distance: Option<f64>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Build the navigation graph and report its size.
    Graph {
        /// Connect stars closer than this many light-years.
        #[arg(long)]
        max_jump: f64,
        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    let started = Instant::now();

    match &cli.command {
        Command::Route {
            from,
            to,
            max_jump,
            min_jump,
            via,
            in_order,
            avoid,
            paths,
            filter,
        } => {
            let args = RouteCommandArgs {
                from: from.clone(),
                to: to.clone(),
                max_jump: *max_jump,
                min_jump: *min_jump,
                via: via.clone(),
                in_order: *in_order,
                avoid: avoid.clone(),
                paths: *paths,
                catalog: filter.catalog_args(),
                max_stars: filter.max_stars,
            };
            handle_route_command(&cli.catalog, cli.format, &args)?;
        }
        Command::Distances {
            star,
            limit,
            max_distance,
            filter,
        } => {
            let args = DistancesCommandArgs {
                star: star.clone(),
                limit: *limit,
                max_distance: *max_distance,
                catalog: filter.catalog_args(),
            };
            handle_distances_command(&cli.catalog, cli.format, &args)?;
        }
        Command::Graph { max_jump, filter } => {
            let args = GraphCommandArgs {
                max_jump: *max_jump,
                catalog: filter.catalog_args(),
                max_stars: filter.max_stars,
            };
            handle_graph_command(&cli.catalog, cli.format, &args)?;
        }
    }

    if cli.timing {
        print_footer(started.elapsed());
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .flatten_event(true);
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    } else {
        let fmt_layer = fmt::layer().with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    }
}
