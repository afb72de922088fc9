//! Breadth-first search over an edge-list file
//!
//! ```text
//! frontier_bfs --graph edges.txt --src 0 --mark-pred --display
//! frontier_bfs edges.mtx --matrix-market --undirected
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{bail, Context, Result};
use frontier_graph::algorithms::{bfs, BfsConfig};
use frontier_graph::config::{ParameterFlags, Parameters};
use frontier_graph::{CsrGraph, EdgeList, EdgeListReader, ValueType};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn declare(params: &mut Parameters) -> Result<()> {
    let switch = ParameterFlags::NO_ARGUMENT | ParameterFlags::SINGLE_VALUE;
    params.declare(
        "graph",
        ParameterFlags::REQUIRED_ARGUMENT
            | ParameterFlags::SINGLE_VALUE
            | ParameterFlags::REQUIRED_PARAMETER,
        "",
        "edge list file (text, Matrix Market, or `<base>_edges.parquet`)",
        ValueType::Str,
    )?;
    params.declare("undirected", switch, false, "store every edge both ways", ValueType::Bool)?;
    params.declare("one-based", switch, false, "vertex ids start at 1", ValueType::Bool)?;
    params.declare(
        "matrix-market",
        switch,
        false,
        "input has a Matrix Market size header",
        ValueType::Bool,
    )?;
    params.declare("display", switch, false, "print the neighbor listing", ValueType::Bool)?;
    params.declare(
        "display-limit",
        ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::SINGLE_VALUE,
        frontier_graph::storage::DISPLAY_VERTEX_LIMIT,
        "vertices shown by --display",
        ValueType::Usize,
    )?;
    params.declare("help", switch, false, "print this message", ValueType::Bool)?;
    BfsConfig::declare(params)?;
    Ok(())
}

#[cfg(feature = "storage")]
fn load_parquet(base: &str) -> Result<EdgeList> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start runtime")?;
    runtime.block_on(EdgeList::read_parquet(base))
}

#[cfg(not(feature = "storage"))]
fn load_parquet(base: &str) -> Result<EdgeList> {
    bail!("{base}_edges.parquet: built without the `storage` feature")
}

fn load(params: &Parameters) -> Result<EdgeList> {
    let path = params.get_str("graph")?;
    let undirected = params.get::<bool>("undirected")?;

    if let Some(base) = path.strip_suffix("_edges.parquet") {
        let mut list = load_parquet(base)?;
        if undirected && list.directed() {
            list.symmetrize()?;
        }
        return Ok(list);
    }

    let reader = EdgeListReader::new()
        .directed(!undirected)
        .one_based(params.get("one-based")?)
        .matrix_market(params.get("matrix-market")?);
    reader
        .read_file(Path::new(path))
        .with_context(|| format!("Failed to load {path}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut params = Parameters::new("frontier_bfs: breadth-first search over an edge-list file");
    declare(&mut params)?;

    let positionals = params.parse_command_line(std::env::args().skip(1))?;
    if params.get::<bool>("help")? {
        println!("{}", params.help());
        return Ok(());
    }
    if let Some(path) = positionals.first() {
        if !params.is_set("graph") {
            params.set("graph", path)?;
        }
    }
    let missing = params.check_required();
    if !missing.is_empty() {
        eprintln!("{}", params.help());
        bail!("missing required parameters: {}", missing.join(", "));
    }

    let edges = load(&params)?;
    let graph: CsrGraph = CsrGraph::from_edge_list(&edges)?;
    let config = BfsConfig::from_parameters(&params)?;

    if params.get::<bool>("display")? {
        print!("{}", graph.display("", params.get("display-limit")?, false)?);
    }

    let result = bfs(&graph, &config)?;
    println!(
        "visited {} of {} vertices from {} in {} supersteps ({:.3} ms)",
        result.visited_count(),
        graph.num_nodes(),
        config.source,
        result.stats.iterations,
        result.stats.elapsed.as_secs_f64() * 1000.0
    );
    println!("frontier sizes: {:?}", result.stats.frontier_sizes);
    if result.stats.hit_iteration_cap {
        println!("stopped at the iteration cap");
    }
    if let Some(max_depth) = result.labels.iter().filter(|l| **l != u32::MAX).max() {
        println!("max depth: {max_depth}");
    }
    Ok(())
}
