//! Superstep driver
//!
//! The enactor seeds a frontier, then repeats Advance → Filter until the
//! frontier is empty or the iteration cap is hit. Each superstep finishes
//! before the next begins; per-vertex state written during one step is visible
//! to every worker in the next.

use crate::config::{ParameterFlags, Parameters};
use crate::error::Result;
use crate::frontier::Frontier;
use crate::functor::Functor;
use crate::operators::{advance, filter, OperatorConfig, DEFAULT_PARALLEL_THRESHOLD};
use crate::storage::Adjacency;
use crate::types::{Index, ValueType};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Iteration cap and operator tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnactorConfig {
    /// Stop after this many supersteps even if the frontier is not empty
    pub max_iterations: Option<usize>,
    /// Settings passed to each operator call
    pub operator: OperatorConfig,
}

impl EnactorConfig {
    /// Declare `max-iter` and `parallel-threshold`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDefinition` if either name is already declared
    pub fn declare(params: &mut Parameters) -> Result<()> {
        params.declare(
            "max-iter",
            ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::SINGLE_VALUE,
            0,
            "maximum number of supersteps, 0 for no limit",
            ValueType::Usize,
        )?;
        params.declare(
            "parallel-threshold",
            ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::SINGLE_VALUE,
            DEFAULT_PARALLEL_THRESHOLD,
            "frontier size at which operators switch to the thread pool",
            ValueType::Usize,
        )
    }

    /// Read the settings declared by [`EnactorConfig::declare`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a parameter is undeclared or malformed
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        let max_iterations = params.get::<usize>("max-iter")?;
        Ok(Self {
            max_iterations: (max_iterations > 0).then_some(max_iterations),
            operator: OperatorConfig {
                parallel_threshold: params.get("parallel-threshold")?,
            },
        })
    }
}

/// Counters collected while enacting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnactorStats {
    /// Supersteps run
    pub iterations: usize,
    /// Edges offered to the functor over all steps
    pub edges_visited: usize,
    /// Vertices that survived Filter over all steps
    pub vertices_admitted: usize,
    /// Frontier size after each superstep
    pub frontier_sizes: Vec<usize>,
    /// Whether the loop stopped on the iteration cap
    pub hit_iteration_cap: bool,
    /// Wall-clock time of the loop
    pub elapsed: Duration,
}

/// Runs Advance/Filter supersteps over a graph
#[derive(Debug, Clone, Copy, Default)]
pub struct Enactor {
    config: EnactorConfig,
}

impl Enactor {
    /// Enactor with the given configuration
    #[must_use]
    pub const fn new(config: EnactorConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &EnactorConfig {
        &self.config
    }

    /// Traverse from `seed` until convergence
    ///
    /// The functor's edge condition decides admission and its vertex
    /// condition prunes each advanced frontier.
    ///
    /// # Errors
    ///
    /// Returns the first operator error (e.g. a graph that is not
    /// host-readable)
    pub fn enact<V, S, G, F>(&self, graph: &G, functor: &F, seed: Frontier<V>) -> Result<EnactorStats>
    where
        V: Index,
        S: Index,
        G: Adjacency<V, S> + ?Sized,
        F: Functor<V>,
    {
        let start = Instant::now();
        let mut stats = EnactorStats::default();
        let mut frontier = seed;

        while !frontier.is_empty() {
            if self
                .config
                .max_iterations
                .is_some_and(|cap| stats.iterations >= cap)
            {
                stats.hit_iteration_cap = true;
                break;
            }

            let advanced = advance(graph, &frontier, functor, &self.config.operator)?;
            let next = filter(&advanced.frontier, functor, &self.config.operator)?;

            debug!(
                iteration = stats.iterations,
                input = frontier.len(),
                advanced = advanced.frontier.len(),
                output = next.len(),
                edges = advanced.edges_visited,
                "superstep"
            );

            stats.iterations += 1;
            stats.edges_visited += advanced.edges_visited;
            stats.vertices_admitted += next.len();
            stats.frontier_sizes.push(next.len());
            frontier = next;
        }

        stats.elapsed = start.elapsed();
        info!(
            iterations = stats.iterations,
            edges_visited = stats.edges_visited,
            vertices_admitted = stats.vertices_admitted,
            elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
            "traversal finished"
        );
        Ok(stats)
    }
}
