//! Filter: keep the frontier vertices a functor accepts
//!
//! Surviving ids keep their relative order.

use super::OperatorConfig;
use crate::error::{GraphError, Result};
use crate::frontier::{Frontier, FrontierKind};
use crate::functor::Functor;
use crate::types::Index;
use rayon::prelude::*;
use tracing::trace;

/// Keep the vertices of `input` for which `cond_vertex` holds
///
/// `apply_vertex` runs once for each kept vertex.
///
/// # Errors
///
/// Returns `InvalidArgument` if `input` is not a vertex frontier
pub fn filter<V, F>(input: &Frontier<V>, functor: &F, config: &OperatorConfig) -> Result<Frontier<V>>
where
    V: Index,
    F: Functor<V>,
{
    if input.kind() != FrontierKind::Vertex {
        return Err(GraphError::invalid("filter expects a vertex frontier"));
    }

    let keep = |&v: &V| {
        functor.cond_vertex(v).then(|| {
            functor.apply_vertex(v);
            v
        })
    };

    let items: Vec<V> = if config.use_parallel(input.len()) {
        input.as_slice().par_iter().filter_map(keep).collect()
    } else {
        input.as_slice().iter().filter_map(keep).collect()
    };

    trace!(input = input.len(), output = items.len(), "filter");
    Ok(Frontier::vertices(items))
}
