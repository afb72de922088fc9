//! Plain-text edge list loader
//!
//! One edge per line: `source destination [weight]`, whitespace separated.
//! Blank lines and lines starting with `#` or `%` are skipped. In Matrix Market
//! mode the first data line is the `rows cols entries` header and ids are
//! 1-based.

use super::coo::EdgeList;
use crate::error::{GraphError, Result};
use crate::types::{GraphValue, Index};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Builder for reading edge lists from text
#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
pub struct EdgeListReader {
    directed: bool,
    one_based: bool,
    matrix_market: bool,
    nodes: Option<usize>,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeListReader {
    /// Directed, 0-based, vertex count inferred from the largest id
    #[must_use]
    pub const fn new() -> Self {
        Self {
            directed: true,
            one_based: false,
            matrix_market: false,
            nodes: None,
        }
    }

    /// Treat input as undirected: every non-loop edge is stored both ways
    #[must_use]
    pub const fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Ids in the file start at 1
    #[must_use]
    pub const fn one_based(mut self, one_based: bool) -> Self {
        self.one_based = one_based;
        self
    }

    /// Expect a Matrix Market coordinate body (implies 1-based ids)
    #[must_use]
    pub const fn matrix_market(mut self, matrix_market: bool) -> Self {
        self.matrix_market = matrix_market;
        self
    }

    /// Fix the vertex count instead of inferring it
    #[must_use]
    pub const fn nodes(mut self, nodes: usize) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// Read an edge list from a file
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be opened or read
    /// - `Parse` for a malformed line (with its 1-based line number)
    pub fn read_file<V: Index, W: GraphValue, P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<EdgeList<V, W>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let list = self.read(BufReader::new(file))?;
        info!(
            path = %path.display(),
            nodes = list.nodes(),
            edges = list.edges(),
            directed = list.directed(),
            "loaded edge list"
        );
        Ok(list)
    }

    /// Read an edge list from any buffered reader
    ///
    /// # Errors
    ///
    /// - `Io` if reading fails
    /// - `Parse` for a malformed line, an id out of range, or a mix of
    ///   weighted and unweighted lines
    pub fn read<V: Index, W: GraphValue, R: BufRead>(&self, input: R) -> Result<EdgeList<V, W>> {
        let one_based = self.one_based || self.matrix_market;
        let mut header_nodes = None;
        let mut pairs: Vec<(V, V)> = Vec::new();
        let mut weights: Vec<W> = Vec::new();
        let mut weighted = None;
        let mut max_id = None::<usize>;

        for (number, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = number + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
                continue;
            }
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();

            if self.matrix_market && header_nodes.is_none() {
                if tokens.len() < 2 {
                    return Err(parse_error(line_no, "expected `rows cols entries` header"));
                }
                let rows = parse_count(tokens[0], line_no)?;
                let cols = parse_count(tokens[1], line_no)?;
                header_nodes = Some(rows.max(cols));
                continue;
            }

            if !(2..=3).contains(&tokens.len()) {
                return Err(parse_error(
                    line_no,
                    format!("expected `source destination [weight]`, got {} fields", tokens.len()),
                ));
            }

            let src = self.parse_id::<V>(tokens[0], line_no, one_based)?;
            let dst = self.parse_id::<V>(tokens[1], line_no, one_based)?;
            for id in [src, dst] {
                let idx = id.to_usize().unwrap_or(usize::MAX);
                max_id = Some(max_id.map_or(idx, |m| m.max(idx)));
            }

            let has_weight = tokens.len() == 3;
            match weighted {
                None => weighted = Some(has_weight),
                Some(expected) if expected != has_weight => {
                    return Err(parse_error(line_no, "mixed weighted and unweighted edges"));
                }
                Some(_) => {}
            }
            if has_weight {
                let weight = W::parse_saturating(tokens[2])
                    .map_err(|_| parse_error(line_no, format!("invalid weight `{}`", tokens[2])))?;
                weights.push(weight);
            }
            pairs.push((src, dst));
        }

        let inferred = max_id.map_or(0, |m| m.saturating_add(1));
        let nodes = self.nodes.or(header_nodes).unwrap_or(inferred);
        if inferred > nodes {
            return Err(GraphError::invalid(format!(
                "vertex id {} exceeds vertex count {nodes}",
                inferred - 1
            )));
        }

        let values = (weighted == Some(true)).then_some(weights);
        let mut list = EdgeList::from_pairs(nodes, true, pairs, values)?;
        if !self.directed {
            list.symmetrize()?;
        }
        Ok(list)
    }

    fn parse_id<V: Index>(&self, token: &str, line: usize, one_based: bool) -> Result<V> {
        let raw = parse_count(token, line)?;
        let idx = if one_based {
            raw.checked_sub(1)
                .ok_or_else(|| parse_error(line, "vertex id 0 in 1-based input"))?
        } else {
            raw
        };
        if let Some(nodes) = self.nodes {
            if idx >= nodes {
                return Err(parse_error(
                    line,
                    format!("vertex id {token} exceeds vertex count {nodes}"),
                ));
            }
        }
        V::from_usize(idx)
            .filter(|id| !id.is_invalid())
            .ok_or_else(|| parse_error(line, format!("vertex id {token} does not fit {}", V::TYPE_NAME)))
    }
}

fn parse_count(token: &str, line: usize) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| parse_error(line, format!("invalid vertex id `{token}`")))
}

fn parse_error(line: usize, message: impl Into<String>) -> GraphError {
    GraphError::Parse {
        line,
        message: message.into(),
    }
}
