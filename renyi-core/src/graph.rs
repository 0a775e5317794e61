//! Undirected adjacency-list graph with G(n, p) randomisation.

use std::fmt;

use crate::{error::GraphError, random::UnitStream};

/// Undirected graph over a fixed vertex set `0..vertex_count`.
///
/// Edges are only ever appended. Every edge `(u, v)` is recorded in both
/// adjacency lists and self-loops are rejected, so the adjacency relation is
/// symmetric and irreflexive.
///
/// # Examples
/// ```
/// use renyi_core::Graph;
///
/// let mut graph = Graph::new(3);
/// graph.add_edge(0, 2)?;
/// assert_eq!(graph.neighbours(0), Some(&[2][..]));
/// assert_eq!(graph.neighbours(2), Some(&[0][..]));
/// assert_eq!(graph.degree(1), Some(0));
/// # Ok::<(), renyi_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    /// Creates a graph with `vertex_count` isolated vertices.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Creates a G(n, p) graph by randomising a fresh graph.
    ///
    /// # Errors
    /// Returns the same errors as [`Graph::randomize`].
    ///
    /// # Examples
    /// ```
    /// use renyi_core::{Graph, RandomSource, SeededSource, TrialKey};
    ///
    /// let source = SeededSource::new(3);
    /// let mut stream = source.stream(TrialKey { point_index: 0, trial_index: 0 })?;
    /// let graph = Graph::random(10, 1.0, &mut stream)?;
    /// assert_eq!(graph.edge_count(), 45);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn random<S: UnitStream + ?Sized>(
        vertex_count: usize,
        probability: f64,
        stream: &mut S,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new(vertex_count);
        graph.randomize(probability, stream)?;
        Ok(graph)
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of recorded edges, counting duplicates.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Returns the neighbours of `vertex` in insertion order.
    #[must_use]
    pub fn neighbours(&self, vertex: usize) -> Option<&[usize]> {
        self.adjacency.get(vertex).map(Vec::as_slice)
    }

    /// Returns the number of edge records incident to `vertex`.
    #[must_use]
    pub fn degree(&self, vertex: usize) -> Option<usize> {
        self.adjacency.get(vertex).map(Vec::len)
    }

    /// Iterates over the adjacency lists in vertex order.
    pub fn adjacency(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.adjacency.iter().map(Vec::as_slice)
    }

    /// Appends the undirected edge `(u, v)`.
    ///
    /// Adding the same pair twice records a duplicate edge. None of the
    /// analyses depend on multiplicity.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] when either endpoint is not a
    /// vertex of the graph and [`GraphError::SelfLoop`] when `u == v`.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        let vertex_count = self.vertex_count();
        for vertex in [u, v] {
            if vertex >= vertex_count {
                return Err(GraphError::VertexOutOfRange {
                    vertex,
                    vertex_count,
                });
            }
        }
        if u == v {
            return Err(GraphError::SelfLoop { vertex: u });
        }
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        Ok(())
    }

    /// Adds each unordered pair `{i, j}` with probability `probability`.
    ///
    /// Draws exactly one value per pair, `V(V-1)/2` draws in total, walking
    /// the lower triangle (`i` ascending from 1, `j < i`). A pair becomes an
    /// edge when its draw is strictly below `probability`, so `0.0` never adds
    /// an edge and `1.0` always does.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidProbability`] before drawing anything when
    /// `probability` is NaN or outside `[0, 1]`, and [`GraphError::Source`]
    /// when the stream fails.
    pub fn randomize<S: UnitStream + ?Sized>(
        &mut self,
        probability: f64,
        stream: &mut S,
    ) -> Result<(), GraphError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GraphError::InvalidProbability { probability });
        }
        for i in 1..self.vertex_count() {
            for j in 0..i {
                if stream.next_unit()? < probability {
                    self.add_edge(i, j)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for neighbours in &self.adjacency {
            f.write_str("[")?;
            for (position, neighbour) in neighbours.iter().enumerate() {
                if position > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{neighbour}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
