//! Stateless analyses over a finished [`Graph`].
//!
//! Breadth-first distances underpin everything here: connectivity is
//! reachability from vertex 0 and the diameter is the largest distance seen
//! across one BFS per vertex.

use std::collections::VecDeque;

use crate::{error::GraphError, graph::Graph};

/// Shortest-path edge counts from a single start vertex.
///
/// `None` marks a vertex that the traversal never reached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Distances {
    hops: Vec<Option<usize>>,
}

impl Distances {
    /// Returns the distance to `vertex`, or `None` when it was not reached or
    /// does not exist.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<usize> {
        self.hops.get(vertex).copied().flatten()
    }

    /// Returns the number of vertices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Returns whether the vector covers no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Returns whether every vertex was reached. Vacuously true when empty.
    #[must_use]
    pub fn all_reached(&self) -> bool {
        self.hops.iter().all(Option::is_some)
    }

    /// Returns the largest finite distance, if any vertex was reached.
    #[must_use]
    pub fn max_reached(&self) -> Option<usize> {
        self.hops.iter().flatten().copied().max()
    }

    /// Iterates over the per-vertex distances in vertex order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<usize>> + '_ {
        self.hops.iter().copied()
    }

    /// Returns the raw per-vertex distances.
    #[must_use]
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.hops
    }
}

/// Diameter of a graph.
///
/// `Disconnected` orders above every finite value, which is the "infinite
/// diameter" reading used by threshold comparisons.
///
/// # Examples
/// ```
/// use renyi_core::Diameter;
///
/// assert!(Diameter::Disconnected > Diameter::Finite(usize::MAX));
/// assert_eq!(Diameter::Disconnected.as_signed(), -1);
/// assert!(Diameter::Disconnected.exceeds(2));
/// assert!(!Diameter::Finite(2).exceeds(2));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Diameter {
    /// Largest shortest-path distance of a connected graph.
    Finite(usize),
    /// At least one pair of vertices has no connecting path.
    Disconnected,
}

impl Diameter {
    /// Returns whether the diameter is finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Returns whether the diameter is strictly greater than `bound`.
    #[must_use]
    pub const fn exceeds(self, bound: usize) -> bool {
        match self {
            Self::Finite(value) => value > bound,
            Self::Disconnected => true,
        }
    }

    /// Returns the diameter as a signed integer, `-1` when disconnected.
    #[must_use]
    pub fn as_signed(self) -> i64 {
        match self {
            Self::Finite(value) => i64::try_from(value).unwrap_or(i64::MAX),
            Self::Disconnected => -1,
        }
    }
}

/// Runs a breadth-first traversal from `start`.
///
/// Neighbours are discovered in adjacency-list order with a FIFO frontier.
/// An empty graph yields empty distances whatever `start` is.
///
/// # Errors
/// Returns [`GraphError::VertexOutOfRange`] when the graph is non-empty and
/// `start` is not one of its vertices.
///
/// # Examples
/// ```
/// use renyi_core::{Graph, bfs_distances};
///
/// let mut graph = Graph::new(4);
/// graph.add_edge(0, 1)?;
/// graph.add_edge(1, 2)?;
/// let distances = bfs_distances(&graph, 0)?;
/// assert_eq!(distances.as_slice(), &[Some(0), Some(1), Some(2), None]);
/// # Ok::<(), renyi_core::GraphError>(())
/// ```
pub fn bfs_distances(graph: &Graph, start: usize) -> Result<Distances, GraphError> {
    let vertex_count = graph.vertex_count();
    if vertex_count == 0 {
        return Ok(Distances::default());
    }
    if start >= vertex_count {
        return Err(GraphError::VertexOutOfRange {
            vertex: start,
            vertex_count,
        });
    }

    let mut hops = vec![None; vertex_count];
    let mut frontier = VecDeque::with_capacity(vertex_count);
    hops[start] = Some(0);
    frontier.push_back((start, 0_usize));

    while let Some((vertex, distance)) = frontier.pop_front() {
        for &neighbour in graph.neighbours(vertex).unwrap_or_default() {
            let Some(slot) = hops.get_mut(neighbour) else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(distance + 1);
                frontier.push_back((neighbour, distance + 1));
            }
        }
    }

    Ok(Distances { hops })
}

/// Computes the diameter with one BFS per vertex.
///
/// Returns [`Diameter::Finite`]`(0)` for graphs with fewer than two vertices.
/// The scan stops at the first BFS that leaves a vertex unreached and returns
/// [`Diameter::Disconnected`] without running the remaining traversals.
///
/// # Examples
/// ```
/// use renyi_core::{Diameter, Graph, diameter};
///
/// let mut path = Graph::new(3);
/// path.add_edge(0, 1)?;
/// path.add_edge(1, 2)?;
/// assert_eq!(diameter(&path), Diameter::Finite(2));
/// assert_eq!(diameter(&Graph::new(2)), Diameter::Disconnected);
/// # Ok::<(), renyi_core::GraphError>(())
/// ```
#[must_use]
pub fn diameter(graph: &Graph) -> Diameter {
    let mut longest = 0;
    for start in 0..graph.vertex_count() {
        let Ok(distances) = bfs_distances(graph, start) else {
            return Diameter::Disconnected;
        };
        if !distances.all_reached() {
            return Diameter::Disconnected;
        }
        longest = longest.max(distances.max_reached().unwrap_or(0));
    }
    Diameter::Finite(longest)
}

/// Returns whether at least one vertex has degree zero.
///
/// An empty graph has no vertex to be isolated and returns `false`.
#[must_use]
pub fn is_isolated(graph: &Graph) -> bool {
    graph.adjacency().any(<[usize]>::is_empty)
}

/// Returns whether every vertex is reachable from vertex 0.
///
/// Reachability is symmetric and transitive in an undirected graph, so a
/// single traversal suffices. An empty graph is trivially connected.
#[must_use]
pub fn is_connected(graph: &Graph) -> bool {
    bfs_distances(graph, 0).is_ok_and(|distances| distances.all_reached())
}
