use super::error::TopologyError;
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt::Display;

/// Identifier of a city in a [`Topology`].
pub type CityId = NodeIndex;

/// A named city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub name: String,
}

impl City {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Undirected road network between cities.
///
/// # Invariants
///
/// - City names are unique
/// - Roads have a positive, finite length and never loop back to their origin
/// - At most one road joins any two cities
/// - Cities are never removed, so [`CityId`]s stay dense in `0..city_count()`
///
/// # Example
///
/// ```
/// use reactive_mdp::topology::Topology;
///
/// let topology = Topology::from_routes(&[("A", "B", 1.0), ("B", "C", 2.0)]).unwrap();
/// let a = topology.find("A").unwrap();
/// let c = topology.find("C").unwrap();
/// assert_eq!(topology.distance(a, c), Some(3.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Topology {
    graph: UnGraph<City, f64>,
    /// Maps city name → node index for reverse lookup.
    city_by_name: HashMap<String, CityId>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a topology from `(from, to, length)` road triples, creating
    /// cities on first mention.
    pub fn from_routes(routes: &[(&str, &str, f64)]) -> Result<Self, TopologyError> {
        let mut topology = Self::new();
        for &(from, to, length) in routes {
            let a = topology.find_or_add(from);
            let b = topology.find_or_add(to);
            topology.connect(a, b, length)?;
        }
        Ok(topology)
    }

    /// Adds a city and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCity` if a city with the same name already exists.
    pub fn add_city(&mut self, name: impl Into<String>) -> Result<CityId, TopologyError> {
        let name = name.into();
        if self.city_by_name.contains_key(&name) {
            return Err(TopologyError::DuplicateCity(name));
        }
        let id = self.graph.add_node(City::new(name.clone()));
        self.city_by_name.insert(name, id);
        Ok(id)
    }

    fn find_or_add(&mut self, name: &str) -> CityId {
        if let Some(&id) = self.city_by_name.get(name) {
            return id;
        }
        let id = self.graph.add_node(City::new(name));
        self.city_by_name.insert(name.to_string(), id);
        id
    }

    /// Adds a road of the given length between `a` and `b`.
    ///
    /// # Errors
    ///
    /// - `UnknownCity` if either city does not exist
    /// - `SelfLoop` if `a == b`
    /// - `InvalidDistance` if `length` is not positive and finite
    /// - `DuplicateRoad` if the two cities are already connected
    pub fn connect(&mut self, a: CityId, b: CityId, length: f64) -> Result<(), TopologyError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(TopologyError::SelfLoop(a));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(TopologyError::InvalidDistance(length));
        }
        if self.graph.find_edge(a, b).is_some() {
            return Err(TopologyError::DuplicateRoad(a, b));
        }
        self.graph.add_edge(a, b, length);
        Ok(())
    }

    fn check(&self, city: CityId) -> Result<(), TopologyError> {
        if self.graph.node_weight(city).is_none() {
            return Err(TopologyError::UnknownCity(city));
        }
        Ok(())
    }

    pub fn city_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn road_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns city identifiers in index order.
    pub fn cities(&self) -> impl Iterator<Item = CityId> + '_ {
        self.graph.node_indices()
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.graph.node_weight(id)
    }

    pub fn contains(&self, id: CityId) -> bool {
        self.graph.node_weight(id).is_some()
    }

    /// Returns the identifier of the city with the given name.
    pub fn find(&self, name: &str) -> Option<CityId> {
        self.city_by_name.get(name).copied()
    }

    /// Like [`find`](Self::find) but fails with `UnknownName`.
    pub fn require(&self, name: &str) -> Result<CityId, TopologyError> {
        self.find(name)
            .ok_or_else(|| TopologyError::UnknownName(name.to_string()))
    }

    /// Returns the direct neighbors of `city`, sorted by index.
    ///
    /// The order is stable so that anything enumerating neighbors is
    /// deterministic regardless of insertion order.
    pub fn neighbors(&self, city: CityId) -> Vec<CityId> {
        let mut neighbors: Vec<CityId> = self.graph.neighbors(city).collect();
        neighbors.sort_unstable();
        neighbors
    }

    pub fn has_neighbor(&self, city: CityId, other: CityId) -> bool {
        self.graph.find_edge(city, other).is_some()
    }

    /// Length of the direct road between two cities, if any.
    pub fn road_length(&self, a: CityId, b: CityId) -> Option<f64> {
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    /// Shortest-path distances from `from` to every city, indexed by city.
    ///
    /// Unreachable cities map to `None`; `from` itself maps to `Some(0.0)`.
    pub fn distances_from(&self, from: CityId) -> Vec<Option<f64>> {
        if !self.contains(from) {
            return vec![None; self.city_count()];
        }
        let reached = dijkstra(&self.graph, from, None, |edge| *edge.weight());
        self.graph
            .node_indices()
            .map(|city| reached.get(&city).copied())
            .collect()
    }

    /// Shortest-path distance between two cities.
    pub fn distance(&self, from: CityId, to: CityId) -> Option<f64> {
        if !self.contains(to) {
            return None;
        }
        self.distances_from(from)[to.index()]
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Topology {{")?;
        writeln!(f, "  Cities: {}", self.graph.node_count())?;
        writeln!(f, "  Roads: {}", self.graph.edge_count())?;
        for edge in self.graph.edge_references() {
            writeln!(
                f,
                "    {} -- {} ({})",
                self.graph[edge.source()].name,
                self.graph[edge.target()].name,
                edge.weight()
            )?;
        }
        write!(f, "}}")
    }
}
