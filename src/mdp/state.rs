use std::fmt;

use petgraph::graph::NodeIndex;

use super::error::MdpError;
use crate::topology::{CityId, Topology};

/// Decision state: where the agent is and where the offered task goes.
///
/// `target == current` encodes "no task offered here". Equality and hashing
/// depend only on the pair; solver values live in a separate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    pub current: CityId,
    pub target: CityId,
}

impl State {
    pub fn new(current: CityId, target: CityId) -> Self {
        Self { current, target }
    }

    /// State of an agent at `city` with nothing on offer.
    pub fn empty(city: CityId) -> Self {
        Self::new(city, city)
    }

    pub fn has_task(&self) -> bool {
        self.current != self.target
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.current.index(), self.target.index())
    }
}

/// A legal next city from some state, with the distance travelled to get
/// there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub city: CityId,
    pub distance: f64,
}

/// Every `(current, target)` pair over a topology, with the candidate moves
/// of each.
///
/// States are stored row-major: `index = current * n + target`.
#[derive(Debug, Clone)]
pub struct StateSpace {
    city_count: usize,
    candidates: Vec<Vec<Candidate>>,
}

impl StateSpace {
    /// Builds the state space of a topology.
    ///
    /// Candidates of `(c, t)`, in order: the neighbors of `c` by index; then
    /// `t` itself when a task is on offer, `t` is not a neighbor, and `t` is
    /// reachable (carrying the task straight there); and, only when nothing
    /// else is possible, staying at `c`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTopology` if there are no cities.
    pub fn build(topology: &Topology) -> Result<Self, MdpError> {
        if topology.is_empty() {
            return Err(MdpError::EmptyTopology);
        }
        let n = topology.city_count();
        let mut candidates = Vec::with_capacity(n * n);

        for current in topology.cities() {
            let distances = topology.distances_from(current);
            let neighbors: Vec<Candidate> = topology
                .neighbors(current)
                .into_iter()
                .filter_map(|city| {
                    topology
                        .road_length(current, city)
                        .map(|distance| Candidate { city, distance })
                })
                .collect();

            for target in topology.cities() {
                let mut moves = neighbors.clone();
                if target != current && !topology.has_neighbor(current, target) {
                    if let Some(distance) = distances[target.index()] {
                        moves.push(Candidate {
                            city: target,
                            distance,
                        });
                    }
                }
                if moves.is_empty() {
                    moves.push(Candidate {
                        city: current,
                        distance: 0.0,
                    });
                }
                candidates.push(moves);
            }
        }

        Ok(Self {
            city_count: n,
            candidates,
        })
    }

    pub fn city_count(&self) -> usize {
        self.city_count
    }

    /// Number of states (`city_count²`).
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Position of `state` in the row-major layout.
    pub fn index_of(&self, state: State) -> Result<usize, MdpError> {
        state_index(self.city_count, state)
    }

    /// State stored at `index`.
    pub fn state(&self, index: usize) -> State {
        state_at(self.city_count, index)
    }

    /// All states in layout order.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.len()).map(|i| self.state(i))
    }

    /// Candidate next cities of the state at `index`.
    pub fn candidates(&self, index: usize) -> &[Candidate] {
        &self.candidates[index]
    }
}

pub(crate) fn state_index(city_count: usize, state: State) -> Result<usize, MdpError> {
    let (c, t) = (state.current.index(), state.target.index());
    if c >= city_count || t >= city_count {
        return Err(MdpError::UnknownState {
            current: state.current,
            target: state.target,
        });
    }
    Ok(c * city_count + t)
}

pub(crate) fn state_at(city_count: usize, index: usize) -> State {
    State::new(
        NodeIndex::new(index / city_count),
        NodeIndex::new(index % city_count),
    )
}
