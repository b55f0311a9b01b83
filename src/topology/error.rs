use petgraph::graph::NodeIndex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TopologyError {
    #[error("Unknown city index: {0:?}")]
    UnknownCity(NodeIndex),

    #[error("City name already exists: {0}")]
    DuplicateCity(String),

    #[error("City name not found: {0}")]
    UnknownName(String),

    #[error("Cannot connect city {0:?} to itself")]
    SelfLoop(NodeIndex),

    #[error("Road length must be positive and finite, got {0}")]
    InvalidDistance(f64),

    #[error("Road between {0:?} and {1:?} already exists")]
    DuplicateRoad(NodeIndex, NodeIndex),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_city_display() {
        let e = TopologyError::UnknownCity(NodeIndex::new(5));
        assert!(e.to_string().contains("Unknown city index"));
    }

    #[test]
    fn invalid_distance_display() {
        let e = TopologyError::InvalidDistance(-1.0);
        assert_eq!(
            e.to_string(),
            "Road length must be positive and finite, got -1"
        );
    }

    #[test]
    fn duplicate_city_display() {
        let e = TopologyError::DuplicateCity("Lausanne".to_string());
        assert_eq!(e.to_string(), "City name already exists: Lausanne");
    }
}
