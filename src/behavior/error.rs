use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::mdp::MdpError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BehaviorError {
    #[error(transparent)]
    Policy(#[from] MdpError),

    #[error("City {0:?} has no neighbor to move to")]
    NoMoveAvailable(NodeIndex),

    #[error("Task offered at {offered:?} but the agent is at {current:?}")]
    TaskElsewhere {
        current: NodeIndex,
        offered: NodeIndex,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_error_is_transparent() {
        let e = BehaviorError::from(MdpError::EmptyTopology);
        assert_eq!(e.to_string(), MdpError::EmptyTopology.to_string());
    }

    #[test]
    fn no_move_display() {
        let e = BehaviorError::NoMoveAvailable(NodeIndex::new(3));
        assert!(e.to_string().contains("no neighbor"));
    }
}
