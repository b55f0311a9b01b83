//! Behaviors: turn a decision request into an [`Action`].

pub mod action;
pub mod error;
pub mod random;
pub mod reactive;
pub mod trait_;

pub use action::Action;
pub use error::BehaviorError;
pub use random::RandomBehavior;
pub use reactive::ReactiveBehavior;
pub use trait_::Behavior;
