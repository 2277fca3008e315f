// Core data models for stagectl
// These structs mirror the records exchanged with the backend

pub mod stage;
pub mod reference;
pub mod validation;
pub mod wire;

pub use stage::*;
pub use reference::*;
pub use validation::*;
