//! recompose core library
//!
//! The translation engine that reverse-derives declarative compose documents
//! from observed swarm service and network state. The engine is a pure
//! function of its input snapshots: it never talks to an orchestrator and
//! never mutates anything.

pub mod compose;
pub mod error;
pub mod networks;
pub mod observability;
pub mod stacks;
pub mod types;

// Re-export commonly used items
pub use compose::{render_stack, RenderOptions};
pub use error::{RecomposeError, Result};
pub use networks::{classify, NetworkClass};
pub use stacks::StackIndex;
pub use types::{NetworkRecord, ServiceRecord};
