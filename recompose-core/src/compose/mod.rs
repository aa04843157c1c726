//! Compose document rendering.
//!
//! The translation core: service records in, declarative compose text out.
//! `service` renders one service entry, `document` assembles whole per-stack
//! documents including the trailing network block.

pub mod document;
pub mod service;

pub use document::{render_stack, COMPOSE_VERSION};
pub use service::{format_service, ServiceBlock};

use serde::{Deserialize, Serialize};

/// Output-shaping switches, threaded explicitly through every render call
/// rather than held as process state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Strip the `"<stack>_"` prefix from managed network names
    #[serde(default)]
    pub strip_prefix: bool,

    /// Force an `encrypted` driver option onto managed networks lacking one
    #[serde(default)]
    pub force_encrypted: bool,
}
