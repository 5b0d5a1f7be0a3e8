//! Error types for the renderer core

use thiserror::Error;

use crate::graph::TypeId;

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Error type for render operations
///
/// Every variant is fatal to the render in progress; there is no
/// partial-output recovery. Warnings (for example `any`-typed
/// properties) are emitted as inline comments in the generated source
/// instead of surfacing here.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A name handle reached serialization without an assigned string
    #[error("name '{proposed}' in namespace '{namespace}' was never assigned")]
    UnassignedName { namespace: String, proposed: String },

    /// A target hook was invoked on a type kind it declares unsupported
    #[error("target does not support type shape: {kind}")]
    UnsupportedTypeShape { kind: &'static str },

    /// Explicit sum synthesis found two union members with the same
    /// JSON-level value guard
    #[error("union members overlap at the JSON layer on guard '{guard}'")]
    UnresolvableUnion { guard: &'static str },

    /// The type graph contains a cycle that never crosses a named type
    #[error("type graph has a cycle through unnamed types at node {at:?}")]
    CycleBeyondNamedBoundary { at: TypeId },

    /// The type graph violates a structural invariant
    #[error("invalid type graph: {reason}")]
    InvalidGraph { reason: String },
}
