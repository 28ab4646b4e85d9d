//! Data types for the juicebox session widgets.
//!
//! This crate holds the serde-serializable shapes that cross the boundary
//! between the session logic and the page: the opaque session payload, the
//! descriptor of where a session came from, the cloud chooser's options and
//! file records, modal notification names, and the download artifact.
//!
//! Types in this crate are:
//! - **Pure data**: no DOM access, no I/O
//! - **Shape-stable**: field names match what the page scripts expect
//!
//! Behaviour lives in `jbs-core`; DOM bindings live in `jbs-web`.

pub mod artifact;
pub mod chooser;
pub mod modal;
pub mod session;
pub mod source;

pub use artifact::*;
pub use chooser::*;
pub use modal::*;
pub use session::*;
pub use source::*;
