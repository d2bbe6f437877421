//! The rendering side of the toolkit.
//!
//! The graph layer never renders audio itself. It configures a [`Backend`]:
//! it creates primitive nodes, connects them and schedules parameter
//! automation. [`OfflineRenderer`] is the backend shipped with the crate; it
//! renders the configured graph into a sample buffer.
//!
//! [`Backend`]: backend::Backend
//! [`OfflineRenderer`]: offline::OfflineRenderer

/// Automation timeline for a single scheduled parameter.
pub mod automation;
/// The trait the graph layer drives, plus node and parameter handles.
pub mod backend;
/// Block-based offline renderer implementing [`backend::Backend`].
pub mod offline;
