//! Core domain types for the issue cloner.
//!
//! This module contains the tracker-side data structures used throughout
//! the library:
//! - [`Issue`] and its enums - an immutable issue snapshot
//! - [`Project`] - a named container of issues
//! - [`IssueLink`] - a recorded relationship between two issues
//! - [`IdMap`] - the source-to-target id remapping built during one clone run

mod id_map;
mod issue;
mod link;
mod project;

pub use id_map::IdMap;
pub use issue::{Issue, IssuePriority, IssueStatus, IssueType, UserRef};
pub use link::IssueLink;
pub use project::Project;
