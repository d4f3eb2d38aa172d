//! # Document state
//!
//! The owning hierarchy: a [`project::Project`] holds [`canvas::Canvas`]es by
//! index, each canvas holds its drawings and [`text::Text`] items by value.
//! External references into the graph are `(canvas index, Uuid)` pairs
//! resolved through the project, never pointers.

pub mod canvas;
pub mod project;
pub mod text;

pub use canvas::{Canvas, CanvasEvent};
pub use project::{Header, Project, ProjectError};
pub use text::{Font, Text};
