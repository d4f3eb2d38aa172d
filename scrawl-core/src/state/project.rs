//! # Projects
//!
//! The root document: a header carrying format identity plus canvases keyed
//! by index. Canvases are lazily materialized; asking for an index that does
//! not exist yet creates it, while explicitly adding a duplicate index is an
//! error.

use uuid::Uuid;

use crate::io;
use crate::state::canvas::{Canvas, CanvasEvent};
use crate::stroke::Drawing;
use crate::tool::Tool;

/// Document format identity: schema version plus a stable document UUID.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Header {
    version: io::Version,
    id: Uuid,
}
impl Header {
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: io::CURRENT_VERSION,
            id: Uuid::new_v4(),
        }
    }
    pub(crate) fn from_parts(id: Uuid) -> Self {
        Self {
            version: io::CURRENT_VERSION,
            id,
        }
    }
    #[must_use]
    pub fn version(&self) -> io::Version {
        self.version
    }
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}
impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectError {
    #[error("project already contains a canvas for index {0}")]
    DuplicateCanvas(u32),
}

#[derive(Clone, Debug)]
pub struct Project {
    header: Header,
    /// Insertion order. Indices are unique but need not be contiguous.
    canvases: Vec<Canvas>,
    /// Index of the canvas mutations target when the caller does not name one.
    active: Option<u32>,
}

/// Structural document equality: header and canvases by index. Which canvas
/// happens to be active is cursor state, not document content, and canvas
/// storage order is not significant.
impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        fn by_index(project: &Project) -> Vec<&Canvas> {
            let mut canvases: Vec<&Canvas> = project.canvases.iter().collect();
            canvases.sort_by_key(|canvas| canvas.index());
            canvases
        }
        self.header == other.header && by_index(self) == by_index(other)
    }
}

impl Project {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: Header::new(),
            canvases: Vec::new(),
            active: None,
        }
    }
    pub(crate) fn from_parts(header: Header, canvases: Vec<Canvas>) -> Self {
        Self {
            header,
            canvases,
            active: None,
        }
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }
    #[must_use]
    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    #[must_use]
    pub fn find_canvas(&self, index: u32) -> Option<&Canvas> {
        self.canvases.iter().find(|canvas| canvas.index() == index)
    }
    pub fn find_canvas_mut(&mut self, index: u32) -> Option<&mut Canvas> {
        self.canvases
            .iter_mut()
            .find(|canvas| canvas.index() == index)
    }
    #[must_use]
    pub fn has_canvas(&self, index: u32) -> bool {
        self.find_canvas(index).is_some()
    }

    /// The canvas at `index`, materializing an empty one on first access.
    pub fn canvas_at(&mut self, index: u32) -> &mut Canvas {
        if let Some(position) = self
            .canvases
            .iter()
            .position(|canvas| canvas.index() == index)
        {
            return &mut self.canvases[position];
        }
        self.canvases.push(Canvas::new(index));
        self.canvases.last_mut().unwrap()
    }

    /// The canvas mutations currently target: the explicitly activated one,
    /// else the first ever inserted, else a fresh canvas 0.
    pub fn current_canvas(&mut self) -> &mut Canvas {
        let index = self.current_index();
        self.active = Some(index);
        self.canvas_at(index)
    }
    /// Index of the canvas [`Self::current_canvas`] would return.
    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.active
            .or_else(|| self.canvases.first().map(Canvas::index))
            .unwrap_or(0)
    }

    /// Insert a fully-formed canvas.
    ///
    /// # Errors
    /// The index must be unused; duplicates are rejected, never merged.
    pub fn add_canvas(&mut self, canvas: Canvas) -> Result<(), ProjectError> {
        if self.has_canvas(canvas.index()) {
            return Err(ProjectError::DuplicateCanvas(canvas.index()));
        }
        self.canvases.push(canvas);
        Ok(())
    }

    /// Point subsequent unnamed mutations at `index`, materializing the
    /// canvas if it does not exist yet.
    pub fn set_active_canvas(&mut self, index: u32) {
        let _ = self.canvas_at(index);
        self.active = Some(index);
    }

    pub fn remove_canvas(&mut self, index: u32) -> Option<Canvas> {
        let position = self
            .canvases
            .iter()
            .position(|canvas| canvas.index() == index)?;
        if self.active == Some(index) {
            self.active = None;
        }
        Some(self.canvases.remove(position))
    }

    /// Clear every canvas, returning one event per canvas cleared.
    pub fn clear_all(&mut self) -> Vec<CanvasEvent> {
        self.canvases.iter_mut().map(Canvas::clear).collect()
    }

    /// A project is empty when no canvas has a stroke with points or a
    /// non-empty text item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canvases.iter().all(Canvas::is_empty)
    }
    #[must_use]
    pub fn has_eraser_tool(&self) -> bool {
        self.canvases.iter().any(Canvas::has_eraser_drawing)
    }

    /// Resolve an external drawing reference.
    pub fn drawing_mut(&mut self, canvas_index: u32, id: Uuid) -> Option<&mut Drawing> {
        self.find_canvas_mut(canvas_index)?.drawing_mut(id)
    }

    /// Re-derive every canvas's culling flags. Run after load and undo.
    pub fn perform_occlusion_culling(&mut self) {
        for canvas in &mut self.canvases {
            canvas.perform_occlusion_culling();
        }
    }

    /// Whether any canvas currently holds a given tool's strokes. Mostly
    /// interesting for the eraser, which changes export strategy.
    #[must_use]
    pub fn has_tool(&self, predicate: impl Fn(&Tool) -> bool) -> bool {
        self.canvases.iter().any(|canvas| {
            canvas
                .drawings()
                .iter()
                .any(|drawing| predicate(drawing.tool()))
        })
    }
}
impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
