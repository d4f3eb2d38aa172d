//! # Canvases
//!
//! One logical page of a project: its strokes in insertion order plus its
//! text annotations. Mutations that a caller may want to surface (undo,
//! clear) hand back a [`CanvasEvent`] instead of posting to any global bus.

use smallvec::SmallVec;
use uuid::Uuid;

use crate::geom::{Rect, Size};
use crate::stroke::Drawing;
use crate::state::Text;
use crate::tool::Tool;

/// Occlusion culling compares geometry at a fixed reference size; the
/// containment relation is scale-invariant, so any non-degenerate size works
/// as long as it is consistent.
const CULL_REFERENCE_SIZE: Size = Size {
    width: 1000.0,
    height: 1000.0,
};

/// Emitted by mutating canvas operations, for the caller to observe or relay.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CanvasEvent {
    /// All drawings and text were removed.
    Cleared { index: u32 },
    /// The newest drawing was removed. Carries the display name of its tool.
    DidUndo { index: u32, tool: &'static str },
}

#[derive(Clone, PartialEq, Debug)]
pub struct Canvas {
    index: u32,
    drawings: Vec<Drawing>,
    text: Vec<Text>,
}

impl Canvas {
    #[must_use]
    pub fn new(index: u32) -> Self {
        Self {
            index,
            drawings: Vec::new(),
            text: Vec::new(),
        }
    }
    pub(crate) fn from_parts(index: u32, drawings: Vec<Drawing>, text: Vec<Text>) -> Self {
        Self {
            index,
            drawings,
            text,
        }
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
    #[must_use]
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }
    #[must_use]
    pub fn text(&self) -> &[Text] {
        &self.text
    }

    pub fn add_drawing(&mut self, drawing: Drawing) {
        self.drawings.push(drawing);
    }
    #[must_use]
    pub fn drawing(&self, id: Uuid) -> Option<&Drawing> {
        self.drawings.iter().find(|drawing| drawing.id() == id)
    }
    pub fn drawing_mut(&mut self, id: Uuid) -> Option<&mut Drawing> {
        self.drawings.iter_mut().find(|drawing| drawing.id() == id)
    }

    pub fn add_text(&mut self, text: Text) {
        self.text.push(text);
    }
    #[must_use]
    pub fn text_item(&self, id: Uuid) -> Option<&Text> {
        self.text.iter().find(|text| text.id() == id)
    }
    pub fn text_item_mut(&mut self, id: Uuid) -> Option<&mut Text> {
        self.text.iter_mut().find(|text| text.id() == id)
    }
    pub fn remove_text(&mut self, id: Uuid) -> Option<Text> {
        let idx = self.text.iter().position(|text| text.id() == id)?;
        Some(self.text.remove(idx))
    }

    /// Remove every drawing and text item.
    pub fn clear(&mut self) -> CanvasEvent {
        self.drawings.clear();
        self.text.clear();
        CanvasEvent::Cleared { index: self.index }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.drawings.is_empty()
    }
    /// Display name of the tool the next undo would remove.
    #[must_use]
    pub fn next_undo_name(&self) -> Option<&'static str> {
        Some(self.drawings.last()?.tool().display_name())
    }
    /// Pop the newest drawing and re-run occlusion culling, since removing an
    /// eraser can uncover strokes it was hiding. `None` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> Option<CanvasEvent> {
        let drawing = self.drawings.pop()?;
        self.perform_occlusion_culling();
        Some(CanvasEvent::DidUndo {
            index: self.index,
            tool: drawing.tool().display_name(),
        })
    }

    /// Whether this canvas contributes nothing visible: no stroke has any
    /// committed point and no text has a non-empty value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawings.iter().all(Drawing::is_empty)
            && self.text.iter().all(|text| text.value.is_empty())
    }
    #[must_use]
    pub fn has_eraser_drawing(&self) -> bool {
        self.drawings
            .iter()
            .any(|drawing| matches!(drawing.tool(), Tool::Eraser(_)))
    }

    /// Flag drawings that are provably invisible under later eraser strokes.
    ///
    /// Walks newest to oldest accumulating erase rectangles; a drawing whose
    /// padded bounds are *fully contained* by any rectangle erased after it
    /// is culled. Partial overlap never culls, the remnant would still show.
    /// This is rectangle containment on purpose, not polygon coverage, and
    /// downstream behavior depends on exactly this approximation.
    ///
    /// Also drops text items whose value has become empty.
    ///
    /// Must be re-run after undo and after load.
    pub fn perform_occlusion_culling(&mut self) {
        let size = CULL_REFERENCE_SIZE;
        let mut erase_rects: SmallVec<[Rect; 8]> = SmallVec::new();
        for drawing in self.drawings.iter_mut().rev() {
            match drawing.tool() {
                Tool::Eraser(_) => {
                    let Some(rect) = drawing.erase_rect(size) else {
                        continue;
                    };
                    // An eraser hidden under a newer erase is itself culled.
                    drawing.set_culled(false);
                    if erase_rects.iter().any(|erase| erase.contains(rect)) {
                        drawing.set_culled(true);
                    }
                    if !rect.is_empty() {
                        erase_rects.push(rect);
                    }
                }
                Tool::Text(_) => {}
                _ => {
                    let Some(bounds) = drawing.culling_bounds(size) else {
                        continue;
                    };
                    drawing.set_culled(false);
                    if erase_rects.iter().any(|erase| erase.contains(bounds)) {
                        drawing.set_culled(true);
                    }
                }
            }
        }
        self.text.retain(|text| !text.value.is_empty());
    }
}
