//! # Editor
//!
//! A headless editing session: one owned [`Project`] plus the bookkeeping to
//! capture gestures into it. The embedding surface feeds pixel-space samples
//! in; everything stored is normalized.
//!
//! In-flight strokes are addressed by [`StrokeHandle`], which resolves to a
//! `(canvas index, drawing id)` pair through the project. Handles are
//! process-local and die with the gesture.

use hashbrown::HashMap;
use uuid::Uuid;

use crate::geom::{Pos, Rect, Size};
use crate::id::LocalID;
use crate::io::{self, SerialError};
use crate::render::{self, Backdrop, Primitive, RenderSettings};
use crate::state::{Canvas, CanvasEvent, Project, ProjectError};
use crate::stroke::{Drawing, Location, Point};
use crate::tool::Tool;
use crate::Color;

/// Namespace marker for stroke handles.
pub enum InFlightStroke {}
pub type StrokeHandle = LocalID<InFlightStroke>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorError {
    /// The handle does not name an in-flight stroke. Either the gesture
    /// already ended or its canvas was cleared out from under it.
    #[error("no in-flight stroke for {0}")]
    UnknownStroke(StrokeHandle),
}

/// One input sample from the embedding surface, in canvas pixel space.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct InputSample {
    pub location: Pos,
    pub previous: Pos,
    /// Raw pressure; 0 means the device reported none.
    pub force: f32,
    pub is_predictive: bool,
}

struct StrokeRef {
    canvas: u32,
    drawing: Uuid,
}

pub struct Editor {
    project: Project,
    strokes: HashMap<StrokeHandle, StrokeRef>,
    /// Last nonzero committed pressure, carried into forceless samples.
    last_force: Option<f32>,
    /// Whether new strokes are created with smoothing enabled.
    pub is_smoothing_enabled: bool,
}

impl Editor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            project: Project::new(),
            strokes: HashMap::new(),
            last_force: None,
            is_smoothing_enabled: true,
        }
    }

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    /// # Errors
    /// The index must not already hold a canvas.
    pub fn add_canvas(&mut self, index: u32) -> Result<(), ProjectError> {
        self.project.add_canvas(Canvas::new(index))
    }
    pub fn set_active_canvas(&mut self, index: u32) {
        self.project.set_active_canvas(index);
    }

    /// Start capturing a gesture on the active canvas. The tool's parameters
    /// are snapshotted into the stroke; editing the live tool afterwards
    /// does not reach strokes already begun.
    pub fn begin_stroke(&mut self, tool: &Tool, color: Color) -> StrokeHandle {
        let drawing = Drawing::new(*tool, color, self.is_smoothing_enabled);
        let id = drawing.id();
        let canvas = self.project.current_canvas();
        let index = canvas.index();
        canvas.add_drawing(drawing);

        let handle = StrokeHandle::next();
        self.strokes.insert(
            handle,
            StrokeRef {
                canvas: index,
                drawing: id,
            },
        );
        handle
    }

    /// Feed one sample into an in-flight stroke.
    ///
    /// Returns the dirty rectangle the surface should redraw, padded by the
    /// stroke width: `None` only for a degenerate gesture. Eraser gestures
    /// dirty the whole surface, their interface spans it.
    ///
    /// # Errors
    /// The handle must name a stroke that is still in flight.
    pub fn append_sample(
        &mut self,
        handle: StrokeHandle,
        sample: InputSample,
        size: Size,
    ) -> Result<Option<Rect>, EditorError> {
        let stroke = self
            .strokes
            .get(&handle)
            .ok_or(EditorError::UnknownStroke(handle))?;

        let mut force = sample.force;
        if force == 0.0 {
            force = self.last_force.unwrap_or(1.0);
        } else if !sample.is_predictive {
            self.last_force = Some(force);
        }

        let drawing = self
            .project
            .drawing_mut(stroke.canvas, stroke.drawing)
            .ok_or(EditorError::UnknownStroke(handle))?;

        // Collect the dirty extent before the new segment lands.
        let mut dirty = Vec::with_capacity(3);
        if let Some(pos) = drawing.last_previous_pos(size) {
            dirty.push(pos);
        }
        dirty.push(sample.previous);
        dirty.push(sample.location);

        drawing.add(Point::new(
            Location::from_pos(sample.location, size),
            Location::from_pos(sample.previous, size),
            force,
            sample.is_predictive,
        ));
        if !sample.is_predictive {
            // Real input supersedes whatever was speculated.
            drawing.prune();
        }

        let tool = *drawing.tool();
        if let Tool::Eraser(_) = tool {
            return Ok(Some(Rect::new(0.0, 0.0, size.width, size.height)));
        }
        Ok(crate::geom::bounding_rect(
            &dirty,
            tool.calculate_line_width(size),
        ))
    }

    /// Finish a gesture: discard its predictive tail and simplify its
    /// committed samples for storage.
    ///
    /// # Errors
    /// The handle must name an in-flight stroke. A stroke whose canvas was
    /// cleared mid-gesture finishes as a no-op.
    pub fn end_stroke(&mut self, handle: StrokeHandle, size: Size) -> Result<(), EditorError> {
        let stroke = self
            .strokes
            .remove(&handle)
            .ok_or(EditorError::UnknownStroke(handle))?;
        if let Some(drawing) = self.project.drawing_mut(stroke.canvas, stroke.drawing) {
            drawing.prune();
            drawing.cull_extraneous(size);
        }
        Ok(())
    }
    /// Abort a gesture. The committed samples stay, matching end-of-gesture
    /// behavior; only the speculation is dropped.
    ///
    /// # Errors
    /// The handle must name an in-flight stroke.
    pub fn cancel_stroke(&mut self, handle: StrokeHandle, size: Size) -> Result<(), EditorError> {
        self.end_stroke(handle, size)
    }

    /// Undo the newest drawing on a canvas. `None` when the canvas does not
    /// exist or has nothing to undo.
    pub fn undo(&mut self, canvas_index: u32) -> Option<CanvasEvent> {
        self.project.find_canvas_mut(canvas_index)?.undo()
    }
    /// Display name of the tool [`Self::undo`] would remove next.
    #[must_use]
    pub fn next_undo_name(&self, canvas_index: u32) -> Option<&'static str> {
        self.project.find_canvas(canvas_index)?.next_undo_name()
    }

    /// Wipe one canvas, materializing it if absent.
    pub fn clear_canvas(&mut self, index: u32) -> CanvasEvent {
        self.project.canvas_at(index).clear()
    }
    /// Wipe every canvas.
    pub fn clear_all(&mut self) -> Vec<CanvasEvent> {
        self.project.clear_all()
    }

    pub fn perform_occlusion_culling(&mut self) {
        self.project.perform_occlusion_culling();
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project.is_empty()
    }

    /// Encode the project.
    ///
    /// # Errors
    /// Forwarded from the serializer.
    pub fn serialize(&self, compress: bool) -> Result<Vec<u8>, SerialError> {
        io::serialize(&self.project, compress)
    }

    /// Replace the project with a decoded document, re-deriving culling
    /// state. In-flight strokes are dropped. On error the current project is
    /// left untouched.
    ///
    /// # Errors
    /// Forwarded from the serializer; decoding is all-or-nothing.
    pub fn load(&mut self, data: &[u8]) -> Result<&Project, SerialError> {
        let mut project = io::deserialize(data)?;
        project.perform_occlusion_culling();
        self.project = project;
        self.strokes.clear();
        self.last_force = None;
        Ok(&self.project)
    }

    /// Render one canvas into `rect`.
    #[must_use]
    pub fn render(
        &self,
        canvas_index: u32,
        rect: Rect,
        settings: &RenderSettings,
        backdrop: Backdrop,
    ) -> Vec<Primitive> {
        render::render(&self.project, canvas_index, rect, settings, backdrop)
    }
}
impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
