//! # Rendering dispatch
//!
//! Translates document state into an ordered list of [`Primitive`]s for an
//! abstract drawing surface. Surfaces stroke with round caps and joins and a
//! miter limit of [`MITER_LIMIT`].
//!
//! This pass never mutates the model. Occlusion culling maintains the flags
//! it reads, and runs separately, not per frame.

use crate::blend::{Blend, BlendMode};
use crate::geom::{Pos, Rect, Size};
use crate::path::Path;
use crate::state::{Canvas, Font, Project};
use crate::stroke::Drawing;
use crate::tool::Tool;
use crate::Color;

pub const MITER_LIMIT: f32 = 2.0;

/// How the highlighter is composited.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum HighlightStyle {
    /// Multiply blending.
    #[default]
    Multiply,
    /// Normal blending at reduced alpha.
    Alpha,
}

/// How erased regions are restored.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Backdrop {
    /// Clear to transparent.
    #[default]
    Transparent,
    /// A background collaborator repaints the region, so erasing over an
    /// image does not punch a hole in it.
    Delegated,
}

/// Path construction fidelity.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Quality {
    /// Quad-curve reduction, cheap enough for every frame of a live gesture.
    #[default]
    Interactive,
    /// Full spline interpolation for export and final output.
    Export,
}

/// Settings used to configure a render pass. Not persisted with the project.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct RenderSettings {
    pub highlight_style: HighlightStyle,
    pub quality: Quality,
    /// When set, each drawing's culling bounds are outlined in this color.
    pub culling_box_color: Option<Color>,
}

/// One draw operation, in paint order.
#[derive(Clone, PartialEq, Debug)]
pub enum Primitive {
    /// Stroke `path` at `width` pixels.
    Stroke {
        path: Path,
        color: Color,
        width: f32,
        blend: Blend,
    },
    /// Clear the region to transparent.
    ClearRect { rect: Rect },
    /// Hand the region to the background collaborator to repaint.
    RedrawBackground { rect: Rect },
    /// Debug outline.
    Outline { rect: Rect, color: Color, width: f32 },
    /// Lay out and draw a text run; shaping is the surface's job.
    Text {
        origin: Pos,
        value: String,
        font: Font,
        /// Font size in pixels.
        font_size: f32,
        color: Color,
    },
}

/// Render one canvas of a project into `rect`. An index with no canvas
/// renders nothing.
#[must_use]
pub fn render(
    project: &Project,
    canvas_index: u32,
    rect: Rect,
    settings: &RenderSettings,
    backdrop: Backdrop,
) -> Vec<Primitive> {
    project
        .find_canvas(canvas_index)
        .map_or_else(Vec::new, |canvas| {
            render_canvas(canvas, rect.size, settings, backdrop)
        })
}

/// Render a canvas at `size`: non-culled drawings in insertion order, then
/// every renderable, non-empty text item.
#[must_use]
pub fn render_canvas(
    canvas: &Canvas,
    size: Size,
    settings: &RenderSettings,
    backdrop: Backdrop,
) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    for drawing in canvas.drawings() {
        if drawing.is_culled() {
            continue;
        }
        render_drawing(drawing, size, settings, backdrop, &mut primitives);
    }
    for text in canvas.text() {
        if !text.is_renderable || text.value.is_empty() {
            continue;
        }
        primitives.push(Primitive::Text {
            origin: text.layout_origin(size),
            value: text.value.clone(),
            font: text.font,
            font_size: text.font_size_px(size),
            color: text.color,
        });
    }
    primitives
}

fn render_drawing(
    drawing: &Drawing,
    size: Size,
    settings: &RenderSettings,
    backdrop: Backdrop,
    primitives: &mut Vec<Primitive>,
) {
    match drawing.tool() {
        Tool::Eraser(_) => {
            let Some(rect) = drawing.erase_rect(size) else {
                return;
            };
            if rect.is_empty() {
                return;
            }
            primitives.push(match backdrop {
                Backdrop::Transparent => Primitive::ClearRect { rect },
                Backdrop::Delegated => Primitive::RedrawBackground { rect },
            });
        }
        // Text items render from the canvas's text list, not as strokes.
        Tool::Text(_) => {}
        tool => {
            let path = match settings.quality {
                Quality::Interactive => drawing.create_path(size),
                Quality::Export => drawing.smoothed_path(size),
            };
            let Some(path) = path else {
                return;
            };
            let width = tool.calculate_line_width(size);
            primitives.push(Primitive::Stroke {
                path,
                color: drawing.color(),
                width,
                blend: blend_for(tool, settings),
            });
            if let Some(color) = settings.culling_box_color {
                if let Some(rect) = drawing.culling_bounds(size) {
                    primitives.push(Primitive::Outline {
                        rect,
                        color,
                        width: 1.0,
                    });
                }
            }
            // Predictive tail: plain segments, no smoothing, pressure scaled
            // by the tool. Latency beats fidelity here.
            for point in drawing.predictive_points() {
                let mut segment = Path::new();
                segment.move_to(point.previous.pos(size));
                segment.line_to(point.location.pos(size));
                primitives.push(Primitive::Stroke {
                    path: segment,
                    color: drawing.color(),
                    width: width * tool.scaled_force(point.force),
                    blend: blend_for(tool, settings),
                });
            }
        }
    }
}

fn blend_for(tool: &Tool, settings: &RenderSettings) -> Blend {
    match (tool, settings.highlight_style) {
        (Tool::Highlighter(_), HighlightStyle::Multiply) => Blend {
            mode: BlendMode::Multiply,
            opacity: 1.0,
        },
        (Tool::Highlighter(_), HighlightStyle::Alpha) => Blend {
            mode: BlendMode::Normal,
            opacity: 0.6,
        },
        _ => Blend::default(),
    }
}
