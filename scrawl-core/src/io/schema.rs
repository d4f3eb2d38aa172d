//! # Document schema
//!
//! JSON encode/decode for every persisted entity. Encoding is infallible;
//! decoding applies the format's compatibility rules per field: required
//! fields error with the offending entity and field named, optional fields
//! take documented defaults, version fields go through the closed allow-list.

use serde_json::{json, Value};

use crate::io::{
    self, as_object, bool_or, decode_uuid, f32_or, require, require_f32, str_or, validate_version,
    SerialError,
};
use crate::smoothing::{Strategy, DEFAULT_GRANULARITY};
use crate::state::{Canvas, Font, Header, Project, Text};
use crate::stroke::{Drawing, Location, Point};
use crate::tool::Tool;
use crate::{color, Color};

/// An entity of the document tree.
pub(crate) trait Serial: Sized {
    fn serialize(&self) -> Value;
    fn deserialize(value: &Value) -> Result<Self, SerialError>;
}

impl Serial for Location {
    fn serialize(&self) -> Value {
        json!({
            "xOffset": self.x_offset,
            "yOffset": self.y_offset,
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "location")?;
        Ok(Self::new(
            require_f32(object, "location", "xOffset")?,
            require_f32(object, "location", "yOffset")?,
        ))
    }
}

impl Serial for Point {
    fn serialize(&self) -> Value {
        json!({
            "previous": self.previous.serialize(),
            "location": self.location.serialize(),
            "force": self.force,
            "isPredictive": self.is_predictive,
            "_type": "point",
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "point")?;
        Ok(Self::new(
            Location::deserialize(require(object, "point", "location")?)?,
            Location::deserialize(require(object, "point", "previous")?)?,
            f32_or(object, "force", 1.0),
            bool_or(object, "isPredictive", false),
        ))
    }
}

impl Serial for Color {
    fn serialize(&self) -> Value {
        json!({
            "name": self.name.map_or("", <&'static str>::from),
            "red": self.red,
            "green": self.green,
            "blue": self.blue,
            "alpha": self.alpha,
        })
    }
    /// Tolerant on purpose: a color never fails to decode. A recognized name
    /// wins outright, otherwise channels fall back to opaque black.
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let Some(object) = value.as_object() else {
            return Ok(Self::default());
        };
        let name = str_or(object, "name", "");
        if let Ok(name) = name.parse::<color::Name>() {
            return Ok(name.color());
        }
        Ok(Self::new(
            f32_or(object, "red", 0.0),
            f32_or(object, "green", 0.0),
            f32_or(object, "blue", 0.0),
            f32_or(object, "alpha", 1.0),
        ))
    }
}

impl Serial for Strategy {
    fn serialize(&self) -> Value {
        let Self::CatmullRom { granularity } = self;
        json!({
            "name": self.name(),
            "parameters": { "granularity": granularity },
        })
    }
    /// Never fails: an unrecognized or malformed smoothing entry falls back
    /// to the default algorithm rather than blocking the load.
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let Some(object) = value.as_object() else {
            return Ok(Self::default());
        };
        let Some(name) = object.get("name").and_then(Value::as_str) else {
            return Ok(Self::default());
        };
        match name {
            "catmull-rom" => {
                let granularity = object
                    .get("parameters")
                    .and_then(Value::as_object)
                    .and_then(|parameters| parameters.get("granularity"))
                    .and_then(Value::as_u64)
                    .map_or(DEFAULT_GRANULARITY, |granularity| granularity as u32);
                Ok(Self::CatmullRom { granularity })
            }
            unknown => {
                log::warn!("unknown smoothing algorithm {unknown:?}, using default");
                Ok(Self::default())
            }
        }
    }
}

impl Serial for Tool {
    fn serialize(&self) -> Value {
        json!({
            "name": self.name(),
            "version": io::CURRENT_VERSION,
            "lineWidth": self.params().line_width(),
            "forceSensitivity": self.params().force_sensitivity(),
            "_type": "tool",
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "tool")?;
        let name = require(object, "tool", "name")?
            .as_str()
            .ok_or(SerialError::MissingField {
                entity: "tool",
                field: "name",
            })?;
        // Tool identity changes behavior too much to guess at; unlike
        // smoothing there is no fallback.
        let mut tool =
            Self::from_name(name).ok_or_else(|| SerialError::UnknownTool(name.to_owned()))?;
        validate_version(object, "tool")?;
        tool.set_line_width(f32_or(object, "lineWidth", 1.0));
        tool.set_force_sensitivity(f32_or(object, "forceSensitivity", 1.0))?;
        Ok(tool)
    }
}

impl Serial for Drawing {
    fn serialize(&self) -> Value {
        // Predictive samples are speculation, never part of the document.
        let points: Vec<Value> = self.points().iter().map(Serial::serialize).collect();
        json!({
            "drawingID": self.id().to_string(),
            "version": io::CURRENT_VERSION,
            "tool": self.tool().serialize(),
            "points": points,
            "isCulled": self.is_culled(),
            "color": self.color().serialize(),
            "isSmoothingEnabled": self.is_smoothing_enabled(),
            "_type": "drawing",
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "drawing")?;
        validate_version(object, "drawing")?;
        let id = decode_uuid(object, "drawing", "drawingID")?;
        let tool = Tool::deserialize(require(object, "drawing", "tool")?)?;
        let points = require(object, "drawing", "points")?
            .as_array()
            .ok_or(SerialError::InvalidField {
                entity: "drawing",
                field: "points",
            })?
            .iter()
            .map(Point::deserialize)
            .collect::<Result<Vec<_>, _>>()?;
        let color = match object.get("color") {
            Some(value) => Color::deserialize(value)?,
            None => Color::default(),
        };
        // Earlier format revisions pinned the smoothing algorithm per
        // drawing; honor it when present.
        let smoothing = match object.get("smoothing") {
            Some(value) => Strategy::deserialize(value)?,
            None => Strategy::default(),
        };
        Ok(Self::from_parts(
            id,
            tool,
            color,
            points,
            smoothing,
            bool_or(object, "isSmoothingEnabled", true),
            bool_or(object, "isCulled", false),
        ))
    }
}

impl Serial for Text {
    fn serialize(&self) -> Value {
        json!({
            "version": io::CURRENT_VERSION,
            "textID": self.id().to_string(),
            "location": self.location.serialize(),
            "color": self.color.serialize(),
            "value": self.value,
            "fontName": self.font.as_ref(),
            "fontSize": self.font_size,
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "text")?;
        validate_version(object, "text")?;
        let id = decode_uuid(object, "text", "textID")?;
        let location = Location::deserialize(require(object, "text", "location")?)?;
        let color = match object.get("color") {
            Some(value) => Color::deserialize(value)?,
            None => Color::default(),
        };
        // Unknown fonts render as the default family rather than failing.
        let font = str_or(object, "fontName", Font::Arial.as_ref())
            .parse()
            .unwrap_or_default();
        Ok(Self::from_parts(
            id,
            str_or(object, "value", "").to_owned(),
            color,
            location,
            font,
            f32_or(object, "fontSize", crate::state::text::DEFAULT_FONT_SIZE),
        ))
    }
}

impl Serial for Canvas {
    fn serialize(&self) -> Value {
        let drawings: Vec<Value> = self.drawings().iter().map(Serial::serialize).collect();
        let text: Vec<Value> = self.text().iter().map(Serial::serialize).collect();
        json!({
            "index": self.index(),
            "drawings": drawings,
            "text": text,
            "_type": "canvas",
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "canvas")?;
        let index = require(object, "canvas", "index")?
            .as_u64()
            .and_then(|index| u32::try_from(index).ok())
            .ok_or(SerialError::InvalidField {
                entity: "canvas",
                field: "index",
            })?;
        let drawings = require(object, "canvas", "drawings")?
            .as_array()
            .ok_or(SerialError::InvalidField {
                entity: "canvas",
                field: "drawings",
            })?
            .iter()
            .map(Drawing::deserialize)
            .collect::<Result<Vec<_>, _>>()?;
        // Documents predating text annotations have no "text" array.
        let text = match object.get("text") {
            Some(value) => value
                .as_array()
                .ok_or(SerialError::InvalidField {
                    entity: "canvas",
                    field: "text",
                })?
                .iter()
                .map(Text::deserialize)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(Self::from_parts(index, drawings, text))
    }
}

impl Serial for Header {
    fn serialize(&self) -> Value {
        json!({
            "version": self.version(),
            "projectID": self.id().to_string(),
            "_type": "header",
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "header")?;
        validate_version(object, "header")?;
        Ok(Self::from_parts(decode_uuid(object, "header", "projectID")?))
    }
}

impl Serial for Project {
    fn serialize(&self) -> Value {
        let mut canvases: Vec<&Canvas> = self.canvases().iter().collect();
        canvases.sort_by_key(|canvas| canvas.index());
        let canvases: Vec<Value> = canvases.into_iter().map(|c| c.serialize()).collect();
        json!({
            "header": self.header().serialize(),
            "canvases": canvases,
            "_type": "project",
        })
    }
    fn deserialize(value: &Value) -> Result<Self, SerialError> {
        let object = as_object(value, "project")?;
        let header = Header::deserialize(require(object, "project", "header")?)?;
        let canvases = require(object, "project", "canvases")?
            .as_array()
            .ok_or(SerialError::InvalidField {
                entity: "project",
                field: "canvases",
            })?;
        let mut project = Self::from_parts(header, Vec::new());
        for canvas in canvases {
            project.add_canvas(Canvas::deserialize(canvas)?)?;
        }
        Ok(project)
    }
}

#[cfg(test)]
mod test {
    use super::Serial;
    use crate::io::{self, SerialError};
    use crate::smoothing::Strategy;
    use crate::state::{Canvas, Font, Project, Text};
    use crate::stroke::{Drawing, Location, Point};
    use crate::tool::Tool;
    use crate::color::{Color, Name};
    use crate::geom::Size;

    const FIXTURE: &str = include_str!("../../test-data/project-v1.json");

    fn sample_point(x: f32, y: f32, px: f32, py: f32) -> Point {
        Point::new(Location::new(x, y), Location::new(px, py), 1.0, false)
    }

    fn sample_project() -> Project {
        let mut project = Project::new();
        let canvas = project.canvas_at(0);

        let mut pen = Drawing::new(Tool::pen(), Name::Red.color(), true);
        pen.add(sample_point(0.0, 0.0, 0.0, 0.0));
        pen.add(sample_point(0.5, 0.5, 0.0, 0.0));
        canvas.add_drawing(pen);

        let mut eraser = Drawing::new(Tool::eraser(), Color::default(), false);
        for i in 0..50 {
            let offset = i as f32 / 100.0;
            eraser.add(sample_point(offset, offset, offset, offset));
        }
        eraser.cull_extraneous(Size::new(1000.0, 1000.0));
        canvas.add_drawing(eraser);

        canvas.add_text(Text::new(
            "annotated".into(),
            Name::Blue.color(),
            Location::new(0.25, 0.75),
            Font::TimesNewRoman,
            0.03,
        ));
        project.canvas_at(2);
        project.perform_occlusion_culling();
        project
    }

    #[test]
    fn project_round_trip() {
        let project = sample_project();
        let data = io::serialize(&project, false).unwrap();
        let loaded = io::deserialize(&data).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn project_round_trip_compressed() {
        let project = sample_project();
        let data = io::serialize(&project, true).unwrap();
        assert!(io::compress::is_zip(&data));
        assert!(!io::compress::is_zip(&io::serialize(&project, false).unwrap()));
        let loaded = io::deserialize(&data).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn endpoint_normalization() {
        // A two-point stroke to (100, 100) on a 200x200 surface stores the
        // endpoint at exactly (0.5, 0.5).
        let size = Size::new(200.0, 200.0);
        let mut drawing = Drawing::new(Tool::pen(), Color::default(), true);
        drawing.add(Point::new(
            Location::from_pos(crate::geom::Pos::new(0.0, 0.0), size),
            Location::from_pos(crate::geom::Pos::new(0.0, 0.0), size),
            1.0,
            false,
        ));
        drawing.add(Point::new(
            Location::from_pos(crate::geom::Pos::new(100.0, 100.0), size),
            Location::from_pos(crate::geom::Pos::new(0.0, 0.0), size),
            1.0,
            false,
        ));
        let value = drawing.serialize();
        let endpoint = &value["points"][1]["location"];
        assert_eq!(endpoint["xOffset"], 0.5);
        assert_eq!(endpoint["yOffset"], 0.5);
    }

    #[test]
    fn eraser_serializes_two_points() {
        let project = sample_project();
        let value = project.serialize();
        let eraser = &value["canvases"][0]["drawings"][1];
        assert_eq!(eraser["tool"]["name"], "eraser");
        assert_eq!(eraser["points"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn unsupported_drawing_version() {
        let mut value = sample_project().canvases()[0].drawings()[0].serialize();
        value["version"] = serde_json::json!(999);
        assert!(matches!(
            Drawing::deserialize(&value),
            Err(SerialError::UnsupportedVersion { version: 999, .. })
        ));
        // Absent version decodes as current.
        value.as_object_mut().unwrap().remove("version");
        assert!(Drawing::deserialize(&value).is_ok());
    }

    #[test]
    fn unknown_tool_is_fatal() {
        let mut value = sample_project().canvases()[0].drawings()[0].serialize();
        value["tool"]["name"] = serde_json::json!("crayon");
        assert!(matches!(
            Drawing::deserialize(&value),
            Err(SerialError::UnknownTool(name)) if name == "crayon"
        ));
    }

    #[test]
    fn unknown_smoothing_is_tolerated() {
        let mut value = sample_project().canvases()[0].drawings()[0].serialize();
        value.as_object_mut().unwrap().insert(
            "smoothing".into(),
            serde_json::json!({"name": "bezier-magic", "parameters": {}}),
        );
        let drawing = Drawing::deserialize(&value).unwrap();
        assert_eq!(drawing.smoothing(), Strategy::default());
    }

    #[test]
    fn malformed_location_is_fatal() {
        let value = serde_json::json!({
            "location": {"xOffset": 0.5},
            "previous": {"xOffset": 0.5, "yOffset": 0.5},
        });
        assert!(matches!(
            Point::deserialize(&value),
            Err(SerialError::MissingField {
                entity: "location",
                field: "yOffset",
            })
        ));
    }

    #[test]
    fn invalid_uuid_is_fatal() {
        let mut value = sample_project().serialize();
        value["header"]["projectID"] = serde_json::json!("not-a-uuid");
        assert!(matches!(
            Project::deserialize(&value),
            Err(SerialError::InvalidUuid(_))
        ));
    }

    #[test]
    fn duplicate_canvas_index_is_fatal() {
        let mut value = sample_project().serialize();
        let duplicate = value["canvases"][0].clone();
        value["canvases"].as_array_mut().unwrap().push(duplicate);
        assert!(matches!(
            Project::deserialize(&value),
            Err(SerialError::Project(_))
        ));
    }

    #[test]
    fn color_decode_rules() {
        // A recognized name wins over channel values.
        let named = serde_json::json!({"name": "red", "red": 0.0, "green": 255.0, "blue": 0.0, "alpha": 1.0});
        assert_eq!(Color::deserialize(&named).unwrap(), Name::Red.color());
        // Empty name falls back to channels, recovering the canonical name.
        let channels =
            serde_json::json!({"name": "", "red": 0.0, "green": 0.0, "blue": 255.0, "alpha": 1.0});
        assert_eq!(Color::deserialize(&channels).unwrap().name, Some(Name::Blue));
        // Nothing at all is opaque black.
        assert_eq!(
            Color::deserialize(&serde_json::json!({})).unwrap(),
            Color::default()
        );
    }

    #[test]
    fn fixture_decodes() {
        let project = io::deserialize(FIXTURE.as_bytes()).unwrap();
        assert_eq!(project.canvases().len(), 2);

        let canvas = project.find_canvas(0).unwrap();
        assert_eq!(canvas.drawings().len(), 1);
        let drawing = &canvas.drawings()[0];
        assert_eq!(drawing.tool().name(), "pen");
        assert_eq!(drawing.color().name, Some(Name::Red));
        assert_eq!(drawing.points().len(), 2);
        assert_eq!(drawing.points()[1].force, 0.8);
        assert_eq!(drawing.smoothing(), Strategy::CatmullRom { granularity: 12 });

        assert_eq!(canvas.text().len(), 1);
        let text = &canvas.text()[0];
        assert_eq!(text.value, "reviewed");
        assert_eq!(text.font, Font::TimesNewRoman);

        // The second canvas predates text annotations.
        let legacy = project.find_canvas(1).unwrap();
        assert!(legacy.text().is_empty());
    }
}
