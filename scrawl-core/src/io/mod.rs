//! # Serialization
//!
//! The document wire format: a JSON object tree with `_type` tags, wrapped
//! in the compression container of [`compress`] when requested. Decoding is
//! all-or-nothing; a malformed document never partially replaces state.
//!
//! Versioning is a closed allow-list, accept-or-reject with no migrations.
//! A missing version field means "current"; anything not in
//! [`SUPPORTED_VERSIONS`] is an error.

pub mod compress;
mod schema;

pub(crate) use schema::Serial;

use crate::state::Project;

pub type Version = u32;
pub const CURRENT_VERSION: Version = 1;
pub const SUPPORTED_VERSIONS: &[Version] = &[CURRENT_VERSION];

#[derive(thiserror::Error, Debug)]
pub enum SerialError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Compress(#[from] compress::CompressError),
    #[error("{entity} is not a JSON object")]
    NotAnObject { entity: &'static str },
    #[error("missing {field} for {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("invalid {field} for {entity}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("invalid version number for {entity}")]
    InvalidVersion { entity: &'static str },
    #[error("unsupported version {version} for {entity}")]
    UnsupportedVersion { entity: &'static str, version: i64 },
    #[error("{0:?} is not a valid UUID")]
    InvalidUuid(String),
    #[error("unsupported tool type {0:?}")]
    UnknownTool(String),
    #[error(transparent)]
    Tool(#[from] crate::tool::ToolError),
    #[error(transparent)]
    Project(#[from] crate::state::ProjectError),
}

/// Encode a project, optionally wrapped in the compression container.
///
/// # Errors
/// JSON encoding failures only; encoding an in-memory project cannot
/// otherwise fail.
pub fn serialize(project: &Project, compress_output: bool) -> Result<Vec<u8>, SerialError> {
    let data = serde_json::to_vec(&project.serialize())?;
    if compress_output {
        Ok(compress::zip(&data))
    } else {
        Ok(data)
    }
}

/// Decode a project from raw bytes, transparently unwrapping the compression
/// container when its header is present.
///
/// Checksum validation is skipped here on purpose: documents written before
/// trailer checksums were computed correctly must still load. Callers that
/// want strict validation can [`compress::unzip`] themselves first.
///
/// # Errors
/// Any container, JSON, or schema violation. The returned error describes
/// the first offending field.
pub fn deserialize(data: &[u8]) -> Result<Project, SerialError> {
    let raw;
    let data = if compress::is_zip(data) {
        log::debug!("document is compressed, inflating without checksum validation");
        raw = compress::unzip(data, true)?;
        raw.as_slice()
    } else {
        data
    };
    let value: serde_json::Value = serde_json::from_slice(data)?;
    Project::deserialize(&value)
}

// Decode helpers shared by the schema impls. The tolerant accessors mirror
// the format's compatibility rules: absent or mistyped optional fields take
// their documented default, while required fields error loudly.

pub(crate) fn as_object<'v>(
    value: &'v serde_json::Value,
    entity: &'static str,
) -> Result<&'v serde_json::Map<String, serde_json::Value>, SerialError> {
    value.as_object().ok_or(SerialError::NotAnObject { entity })
}

pub(crate) fn require<'v>(
    object: &'v serde_json::Map<String, serde_json::Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<&'v serde_json::Value, SerialError> {
    object
        .get(field)
        .ok_or(SerialError::MissingField { entity, field })
}

/// A required finite number field.
pub(crate) fn require_f32(
    object: &serde_json::Map<String, serde_json::Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<f32, SerialError> {
    object
        .get(field)
        .and_then(serde_json::Value::as_f64)
        .map(|v| v as f32)
        .ok_or(SerialError::MissingField { entity, field })
}

pub(crate) fn f32_or(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &str,
    default: f32,
) -> f32 {
    object
        .get(field)
        .and_then(serde_json::Value::as_f64)
        .map_or(default, |v| v as f32)
}

pub(crate) fn bool_or(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &str,
    default: bool,
) -> bool {
    object
        .get(field)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(default)
}

pub(crate) fn str_or<'v>(
    object: &'v serde_json::Map<String, serde_json::Value>,
    field: &str,
    default: &'v str,
) -> &'v str {
    object
        .get(field)
        .and_then(serde_json::Value::as_str)
        .unwrap_or(default)
}

/// Check an entity's `version` field against the supported set. Absent means
/// current; present and unrecognized is a hard error.
pub(crate) fn validate_version(
    object: &serde_json::Map<String, serde_json::Value>,
    entity: &'static str,
) -> Result<Version, SerialError> {
    let Some(value) = object.get("version") else {
        return Ok(CURRENT_VERSION);
    };
    let number = value
        .as_i64()
        .ok_or(SerialError::InvalidVersion { entity })?;
    let version = Version::try_from(number)
        .ok()
        .filter(|version| SUPPORTED_VERSIONS.contains(version));
    version.ok_or(SerialError::UnsupportedVersion {
        entity,
        version: number,
    })
}

pub(crate) fn decode_uuid(
    object: &serde_json::Map<String, serde_json::Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<uuid::Uuid, SerialError> {
    let string = require(object, entity, field)?
        .as_str()
        .ok_or(SerialError::MissingField { entity, field })?;
    string
        .parse()
        .map_err(|_| SerialError::InvalidUuid(string.to_owned()))
}
