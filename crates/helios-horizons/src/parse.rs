//! Horizons response parsing.
//!
//! The upstream answers in one of two shapes, both wrapped in a JSON
//! envelope (`format=json`):
//!
//! 1. **Structured**: `result.vectors` is an array of entries with string
//!    fields `X`, `Y`, `Z`, optionally `VX`, `VY`, `VZ` and
//!    `calendar_date`.
//! 2. **Embedded text**: `result` is a free-form report whose data rows
//!    sit between the `$$SOE` and `$$EOE` sentinels, as
//!    `X = <num>` assignments with Fortran-style exponents.
//!
//! Strategies are tried in order; the first that yields a finite
//! position wins. Embedded-text payloads declaring `Output units:` in
//! kilometers are converted to AU and AU/day here, so callers only ever
//! see canonical units.

use regex::Regex;

use helios_types::{Velocity, KM_PER_AU, SECONDS_PER_DAY};

/// Which upstream shape produced a parsed vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `result.vectors` array.
    Structured,
    /// `$$SOE`/`$$EOE` fenced report text.
    EmbeddedText,
}

impl ResponseShape {
    /// Label used in fetch events.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::EmbeddedText => "embedded-text",
        }
    }
}

/// A state vector extracted from an upstream response, in AU and AU/day.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVector {
    /// Heliocentric X position (AU).
    pub x: f64,
    /// Heliocentric Y position (AU).
    pub y: f64,
    /// Heliocentric Z position (AU).
    pub z: f64,
    /// Velocity (AU/day), when the response carried all three components.
    pub velocity: Option<Velocity>,
    /// Upstream timestamp text, when present.
    pub timestamp: Option<String>,
    /// Which shape matched.
    pub shape: ResponseShape,
}

/// Reasons the parser can reject a response body.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// Neither the structured nor the embedded shape matched.
    #[error("response matches neither vectors array nor $$SOE/$$EOE report")]
    UnrecognizedShape,

    /// The embedded report is missing its sentinel markers.
    #[error("report is missing $$SOE/$$EOE markers")]
    MissingMarkers,

    /// A required position component is absent.
    #[error("missing position component {0}")]
    MissingComponent(&'static str),

    /// A numeric field failed to parse to a finite value.
    #[error("component {0} is not a finite number")]
    NonFinite(&'static str),

    /// The structured shape's vectors array is empty.
    #[error("result.vectors is empty")]
    EmptyVectors,
}

/// Parse an upstream response body into a canonical-unit vector.
///
/// # Errors
///
/// Returns [`ParseError`] when neither shape is recognizable or when a
/// position component cannot be parsed to a finite number.
pub fn parse_vector_response(body: &str) -> Result<ParsedVector, ParseError> {
    let envelope: Option<serde_json::Value> = serde_json::from_str(body).ok();

    if let Some(envelope) = &envelope {
        // Strategy 1: structured vectors array.
        if let Some(vectors) = envelope.pointer("/result/vectors").and_then(|v| v.as_array()) {
            return parse_structured(vectors);
        }

        // Strategy 2: report text embedded in the JSON envelope.
        if let Some(text) = envelope.get("result").and_then(|v| v.as_str()) {
            return parse_embedded(text);
        }
    }

    // Last resort: some deployments return the report without the JSON
    // envelope. Scan the raw body if it carries the sentinels.
    if body.contains("$$SOE") {
        return parse_embedded(body);
    }

    Err(ParseError::UnrecognizedShape)
}

// ---------------------------------------------------------------------------
// Structured shape
// ---------------------------------------------------------------------------

fn parse_structured(vectors: &[serde_json::Value]) -> Result<ParsedVector, ParseError> {
    let entry = vectors.first().ok_or(ParseError::EmptyVectors)?;

    let x = required_field(entry, "X")?;
    let y = required_field(entry, "Y")?;
    let z = required_field(entry, "Z")?;
    let velocity = velocity_from(
        optional_field(entry, "VX")?,
        optional_field(entry, "VY")?,
        optional_field(entry, "VZ")?,
    );
    let timestamp = entry
        .get("calendar_date")
        .and_then(|v| v.as_str())
        .map(ToOwned::to_owned);

    Ok(ParsedVector { x, y, z, velocity, timestamp, shape: ResponseShape::Structured })
}

/// Read a numeric field that may be encoded as a JSON string or number.
fn numeric_field(entry: &serde_json::Value, name: &'static str) -> Option<Result<f64, ParseError>> {
    let value = entry.get(name)?;
    let parsed = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    };
    Some(match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::NonFinite(name)),
    })
}

fn required_field(entry: &serde_json::Value, name: &'static str) -> Result<f64, ParseError> {
    numeric_field(entry, name).ok_or(ParseError::MissingComponent(name))?
}

fn optional_field(
    entry: &serde_json::Value,
    name: &'static str,
) -> Result<Option<f64>, ParseError> {
    numeric_field(entry, name).transpose()
}

// ---------------------------------------------------------------------------
// Embedded-text shape
// ---------------------------------------------------------------------------

/// Tolerant numeric pattern: signed mantissa, optional `E`/`D` exponent.
const NUM: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eEdD][-+]?\d+)?";

fn parse_embedded(text: &str) -> Result<ParsedVector, ParseError> {
    let start = text.find("$$SOE").ok_or(ParseError::MissingMarkers)?;
    let rest = &text[start + "$$SOE".len()..];
    let end = rest.find("$$EOE").ok_or(ParseError::MissingMarkers)?;
    let region = &rest[..end];

    let km_units = declared_km_units(text);

    let x = scan_component(region, "X").ok_or(ParseError::MissingComponent("X"))??;
    let y = scan_component(region, "Y").ok_or(ParseError::MissingComponent("Y"))??;
    let z = scan_component(region, "Z").ok_or(ParseError::MissingComponent("Z"))??;
    let vx = scan_component(region, "VX").transpose()?;
    let vy = scan_component(region, "VY").transpose()?;
    let vz = scan_component(region, "VZ").transpose()?;

    let (scale_pos, scale_vel) = if km_units {
        (1.0 / KM_PER_AU, SECONDS_PER_DAY / KM_PER_AU)
    } else {
        (1.0, 1.0)
    };

    let velocity = velocity_from(
        vx.map(|v| v * scale_vel),
        vy.map(|v| v * scale_vel),
        vz.map(|v| v * scale_vel),
    );

    Ok(ParsedVector {
        x: x * scale_pos,
        y: y * scale_pos,
        z: z * scale_pos,
        velocity,
        timestamp: scan_timestamp(region),
        shape: ResponseShape::EmbeddedText,
    })
}

/// Extract the first `NAME = <num>` assignment in the fenced region.
///
/// `\b` keeps a bare `X` from matching inside `VX`.
fn scan_component(region: &str, name: &'static str) -> Option<Result<f64, ParseError>> {
    let pattern = format!(r"\b{name}\s*=\s*({NUM})");
    let re = Regex::new(&pattern).ok()?;
    let capture = re.captures(region)?;
    let raw = capture.get(1)?.as_str().replace(['d', 'D'], "E");
    Some(match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::NonFinite(name)),
    })
}

/// Whether the surrounding report declares kilometer output units.
fn declared_km_units(text: &str) -> bool {
    Regex::new(r"(?i)Output units\s*:\s*([^\r\n]+)")
        .ok()
        .and_then(|re| re.captures(text))
        .and_then(|c| c.get(1).map(|m| m.as_str().to_ascii_uppercase()))
        .is_some_and(|units| units.contains("KM"))
}

/// Pull the calendar date off the first data row, e.g.
/// `2461255.5 = A.D. 2026-Aug-02 00:00:00.0000 TDB`.
fn scan_timestamp(region: &str) -> Option<String> {
    let re = Regex::new(r"=\s*(A\.D\.\s+[^\r\n]+?)\s*(?:\r?\n|$)").ok()?;
    re.captures(region)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Assemble a velocity only when all three components are present.
fn velocity_from(vx: Option<f64>, vy: Option<f64>, vz: Option<f64>) -> Option<Velocity> {
    match (vx, vy, vz) {
        (Some(vx), Some(vy), Some(vz)) => Some(Velocity { vx, vy, vz }),
        _ => None,
    }
}
