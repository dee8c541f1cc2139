//! SWC sample records.
//!
//! Each non-comment line of an SWC file is one sample:
//!
//! ```text
//! id  type  x  y  z  radius  parent
//! ```
//!
//! `parent` is `-1` for roots. Fields are separated by any whitespace and
//! anything after the seventh field is ignored.

use crate::{Error, Result};
use swcvox_core::SwcType;

/// Number of mandatory fields per sample.
const FIELD_COUNT: usize = 7;

/// One parsed SWC sample.
#[derive(Clone, Debug, PartialEq)]
pub struct SwcRecord {
    pub id: i64,
    pub swc_type: SwcType,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
    /// Parent sample id, `None` for roots.
    pub parent: Option<i64>,
    /// 1-based line number in the source.
    pub line: usize,
}

/// Classification of a single source line.
#[derive(Clone, Debug, PartialEq)]
pub enum SwcLine<'a> {
    Blank,
    Comment(&'a str),
    Sample(SwcRecord),
}

impl SwcRecord {
    /// Parses one line of SWC text.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] when a sample line has too few fields,
    /// a non-numeric field, or a negative structure type.
    pub fn parse_line(text: &str, line: usize) -> Result<SwcLine<'_>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(SwcLine::Blank);
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            return Ok(SwcLine::Comment(comment.trim()));
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < FIELD_COUNT {
            return Err(Error::Malformed {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    FIELD_COUNT,
                    fields.len()
                ),
            });
        }

        let id = parse_int(fields[0], "id", line)?;
        let code = parse_int(fields[1], "type", line)?;
        let swc_type = SwcType::from_code(code).ok_or_else(|| Error::Malformed {
            line,
            reason: format!("invalid structure type {code}"),
        })?;
        let x = parse_float(fields[2], "x", line)?;
        let y = parse_float(fields[3], "y", line)?;
        let z = parse_float(fields[4], "z", line)?;
        let radius = parse_float(fields[5], "radius", line)?;
        let parent = parse_int(fields[6], "parent", line)?;

        Ok(SwcLine::Sample(Self {
            id,
            swc_type,
            x,
            y,
            z,
            radius,
            parent: (parent >= 0).then_some(parent),
            line,
        }))
    }

    /// Returns true if the sample has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// Some exporters write integer columns as floats ("1.0").
#[allow(clippy::cast_possible_truncation)]
fn parse_int(field: &str, name: &str, line: usize) -> Result<i64> {
    if let Ok(value) = field.parse::<i64>() {
        return Ok(value);
    }
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(Error::Malformed {
            line,
            reason: format!("{name} is not an integer: '{field}'"),
        }),
    }
}

fn parse_float(field: &str, name: &str, line: usize) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::Malformed {
            line,
            reason: format!("{name} is not a number: '{field}'"),
        }),
    }
}
