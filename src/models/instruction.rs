use serde::{Deserialize, Serialize};
use std::str::FromStr;

use swap_engine::{Color, InstructionError, ParseColorError, SwapInstruction, ToleranceSpec};

/// A color as it appears in a request: `"#ff0000"` or `[255, 0, 0]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColorValue {
    Hex(String),
    Components(Vec<i64>),
}

impl ColorValue {
    pub fn to_color(&self) -> Result<Color, ParseColorError> {
        match self {
            ColorValue::Hex(s) => s.parse(),
            ColorValue::Components(c) => Color::from_components(c),
        }
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        ColorValue::Hex(color.to_hex())
    }
}

/// One swap instruction as received from a JSON payload.
///
/// Nothing is checked at deserialization time beyond JSON types;
/// [`validate`](Self::validate) turns it into a [`SwapInstruction`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InstructionPayload {
    pub source: ColorValue,
    pub target: ColorValue,

    /// Percent of the maximum color distance
    #[serde(default)]
    pub tolerance: f64,

    /// Feather radius in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feather: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl InstructionPayload {
    /// Exact swap from `source` to `target`.
    pub fn new(source: impl Into<ColorValue>, target: impl Into<ColorValue>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            tolerance: 0.0,
            feather: None,
            opacity: None,
        }
    }

    pub fn tolerance(mut self, percent: f64) -> Self {
        self.tolerance = percent;
        self
    }

    pub fn feather(mut self, radius: i64) -> Self {
        self.feather = Some(radius);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Check every field and build the engine instruction.
    pub fn validate(&self) -> Result<SwapInstruction, InstructionError> {
        let source = self.source.to_color()?;
        let target = self.target.to_color()?;
        let tolerance = ToleranceSpec::new(self.tolerance as f32, self.feather.unwrap_or(0))?;
        let instruction = SwapInstruction::new(source, target, tolerance);
        match self.opacity {
            Some(opacity) => instruction.with_opacity(opacity as f32),
            None => Ok(instruction),
        }
    }
}

/// Parse a JSON array of instructions.
pub fn parse_instructions(json: &str) -> Result<Vec<InstructionPayload>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Compact command-line form: `SOURCE:TARGET[:TOLERANCE[:FEATHER[:OPACITY]]]`.
///
/// ```
/// use paintswap::models::InstructionPayload;
///
/// let payload: InstructionPayload = "#ff0000:#0000ff:10:2".parse().unwrap();
/// assert_eq!(payload.tolerance, 10.0);
/// assert_eq!(payload.feather, Some(2));
/// ```
impl FromStr for InstructionPayload {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 5 {
            return Err(format!(
                "expected SOURCE:TARGET[:TOLERANCE[:FEATHER[:OPACITY]]], got {s:?}"
            ));
        }

        let mut payload = InstructionPayload::new(
            ColorValue::Hex(parts[0].to_string()),
            ColorValue::Hex(parts[1].to_string()),
        );
        if let Some(t) = parts.get(2) {
            payload.tolerance = t
                .parse()
                .map_err(|e| format!("invalid tolerance {t:?}: {e}"))?;
        }
        if let Some(f) = parts.get(3) {
            payload.feather = Some(
                f.parse()
                    .map_err(|e| format!("invalid feather radius {f:?}: {e}"))?,
            );
        }
        if let Some(o) = parts.get(4) {
            payload.opacity = Some(o.parse().map_err(|e| format!("invalid opacity {o:?}: {e}"))?);
        }
        Ok(payload)
    }
}
