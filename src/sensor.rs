//! Sensor input panel
//!
//! Twenty independent sliders, each over [0, 1] with a 0.01 step and a 0.5
//! default. The panel owns the current slider positions and hands out a
//! [`SensorVector`] in index order whenever a prediction is requested.

use serde::{Deserialize, Serialize};

use crate::utils::error::{IrrigationError, Result, ResultExt};
use crate::{SENSOR_COUNT, SENSOR_DEFAULT, SENSOR_MAX, SENSOR_MIN, SENSOR_STEP};

/// Ordered, fixed-length vector of scaled sensor readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct SensorVector {
    values: [f64; SENSOR_COUNT],
}

impl SensorVector {
    /// Build a vector from raw readings.
    ///
    /// Rejects anything that is not exactly [`SENSOR_COUNT`] finite values in
    /// `[SENSOR_MIN, SENSOR_MAX]`.
    pub fn new(values: &[f64]) -> Result<Self> {
        if values.len() != SENSOR_COUNT {
            return Err(IrrigationError::InvalidInput(format!(
                "expected {} sensor values, got {}",
                SENSOR_COUNT,
                values.len()
            )));
        }

        let mut out = [SENSOR_DEFAULT; SENSOR_COUNT];
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() || !(SENSOR_MIN..=SENSOR_MAX).contains(&v) {
                return Err(IrrigationError::InvalidInput(format!(
                    "sensor {} = {} is outside [{}, {}]",
                    i, v, SENSOR_MIN, SENSOR_MAX
                )));
            }
            out[i] = v;
        }

        Ok(Self { values: out })
    }

    /// Vector with every reading set to `value` (clamped into range)
    pub fn splat(value: f64) -> Self {
        Self {
            values: [value.clamp(SENSOR_MIN, SENSOR_MAX); SENSOR_COUNT],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for SensorVector {
    fn default() -> Self {
        Self::splat(SENSOR_DEFAULT)
    }
}

impl TryFrom<Vec<f64>> for SensorVector {
    type Error = IrrigationError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(&values)
    }
}

impl From<SensorVector> for Vec<f64> {
    fn from(v: SensorVector) -> Self {
        v.values.to_vec()
    }
}

/// A single labelled slider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorControl {
    pub index: usize,
    pub label: String,
    /// Form field name, `s{index}`
    pub key: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl SensorControl {
    fn new(index: usize) -> Self {
        Self {
            index,
            label: format!("Sensor {}", index),
            key: format!("s{}", index),
            min: SENSOR_MIN,
            max: SENSOR_MAX,
            step: SENSOR_STEP,
            value: SENSOR_DEFAULT,
        }
    }

    /// Move the slider, clamping into range and snapping to the step grid
    fn set(&mut self, value: f64) {
        let clamped = value.clamp(self.min, self.max);
        // Divide by the integral step count: multiplying by 0.01 is not exact.
        let steps = (1.0 / self.step).round();
        let snapped = (clamped * steps).round() / steps;
        self.value = snapped.clamp(self.min, self.max);
    }
}

/// The full bank of sensor sliders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorPanel {
    controls: Vec<SensorControl>,
}

impl SensorPanel {
    /// Create a panel with every slider at its default
    pub fn new() -> Self {
        Self {
            controls: (0..SENSOR_COUNT).map(SensorControl::new).collect(),
        }
    }

    /// Set slider `index` to `value`.
    ///
    /// The slider constrains the domain, so out-of-range values are clamped
    /// rather than rejected. Only an unknown index or a non-finite value fails.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(IrrigationError::InvalidInput(format!(
                "sensor {} value must be finite",
                index
            )));
        }

        let control = self
            .controls
            .get_mut(index)
            .with_context(|| format!("no sensor with index {}", index))?;
        control.set(value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.controls.get(index).map(|c| c.value)
    }

    /// Restore every slider to its default position
    pub fn reset(&mut self) {
        for control in &mut self.controls {
            control.value = SENSOR_DEFAULT;
        }
    }

    pub fn controls(&self) -> &[SensorControl] {
        &self.controls
    }

    /// Current slider values in index order
    pub fn collect(&self) -> SensorVector {
        let mut values = [SENSOR_DEFAULT; SENSOR_COUNT];
        for (slot, control) in values.iter_mut().zip(&self.controls) {
            *slot = control.value;
        }
        SensorVector { values }
    }

    /// Build a panel from submitted form fields `s0`..`s19`.
    ///
    /// Missing fields keep their default; unknown keys are ignored. The first
    /// field that is not a finite number fails the whole form.
    pub fn from_form<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let (panel, rejected) = Self::from_form_partial(fields);
        match rejected.into_iter().next() {
            Some(key) => Err(IrrigationError::InvalidInput(format!(
                "sensor field '{}' is not a number",
                key
            ))),
            None => Ok(panel),
        }
    }

    /// Like [`from_form`](Self::from_form), but keeps every field that parsed
    /// and returns the keys that did not, in submission order.
    pub fn from_form_partial<'a, I>(fields: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut panel = Self::new();
        let mut rejected = Vec::new();

        for (key, raw) in fields {
            let Some(index) = key.strip_prefix('s').and_then(|n| n.parse::<usize>().ok()) else {
                continue;
            };
            if index >= SENSOR_COUNT {
                continue;
            }
            let applied = raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|value| panel.set(index, value).ok());
            if applied.is_none() {
                rejected.push(key.to_string());
            }
        }

        (panel, rejected)
    }
}

impl Default for SensorPanel {
    fn default() -> Self {
        Self::new()
    }
}
