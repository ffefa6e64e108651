use crate::foundation::buffer::Rgb;
use crate::foundation::error::{CisError, CisResult};

/// One colormap control point: position `x` in `[0, 1]` and an RGBA color
/// with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlPoint {
    /// Position in the normalized value domain.
    pub x: f32,
    /// Red component in `[0, 1]`.
    pub r: f32,
    /// Green component in `[0, 1]`.
    pub g: f32,
    /// Blue component in `[0, 1]`.
    pub b: f32,
    /// Alpha component in `[0, 1]`.
    pub a: f32,
}

/// Where a colormap's control points come from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ColormapSource {
    /// Inline, ordered control points.
    Points {
        /// Control points with `x` monotonically non-decreasing.
        points: Vec<ControlPoint>,
    },
    /// Reference to an external colormap file; kept unresolved on read.
    Url {
        /// Location of the external colormap definition.
        url: String,
    },
}

/// A named color transfer function, created and edited externally.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Colormap {
    /// Colormap name, unique within its store.
    pub name: String,
    /// Control points or an external reference.
    #[serde(flatten)]
    pub source: ColormapSource,
}

impl Colormap {
    /// A colormap over inline control points.
    pub fn from_points(name: impl Into<String>, points: Vec<ControlPoint>) -> Self {
        Self {
            name: name.into(),
            source: ColormapSource::Points { points },
        }
    }

    /// The default 2-point grayscale ramp used when a referenced colormap
    /// is unknown.
    pub fn grayscale() -> Self {
        Self::from_points(
            "grayscale",
            vec![
                ControlPoint {
                    x: 0.0,
                    r: 0.0,
                    g: 0.0,
                    b: 0.0,
                    a: 1.0,
                },
                ControlPoint {
                    x: 1.0,
                    r: 1.0,
                    g: 1.0,
                    b: 1.0,
                    a: 1.0,
                },
            ],
        )
    }

    /// Validate control-point invariants (at least 2 points, `x` ordered
    /// and inside `[0, 1]`). External references are always valid.
    pub fn validate(&self) -> CisResult<()> {
        if self.name.trim().is_empty() {
            return Err(CisError::validation("colormap name must be non-empty"));
        }
        let points = match &self.source {
            ColormapSource::Points { points } => points,
            ColormapSource::Url { url } => {
                if url.trim().is_empty() {
                    return Err(CisError::validation(format!(
                        "colormap '{}' has an empty url",
                        self.name
                    )));
                }
                return Ok(());
            }
        };
        if points.len() < 2 {
            return Err(CisError::validation(format!(
                "colormap '{}' needs at least 2 control points",
                self.name
            )));
        }
        let mut prev = 0.0f32;
        for (i, p) in points.iter().enumerate() {
            if !(0.0..=1.0).contains(&p.x) {
                return Err(CisError::validation(format!(
                    "colormap '{}' point {} has x outside [0, 1]",
                    self.name, i
                )));
            }
            if p.x < prev {
                return Err(CisError::validation(format!(
                    "colormap '{}' points must be non-decreasing in x",
                    self.name
                )));
            }
            prev = p.x;
        }
        Ok(())
    }

    /// Linear interpolation of the control points at `x`, as a `0..=255`
    /// color. `x` outside the point range clamps to the end colors.
    pub fn sample(&self, x: f32) -> CisResult<Rgb> {
        let points = match &self.source {
            ColormapSource::Points { points } => points,
            ColormapSource::Url { .. } => {
                return Err(CisError::validation(format!(
                    "colormap '{}' is an external reference; resolve it before sampling",
                    self.name
                )));
            }
        };
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(CisError::validation(format!(
                "colormap '{}' has no control points",
                self.name
            )));
        };

        let rgb = if x <= first.x {
            [first.r, first.g, first.b]
        } else if x >= last.x {
            [last.r, last.g, last.b]
        } else {
            let hi = points.partition_point(|p| p.x <= x).min(points.len() - 1);
            let (a, b) = (points[hi - 1], points[hi]);
            let span = b.x - a.x;
            let t = if span > 0.0 { (x - a.x) / span } else { 0.0 };
            [
                a.r + (b.r - a.r) * t,
                a.g + (b.g - a.g) * t,
                a.b + (b.b - a.b) * t,
            ]
        };
        Ok([rgb[0] * 255.0, rgb[1] * 255.0, rgb[2] * 255.0])
    }
}

/// A fixed-size color lookup table derived from a colormap.
///
/// `colors` holds K entries in the `0..=255` range and `bins` holds K+1
/// monotonic boundaries over the normalized value domain. Bin construction
/// is pluggable: [`Lut::from_colormap`] is the default uniform-bin
/// builder, and callers with a different binning scheme use [`Lut::new`]
/// directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Lut {
    colors: Vec<Rgb>,
    bins: Vec<f32>,
}

impl Lut {
    /// Wrap prebuilt colors and bin boundaries, validating shape and
    /// monotonicity.
    pub fn new(colors: Vec<Rgb>, bins: Vec<f32>) -> CisResult<Self> {
        if colors.is_empty() {
            return Err(CisError::validation("lut needs at least 1 color"));
        }
        if bins.len() != colors.len() + 1 {
            return Err(CisError::validation(format!(
                "lut with {} colors needs {} bin boundaries, got {}",
                colors.len(),
                colors.len() + 1,
                bins.len()
            )));
        }
        if bins.windows(2).any(|w| w[0] > w[1]) {
            return Err(CisError::validation("lut bins must be non-decreasing"));
        }
        Ok(Self { colors, bins })
    }

    /// Build a K-entry table from a colormap using uniform bins over
    /// `[0, 1]`, sampling each color at its bin center.
    pub fn from_colormap(colormap: &Colormap, size: usize) -> CisResult<Self> {
        if size == 0 {
            return Err(CisError::validation("lut size must be > 0"));
        }
        let mut colors = Vec::with_capacity(size);
        for i in 0..size {
            let x = (i as f32 + 0.5) / size as f32;
            colors.push(colormap.sample(x)?);
        }
        let bins = (0..=size).map(|i| i as f32 / size as f32).collect();
        Self::new(colors, bins)
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// `true` when the table has no colors (never constructible).
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Bin boundaries (K+1 entries).
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Map a normalized value to its bin color.
    ///
    /// The bin index is the count of boundaries `<= norm`, minus one,
    /// clamped to `[0, K-1]`; values below the first boundary take the
    /// bottom color and values at or above the last take the top one.
    pub fn lookup(&self, norm: f32) -> Rgb {
        let idx = self.bins.partition_point(|b| *b <= norm);
        let idx = idx.saturating_sub(1).min(self.colors.len() - 1);
        self.colors[idx]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/colormap.rs"]
mod tests;
