use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use super::states::canonical_state;

// ---------------------------------------------------------------------------
// State boundary shapes
// ---------------------------------------------------------------------------

/// Outline of one state, keyed by canonical state code.
#[derive(Debug, Clone, PartialEq)]
pub struct StateShape {
    pub state: String,
    /// Closed rings of `[longitude, latitude]` pairs.  Holes are kept as
    /// separate rings; outlines do not need to tell them apart.
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl StateShape {
    /// Mean vertex of the longest ring, used to place the state label.
    pub fn label_anchor(&self) -> Option<[f64; 2]> {
        let ring = self.rings.iter().max_by_key(|r| r.len())?;
        if ring.is_empty() {
            return None;
        }
        let n = ring.len() as f64;
        let (sx, sy) = ring
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
        Some([sx / n, sy / n])
    }
}

/// Load a GeoJSON `FeatureCollection` of state boundaries.
pub fn load_geometry(path: &Path) -> Result<Vec<StateShape>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading geometry file {}", path.display()))?;
    parse_geometry(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Parse GeoJSON text.
///
/// Each feature's `properties.name` is normalized with
/// [`canonical_state`], so boundary files keyed by full name or by code both
/// join against aggregate keys.  Features without a name or with a geometry
/// other than `Polygon` / `MultiPolygon` are skipped.
pub fn parse_geometry(text: &str) -> Result<Vec<StateShape>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing GeoJSON")?;
    let features = root
        .get("features")
        .and_then(|f| f.as_array())
        .context("Expected a FeatureCollection with a 'features' array")?;

    let mut shapes = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let Some(name) = feature
            .pointer("/properties/name")
            .and_then(|n| n.as_str())
        else {
            log::warn!("geometry feature {i} has no properties.name; skipped");
            continue;
        };
        let Some(geometry) = feature.get("geometry") else {
            continue;
        };
        match parse_rings(geometry) {
            Ok(rings) => shapes.push(StateShape {
                state: canonical_state(name),
                rings,
            }),
            Err(e) => log::warn!("geometry feature {i} ({name}): {e:#}"),
        }
    }
    Ok(shapes)
}

fn parse_rings(geometry: &JsonValue) -> Result<Vec<Vec<[f64; 2]>>> {
    let kind = geometry
        .get("type")
        .and_then(|t| t.as_str())
        .context("geometry has no type")?;
    let coords = geometry
        .get("coordinates")
        .and_then(|c| c.as_array())
        .context("geometry has no coordinates")?;

    match kind {
        "Polygon" => coords.iter().map(parse_ring).collect(),
        "MultiPolygon" => {
            let mut rings = Vec::new();
            for polygon in coords {
                let polygon = polygon.as_array().context("polygon is not an array")?;
                for ring in polygon {
                    rings.push(parse_ring(ring)?);
                }
            }
            Ok(rings)
        }
        other => bail!("unsupported geometry type {other}"),
    }
}

fn parse_ring(ring: &JsonValue) -> Result<Vec<[f64; 2]>> {
    ring.as_array()
        .context("ring is not an array")?
        .iter()
        .map(|pos| {
            let lon = pos.get(0).and_then(|v| v.as_f64());
            let lat = pos.get(1).and_then(|v| v.as_f64());
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok([lon, lat]),
                _ => bail!("invalid position {pos}"),
            }
        })
        .collect()
}
