use std::sync::Arc;

use serde::Deserialize as _;

use crate::foundation::{
    core::area_code_to_municipality_code,
    error::{CasemapError, CasemapResult},
};

/// Boundary collection passed through to the renderer.
///
/// The raw document is kept as-is; only the per-feature identity is extracted so the core can
/// map regions to municipality codes.
#[derive(Clone, Debug)]
pub struct Geography {
    raw: Arc<serde_json::Value>,
    features: Vec<GeoFeature>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GeoFeature {
    #[serde(rename = "areaCode")]
    pub area_code: u32,
    #[serde(rename = "areaName", default)]
    pub area_name: String,
}

impl GeoFeature {
    pub fn municipality_code(&self) -> String {
        area_code_to_municipality_code(self.area_code)
    }
}

#[derive(serde::Deserialize)]
struct FeatureShell {
    properties: GeoFeature,
}

impl Geography {
    #[tracing::instrument(skip(text), fields(bytes = text.len()))]
    pub fn parse(text: &str) -> CasemapResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| CasemapError::parse(format!("geography JSON: {e}")))?;
        let list = raw
            .get("features")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| CasemapError::parse("geography has no 'features' array"))?;

        let features = list
            .iter()
            .enumerate()
            .map(|(i, f)| {
                FeatureShell::deserialize(f)
                    .map(|shell| shell.properties)
                    .map_err(|e| CasemapError::parse(format!("geography feature {i}: {e}")))
            })
            .collect::<CasemapResult<Vec<_>>>()?;

        Ok(Self {
            raw: Arc::new(raw),
            features,
        })
    }

    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    /// The untouched input document.
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}
