//! Placement parameters from an optional JSON file plus flag overrides.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use stp::api::PlacementParams;

/// Parameter file; every field is optional so flags can fill the gaps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamsFile {
    pub spacing: Option<f64>,
    pub separation_radius: Option<f64>,
    pub buffer_radius: Option<f64>,
    pub min_fragment_length: Option<f64>,
    pub max_iterations: Option<u32>,
}

impl ParamsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading params {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing params {}", path.display()))
    }

    /// Fields of `other` that are set win.
    pub fn merge(self, other: ParamsFile) -> ParamsFile {
        ParamsFile {
            spacing: other.spacing.or(self.spacing),
            separation_radius: other.separation_radius.or(self.separation_radius),
            buffer_radius: other.buffer_radius.or(self.buffer_radius),
            min_fragment_length: other.min_fragment_length.or(self.min_fragment_length),
            max_iterations: other.max_iterations.or(self.max_iterations),
        }
    }

    /// Library params; spacing and separation are required, the rest default.
    pub fn into_params(self) -> Result<PlacementParams> {
        let spacing = self
            .spacing
            .context("spacing is required (flag --spacing or params file)")?;
        let separation = self
            .separation_radius
            .context("separation radius is required (flag --separation or params file)")?;
        let mut p = PlacementParams::new(spacing, separation);
        if let Some(b) = self.buffer_radius {
            p = p.with_buffer_radius(b);
        }
        if let Some(m) = self.min_fragment_length {
            p = p.with_min_fragment_length(m);
        }
        if let Some(n) = self.max_iterations {
            p = p.with_max_iterations(n);
        }
        Ok(p)
    }
}

/// Shared parameter flags.
#[derive(Args, Clone, Debug, Default)]
pub struct ParamArgs {
    /// JSON file with placement parameters; flags override its fields
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
    /// Distance between consecutive points along a line
    #[arg(long)]
    pub spacing: Option<f64>,
    /// Minimum allowed distance between points of different lines
    #[arg(long)]
    pub separation: Option<f64>,
    /// Radius erased around winning points (default: separation - 0.01)
    #[arg(long)]
    pub buffer: Option<f64>,
    /// Fragments shorter than this are discarded
    #[arg(long)]
    pub min_fragment: Option<f64>,
    #[arg(long)]
    pub max_iterations: Option<u32>,
}

impl ParamArgs {
    pub fn resolve(&self) -> Result<PlacementParams> {
        let base = match &self.config {
            Some(path) => ParamsFile::load(path)?,
            None => ParamsFile::default(),
        };
        let flags = ParamsFile {
            spacing: self.spacing,
            separation_radius: self.separation,
            buffer_radius: self.buffer,
            min_fragment_length: self.min_fragment,
            max_iterations: self.max_iterations,
        };
        base.merge(flags).into_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn flags_override_file_and_defaults_fill_the_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(
            &path,
            r#"{"spacing": 10.0, "separation_radius": 8.0, "max_iterations": 5}"#,
        )
        .unwrap();
        let args = ParamArgs {
            config: Some(path),
            spacing: Some(12.0),
            ..ParamArgs::default()
        };
        let p = args.resolve().unwrap();
        assert_eq!(p.spacing, 12.0);
        assert_eq!(p.separation_radius, 8.0);
        assert_eq!(p.max_iterations, 5);
        assert!((p.buffer_radius - 7.99).abs() < 1e-12);
        assert_eq!(p.min_fragment_length, 3.0);
    }

    #[test]
    fn unknown_fields_and_missing_spacing_fail() {
        assert!(serde_json::from_str::<ParamsFile>(r#"{"spacng": 1.0}"#).is_err());
        let only_sep = ParamsFile {
            separation_radius: Some(8.0),
            ..ParamsFile::default()
        };
        assert!(only_sep.into_params().is_err());
    }
}
