//! TOML pipeline configuration.
//!
//! A pipeline file is an ordered list of `[[stage]]` tables, each tagged by
//! `kind`:
//!
//! ```toml
//! [[stage]]
//! kind = "quality"
//! min_length = 900
//! max_n_run = 50
//!
//! [[stage]]
//! kind = "dedup_advanced"
//!
//! [[stage]]
//! kind = "temporal"
//! group_by = "location_host"
//! sort_by = "date"
//! keep = "both"
//! ```
//!
//! Every literal is validated up front so a bad config fails before any
//! stage runs.

use crate::clade::CladeSampling;
use crate::error::{FlowError, Result};
use crate::quality::QualityThresholds;
use crate::record::Field;
use crate::stage::Stage;
use crate::temporal::{GroupBy, KeepPolicy, TemporalSampling};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageConfig {
    Convert,
    Quality {
        #[serde(default = "default_min_length")]
        min_length: usize,
        #[serde(default = "default_max_n_run")]
        max_n_run: usize,
    },
    DedupBasic,
    DedupAdvanced,
    Subtype {
        #[serde(default)]
        targets: Vec<String>,
    },
    Temporal {
        #[serde(default = "default_group_by")]
        group_by: String,
        /// Field names used when `group_by = "custom"`.
        #[serde(default)]
        custom_fields: Vec<String>,
        #[serde(default = "default_sort_by")]
        sort_by: String,
        #[serde(default = "default_keep")]
        keep: String,
    },
    Clade {
        clades: Vec<String>,
        #[serde(default = "default_keep")]
        keep: String,
        #[serde(default)]
        separately: bool,
    },
}

fn default_min_length() -> usize {
    QualityThresholds::default().min_length
}

fn default_max_n_run() -> usize {
    QualityThresholds::default().max_n_run
}

fn default_group_by() -> String {
    "location_host".to_string()
}

fn default_sort_by() -> String {
    "date".to_string()
}

fn default_keep() -> String {
    "both".to_string()
}

impl StageConfig {
    pub fn to_stage(&self) -> Result<Stage> {
        let stage = match self {
            StageConfig::Convert => Stage::ConvertHeaders,
            StageConfig::Quality {
                min_length,
                max_n_run,
            } => Stage::Quality(QualityThresholds {
                min_length: *min_length,
                max_n_run: *max_n_run,
            }),
            StageConfig::DedupBasic => Stage::DedupBasic,
            StageConfig::DedupAdvanced => Stage::DedupAdvanced,
            StageConfig::Subtype { targets } => Stage::Subtype(targets.clone()),
            StageConfig::Temporal {
                group_by,
                custom_fields,
                sort_by,
                keep,
            } => {
                let group_by = if group_by.trim().eq_ignore_ascii_case("custom") {
                    GroupBy::custom(custom_fields.as_slice())?
                } else {
                    group_by.parse()?
                };
                Stage::Temporal(TemporalSampling {
                    group_by,
                    sort_by: sort_by.parse::<Field>()?,
                    keep: keep.parse::<KeepPolicy>()?,
                })
            }
            StageConfig::Clade {
                clades,
                keep,
                separately,
            } => Stage::Clade(CladeSampling {
                clades: clades.clone(),
                keep: keep.parse()?,
                separately: *separately,
            }),
        };
        Ok(stage)
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FlowError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FlowError::io(path, "read", e))?;
        Self::from_toml_str(&text)
    }

    /// Typed stages in file order; the first invalid stage aborts.
    pub fn stages(&self) -> Result<Vec<Stage>> {
        self.stages
            .iter()
            .enumerate()
            .map(|(i, s)| {
                s.to_stage()
                    .map_err(|e| FlowError::Config(format!("stage {}: {}", i + 1, e)))
            })
            .collect()
    }
}
