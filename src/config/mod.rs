//! Layered configuration for kwfreq.
//!
//! Merge order: embedded defaults, then `kwfreq.toml` in the working
//! directory (or the `--config` path), then `KWFREQ_*` environment
//! variables. Nested keys use a double underscore in the environment, e.g.
//! `KWFREQ_WORKERS__BUDGET=8`.

use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::pipeline::WorkerPlan;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct KwfreqConfig {
    pub workers: WorkersConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkersConfig {
    /// Producer threads reading source lines.
    pub producers: usize,
    /// Total worker budget (producers + consumers). 0 = derive from CPU count.
    pub budget: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Upper bound on the keyword table size.
    pub max_keywords: usize,
}

impl KwfreqConfig {
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(path) = custom_config {
            figment = figment.merge(Toml::file(path));
        } else {
            figment = figment.merge(Toml::file("kwfreq.toml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("KWFREQ_").split("__"));

        Ok(figment.extract()?)
    }

    /// Resolve producer and consumer counts from the configured budget.
    ///
    /// A zero budget derives from the CPU count, floored so at least one
    /// consumer remains beside the producers.
    pub fn worker_plan(&self) -> Result<WorkerPlan, PipelineError> {
        let producers = self.workers.producers;
        if producers == 0 {
            return Err(PipelineError::Configuration(
                "workers.producers must be at least 1".to_string(),
            ));
        }

        let budget = if self.workers.budget == 0 {
            num_cpus::get().max(producers + 1)
        } else {
            self.workers.budget
        };
        if budget <= producers {
            return Err(PipelineError::Configuration(format!(
                "worker budget {budget} leaves no consumers for {producers} producers"
            )));
        }

        Ok(WorkerPlan {
            producers,
            consumers: budget - producers,
        })
    }
}

impl Default for KwfreqConfig {
    fn default() -> Self {
        Self {
            workers: WorkersConfig {
                producers: 3,
                budget: 0,
            },
            limits: LimitsConfig { max_keywords: 100 },
        }
    }
}
