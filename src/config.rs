//! Runtime configuration read from `MANDELBROT_*` environment variables

use crate::dispatch::{DispatchOptions, Schedule};
use crate::error::{RenderError, Result};
use std::env::VarError;
use std::fmt::{self, Display};
use std::str::FromStr;

pub const BACKEND_VAR: &str = "MANDELBROT_BACKEND";
pub const THREADS_VAR: &str = "MANDELBROT_THREADS";
pub const ROWS_PER_TASK_VAR: &str = "MANDELBROT_ROWS_PER_TASK";
pub const SCHEDULE_VAR: &str = "MANDELBROT_SCHEDULE";

/// Which renderer backend to use
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendPreference {
    /// GPU when compiled in and available, CPU otherwise
    #[default]
    Auto,
    Cpu,
    /// GPU only; selection fails instead of falling back
    Gpu,
}

impl Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPreference::Auto => write!(f, "auto"),
            BackendPreference::Cpu => write!(f, "cpu"),
            BackendPreference::Gpu => write!(f, "gpu"),
        }
    }
}

impl FromStr for BackendPreference {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendPreference::Auto),
            "cpu" => Ok(BackendPreference::Cpu),
            "gpu" | "wgpu" => Ok(BackendPreference::Gpu),
            _ => Err(RenderError::InvalidConfig {
                key: BACKEND_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub backend: BackendPreference,
    /// CPU worker threads
    pub threads: usize,
    pub dispatch: DispatchOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            threads: num_cpus::get(),
            dispatch: DispatchOptions::default(),
        }
    }
}

impl RenderConfig {
    /// Reads the process environment; unset variables keep their defaults
    pub fn from_env() -> Result<Self> {
        let mut unreadable = None;
        let config = Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(err) => {
                unreadable.get_or_insert(err);
                None
            }
        })?;

        match unreadable {
            Some(err) => Err(err.into()),
            None => Ok(config),
        }
    }

    /// Builds a config from any key lookup, e.g. a map in tests
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(BACKEND_VAR) {
            config.backend = value.parse()?;
        }
        if let Some(value) = lookup(THREADS_VAR) {
            config.threads = parse_positive(THREADS_VAR, &value)?;
        }
        if let Some(value) = lookup(ROWS_PER_TASK_VAR) {
            config.dispatch.rows_per_task = parse_positive(ROWS_PER_TASK_VAR, &value)?;
        }
        if let Some(value) = lookup(SCHEDULE_VAR) {
            config.dispatch.schedule = value.parse::<Schedule>().map_err(|_| {
                RenderError::InvalidConfig {
                    key: SCHEDULE_VAR,
                    value: value.clone(),
                }
            })?;
        }

        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RenderError::InvalidConfig {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = RenderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RenderConfig::default());
        assert!(config.threads >= 1);
    }

    #[test]
    fn reads_every_key() {
        let config = RenderConfig::from_lookup(lookup(&[
            (BACKEND_VAR, "CPU"),
            (THREADS_VAR, "3"),
            (ROWS_PER_TASK_VAR, "8"),
            (SCHEDULE_VAR, "static"),
        ]))
        .unwrap();

        assert_eq!(config.backend, BackendPreference::Cpu);
        assert_eq!(config.threads, 3);
        assert_eq!(config.dispatch.rows_per_task, 8);
        assert_eq!(config.dispatch.schedule, Schedule::Static);
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            (BACKEND_VAR, "metal"),
            (THREADS_VAR, "0"),
            (THREADS_VAR, "many"),
            (ROWS_PER_TASK_VAR, "-1"),
            (SCHEDULE_VAR, "round-robin"),
        ] {
            match RenderConfig::from_lookup(lookup(&[(key, value)])) {
                Err(RenderError::InvalidConfig { key: k, value: v }) => {
                    assert_eq!(k, key);
                    assert_eq!(v, value);
                }
                other => panic!("{key}={value} gave {other:?}"),
            }
        }
    }
}
