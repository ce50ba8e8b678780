use std::env;
use tracing::warn;

/// Runtime settings for the scheduler front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Load the sample appointments at startup. The doctor roster and
    /// patient directory load either way.
    pub seed_sample_data: bool,
    /// Reject reschedules into a slot held by another active appointment.
    pub strict_reschedule: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            strict_reschedule: false,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Missing or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            seed_sample_data: read_flag(&lookup, "HMS_SEED_SAMPLE_DATA", defaults.seed_sample_data),
            strict_reschedule: read_flag(&lookup, "HMS_STRICT_RESCHEDULE", defaults.strict_reschedule),
        }
    }
}

fn read_flag<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                warn!("{} has unrecognized value '{}', using {}", key, raw, default);
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> SchedulerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SchedulerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), SchedulerConfig::default());
    }

    #[test]
    fn reads_flags() {
        let config = config_from(&[
            ("HMS_SEED_SAMPLE_DATA", "false"),
            ("HMS_STRICT_RESCHEDULE", "YES"),
        ]);
        assert!(!config.seed_sample_data);
        assert!(config.strict_reschedule);
    }

    #[test]
    fn unparsable_flag_falls_back_to_default() {
        let config = config_from(&[("HMS_SEED_SAMPLE_DATA", "maybe")]);
        assert!(config.seed_sample_data);
    }
}
