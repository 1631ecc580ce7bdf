use crate::config::QueryConfig;
use crate::filter::LabelSet;
use std::collections::BTreeSet;

pub struct GenerateConfigOptions {
    pub profile_name: String,
}

/// Build a profile whose known keys are every label name seen in `label_sets`
///
/// Keys already listed in `base` are kept; patterns and series are copied
/// unchanged.
pub fn generate_config(
    label_sets: &[LabelSet],
    base: &QueryConfig,
    options: &GenerateConfigOptions,
) -> QueryConfig {
    let mut config = base.clone();
    config.profile_name = options.profile_name.clone();

    let mut keys: BTreeSet<String> = base.keys.known_keys.iter().cloned().collect();
    for labels in label_sets {
        keys.extend(labels.keys().filter(|k| !k.is_empty()).cloned());
    }

    tracing::debug!(
        label_sets = label_sets.len(),
        keys = keys.len(),
        "generated key profile"
    );
    config.keys.known_keys = keys.into_iter().collect();
    config
}
