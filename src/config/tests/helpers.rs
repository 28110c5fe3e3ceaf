//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::ReviewAppConfig;

/// Variables consulted as fallbacks by the `resolve_*` helpers.
pub const LEGACY_VARIABLES: [&str; 10] = [
    "HEROKU_PIPELINE_ID",
    "HEROKU_API_TOKEN",
    "GITHUB_TOKEN",
    "GITHUB_PA_TOKEN",
    "COLLABORATOR_PERMISSION",
    "GITHUB_EVENT_NAME",
    "GITHUB_EVENT_PATH",
    "GITHUB_ACTOR",
    "GITHUB_OUTPUT",
    "GITHUB_API_URL",
];

/// Locks the environment with every legacy variable unset except the given
/// overrides.
///
/// The returned guard restores the previous values when dropped.
pub fn lock_legacy_env(overrides: &[(&'static str, &'static str)]) -> impl Sized + use<> {
    let variables = LEGACY_VARIABLES.map(|name| {
        let value = overrides
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value);
        (name, value)
    });
    env_lock::lock_env(variables)
}

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Helper to compose a [`ReviewAppConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> ReviewAppConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    ReviewAppConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}
