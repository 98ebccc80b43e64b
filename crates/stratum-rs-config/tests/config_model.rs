//! End-to-end tests for config models resolved from init values and YAML files.

use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;
use stratum_rs_config::{
    ConfigError, ConfigModel, FileSource, InitSource, RawMap, SourceSettings, ValueSource,
};
use stratum_rs_test_utils::{FailingSource, FixtureDir, StubSource};

/// Fixture folder shared by the models below, which declare it statically.
fn fixtures() -> &'static PathBuf {
    static DIR: OnceLock<(FixtureDir, PathBuf)> = OnceLock::new();
    let (_, path) = DIR.get_or_init(|| {
        let dir = FixtureDir::with_standard_fixtures();
        let path = dir.path().to_path_buf();
        (dir, path)
    });
    path
}

#[derive(Debug, Deserialize)]
struct InsensitiveConfig {
    foo: String,
    #[serde(default = "default_case_sensitive")]
    case_sensitive: String,
}

fn default_case_sensitive() -> String {
    "is_case_sensitive".to_string()
}

impl ConfigModel for InsensitiveConfig {
    fn source_settings() -> SourceSettings {
        SourceSettings::from_file(fixtures(), "config.yaml")
    }
}

#[derive(Debug, Deserialize)]
struct SensitiveConfig {
    #[serde(default)]
    foo: Option<String>,
    #[serde(default = "default_case_sensitive")]
    case_sensitive: String,
}

impl ConfigModel for SensitiveConfig {
    fn source_settings() -> SourceSettings {
        SourceSettings {
            case_sensitive: true,
            ..SourceSettings::from_file(fixtures(), "config.yaml")
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrefixConfig {
    parent_config: BTreeMap<String, f64>,
    #[serde(default)]
    other_section: Option<String>,
}

impl ConfigModel for PrefixConfig {
    fn source_settings() -> SourceSettings {
        SourceSettings {
            prefix: Some("PRE_".to_string()),
            ..SourceSettings::from_file(fixtures(), "config_prefix.yaml")
        }
    }
}

#[derive(Debug, Deserialize)]
struct RequiredFoo {
    #[allow(dead_code)]
    foo: String,
}

impl ConfigModel for RequiredFoo {}

#[derive(Debug, Deserialize, PartialEq)]
struct NoSources {
    #[serde(default = "default_fruit")]
    apple: String,
    #[serde(default = "default_fruit")]
    banana: String,
}

fn default_fruit() -> String {
    "default".to_string()
}

impl ConfigModel for NoSources {
    fn customise_sources(_init: InitSource, _file: FileSource) -> Vec<Box<dyn ValueSource>> {
        Vec::new()
    }
}

#[derive(Debug, Deserialize)]
struct NonStringKeys {
    #[serde(default)]
    name: Option<String>,
}

impl ConfigModel for NonStringKeys {
    fn source_settings() -> SourceSettings {
        SourceSettings::from_file(fixtures(), "config_non_str.yaml")
    }
}

#[derive(Debug, Deserialize)]
struct NonMapping {}

impl ConfigModel for NonMapping {
    fn source_settings() -> SourceSettings {
        SourceSettings::from_file(fixtures(), "config_non_mapping.yaml")
    }
}

#[derive(Debug, Deserialize)]
struct InitOnly {
    #[serde(default)]
    name: Option<String>,
}

impl ConfigModel for InitOnly {
    fn source_settings() -> SourceSettings {
        SourceSettings::from_file(fixtures(), "config_non_mapping.yaml")
    }

    fn customise_sources(init: InitSource, _file: FileSource) -> Vec<Box<dyn ValueSource>> {
        vec![Box::new(init)]
    }
}

#[derive(Debug, Deserialize)]
struct Server {
    host: String,
    port: u16,
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Nested {
    server: Server,
}

impl ConfigModel for Nested {}

#[derive(Debug, Deserialize)]
struct FileFirst {
    foo: String,
}

impl ConfigModel for FileFirst {
    fn source_settings() -> SourceSettings {
        SourceSettings::from_file(fixtures(), "config.yaml")
    }

    fn customise_sources(init: InitSource, file: FileSource) -> Vec<Box<dyn ValueSource>> {
        vec![Box::new(file), Box::new(init)]
    }
}

#[derive(Debug, Deserialize)]
struct WithDefaults {
    region: String,
    #[serde(default)]
    replicas: u32,
}

impl ConfigModel for WithDefaults {
    fn customise_sources(init: InitSource, file: FileSource) -> Vec<Box<dyn ValueSource>> {
        vec![
            Box::new(init),
            Box::new(file),
            Box::new(StubSource::from_yaml("defaults", "region: eu-west-1\nreplicas: 2\n")),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct Unavailable {}

impl ConfigModel for Unavailable {
    fn customise_sources(init: InitSource, _file: FileSource) -> Vec<Box<dyn ValueSource>> {
        vec![Box::new(init), Box::new(FailingSource::new("remote"))]
    }
}

/// Verify that upper-case file keys match fields by default.
#[test]
fn case_insensitive_keys_match_fields() {
    let config = InsensitiveConfig::load().expect("config");
    assert_eq!(config.foo, "from_file");
    assert_eq!(config.case_sensitive, "is_not_case_sensitive");
}

/// Ensure case-sensitive lookups miss upper-case file keys.
#[test]
fn case_sensitive_keys_fall_back_to_defaults() {
    let config = SensitiveConfig::load().expect("config");
    assert_eq!(config.foo, None);
    assert_eq!(config.case_sensitive, "is_case_sensitive");
}

/// Ensure a per-load override beats the declared setting.
#[test]
fn per_load_override_beats_declared_setting() {
    let config = SensitiveConfig::builder()
        .case_sensitive(false)
        .load()
        .expect("config");
    assert_eq!(config.foo.as_deref(), Some("from_file"));
    assert_eq!(config.case_sensitive, "is_not_case_sensitive");
}

/// Ensure prefix stripping leaves nested keys alone.
#[test]
fn prefixed_sections_resolve_without_touching_nested_keys() {
    let config = PrefixConfig::load().expect("config");
    assert_eq!(config.parent_config.get("CHILD_CONFIG_A"), Some(&1.0));
    assert_eq!(config.parent_config.get("CHILD_CONFIG_B"), Some(&2.5));
    assert_eq!(config.other_section.as_deref(), Some("untouched"));
}

/// Reject a load that leaves a required field unset.
#[test]
fn missing_required_field_fails() {
    match RequiredFoo::load() {
        Err(ConfigError::Validation(errors)) => assert!(errors.contains_field("foo")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Ensure an empty source list leaves only field defaults.
#[test]
fn empty_source_list_uses_defaults() {
    let expected = NoSources {
        apple: "default".to_string(),
        banana: "default".to_string(),
    };
    assert_eq!(NoSources::load().expect("config"), expected);
    let config = NoSources::builder().set("apple", "xxx").load().expect("config");
    assert_eq!(config, expected);
}

/// Verify that non-string file keys do not break loading.
#[test]
fn non_string_keys_do_not_fail() {
    let config = NonStringKeys::load().expect("config");
    assert_eq!(config.name.as_deref(), Some("string key"));
}

/// Reject a file whose root is a sequence.
#[test]
fn non_mapping_root_is_rejected() {
    match NonMapping::load() {
        Err(ConfigError::FileFormat { found, .. }) => assert_eq!(found, "sequence"),
        other => panic!("expected file format error, got {other:?}"),
    }
}

/// Ensure a dropped file source is never read.
#[test]
fn dropped_file_source_is_never_read() {
    let config = InitOnly::builder().set("name", "explicit").load().expect("config");
    assert_eq!(config.name.as_deref(), Some("explicit"));
}

/// Ensure a missing file leaves defaults and explicit values.
#[test]
fn missing_file_contributes_nothing() {
    let config = InsensitiveConfig::builder()
        .file_name("does_not_exist.yaml")
        .set("foo", "from_init")
        .load()
        .expect("config");
    assert_eq!(config.foo, "from_init");
    assert_eq!(config.case_sensitive, "is_case_sensitive");
}

/// Ensure explicit values override file values.
#[test]
fn init_values_override_file_values() {
    let config = InsensitiveConfig::builder()
        .set("foo", "from_init")
        .load()
        .expect("config");
    assert_eq!(config.foo, "from_init");
    assert_eq!(config.case_sensitive, "is_not_case_sensitive");
}

/// Verify that reordering sources lets the file win.
#[test]
fn reordered_sources_let_the_file_win() {
    let config = FileFirst::builder()
        .set("foo", "from_init")
        .load()
        .expect("config");
    assert_eq!(config.foo, "from_file");
}

/// Ensure an explicit nested key overrides only that key.
#[test]
fn init_overrides_a_single_nested_key() {
    let dir = FixtureDir::new();
    dir.write(
        "nested.yaml",
        "server:\n  host: file.example\n  port: 80\n  tags: [a, b]\n",
    );
    let nested: RawMap = serde_yaml::from_str("server: {port: 8080, tags: [c]}").expect("yaml");
    let config = Nested::builder()
        .folder(dir.path())
        .file_name("nested.yaml")
        .values(nested)
        .load()
        .expect("config");
    assert_eq!(config.server.host, "file.example");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.tags, vec!["c".to_string()]);
}

/// Verify that custom sources join the chain at the lowest priority.
#[test]
fn custom_sources_join_the_chain() {
    let resolved = WithDefaults::builder()
        .set("replicas", 5)
        .load_layered()
        .expect("config");
    assert_eq!(resolved.config.region, "eu-west-1");
    assert_eq!(resolved.config.replicas, 5);
    let names: Vec<&str> = resolved.layers.iter().map(|layer| layer.name.as_str()).collect();
    assert_eq!(names, vec!["init", "file", "defaults"]);
    assert!(resolved.layers[1].keys.is_empty());
}

/// Ensure a failing source surfaces its error.
#[test]
fn failing_source_propagates() {
    match Unavailable::load() {
        Err(ConfigError::ReadFailed { path, source }) => {
            assert_eq!(path, PathBuf::from("remote"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotConnected);
        }
        other => panic!("expected source failure, got {other:?}"),
    }
}

/// Ensure a missing nested field is reported by dotted path.
#[test]
fn nested_missing_field_reports_dotted_path() {
    let values: RawMap = serde_yaml::from_str("server: {port: 1, tags: []}").expect("yaml");
    match Nested::load_with(values) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.contains_field("server.host"));
            assert!(!errors.contains_field("host"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Ensure a nested type error from the file is reported by dotted path.
#[test]
fn nested_wrong_type_reports_dotted_path() {
    let dir = FixtureDir::new();
    dir.write("nested.yaml", "server:\n  host: a\n  port: many\n  tags: []\n");
    let result = Nested::builder()
        .folder(dir.path())
        .file_name("nested.yaml")
        .load();
    match result {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.errors().len(), 1);
            assert_eq!(errors.errors()[0].path, "server.port");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Ensure each load reads the file again.
#[test]
fn repeated_loads_are_independent() {
    let dir = FixtureDir::new();
    dir.write("app.yaml", "foo: first\n");
    let load = || {
        RequiredFooFile::builder()
            .folder(dir.path())
            .file_name("app.yaml")
            .load()
            .expect("config")
    };
    assert_eq!(load().foo, "first");
    dir.write("app.yaml", "foo: second\n");
    assert_eq!(load().foo, "second");
}

#[derive(Debug, Deserialize)]
struct RequiredFooFile {
    foo: String,
}

impl ConfigModel for RequiredFooFile {}
