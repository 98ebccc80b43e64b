//! Command-line parsing and rendering for the `stratum` binary.

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::PathBuf;
use stratum_rs::config::{ResolvedConfig, SourceOverrides, deep_merge};
use stratum_rs::{ConfigModel, FileEncoding, FileSource, InitSource, RawMap, ValueSource};

/// Command-line options for resolving a config file.
#[derive(Debug, Parser)]
#[command(
    name = "stratum",
    version,
    about = "Resolve explicit values over a YAML config file and print the merged result"
)]
pub struct Cli {
    /// Folder holding the config file (`~` expands to the home directory)
    #[arg(long)]
    pub folder: Option<PathBuf>,
    /// Config file name inside the folder
    #[arg(long = "file")]
    pub file_name: Option<String>,
    /// Prefix stripped from top-level file keys
    #[arg(long)]
    pub prefix: Option<String>,
    /// Keep top-level file keys as written instead of lower-casing them
    #[arg(long)]
    pub case_sensitive: bool,
    /// File encoding (utf-8, utf-8-sig, ascii, latin-1)
    #[arg(long, value_parser = parse_encoding)]
    pub encoding: Option<FileEncoding>,
    /// Explicit value overriding the file, e.g. `server.port=8080`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,
    /// Resolve only the `--set` values and skip the config file
    #[arg(long)]
    pub no_file: bool,
    /// Output format for the merged values
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
    /// Print each source and the keys it contributed to stderr
    #[arg(long)]
    pub sources: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// A `--set` value: dotted key path plus the parsed YAML value.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: Vec<String>,
    pub value: Value,
}

impl Assignment {
    /// Nest the value under its key path: `a.b=1` becomes `{a: {b: 1}}`.
    fn into_map(self) -> RawMap {
        let mut value = self.value;
        for segment in self.path.iter().skip(1).rev() {
            let mut map = RawMap::new();
            map.insert(Value::String(segment.clone()), value);
            value = Value::Mapping(map);
        }
        let mut root = RawMap::new();
        root.insert(Value::String(self.path[0].clone()), value);
        root
    }
}

/// Schema-less model that accepts whatever mapping the sources produce.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct Document(pub RawMap);

impl ConfigModel for Document {}

/// [`Document`] resolved from explicit values alone.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct ExplicitOnly(Document);

impl ConfigModel for ExplicitOnly {
    fn customise_sources(init: InitSource, _file: FileSource) -> Vec<Box<dyn ValueSource>> {
        vec![Box::new(init)]
    }
}

impl Cli {
    pub fn overrides(&self) -> SourceOverrides {
        SourceOverrides {
            case_sensitive: self.case_sensitive.then_some(true),
            file_name: self.file_name.clone(),
            folder: self.folder.clone(),
            encoding: self.encoding,
            prefix: self.prefix.clone(),
        }
    }

    /// Explicit values from every `--set`, later assignments winning.
    pub fn values(&self) -> RawMap {
        let mut values = RawMap::new();
        for assignment in self.set.iter().cloned() {
            deep_merge(&mut values, assignment.into_map());
        }
        values
    }

    pub fn resolve(&self) -> anyhow::Result<ResolvedConfig<Document>> {
        if self.no_file {
            let ResolvedConfig { config, layers } = self.load::<ExplicitOnly>()?;
            return Ok(ResolvedConfig {
                config: config.0,
                layers,
            });
        }
        self.load::<Document>()
    }

    fn load<T: ConfigModel>(&self) -> anyhow::Result<ResolvedConfig<T>> {
        T::builder()
            .overrides(self.overrides())
            .values(self.values())
            .load_layered()
            .context("failed to resolve config sources")
    }
}

/// Render merged values in the requested format.
pub fn render(values: &RawMap, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(values).context("failed to render yaml"),
        OutputFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(values).context("failed to render json")?;
            text.push('\n');
            Ok(text)
        }
    }
}

fn parse_encoding(label: &str) -> Result<FileEncoding, String> {
    label.parse().map_err(|err: stratum_rs::ConfigError| err.to_string())
}

fn parse_assignment(raw: &str) -> anyhow::Result<Assignment> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got `{raw}`");
    };
    let path: Vec<String> = key.split('.').map(str::to_string).collect();
    if path.iter().any(|segment| segment.is_empty()) {
        bail!("invalid key `{key}`");
    }
    let value = if value.is_empty() {
        Value::String(String::new())
    } else {
        serde_yaml::from_str(value).with_context(|| format!("invalid value for `{key}`"))?
    };
    Ok(Assignment { path, value })
}
