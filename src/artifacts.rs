//! Lookup of compiled contracts in Hardhat `build-info` files.
//!
//! A build-info file bundles the exact standard-JSON compiler input with
//! the long compiler version, which is everything an explorer needs to
//! reproduce the bytecode. Hardhat 2 keeps the compiler output in the same
//! file, Hardhat 3 writes it next to it as `<id>.output.json` and prefixes
//! user sources with `project/`.

use alloy_json_abi::JsonAbi;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, fs, io, sync::Arc};
use thiserror::Error;

use crate::errors::MissingContract;

const OUTPUT_SUFFIX: &str = ".output.json";
const PROJECT_PREFIX: &str = "project/";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("[E040] Build info directory not found: {0}\n\nSuggestions:\n  • Compile the project first (pnpm hardhat compile)\n  • Point --build-info at the artifacts/build-info directory")]
    NoBuildInfo(Utf8PathBuf),

    #[error("[E041] I/O error reading '{path}': {error}\n\nSuggestions:\n  • Check file exists and is readable\n  • Verify file permissions")]
    Io { path: Utf8PathBuf, error: io::Error },

    #[error("[E042] Failed to parse build info '{path}': {error}\n\nSuggestions:\n  • Re-run the compiler to regenerate build artifacts\n  • Remove stale files from the build-info directory")]
    Parse { path: Utf8PathBuf, error: String },

    #[error(transparent)]
    Missing(#[from] MissingContract),

    #[error("[E043] Contract name '{name}' matches several compiled contracts: {list}\n\nSuggestions:\n  • Set source_id on the registry entry to pick one", list = .candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
}

impl ArtifactError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoBuildInfo(_) => "E040",
            Self::Io { .. } => "E041",
            Self::Parse { .. } => "E042",
            Self::Missing(m) => m.error_code(),
            Self::Ambiguous { .. } => "E043",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_long_version: String,
    input: Value,
    #[serde(default)]
    output: Option<BuildOutput>,
}

#[derive(Deserialize)]
struct BuildOutputFile {
    output: BuildOutput,
}

#[derive(Default, Deserialize)]
struct BuildOutput {
    #[serde(default)]
    contracts: BTreeMap<String, BTreeMap<String, CompiledContract>>,
}

#[derive(Deserialize)]
struct CompiledContract {
    #[serde(default)]
    abi: JsonAbi,
}

/// Everything needed to submit one contract for verification.
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    /// `path/File.sol:Contract`, without any Hardhat 3 `project/` prefix.
    pub fully_qualified_name: String,
    /// The same name as keyed in the compiler input, which is what the
    /// explorer compiles against.
    pub input_name: String,
    /// Long solc version, e.g. `0.8.20+commit.a1b79de6`.
    pub compiler_version: String,
    pub standard_json_input: Arc<Value>,
    pub abi: JsonAbi,
}

impl ContractArtifact {
    #[must_use]
    pub fn contract_name(&self) -> &str {
        self.fully_qualified_name
            .rsplit_once(':')
            .map_or(self.fully_qualified_name.as_str(), |(_, name)| name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct BuildInfoStore {
    artifacts: Vec<ContractArtifact>,
}

impl BuildInfoStore {
    #[must_use]
    pub fn from_artifacts(artifacts: Vec<ContractArtifact>) -> Self {
        Self { artifacts }
    }

    /// Reads every build-info file in `dir`. Files that can't be read or
    /// parsed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails if `dir` doesn't exist or can't be listed.
    pub fn load(dir: &Utf8Path) -> Result<Self, ArtifactError> {
        if !dir.is_dir() {
            return Err(ArtifactError::NoBuildInfo(dir.to_owned()));
        }

        let entries = dir.read_dir_utf8().map_err(|error| ArtifactError::Io {
            path: dir.to_owned(),
            error,
        })?;

        let mut paths = vec![];
        for entry in entries {
            let entry = entry.map_err(|error| ArtifactError::Io {
                path: dir.to_owned(),
                error,
            })?;
            let path = entry.path();
            if path.extension() == Some("json") && !path.as_str().ends_with(OUTPUT_SUFFIX) {
                paths.push(path.to_owned());
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        let mut artifacts = vec![];
        for path in &paths {
            match read_build_info(path) {
                Ok(found) => artifacts.extend(found),
                Err(err) => log::warn!("Skipping build info {path}: {err}"),
            }
        }
        log::debug!(
            "Loaded {} compiled contracts from {} build info files",
            artifacts.len(),
            paths.len()
        );

        Ok(Self { artifacts })
    }

    pub fn fully_qualified_names(&self) -> Vec<String> {
        self.artifacts
            .iter()
            .map(|a| a.fully_qualified_name.clone())
            .collect()
    }

    /// With a `source_id` the fully qualified name must match exactly,
    /// otherwise `name` is compared with contract names ignoring case and
    /// must be unique.
    ///
    /// # Errors
    ///
    /// Fails when nothing matches or a bare name is ambiguous.
    pub fn find(&self, name: &str, source_id: Option<&str>) -> Result<&ContractArtifact, ArtifactError> {
        if let Some(fqn) = source_id {
            return self
                .artifacts
                .iter()
                .find(|a| a.fully_qualified_name == fqn)
                .ok_or_else(|| {
                    ArtifactError::from(MissingContract::new(
                        fqn.to_owned(),
                        self.fully_qualified_names(),
                    ))
                });
        }

        let matches: Vec<&ContractArtifact> = self
            .artifacts
            .iter()
            .filter(|a| a.contract_name().eq_ignore_ascii_case(name))
            .collect();

        match matches.as_slice() {
            [single] => Ok(*single),
            [] => Err(ArtifactError::from(MissingContract::new(
                name.to_owned(),
                self.fully_qualified_names(),
            ))),
            several => Err(ArtifactError::Ambiguous {
                name: name.to_owned(),
                candidates: several
                    .iter()
                    .map(|a| a.fully_qualified_name.clone())
                    .collect(),
            }),
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Utf8Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|error| ArtifactError::Io {
        path: path.to_owned(),
        error,
    })?;
    serde_json::from_str(&raw).map_err(|e| ArtifactError::Parse {
        path: path.to_owned(),
        error: e.to_string(),
    })
}

fn read_build_info(path: &Utf8Path) -> Result<Vec<ContractArtifact>, ArtifactError> {
    let info: BuildInfo = read_json(path)?;

    let output = match info.output {
        Some(output) => output,
        None => {
            let sibling = path.with_extension("output.json");
            if sibling.is_file() {
                read_json::<BuildOutputFile>(&sibling)?.output
            } else {
                log::debug!("No compiler output for {path}, skipping");
                BuildOutput::default()
            }
        }
    };

    let input = Arc::new(info.input);
    let mut artifacts = vec![];
    for (source, contracts) in output.contracts {
        let stripped = source.strip_prefix(PROJECT_PREFIX).unwrap_or(&source);
        for (name, compiled) in contracts {
            artifacts.push(ContractArtifact {
                fully_qualified_name: format!("{stripped}:{name}"),
                input_name: format!("{source}:{name}"),
                compiler_version: info.solc_long_version.clone(),
                standard_json_input: Arc::clone(&input),
                abi: compiled.abi,
            });
        }
    }
    Ok(artifacts)
}
