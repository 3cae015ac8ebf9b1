use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where in the CLI a sidecar was written from.
#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

/// Contents of `<stem>.provenance.json`.
#[derive(Debug, Serialize)]
pub struct Sidecar {
    pub tool: &'static str,
    pub version: &'static str,
    pub code_rev: String,
    pub callsite: Callsite,
    pub command: String,
    pub inputs: Vec<String>,
    pub params: Value,
    pub summary: Value,
    pub outputs: Vec<String>,
}

/// What a command knows about its run; the rest is filled in by `write_sidecar`.
pub struct Payload {
    pub command: &'static str,
    pub inputs: Vec<String>,
    pub params: Value,
    pub summary: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            inputs: Vec::new(),
            params,
            summary: Value::Null,
        }
    }

    pub fn with_input<P: AsRef<Path>>(mut self, input: P) -> Self {
        self.inputs.push(input.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = Sidecar {
        tool: "stp",
        version: stp::VERSION,
        code_rev: current_git_rev(),
        callsite: Callsite {
            file: callsite.file(),
            line: callsite.line(),
        },
        command: payload.command.to_string(),
        inputs: payload.inputs,
        params: payload.params,
        summary: payload.summary,
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    tracing::debug!(path = %provenance_path.display(), "provenance written");
    Ok(provenance_path)
}

/// `points.parquet` -> `points.provenance.json`, in the same directory.
fn provenance_path(artifact: &Path) -> PathBuf {
    if artifact.file_name().is_none() {
        return artifact.join("artifact.provenance.json");
    }
    artifact.with_extension("provenance.json")
}

/// Revision recorded in sidecars; `unknown` outside a checkout without `GIT_COMMIT`.
pub fn current_git_rev() -> String {
    let pinned = [
        option_env!("GIT_COMMIT").map(str::to_owned),
        std::env::var("GIT_COMMIT").ok(),
    ];
    pinned
        .into_iter()
        .flatten()
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_string()).filter(|r| !r.is_empty())
}
