// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Settings come from an optional JSON file, then environment variables
// (after loading a `.env` file if one exists). The workflow API key is only
// ever read from the environment and is never written back out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SealdocError};
use crate::types::LabelSet;

/// CJK-capable fonts probed when no explicit font path is configured.
const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
    "/usr/share/fonts/wqy-zenhei/wqy-zenhei.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/arphic/uming.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "C:\\Windows\\Fonts\\simsun.ttc",
];

const DEFAULT_WORKFLOW_URL: &str = "https://api.dify.ai/v1/workflows/run";

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory new documents are written into when the caller names none.
    pub output_dir: PathBuf,
    /// Font files tried in order by the layout engine.
    pub font_candidates: Vec<PathBuf>,
    /// Use the builtin Helvetica font when no candidate font exists.
    /// Only Latin-1 text can be rendered in that mode.
    pub builtin_font_fallback: bool,
    /// Wording printed around the caller's data.
    pub labels: LabelSet,
    /// Stamp raster used by the `stamp` command when none is given.
    pub default_stamp_image: PathBuf,
    /// Workflow endpoint (blocking run).
    pub workflow_url: String,
    /// Workflow request timeout in seconds.
    pub workflow_timeout_secs: u64,
    /// Bearer token for the workflow endpoint.
    #[serde(skip)]
    pub workflow_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir(),
            font_candidates: DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
            builtin_font_fallback: false,
            labels: LabelSet::Chinese,
            default_stamp_image: PathBuf::from("./assets/stamps/default.png"),
            workflow_url: DEFAULT_WORKFLOW_URL.to_string(),
            workflow_timeout_secs: 120,
            workflow_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load settings from `path` (if given) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;

        info!(
            output_dir = %config.output_dir.display(),
            fonts = config.font_candidates.len(),
            labels = ?config.labels,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse a JSON settings file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            SealdocError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "Read configuration file");
        Ok(config)
    }

    /// Apply `SEALDOC_*` / `WORKFLOW_*` overrides from `lookup`.
    ///
    /// `lookup` is injected so tests need not touch the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("SEALDOC_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(font) = lookup("SEALDOC_FONT_PATH") {
            // An explicit font is tried before the built-in candidate list.
            self.font_candidates.insert(0, PathBuf::from(font));
        }
        if let Some(labels) = lookup("SEALDOC_LABELS") {
            self.labels = labels.parse().map_err(SealdocError::Config)?;
        }
        if let Some(url) = lookup("WORKFLOW_API_URL") {
            self.workflow_url = url;
        }
        if let Some(timeout) = lookup("WORKFLOW_TIMEOUT_SECS") {
            self.workflow_timeout_secs = timeout.parse().map_err(|_| {
                SealdocError::Config(format!(
                    "WORKFLOW_TIMEOUT_SECS must be a whole number of seconds, got '{timeout}'"
                ))
            })?;
        }
        self.workflow_api_key = lookup("WORKFLOW_API_KEY").filter(|key| !key.is_empty());
        Ok(())
    }
}
