//! Server configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use v2v_comfyui::workflow::NodeIds;
use v2v_comfyui::ComfyUIConfig;

/// Prompt applied when a submission carries no (or an empty) prompt field.
const DEFAULT_PROMPT: &str = "subtle cinematic motion, photorealistic";

/// Server configuration.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).  Submission
    /// never blocks on generation, so this only bounds upload time.
    pub request_timeout_secs: u64,
    /// Inbound staging directory for uploaded images.
    pub upload_dir: PathBuf,
    /// Outbound delivery directory for finished videos.
    pub output_dir: PathBuf,
    /// Prompt used when the caller supplies none.
    pub default_prompt: String,
    /// Selected generation backend.
    pub backend: BackendConfig,
}

/// Which generation strategy the orchestrator dispatches to.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Run the model pipeline in-process via the configured command.
    Local(PipelineConfig),
    /// Delegate to an external ComfyUI instance.
    ComfyUI(ComfyUIConfig),
}

impl BackendConfig {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            BackendConfig::Local(_) => "local",
            BackendConfig::ComfyUI(_) => "comfyui",
        }
    }
}

/// In-process pipeline invocation settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Generator executable.
    pub command: PathBuf,
    /// Arguments placed before the per-job flags.
    pub args: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `HOST`                      | `0.0.0.0`                        |
    /// | `PORT`                      | `8000`                           |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                             |
    /// | `UPLOAD_DIR`                | `uploads`                        |
    /// | `OUTPUT_DIR`                | `outputs`                        |
    /// | `DEFAULT_PROMPT`            | a generic motion prompt          |
    /// | `BACKEND`                   | `local` (or `comfyui`)           |
    /// | `PIPELINE_COMMAND`          | `python3 generate.py`            |
    /// | `COMFYUI_URL`               | `http://127.0.0.1:8188`          |
    /// | `COMFYUI_OUTPUT_DIR`        | `comfyui/output`                 |
    /// | `COMFYUI_WORKFLOW`          | `workflows/i2v.json`             |
    /// | `COMFYUI_POLL_INTERVAL_SECS`| `3`                              |
    /// | `COMFYUI_POLL_TIMEOUT_SECS` | `300`                            |
    /// | `COMFYUI_IMAGE_NODE`        | `10`                             |
    /// | `COMFYUI_PROMPT_NODE`       | `6`                              |
    /// | `COMFYUI_OUTPUT_NODE`       | `9`                              |
    ///
    /// Panics on malformed values -- misconfiguration should fail fast
    /// at startup, not at first use.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "8000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let backend = match env_or("BACKEND", "local").as_str() {
            "local" => BackendConfig::Local(pipeline_from_env()),
            "comfyui" => BackendConfig::ComfyUI(comfyui_from_env()),
            other => panic!("BACKEND must be 'local' or 'comfyui', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir: env_or("UPLOAD_DIR", "uploads").into(),
            output_dir: env_or("OUTPUT_DIR", "outputs").into(),
            default_prompt: env_or("DEFAULT_PROMPT", DEFAULT_PROMPT),
            backend,
        }
    }
}

/// Parse `PIPELINE_COMMAND` as a whitespace-split command line.
fn pipeline_from_env() -> PipelineConfig {
    let raw = env_or("PIPELINE_COMMAND", "python3 generate.py");
    let mut parts = raw.split_whitespace().map(str::to_string);
    let command = parts
        .next()
        .expect("PIPELINE_COMMAND must not be empty")
        .into();
    PipelineConfig {
        command,
        args: parts.collect(),
    }
}

fn comfyui_from_env() -> ComfyUIConfig {
    let poll_interval_secs: u64 = env_or("COMFYUI_POLL_INTERVAL_SECS", "3")
        .parse()
        .expect("COMFYUI_POLL_INTERVAL_SECS must be a valid u64");
    let poll_timeout_secs: u64 = env_or("COMFYUI_POLL_TIMEOUT_SECS", "300")
        .parse()
        .expect("COMFYUI_POLL_TIMEOUT_SECS must be a valid u64");

    ComfyUIConfig {
        api_url: env_or("COMFYUI_URL", "http://127.0.0.1:8188"),
        output_dir: env_or("COMFYUI_OUTPUT_DIR", "comfyui/output").into(),
        workflow_path: env_or("COMFYUI_WORKFLOW", "workflows/i2v.json").into(),
        poll_interval: Duration::from_secs(poll_interval_secs),
        poll_timeout: Duration::from_secs(poll_timeout_secs),
        nodes: NodeIds {
            image: env_or("COMFYUI_IMAGE_NODE", "10"),
            prompt: env_or("COMFYUI_PROMPT_NODE", "6"),
            output: env_or("COMFYUI_OUTPUT_NODE", "9"),
        },
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
