use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
}

/// Where the composed prompt is sent.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// The generation endpoint (`POST {prompt}` -> `{success, html}`).
    Remote,
    /// Call the model provider directly.
    Direct,
}

#[derive(Parser, Debug, Default)]
#[command(name = "vibe_uigen", version, about = "Generate a complete HTML page from a free-text design request")]
pub struct Args {
    /// Design request. Read from stdin when omitted.
    #[arg(long, short)]
    pub prompt: Option<String>,

    /// TOML config file.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub root: Option<String>,

    /// Where the generated page is written.
    #[arg(long, short)]
    pub out: Option<String>,

    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    #[arg(long)]
    pub endpoint_url: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    /// Override the provider API base URL (direct transport).
    #[arg(long)]
    pub api_base: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Accept output even when it looks truncated.
    #[arg(long, default_value_t = false)]
    pub no_check: bool,

    #[arg(long)]
    pub min_bytes: Option<usize>,

    /// Replacement instruction template ({{COLOR_GUIDANCE}} / {{FONT_GUIDANCE}}).
    #[arg(long)]
    pub template: Option<String>,

    /// Print the composed prompt and exit without calling the endpoint.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// Command-line values win over config file and environment.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(v) = &self.root { cfg.root = v.clone(); }
        if let Some(v) = &self.out { cfg.out = v.clone(); }
        if let Some(v) = self.transport { cfg.transport = v; }
        if let Some(v) = &self.endpoint_url { cfg.endpoint_url = v.clone(); }
        if let Some(v) = self.provider { cfg.provider = v; }
        if let Some(v) = &self.model { cfg.model = v.clone(); }
        if let Some(v) = &self.api_base { cfg.api_base = Some(v.clone()); }
        if let Some(v) = self.timeout_secs { cfg.timeout_secs = v; }
        if self.no_check { cfg.check_completeness = false; }
        if let Some(v) = self.min_bytes { cfg.min_document_bytes = v; }
        if let Some(v) = &self.template { cfg.template_path = Some(v.clone()); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "vibe_uigen", "-p", "a bakery site", "--transport", "direct", "--provider", "anthropic",
            "--no-check", "--timeout-secs", "30",
        ]);
        assert_eq!(args.prompt.as_deref(), Some("a bakery site"));
        assert_eq!(args.transport, Some(Transport::Direct));
        assert_eq!(args.provider, Some(ProviderKind::Anthropic));
        assert!(args.no_check);
    }

    #[test]
    fn provider_alias() {
        let args = Args::parse_from(["vibe_uigen", "--provider", "open-ai"]);
        assert_eq!(args.provider, Some(ProviderKind::OpenAI));
    }

    #[test]
    fn cli_overrides_config() {
        let mut cfg = Config::default();
        let args = Args {
            model: Some("gpt-4o".into()),
            no_check: true,
            min_bytes: Some(2048),
            ..Default::default()
        };
        args.apply_to(&mut cfg);
        assert_eq!(cfg.model, "gpt-4o");
        assert!(!cfg.check_completeness);
        assert_eq!(cfg.min_document_bytes, 2048);
        assert_eq!(cfg.transport, Transport::Remote);
    }
}
