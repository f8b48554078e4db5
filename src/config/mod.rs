use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{ProviderKind, Transport};
use crate::client::{ClientOptions, GenerationClient};
use crate::endpoint::{DynEndpoint, HttpEndpoint};
use crate::prompt::PromptTemplate;
use crate::provider::{make_provider, DirectEndpoint};

pub const ENV_ENDPOINT_URL: &str = "UIGEN_ENDPOINT_URL";
pub const ENV_MODEL: &str = "UIGEN_MODEL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    /// Directory under which run artifacts are saved.
    pub root: String,
    pub out: String,
    pub transport: Transport,
    pub endpoint_url: String,
    pub provider: ProviderKind,
    pub model: String,
    pub api_base: Option<String>,
    pub timeout_secs: u64,
    pub check_completeness: bool,
    pub min_document_bytes: usize,
    pub template_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2025-06-01".into(),
            root: ".".into(),
            out: "generated.html".into(),
            transport: Transport::Remote,
            endpoint_url: "http://localhost:8888/api/generate".into(),
            provider: ProviderKind::OpenAI,
            model: "gpt-4.1-mini".into(),
            api_base: None,
            timeout_secs: 300,
            check_completeness: true,
            min_document_bytes: 0,
            template_path: None,
        }
    }
}

impl Config {
    /// Defaults, overlaid with the TOML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs_err::read_to_string(path)?;
        toml::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|k| std::env::var(k).ok());
    }

    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get(ENV_ENDPOINT_URL).filter(|v| !v.trim().is_empty()) {
            self.endpoint_url = v;
        }
        if let Some(v) = get(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            self.model = v;
        }
    }

    pub fn endpoint(&self) -> DynEndpoint {
        match self.transport {
            Transport::Remote => Box::new(HttpEndpoint::new(self.endpoint_url.clone(), self.timeout_secs)),
            Transport::Direct => Box::new(DirectEndpoint::new(make_provider(
                self.provider,
                self.model.clone(),
                self.timeout_secs,
                self.api_base.clone(),
            ))),
        }
    }

    pub fn client(&self) -> Result<GenerationClient> {
        let template = match &self.template_path {
            Some(p) => PromptTemplate::from_file(Path::new(p)).context("loading prompt template")?,
            None => PromptTemplate::builtin(),
        };
        Ok(GenerationClient::new(self.endpoint())
            .with_template(template)
            .with_options(ClientOptions {
                check_completeness: self.check_completeness,
                min_document_bytes: self.min_document_bytes,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_file() {
        let cfg = Config::load(None).unwrap();
        assert_eq!(cfg.transport, Transport::Remote);
        assert!(cfg.check_completeness);
        assert_eq!(cfg.endpoint().name(), "http");
    }

    #[test]
    fn toml_overrides_only_what_it_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uigen.toml");
        fs_err::write(&path, "transport = \"direct\"\nprovider = \"anthropic\"\nmin_document_bytes = 4096\n").unwrap();

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.transport, Transport::Direct);
        assert_eq!(cfg.provider, ProviderKind::Anthropic);
        assert_eq!(cfg.min_document_bytes, 4096);
        assert_eq!(cfg.out, "generated.html");
        assert_eq!(cfg.endpoint().name(), "anthropic");
    }

    #[test]
    fn unknown_transport_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs_err::write(&path, "transport = \"carrier-pigeon\"\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config file"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_ENDPOINT_URL, "https://gen.example/api"), (ENV_MODEL, " ")].into();
        let mut cfg = Config::default();
        cfg.apply_env_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.endpoint_url, "https://gen.example/api");
        assert_eq!(cfg.model, "gpt-4.1-mini");
    }

    #[test]
    fn bad_template_path_fails_client_build() {
        let cfg = Config { template_path: Some("/no/such/template.txt".into()), ..Config::default() };
        assert!(cfg.client().is_err());
    }
}
