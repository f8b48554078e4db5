use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::prompt::TEMPLATE_VERSION;
use crate::wire::{ComposedPrompt, GenerationRequest, GenerationResult};

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

#[derive(Serialize)]
struct RequestArtifact<'a> {
    run_id: Uuid,
    created_at: DateTime<Utc>,
    template_version: &'a str,
    endpoint: &'a str,
    request: &'a GenerationRequest,
    composed: &'a ComposedPrompt,
}

#[derive(Serialize)]
struct ResponseArtifact<'a> {
    run_id: Uuid,
    finished_at: DateTime<Utc>,
    result: &'a GenerationResult,
}

fn run_dir(root: &Path, run: Uuid) -> PathBuf {
    root.join(".vibe").join("uigen").join(run.to_string())
}

pub fn save_request(
    root: &Path,
    run: Uuid,
    endpoint: &str,
    request: &GenerationRequest,
    composed: &ComposedPrompt,
) -> anyhow::Result<PathBuf> {
    let dir = run_dir(root, run);
    fs::create_dir_all(&dir)?;
    let artifact = RequestArtifact {
        run_id: run,
        created_at: Utc::now(),
        template_version: TEMPLATE_VERSION,
        endpoint,
        request,
        composed,
    };
    let p = dir.join("request.json");
    fs::write(&p, to_string_pretty(&artifact)?)?;
    Ok(p)
}

pub fn save_response(root: &Path, run: Uuid, result: &GenerationResult) -> anyhow::Result<PathBuf> {
    let dir = run_dir(root, run);
    fs::create_dir_all(&dir)?;
    let artifact = ResponseArtifact { run_id: run, finished_at: Utc::now(), result };
    let p = dir.join("response.json");
    fs::write(&p, to_string_pretty(&artifact)?)?;
    Ok(p)
}

pub fn print_planned_paths(root: &Path, run: Uuid) {
    let dir = run_dir(root, run);
    println!("debug: planned artifacts directory: {}", dir.display());
    std::io::stdout().flush().ok();
}

pub fn print_saved_paths(saved: &SavedPaths) {
    println!("debug: artifacts directory: {}", saved.dir.display());
    match &saved.request {
        Some(p) => println!("debug: request saved at: {}", p.display()),
        None => println!("debug: request not saved (flag off)"),
    }
    match &saved.response {
        Some(p) => println!("debug: response saved at: {}", p.display()),
        None => println!("debug: response not saved (flag off)"),
    }
    std::io::stdout().flush().ok();
}

pub fn artifacts_dir(root: &Path, run: Uuid) -> PathBuf {
    run_dir(root, run)
}
