use clap::Parser;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use vibe_uigen::{cli, config, log, ux};

fn init_tracing(debug: bool) {
    let default = if debug { "vibe_uigen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    dotenvy::dotenv().ok();
    init_tracing(args.debug);

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    cfg.apply_env();
    args.apply_to(&mut cfg);
    tracing::debug!(?cfg, "effective configuration");

    let user_prompt = match &args.prompt {
        Some(p) => p.clone(),
        None => ux::read_prompt()?,
    };

    let client = cfg.client()?;
    let root = Path::new(&cfg.root);
    let run = Uuid::new_v4();
    if args.debug {
        log::print_planned_paths(root, run);
    }

    let (request, composed) = client.prepare(&user_prompt);
    ux::show_preferences(request.preferences());

    if args.dry_run {
        ux::show_composed(&composed);
        return Ok(());
    }

    let mut saved = log::SavedPaths { dir: log::artifacts_dir(root, run), request: None, response: None };
    if args.save_request {
        saved.request = Some(log::save_request(root, run, client.endpoint_name(), &request, &composed)?);
    }

    let pb = ux::progress_bar(!args.no_progress);
    let sink = ux::progress_sink(&pb);
    let started = Instant::now();
    let result = client.generate(&user_prompt, Some(&sink)).await;
    pb.finish_and_clear();

    if args.save_response {
        saved.response = Some(log::save_response(root, run, &result)?);
    }
    if args.debug {
        log::print_saved_paths(&saved);
    }

    let Some(html) = result.html() else {
        ux::print_failure(&result);
        std::process::exit(1);
    };

    let out = Path::new(&cfg.out);
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(out, html)?;
    ux::print_success(out, html, started.elapsed());

    Ok(())
}
