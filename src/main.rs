use anyhow::{bail, Context as _, Result};
use clap::Parser;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use landingkit::{
    cli::{Args, Command},
    AnyFetcher, MemoryDocument, PageContext, RecordingNavigator, Settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    landingkit::telemetry::init_tracing(&settings.log);

    match args.command {
        Command::Apply {
            page,
            dom,
            root,
            out,
        } => apply(&settings, &page, &dom, root, out).await,
        Command::Envs { page, dom, root } => envs(&settings, &page, &dom, root).await,
        Command::Template { root, name } => {
            let tpl = landingkit::load_template(&root, &name)?;
            println!("{}", serde_json::to_string_pretty(&tpl)?);
            Ok(())
        }
    }
}

fn fetcher_for(settings: &Settings, root: Option<PathBuf>) -> AnyFetcher {
    AnyFetcher::from_root(root.as_deref().or(settings.fetch.root.as_deref()))
}

async fn apply(
    settings: &Settings,
    page: &str,
    dom_path: &Path,
    root: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let page = PageContext::parse(page)?;
    let mut dom = MemoryDocument::load_from_path(dom_path)?;
    let fetcher = fetcher_for(settings, root);
    let navigator = Arc::new(RecordingNavigator::new());

    let outcome = landingkit::apply_page_config(
        &page,
        &settings.applier,
        &mut dom,
        &fetcher,
        navigator.clone(),
    )
    .await;

    if let Some(redirect) = outcome.into_report().and_then(|r| r.redirect) {
        redirect.wait().await;
    }

    let text = serde_json::to_string_pretty(&dom)?;
    match out {
        Some(path) => fs::write(&path, text)
            .with_context(|| format!("failed to write snapshot: {}", path.display()))?,
        None => println!("{text}"),
    }

    for href in navigator.history() {
        println!("navigate: {href}");
    }
    Ok(())
}

async fn envs(
    settings: &Settings,
    page: &str,
    dom_path: &Path,
    root: Option<PathBuf>,
) -> Result<()> {
    let page = PageContext::parse(page)?;
    let mut dom = MemoryDocument::load_from_path(dom_path)?;
    let fetcher = fetcher_for(settings, root);

    landingkit::init_configuration(page.url(), &settings.selector, &mut dom, &fetcher).await?;

    let Some(selector) = dom.element(&settings.selector.element_id) else {
        bail!("selector element #{} not found", settings.selector.element_id);
    };
    for option in &selector.options {
        println!("{}\t{}", option.label, option.value);
    }
    Ok(())
}
