//! Vellum command-line viewer.
//!
//! Loads a file or URL into a browser pane and prints what the pane ended up
//! with. The main thread plays the interface thread and pumps the event
//! loop; the load itself is driven from a worker thread, the way a host
//! application would call into the pane.
//!
//! Usage: `vellum-view <path-or-url> [pane.toml]`. The config path can also
//! come from `VELLUM_CONFIG`.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result, bail};

use vellum_pane::{BrowserPane, EventLoop, LinkEvent, PaneConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(target) = args.next() else {
        bail!("usage: vellum-view <path-or-url> [pane.toml]");
    };
    let config = match args.next().or_else(|| std::env::var("VELLUM_CONFIG").ok()) {
        Some(path) => PaneConfig::from_file(&path)
            .with_context(|| format!("loading pane config from {path}"))?,
        None => PaneConfig::default(),
    };
    log::debug!("pane config: {}", config.to_json()?);

    let event_loop = EventLoop::new();
    let marshal = event_loop.marshaller();
    let pane = Arc::new(BrowserPane::new(&marshal, config));
    pane.set_link_listener(|e: &LinkEvent| log::info!("link activated: {}", e.request_url));

    let worker_pane = Arc::clone(&pane);
    let quit = marshal.clone();
    let worker = thread::spawn(move || -> Result<()> {
        if Path::new(&target).is_file() {
            worker_pane.read_text_from_file(&target);
        } else {
            worker_pane.read_text_from_url(&target);
        }
        let flushed = worker_pane.flush();
        quit.quit();
        flushed?;
        Ok(())
    });

    event_loop.run();
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("loader thread panicked"))??;

    print_summary(&pane);
    Ok(())
}

fn print_summary(pane: &BrowserPane) {
    let meta = pane.metadata();
    println!("page:         {}", meta.page_url);
    println!("content type: {}", meta.content_type);
    if let Some(title) = pane.title() {
        println!("title:        {title}");
    }

    let document = pane.widget().document();
    println!("length:       {} positions", document.len());
    println!();
    println!("{}", document.to_plain_text());

    if !document.anchors().is_empty() {
        println!();
        println!("links:");
        for anchor in document.anchors() {
            let label = document.slice(anchor.start, anchor.end);
            println!("  [{}..{}] {label} -> {}", anchor.start, anchor.end, anchor.href);
        }
    }

    let images = document.images();
    if !images.is_empty() {
        println!();
        println!("images:");
        for image in images {
            match &image.image {
                Some(decoded) => println!("  {} ({}x{})", image.src, decoded.width, decoded.height),
                None => println!("  {} (not loaded)", image.src),
            }
        }
    }
}
