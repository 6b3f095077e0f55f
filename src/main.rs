// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Skiff CLI - Programmable Headless Web Client
//!
//! Thin command-line front end over the skiff library.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::sync::mpsc;

use skiff::{agent, Asset, Browser, BrowserConfig, Downloader};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("skiff=info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return ExitCode::from(1);
    };

    let result = match command.as_str() {
        "fetch" | "links" | "forms" | "assets" | "download" => run(command, &args[1..]).await,
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("skiff {}", skiff::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Skiff - Programmable Headless Web Client

USAGE:
    skiff <COMMAND> <url> [OPTIONS]

COMMANDS:
    fetch <url>             Fetch a URL and display page information
    links <url>             List the links of a page
    forms <url>             List the forms of a page and their fields
    assets <url>            List images, stylesheets and scripts
    download <url> <dir>    Download every asset of a page into <dir>
    help                    Show this help message
    version                 Show version information

OPTIONS:
    --agent <name>          Impersonate a browser (chrome, firefox, msie,
                            opera, safari, aol, konqueror, netscape, lynx)
    --user-agent <string>   Send a literal User-Agent
    --header <name:value>   Add a request header (repeatable)

EXAMPLES:
    skiff fetch https://example.com
    skiff forms https://example.com/login --agent firefox
    skiff download https://example.com ./assets
"#
    );
}

struct Options {
    url: String,
    positional: Vec<String>,
    config: BrowserConfig,
}

fn parse_options(args: &[String]) -> anyhow::Result<Options> {
    let mut positional = Vec::new();
    let mut config = BrowserConfig::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--agent" => {
                let name = iter.next().context("--agent needs a browser name")?;
                config = config.user_agent(named_agent(name)?);
            }
            "--user-agent" => {
                let value = iter.next().context("--user-agent needs a value")?;
                config = config.user_agent(value.as_str());
            }
            "--header" => {
                let value = iter.next().context("--header needs name:value")?;
                let (name, value) = value
                    .split_once(':')
                    .with_context(|| format!("header '{}' is not name:value", value))?;
                config = config.header(name.trim(), value.trim());
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            _ => positional.push(arg.clone()),
        }
    }

    if positional.is_empty() {
        bail!("missing <url>");
    }
    let url = positional.remove(0);
    Ok(Options {
        url,
        positional,
        config,
    })
}

fn named_agent(name: &str) -> anyhow::Result<String> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "chrome" => agent::chrome(),
        "firefox" => agent::firefox(),
        "msie" | "ie" => agent::msie(),
        "opera" => agent::opera(),
        "safari" => agent::safari(),
        "aol" => agent::aol(),
        "konqueror" => agent::konqueror(),
        "netscape" => agent::netscape(),
        "lynx" => agent::lynx(),
        other => bail!("unknown browser '{}'", other),
    })
}

async fn run(command: &str, args: &[String]) -> anyhow::Result<()> {
    let options = parse_options(args)?;
    let mut browser = Browser::new(options.config).context("failed to create browser")?;

    browser
        .open(&options.url)
        .await
        .with_context(|| format!("failed to open {}", options.url))?;

    match command {
        "fetch" => print_page(&browser),
        "links" => print_links(&browser),
        "forms" => print_forms(&browser),
        "assets" => print_assets(&browser),
        "download" => {
            let dir = options
                .positional
                .first()
                .map(PathBuf::from)
                .context("missing <dir>")?;
            download_assets(&browser, &dir).await
        }
        other => bail!("unknown command {}", other),
    }
}

fn print_page(browser: &Browser) -> anyhow::Result<()> {
    let state = browser.state()?;
    println!("\n=== Response ===");
    println!("Status: {}", state.status);
    println!("URL: {}", state.url);
    println!(
        "Content-Type: {}",
        state
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
    );
    println!("Size: {} bytes", state.body.len());

    println!("\n=== Page ===");
    println!("Title: {}", browser.title()?);

    let links = browser.links()?;
    if !links.is_empty() {
        println!("\n=== Links ({}) ===", links.len());
        for link in links.iter().take(10) {
            println!("  - {}", link.url);
        }
        if links.len() > 10 {
            println!("  ... and {} more", links.len() - 10);
        }
    }

    let forms = browser.forms()?;
    if !forms.is_empty() {
        println!("\n=== Forms ({}) ===", forms.len());
        for form in &forms {
            println!(
                "  - {} {} ({} fields)",
                form.method,
                if form.action.is_empty() {
                    "(current)"
                } else {
                    form.action.as_str()
                },
                form.fields.len()
            );
        }
    }
    Ok(())
}

fn print_links(browser: &Browser) -> anyhow::Result<()> {
    for link in browser.links()? {
        if link.text.is_empty() {
            println!("{}", link.url);
        } else {
            println!("{}\t{}", link.url, link.text);
        }
    }
    Ok(())
}

fn print_forms(browser: &Browser) -> anyhow::Result<()> {
    let forms = browser.forms()?;
    if forms.is_empty() {
        println!("No forms found on page");
        return Ok(());
    }

    let state = browser.state()?;
    for (i, form) in forms.iter().enumerate() {
        println!("\nForm #{}", i + 1);
        println!("  ID: {}", form.id.as_deref().unwrap_or("-"));
        println!("  Name: {}", form.name.as_deref().unwrap_or("-"));
        println!("  Action: {}", form.action_url(&state.base_url(), &state.url)?);
        println!("  Method: {}", form.method);
        println!("  Fields:");
        for field in &form.fields {
            println!(
                "    - {} ({:?}) = {:?}{}",
                field.name,
                field.kind,
                field.values,
                if field.options.is_empty() {
                    String::new()
                } else {
                    format!(" of {:?}", field.options)
                }
            );
        }
        for button in &form.buttons {
            println!("    [submit] {}={}", button.name, button.value);
        }
    }
    Ok(())
}

fn print_assets(browser: &Browser) -> anyhow::Result<()> {
    for image in browser.images()? {
        println!("image\t{}\t{}", image.url, image.alt);
    }
    for sheet in browser.stylesheets()? {
        println!("stylesheet\t{}\t{}", sheet.url, sheet.media);
    }
    for script in browser.scripts()? {
        println!("script\t{}\t{}", script.url, script.content_type);
    }
    Ok(())
}

async fn download_assets(browser: &Browser, dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut assets: Vec<Arc<dyn Asset>> = Vec::new();
    assets.extend(browser.images()?.into_iter().map(|a| Arc::new(a) as Arc<dyn Asset>));
    assets.extend(browser.stylesheets()?.into_iter().map(|a| Arc::new(a) as Arc<dyn Asset>));
    assets.extend(browser.scripts()?.into_iter().map(|a| Arc::new(a) as Arc<dyn Asset>));

    if assets.is_empty() {
        println!("No assets found on page");
        return Ok(());
    }

    let downloader: Downloader = browser.downloader();
    let (tx, mut rx) = mpsc::channel(assets.len());
    for (i, asset) in assets.iter().enumerate() {
        let path = dir.join(file_name(i, asset.url()));
        let file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("failed to create {}", path.display()))?;
        downloader.download_async(asset.clone(), file, tx.clone());
    }
    drop(tx);

    let mut failed = 0;
    while let Some(result) = rx.recv().await {
        match result.error {
            None => println!("{:>10}  {}", result.size, result.asset.url()),
            Some(e) => {
                failed += 1;
                eprintln!("{:>10}  {} ({})", "FAILED", result.asset.url(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} downloads failed", failed, assets.len());
    }
    Ok(())
}

/// Last path segment of the URL, prefixed to keep names unique
fn file_name(index: usize, url: &url::Url) -> String {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .unwrap_or("index");
    format!("{:03}-{}", index, last)
}
