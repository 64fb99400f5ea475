use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::{env, sync::Arc};
use tokio::io::AsyncReadExt;

use txtcore::document::split_lines;
use txtcore::StyleTag;
use txturl::codec::{Codec, DeflateCodec};
use txturl::config::Config;
use txturl::render;
use txturl::share::{token_from_input, ShareLocation};
use txturl::{HeadlessSurface, Session};

const USAGE: &str = "\
Usage: txturl <command> [args]

Commands:
  encode [FILE]               Print the shareable address for FILE (or stdin)
  decode <ADDRESS|TOKEN>      Print the document carried by an address
  styles [FILE] [--json]      Print the style of every line
  html [FILE]                 Render the document as styled HTML
  export <ADDRESS|TOKEN> [DIR]  Write the document to DIR (default: .)";

#[derive(Serialize)]
struct LineStyle<'a> {
    line: usize,
    style: StyleTag,
    text: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Warn);
        logger.filter_module("txturl", LevelFilter::Info);
    }
    logger.init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let config = match Config::load().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    let rest = &args[1..];
    let result = match command.as_str() {
        "encode" => encode(&config, rest.first()).await,
        "decode" => decode(rest.first()).await,
        "styles" => styles(rest).await,
        "html" => html(rest.first()).await,
        "export" => export(&config, rest.first(), rest.get(1)).await,
        "-h" | "--help" | "help" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = &result {
        log::error!("{} failed: {:#}", command, e);
    }
    result
}

async fn read_input(path: Option<&String>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path)),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn required_token(input: Option<&String>) -> Result<String> {
    let Some(input) = input else {
        bail!("An address or token is required\n\n{}", USAGE);
    };
    match token_from_input(input) {
        Some(token) => Ok(token),
        None => bail!("No token found in {:?}", input),
    }
}

async fn encode(config: &Config, path: Option<&String>) -> Result<()> {
    let text = read_input(path).await?;
    let mut location = ShareLocation::new(config.share.base_address.clone());
    if !text.trim().is_empty() {
        location.set_token(Some(DeflateCodec.encode(&text).await?));
    }
    println!("{}", location.href());
    Ok(())
}

async fn decode(input: Option<&String>) -> Result<()> {
    let token = required_token(input)?;
    let text = DeflateCodec
        .decode(&token)
        .await
        .context("Could not restore document from link.")?;
    println!("{}", text);
    Ok(())
}

async fn styles(args: &[String]) -> Result<()> {
    let json = args.iter().any(|arg| arg == "--json");
    let path = args.iter().find(|arg| !arg.starts_with("--"));
    let lines = split_lines(&read_input(path).await?);
    let tags = txtcore::classify(&lines);

    if json {
        let rows: Vec<LineStyle> = lines
            .iter()
            .zip(&tags)
            .enumerate()
            .map(|(line, (text, style))| LineStyle {
                line,
                style: *style,
                text: text.as_str(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for (text, style) in lines.iter().zip(&tags) {
            println!("{:<14} {}", style.as_str(), text);
        }
    }
    Ok(())
}

async fn html(path: Option<&String>) -> Result<()> {
    let lines = split_lines(&read_input(path).await?);
    println!("{}", render::document_to_html(&lines));
    Ok(())
}

async fn export(config: &Config, input: Option<&String>, dir: Option<&String>) -> Result<()> {
    let token = required_token(input)?;
    let dir = dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let mut session = Session::new(HeadlessSurface::new(), Arc::new(DeflateCodec), config);
    session.load(Some(&token)).await;
    if session.location().token().is_none() {
        bail!("Could not restore document from link.");
    }

    let path = session.export(Path::new(&dir)).await?;
    println!("{}", path.display());
    Ok(())
}
