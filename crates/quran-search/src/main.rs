use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use quran_db::{Corpus, LoadMode, LoadOptions};
use quran_search::{Query, run};
use quran_types::SimplificationLevel;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DATA_IMAGE_DIR: &str = "/usr/share/quran";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!(
        "using corpus at {} (mode: {}, text: {})",
        config.data_dir.display(),
        config.load_mode,
        config.text_mode
    );
    let query = Query::parse(config.args.as_slice())?;

    let start = Instant::now();
    let options = LoadOptions {
        mode: config.load_mode,
        text_mode: config.text_mode,
        translations: config.translations,
    };
    let corpus = Corpus::load_with(&config.data_dir, &options)?;
    info!("corpus loaded in {} ms", start.elapsed().as_millis());

    let value = run(&corpus, &query)?;
    let rendered = serde_json::to_string_pretty(&value).context("render result")?;
    println!("{rendered}");
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    data_dir: PathBuf,
    load_mode: LoadMode,
    text_mode: SimplificationLevel,
    translations: Option<Vec<String>>,
    args: Vec<String>,
}

fn load_config() -> Config {
    let mut cli_data_dir: Option<PathBuf> = None;
    let mut cli_load_mode: Option<LoadMode> = None;
    let mut cli_text_mode: Option<SimplificationLevel> = None;
    let mut cli_translations: Option<Vec<String>> = None;
    let mut rest = Vec::new();
    let mut args = env::args().skip(1).peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                if let Some(path) = args.next() {
                    cli_data_dir = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--data-dir=") {
                    cli_data_dir = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
                    cli_load_mode = parse_load_mode(mode);
                } else if let Some(level) = arg.strip_prefix("--text-mode=") {
                    cli_text_mode = parse_text_mode(level);
                } else if let Some(ids) = arg.strip_prefix("--translations=") {
                    cli_translations = Some(parse_list(ids));
                } else {
                    rest.push(arg);
                }
            }
        }
    }

    let data_dir = cli_data_dir
        .or_else(|| env::var("QURAN_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(default_data_dir);
    let load_mode = cli_load_mode
        .or_else(|| {
            env::var("QURAN_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or_default();
    let text_mode = cli_text_mode
        .or_else(|| {
            env::var("QURAN_TEXT_MODE")
                .ok()
                .as_deref()
                .and_then(parse_text_mode)
        })
        .unwrap_or_default();
    let translations = cli_translations.or_else(|| {
        env::var("QURAN_TRANSLATIONS")
            .ok()
            .map(|ids| parse_list(&ids))
    });

    Config {
        data_dir,
        load_mode,
        text_mode,
        translations,
        args: rest,
    }
}

fn default_data_dir() -> PathBuf {
    let local = PathBuf::from(DEFAULT_DATA_DIR);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_DATA_IMAGE_DIR)
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.parse() {
        Ok(mode) => Some(mode),
        Err(err) => {
            warn!("ignoring load mode: {err}");
            None
        }
    }
}

fn parse_text_mode(raw: &str) -> Option<SimplificationLevel> {
    match raw.parse() {
        Ok(level) => Some(level),
        Err(err) => {
            warn!("ignoring text mode: {err}");
            None
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
