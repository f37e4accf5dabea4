mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use setup_sam_core::{ActionsReporter, PlatformContext, Reporter};
use setup_sam_install::github::parse_base_url;
use setup_sam_install::{SetupOptions, run_setup};
use std::path::PathBuf;

const CACHE_DIR_NAME: &str = "setup-sam";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let reporter = ActionsReporter::new(cli.github_path.clone());

    if let Err(e) = run(&cli, &reporter) {
        reporter.set_failed(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli, reporter: &dyn Reporter) -> Result<()> {
    let platform = PlatformContext::detect()?;

    let options = SetupOptions {
        github_api_url: parse_base_url(&cli.github_api_url)
            .with_context(|| format!("invalid GitHub API URL '{}'", cli.github_api_url))?,
        github_server_url: parse_base_url(&cli.github_server_url)
            .with_context(|| format!("invalid GitHub server URL '{}'", cli.github_server_url))?,
        cache_dir: cache_root(cli)?,
    };
    log::debug!("Cache root: {}", options.cache_dir.display());

    run_setup(&cli.inputs(), &platform, &options, reporter)?;
    Ok(())
}

/// `--cache-dir`, else `<tool cache>/setup-sam`, else the OS cache directory
fn cache_root(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.cache_dir {
        return Ok(dir.clone());
    }

    if let Some(tool_cache) = cli.tool_cache.as_ref().filter(|p| !p.as_os_str().is_empty()) {
        return Ok(tool_cache.join(CACHE_DIR_NAME));
    }

    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_DIR_NAME))
        .context("could not determine a cache directory; set SETUP_SAM_CACHE_DIR")
}
