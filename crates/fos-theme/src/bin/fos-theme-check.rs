//! fos-theme-check - load theme stylesheets and report problems
//!
//! Usage: fos-theme-check [--json] [--dump] FILE...

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use fos_theme::{CssError, ImportResolver, StyleProvider};
use tracing_subscriber::EnvFilter;

/// Resolves `@import`s relative to the importing file
struct FileResolver;

impl ImportResolver for FileResolver {
    fn resolve(&self, base: Option<&str>, url: &str) -> Result<(String, String), String> {
        let url = url.strip_prefix("file://").unwrap_or(url);
        let path = match base.and_then(|base| Path::new(base).parent()) {
            Some(dir) => dir.join(url),
            None => PathBuf::from(url),
        };
        let path = path.canonicalize().map_err(|e| format!("{}: {e}", path.display()))?;
        let text = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        Ok((path.display().to_string(), text))
    }
}

struct Options {
    json: bool,
    dump: bool,
    files: Vec<PathBuf>,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut options = Options {
        json: false,
        dump: false,
        files: Vec::new(),
    };

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => options.json = true,
            "--dump" => options.dump = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            file => options.files.push(PathBuf::from(file)),
        }
    }

    if options.files.is_empty() {
        bail!("usage: fos-theme-check [--json] [--dump] FILE...");
    }
    Ok(options)
}

fn report(file: &Path, errors: &[CssError], json: bool) -> anyhow::Result<()> {
    if json {
        let report = serde_json::json!({
            "file": file.display().to_string(),
            "errors": errors,
        });
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    for error in errors {
        let level = if error.is_warning() { "warning" } else { "error" };
        eprintln!("{level}[{}]: {error}", error.kind.as_str());
    }
    Ok(())
}

/// Returns whether the file loaded without hard errors
fn check(file: &Path, options: &Options) -> anyhow::Result<bool> {
    let path = file
        .canonicalize()
        .with_context(|| format!("cannot open {}", file.display()))?;
    let text = std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
    let name = path.display().to_string();

    let mut provider = StyleProvider::new();
    let ok = provider.load_named(&text, Some(&name), &FileResolver).is_ok();
    tracing::info!(file = %name, rulesets = provider.rulesets().len(), ok, "checked stylesheet");

    let errors = provider.take_errors();
    report(file, &errors, options.json)?;

    if options.dump {
        print!("{provider}");
    }
    Ok(ok)
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args()?;

    let mut failed = false;
    for file in &options.files {
        if !check(file, &options)? {
            failed = true;
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
