//! CLI command implementations

use anyhow::{Context, Result};
use polyconf::{CodecRegistry, Config, ConfigReader, Format};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where a configuration is read from
#[derive(Debug, Clone, Default)]
pub(crate) struct Source {
    pub(crate) path: Option<PathBuf>,
    pub(crate) format: Option<String>,
}

/// Where a configuration is written to
#[derive(Debug, Clone, Default)]
pub(crate) struct Target {
    pub(crate) path: Option<PathBuf>,
    pub(crate) format: Option<String>,
}

/// Format name implied by a file name
///
/// Uses the extension, or the name itself for dotfiles such as `.env`.
pub(crate) fn infer_format(path: &Path) -> Option<String> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return Some(ext.to_ascii_lowercase());
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix('.'))
        .filter(|n| !n.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Decode the source configuration
pub(crate) fn load(registry: &CodecRegistry, source: &Source, stdin: &mut dyn Read) -> Result<Config> {
    let format = source
        .format
        .clone()
        .or_else(|| source.path.as_deref().and_then(infer_format))
        .context("cannot tell the input format; pass --from")?;

    let name = source
        .path
        .as_deref()
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .unwrap_or("stdin");
    let mut config = Config::new(name, format);

    match &source.path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            config
                .read_from(registry, BufReader::new(file))
                .with_context(|| format!("cannot read {}", path.display()))?;
        }
        None => config
            .read_from(registry, stdin)
            .context("cannot read standard input")?,
    }
    tracing::info!(name = config.name(), format = config.format(), "configuration loaded");
    Ok(config)
}

/// Re-encode the source configuration in the target format
///
/// The target format defaults to the output extension, then to the input
/// format.
pub(crate) fn convert(
    registry: &CodecRegistry,
    source: &Source,
    target: &Target,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<()> {
    let mut config = load(registry, source, stdin)?;
    let format = target
        .format
        .clone()
        .or_else(|| target.path.as_deref().and_then(infer_format))
        .unwrap_or_else(|| config.format().to_string());
    config.set_format(format);

    let mut encoded = Vec::new();
    config
        .write_to(registry, &mut encoded)
        .with_context(|| format!("cannot write {} output", config.format()))?;

    match &target.path {
        Some(path) => write_atomically(path, &encoded),
        None => stdout.write_all(&encoded).context("cannot write standard output"),
    }
}

/// Print every key of the source configuration, one per line
pub(crate) fn keys(
    registry: &CodecRegistry,
    source: &Source,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<()> {
    let config = load(registry, source, stdin)?;
    for key in config.all_keys() {
        writeln!(stdout, "{key}")?;
    }
    Ok(())
}

/// Print the value stored under `key`
pub(crate) fn get(
    registry: &CodecRegistry,
    source: &Source,
    key: &str,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<()> {
    let config = load(registry, source, stdin)?;
    let value = config.get_string(key)?;
    writeln!(stdout, "{value}")?;
    Ok(())
}

/// Print each built-in format with its aliases
pub(crate) fn formats(stdout: &mut dyn Write) -> Result<()> {
    for format in Format::ALL {
        let descriptor = format.descriptor();
        if descriptor.aliases.is_empty() {
            writeln!(stdout, "{}", descriptor.name)?;
        } else {
            writeln!(stdout, "{} ({})", descriptor.name, descriptor.aliases.join(", "))?;
        }
    }
    Ok(())
}

/// Write `bytes` to a sibling temporary file, then move it over `path`
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temporary file in {}", dir.display()))?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)
        .with_context(|| format!("cannot replace {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn run_keys(source: &Source, input: &str) -> String {
        let mut out = Vec::new();
        keys(CodecRegistry::global(), source, &mut input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn infer_format_from_names() {
        assert_eq!(infer_format(Path::new("app.YML")).as_deref(), Some("yml"));
        assert_eq!(infer_format(Path::new("/etc/app/settings.toml")).as_deref(), Some("toml"));
        assert_eq!(infer_format(Path::new(".env")).as_deref(), Some("env"));
        assert_eq!(infer_format(Path::new("Makefile")), None);
    }

    #[test]
    fn keys_from_stdin() {
        let source = Source {
            path: None,
            format: Some("json".to_string()),
        };
        assert_eq!(run_keys(&source, r#"{"db": {"host": "h", "port": 1}}"#), "db.host\ndb.port\n");
    }

    #[test]
    fn missing_format_is_reported() {
        let err = load(CodecRegistry::global(), &Source::default(), &mut "".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("--from"));
    }

    #[test]
    fn get_prints_value() {
        let source = Source {
            path: None,
            format: Some("ini".to_string()),
        };
        let mut out = Vec::new();
        get(
            CodecRegistry::global(),
            &source,
            "db.user",
            &mut "[db]\nuser=root\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "root\n");
    }

    #[test]
    fn convert_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("app.yaml");
        let output = dir.path().join("app.env");
        fs::write(&input, "db:\n  max_conns: 5\n").unwrap();

        let source = Source {
            path: Some(input),
            format: None,
        };
        let target = Target {
            path: Some(output.clone()),
            format: None,
        };
        convert(
            CodecRegistry::global(),
            &source,
            &target,
            &mut std::io::empty(),
            &mut std::io::sink(),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(output).unwrap(), "DB_MAX_CONNS=5\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn failed_convert_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("app.json");
        fs::write(&output, "{}").unwrap();

        let source = Source {
            path: None,
            format: Some("yaml".to_string()),
        };
        let target = Target {
            path: Some(output.clone()),
            format: None,
        };
        let err = convert(
            CodecRegistry::global(),
            &source,
            &target,
            &mut "a: [".as_bytes(),
            &mut std::io::sink(),
        );

        assert!(err.is_err());
        assert_eq!(fs::read_to_string(output).unwrap(), "{}");
    }

    #[test]
    fn convert_unknown_target_format() {
        let source = Source {
            path: None,
            format: Some("json".to_string()),
        };
        let target = Target {
            path: None,
            format: Some("toon".to_string()),
        };
        let err = convert(
            CodecRegistry::global(),
            &source,
            &target,
            &mut "{}".as_bytes(),
            &mut std::io::sink(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("toon"));
    }

    #[test]
    fn formats_lists_aliases() {
        let mut out = Vec::new();
        formats(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("yaml (yml)"));
        assert!(text.contains("properties (props, prop)"));
        assert_eq!(text.lines().count(), 8);
    }
}
