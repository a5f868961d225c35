//! `.env` file loader.
//!
//! Reads `KEY=value` files and exports the values into the process environment
//! before the command line is parsed, so `clap`'s `env` fallbacks see them.
//!
//! Supported syntax:
//! - blank lines and `#` comments
//! - optional `export ` prefix
//! - single or double quoted values
//! - inline comments after ` #` in unquoted values
//! - escapes `\n`, `\r`, `\t`, `\"`, `\'`
//! - `${VAR}` references (with [`Options::expand`])

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Files read by [`load_default`], in order.
pub const DEFAULT_FILES: &[&str] = &[".env", ".env.local"];

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Later files override earlier ones, and loaded values override variables
    /// already present in the process environment.
    pub overwrite: bool,
    /// Resolve `${VAR}` references against loaded values, then the process
    /// environment. Unknown variables expand to the empty string.
    pub expand: bool,
}

#[derive(Debug)]
pub enum EnvError {
    Io(PathBuf, std::io::Error),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::Io(path, e) => write!(f, "env file {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvError::Io(_, e) => Some(e),
        }
    }
}

/// Loads `.env` then `.env.local` from the working directory.
pub fn load_default(opts: Options) -> Result<BTreeMap<String, String>, EnvError> {
    load(DEFAULT_FILES, opts)
}

/// Loads the given files (`.env` when empty) and exports their values.
///
/// Missing files and directories are skipped. Must be called before any other
/// thread is spawned, since it mutates the process environment.
pub fn load<P: AsRef<Path>>(
    files: &[P],
    opts: Options,
) -> Result<BTreeMap<String, String>, EnvError> {
    let paths: Vec<&Path> = if files.is_empty() {
        vec![Path::new(".env")]
    } else {
        files.iter().map(|p| p.as_ref()).collect()
    };

    let mut values = BTreeMap::new();
    for path in paths {
        if path.as_os_str().is_empty() {
            continue;
        }
        if !path.is_file() {
            debug!(path = %path.display(), "skipping missing or directory env file");
            continue;
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| EnvError::Io(path.to_path_buf(), e))?;
        // Within one file the last assignment wins; across files the first does.
        let file_values: BTreeMap<String, String> = parse(&content).into_iter().collect();
        for (k, v) in file_values {
            if opts.overwrite || !values.contains_key(&k) {
                values.insert(k, v);
            }
        }
        debug!(path = %path.display(), "loaded env file");
    }

    if opts.expand {
        let raw = values.clone();
        for v in values.values_mut() {
            *v = expand(v, |name| {
                raw.get(name)
                    .cloned()
                    .or_else(|| std::env::var(name).ok())
            });
        }
    }

    for (k, v) in &values {
        if std::env::var_os(k).is_some() && !opts.overwrite {
            continue;
        }
        // SAFETY: called during startup before the runtime spawns threads.
        unsafe { std::env::set_var(k, v) };
    }

    Ok(values)
}

/// Parses file content into key/value pairs, in file order.
pub fn parse(content: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for line in content.lines() {
        let mut line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("export ") {
            line = rest.trim();
        }
        if let Some((k, v)) = split_kv(line)
            && !k.is_empty()
        {
            out.push((k, v));
        }
    }
    out
}

fn split_kv(line: &str) -> Option<(String, String)> {
    let mut esc = false;
    let mut split = None;
    for (idx, c) in line.char_indices() {
        if c == '\\' {
            esc = !esc;
            continue;
        }
        if c == '=' && !esc {
            split = Some(idx);
            break;
        }
        esc = false;
    }
    let idx = split?;
    let key = line[..idx].trim().to_string();
    let raw = line[idx + 1..].trim();
    let val = match strip_quotes(raw) {
        Some(inner) => inner,
        None => trim_inline_comment(raw),
    };
    Some((key, unescape(val)))
}

fn strip_quotes(s: &str) -> Option<&str> {
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        return Some(&s[1..s.len() - 1]);
    }
    None
}

/// Cuts at the first `#` that starts the value or follows a space.
fn trim_inline_comment(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1] == b' ') {
            return s[..i].trim();
        }
    }
    s.trim()
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('\\') => {
                chars.next();
                out.push_str("\\\\");
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some(q @ ('"' | '\'')) => {
                chars.next();
                out.push(q);
            }
            _ => out.push('\\'),
        }
    }
    out
}

/// Replaces `${NAME}` with `lookup(NAME)`, or "" when unknown.
/// An unterminated `${` is kept literally.
fn expand(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        if let Some(v) = lookup(name) {
            out.push_str(&v);
        }
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(content: &str) -> Vec<(String, String)> {
        parse(content)
    }

    fn kv(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_parse_basic() {
        let content = "\n# comment\nPORT=3333\nexport NAME = kubemgr \nBROKEN\n=novalue\n";
        assert_eq!(pairs(content), vec![kv("PORT", "3333"), kv("NAME", "kubemgr")]);
    }

    #[test]
    fn test_parse_quotes_and_comments() {
        let content = concat!(
            "A=\"hello world\"\n",
            "B='single # not a comment'\n",
            "C=value # trailing comment\n",
            "D=pass#word\n",
            "E=#all comment\n",
        );
        assert_eq!(
            pairs(content),
            vec![
                kv("A", "hello world"),
                kv("B", "single # not a comment"),
                kv("C", "value"),
                kv("D", "pass#word"),
                kv("E", ""),
            ]
        );
    }

    #[test]
    fn test_parse_escapes() {
        let content = "A=\"line1\\nline2\\tx\"\nB=a\\=b=c\nC=keep\\\\n\n";
        assert_eq!(
            pairs(content),
            vec![
                kv("A", "line1\nline2\tx"),
                kv("B", "a\\=b=c"),
                kv("C", "keep\\\\n"),
            ]
        );
    }

    #[test]
    fn test_expand() {
        let lookup = |name: &str| match name {
            "HOST" => Some("localhost".to_string()),
            _ => None,
        };
        assert_eq!(expand("http://${HOST}:1", lookup), "http://localhost:1");
        assert_eq!(expand("${MISSING}x", lookup), "x");
        assert_eq!(expand("${HOST", lookup), "${HOST");
        assert_eq!(expand("$HOST", lookup), "$HOST");
    }

    #[test]
    fn test_load_order_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join(".env");
        let second = dir.path().join(".env.local");
        std::fs::write(
            &first,
            "KUBEMGR_TEST_LOAD_A=one\nKUBEMGR_TEST_LOAD_URL=http://${KUBEMGR_TEST_LOAD_A}\n",
        )
        .unwrap();
        std::fs::write(&second, "KUBEMGR_TEST_LOAD_A=two\n").unwrap();
        let missing = dir.path().join("missing.env");

        let values = load(
            &[&first, &second, &missing],
            Options {
                overwrite: false,
                expand: true,
            },
        )
        .unwrap();

        assert_eq!(values["KUBEMGR_TEST_LOAD_A"], "one");
        assert_eq!(values["KUBEMGR_TEST_LOAD_URL"], "http://one");
        assert_eq!(std::env::var("KUBEMGR_TEST_LOAD_URL").unwrap(), "http://one");
    }

    #[test]
    fn test_load_repeated_key_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join(".env");
        let second = dir.path().join(".env.local");
        std::fs::write(&first, "KUBEMGR_TEST_REPEAT=first\nKUBEMGR_TEST_REPEAT=second\n").unwrap();
        std::fs::write(&second, "KUBEMGR_TEST_REPEAT=third\n").unwrap();

        let values = load(&[&first, &second], Options::default()).unwrap();
        assert_eq!(values["KUBEMGR_TEST_REPEAT"], "second");
        assert_eq!(std::env::var("KUBEMGR_TEST_REPEAT").unwrap(), "second");
    }

    #[test]
    fn test_load_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.env");
        let second = dir.path().join("b.env");
        std::fs::write(&first, "KUBEMGR_TEST_OVERWRITE=one\n").unwrap();
        std::fs::write(&second, "KUBEMGR_TEST_OVERWRITE=two\n").unwrap();

        let values = load(
            &[&first, &second],
            Options {
                overwrite: true,
                expand: false,
            },
        )
        .unwrap();
        assert_eq!(values["KUBEMGR_TEST_OVERWRITE"], "two");
        assert_eq!(std::env::var("KUBEMGR_TEST_OVERWRITE").unwrap(), "two");
    }
}
