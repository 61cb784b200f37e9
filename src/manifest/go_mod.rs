//! go.mod parser and in-place rewriter
//!
//! Handles:
//! - module, go and toolchain directives
//! - require statements (single and block) with `// indirect` markers
//! - replace, exclude, retract, godebug, tool and ignore directives (kept verbatim)
//!
//! The file is kept as its original lines. Rewrites replace single version
//! tokens, so formatting an unmodified manifest reproduces the input exactly.

use crate::error::ManifestError;
use crate::version;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Directives accepted at the top level of a go.mod file
const KNOWN_DIRECTIVES: &[&str] = &[
    "module",
    "go",
    "toolchain",
    "godebug",
    "require",
    "exclude",
    "replace",
    "retract",
    "tool",
    "ignore",
];

/// A single `require` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Module path
    pub path: String,
    /// Required version
    pub version: String,
    /// Whether the entry carries an `// indirect` comment
    pub indirect: bool,
    line: usize,
    span: Range<usize>,
}

impl Requirement {
    /// 1-based line of the entry in the manifest
    pub fn line_number(&self) -> usize {
        self.line + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GoDirective {
    version: String,
    line: usize,
    span: Range<usize>,
}

/// A parsed go.mod file
#[derive(Debug, Clone)]
pub struct GoMod {
    path: PathBuf,
    lines: Vec<String>,
    module: Option<String>,
    module_line: Option<usize>,
    go: Option<GoDirective>,
    requires: Vec<Requirement>,
}

#[derive(Debug)]
struct Token<'a> {
    text: &'a str,
    span: Range<usize>,
}

impl Token<'_> {
    fn value(&self) -> &str {
        unquote(self.text)
    }
}

impl GoMod {
    /// Parse go.mod content; `path` is only used in error messages
    pub fn parse(path: impl AsRef<Path>, content: &str) -> Result<Self, ManifestError> {
        let path = path.as_ref().to_path_buf();
        let mut file = GoMod {
            path,
            lines: content.split('\n').map(str::to_string).collect(),
            module: None,
            module_line: None,
            go: None,
            requires: Vec::new(),
        };

        let mut block: Option<(String, usize)> = None;

        for index in 0..file.lines.len() {
            let line = file.lines[index].clone();
            let (code, comment) = split_comment(&line);
            let tokens = tokenize(code);

            if tokens.is_empty() {
                continue;
            }

            if let Some((verb, _)) = &block {
                if tokens.len() == 1 && tokens[0].text == ")" {
                    block = None;
                    continue;
                }
                if verb == "require" {
                    let req = file.parse_require(index, &tokens, comment)?;
                    file.requires.push(req);
                }
                continue;
            }

            let verb = tokens[0].text;
            if !KNOWN_DIRECTIVES.contains(&verb) {
                return Err(file.error(index, format!("unknown directive: {}", verb)));
            }

            if tokens.len() == 2 && tokens[1].text == "(" {
                block = Some((verb.to_string(), index));
                continue;
            }

            match verb {
                "module" => {
                    if tokens.len() != 2 {
                        return Err(file.error(index, "usage: module module/path"));
                    }
                    if file.module.is_some() {
                        return Err(file.error(index, "repeated module statement"));
                    }
                    file.module = Some(tokens[1].value().to_string());
                    file.module_line = Some(index);
                }
                "go" => {
                    if tokens.len() != 2 {
                        return Err(file.error(index, "usage: go 1.23"));
                    }
                    if file.go.is_some() {
                        return Err(file.error(index, "repeated go statement"));
                    }
                    file.go = Some(GoDirective {
                        version: tokens[1].value().to_string(),
                        line: index,
                        span: tokens[1].span.clone(),
                    });
                }
                "require" => {
                    let req = file.parse_require(index, &tokens[1..], comment)?;
                    file.requires.push(req);
                }
                _ => {}
            }
        }

        if let Some((verb, start)) = block {
            return Err(file.error(start, format!("unterminated {} block", verb)));
        }

        Ok(file)
    }

    fn parse_require(
        &self,
        index: usize,
        tokens: &[Token<'_>],
        comment: Option<&str>,
    ) -> Result<Requirement, ManifestError> {
        if tokens.len() != 2 {
            return Err(self.error(index, "usage: require module/path v1.2.3"));
        }

        let path = tokens[0].value().to_string();
        let version = tokens[1].value().to_string();
        if !version::is_valid(&version) {
            return Err(self.error(
                index,
                format!("invalid version '{}' for {}", version, path),
            ));
        }

        Ok(Requirement {
            path,
            version,
            indirect: comment.map(is_indirect_comment).unwrap_or(false),
            line: index,
            span: tokens[1].span.clone(),
        })
    }

    fn error(&self, index: usize, message: impl Into<String>) -> ManifestError {
        ManifestError::parse_error(&self.path, index + 1, message)
    }

    /// Path used when the manifest was parsed
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Module path from the `module` directive
    pub fn module_path(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Declared toolchain version from the `go` directive
    pub fn go_version(&self) -> Option<&str> {
        self.go.as_ref().map(|g| g.version.as_str())
    }

    /// All require entries in file order
    pub fn requirements(&self) -> &[Requirement] {
        &self.requires
    }

    /// Rewrite the version of every require entry for `module`.
    ///
    /// Returns true if any entry changed.
    pub fn set_requirement_version(&mut self, module: &str, new_version: &str) -> bool {
        let mut changed = false;

        for i in 0..self.requires.len() {
            if self.requires[i].path != module || self.requires[i].version == new_version {
                continue;
            }
            let line = self.requires[i].line;
            let span = self.requires[i].span.clone();
            self.lines[line].replace_range(span.clone(), new_version);

            let req = &mut self.requires[i];
            req.version = new_version.to_string();
            req.span = span.start..span.start + new_version.len();
            changed = true;
        }

        changed
    }

    /// Set the `go` directive, inserting one after `module` when missing.
    ///
    /// Returns true if the manifest changed.
    pub fn set_go_version(&mut self, new_version: &str) -> bool {
        if let Some(go) = &mut self.go {
            if go.version == new_version {
                return false;
            }
            self.lines[go.line].replace_range(go.span.clone(), new_version);
            go.span = go.span.start..go.span.start + new_version.len();
            go.version = new_version.to_string();
            return true;
        }

        let at = self.module_line.map(|l| l + 1).unwrap_or(0);
        let directive = format!("go {}", new_version);
        let inserted = if self.module_line.is_some() {
            vec![String::new(), directive]
        } else {
            vec![directive, String::new()]
        };
        let count = inserted.len();
        let go_line = if self.module_line.is_some() { at + 1 } else { at };

        self.lines.splice(at..at, inserted);
        for req in &mut self.requires {
            if req.line >= at {
                req.line += count;
            }
        }
        self.go = Some(GoDirective {
            version: new_version.to_string(),
            line: go_line,
            span: 3..3 + new_version.len(),
        });
        true
    }

    /// Serialize the manifest back to text
    pub fn format(&self) -> String {
        self.lines.join("\n")
    }
}

fn is_indirect_comment(comment: &str) -> bool {
    let text = comment.trim();
    text == "indirect" || text.starts_with("indirect;")
}

/// Split a line into its code and the text after `//`, ignoring `//` inside quotes
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' && q == b'"' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => {
                if b == b'"' || b == b'`' {
                    quote = Some(b);
                } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
                    return (&line[..i], Some(&line[i + 2..]));
                }
            }
        }
        i += 1;
    }

    (line, None)
}

/// Split code into whitespace separated tokens; quoted strings and parens stand alone
fn tokenize(code: &str) -> Vec<Token<'_>> {
    let bytes = code.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        if b == b'(' || b == b')' {
            i += 1;
        } else if b == b'"' || b == b'`' {
            i += 1;
            while i < bytes.len() && bytes[i] != b {
                if b == b'"' && bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(bytes.len());
        } else {
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && bytes[i] != b'('
                && bytes[i] != b')'
            {
                i += 1;
            }
        }

        tokens.push(Token {
            text: &code[start..i],
            span: start..i,
        });
    }

    tokens
}

fn unquote(text: &str) -> &str {
    if text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('`') && text.ends_with('`')))
    {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
