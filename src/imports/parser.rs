//! Import section scanner for Go source files
//!
//! Reads the package clause and the run of import declarations that follows
//! it. Everything after the last import declaration is left untouched, so
//! only the import section needs to be understood.

use crate::error::SourceError;
use std::ops::Range;
use std::path::Path;

/// One import spec with the comments attached to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Unquoted import path
    pub path: String,
    /// Alias, `_` or `.`, if any
    pub name: Option<String>,
    /// Path literal as written, quotes included
    pub literal: String,
    /// Comments on the lines directly above the spec
    pub leading: Vec<String>,
    /// Comment following the spec on the same line
    pub trailing: Option<String>,
    /// 1-based line of the path literal
    pub line: usize,
}

/// The import declarations of a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSection {
    /// Specs in source order
    pub specs: Vec<ImportSpec>,
    /// Comments inside a group that precede its closing parenthesis
    pub dangling: Vec<String>,
    /// Byte range from the first `import` keyword to the end of the last declaration
    pub span: Option<Range<usize>>,
}

impl ImportSection {
    /// Returns true if the file imports the cgo pseudo-package
    pub fn has_cgo(&self) -> bool {
        self.specs.iter().any(|s| s.path == "C")
    }
}

/// Parse the import section of `src`
pub fn parse_imports(path: &Path, src: &str) -> Result<ImportSection, SourceError> {
    let mut scanner = Scanner::new(src);
    scanner
        .parse_file()
        .map_err(|(pos, message)| SourceError::parse_error(path, line_at(src, pos), message))
}

fn line_at(src: &str, pos: usize) -> usize {
    src[..pos.min(src.len())].matches('\n').count() + 1
}

type ScanResult<T> = Result<T, (usize, String)>;

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error<T>(&self, message: impl Into<String>) -> ScanResult<T> {
        Err((self.pos, message.into()))
    }

    /// Skip spaces and tabs (and `\r`), not newlines
    fn skip_inline_space(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Skip whitespace and comments, returning the comments seen
    fn skip_trivia(&mut self) -> ScanResult<Vec<String>> {
        let mut comments = Vec::new();
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                Some('/') => match self.comment()? {
                    Some(comment) => comments.push(comment.to_string()),
                    None => break,
                },
                _ => break,
            }
        }
        Ok(comments)
    }

    /// Read a `//` or `/* */` comment at the cursor
    fn comment(&mut self) -> ScanResult<Option<&'a str>> {
        let rest = self.rest();
        if rest.starts_with("//") {
            let end = rest.find('\n').unwrap_or(rest.len());
            let text = rest[..end].trim_end_matches('\r');
            self.pos += end;
            Ok(Some(text))
        } else if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(i) => {
                    let text = &rest[..i + 4];
                    self.pos += i + 4;
                    Ok(Some(text))
                }
                None => self.error("comment not terminated"),
            }
        } else {
            Ok(None)
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|&(i, c)| !(c == '_' || c.is_alphabetic() || (i > 0 && c.is_numeric())))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(&rest[..end])
    }

    /// Returns true if the cursor sits on `keyword` as a whole word
    fn at_keyword(&self, keyword: &str) -> bool {
        let rest = self.rest();
        rest.starts_with(keyword)
            && !rest[keyword.len()..]
                .chars()
                .next()
                .map(|c| c == '_' || c.is_alphanumeric())
                .unwrap_or(false)
    }

    /// Read a string literal, returning (literal, unquoted value)
    fn string_lit(&mut self) -> ScanResult<(&'a str, String)> {
        let rest = self.rest();
        match self.peek() {
            Some('`') => match rest[1..].find('`') {
                Some(i) => {
                    self.pos += i + 2;
                    Ok((&rest[..i + 2], rest[1..i + 1].to_string()))
                }
                None => self.error("raw string literal not terminated"),
            },
            Some('"') => {
                let mut value = String::new();
                let mut chars = rest.char_indices().skip(1);
                while let Some((i, c)) = chars.next() {
                    match c {
                        '"' => {
                            self.pos += i + 1;
                            return Ok((&rest[..i + 1], value));
                        }
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '\n' => break,
                        _ => value.push(c),
                    }
                }
                self.error("string literal not terminated")
            }
            _ => self.error("expected import path"),
        }
    }

    /// Comment after a spec on the same line, if any
    fn trailing_comment(&mut self) -> ScanResult<Option<String>> {
        self.skip_inline_space();
        if self.peek() == Some(';') {
            self.pos += 1;
            self.skip_inline_space();
        }
        Ok(self.comment()?.map(str::to_string))
    }

    fn spec(&mut self, leading: Vec<String>) -> ScanResult<ImportSpec> {
        let name = match self.peek() {
            Some('.') => {
                self.pos += 1;
                Some(".".to_string())
            }
            Some('"') | Some('`') => None,
            _ => match self.ident() {
                Some(ident) => Some(ident.to_string()),
                None => return self.error("expected import path"),
            },
        };
        if name.is_some() {
            self.skip_inline_space();
        }

        let line = line_at(self.src, self.pos);
        let (literal, path) = self.string_lit()?;
        if path.is_empty() {
            return self.error("empty import path");
        }
        let trailing = self.trailing_comment()?;

        Ok(ImportSpec {
            path,
            name,
            literal: literal.to_string(),
            leading,
            trailing,
            line,
        })
    }

    fn package_clause(&mut self) -> ScanResult<()> {
        self.skip_trivia()?;
        if !self.at_keyword("package") {
            return self.error("expected 'package'");
        }
        self.pos += "package".len();
        self.skip_inline_space();
        if self.ident().is_none() {
            return self.error("expected package name");
        }
        self.skip_inline_space();
        if self.peek() == Some(';') {
            self.pos += 1;
        }
        Ok(())
    }

    /// Parse one import declaration, the cursor being just past `import`
    fn import_decl(
        &mut self,
        section: &mut ImportSection,
        mut leading: Vec<String>,
    ) -> ScanResult<()> {
        self.skip_inline_space();

        if self.peek() != Some('(') {
            let spec = self.spec(leading)?;
            section.specs.push(spec);
            return Ok(());
        }

        self.pos += 1;
        if let Some(comment) = self.trailing_comment()? {
            leading.push(comment);
        }
        loop {
            let mut comments = std::mem::take(&mut leading);
            comments.extend(self.skip_trivia()?);
            match self.peek() {
                Some(')') => {
                    self.pos += 1;
                    section.dangling.extend(comments);
                    return Ok(());
                }
                Some(';') => {
                    self.pos += 1;
                    leading = comments;
                }
                None => return self.error("import group not terminated"),
                _ => {
                    let spec = self.spec(comments)?;
                    section.specs.push(spec);
                }
            }
        }
    }

    fn parse_file(&mut self) -> ScanResult<ImportSection> {
        self.package_clause()?;

        let mut section = ImportSection::default();
        let mut start = None;
        let mut end = self.pos;

        loop {
            let before = self.pos;
            let comments = self.skip_trivia()?;
            if !self.at_keyword("import") {
                self.pos = before;
                break;
            }

            // Comments ahead of the first declaration stay where they are
            let leading = if start.is_some() { comments } else { Vec::new() };
            start.get_or_insert(self.pos);
            self.pos += "import".len();
            self.import_decl(&mut section, leading)?;
            end = self.pos;
        }

        section.span = start.map(|s| s..end);
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> ImportSection {
        parse_imports(Path::new("main.go"), src).unwrap()
    }

    fn paths(section: &ImportSection) -> Vec<&str> {
        section.specs.iter().map(|s| s.path.as_str()).collect()
    }

    #[test]
    fn test_parse_grouped() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n\tlog \"github.com/sirupsen/logrus\"\n\t_ \"embed\"\n)\n\nfunc main() {}\n";
        let section = parse(src);

        assert_eq!(paths(&section), vec!["fmt", "github.com/sirupsen/logrus", "embed"]);
        assert_eq!(section.specs[1].name.as_deref(), Some("log"));
        assert_eq!(section.specs[2].name.as_deref(), Some("_"));
        assert_eq!(section.specs[0].line, 4);

        let span = section.span.clone().unwrap();
        assert!(src[span.clone()].starts_with("import ("));
        assert!(src[span].ends_with(')'));
    }

    #[test]
    fn test_parse_single_and_multiple_decls() {
        let src = "package main\n\nimport \"fmt\"\nimport . \"strings\"\n\nvar x = 1\n";
        let section = parse(src);

        assert_eq!(paths(&section), vec!["fmt", "strings"]);
        assert_eq!(section.specs[1].name.as_deref(), Some("."));
        assert_eq!(&src[section.span.unwrap()], "import \"fmt\"\nimport . \"strings\"");
    }

    #[test]
    fn test_parse_comments() {
        let src = "// Package main does things.\npackage main\n\nimport (\n\t// logging\n\t\"log\" // std\n\n\t/* json */ \"encoding/json\"\n\t// left over\n)\n";
        let section = parse(src);

        assert_eq!(section.specs[0].leading, vec!["// logging"]);
        assert_eq!(section.specs[0].trailing.as_deref(), Some("// std"));
        assert_eq!(section.specs[1].leading, vec!["/* json */"]);
        assert_eq!(section.dangling, vec!["// left over"]);
    }

    #[test]
    fn test_parse_multiline_trailing_comment() {
        let src = "package main\n\nimport (\n\t\"os\" /* a\n\t b */\n\t\"fmt\"\n)\n";
        let section = parse(src);

        assert_eq!(section.specs[0].trailing.as_deref(), Some("/* a\n\t b */"));
        assert!(section.specs[1].leading.is_empty());
    }

    #[test]
    fn test_parse_raw_string_and_semicolons() {
        let src = "package main; import (`fmt`; \"os\")\n";
        let section = parse(src);

        assert_eq!(paths(&section), vec!["fmt", "os"]);
        assert_eq!(section.specs[0].literal, "`fmt`");
    }

    #[test]
    fn test_parse_no_imports() {
        let section = parse("package util\n\nfunc F() {}\n");
        assert!(section.specs.is_empty());
        assert!(section.span.is_none());
    }

    #[test]
    fn test_parse_does_not_read_past_imports() {
        let src = "package main\n\nimport \"fmt\"\n\n// importer builds things\nfunc importer() {}\n";
        let section = parse(src);
        assert_eq!(paths(&section), vec!["fmt"]);
        assert_eq!(&src[section.span.unwrap()], "import \"fmt\"");
    }

    #[test]
    fn test_has_cgo() {
        let section = parse("package main\n\n// #include <stdio.h>\nimport \"C\"\n");
        assert!(section.has_cgo());
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse_imports(Path::new("bad.go"), "package main\n\nimport (\n\t\"fmt\"\n").unwrap_err();
        assert!(err.to_string().contains("bad.go:5"));

        let err = parse_imports(Path::new("bad.go"), "func main() {}\n").unwrap_err();
        assert!(err.to_string().contains("bad.go:1"));

        let err = parse_imports(Path::new("bad.go"), "package main\nimport (\n\t\"fmt\n)\n").unwrap_err();
        assert!(matches!(err, SourceError::ParseError { line: 3, .. }));
    }
}
