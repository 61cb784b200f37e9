//! Import grouping and rendering
//!
//! Imports are split into three buckets (standard library, third party,
//! local module), each sorted by path, and rendered as one declaration with
//! a blank line between non-empty buckets.

use crate::imports::parser::ImportSpec;

/// Group an import belongs to, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Standard,
    ThirdParty,
    Local,
}

/// Returns true if `path` is `prefix` or a package below it
fn has_path_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Classify an import path.
///
/// The local prefix is checked first; otherwise a path without a dot in it
/// belongs to the standard library.
pub fn classify(path: &str, local_prefix: Option<&str>) -> Bucket {
    if let Some(prefix) = local_prefix.filter(|p| !p.is_empty()) {
        if has_path_prefix(path, prefix) {
            return Bucket::Local;
        }
    }
    if !path.contains('.') {
        Bucket::Standard
    } else {
        Bucket::ThirdParty
    }
}

/// Split specs into sorted buckets, in output order
pub fn group(specs: Vec<ImportSpec>, local_prefix: Option<&str>) -> Vec<Vec<ImportSpec>> {
    let mut buckets = vec![Vec::new(), Vec::new(), Vec::new()];
    for spec in specs {
        let index = classify(&spec.path, local_prefix) as usize;
        buckets[index].push(spec);
    }
    for bucket in &mut buckets {
        bucket.sort_by(|a, b| a.path.cmp(&b.path));
    }
    buckets
}

fn render_spec(spec: &ImportSpec) -> String {
    let mut line = match &spec.name {
        Some(name) => format!("{} {}", name, spec.literal),
        None => spec.literal.clone(),
    };
    if let Some(comment) = &spec.trailing {
        line.push(' ');
        line.push_str(comment);
    }
    line
}

/// Render the single import declaration replacing the original ones
pub fn render(specs: Vec<ImportSpec>, dangling: &[String], local_prefix: Option<&str>) -> String {
    let buckets: Vec<_> = group(specs, local_prefix)
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();

    let total: usize = buckets.iter().map(Vec::len).sum();
    if total == 1 && dangling.is_empty() {
        let spec = &buckets[0][0];
        let mut out = String::new();
        for comment in &spec.leading {
            out.push_str(comment);
            out.push('\n');
        }
        out.push_str("import ");
        out.push_str(&render_spec(spec));
        return out;
    }

    let mut out = String::from("import (\n");
    for (i, bucket) in buckets.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for spec in bucket {
            for comment in &spec.leading {
                out.push('\t');
                out.push_str(comment);
                out.push('\n');
            }
            out.push('\t');
            out.push_str(&render_spec(spec));
            out.push('\n');
        }
    }
    for comment in dangling {
        out.push('\t');
        out.push_str(comment);
        out.push('\n');
    }
    out.push(')');
    out
}
