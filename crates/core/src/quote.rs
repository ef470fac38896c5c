// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX shell quoting for values spliced into remote scripts.

/// Quote a string so a POSIX shell reads it back as one literal word.
///
/// Words made only of safe characters pass through unchanged; anything else
/// is wrapped in single quotes, with embedded `'` written as `'\''`.
pub fn shell_quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(is_safe) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Shell expression for a path on the target host.
///
/// A leading `~/` becomes `"$HOME"/...` so the target host's home directory
/// is used; everything else is quoted literally.
pub fn remote_path_expr(path: &str) -> String {
    if path == "~" {
        return "\"$HOME\"".to_string();
    }
    match path.strip_prefix("~/") {
        Some("") => "\"$HOME\"".to_string(),
        Some(rest) => format!("\"$HOME\"/{}", shell_quote(rest)),
        None => shell_quote(path),
    }
}

/// Like [`remote_path_expr`], but relative paths are anchored at the remote
/// shell's working directory so the expression is always absolute.
pub fn absolute_path_expr(path: &str) -> String {
    if path == "~" || path.starts_with("~/") || path.starts_with('/') {
        remote_path_expr(path)
    } else {
        format!("\"$PWD\"/{}", shell_quote(path.trim_start_matches("./")))
    }
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '%' | '+' | ',' | '=')
}

#[cfg(test)]
#[path = "quote_tests.rs"]
mod tests;
