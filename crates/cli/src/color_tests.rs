// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn force_color() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");
}

fn disable_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");
}

#[test]
fn codes_have_expected_values() {
    assert_eq!(codes::HEADER, 74);
    assert_eq!(codes::LITERAL, 250);
    assert_eq!(codes::CONTEXT, 245);
    assert_eq!(codes::MUTED, 240);
    assert_eq!(codes::WARN, 179);
}

#[test]
#[serial]
fn styles_returns_styled_when_color_forced() {
    force_color();
    let debug = format!("{:?}", styles());
    assert_ne!(debug, format!("{:?}", clap::builder::styling::Styles::plain()));
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    disable_color();
    let debug = format!("{:?}", styles());
    assert_eq!(debug, format!("{:?}", clap::builder::styling::Styles::plain()));
}

#[yare::parameterized(
    header_color = { super::header as fn(&str) -> String, 74 },
    literal_color = { super::literal as fn(&str) -> String, 250 },
    context_color = { super::context as fn(&str) -> String, 245 },
    muted_color = { super::muted as fn(&str) -> String, 240 },
    warn_color = { super::warn as fn(&str) -> String, 179 },
)]
#[serial]
fn helpers_produce_ansi_when_color_forced(paint: fn(&str) -> String, code: u8) {
    force_color();
    let result = paint("foo");
    assert!(result.starts_with(&format!("\x1b[38;5;{code}m")));
    assert!(result.contains("foo"));
    assert!(result.ends_with("\x1b[0m"));
}

#[test]
#[serial]
fn no_color_overrides_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");
    assert!(!should_colorize());
    assert_eq!(header("foo"), "foo");
    std::env::remove_var("COLOR");
}
