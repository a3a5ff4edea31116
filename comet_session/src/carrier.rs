// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rewriting the custom properties of the external style carrier.
//!
//! The overlay is positioned by CSS custom properties in a stylesheet the
//! host owns. Only the numeric values are rewritten; everything else in the
//! sheet is left byte-for-byte intact.

use core::fmt::Display;
use std::sync::LazyLock;

use comet_caret::CaretRect;
use regex_lite::Regex;

/// Caret left edge, in editor space.
pub const CURSOR_X: &str = "--cursor-x";
/// Caret top edge, in editor space.
pub const CURSOR_Y: &str = "--cursor-y";
/// Caret height.
pub const CURSOR_HEIGHT: &str = "--cursor-height";
/// Font size of the glyph drawn inside a block caret.
pub const VIM_FONT_SIZE: &str = "--vim-font-size";

static CARET_DECLARATIONS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [CURSOR_X, CURSOR_Y, CURSOR_HEIGHT]
        .into_iter()
        .filter_map(|name| Some((name, declaration(name)?)))
        .collect()
});

static BLOCK_DECLARATION: LazyLock<Option<Regex>> = LazyLock::new(|| declaration(VIM_FONT_SIZE));

/// Matcher for a `name: value;` declaration with a non-empty value.
fn declaration(name: &str) -> Option<Regex> {
    Regex::new(&format!(r"{}:\s*[^;]+;", regex_lite::escape(name))).ok()
}

fn rewrite(re: &Regex, css: &str, name: &str, value: impl Display) -> Option<String> {
    let found = re.find(css)?;
    Some(format!(
        "{}{name}: {value};{}",
        &css[..found.start()],
        &css[found.end()..]
    ))
}

/// Replace the value of the first `name: value;` declaration in `css`.
///
/// Returns `None` if no declaration with a non-empty value exists.
pub fn rewrite_property(css: &str, name: &str, value: impl Display) -> Option<String> {
    rewrite(&declaration(name)?, css, name, value)
}

/// Write the caret position into the carrier text.
///
/// Properties missing from `css` are skipped.
pub fn write_caret(css: &str, caret: CaretRect) -> String {
    let mut text = css.to_owned();
    for (name, re) in CARET_DECLARATIONS.iter() {
        let value = match *name {
            CURSOR_X => caret.x,
            CURSOR_Y => caret.y,
            _ => caret.height,
        };
        if let Some(updated) = rewrite(re, &text, name, value) {
            text = updated;
        }
    }
    text
}

/// Write the block-caret glyph's font size into the block carrier text.
pub fn write_block_font_size(css: &str, font_size: &str) -> String {
    BLOCK_DECLARATION
        .as_ref()
        .and_then(|re| rewrite(re, css, VIM_FONT_SIZE, font_size))
        .unwrap_or_else(|| css.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = ".smooth-cursor-busyo {\n  --cursor-x: 0;\n  --cursor-y: 0;\n  --cursor-height: 0;\n  transform: translate(var(--cursor-x), var(--cursor-y));\n}";

    #[test]
    fn rewrites_declarations_not_usages() {
        let out = write_caret(SHEET, CaretRect::new(50.0, 20.5, 16.0));
        assert!(out.contains("--cursor-x: 50;"));
        assert!(out.contains("--cursor-y: 20.5;"));
        assert!(out.contains("--cursor-height: 16;"));
        assert!(out.contains("translate(var(--cursor-x), var(--cursor-y))"));
        assert!(out.starts_with(".smooth-cursor-busyo {"));
    }

    #[test]
    fn rewrite_is_stable() {
        let caret = CaretRect::new(-4.0, 12.0, 18.0);
        let once = write_caret(SHEET, caret);
        assert_eq!(write_caret(&once, caret), once);
    }

    #[test]
    fn whitespace_after_colon_is_optional() {
        let out = rewrite_property("a{--cursor-x:7px;}", CURSOR_X, 9).unwrap();
        assert_eq!(out, "a{--cursor-x: 9;}");
    }

    #[test]
    fn prefix_names_do_not_match() {
        assert_eq!(rewrite_property("a{--cursor-xy: 1;}", CURSOR_X, 2), None);
        assert_eq!(rewrite_property("a{--cursor-x:;}", CURSOR_X, 2), None);
    }

    #[test]
    fn empty_declaration_is_skipped_for_a_later_one() {
        let out = rewrite_property("a{--cursor-x:; --cursor-x: 4px;}", CURSOR_X, 9).unwrap();
        assert_eq!(out, "a{--cursor-x:; --cursor-x: 9;}");
    }

    #[test]
    fn block_font_size_falls_back_to_input() {
        let sheet = ".vim-text { --vim-font-size: 14px; }";
        assert_eq!(
            write_block_font_size(sheet, "20px"),
            ".vim-text { --vim-font-size: 20px; }"
        );
        assert_eq!(write_block_font_size(".other {}", "20px"), ".other {}");
    }
}
