//! Comment stripping for the "accept clean" action.
//!
//! Three independent regex passes run in a fixed order: `//` line comments, `/* */`
//! block comments (non-greedy, multi-line, unterminated ones run to end of input),
//! then `#` line comments. There is no lexing, so comment markers inside string
//! literals are stripped too.
//!
//! Each removed comment leaves a cut marker behind. Lines that end up blank because
//! of a cut are dropped, whitespace left trailing by a cut is trimmed, and text that
//! followed a leading comment keeps the line's original indentation. Lines that were
//! blank to begin with are kept.

use std::sync::LazyLock;

use regex::Regex;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("valid line comment pattern"));
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?(?:\*/|\z)").expect("valid block comment pattern"));
static HASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)#.*$").expect("valid hash comment pattern"));

/// Stands in for a removed comment until lines are reassembled.
/// A Unicode noncharacter, so it never carries meaning in source text.
const CUT: char = '\u{FFFF}';
const CUT_STR: &str = "\u{FFFF}";

/// Removes `//`, `/* */` and `#` comments from `text` and trims the result.
///
/// Total and idempotent: `strip(&strip(x)) == strip(x)`.
pub fn strip(text: &str) -> String {
    let sanitized = text.replace(CUT, "");
    let pass = LINE_COMMENT.replace_all(&sanitized, CUT_STR);
    let pass = BLOCK_COMMENT.replace_all(&pass, CUT_STR);
    let pass = HASH_COMMENT.replace_all(&pass, CUT_STR);

    let lines: Vec<String> = pass
        .split('\n')
        .filter_map(|line| {
            if line.contains(CUT) {
                reassemble_cut_line(line)
            } else {
                Some(line.to_owned())
            }
        })
        .collect();

    lines.join("\n").trim().to_owned()
}

/// Rebuilds a line that had one or more comments cut out of it.
///
/// Returns `None` when nothing but whitespace is left.
fn reassemble_cut_line(line: &str) -> Option<String> {
    let mut out = String::with_capacity(line.len());
    for (i, piece) in line.split(CUT).enumerate() {
        if i > 0 && out.trim().is_empty() {
            out.push_str(piece.trim_start());
        } else {
            out.push_str(piece);
        }
    }
    let kept = out.trim_end();
    if kept.trim_start().is_empty() {
        None
    } else {
        Some(kept.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn removes_all_three_forms_and_trims() {
        assert_eq!(strip("  // a\ncode\n# b\n/* c */ tail  "), "code\ntail");
    }

    #[test]
    fn keeps_indentation_and_code_before_trailing_comment() {
        let src = "def f():\n    x = 1  # set x\n    return x";
        assert_eq!(strip(src), "def f():\n    x = 1\n    return x");
    }

    #[test]
    fn keeps_original_blank_lines() {
        let src = "int a;\n\nint b; // second";
        assert_eq!(strip(src), "int a;\n\nint b;");
    }

    #[test]
    fn block_comment_spanning_lines() {
        let src = "a /* one\ntwo */ b\nc";
        assert_eq!(strip(src), "a  b\nc");
    }

    #[test]
    fn indented_leading_block_comment_keeps_indent() {
        assert_eq!(strip("x\n  /* note */ y"), "x\n  y");
    }

    #[test]
    fn unterminated_block_runs_to_end() {
        assert_eq!(strip("keep\n/* never closed\nstill comment"), "keep");
    }

    #[test]
    fn strips_markers_inside_string_literals() {
        assert_eq!(strip(r#"url = "http://example.com""#), r#"url = "http:"#);
    }

    #[test]
    fn line_pass_runs_before_block_pass() {
        // The `//` inside the block comment eats its terminator first.
        assert_eq!(strip("a /* b // c */ d\ne"), "a");
    }

    #[test]
    fn empty_and_comment_only_inputs() {
        assert_eq!(strip(""), "");
        assert_eq!(strip("// only\n# comments\n/* here */"), "");
    }

    proptest! {
        #[test]
        fn strip_is_idempotent(text in "\\PC*") {
            let once = strip(&text);
            prop_assert_eq!(strip(&once), once);
        }

        #[test]
        fn strip_is_idempotent_on_comment_heavy_text(text in "[a-z/*# \n]{0,64}") {
            let once = strip(&text);
            prop_assert_eq!(strip(&once), once);
        }
    }
}
