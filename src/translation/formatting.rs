/*!
 * Post-translation normalization.
 *
 * The output convention for delimited values is a three-pipe wrapper:
 * `|||text|||`. These normalizers convert quote delimiters to pipes, repair
 * pipe runs the provider damaged, localize quotation glyphs, fix mistyped
 * escape sequences and tidy whitespace around escaped newlines. All of them
 * are idempotent.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new("\"([^\"]+?)\"").unwrap());

static SPACE_AFTER_BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\\n)([^\s\\])").unwrap());

static PADDED_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\\n)[^\S\n]+(\\n)").unwrap());

/// Open Box character used to encode significant whitespace in glossary
/// entries; providers echo it back and it must not survive in output.
pub const GLOSSARY_PLACEHOLDER_CHAR: char = '\u{2423}';

/// Delimiter style detected around a source value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapStyle {
    /// Bare value, left unwrapped throughout
    None,
    /// Already in the canonical `|||...|||` wrapping
    Pipes,
    /// Legacy `"..."` wrapping, rewritten to pipes on output
    Quotes,
}

/// Strip a leading/trailing three-pipe or double-quote wrapper, reporting
/// which one was removed.
pub fn unwrap_value(value: &str) -> (String, WrapStyle) {
    if value.len() >= 6 && value.starts_with("|||") && value.ends_with("|||") {
        return (value[3..value.len() - 3].to_string(), WrapStyle::Pipes);
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return (value[1..value.len() - 1].to_string(), WrapStyle::Quotes);
    }
    (value.to_string(), WrapStyle::None)
}

/// Re-apply a recorded wrapper in the canonical three-pipe convention.
pub fn rewrap_value(value: &str, style: WrapStyle) -> String {
    match style {
        WrapStyle::None => value.to_string(),
        WrapStyle::Pipes | WrapStyle::Quotes => format!("|||{}|||", value),
    }
}

/// Collapse any leading pipe run to exactly three pipes. A value without a
/// leading pipe passes through untouched.
pub fn ensure_three_pipe_prefix(value: &str) -> String {
    let pipes = value.chars().take_while(|&c| c == '|').count();
    match pipes {
        0 | 3 => value.to_string(),
        n => format!("|||{}", &value[n..]),
    }
}

/// A value opening with three pipes must also close with three pipes.
/// Trailing whitespace stays outside the wrapper.
pub fn ensure_three_pipe_suffix(value: &str) -> String {
    if !value.starts_with("|||") {
        return value.to_string();
    }
    let trimmed = value.trim_end();
    if trimmed.ends_with("|||") {
        return value.to_string();
    }
    let trailing = &value[trimmed.len()..];
    format!("{}|||{}", trimmed, trailing)
}

/// Both pipe normalizers in sequence.
pub fn ensure_three_pipes(value: &str) -> String {
    ensure_three_pipe_suffix(&ensure_three_pipe_prefix(value))
}

/// Language-appropriate quotation glyphs keyed by target language code.
fn quote_glyphs(language: &str) -> (&'static str, &'static str) {
    match language.trim().to_lowercase().as_str() {
        "de" | "deu" => ("\u{201E}", "\u{201C}"),
        "pl" | "pol" => ("\u{201E}", "\u{201D}"),
        "fr" | "fra" | "es" | "spa" | "it" | "ita" | "ru" | "rus" | "pt" | "por" => {
            ("\u{00AB}", "\u{00BB}")
        }
        _ => ("\u{201C}", "\u{201D}"),
    }
}

/// Replace straight double-quote pairs with the target language's glyphs.
pub fn localize_quotes(value: &str, language: &str) -> String {
    if value.is_empty() {
        return value.to_string();
    }
    let (open, close) = quote_glyphs(language);
    QUOTED_SPAN_REGEX
        .replace_all(value, |caps: &regex::Captures| {
            format!("{}{}{}", open, &caps[1], close)
        })
        .into_owned()
}

/// A lone backslash is a mistyped escaped newline; rewrite `\` not followed
/// by `n` as `\n`.
pub fn fix_bare_backslashes(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 4);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() != Some(&'n') {
            result.push_str("\\n");
        } else {
            result.push(c);
        }
    }
    result
}

/// Collapse whitespace runs between consecutive escaped newlines, so
/// `\n \n` becomes `\n\n`. Runs until stable for longer chains.
pub fn collapse_space_between_breaks(value: &str) -> String {
    let mut result = value.to_string();
    loop {
        let pass = PADDED_BREAK_REGEX
            .replace_all(&result, "${1}${2}")
            .into_owned();
        if pass == result {
            return result;
        }
        result = pass;
    }
}

/// Space out text jammed against an escaped newline so segmentation sees a
/// boundary: `\nWord` becomes `\n Word`.
pub fn add_space_after_breaks(value: &str) -> String {
    SPACE_AFTER_BREAK_REGEX
        .replace_all(value, "${1} ${2}")
        .into_owned()
}

/// Replace the whitespace placeholder glossary entries carry with a space.
pub fn strip_glossary_placeholder(value: &str) -> String {
    value.replace(GLOSSARY_PLACEHOLDER_CHAR, " ")
}
