/*!
 * Placeholder and inline-tag protection.
 *
 * Curly-brace placeholders, literal double quotes and `<i>`/`<b>` tag
 * delimiters are wrapped in a no-translate marker before a provider call
 * and stripped afterwards. Placeholders are additionally re-applied
 * positionally after translation, since providers occasionally reorder or
 * rewrite them.
 */

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::providers::MarkerStyle;

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(.+?)\}").unwrap());

static KEEP_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<keep>(.*?)</keep>").unwrap());

static DICTIONARY_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<mstrans:dictionary[^>]*>(.*?)</mstrans:dictionary>").unwrap());

static ITALIC_SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(<i>)(.*?)(</i>)").unwrap());

static BOLD_SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(<b>)(.*?)(</b>)").unwrap());

/// One curly-brace placeholder found in a source value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken {
    /// 1-based ordinal among the placeholders of the value
    pub index: usize,
    /// Content between the braces
    pub word: String,
    /// Byte offset of the opening brace
    pub start: usize,
    /// Byte offset just past the closing brace
    pub end: usize,
}

/// Wraps protected content in the marker syntax of the active provider
#[derive(Debug, Clone, Copy)]
pub struct Protector {
    marker: MarkerStyle,
}

impl Protector {
    pub fn new(marker: MarkerStyle) -> Self {
        Self { marker }
    }

    /// List all `{...}` placeholders in order of appearance.
    pub fn identify_placeholders(text: &str) -> Vec<PlaceholderToken> {
        PLACEHOLDER_REGEX
            .captures_iter(text)
            .enumerate()
            .map(|(position, caps)| {
                let whole = caps.get(0).unwrap();
                PlaceholderToken {
                    index: position + 1,
                    word: caps[1].to_string(),
                    start: whole.start(),
                    end: whole.end(),
                }
            })
            .collect()
    }

    fn wrap(&self, value: &str) -> String {
        match self.marker {
            MarkerStyle::KeepTag => format!("<keep>{}</keep>", value),
            MarkerStyle::DictionaryTag => format!(
                "<mstrans:dictionary translation=\"{}\">{}</mstrans:dictionary>",
                value, value
            ),
        }
    }

    /// Wrap literal double quotes and every placeholder in the provider's
    /// no-translate marker. Each distinct placeholder word is processed
    /// once; replacing all of its occurrences covers repeats without
    /// double-wrapping. Quotes go first so the marker syntax itself cannot
    /// be re-matched.
    pub fn protect(&self, text: &str) -> String {
        let mut result = text.to_string();
        if result.contains('"') {
            result = result.replace('"', &self.wrap("\""));
        }
        let mut seen: Vec<String> = Vec::new();
        for token in Self::identify_placeholders(text) {
            let needle = format!("{{{}}}", token.word);
            if seen.contains(&needle) {
                continue;
            }
            result = result.replace(&needle, &self.wrap(&needle));
            seen.push(needle);
        }
        result
    }

    /// Wrap the delimiters of `<i>`/`<b>` spans, leaving their content
    /// translatable. Always uses the keep-tag syntax: a dictionary element
    /// whose attribute carried `>` would break its own closing scan.
    pub fn protect_inline_tags(&self, text: &str) -> String {
        let wrap_delimiters = |caps: &regex::Captures| {
            format!(
                "<keep>{}</keep>{}<keep>{}</keep>",
                &caps[1], &caps[2], &caps[3]
            )
        };
        let result = ITALIC_SPAN_REGEX
            .replace_all(text, wrap_delimiters)
            .into_owned();
        BOLD_SPAN_REGEX
            .replace_all(&result, wrap_delimiters)
            .into_owned()
    }

    /// Strip all no-translate markers, restoring the wrapped content.
    /// Runs until stable so nested or repeated wrapping cannot leak
    /// markers; applying it to unmarked text is a no-op.
    pub fn restore(text: &str) -> String {
        let mut result = text.to_string();
        loop {
            let pass = KEEP_TAG_REGEX.replace_all(&result, "$1").into_owned();
            let pass = DICTIONARY_TAG_REGEX.replace_all(&pass, "$1").into_owned();
            if pass == result {
                return result;
            }
            result = pass;
        }
    }

    /// Re-apply the original placeholder words positionally: the n-th
    /// `{...}` occurrence in the translation receives the n-th original
    /// word. A count mismatch is logged and the shorter side wins.
    pub fn remap_placeholders(translated: &str, originals: &[PlaceholderToken]) -> String {
        if translated.is_empty() || originals.is_empty() {
            return translated.to_string();
        }
        let found: Vec<(usize, usize)> = PLACEHOLDER_REGEX
            .find_iter(translated)
            .map(|m| (m.start(), m.end()))
            .collect();
        if found.is_empty() {
            warn!(
                "All {} placeholders dropped by translation: {:?}",
                originals.len(),
                translated
            );
            return translated.to_string();
        }
        if found.len() != originals.len() {
            warn!(
                "Placeholder count changed by translation: {} before, {} after",
                originals.len(),
                found.len()
            );
        }

        let count = found.len().min(originals.len());
        let mut result = translated.to_string();
        let mut offset: isize = 0;
        for position in 0..count {
            let (start, end) = found[position];
            let replacement = format!("{{{}}}", originals[position].word);
            let adjusted_start = (start as isize + offset) as usize;
            let adjusted_end = (end as isize + offset) as usize;
            result.replace_range(adjusted_start..adjusted_end, &replacement);
            offset += replacement.len() as isize - (end - start) as isize;
        }
        result
    }
}
