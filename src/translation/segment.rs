/*!
 * Sentence segmentation for localization values.
 *
 * Values are cut into units a provider can handle one at a time: sentences
 * end at a run of terminal punctuation followed by whitespace, and `<i>`,
 * `<b>` tag delimiters as well as escaped-newline runs (`\n` as two
 * characters) become standalone units so reassembly can put them back
 * without guessing.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag delimiters and escaped-newline runs, each a standalone unit.
static BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?[ib]>|\s*(?:\\n)+\s*").unwrap());

static TAG_DELIMITER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?[ib]>").unwrap());

/// Splits values into translation units and reassembles them
pub struct Segmenter;

impl Segmenter {
    /// Split a value into units. Empty units are dropped; whitespace around
    /// interior unit boundaries is not preserved (join re-inserts single
    /// spaces between text units), but the value's own leading and trailing
    /// whitespace stays attached to the first and last units.
    pub fn split(text: &str) -> Vec<String> {
        let core = text.trim();
        let mut units = Vec::new();
        let mut last = 0;
        for found in BREAK_REGEX.find_iter(core) {
            Self::push_sentences(&core[last..found.start()], &mut units);
            let boundary = found.as_str().trim();
            if !boundary.is_empty() {
                units.push(boundary.to_string());
            }
            last = found.end();
        }
        Self::push_sentences(&core[last..], &mut units);

        let leading = &text[..text.len() - text.trim_start().len()];
        if !leading.is_empty() {
            if let Some(first) = units.first_mut() {
                first.insert_str(0, leading);
            }
        }
        let trailing = &text[text.trim_end().len()..];
        if !trailing.is_empty() {
            if let Some(last) = units.last_mut() {
                last.push_str(trailing);
            }
        }
        units
    }

    /// Cut one boundary-free piece into sentences: a run of `.`, `!` or `?`
    /// followed by whitespace ends a sentence, punctuation staying with it.
    fn push_sentences(text: &str, units: &mut Vec<String>) {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut start = 0;
        let mut position = 0;
        while position < chars.len() {
            if matches!(chars[position].1, '.' | '!' | '?') {
                let mut after = position + 1;
                while after < chars.len() && matches!(chars[after].1, '.' | '!' | '?') {
                    after += 1;
                }
                if after < chars.len() && chars[after].1.is_whitespace() {
                    let unit = text[start..chars[after].0].trim();
                    if !unit.is_empty() {
                        units.push(unit.to_string());
                    }
                    while after < chars.len() && chars[after].1.is_whitespace() {
                        after += 1;
                    }
                    start = if after < chars.len() {
                        chars[after].0
                    } else {
                        text.len()
                    };
                }
                position = after;
            } else {
                position += 1;
            }
        }
        let tail = text[start..].trim();
        if !tail.is_empty() {
            units.push(tail.to_string());
        }
    }

    /// A unit earns a provider call only if stripping escaped newlines and
    /// tag delimiters still leaves an alphabetic character.
    pub fn is_translatable(unit: &str) -> bool {
        let stripped = unit.replace("\\n", "");
        let stripped = TAG_DELIMITER_REGEX.replace_all(&stripped, "");
        stripped.chars().any(|c| c.is_alphabetic())
    }

    fn is_newline_unit(unit: &str) -> bool {
        !unit.is_empty() && unit.replace("\\n", "").trim().is_empty()
    }

    fn is_opening_tag(unit: &str) -> bool {
        matches!(unit.trim().to_ascii_lowercase().as_str(), "<i>" | "<b>")
    }

    fn is_closing_tag(unit: &str) -> bool {
        matches!(unit.trim().to_ascii_lowercase().as_str(), "</i>" | "</b>")
    }

    fn starts_with_terminal_punctuation(unit: &str) -> bool {
        unit.starts_with(['.', '!', '?'])
    }

    /// Concatenate units with single spaces, except that nothing attaches
    /// around escaped-newline units, after an opening tag, before a closing
    /// tag or before a unit that starts with terminal punctuation.
    /// `join(split(x))` reconstructs `x` up to this spacing rule.
    pub fn join(units: &[String]) -> String {
        let mut result = String::new();
        for (position, unit) in units.iter().enumerate() {
            if position > 0 {
                let previous = &units[position - 1];
                let glue = Self::is_newline_unit(previous)
                    || Self::is_newline_unit(unit)
                    || Self::is_opening_tag(previous)
                    || Self::is_closing_tag(unit)
                    || Self::starts_with_terminal_punctuation(unit);
                if !glue {
                    result.push(' ');
                }
            }
            result.push_str(unit);
        }
        result
    }
}
