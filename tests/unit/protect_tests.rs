/*!
 * Tests for placeholder and inline-tag protection
 */

use autoloc::providers::MarkerStyle;
use autoloc::translation::protect::Protector;

#[test]
fn test_identifyPlaceholders_withTwoTokens_shouldReportWordsAndOffsets() {
    let tokens = Protector::identify_placeholders("Hi {name}, you have {count} items");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].index, 1);
    assert_eq!(tokens[0].word, "name");
    assert_eq!(tokens[0].start, 3);
    assert_eq!(tokens[0].end, 9);
    assert_eq!(tokens[1].index, 2);
    assert_eq!(tokens[1].word, "count");
}

#[test]
fn test_identifyPlaceholders_withNoTokens_shouldReturnEmpty() {
    assert!(Protector::identify_placeholders("plain text").is_empty());
}

#[test]
fn test_protect_withKeepTagMarker_shouldWrapPlaceholder() {
    let protector = Protector::new(MarkerStyle::KeepTag);
    assert_eq!(
        protector.protect("Hi {name}!"),
        "Hi <keep>{name}</keep>!"
    );
}

#[test]
fn test_protect_withRepeatedPlaceholder_shouldWrapEachOccurrenceOnce() {
    let protector = Protector::new(MarkerStyle::KeepTag);
    assert_eq!(
        protector.protect("{x} and {x}"),
        "<keep>{x}</keep> and <keep>{x}</keep>"
    );
}

#[test]
fn test_protect_withQuotes_shouldWrapEachQuote() {
    let protector = Protector::new(MarkerStyle::KeepTag);
    assert_eq!(
        protector.protect("say \"hi\" now"),
        "say <keep>\"</keep>hi<keep>\"</keep> now"
    );
}

#[test]
fn test_protect_withDictionaryMarker_shouldEmitDictionaryElement() {
    let protector = Protector::new(MarkerStyle::DictionaryTag);
    assert_eq!(
        protector.protect("Hi {name}!"),
        "Hi <mstrans:dictionary translation=\"{name}\">{name}</mstrans:dictionary>!"
    );
}

#[test]
fn test_protectInlineTags_withItalicSpan_shouldWrapDelimitersOnly() {
    let protector = Protector::new(MarkerStyle::KeepTag);
    assert_eq!(
        protector.protect_inline_tags("a <i>word</i> b"),
        "a <keep><i></keep>word<keep></i></keep> b"
    );
}

#[test]
fn test_protectInlineTags_withBoldSpan_shouldKeepContentTranslatable() {
    let protector = Protector::new(MarkerStyle::DictionaryTag);
    // Tag delimiters always use the keep syntax, whatever the provider
    assert_eq!(
        protector.protect_inline_tags("<b>bold</b>"),
        "<keep><b></keep>bold<keep></b></keep>"
    );
}

#[test]
fn test_restore_afterProtect_shouldRoundTrip() {
    let input = "Take {sword}, say \"hi\" and <i>run</i>.";
    for marker in [MarkerStyle::KeepTag, MarkerStyle::DictionaryTag] {
        let protector = Protector::new(marker);
        let protected = protector.protect_inline_tags(&protector.protect(input));
        assert_eq!(Protector::restore(&protected), input);
    }
}

#[test]
fn test_restore_withUppercasedMarkers_shouldStillStrip() {
    assert_eq!(Protector::restore("HI <KEEP>{NAME}</KEEP>!"), "HI {NAME}!");
}

#[test]
fn test_restore_onPlainText_shouldBeNoOp() {
    assert_eq!(Protector::restore("nothing to see"), "nothing to see");
}

#[test]
fn test_remapPlaceholders_withReorderedTokens_shouldApplyPositionally() {
    let originals = Protector::identify_placeholders("Take {sword} and {shield}");
    let remapped = Protector::remap_placeholders("Nimm {SHIELD} und {SWORD}", &originals);
    assert_eq!(remapped, "Nimm {sword} und {shield}");
}

#[test]
fn test_remapPlaceholders_withDroppedToken_shouldApplyWhatFits() {
    let originals = Protector::identify_placeholders("{a} then {b}");
    let remapped = Protector::remap_placeholders("only {X} left", &originals);
    assert_eq!(remapped, "only {a} left");
}

#[test]
fn test_remapPlaceholders_withNoTokensFound_shouldKeepTranslation() {
    let originals = Protector::identify_placeholders("{a}");
    assert_eq!(
        Protector::remap_placeholders("no tokens here", &originals),
        "no tokens here"
    );
}

#[test]
fn test_remapPlaceholders_withDifferentTokenWidths_shouldAdjustOffsets() {
    let originals = Protector::identify_placeholders("{player_name} meets {x}");
    let remapped = Protector::remap_placeholders("{1} trifft {2}", &originals);
    assert_eq!(remapped, "{player_name} trifft {x}");
}
