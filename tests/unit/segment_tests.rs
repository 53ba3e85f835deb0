/*!
 * Tests for sentence segmentation and reassembly
 */

use autoloc::translation::segment::Segmenter;

#[test]
fn test_split_withTwoSentences_shouldSplitAtTerminalPunctuation() {
    assert_eq!(
        Segmenter::split("First one. Second two."),
        vec!["First one.", "Second two."]
    );
}

#[test]
fn test_split_withPunctuationRun_shouldKeepRunWithSentence() {
    assert_eq!(
        Segmenter::split("Wait... what? Go!"),
        vec!["Wait...", "what?", "Go!"]
    );
}

#[test]
fn test_split_withDecimalPoint_shouldNotSplitInsideNumber() {
    // No whitespace after the dot, so it is not a sentence boundary
    assert_eq!(Segmenter::split("Version 1.5 is out"), vec!["Version 1.5 is out"]);
}

#[test]
fn test_split_withInlineTags_shouldMakeDelimitersStandaloneUnits() {
    assert_eq!(
        Segmenter::split("Hello <i>world</i> now"),
        vec!["Hello", "<i>", "world", "</i>", "now"]
    );
}

#[test]
fn test_split_withEscapedNewlineRun_shouldMakeRunAStandaloneUnit() {
    assert_eq!(
        Segmenter::split(r"First line\nSecond line."),
        vec![r"First line", r"\n", r"Second line."]
    );
}

#[test]
fn test_split_withDoubleEscapedNewline_shouldKeepRunTogether() {
    assert_eq!(
        Segmenter::split(r"a\n\nb"),
        vec!["a", r"\n\n", "b"]
    );
}

#[test]
fn test_split_withEmptyInput_shouldReturnNoUnits() {
    assert!(Segmenter::split("").is_empty());
    assert!(Segmenter::split("   ").is_empty());
}

#[test]
fn test_isTranslatable_withPlainText_shouldBeTrue() {
    assert!(Segmenter::is_translatable("Hello"));
}

#[test]
fn test_isTranslatable_withMarkupOnly_shouldBeFalse() {
    assert!(!Segmenter::is_translatable("<i>"));
    assert!(!Segmenter::is_translatable(r"\n"));
    assert!(!Segmenter::is_translatable(r"\n\n"));
    assert!(!Segmenter::is_translatable("123 !?"));
}

#[test]
fn test_join_withTagUnits_shouldGlueTagDelimitersToContent() {
    let units: Vec<String> = ["Hello", "<i>", "world", "</i>", "now"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(Segmenter::join(&units), "Hello <i>world</i> now");
}

#[test]
fn test_join_withNewlineUnit_shouldNotAddSpaces() {
    let units: Vec<String> = ["First line", r"\n", "Second line."]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(Segmenter::join(&units), r"First line\nSecond line.");
}

#[test]
fn test_join_afterSplit_shouldReconstructSentences() {
    let input = "First one. Second two. Third!";
    assert_eq!(Segmenter::join(&Segmenter::split(input)), input);
}

#[test]
fn test_join_afterSplit_withTagsAndNewlines_shouldReconstruct() {
    let input = r"Hello <i>world</i> now\nNext part.";
    assert_eq!(Segmenter::join(&Segmenter::split(input)), input);
}

#[test]
fn test_join_afterSplit_withTrailingWhitespace_shouldPreserveIt() {
    assert_eq!(Segmenter::join(&Segmenter::split("Name: ")), "Name: ");
    assert_eq!(Segmenter::join(&Segmenter::split("Two lines.  ")), "Two lines.  ");
}

#[test]
fn test_join_afterSplit_withLeadingWhitespace_shouldPreserveIt() {
    let input = " <i>note</i>";
    assert_eq!(Segmenter::join(&Segmenter::split(input)), input);
}

#[test]
fn test_join_afterSplit_withPunctuationAfterClosingTag_shouldKeepItAttached() {
    let input = "Press <b>OK</b>. Then wait.";
    assert_eq!(
        Segmenter::split(input),
        vec!["Press", "<b>", "OK", "</b>", ".", "Then wait."]
    );
    assert_eq!(Segmenter::join(&Segmenter::split(input)), input);
}
