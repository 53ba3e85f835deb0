/*!
 * End-to-end workflow tests: catalog file in, translated catalog file out,
 * with cache persistence across runs.
 */

use std::path::Path;
use std::sync::Arc;

use autoloc::catalog::Catalog;
use autoloc::providers::mock::MockTranslator;
use autoloc::translation::cache::TranslationCache;
use autoloc::translation::pipeline::Pipeline;

use crate::common;

async fn translate_file(
    input: &Path,
    output_dir: &Path,
    translator: MockTranslator,
    cache: TranslationCache,
) -> std::path::PathBuf {
    let mut entries = Catalog::read_entries(input, ",").unwrap();
    let pipeline = Pipeline::new(
        common::test_settings(),
        Some(Arc::new(translator)),
        None,
        cache,
    );
    for entry in entries.iter_mut() {
        pipeline.process_entry(entry).await;
    }
    let output = Catalog::derive_output_path(input, output_dir, "_de");
    Catalog::write_entries(&output, &entries, ",").unwrap();
    output
}

#[tokio::test]
async fn test_workflow_withSampleCatalog_shouldWriteNormalizedTranslations() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_catalog(&dir, "Strings.csv").unwrap();

    let output = translate_file(
        &input,
        temp_dir.path(),
        MockTranslator::uppercase(),
        TranslationCache::new(false),
    )
    .await;

    assert_eq!(output.file_name().unwrap(), "Strings_de.csv");
    let entries = Catalog::read_entries(&output, ",").unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].key, "quest.title");
    assert_eq!(entries[0].value, "|||A LONG, DARK ROAD|||");
    assert_eq!(entries[1].key, "quest.greeting");
    assert_eq!(entries[1].value, "|||HELLO {name}, WELCOME!|||");
    // Skip-listed key passes through untouched
    assert_eq!(entries[2].key, "quest.authors");
    assert_eq!(entries[2].value, "Jane Doe");
}

#[tokio::test]
async fn test_workflow_withPersistedCache_shouldServeSecondRunWithoutProvider() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_catalog(&dir, "Strings.csv").unwrap();
    let cache_dir = temp_dir.path().join("cache");
    std::fs::create_dir_all(&cache_dir).unwrap();

    // First run populates and persists the cache
    let cache = TranslationCache::load(&cache_dir, ",");
    let first = translate_file(
        &input,
        temp_dir.path(),
        MockTranslator::uppercase(),
        cache.clone(),
    )
    .await;
    cache.save(&cache_dir, ",").unwrap();
    assert!(!cache.is_empty());

    // Second run sees only cache hits, so a failing provider is never asked
    let reloaded = TranslationCache::load(&cache_dir, ",");
    let failing = MockTranslator::failing();
    let calls = failing.call_counter();
    let second = translate_file(&input, temp_dir.path(), failing, reloaded).await;

    let first_entries = Catalog::read_entries(&first, ",").unwrap();
    let second_entries = Catalog::read_entries(&second, ",").unwrap();
    assert_eq!(first_entries, second_entries);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_workflow_withFlakyProviderAcrossRuns_shouldRecoverFromCache() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "Strings.csv", "a,First part\nb,Second part\n")
        .unwrap();

    // The first unit fails and stays untranslated; the second succeeds
    let cache = TranslationCache::new(true);
    let output = translate_file(&input, temp_dir.path(), MockTranslator::flaky(1), cache.clone())
        .await;
    let entries = Catalog::read_entries(&output, ",").unwrap();
    assert_eq!(entries[0].value, "First part");
    assert_eq!(entries[1].value, "SECOND PART");
    // Only the successful unit was cached
    assert_eq!(cache.len(), 1);

    // The failed unit is retried on the next run and then cached too
    let output = translate_file(
        &input,
        temp_dir.path(),
        MockTranslator::uppercase(),
        cache.clone(),
    )
    .await;
    let entries = Catalog::read_entries(&output, ",").unwrap();
    assert_eq!(entries[0].value, "FIRST PART");
    assert_eq!(entries[1].value, "SECOND PART");
    assert_eq!(cache.len(), 2);
}
