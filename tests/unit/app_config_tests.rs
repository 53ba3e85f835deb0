/*!
 * Tests for application configuration
 */

use autoloc::app_config::{Config, TranslationProvider};

use crate::common;

#[test]
fn test_config_default_shouldCarryExpectedDefaults() {
    let config = Config::default();
    assert_eq!(config.translation.provider, TranslationProvider::DeepL);
    assert_eq!(config.translation.source_language, "en");
    assert_eq!(config.translation.target_language, "de");
    assert_eq!(config.translation.common.retry_count, 5);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);
    assert_eq!(config.llm.activation_prefix, "Activation");
    assert_eq!(config.llm.retry_count, 3);
    assert_eq!(config.file_io.delimiter, ",");
    assert_eq!(config.file_io.output_suffix, "_translated");
    assert!(config.translation.deepl.delete_existing_glossaries);
}

#[test]
fn test_config_fromJson_withEmptyObject_shouldUseDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.translation.provider, TranslationProvider::DeepL);
    assert!(!config.translation.enabled);
}

#[test]
fn test_config_fromJson_withProviderName_shouldSelectProvider() {
    let config: Config =
        serde_json::from_str(r#"{"translation": {"provider": "azure"}}"#).unwrap();
    assert_eq!(config.translation.provider, TranslationProvider::Azure);
}

#[test]
fn test_config_fromFile_withValidJson_shouldLoad() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{"file_io": {"input_file": "Strings.csv"}, "translation": {"target_language": "fr"}}"#,
    )
    .unwrap();

    let config = Config::from_file(&file).unwrap();
    assert_eq!(config.file_io.input_file, "Strings.csv");
    assert_eq!(config.translation.target_language, "fr");
}

#[test]
fn test_validate_withNoInputFile_shouldFail() {
    let config = Config::default();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withInputFileAndEverythingDisabled_shouldPass() {
    let mut config = Config::default();
    config.file_io.input_file = "Strings.csv".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withTranslationEnabledAndNoKey_shouldFail() {
    let mut config = Config::default();
    config.file_io.input_file = "Strings.csv".to_string();
    config.translation.enabled = true;
    assert!(config.validate().is_err());

    config.secrets.deepl_api_key = "key".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withAzureProvider_shouldRequireAzureKey() {
    let mut config = Config::default();
    config.file_io.input_file = "Strings.csv".to_string();
    config.translation.enabled = true;
    config.translation.provider = TranslationProvider::Azure;
    config.secrets.deepl_api_key = "unused".to_string();
    assert!(config.validate().is_err());

    config.secrets.azure_api_key = "key".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withLlmEnabled_shouldRequireKeyAndPrompt() {
    let mut config = Config::default();
    config.file_io.input_file = "Strings.csv".to_string();
    config.llm.enabled = true;
    assert!(config.validate().is_err());

    config.secrets.deepseek_api_key = "key".to_string();
    assert!(config.validate().is_err());

    config.llm.prompt = "You are a reviewer".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withCacheEnabledAndNoDirectory_shouldFail() {
    let mut config = Config::default();
    config.file_io.input_file = "Strings.csv".to_string();
    config.cache.enabled = true;
    assert!(config.validate().is_err());

    config.cache.directory = "cache".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withInvalidLanguageCode_shouldFail() {
    let mut config = Config::default();
    config.file_io.input_file = "Strings.csv".to_string();
    config.translation.target_language = "xx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_languageNames_withEmptyConfiguredNames_shouldDeriveFromCodes() {
    let config = Config::default();
    assert_eq!(config.translation.source_language_name().unwrap(), "English");
    assert_eq!(config.translation.target_language_name().unwrap(), "German");
}

#[test]
fn test_languageNames_withConfiguredNames_shouldPreferThem() {
    let mut config = Config::default();
    config.translation.target_language_name = "Deutsch".to_string();
    assert_eq!(config.translation.target_language_name().unwrap(), "Deutsch");
}
