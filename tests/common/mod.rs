/*!
 * Common test utilities for the autoloc test suite
 */

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use autoloc::translation::pipeline::PipelineSettings;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample language catalog for testing
pub fn create_test_catalog(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "quest.title,\"A long, dark road\"\n\
                   quest.greeting,\"Hello {name}, welcome!\"\n\
                   quest.authors,Jane Doe\n";
    create_test_file(dir, filename, content)
}

/// Pipeline settings for an English-to-German run with translation on
pub fn test_settings() -> PipelineSettings {
    PipelineSettings {
        source_language: "en".to_string(),
        target_language: "de".to_string(),
        source_language_name: "English".to_string(),
        target_language_name: "German".to_string(),
        translate: true,
        llm_keywords_default: Vec::new(),
        llm_keywords_activation: Vec::new(),
        activation_prefix: "Activation".to_string(),
    }
}
