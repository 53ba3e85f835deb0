/*!
 * Catalog IO for delimiter-separated localization files.
 *
 * Language files are `key<delimiter>value` rows where the value may itself
 * contain unquoted delimiters, so rows are split at the first delimiter
 * occurrence only. Cache and glossary files are regular CSV and go through
 * the csv crate.
 */

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CatalogError;

/// One key/value row of a localization catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Localization key, e.g. `quest.title`
    pub key: String,
    /// Raw value text, possibly quote- or pipe-delimited
    pub value: String,
}

impl LanguageEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Catalog file operations
pub struct Catalog;

impl Catalog {
    /// Read a language file into entries. Each row is split at the FIRST
    /// delimiter occurrence; a row without the delimiter aborts the file.
    pub fn read_entries<P: AsRef<Path>>(
        path: P,
        delimiter: &str,
    ) -> Result<Vec<LanguageEntry>, CatalogError> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut entries = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once(delimiter) {
                Some((key, value)) => entries.push(LanguageEntry::new(key, value)),
                None => {
                    return Err(CatalogError::MalformedRow {
                        line: index + 1,
                        content: line.to_string(),
                    });
                }
            }
        }
        Ok(entries)
    }

    /// Write entries back as raw `key<delimiter>value` rows, no quoting.
    pub fn write_entries<P: AsRef<Path>>(
        path: P,
        entries: &[LanguageEntry],
        delimiter: &str,
    ) -> Result<(), CatalogError> {
        let mut content = String::new();
        for entry in entries {
            content.push_str(&entry.key);
            content.push_str(delimiter);
            content.push_str(&entry.value);
            content.push('\n');
        }
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Build the output file name by inserting the suffix before the
    /// extension: `Strings.csv` + `_de` becomes `Strings_de.csv`.
    pub fn derive_output_path(input_file: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
        let stem = input_file
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy();
        let file_name = match input_file.extension() {
            Some(extension) => format!("{}{}.{}", stem, suffix, extension.to_string_lossy()),
            None => format!("{}{}", stem, suffix),
        };
        output_dir.join(file_name)
    }

    /// Read persisted cache rows (`Key`/`Value` header). Rows with an empty
    /// side are dropped.
    pub fn read_cache_rows<P: AsRef<Path>>(
        path: P,
        delimiter: &str,
    ) -> Result<Vec<(String, String)>, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_byte(delimiter))
            .has_headers(true)
            .flexible(true)
            .from_path(path.as_ref())?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let key = record.get(0).unwrap_or("");
            let value = record.get(1).unwrap_or("");
            if key.trim().is_empty() || value.trim().is_empty() {
                continue;
            }
            rows.push((key.to_string(), value.to_string()));
        }
        Ok(rows)
    }

    /// Write cache rows with a `Key`/`Value` header, all fields quoted.
    pub fn write_cache_rows<P: AsRef<Path>>(
        path: P,
        rows: &[(String, String)],
        delimiter: &str,
    ) -> Result<(), CatalogError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter_byte(delimiter))
            .quote_style(csv::QuoteStyle::Always)
            .from_path(path.as_ref())?;
        writer.write_record(["Key", "Value"])?;
        for (key, value) in rows {
            writer.write_record([key, value])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read glossary pairs from a CSV whose header carries language display
    /// names as column titles. A missing language column is an error; rows
    /// with an empty side are skipped.
    pub fn read_glossary_pairs<P: AsRef<Path>>(
        path: P,
        source_name: &str,
        target_name: &str,
        delimiter: &str,
    ) -> Result<Vec<(String, String)>, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_byte(delimiter))
            .has_headers(true)
            .flexible(true)
            .from_path(path.as_ref())?;
        let headers = reader.headers()?.clone();
        let source_index = column_index(&headers, source_name)?;
        let target_index = column_index(&headers, target_name)?;

        let mut pairs = Vec::new();
        for record in reader.records() {
            let record = record?;
            let source = record.get(source_index).unwrap_or("");
            let target = record.get(target_index).unwrap_or("");
            if source.is_empty() || target.is_empty() {
                continue;
            }
            pairs.push((source.to_string(), target.to_string()));
        }
        Ok(pairs)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, CatalogError> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
}

fn delimiter_byte(delimiter: &str) -> u8 {
    delimiter.as_bytes().first().copied().unwrap_or(b',')
}
