use ocrpanel_types::{Keyword, KeywordFlag};
use unicode_normalization::UnicodeNormalization;

use crate::error::ValidationError;

/// Comparison form of keyword text: trimmed, NFKC, lowercase
pub fn comparison_key(text: &str) -> String {
    text.trim().nfkc().collect::<String>().to_lowercase()
}

/// Trim and reject empty input before anything else happens
pub fn clean_keyword(text: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyKeyword);
    }
    Ok(text.to_string())
}

pub fn contains_keyword(keywords: &[Keyword], text: &str) -> bool {
    let key = comparison_key(text);
    keywords.iter().any(|k| comparison_key(&k.text) == key)
}

/// Append a new enabled, non-pinging keyword unless it already exists
pub fn push_keyword(keywords: &mut Vec<Keyword>, text: &str) -> Result<(), ValidationError> {
    let text = clean_keyword(text)?;
    if contains_keyword(keywords, &text) {
        return Err(ValidationError::DuplicateKeyword);
    }
    keywords.push(Keyword::new(text));
    Ok(())
}

/// Remove by position, keeping the order of the rest
pub fn remove_keyword(keywords: &mut Vec<Keyword>, index: usize) -> Result<Keyword, ValidationError> {
    if index >= keywords.len() {
        return Err(ValidationError::IndexOutOfRange {
            list: "keyword",
            index,
        });
    }
    Ok(keywords.remove(index))
}

pub fn set_keyword_flag(
    keywords: &mut [Keyword],
    index: usize,
    flag: KeywordFlag,
    value: bool,
) -> Result<(), ValidationError> {
    let keyword = keywords
        .get_mut(index)
        .ok_or(ValidationError::IndexOutOfRange {
            list: "keyword",
            index,
        })?;

    match flag {
        KeywordFlag::Enabled => keyword.enabled = value,
        KeywordFlag::Ping => keyword.ping = value,
    }
    Ok(())
}
