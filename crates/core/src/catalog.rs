//! Pure domain rules for the book catalog.
//!
//! File I/O lives in [`crate::store`]; database operations are performed
//! by the repository layer. Everything here is a validation decision.

use crate::error::CoreError;

/// File extensions accepted for upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "epub", "txt"];

/// Maximum accepted upload size: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Category applied when the uploader supplies none.
pub const DEFAULT_CATEGORY: &str = "غير مصنف";

/// Extract the lowercased extension (without the dot) from a filename.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Validate that a filename carries an allowed extension.
///
/// Returns the lowercased extension on success so the caller can reuse it
/// when building the storage name.
pub fn validate_extension(filename: &str) -> Result<String, CoreError> {
    let ext = file_extension(filename).ok_or_else(|| {
        CoreError::Validation(
            "Unsupported file type. Only PDF, EPUB, or TXT files are accepted.".to_string(),
        )
    })?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(
            "Unsupported file type. Only PDF, EPUB, or TXT files are accepted.".to_string(),
        ));
    }
    Ok(ext)
}

/// Validate an upload size against the given limit.
pub fn validate_size(size_bytes: u64, max_bytes: u64) -> Result<(), CoreError> {
    if size_bytes > max_bytes {
        return Err(CoreError::Validation(format!(
            "File too large. The maximum size is {} MiB.",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Validate a rating value is within the allowed range [1, 5].
pub fn validate_rating(rating: f64) -> Result<(), CoreError> {
    if !(1.0..=5.0).contains(&rating) {
        return Err(CoreError::Validation(
            "Rating must be between 1 and 5.".to_string(),
        ));
    }
    Ok(())
}

/// Normalize an optional free-text field: empty strings count as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("book.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("archive.tar.EPUB"), Some("epub".to_string()));
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("trailing."), None);
        assert_matches!(validate_extension("noext"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn allowed_extensions_pass_case_insensitively() {
        for name in ["a.pdf", "b.EPUB", "c.Txt"] {
            assert!(validate_extension(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn disallowed_extensions_fail_with_type_message() {
        let err = validate_extension("malware.exe").unwrap_err();
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_size(MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES).is_ok());
        let err = validate_size(MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn rating_range_is_closed() {
        assert_matches!(validate_rating(0.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_rating(6.0), Err(CoreError::Validation(_)));
        assert!(validate_rating(1.0).is_ok());
        assert!(validate_rating(5.0).is_ok());
        assert!(validate_rating(3.5).is_ok());
    }

    #[test]
    fn empty_optional_fields_become_none() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("روايات".to_string())), Some("روايات".to_string()));
    }
}
