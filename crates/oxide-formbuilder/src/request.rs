//! Submitted form data and uploaded file metadata.

use std::collections::HashMap;

/// Values submitted with a request, keyed by field name.
///
/// Every name can carry several values; scalar reads return the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedData {
    values: HashMap<String, Vec<String>>,
}

impl SubmittedData {
    /// Creates empty submitted data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` body or query string.
    ///
    /// Keys ending in `[]` are stored under the bare name, so
    /// `tags[]=a&tags[]=b` yields two values for `tags`.
    pub fn from_urlencoded(body: &str) -> Self {
        let mut data = Self::new();
        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let mut parts = pair.splitn(2, '=');
            let key = urlencoding_decode(parts.next().unwrap_or(""));
            let value = urlencoding_decode(parts.next().unwrap_or(""));
            let key = key.strip_suffix("[]").map_or(key.clone(), str::to_string);
            data.append(key, value);
        }
        data
    }

    /// Builder method to add a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Adds a value under a name, keeping earlier ones.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Replaces all values under a name with a single value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), vec![value.into()]);
    }

    /// Returns whether anything was submitted under a name.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the scalar value submitted under a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Returns every value submitted under a name.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns whether `value` is one of the values submitted under `name`.
    pub fn contains_value(&self, name: &str, value: &str) -> bool {
        self.get_all(name).iter().any(|v| v == value)
    }

    /// Returns whether no values were submitted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubmittedData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (name, value) in iter {
            data.append(name, value);
        }
        data
    }
}

/// Metadata of one uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name; empty when the control was left blank.
    pub name: String,
    /// MIME type reported by the client.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileUpload {
    /// Creates a file metadata record.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Uploaded files keyed by field slug.
#[derive(Debug, Clone, Default)]
pub struct UploadedFiles {
    files: HashMap<String, FileUpload>,
}

impl UploadedFiles {
    /// Creates an empty set of uploads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an upload.
    #[must_use]
    pub fn with(mut self, slug: impl Into<String>, file: FileUpload) -> Self {
        self.insert(slug, file);
        self
    }

    /// Stores the upload for a slug.
    pub fn insert(&mut self, slug: impl Into<String>, file: FileUpload) {
        self.files.insert(slug.into(), file);
    }

    /// Returns the upload for a slug.
    pub fn get(&self, slug: &str) -> Option<&FileUpload> {
        self.files.get(slug)
    }
}

/// URL decoding of one key or value; invalid escapes are kept literally.
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencoded_parsing() {
        let data = SubmittedData::from_urlencoded("name=John+Doe&city=New%20York&empty=");
        assert_eq!(data.get("name"), Some("John Doe"));
        assert_eq!(data.get("city"), Some("New York"));
        assert_eq!(data.get("empty"), Some(""));
        assert!(data.contains("empty"));
        assert!(!data.contains("missing"));
    }

    #[test]
    fn test_multi_valued_names() {
        let data = SubmittedData::from_urlencoded("tags[]=red&tags[]=blue&tags=green");
        assert_eq!(data.get_all("tags"), ["red", "blue", "green"]);
        assert_eq!(data.get("tags"), Some("red"));
        assert!(data.contains_value("tags", "blue"));
        assert!(!data.contains_value("tags", "pink"));
    }

    #[test]
    fn test_utf8_and_invalid_escapes() {
        let data = SubmittedData::from_urlencoded("q=caf%C3%A9&p=100%&r=%zz");
        assert_eq!(data.get("q"), Some("café"));
        assert_eq!(data.get("p"), Some("100%"));
        assert_eq!(data.get("r"), Some("%zz"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut data = SubmittedData::new().with("a", "1").with("a", "2");
        data.insert("a", "3");
        assert_eq!(data.get_all("a"), ["3"]);
    }

    #[test]
    fn test_uploaded_files() {
        let files = UploadedFiles::new().with("cv", FileUpload::new("cv.pdf", "application/pdf", 1024));
        assert_eq!(files.get("cv").map(|f| f.size), Some(1024));
        assert!(files.get("photo").is_none());
    }
}
