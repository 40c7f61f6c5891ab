/// Options controlling how element text is cleaned before it is stored
#[derive(Debug, Clone, Copy)]
pub struct TextCleanOptions {
    /// Whether to collapse runs of whitespace (including newlines) into a single space
    pub normalize_whitespace: bool,
}

impl Default for TextCleanOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: false,
        }
    }
}

/// Cleans text with default options
pub fn clean(text: &str) -> String {
    clean_with_options(text, &TextCleanOptions::default())
}

/// Cleans the text of an element according to options.
///
/// The result is always trimmed. An empty result means the element carried
/// no usable text.
pub fn clean_with_options(text: &str, options: &TextCleanOptions) -> String {
    if options.normalize_whitespace {
        normalize_whitespace(text)
    } else {
        text.trim().to_string()
    }
}

/// Collapses every whitespace run into a single space
pub fn normalize_whitespace(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
