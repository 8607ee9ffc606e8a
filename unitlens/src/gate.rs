//! Document-type gate
//!
//! The pipeline only runs for document types a handler claims. Anything
//! else is skipped by the host before scanning; it is not an error.

/// A family of documents the pipeline may run on
pub trait DocumentHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn supported_languages(&self) -> &'static [&'static str];

    fn can_handle(&self, language_id: &str) -> bool {
        self.supported_languages().contains(&language_id)
    }
}

/// JSON and JSON with comments
pub struct JsonHandler;

impl DocumentHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        &["json", "jsonc"]
    }
}

pub struct DocumentGate {
    handlers: Vec<Box<dyn DocumentHandler>>,
}

impl DocumentGate {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    pub fn with_handler<H: DocumentHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_for(&self, language_id: &str) -> Option<&dyn DocumentHandler> {
        self.handlers
            .iter()
            .find(|h| h.can_handle(language_id))
            .map(|h| h.as_ref())
    }

    pub fn allows(&self, language_id: &str) -> bool {
        self.handler_for(language_id).is_some()
    }

    /// Every supported language id, deduplicated, in handler order
    pub fn languages(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for lang in self.handlers.iter().flat_map(|h| h.supported_languages()) {
            if !out.contains(lang) {
                out.push(lang);
            }
        }
        out
    }
}

impl Default for DocumentGate {
    fn default() -> Self {
        Self::new().with_handler(JsonHandler)
    }
}
