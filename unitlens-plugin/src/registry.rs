//! Converter Registry

use crate::{ConverterMeta, ConverterPlugin};
use std::collections::HashSet;
use std::sync::Arc;
use unitlens_core::UnitLensError;

/// Ordered set of converters.
///
/// Registration order is the tie-break priority when two converters match
/// the same text: the earlier one wins.
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn ConverterPlugin>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Register a converter. A second converter with an already registered
    /// id is ignored, keeping first-registered-wins.
    pub fn with_converter<C: ConverterPlugin + 'static>(mut self, c: C) -> Self {
        if self.get(c.meta().id).is_none() {
            self.converters.push(Arc::new(c));
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn ConverterPlugin>> {
        self.converters.iter().find(|c| c.meta().id == id)
    }

    /// Like [`get`](Self::get) but with an error suggesting close ids
    pub fn lookup(&self, id: &str) -> Result<&Arc<dyn ConverterPlugin>, UnitLensError> {
        self.get(id).ok_or_else(|| {
            let similar = self.find_similar(id);
            let err = UnitLensError::unknown_converter(id);
            if similar.is_empty() {
                err
            } else {
                err.with_suggestion(format!("Similar: {}", similar.join(", ")))
            }
        })
    }

    pub fn converters(&self) -> &[Arc<dyn ConverterPlugin>] {
        &self.converters
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Metadata of every converter, in registry order
    pub fn list(&self) -> Vec<ConverterMeta> {
        self.converters.iter().map(|c| c.meta()).collect()
    }

    /// Distinct configuration namespaces, in first-use order
    pub fn namespaces(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        self.converters
            .iter()
            .map(|c| c.meta().namespace)
            .filter(|ns| seen.insert(*ns))
            .collect()
    }

    fn find_similar(&self, id: &str) -> Vec<&'static str> {
        let query = id.to_lowercase();
        let mut matches: Vec<(&'static str, usize)> = self
            .converters
            .iter()
            .map(|c| c.meta().id)
            .filter_map(|candidate| {
                let score = Self::similarity_score(&query, &candidate.to_lowercase());
                (score > 0).then_some((candidate, score))
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(id, _)| id).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        // a couple of shared letters is noise for short ids
        if common >= 3 {
            score += common * 2;
        }

        score
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
