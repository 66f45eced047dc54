//! Annotations attached to sync results.

use serde::{Deserialize, Serialize};

use crate::ratelimit::RateLimitDescriptor;

/// A piece of metadata returned alongside a sync result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// Upstream quota state observed on the response.
    RateLimit(RateLimitDescriptor),
}

/// Ordered collection of [`Annotation`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding one rate-limit annotation.
    pub fn with_rate_limit(descriptor: RateLimitDescriptor) -> Self {
        Self(vec![Annotation::RateLimit(descriptor)])
    }

    /// Appends an annotation.
    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    /// Returns the last rate-limit descriptor, if any.
    pub fn rate_limit(&self) -> Option<&RateLimitDescriptor> {
        self.0.iter().rev().find_map(|a| match a {
            Annotation::RateLimit(d) => Some(d),
        })
    }

    /// Iterates over the annotations.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    /// Returns the number of annotations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
