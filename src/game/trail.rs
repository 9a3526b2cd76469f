use super::types::TrailSegment;
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Bounded history of positions behind a player, oldest first.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    segments: VecDeque<TrailSegment>,
    cap: usize,
}

impl TrailBuffer {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            segments: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, segment: TrailSegment) {
        self.segments.push_back(segment);
        while self.segments.len() > self.cap {
            self.segments.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TrailSegment> + ExactSizeIterator {
        self.segments.iter()
    }

    #[cfg(test)]
    pub fn newest(&self) -> Option<&TrailSegment> {
        self.segments.back()
    }
}

impl Serialize for TrailBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.segments)
    }
}
