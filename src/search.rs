use crate::Segment;

/// Find the first segment whose text contains the topic, case-insensitively.
///
/// Returns the segment's start offset in seconds. Matching is plain substring
/// containment, so "cat" also matches inside "concatenate". Case folding is
/// `str::to_lowercase`, which is locale-independent.
pub fn find_topic(segments: &[Segment], topic: &str) -> Option<f64> {
    let needle = topic.to_lowercase();
    segments
        .iter()
        .find(|seg| seg.text.to_lowercase().contains(&needle))
        .map(|seg| seg.start)
}
