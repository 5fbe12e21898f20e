use std::collections::BTreeSet;

/// Sorted, deduplicated date labels driving the time slider.
///
/// Labels are whitespace-trimmed before dedup; ordering is lexicographic,
/// which matches chronological order for the `YYYY-MM-DD` labels the
/// dataset carries. Blank labels never enter the index: the empty string
/// stays reserved as the match-nothing filter value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateIndex {
    labels: Vec<String>,
}

impl DateIndex {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = labels
            .into_iter()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect();
        Self {
            labels: distinct.into_iter().map(str::to_owned).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at a slider position.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.labels.get(position).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Largest valid slider position, which is 0 while the index is empty.
    pub fn last_position(&self) -> usize {
        self.labels.len().saturating_sub(1)
    }
}
