use crate::types::{CatalogRow, Mode, Status};

/// Status predicate for a [`Mode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClassifier {
    mode: Mode,
}

impl StatusClassifier {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn matches(&self, status: &Status) -> bool {
        match self.mode {
            Mode::Match => *status == Status::Match,
            Mode::Alias => *status == Status::Alias,
            Mode::Recovery => *status != Status::NotRecovered,
        }
    }

    pub fn count<'a, I>(&self, rows: I) -> usize
    where
        I: IntoIterator<Item = &'a CatalogRow>,
    {
        rows.into_iter().filter(|row| self.matches(&row.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses() -> Vec<Status> {
        vec![
            Status::Match,
            Status::Alias,
            Status::NotRecovered,
            Status::Other("half_alias".to_string()),
        ]
    }

    #[test]
    fn test_match_mode() {
        let c = StatusClassifier::new(Mode::Match);
        let hits: Vec<bool> = statuses().iter().map(|s| c.matches(s)).collect();
        assert_eq!(hits, vec![true, false, false, false]);
    }

    #[test]
    fn test_alias_mode() {
        let c = StatusClassifier::new(Mode::Alias);
        let hits: Vec<bool> = statuses().iter().map(|s| c.matches(s)).collect();
        assert_eq!(hits, vec![false, true, false, false]);
    }

    #[test]
    fn test_recovery_counts_unknown_labels() {
        let c = StatusClassifier::new(Mode::Recovery);
        let hits: Vec<bool> = statuses().iter().map(|s| c.matches(s)).collect();
        assert_eq!(hits, vec![true, true, false, true]);
    }
}
