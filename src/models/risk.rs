use serde::Serialize;

/// Risk categories with their permit counts, as parallel sequences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub risks: Vec<String>,
    pub counts: Vec<i64>,
}

impl RiskDistribution {
    pub fn is_empty(&self) -> bool {
        self.risks.is_empty()
    }

    /// Sum of all category counts
    pub fn total(&self) -> i64 {
        self.counts.iter().sum()
    }

    /// Largest single count, 0 when empty
    pub fn max_count(&self) -> i64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.risks
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

impl FromIterator<(String, i64)> for RiskDistribution {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let (risks, counts) = iter.into_iter().unzip();
        Self { risks, counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_parallel_sequences() {
        let dist: RiskDistribution = vec![("ALTO".to_string(), 3), ("BAJO".to_string(), 2)]
            .into_iter()
            .collect();

        assert_eq!(dist.risks, vec!["ALTO", "BAJO"]);
        assert_eq!(dist.counts, vec![3, 2]);
        assert_eq!(dist.total(), 5);
        assert_eq!(dist.max_count(), 3);
    }

    #[test]
    fn test_empty_distribution() {
        let dist = RiskDistribution::default();
        assert!(dist.is_empty());
        assert_eq!(dist.total(), 0);
        assert_eq!(dist.max_count(), 0);
    }
}
