use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Vote counts per candidate, in the order the candidates were asked for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(String, u64)>,
}

impl Tally {
    pub fn get(&self, candidate: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(name, _)| name == candidate)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Sum over all listed candidates.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// The first candidate with the strictly highest count.
    ///
    /// Ties go to whichever candidate comes first. `None` only when no
    /// candidates were tallied.
    pub fn winner(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (name, count) in self.iter() {
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((name, count)),
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

// Serialized as a map that keeps candidate order.
impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (name, count) in &self.counts {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub candidate: String,
    pub votes: u64,
}

/// Final figures for an election: what the results report is built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectionSummary {
    pub total: u64,
    pub winner: Option<Winner>,
    pub tally: Tally,
}

impl From<Tally> for ElectionSummary {
    fn from(tally: Tally) -> Self {
        let winner = tally.winner().map(|(candidate, votes)| Winner {
            candidate: candidate.to_string(),
            votes,
        });
        Self {
            total: tally.total(),
            winner,
            tally,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(counts: &[(&str, u64)]) -> Tally {
        counts
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn winner_takes_strict_maximum() {
        let t = tally(&[("Alice", 1), ("Bob", 3), ("Charlie", 2)]);
        assert_eq!(t.winner(), Some(("Bob", 3)));
    }

    #[test]
    fn tie_goes_to_first_listed() {
        let t = tally(&[("Alice", 2), ("Bob", 2)]);
        assert_eq!(t.winner(), Some(("Alice", 2)));
        let t = tally(&[("Bob", 2), ("Alice", 2)]);
        assert_eq!(t.winner(), Some(("Bob", 2)));
    }

    #[test]
    fn zero_votes_still_names_first_candidate() {
        let t = tally(&[("Alice", 0), ("Bob", 0)]);
        assert_eq!(t.winner(), Some(("Alice", 0)));
    }

    #[test]
    fn empty_tally_has_no_winner() {
        let t = Tally::default();
        assert!(t.is_empty());
        assert_eq!(t.winner(), None);
        assert_eq!(t.total(), 0);
    }

    #[test]
    fn get_unknown_candidate() {
        let t = tally(&[("Alice", 1)]);
        assert_eq!(t.get("Alice"), Some(1));
        assert_eq!(t.get("Zed"), None);
    }

    #[test]
    fn serializes_in_candidate_order() {
        let t = tally(&[("Charlie", 0), ("Alice", 2), ("Bob", 1)]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"Charlie":0,"Alice":2,"Bob":1}"#);
    }

    #[test]
    fn summary_from_tally() {
        let summary = ElectionSummary::from(tally(&[("Alice", 1), ("Bob", 1), ("Charlie", 0)]));
        assert_eq!(summary.total, 2);
        assert_eq!(
            summary.winner,
            Some(Winner {
                candidate: "Alice".into(),
                votes: 1
            })
        );
        assert_eq!(summary.tally.len(), 3);
    }
}
