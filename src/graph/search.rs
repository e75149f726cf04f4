use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::GraphSnapshot;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl GraphSnapshot {
    /// Node indices matching `query`, best match first. Exact id matches
    /// always rank first.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        if let Some(exact) = self.index_of(query) {
            let mut matches = vec![exact];
            matches.extend(self.fuzzy_matches(query).into_iter().filter(|&index| index != exact));
            return matches;
        }

        self.fuzzy_matches(query)
    }

    fn fuzzy_matches(&self, query: &str) -> Vec<usize> {
        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.id, query).map(|score| (score, index))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.into_iter().map(|(_score, index)| index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> GraphSnapshot {
        GraphSnapshot::load(
            ["xxx--", "xx-x-", "x-xx-", "-xxx-"].map(String::from),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn exact_id_ranks_first() {
        let graph = graph();
        let matches = graph.search("xx-x-");
        assert_eq!(matches.first().copied(), graph.index_of("xx-x-"));
        assert_eq!(
            matches.iter().filter(|&&index| Some(index) == graph.index_of("xx-x-")).count(),
            1
        );
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(graph().search("   ").is_empty());
    }

    #[test]
    fn unmatched_query_is_empty() {
        assert!(graph().search("zz").is_empty());
    }
}
