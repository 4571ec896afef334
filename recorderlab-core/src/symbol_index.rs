//! Symbol index: append-only, first-seen-ordered set of known instruments.
//!
//! Feeds the symbol completion popup. Owned by the presentation thread; the
//! engine never sees it.

use std::collections::HashSet;

use crate::symbol::VtSymbol;

#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    order: Vec<VtSymbol>,
    seen: HashSet<VtSymbol>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an initial listing, dropping duplicates.
    pub fn seeded<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = VtSymbol>,
    {
        let mut index = Self::new();
        index.seed(symbols);
        index
    }

    /// Observe every symbol in order.
    pub fn seed<I>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = VtSymbol>,
    {
        for symbol in symbols {
            self.observe(symbol);
        }
    }

    /// Append `symbol` if it has not been seen yet. Returns true when it was new.
    pub fn observe(&mut self, symbol: VtSymbol) -> bool {
        if self.seen.contains(&symbol) {
            return false;
        }
        self.seen.insert(symbol.clone());
        self.order.push(symbol);
        true
    }

    /// Owned copy of the current ordering.
    pub fn snapshot(&self) -> Vec<VtSymbol> {
        self.order.clone()
    }

    pub fn as_slice(&self) -> &[VtSymbol] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Case-insensitive substring match, in index order.
    ///
    /// An empty query matches nothing so the popup stays closed until the
    /// operator starts typing.
    pub fn matches(&self, query: &str) -> Vec<&VtSymbol> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.order
            .iter()
            .filter(|s| s.as_str().to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> VtSymbol {
        VtSymbol::from(s)
    }

    #[test]
    fn observe_appends_in_first_seen_order() {
        let mut index = SymbolIndex::new();
        assert!(index.observe(sym("IF2312.CFFEX")));
        assert!(index.observe(sym("rb2401.SHFE")));
        assert!(index.observe(sym("au2402.SHFE")));
        assert_eq!(
            index.snapshot(),
            vec![sym("IF2312.CFFEX"), sym("rb2401.SHFE"), sym("au2402.SHFE")]
        );
    }

    #[test]
    fn repeated_observe_is_a_noop() {
        let mut index = SymbolIndex::new();
        assert!(index.observe(sym("rb2401.SHFE")));
        for _ in 0..5 {
            assert!(!index.observe(sym("rb2401.SHFE")));
        }
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn seeded_drops_duplicates_keeping_first_position() {
        let index = SymbolIndex::seeded(vec![sym("a.X"), sym("b.X"), sym("a.X"), sym("c.X")]);
        assert_eq!(index.snapshot(), vec![sym("a.X"), sym("b.X"), sym("c.X")]);
    }

    #[test]
    fn snapshot_is_detached_from_later_growth() {
        let mut index = SymbolIndex::seeded(vec![sym("a.X")]);
        let before = index.snapshot();
        index.observe(sym("b.X"));
        assert_eq!(before.len(), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn matches_is_case_insensitive_substring() {
        let index = SymbolIndex::seeded(vec![
            sym("IF2312.CFFEX"),
            sym("rb2401.SHFE"),
            sym("rb2405.SHFE"),
            sym("IC2312.CFFEX"),
        ]);
        let hits: Vec<&str> = index.matches("RB24").iter().map(|s| s.as_str()).collect();
        assert_eq!(hits, vec!["rb2401.SHFE", "rb2405.SHFE"]);

        let hits: Vec<&str> = index.matches("cffex").iter().map(|s| s.as_str()).collect();
        assert_eq!(hits, vec!["IF2312.CFFEX", "IC2312.CFFEX"]);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let index = SymbolIndex::seeded(vec![sym("IF2312.CFFEX")]);
        assert!(index.matches("").is_empty());
        assert!(index.matches("   ").is_empty());
    }
}
