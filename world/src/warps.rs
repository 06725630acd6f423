//! Dense warp tables indexed by tile number.

use snakes_ladders_core::{BoardConfig, TileIndex, Warp, WarpKind, FINAL_TILE};

/// One warp target slot per tile; slot zero is never used.
#[derive(Clone, Debug, PartialEq, Eq)]
struct WarpTable {
    targets: Vec<Option<TileIndex>>,
}

impl WarpTable {
    fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a TileIndex, &'a TileIndex)>,
    {
        let capacity = usize::try_from(FINAL_TILE).unwrap_or(0) + 1;
        let mut targets = vec![None; capacity];
        for (from, to) in entries {
            if let Some(slot) = targets.get_mut(index(*from)) {
                *slot = Some(*to);
            }
        }
        Self { targets }
    }

    fn get(&self, tile: TileIndex) -> Option<TileIndex> {
        self.targets.get(index(tile)).copied().flatten()
    }

    fn remove(&mut self, tile: TileIndex) -> Option<TileIndex> {
        self.targets.get_mut(index(tile)).and_then(Option::take)
    }

    fn highest(&self) -> Option<TileIndex> {
        self.iter().last().map(|(from, _)| from)
    }

    fn iter(&self) -> impl Iterator<Item = (TileIndex, TileIndex)> + '_ {
        self.targets.iter().enumerate().filter_map(|(slot, target)| {
            let to = (*target)?;
            let from = TileIndex::new(u32::try_from(slot).ok()?).ok()?;
            Some((from, to))
        })
    }
}

fn index(tile: TileIndex) -> usize {
    usize::try_from(tile.get()).unwrap_or(0)
}

/// Setback and shortcut mappings of a session.
///
/// Shortcuts never change after construction. Setbacks may only shrink, and
/// [`WarpGraph::restore`] brings back the configured set.
#[derive(Clone, Debug)]
pub(crate) struct WarpGraph {
    setbacks: WarpTable,
    configured_setbacks: WarpTable,
    shortcuts: WarpTable,
}

impl WarpGraph {
    pub(crate) fn from_config(config: &BoardConfig) -> Self {
        let setbacks = WarpTable::from_entries(config.setbacks());
        Self {
            configured_setbacks: setbacks.clone(),
            setbacks,
            shortcuts: WarpTable::from_entries(config.shortcuts()),
        }
    }

    pub(crate) fn lookup_setback(&self, tile: TileIndex) -> Option<TileIndex> {
        self.setbacks.get(tile)
    }

    pub(crate) fn lookup_shortcut(&self, tile: TileIndex) -> Option<TileIndex> {
        self.shortcuts.get(tile)
    }

    /// Performs the single warp lookup for a landing tile, setbacks first.
    pub(crate) fn resolve(&self, tile: TileIndex) -> Option<Warp> {
        if let Some(to) = self.lookup_setback(tile) {
            return Some(Warp {
                kind: WarpKind::Setback,
                from: tile,
                to,
            });
        }
        self.lookup_shortcut(tile).map(|to| Warp {
            kind: WarpKind::Shortcut,
            from: tile,
            to,
        })
    }

    /// Removes the setback starting at `tile`. Absent entries are ignored.
    pub(crate) fn remove_setback(&mut self, tile: TileIndex) {
        let _ = self.setbacks.remove(tile);
    }

    /// Removes the remaining setback closest to the goal and reports its source.
    pub(crate) fn remove_highest_setback(&mut self) -> Option<TileIndex> {
        let tile = self.setbacks.highest()?;
        self.remove_setback(tile);
        Some(tile)
    }

    pub(crate) fn restore(&mut self) {
        self.setbacks = self.configured_setbacks.clone();
    }

    pub(crate) fn setbacks(&self) -> Vec<Warp> {
        collect(&self.setbacks, WarpKind::Setback)
    }

    pub(crate) fn shortcuts(&self) -> Vec<Warp> {
        collect(&self.shortcuts, WarpKind::Shortcut)
    }
}

fn collect(table: &WarpTable, kind: WarpKind) -> Vec<Warp> {
    table
        .iter()
        .map(|(from, to)| Warp { kind, from, to })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(value: u32) -> TileIndex {
        TileIndex::new(value).expect("tile on board")
    }

    fn graph() -> WarpGraph {
        WarpGraph::from_config(&BoardConfig::reference())
    }

    #[test]
    fn lookups_return_configured_targets() {
        let graph = graph();
        assert_eq!(graph.lookup_setback(tile(47)), Some(tile(26)));
        assert_eq!(graph.lookup_shortcut(tile(80)), Some(tile(100)));
        assert_eq!(graph.lookup_setback(tile(80)), None);
        assert_eq!(graph.lookup_shortcut(tile(3)), None);
    }

    #[test]
    fn highest_setback_is_removed_first() {
        let mut graph = graph();
        assert_eq!(graph.remove_highest_setback(), Some(tile(98)));
        assert_eq!(graph.remove_highest_setback(), Some(tile(95)));
        assert_eq!(graph.lookup_setback(tile(98)), None);
        assert_eq!(graph.lookup_setback(tile(93)), Some(tile(73)));
    }

    #[test]
    fn removing_missing_setback_is_a_no_op() {
        let mut graph = graph();
        graph.remove_setback(tile(50));
        assert_eq!(graph.setbacks().len(), 10);
    }

    #[test]
    fn removal_stops_when_no_setbacks_remain() {
        let mut graph = graph();
        for _ in 0..10 {
            assert!(graph.remove_highest_setback().is_some());
        }
        assert_eq!(graph.remove_highest_setback(), None);
        assert!(graph.setbacks().is_empty());
    }

    #[test]
    fn restore_brings_back_every_configured_setback() {
        let mut graph = graph();
        let configured = graph.setbacks();
        let _ = graph.remove_highest_setback();
        graph.remove_setback(tile(16));
        graph.restore();
        assert_eq!(graph.setbacks(), configured);
    }

    #[test]
    fn resolve_checks_setbacks_before_shortcuts() {
        let graph = graph();
        assert_eq!(
            graph.resolve(tile(16)),
            Some(Warp {
                kind: WarpKind::Setback,
                from: tile(16),
                to: tile(6),
            })
        );
        assert_eq!(
            graph.resolve(tile(2)).map(|warp| warp.kind),
            Some(WarpKind::Shortcut)
        );
        assert_eq!(graph.resolve(tile(3)), None);
    }
}
