//! One conflict-resolution pass over a `(surface, page)`.

use std::collections::HashMap;

use homegrid_core::{GridDims, GridItem, ItemId};
use tracing::{debug, warn};

use crate::{occupancy::Occupancy, search::find_region};

/// Outcome of a resolution pass: the full new candidate list plus a faithful
/// account of what was displaced and what could not be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The complete item list, with relocations applied. Items of other
    /// pages and surfaces pass through untouched, in their input order.
    pub items: Vec<GridItem>,
    /// Ids that were moved to a new origin to make room for the mover.
    pub relocated: Vec<ItemId>,
    /// Ids left overlapping because no free region existed. Accepted
    /// degraded outcome, never an error.
    pub unplaced: Vec<ItemId>,
}

/// Run one resolution pass.
///
/// The mover always keeps its requested position; it never yields to other
/// items. Every other item on the mover's `(surface, page)` is visited in
/// ascending id order (the stable order that makes repeated runs
/// bit-identical) and relocated via [`find_region`] if its cells intersect
/// space that is already taken. The search starts from the displaced item's
/// own current origin, so displaced items settle near where the user put
/// them rather than piling up around the mover; starting from the mover's
/// origin instead is a one-line change here.
///
/// The caller is responsible for bounds-validating the mover beforehand.
pub fn resolve(items: &[GridItem], mover: &GridItem, dims: GridDims) -> Resolution {
    let key = mover.key();
    let mut occ = Occupancy::new(dims);
    occ.mark_rect(&mover.cells());

    let mut peers: Vec<&GridItem> = items
        .iter()
        .filter(|i| i.key() == key && i.id != mover.id)
        .collect();
    peers.sort_by_key(|i| i.id);

    let mut placed: HashMap<ItemId, GridItem> = HashMap::new();
    let mut relocated = Vec::new();
    let mut unplaced = Vec::new();

    for peer in peers {
        let rect = peer.cells();
        if !occ.intersects(&rect) {
            occ.mark_rect(&rect);
            continue;
        }
        match find_region(&occ, peer.span, peer.origin) {
            Some(anchor) => {
                debug!(id = %peer.id, from = %peer.origin, to = %anchor, "relocating displaced item");
                let moved = peer.with_origin(anchor);
                occ.mark_rect(&moved.cells());
                relocated.push(peer.id);
                placed.insert(peer.id, moved);
            }
            None => {
                warn!(id = %peer.id, at = %peer.origin, "no free region; item left overlapping");
                occ.mark_rect(&rect);
                unplaced.push(peer.id);
            }
        }
    }

    let mut seen_mover = false;
    let mut out = Vec::with_capacity(items.len() + 1);
    for item in items {
        if item.id == mover.id {
            // Replaces the previous entry wherever it lived, so a move
            // across pages never leaves a stale copy behind.
            out.push(mover.clone());
            seen_mover = true;
        } else if let Some(moved) = placed.remove(&item.id) {
            out.push(moved);
        } else {
            out.push(item.clone());
        }
    }
    if !seen_mover {
        out.push(mover.clone());
    }

    Resolution {
        items: out,
        relocated,
        unplaced,
    }
}

#[cfg(test)]
mod tests {
    use homegrid_core::{CellPos, ItemPayload, Span, Surface};

    use super::*;

    fn dims() -> GridDims {
        GridDims::new(4, 4).unwrap()
    }

    fn item(id: u64, row: i16, col: i16) -> GridItem {
        sized_item(id, row, col, 1, 1)
    }

    fn sized_item(id: u64, row: i16, col: i16, rows: u16, cols: u16) -> GridItem {
        GridItem {
            id: ItemId(id),
            page: 0,
            surface: Surface::Grid,
            origin: CellPos::new(row, col),
            span: Span::new(rows, cols),
            payload: ItemPayload::App {
                bundle: format!("app.{id}"),
            },
        }
    }

    fn origin_of(res: &Resolution, id: u64) -> CellPos {
        res.items
            .iter()
            .find(|i| i.id == ItemId(id))
            .map(|i| i.origin)
            .unwrap()
    }

    /// The concrete displacement scenario: A onto B's cell relocates B to
    /// the nearest free cell and leaves C untouched. With the (row, col)
    /// tie-break, B's nearest free cell is A's vacated (0, 1).
    #[test]
    fn mover_displaces_only_the_conflicting_item() {
        let a = item(1, 0, 1);
        let b = item(2, 1, 1);
        let c = item(3, 0, 0);
        let moved_a = a.with_origin(CellPos::new(1, 1));

        let res = resolve(&[a, b, c], &moved_a, dims());

        assert_eq!(origin_of(&res, 1), CellPos::new(1, 1));
        assert_eq!(origin_of(&res, 2), CellPos::new(0, 1));
        assert_eq!(origin_of(&res, 3), CellPos::new(0, 0));
        assert_eq!(res.relocated, vec![ItemId(2)]);
        assert!(res.unplaced.is_empty());
        assert!(!res.items[0].cells().intersects(&res.items[1].cells()));
    }

    #[test]
    fn non_conflicting_items_untouched() {
        let a = item(1, 0, 0);
        let b = item(2, 3, 3);
        let moved_a = a.with_origin(CellPos::new(0, 1));
        let res = resolve(&[a, b], &moved_a, dims());
        assert_eq!(origin_of(&res, 2), CellPos::new(3, 3));
        assert!(res.relocated.is_empty());
    }

    #[test]
    fn full_grid_leaves_one_item_overlapping() {
        // Fill all 16 cells, then drop a new item onto an occupied cell.
        // The displacement cascades cell by cell until the last conflicting
        // item finds the grid exhausted; that item stays put, overlapping,
        // and is reported rather than dropped.
        let mut items = Vec::new();
        let mut id = 1u64;
        for row in 0..4 {
            for col in 0..4 {
                items.push(item(id, row, col));
                id += 1;
            }
        }
        let incoming = item(99, 1, 1);
        let res = resolve(&items, &incoming, dims());
        assert_eq!(res.unplaced.len(), 1);
        assert_eq!(res.items.len(), items.len() + 1);
        let stuck = res.unplaced[0];
        assert_eq!(
            origin_of(&res, stuck.0),
            items
                .iter()
                .find(|i| i.id == stuck)
                .map(|i| i.origin)
                .unwrap(),
            "the unplaced item must keep its original cell"
        );
        // Every pair not involving the unplaced item is disjoint.
        for (i, a) in res.items.iter().enumerate() {
            for b in res.items.iter().skip(i + 1) {
                if a.id == stuck || b.id == stuck {
                    continue;
                }
                assert!(!a.cells().intersects(&b.cells()));
            }
        }
    }

    #[test]
    fn other_pages_and_surfaces_pass_through() {
        let a = item(1, 0, 0);
        let mut other_page = item(2, 0, 0);
        other_page.page = 1;
        let mut dock = item(3, 0, 0);
        dock.surface = Surface::Dock;
        let moved_a = a.with_origin(CellPos::new(0, 0));
        let res = resolve(&[a, other_page.clone(), dock.clone()], &moved_a, dims());
        assert_eq!(res.items[1], other_page);
        assert_eq!(res.items[2], dock);
    }

    #[test]
    fn idempotent_on_conflict_free_lists() {
        let a = item(1, 1, 1);
        let b = item(2, 2, 2);
        let first = resolve(&[a.clone(), b], &a, dims());
        let second = resolve(&first.items, &a, dims());
        assert_eq!(first.items, second.items);
        assert!(second.relocated.is_empty());
        assert!(second.unplaced.is_empty());
    }

    #[test]
    fn deterministic_output() {
        let items = vec![item(4, 1, 0), item(2, 1, 1), item(3, 1, 2), item(1, 0, 0)];
        let mover = sized_item(1, 1, 0, 1, 3);
        let first = resolve(&items, &mover, dims());
        for _ in 0..10 {
            assert_eq!(resolve(&items, &mover, dims()), first);
        }
    }

    #[test]
    fn new_item_is_appended() {
        let a = item(1, 0, 0);
        let fresh = item(9, 2, 2);
        let res = resolve(&[a], &fresh, dims());
        assert_eq!(res.items.len(), 2);
        assert_eq!(res.items[1].id, ItemId(9));
    }

    #[test]
    fn cascade_keeps_all_items_disjoint() {
        // A 2x2 mover lands on three single-cell items at once.
        let items = vec![item(1, 0, 0), item(2, 0, 1), item(3, 1, 0), item(4, 1, 1)];
        let mover = sized_item(5, 0, 0, 2, 2);
        let res = resolve(&items, &mover, dims());
        assert!(res.unplaced.is_empty());
        for (i, a) in res.items.iter().enumerate() {
            for b in res.items.iter().skip(i + 1) {
                assert!(
                    !a.cells().intersects(&b.cells()),
                    "{} and {} overlap",
                    a.id,
                    b.id
                );
            }
        }
    }
}
