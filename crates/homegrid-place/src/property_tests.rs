use std::collections::HashSet;

use homegrid_core::{
    CellPos, CellRect, GridDims, GridItem, ItemId, ItemPayload, ScreenSize, Span, Surface, geom,
};
use proptest::prelude::*;

use crate::{Occupancy, find_region, resolve};

fn dims_strategy() -> impl Strategy<Value = GridDims> {
    (1u16..=8, 1u16..=8).prop_map(|(rows, cols)| GridDims::new(rows, cols).unwrap())
}

fn items_strategy() -> impl Strategy<Value = (GridDims, Vec<GridItem>)> {
    dims_strategy().prop_flat_map(|dims| {
        let item = (
            0i16..dims.rows() as i16,
            0i16..dims.cols() as i16,
            1u16..=2,
            1u16..=2,
        )
            .prop_map(move |(row, col, rows, cols)| (CellPos::new(row, col), Span::new(rows, cols)));
        proptest::collection::vec(item, 0..10).prop_map(move |placements| {
            let items = placements
                .into_iter()
                .enumerate()
                .map(|(i, (origin, span))| GridItem {
                    id: ItemId(i as u64 + 1),
                    page: 0,
                    surface: Surface::Grid,
                    origin,
                    span,
                    payload: ItemPayload::App {
                        bundle: format!("app.{i}"),
                    },
                })
                .collect();
            (dims, items)
        })
    })
}

proptest! {
    #[test]
    fn cell_at_point_stays_within_bounds(
        rows in 1u16..32,
        cols in 1u16..32,
        width in 50u32..4000,
        height in 50u32..4000,
        x in -5000i32..5000,
        y in -5000i32..5000,
    ) {
        let dims = GridDims::new(rows, cols).unwrap();
        let screen = ScreenSize::new(width, height).unwrap();
        let cell = geom::cell_at_point(x, y, dims, screen);
        prop_assert!(dims.contains(cell));
    }

    #[test]
    fn span_from_px_never_drops_below_one(
        rows in 1u16..32,
        cols in 1u16..32,
        width in 50u32..4000,
        height in 50u32..4000,
        w in 0u32..5000,
        h in 0u32..5000,
    ) {
        let dims = GridDims::new(rows, cols).unwrap();
        let screen = ScreenSize::new(width, height).unwrap();
        let span = geom::span_from_px(w, h, dims, screen);
        prop_assert!(span.rows() >= 1);
        prop_assert!(span.cols() >= 1);
    }

    #[test]
    fn found_region_is_free_and_in_bounds(
        (dims, items) in items_strategy(),
        span_rows in 1u16..=3,
        span_cols in 1u16..=3,
        start_row in 0i16..8,
        start_col in 0i16..8,
    ) {
        let mut occ = Occupancy::new(dims);
        for item in &items {
            occ.mark_rect(&item.cells());
        }
        let span = Span::new(span_rows, span_cols);
        if let Some(anchor) = find_region(&occ, span, CellPos::new(start_row, start_col)) {
            let rect = CellRect::new(anchor, span);
            prop_assert!(occ.is_free_rect(&rect));
        }
    }

    #[test]
    fn resolve_preserves_ids_and_spans((dims, items) in items_strategy()) {
        prop_assume!(!items.is_empty());
        let mover = items[0].clone();
        let res = resolve(&items, &mover, dims);

        let before: HashSet<ItemId> = items.iter().map(|i| i.id).collect();
        let after: HashSet<ItemId> = res.items.iter().map(|i| i.id).collect();
        prop_assert_eq!(before, after);
        for item in &items {
            let out = res.items.iter().find(|o| o.id == item.id).unwrap();
            prop_assert_eq!(out.span, item.span);
        }
        // The mover always keeps its requested position.
        let out = res.items.iter().find(|o| o.id == mover.id).unwrap();
        prop_assert_eq!(out.origin, mover.origin);
    }

    #[test]
    fn resolve_output_is_disjoint_unless_unplaced((dims, items) in items_strategy()) {
        prop_assume!(!items.is_empty());
        let mover = items[0].clone();
        let res = resolve(&items, &mover, dims);

        let key = mover.key();
        let unplaced: HashSet<ItemId> = res.unplaced.iter().copied().collect();
        let placed: Vec<&GridItem> = res
            .items
            .iter()
            .filter(|i| i.key() == key && !unplaced.contains(&i.id))
            .collect();
        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                prop_assert!(
                    !a.cells().intersects(&b.cells()),
                    "{} and {} overlap after resolution",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn resolve_is_deterministic((dims, items) in items_strategy()) {
        prop_assume!(!items.is_empty());
        let mover = items[0].clone();
        let first = resolve(&items, &mover, dims);
        let second = resolve(&items, &mover, dims);
        prop_assert_eq!(first, second);
    }
}
