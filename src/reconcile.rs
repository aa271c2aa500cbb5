//! Best-effort reflow after placeholders change size.
//!
//! Placeholders holding exactly one report table are sized to it, then every gadget
//! container that sits below its gadget sibling is pushed down to clear it. Items that
//! cannot be measured or moved are skipped.

use std::collections::HashMap;

use crate::logging::{debug, obj, v_num, v_str, Domain};
use crate::page::HostPage;

pub const PLACEHOLDER_PAD: f64 = 10.0;
pub const CONTAINER_PAD: f64 = 35.0;
pub const GADGET_GAP: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflow {
    pub resized: usize,
    pub moved: usize,
}

pub fn reconcile(page: &mut dyn HostPage) -> Reflow {
    let mut out = Reflow::default();
    for p in page.placeholders() {
        let Some(height) = page.report_table_height(&p.id) else {
            continue;
        };
        let sized = page
            .set_placeholder_height(&p.id, height + PLACEHOLDER_PAD)
            .and_then(|_| page.set_placeholder_container_height(&p.id, height + CONTAINER_PAD));
        match sized {
            Ok(()) => out.resized += 1,
            Err(e) => debug(
                Domain::Layout,
                "resize_skipped",
                obj(&[("placeholder", v_str(&p.id)), ("msg", v_str(&e.to_string()))]),
            ),
        }
    }
    if out.resized == 0 {
        return out;
    }

    // "Below its sibling" is judged on the layout before this pass; the new top is
    // computed from the sibling's live box so moves cascade down a column.
    let containers = page.gadget_containers();
    let original_tops: HashMap<String, f64> = containers
        .iter()
        .filter_map(|id| page.container_box(id).map(|b| (id.clone(), b.top)))
        .collect();
    for id in &containers {
        let Some(prev) = page.previous_gadget_sibling(id) else {
            continue;
        };
        let (Some(&prev_top), Some(&cur_top)) = (original_tops.get(&prev), original_tops.get(id)) else {
            continue;
        };
        if prev_top >= cur_top {
            continue;
        }
        let Some(prev_box) = page.container_box(&prev) else {
            continue;
        };
        let top = prev_box.top + prev_box.height + GADGET_GAP;
        if page.set_container_top(id, top).is_ok() {
            out.moved += 1;
        }
    }
    debug(
        Domain::Layout,
        "reflow",
        obj(&[("resized", v_num(out.resized as f64)), ("moved", v_num(out.moved as f64))]),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    const TABLE: &str = "<table id=\"sprintOverview\"><tr></tr><tr></tr><tr></tr></table>";

    #[test]
    fn second_gadget_moves_below_taller_first() {
        let mut page = MemoryPage::dashboard();
        page.add_container("g1", true, 0.0, 50.0);
        page.add_container("g2", true, 60.0, 50.0);
        page.add_placeholder("p1", "g1", true, TABLE);

        let r = reconcile(&mut page);
        assert_eq!(r, Reflow { resized: 1, moved: 1 });
        // 3 rows * 24
        assert_eq!(page.placeholder("p1").unwrap().height, 72.0 + PLACEHOLDER_PAD);
        assert_eq!(page.container("g1").unwrap().height, 72.0 + CONTAINER_PAD);
        assert_eq!(page.container("g2").unwrap().top, 0.0 + 107.0 + GADGET_GAP);
    }

    #[test]
    fn position_is_independent_of_original_offset() {
        for original in [1.0, 60.0, 900.0] {
            let mut page = MemoryPage::dashboard();
            page.add_container("g1", true, 10.0, 50.0);
            page.add_container("g2", true, original + 10.0, 50.0);
            page.add_placeholder("p1", "g1", true, TABLE);
            reconcile(&mut page);
            assert_eq!(page.container("g2").unwrap().top, 10.0 + 107.0 + GADGET_GAP);
        }
    }

    #[test]
    fn moves_cascade_down_a_column() {
        let mut page = MemoryPage::dashboard();
        page.add_container("g1", true, 0.0, 50.0);
        page.add_container("g2", true, 60.0, 40.0);
        page.add_container("g3", true, 110.0, 40.0);
        page.add_placeholder("p1", "g1", true, TABLE);
        reconcile(&mut page);
        let g2 = page.container("g2").unwrap().top;
        assert_eq!(g2, 127.0);
        assert_eq!(page.container("g3").unwrap().top, g2 + 40.0 + GADGET_GAP);
    }

    #[test]
    fn pushed_container_does_not_land_on_the_next() {
        let mut page = MemoryPage::dashboard();
        page.add_container("g1", true, 0.0, 50.0);
        page.add_container("g2", true, 60.0, 40.0);
        page.add_container("g3", true, 110.0, 40.0);
        page.add_container("g4", true, 160.0, 40.0);
        page.add_placeholder("p1", "g1", true, TABLE);
        let r = reconcile(&mut page);
        assert_eq!(r.moved, 3);
        for pair in page.containers.windows(2) {
            assert!(
                pair[1].top >= pair[0].top + pair[0].height + GADGET_GAP,
                "{} overlaps {}",
                pair[1].id,
                pair[0].id
            );
        }
    }

    #[test]
    fn nothing_moves_without_a_resize() {
        let mut page = MemoryPage::dashboard();
        page.add_container("g1", true, 0.0, 500.0);
        page.add_container("g2", true, 60.0, 50.0);
        page.add_placeholder("p1", "g1", true, "##still waiting##");
        assert_eq!(reconcile(&mut page), Reflow::default());
        assert_eq!(page.container("g2").unwrap().top, 60.0);
    }

    #[test]
    fn skips_first_non_gadget_and_side_by_side() {
        let mut page = MemoryPage::dashboard();
        page.add_container("g1", true, 0.0, 50.0);
        page.add_container("g2", true, 0.0, 50.0); // same row, not below
        page.add_container("hdr", false, 0.0, 10.0);
        page.add_container("g3", true, 30.0, 50.0); // previous sibling is not a gadget
        page.add_placeholder("p1", "g1", true, TABLE);
        let r = reconcile(&mut page);
        assert_eq!(r.moved, 0);
        assert_eq!(page.container("g2").unwrap().top, 0.0);
        assert_eq!(page.container("g3").unwrap().top, 30.0);
    }

    #[test]
    fn missing_container_is_skipped() {
        let mut page = MemoryPage::dashboard();
        page.add_placeholder("p1", "ghost", true, TABLE);
        let r = reconcile(&mut page);
        assert_eq!(r, Reflow::default());
    }
}
