//! Property tests for the retention bound and window coverage guarantees.

use eim_logview::{LogStore, VirtualWindow, MAX_ENTRIES};
use eim_types::LogLevel;
use proptest::prelude::*;

proptest! {
    /// After any sequence of appends the store holds at most `MAX_ENTRIES`
    /// entries, and they are exactly the most recent ones.
    #[test]
    fn log_bound_holds_for_any_append_count(count in 0usize..2500) {
        let mut store = LogStore::new();
        for i in 0..count {
            store.append_at(LogLevel::Info, format!("{i}"), 0);
            prop_assert!(store.len() <= MAX_ENTRIES);
        }
        prop_assert_eq!(store.len(), count.min(MAX_ENTRIES));
        if count > 0 {
            let newest = format!("{}", count - 1);
            prop_assert_eq!(store.get(0).unwrap().text.as_str(), newest.as_str());
            let oldest_kept = count.saturating_sub(MAX_ENTRIES);
            let last = store.get(store.len() - 1).unwrap();
            let oldest = format!("{oldest_kept}");
            prop_assert_eq!(last.text.as_str(), oldest.as_str());
        }
    }

    /// For any scroll offset, viewport, and list length the computed window
    /// stays in bounds and never renders more than viewport + buffers.
    #[test]
    fn window_coverage_is_bounded(
        offset in 0f64..1_000_000.0,
        viewport in 0f64..4096.0,
        total in 0usize..100_000,
    ) {
        let mut window = VirtualWindow::with_viewport(viewport);
        // Force past hysteresis by seeding from zero then jumping.
        let slice = window.on_resize(viewport, total);
        prop_assert!(slice.start <= slice.end);
        let slice = window.on_scroll(offset, total);
        prop_assert!(slice.start <= slice.end);
        prop_assert!(slice.end <= total);
        prop_assert!(slice.rendered_count() <= window.max_rendered());
    }

    /// Slicing the store with arbitrary bounds never panics and never
    /// returns entries outside the store.
    #[test]
    fn slice_is_total(count in 0usize..50, start in 0usize..100, end in 0usize..100) {
        let mut store = LogStore::new();
        for i in 0..count {
            store.append_at(LogLevel::Info, format!("{i}"), 0);
        }
        let slice = store.slice(start, end);
        prop_assert!(slice.len() <= count);
    }
}
