//! Headless walkthrough of the widget lifecycle.
//!
//! Drives a `GridListView` through collection changes, selection, scrolling,
//! and an edit, printing the observable state after each step. Run with
//! `RUST_LOG=flowgrid=trace` to watch the engine's internals.

use std::time::Duration;

use flowgrid::core::Size;
use flowgrid::{GridListView, ItemList, SelectionMode};

fn print_state(view: &GridListView<String>, label: &str) {
    let (first, last) = view.flow().visible_range();
    println!(
        "[{label}] items={} columns={} rows {first}..{last} visible={} selected={:?} face={:?}",
        view.count(),
        view.flow().columns(),
        view.visible_cells().len(),
        view.selected_items(),
        view.current_face(),
    );
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let view = GridListView::<String>::new();
    view.resize(Size::new(640.0, 300.0));
    print_state(&view, "empty");

    view.items()
        .set_items((0..200).map(|i| format!("item-{i}")).collect());
    print_state(&view, "populated");

    view.set_selection_mode(SelectionMode::Multiple);
    view.select("item-3".to_string());
    view.select("item-7".to_string());
    print_state(&view, "selected");

    // Subscribe to commit events before editing.
    view.edit_commit().connect(|event| {
        println!(
            "  commit at index {}: {:?}",
            event.index,
            event.value.as_deref()
        );
    });

    view.set_editable(true);
    if let Some(cell) = view.flow().cell_for_item(&"item-3".to_string()) {
        cell.start_edit();
        cell.commit_edit("item-3-renamed".to_string());
    }
    print_state(&view, "edited");

    // Animated scroll: tick until the animation settles, like a frame loop.
    view.scroll_to_item(&"item-150".to_string());
    while view.flow().is_scrolling() {
        view.tick();
        std::thread::sleep(Duration::from_millis(16));
    }
    print_state(&view, "scrolled");

    // Swap in a fresh collection instance.
    view.set_item_list(ItemList::from_items(vec![
        "alpha".to_string(),
        "beta".to_string(),
    ]));
    print_state(&view, "swapped");

    view.items().clear();
    while view.skin().is_fading() {
        view.tick();
        std::thread::sleep(Duration::from_millis(16));
    }
    print_state(&view, "cleared");
}
