use super::*;
use pretty_assertions::assert_eq;

#[test]
fn deleted_selection_yields_removed_state() {
    let store = store_with_ids("coffee");
    select(&store, "42", "deleted_id");

    let resolution = run(&store, SelectionRequest::Selected("42".to_string()));

    assert_eq!(
        resolution.entries,
        vec![SlotView::Removed(RemovedView {
            slot: "42".to_string(),
            id: "deleted_id".to_string(),
            message: "Removed".to_string(),
            color: "#FF444444".to_string(),
        })]
    );
    assert!(!resolution.entries[0].tappable());
    assert!(resolution.placeholder().is_none());
}

#[test]
fn removed_slot_keeps_its_position_in_multi_slot() {
    let store = store_with_ids("coffee,water");
    select(&store, "8", "water");
    select(&store, "8_2", "gone");
    select(&store, "8_3", "coffee");

    let resolution = run(&store, SelectionRequest::MultiSlot(instance_slots("8", 4)));

    assert_eq!(action_ids(&resolution), vec!["water", "gone", "coffee"]);
    assert!(matches!(resolution.entries[1], SlotView::Removed(_)));
}

#[test]
fn selection_surviving_registry_change_resolves_normally() {
    let store = store_with_ids("coffee,water");
    select(&store, "3", "water");
    store
        .set_string(keys::ACTIONS_JSON, r#"[{"id":"water","title":"H2O"}]"#)
        .expect("set");

    let resolution = run(&store, SelectionRequest::Selected("3".to_string()));

    assert_single_action(&resolution, "water");
    assert_eq!(resolution.actions().next().map(|view| view.title.as_str()), Some("H2O"));
}
