use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::catalog::builtin::builtin_catalog;

fn setup() -> (Catalog, SelectionState) {
    let catalog = builtin_catalog().unwrap();
    let state = SelectionState::initial(&catalog);
    (catalog, state)
}

#[test]
fn initial_state_is_total_and_visible() {
    let (catalog, state) = setup();
    state.validate(&catalog).unwrap();
    assert_eq!(state.selected("background").unwrap(), "bg_1");
    assert_eq!(state.selected("body").unwrap(), "body_1");
    assert_eq!(state.selected("costume").unwrap(), "costume_1");
}

#[test]
fn select_unknown_ids_fail() {
    let (catalog, state) = setup();
    assert!(select(&catalog, &state, "nope", "bg_1").is_err());
    assert!(select(&catalog, &state, "background", "nope").is_err());
}

#[test]
fn select_changes_one_category() {
    let (catalog, state) = setup();
    let (next, tx) = select(&catalog, &state, "hat", "hat_4").unwrap();
    assert_eq!(next.selected("hat").unwrap(), "hat_4");
    assert_eq!(tx.changed.len(), 1);
    assert!(tx.changed.contains("hat"));
    assert_eq!(tx.effect, TransitionEffect::None);
    next.validate(&catalog).unwrap();
}

#[test]
fn reselecting_accessory_toggles_to_none() {
    let (catalog, state) = setup();
    let (state, _) = select(&catalog, &state, "hat", "hat_4").unwrap();
    let (state, tx) = select(&catalog, &state, "hat", "hat_4").unwrap();
    assert_eq!(state.selected("hat").unwrap(), "hat_1");
    assert!(tx.changed.contains("hat"));
}

#[test]
fn reselecting_background_toggles_to_default() {
    let (catalog, state) = setup();
    let (state, _) = select(&catalog, &state, "background", "bg_5").unwrap();
    let (state, _) = select(&catalog, &state, "background", "bg_5").unwrap();
    assert_eq!(state.selected("background").unwrap(), "bg_1");
    // Toggling the default itself is a no-op.
    let (state, tx) = select(&catalog, &state, "background", "bg_1").unwrap();
    assert_eq!(state.selected("background").unwrap(), "bg_1");
    assert!(tx.changed.is_empty());
}

#[test]
fn reselecting_border_style_is_a_noop_without_none() {
    let (catalog, state) = setup();
    let (state, tx) = select(&catalog, &state, "border_style", "border_s_solid").unwrap();
    assert_eq!(state.selected("border_style").unwrap(), "border_s_solid");
    assert!(tx.changed.is_empty());
}

#[test]
fn costume_selection_explodes_the_accessory_group() {
    let (catalog, state) = setup();
    let (state, _) = select(&catalog, &state, "hat", "hat_4").unwrap();
    let (state, tx) = select(&catalog, &state, "costume", "costume_2").unwrap();

    assert_eq!(tx.effect, TransitionEffect::Explode);
    assert_eq!(state.selected("costume").unwrap(), "costume_2");
    assert_eq!(state.selected("body").unwrap(), "body_none");
    for cat_id in ["eyes", "shirt", "chain", "glasses", "hat", "mouth"] {
        let item = state.selected_item(&catalog, cat_id).unwrap();
        assert!(item.kind.is_none(), "{cat_id} not cleared");
    }
    state.validate(&catalog).unwrap();
}

#[test]
fn accessory_selection_removes_costume_and_restores_body() {
    let (catalog, state) = setup();
    let (state, _) = select(&catalog, &state, "costume", "costume_2").unwrap();
    let (state, tx) = select(&catalog, &state, "hat", "hat_4").unwrap();

    assert_eq!(state.selected("costume").unwrap(), "costume_1");
    assert_eq!(state.selected("body").unwrap(), "body_1");
    assert_eq!(state.selected("hat").unwrap(), "hat_4");
    assert!(tx.changed.contains("costume"));
    assert!(tx.changed.contains("body"));
}

#[test]
fn body_selection_removes_costume_without_body_restore() {
    let (catalog, state) = setup();
    let (state, _) = select(&catalog, &state, "costume", "costume_2").unwrap();
    let (state, _) = select(&catalog, &state, "body", "body_6").unwrap();
    assert_eq!(state.selected("costume").unwrap(), "costume_1");
    assert_eq!(state.selected("body").unwrap(), "body_6");
}

#[test]
fn randomize_never_picks_costume_or_hidden_body() {
    let (catalog, state) = setup();
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = state;
    for _ in 0..100 {
        let (next, _) = randomize(&catalog, &state, &mut rng);
        assert_eq!(next.selected("costume").unwrap(), "costume_1");
        assert_ne!(next.selected("body").unwrap(), "body_none");
        next.validate(&catalog).unwrap();
        state = next;
    }
}

#[test]
fn randomize_is_deterministic_per_seed() {
    let (catalog, state) = setup();
    let mut a = StdRng::seed_from_u64(42);
    let mut b = StdRng::seed_from_u64(42);
    let (sa, _) = randomize(&catalog, &state, &mut a);
    let (sb, _) = randomize(&catalog, &state, &mut b);
    assert_eq!(sa, sb);
}

#[test]
fn themed_shuffle_respects_allow_lists() {
    let (catalog, state) = setup();
    let theme = crate::state::theme::builtin_themes()
        .into_iter()
        .find(|t| t.id == "tough")
        .unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let (next, tx) = shuffle_themed(&catalog, &state, &theme, &mut rng);
        assert_eq!(tx.effect, TransitionEffect::Explode);
        let body = next.selected_item(&catalog, "body").unwrap();
        assert!(["Black", "Tiger", "Camo", "Zombie"].contains(&body.label.as_str()));
        let hat = next.selected_item(&catalog, "hat").unwrap();
        assert!(["Army", "Police", "Viking"].contains(&hat.label.as_str()));
        next.validate(&catalog).unwrap();
    }
}

#[test]
fn themed_shuffle_with_empty_pool_leaves_category_unchanged() {
    let (catalog, state) = setup();
    let theme = Theme::new("ghost-town", "Ghost Town", &[("hat", &[][..])]);
    let (state, _) = select(&catalog, &state, "hat", "hat_4").unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let (next, _) = shuffle_themed(&catalog, &state, &theme, &mut rng);
    assert_eq!(next.selected("hat").unwrap(), "hat_4");
}

#[test]
fn clear_resets_to_baseline() {
    let (catalog, state) = setup();
    let mut rng = StdRng::seed_from_u64(99);
    let (state, _) = randomize(&catalog, &state, &mut rng);
    let (state, _) = clear(&catalog, &state);

    assert_eq!(state.selected("background").unwrap(), "bg_1");
    assert_eq!(state.selected("body").unwrap(), "body_1");
    assert_eq!(state.selected("costume").unwrap(), "costume_1");
    for cat_id in ["eyes", "shirt", "chain", "glasses", "hat", "mouth", "speech", "vibe"] {
        let item = state.selected_item(&catalog, cat_id).unwrap();
        assert!(item.kind.is_none(), "{cat_id} not reset to none");
    }
    // Modifier categories have no none item and fall back to their first entry.
    assert_eq!(state.selected("border_style").unwrap(), "border_s_solid");
    assert_eq!(state.selected("border_width").unwrap(), "border_w_sm");
}

#[test]
fn exclusivity_invariants_hold_under_mixed_transitions() {
    let (catalog, state) = setup();
    let mut rng = StdRng::seed_from_u64(1234);
    let mut state = state;
    let moves = [
        ("costume", "costume_5"),
        ("eyes", "eyes_3"),
        ("costume", "costume_9"),
        ("body", "body_2"),
        ("costume", "costume_9"),
    ];
    for (cat_id, item_id) in moves {
        let (next, _) = select(&catalog, &state, cat_id, item_id).unwrap();
        state = next;

        let costume = state.selected_item(&catalog, "costume").unwrap();
        let group_none = ["body", "eyes", "shirt", "chain", "glasses", "hat", "mouth"]
            .iter()
            .all(|id| state.selected_item(&catalog, id).unwrap().kind.is_none());
        if !costume.kind.is_none() {
            assert!(group_none, "costume active but accessory group not cleared");
        }
    }
    let (next, _) = randomize(&catalog, &state, &mut rng);
    next.validate(&catalog).unwrap();
}
