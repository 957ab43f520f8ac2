//! Intervention triggers exercised through real play sequences.

use realpolitik::{
    controller, scoring, ContentSet, MatchState, Seat, SeatMap, ZoneAddress, ZoneKind,
};

fn uniform_deck(id: &'static str) -> Vec<&'static str> {
    vec![id; 20]
}

fn start(deck_one: &[&str], deck_two: &[&str]) -> MatchState {
    controller::start_match(
        ContentSet::standard(),
        42,
        deck_one,
        deck_two,
        SeatMap::with_value(false),
    )
    .unwrap()
}

/// Slip an extra card into a seat's hand, returning its hand index.
fn give(state: &mut MatchState, seat: Seat, id: &str) -> usize {
    let uid = state.arena.alloc_uid();
    let card = state.content.instantiate(id, uid).unwrap();
    state.arena.insert(card);
    state.zones.add(uid, ZoneAddress::new(seat, ZoneKind::Hand));
    state.hand(seat).len() - 1
}

#[test]
fn trap_deactivates_strong_government_card() {
    let mut state = start(&uniform_deck("leak-scandal"), &uniform_deck("chancellor"));

    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    assert_eq!(state.traps(Seat::One).len(), 1);
    controller::next_turn(&mut state);

    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();

    let chancellor = state.government(Seat::Two)[0];
    assert!(state.arena.politician(chancellor).unwrap().deactivated);
    assert!(state.traps(Seat::One).is_empty());
    assert_eq!(scoring::score(&state, Seat::Two), 0);
}

#[test]
fn weak_play_leaves_trap_armed_for_later() {
    let mut state = start(&uniform_deck("leak-scandal"), &uniform_deck("mayor"));

    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    controller::next_turn(&mut state);

    // Mayor at 2 influence does not reach the 5-influence trigger.
    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();
    assert_eq!(state.traps(Seat::One).len(), 1);

    // A chancellor later the same round still springs it.
    let index = give(&mut state, Seat::Two, "chancellor");
    controller::play_card(&mut state, Seat::Two, index, None).unwrap();
    assert!(state.traps(Seat::One).is_empty());
}

#[test]
fn budget_freeze_destroys_initiative_before_it_fires() {
    let mut state = start(&uniform_deck("budget-freeze"), &uniform_deck("emergency-session"));

    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    controller::next_turn(&mut state);

    let ap_before = state.action_points[Seat::Two];
    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();

    // Paid 1 AP, got nothing back: the session never resolved.
    assert_eq!(state.action_points[Seat::Two], ap_before - 1);
    assert_eq!(state.discard(Seat::Two).len(), 1);
    assert!(state.traps(Seat::One).is_empty());
}

#[test]
fn counter_campaign_stops_ngo_discount() {
    let mut state = start(&uniform_deck("counter-campaign"), &uniform_deck("relief-network"));

    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    controller::next_turn(&mut state);

    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();

    // The NGO card was destroyed on arrival; no discount was granted.
    assert!(state.public_lane(Seat::Two).is_empty());
    assert!(!state.flags[Seat::Two].ngo_initiative_discount);
}

#[test]
fn first_matching_trap_consumes_the_subject() {
    let mut state = start(&uniform_deck("subpoena"), &uniform_deck("chancellor"));
    let leak = give(&mut state, Seat::One, "leak-scandal");

    // Subpoena armed first, leak scandal second.
    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    controller::play_card(&mut state, Seat::One, leak - 1, None).unwrap();
    assert_eq!(state.traps(Seat::One).len(), 2);
    controller::next_turn(&mut state);

    let hand_before = state.hand(Seat::Two).len();
    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();

    // Subpoena bounced the chancellor back to hand, so the leak scandal
    // found nothing; exactly one trap was spent.
    assert_eq!(state.hand(Seat::Two).len(), hand_before);
    assert!(state.government(Seat::Two).is_empty());
    assert_eq!(state.traps(Seat::One).len(), 1);
}

#[test]
fn gag_order_blocks_transfers_for_the_actor() {
    let mut state = start(&uniform_deck("gag-order"), &uniform_deck("protest-wave"));

    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    controller::next_turn(&mut state);

    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();

    // Seat-targeted: the protest wave stays, but transfers are blocked.
    assert_eq!(state.public_lane(Seat::Two).len(), 1);
    assert!(state.flags[Seat::Two].influence_transfer_blocked);
}

#[test]
fn majority_trap_springs_once_board_is_wide() {
    let mut state = start(&uniform_deck("public-backlash"), &uniform_deck("mayor"));

    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    controller::next_turn(&mut state);

    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();
    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();
    assert_eq!(state.traps(Seat::One).len(), 1);
    controller::next_turn(&mut state);
    controller::next_turn(&mut state);

    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();
    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();

    // Fourth government card crossed the majority threshold.
    assert!(state.traps(Seat::One).is_empty());
    assert_eq!(state.government(Seat::Two).len(), 4);
    assert!(state.log.iter().any(|l| l.contains("discards")));
}

#[test]
fn traps_are_cleared_between_rounds() {
    let mut state = start(&uniform_deck("leak-scandal"), &uniform_deck("mayor"));

    controller::play_card(&mut state, Seat::One, 0, None).unwrap();
    controller::pass_turn(&mut state, Seat::One).unwrap();
    controller::play_card(&mut state, Seat::Two, 0, None).unwrap();
    controller::pass_turn(&mut state, Seat::Two).unwrap();

    assert_eq!(state.round, 2);
    assert!(state.traps(Seat::One).is_empty());
}
