//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::event::{normalize_choice, ClosureReason};
use super::menu::{MAIN_MENU, PARTING_MENU};
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ChatContext {
    ChatContext::new("/tmp/files")
}

fn is_recognized(menu: Menu, choice: &str) -> bool {
    menu.find(choice).is_some()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = ChatState> {
    prop_oneof![
        Just(ChatState::Dummy),
        Just(ChatState::Greetings),
        Just(ChatState::MainMenu),
        Just(ChatState::Parting),
    ]
}

fn arb_closure_reason() -> impl Strategy<Value = ClosureReason> {
    prop_oneof![
        Just(ClosureReason::Closed),
        Just(ClosureReason::ClosedActive),
        Just(ClosureReason::LineDeleted),
        Just(ClosureReason::SubscriptionDeleted),
        Just(ClosureReason::UserDeleted),
    ]
}

/// Menu keys and labels mixed with noise, so both branches get exercised
fn arb_text() -> impl Strategy<Value = String> {
    let known: Vec<&'static str> = MAIN_MENU
        .options()
        .chain(PARTING_MENU.options())
        .flat_map(|o| [o.key, o.label])
        .collect();
    prop_oneof![
        proptest::sample::select(known).prop_map(str::to_string),
        "[a-zA-Zа-яА-Я0-9 ]{0,20}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_text().prop_map(|t| Event::text(&t)),
        1 => arb_closure_reason().prop_map(|reason| Event::Closure { reason }),
        1 => "[a-z_]{1,12}".prop_map(|message_type| Event::Unsupported { message_type }),
    ]
}

/// Randomly flip the case of each character
fn arb_case_variant(text: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), text.chars().count()).prop_map(move |flags| {
        text.chars()
            .zip(flags)
            .map(|(c, upper)| {
                if upper {
                    c.to_uppercase().collect::<String>()
                } else {
                    c.to_lowercase().collect::<String>()
                }
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Closure from any state always hides the keyboard and resets
    #[test]
    fn prop_closure_resets_from_any_state(state in arb_state(), reason in arb_closure_reason()) {
        let result = transition(state, &test_context(), &Event::Closure { reason }).unwrap();
        prop_assert_eq!(result.new_state, ChatState::Greetings);
        prop_assert_eq!(result.effect, Effect::HideInputControls);
    }

    // Bad input in the main menu never advances the conversation
    #[test]
    fn prop_unrecognized_text_stays_in_main_menu(text in "[a-zA-Zа-яА-Я ]{0,30}") {
        let event = Event::text(&text);
        let Event::Text { choice } = &event else { unreachable!() };
        prop_assume!(!is_recognized(MAIN_MENU, choice));

        let result = transition(ChatState::MainMenu, &test_context(), &event).unwrap();
        prop_assert_eq!(result.new_state, ChatState::MainMenu);
        prop_assert_eq!(result.effect, Effect::apology(MAIN_MENU));
    }

    // Same for the parting prompt
    #[test]
    fn prop_unrecognized_text_stays_in_parting(text in "[a-zA-Zа-яА-Я ]{0,30}") {
        let event = Event::text(&text);
        let Event::Text { choice } = &event else { unreachable!() };
        prop_assume!(!is_recognized(PARTING_MENU, choice));

        let result = transition(ChatState::Parting, &test_context(), &event).unwrap();
        prop_assert_eq!(result.new_state, ChatState::Parting);
    }

    // Label matching is invariant under case changes
    #[test]
    fn prop_label_matching_ignores_case(
        state in prop_oneof![Just(ChatState::MainMenu), Just(ChatState::Parting)],
        index in 0usize..5,
        flips in proptest::collection::vec(any::<bool>(), 64),
    ) {
        let menu = if state == ChatState::MainMenu { MAIN_MENU } else { PARTING_MENU };
        let options: Vec<_> = menu.options().collect();
        let option = options[index % options.len()];
        let variant: String = option
            .label
            .chars()
            .zip(flips.into_iter().cycle())
            .map(|(c, upper)| {
                if upper {
                    c.to_uppercase().collect::<String>()
                } else {
                    c.to_lowercase().collect::<String>()
                }
            })
            .collect();

        let by_label = transition(state, &test_context(), &Event::text(&variant)).unwrap();
        let by_key = transition(state, &test_context(), &Event::text(option.key)).unwrap();
        prop_assert_eq!(by_label, by_key);
    }

    // Normalization is idempotent
    #[test]
    fn prop_normalization_idempotent(variant in arb_case_variant("Положение о персонале")) {
        let once = normalize_choice(&variant);
        prop_assert_eq!(normalize_choice(&once), once.clone());
        prop_assert_eq!(once, normalize_choice("ПОЛОЖЕНИЕ О ПЕРСОНАЛЕ"));
    }

    // Transitions never land in the sentinel state, and only unsupported
    // message types are rejected
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..30)) {
        let ctx = test_context();
        let mut session = Session::default();

        for event in events {
            match transition(session.current_state, &ctx, &event) {
                Ok(result) => {
                    prop_assert_ne!(result.new_state, ChatState::Dummy);
                    session = session.advance(result.new_state);
                }
                Err(TransitionError::UnhandledInput { .. }) => {
                    prop_assert!(
                        matches!(event, Event::Unsupported { .. }),
                        "Rejected supported event {:?}",
                        event
                    );
                    session = session.advance(ChatState::Greetings);
                }
            }
        }
    }

    // Documents are only delivered from the main menu, and always lead to parting
    #[test]
    fn prop_documents_lead_to_parting(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(state, &test_context(), &event) {
            if matches!(result.effect, Effect::DeliverDocument { .. }) {
                prop_assert_eq!(state, ChatState::MainMenu);
                prop_assert_eq!(result.new_state, ChatState::Parting);
            }
        }
    }
}
