#![cfg(test)]

use proptest::prelude::*;

use super::draft::TurnCursor;
use super::TeamId;

fn team_ids(count: usize) -> Vec<TeamId> {
    (0..count).map(|i| format!("team-{i:02}")).collect()
}

proptest! {
    #[test]
    fn cursor_visits_every_slot_exactly_once(
        teams in 1usize..8,
        rounds in 1u32..6,
        snake in any::<bool>(),
    ) {
        let order = team_ids(teams);
        let mut cursor = TurnCursor::new(order.clone(), rounds, snake);

        let mut picks = Vec::new();
        while let Some(team) = cursor.expected_team().cloned() {
            picks.push((cursor.round(), cursor.overall_pick(), team));
            cursor.advance();
        }

        // Exactly rounds x teams picks, numbered contiguously from 1.
        prop_assert_eq!(picks.len() as u32, rounds * teams as u32);
        for (i, (_, pick_no, _)) in picks.iter().enumerate() {
            prop_assert_eq!(*pick_no, i as u32 + 1);
        }

        // Every round is a permutation of the order: forward on odd rounds,
        // reversed on even rounds when snake is enabled.
        for round in 1..=rounds {
            let in_round: Vec<TeamId> = picks
                .iter()
                .filter(|(r, _, _)| *r == round)
                .map(|(_, _, t)| t.clone())
                .collect();
            let expected: Vec<TeamId> = if snake && round % 2 == 0 {
                order.iter().rev().cloned().collect()
            } else {
                order.clone()
            };
            prop_assert_eq!(in_round, expected);
        }

        prop_assert!(cursor.is_complete());
    }
}
