use rstest::rstest;

mod utils;

use utils::*;

/// Two holes, three solo players; expected order and (points, strokes) per team
#[rstest]
#[case::stroke_play(1, [[4, 5, 6], [5, 5, 4]], [0, 1, 2], [(9, 9), (10, 10), (10, 10)])]
#[case::match_play(2, [[4, 5, 6], [5, 5, 4]], [0, 2, 1], [(1, 9), (0, 10), (1, 10)])]
#[case::no_second_place(3, [[4, 4, 6], [3, 4, 5]], [0, 1, 2], [(3, 7), (1, 8), (0, 11)])]
#[case::redistribution(4, [[3, 4, 5], [4, 4, 4]], [0, 1, 2], [(2, 7), (1, 8), (0, 9)])]
#[tokio::test]
async fn test_standings_per_mode(
    #[case] scoring_mode_id: i32,
    #[case] holes: [[u32; 3]; 2],
    #[case] order: [usize; 3],
    #[case] totals: [(u64, u64); 3],
) {
    let setup = TestSetupBuilder::new()
        .with_mode(scoring_mode_id)
        .with_three_players()
        .build()
        .await;
    for (index, strokes) in holes.iter().enumerate() {
        setup.play_hole(index as i64 + 1, strokes).await;
    }

    let assertion = StandingsAssertion::for_session(&setup)
        .await
        .complete()
        .ranked(&order);
    totals
        .into_iter()
        .enumerate()
        .fold(assertion, |assertion, (team_index, (points, strokes))| {
            assertion.team_totals(team_index, points, strokes)
        });
}

#[tokio::test]
async fn test_tied_teams_keep_team_id_order() {
    let setup = TestSetupBuilder::new()
        .with_mode(2)
        .with_three_players()
        .build()
        .await;
    setup.play_hole(1, &[4, 4, 4]).await;

    StandingsAssertion::for_session(&setup)
        .await
        .ranked(&[0, 1, 2])
        .team_totals(2, 0, 4);
}

#[tokio::test]
async fn test_missing_score_makes_standings_provisional() {
    let setup = TestSetupBuilder::new()
        .with_mode(4)
        .with_three_players()
        .build()
        .await;
    setup.play_hole(1, &[4, 5, 6]).await;
    let second = setup.play_hole(2, &[4, 5]).await;

    StandingsAssertion::for_session(&setup).await.provisional();

    setup.submit(second.id, 2, 7).await.unwrap();

    StandingsAssertion::for_session(&setup)
        .await
        .complete()
        .team_totals(0, 4, 8)
        .team_totals(1, 2, 10)
        .team_totals(2, 0, 13);
}

#[tokio::test]
async fn test_deleted_hole_drops_out_of_standings() {
    let setup = TestSetupBuilder::new()
        .with_mode(1)
        .with_solo_players(2)
        .build()
        .await;
    setup.play_hole(1, &[3, 6]).await;
    let second = setup.play_hole(2, &[8, 2]).await;

    StandingsAssertion::for_session(&setup)
        .await
        .ranked(&[1, 0])
        .team_totals(0, 11, 11);

    setup
        .state
        .hole_service
        .delete_played_hole(second.id)
        .await
        .unwrap();

    StandingsAssertion::for_session(&setup)
        .await
        .ranked(&[0, 1])
        .team_totals(0, 3, 3)
        .team_totals(1, 6, 6);

    let third = setup.add_hole(3).await;
    assert_eq!(third.position, 3);
}

#[tokio::test]
async fn test_pairs_score_as_one_team() {
    let setup = TestSetupBuilder::new()
        .with_mode(3)
        .with_pairs(2)
        .build()
        .await;
    setup.play_hole(1, &[4, 5]).await;

    StandingsAssertion::for_session(&setup)
        .await
        .complete()
        .ranked(&[0, 1])
        .team_totals(0, 2, 4)
        .team_totals(1, 0, 5);
}

#[tokio::test]
async fn test_large_stroke_counts_total_exactly() {
    let setup = TestSetupBuilder::new()
        .with_mode(1)
        .with_solo_players(2)
        .build()
        .await;
    setup.play_hole(1, &[3_000_000_000, 4]).await;
    setup.play_hole(2, &[3_000_000_000, 5]).await;

    StandingsAssertion::for_session(&setup)
        .await
        .complete()
        .ranked(&[1, 0])
        .team_totals(0, 6_000_000_000, 6_000_000_000)
        .team_totals(1, 9, 9);
}
