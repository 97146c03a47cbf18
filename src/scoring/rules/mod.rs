mod match_play;
mod no_second_place;
mod redistribution;
mod stroke_play;

pub use match_play::MatchPlayRule;
pub use no_second_place::NoSecondPlaceRule;
pub use redistribution::RedistributionRule;
pub use stroke_play::StrokePlayRule;

use super::{HolePoints, TeamId};

/// Three or more teams sharing the lowest score void the hole.
const MAX_SHARED_FIRST_PLACE: usize = 2;

/// Awards first place for the podium-style modes: a sole winner takes 2 points,
/// a two-way tie takes 1 point each, a wider tie leaves the hole void.
fn award_first_place(groups: &[Vec<TeamId>], points: &mut HolePoints) {
    let Some(first) = groups.first() else {
        return;
    };

    match first.len() {
        1 => points.award(first[0], 2),
        n if n <= MAX_SHARED_FIRST_PLACE => {
            for team_id in first {
                points.award(*team_id, 1);
            }
        }
        _ => {}
    }
}
