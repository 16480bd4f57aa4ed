//! Combat rating by kill count

use serde::Serialize;

/// One rung of the combat rating ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatRating {
    /// Kills needed to reach this rating
    pub kills: u32,
    pub name: &'static str,
    /// HUD color as `#rrggbb`
    pub color: &'static str,
}

const fn rating(kills: u32, name: &'static str, color: &'static str) -> CombatRating {
    CombatRating { kills, name, color }
}

/// Ratings in ascending kill order
pub const COMBAT_RATINGS: [CombatRating; 11] = [
    rating(0, "Harmless", "#666666"),
    rating(1, "Mostly Harmless", "#888888"),
    rating(10, "Poor", "#aaaaaa"),
    rating(25, "Average", "#cccccc"),
    rating(50, "Above Average", "#00aa00"),
    rating(100, "Competent", "#00cc00"),
    rating(200, "Dangerous", "#ffaa00"),
    rating(400, "Deadly", "#ff6600"),
    rating(800, "Elite", "#ff0000"),
    rating(1600, "Elite II", "#ff00ff"),
    rating(3200, "Elite III", "#00ffff"),
];

/// Highest rating whose threshold is at most `kills`
pub fn combat_rating(kills: u32) -> &'static CombatRating {
    let index = COMBAT_RATINGS.partition_point(|rating| rating.kills <= kills);
    &COMBAT_RATINGS[index.saturating_sub(1)]
}

/// The next rating up and the kills still needed, or `None` at the top
pub fn next_rating(kills: u32) -> Option<(&'static CombatRating, u32)> {
    COMBAT_RATINGS
        .iter()
        .find(|rating| rating.kills > kills)
        .map(|rating| (rating, rating.kills - kills))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(combat_rating(0).name, "Harmless");
        assert_eq!(combat_rating(1).name, "Mostly Harmless");
        assert_eq!(combat_rating(9).name, "Mostly Harmless");
        assert_eq!(combat_rating(10).name, "Poor");
        assert_eq!(combat_rating(100).name, "Competent");
        assert_eq!(combat_rating(3200).name, "Elite III");
        assert_eq!(combat_rating(u32::MAX).name, "Elite III");
    }

    #[test]
    fn test_rating_is_monotone() {
        let mut previous = 0;
        for kills in 0..4000 {
            let threshold = combat_rating(kills).kills;
            assert!(threshold >= previous);
            assert!(threshold <= kills);
            previous = threshold;
        }
    }

    #[test]
    fn test_next_rating() {
        let (next, needed) = next_rating(20).unwrap();
        assert_eq!(next.name, "Average");
        assert_eq!(needed, 5);
        assert!(next_rating(3200).is_none());
    }
}
