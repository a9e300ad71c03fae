//! Judging workflow state: assignments, score sheets, leaderboard rows

use serde::{Deserialize, Serialize};

/// A team assigned to the current judge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub team_id: String,
    pub team_name: String,
    pub project_title: String,
    pub scored: bool,
}

/// A scoring criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub label: String,
    pub max_score: u32,
    pub weight: u32,
}

/// One row of the backend-computed leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub team_name: String,
    pub weighted_score: f64,
    pub judge_count: u32,
}

/// Draft scores for one team, entered criterion by criterion
#[derive(Debug, Clone)]
pub struct ScoreSheet {
    pub team_id: String,
    /// One slot per criterion, in criteria order
    scores: Vec<Option<u32>>,
    pub active: usize,
}

impl ScoreSheet {
    pub fn new(team_id: impl Into<String>, criteria_count: usize) -> Self {
        Self {
            team_id: team_id.into(),
            scores: vec![None; criteria_count],
            active: 0,
        }
    }

    pub fn score(&self, index: usize) -> Option<u32> {
        self.scores.get(index).copied().flatten()
    }

    /// Set the active criterion's score, clamped to the criterion maximum
    pub fn set_score(&mut self, criterion: &Criterion, value: u32) {
        if let Some(slot) = self.scores.get_mut(self.active) {
            *slot = Some(value.min(criterion.max_score));
        }
    }

    /// Nudge the active criterion's score up or down
    pub fn bump_score(&mut self, criterion: &Criterion, up: bool) {
        let current = self.score(self.active).unwrap_or(0);
        let next = if up {
            (current + 1).min(criterion.max_score)
        } else {
            current.saturating_sub(1)
        };
        if let Some(slot) = self.scores.get_mut(self.active) {
            *slot = Some(next);
        }
    }

    pub fn clear_active(&mut self) {
        if let Some(slot) = self.scores.get_mut(self.active) {
            *slot = None;
        }
    }

    pub fn next_criterion(&mut self) {
        if self.scores.is_empty() {
            return;
        }
        self.active = (self.active + 1) % self.scores.len();
    }

    pub fn prev_criterion(&mut self) {
        if self.scores.is_empty() {
            return;
        }
        let len = self.scores.len();
        self.active = (self.active + len - 1) % len;
    }

    /// Every criterion has a score
    pub fn is_complete(&self) -> bool {
        !self.scores.is_empty() && self.scores.iter().all(Option::is_some)
    }

    /// Weight-averaged total in 0..=100, treating blanks as zero
    pub fn weighted_total(&self, criteria: &[Criterion]) -> f64 {
        let total_weight: u32 = criteria.iter().map(|c| c.weight).sum();
        if total_weight == 0 {
            return 0.0;
        }
        let sum: f64 = criteria
            .iter()
            .zip(&self.scores)
            .map(|(criterion, score)| {
                let score = score.unwrap_or(0);
                if criterion.max_score == 0 {
                    0.0
                } else {
                    f64::from(score) / f64::from(criterion.max_score)
                        * f64::from(criterion.weight)
                }
            })
            .sum();
        sum / f64::from(total_weight) * 100.0
    }

    /// (criterion id, score) pairs for submission; blanks become zero
    pub fn entries(&self, criteria: &[Criterion]) -> Vec<(String, u32)> {
        criteria
            .iter()
            .zip(&self.scores)
            .map(|(criterion, score)| (criterion.id.clone(), score.unwrap_or(0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> Vec<Criterion> {
        vec![
            Criterion {
                id: "c1".into(),
                label: "Technical merit".into(),
                max_score: 10,
                weight: 3,
            },
            Criterion {
                id: "c2".into(),
                label: "Presentation".into(),
                max_score: 5,
                weight: 1,
            },
        ]
    }

    #[test]
    fn test_new_sheet_is_blank() {
        let sheet = ScoreSheet::new("team-1", 2);
        assert!(!sheet.is_complete());
        assert_eq!(sheet.score(0), None);
        assert_eq!(sheet.score(1), None);
    }

    #[test]
    fn test_set_score_clamps_to_max() {
        let criteria = criteria();
        let mut sheet = ScoreSheet::new("team-1", 2);
        sheet.set_score(&criteria[0], 99);
        assert_eq!(sheet.score(0), Some(10));
    }

    #[test]
    fn test_bump_score_up_and_down() {
        let criteria = criteria();
        let mut sheet = ScoreSheet::new("team-1", 2);
        sheet.bump_score(&criteria[0], true);
        sheet.bump_score(&criteria[0], true);
        assert_eq!(sheet.score(0), Some(2));
        sheet.bump_score(&criteria[0], false);
        assert_eq!(sheet.score(0), Some(1));
    }

    #[test]
    fn test_bump_stops_at_bounds() {
        let criteria = criteria();
        let mut sheet = ScoreSheet::new("team-1", 2);
        sheet.active = 1;
        for _ in 0..10 {
            sheet.bump_score(&criteria[1], true);
        }
        assert_eq!(sheet.score(1), Some(5));
        for _ in 0..10 {
            sheet.bump_score(&criteria[1], false);
        }
        assert_eq!(sheet.score(1), Some(0));
    }

    #[test]
    fn test_criterion_navigation_wraps() {
        let mut sheet = ScoreSheet::new("team-1", 2);
        sheet.next_criterion();
        assert_eq!(sheet.active, 1);
        sheet.next_criterion();
        assert_eq!(sheet.active, 0);
        sheet.prev_criterion();
        assert_eq!(sheet.active, 1);
    }

    #[test]
    fn test_complete_when_all_scored() {
        let criteria = criteria();
        let mut sheet = ScoreSheet::new("team-1", 2);
        sheet.set_score(&criteria[0], 8);
        assert!(!sheet.is_complete());
        sheet.next_criterion();
        sheet.set_score(&criteria[1], 4);
        assert!(sheet.is_complete());
    }

    #[test]
    fn test_clear_active_reopens_sheet() {
        let criteria = criteria();
        let mut sheet = ScoreSheet::new("team-1", 2);
        sheet.set_score(&criteria[0], 8);
        sheet.next_criterion();
        sheet.set_score(&criteria[1], 4);
        sheet.clear_active();
        assert!(!sheet.is_complete());
    }

    #[test]
    fn test_weighted_total() {
        let criteria = criteria();
        let mut sheet = ScoreSheet::new("team-1", 2);
        // 10/10 on weight 3, 0/5 on weight 1 -> 75%
        sheet.set_score(&criteria[0], 10);
        sheet.next_criterion();
        sheet.set_score(&criteria[1], 0);
        let total = sheet.weighted_total(&criteria);
        assert!((total - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weighted_total_with_no_criteria() {
        let sheet = ScoreSheet::new("team-1", 0);
        assert_eq!(sheet.weighted_total(&[]), 0.0);
    }

    #[test]
    fn test_entries_fill_blanks_with_zero() {
        let criteria = criteria();
        let mut sheet = ScoreSheet::new("team-1", 2);
        sheet.set_score(&criteria[0], 7);
        let entries = sheet.entries(&criteria);
        assert_eq!(entries, vec![("c1".into(), 7), ("c2".into(), 0)]);
    }
}
