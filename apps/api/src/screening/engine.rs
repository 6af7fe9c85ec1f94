//! Screening Engine — deterministic candidate-to-requirement scoring and ranking.
//!
//! A pure function over a snapshot of stored candidates: no I/O, no shared
//! state, no randomness. Identical inputs always produce identical orderings.
//! Scores blend tech-stack coverage (weighted by evidence confidence),
//! seniority and role matches, and a capped experience bonus; they are
//! comparable only within a single request, never across requests.
//!
//! Matching is token-level substring containment, not whole-word: "go" matches
//! inside "django". That false-positive bias is a known property of the
//! ranking and is kept on purpose.

use serde::{Deserialize, Serialize};

use crate::models::candidate::Candidate;

// ────────────────────────────────────────────────────────────────────────────
// Scoring weights
// ────────────────────────────────────────────────────────────────────────────

/// Points for full tech-stack coverage through `high_confidence_skills`.
pub const TECH_HIGH_CONFIDENCE_POINTS: f64 = 40.0;
/// Points for full coverage through `low_confidence_skills` or the fallback fields.
pub const TECH_LOW_CONFIDENCE_POINTS: f64 = 20.0;
/// Points for a seniority match against `general_proficiency`.
pub const SENIORITY_POINTS: f64 = 30.0;
/// Points for the target role appearing in the candidate's skills or stack.
pub const ROLE_POINTS: f64 = 10.0;
/// Experience contributes one point per year, capped here.
pub const EXPERIENCE_POINTS_CAP: f64 = 10.0;
/// Weight of a token found only in the general skillset/tech-stack fields.
const FALLBACK_MATCH_WEIGHT: f64 = 0.5;

pub const LONGLIST_LIMIT: usize = 20;
pub const SHORTLIST_LIMIT: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / result contracts
// ────────────────────────────────────────────────────────────────────────────

/// What the caller is hiring for. Every field may be empty; an empty field
/// simply contributes zero. The engine reads nothing but this struct — any
/// "remembered" session criteria must be merged in by the caller via [`or`].
///
/// [`or`]: ScreeningCriteria::or
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    /// Free-text target role, e.g. "Backend Engineer".
    #[serde(default)]
    pub role: String,
    /// Free-text target seniority, e.g. "Senior".
    #[serde(default)]
    pub seniority: String,
    /// Comma-delimited required technologies, e.g. "Python, Django, AWS".
    #[serde(default)]
    pub tech_stack: String,
}

impl ScreeningCriteria {
    /// True when no dimension carries a usable value.
    pub fn is_empty(&self) -> bool {
        self.role.trim().is_empty()
            && self.seniority.trim().is_empty()
            && self.tech_stack.trim().is_empty()
    }

    /// Field-wise merge with criteria remembered by the caller's session.
    /// An explicit non-blank value always wins over the fallback.
    pub fn or(self, fallback: &ScreeningCriteria) -> ScreeningCriteria {
        let pick = |explicit: String, remembered: &str| {
            if explicit.trim().is_empty() {
                remembered.to_string()
            } else {
                explicit
            }
        };
        ScreeningCriteria {
            role: pick(self.role, &fallback.role),
            seniority: pick(self.seniority, &fallback.seniority),
            tech_stack: pick(self.tech_stack, &fallback.tech_stack),
        }
    }
}

/// A candidate with its request-scoped score attached. Serializes as the full
/// candidate record plus a `score` field — additive, nothing dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: f64,
}

/// Ranked output of one screening pass. The shortlist is always a prefix of
/// the longlist.
#[derive(Debug, Serialize)]
pub struct ScreeningOutcome {
    pub shortlist: Vec<ScoredCandidate>,
    pub longlist: Vec<ScoredCandidate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores one candidate against the criteria. Missing profile fields default
/// to empty — a sparse record scores low, it never errors.
pub fn score_candidate(candidate: &Candidate, criteria: &ScreeningCriteria) -> f64 {
    let profile = &candidate.profile;
    let skillset = lower_or_empty(profile.skillset.as_deref());
    let stack = lower_or_empty(profile.tech_stack.as_deref());
    let high_confidence = lower_or_empty(profile.high_confidence_skills.as_deref());
    let low_confidence = lower_or_empty(profile.low_confidence_skills.as_deref());
    let proficiency = lower_or_empty(profile.general_proficiency.as_deref());

    let mut score = 0.0;

    // Tech-stack coverage, split by evidence confidence. A token lands in at
    // most one bucket: demonstrated beats claimed beats fallback.
    let targets = normalize_tokens(&criteria.tech_stack);
    if !targets.is_empty() {
        let mut high_matches = 0.0;
        let mut low_matches = 0.0;
        for token in &targets {
            if high_confidence.contains(token.as_str()) {
                high_matches += 1.0;
            } else if low_confidence.contains(token.as_str()) {
                low_matches += 1.0;
            } else if skillset.contains(token.as_str()) || stack.contains(token.as_str()) {
                low_matches += FALLBACK_MATCH_WEIGHT;
            }
        }
        let total = targets.len() as f64;
        score += (high_matches / total) * TECH_HIGH_CONFIDENCE_POINTS
            + (low_matches / total) * TECH_LOW_CONFIDENCE_POINTS;
    }

    // Seniority: direct substring match, or the exclusive overrides —
    // "lead" covers "senior", and "senior"/"lead" cover "mid".
    let seniority = criteria.seniority.trim().to_lowercase();
    if !seniority.is_empty() {
        let covered = proficiency.contains(&seniority)
            || match seniority.as_str() {
                "senior" => proficiency.contains("lead"),
                "mid" => proficiency.contains("senior") || proficiency.contains("lead"),
                _ => false,
            };
        if covered {
            score += SENIORITY_POINTS;
        }
    }

    // Role appearing among skills/stack. Simplistic by design.
    let role = criteria.role.trim().to_lowercase();
    if !role.is_empty() && (skillset.contains(&role) || stack.contains(&role)) {
        score += ROLE_POINTS;
    }

    // Experience: one point per year-equivalent, capped.
    let months = profile.total_months_experience.max(0);
    if months > 0 {
        score += (months as f64 / 12.0).min(EXPERIENCE_POINTS_CAP);
    }

    score
}

/// Scores every candidate, sorts descending, and caps the result lists.
///
/// The sort is stable: candidates with equal scores keep their order from the
/// input sequence (the store's fetch order).
pub fn score_and_rank(
    candidates: Vec<Candidate>,
    criteria: &ScreeningCriteria,
) -> ScreeningOutcome {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = score_candidate(&candidate, criteria);
            ScoredCandidate { candidate, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(LONGLIST_LIMIT);

    let shortlist = scored.iter().take(SHORTLIST_LIMIT).cloned().collect();

    ScreeningOutcome {
        shortlist,
        longlist: scored,
    }
}

/// Splits a comma-delimited list into trimmed, lower-cased, non-empty,
/// deduplicated tokens. Order is preserved.
fn normalize_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for token in raw.split(',') {
        let token = token.trim().to_lowercase();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

fn lower_or_empty(field: Option<&str>) -> String {
    field.unwrap_or_default().to_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateRow;
    use chrono::Utc;

    fn make_candidate(id: i64) -> Candidate {
        Candidate {
            profile: CandidateRow {
                id,
                filename: format!("cv_{id}.pdf"),
                name: Some(format!("Candidate {id}")),
                age: None,
                total_months_experience: 0,
                total_companies: 0,
                roles_served: None,
                skillset: None,
                high_confidence_skills: None,
                low_confidence_skills: None,
                tech_stack: None,
                general_proficiency: None,
                ai_summary: None,
                created_at: Utc::now(),
            },
            work_experience: Vec::new(),
        }
    }

    fn criteria(role: &str, seniority: &str, tech_stack: &str) -> ScreeningCriteria {
        ScreeningCriteria {
            role: role.to_string(),
            seniority: seniority.to_string(),
            tech_stack: tech_stack.to_string(),
        }
    }

    #[test]
    fn test_confidence_weighted_tech_contribution() {
        let mut candidate = make_candidate(1);
        candidate.profile.high_confidence_skills = Some("python, aws".to_string());
        candidate.profile.low_confidence_skills = Some("docker".to_string());

        // python counts high, docker counts low, go has no match:
        // (1/3)*40 + (1/3)*20 = 20.0
        let score = score_candidate(&candidate, &criteria("", "", "python, docker, go"));
        assert!((score - 20.0).abs() < f64::EPSILON, "score was {score}");
    }

    #[test]
    fn test_fallback_match_scores_half_weight_into_low_bucket() {
        let mut candidate = make_candidate(1);
        candidate.profile.skillset = Some("kubernetes".to_string());

        // (0.5/1)*20 = 10.0
        let score = score_candidate(&candidate, &criteria("", "", "kubernetes"));
        assert!((score - 10.0).abs() < f64::EPSILON, "score was {score}");
    }

    #[test]
    fn test_token_counted_in_one_bucket_only() {
        let mut candidate = make_candidate(1);
        // The same skill everywhere must count once, as high confidence
        candidate.profile.high_confidence_skills = Some("python".to_string());
        candidate.profile.low_confidence_skills = Some("python".to_string());
        candidate.profile.skillset = Some("python".to_string());

        let score = score_candidate(&candidate, &criteria("", "", "python"));
        assert!((score - TECH_HIGH_CONFIDENCE_POINTS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_tech_stack_contributes_zero_and_does_not_panic() {
        let mut candidate = make_candidate(1);
        candidate.profile.skillset = Some("python, django".to_string());
        candidate.profile.tech_stack = Some("python, django".to_string());

        assert_eq!(score_candidate(&candidate, &criteria("", "", "")), 0.0);
        assert_eq!(score_candidate(&candidate, &criteria("", "", "  ,  , ")), 0.0);
    }

    #[test]
    fn test_duplicate_and_mixed_case_tokens_do_not_change_score() {
        let mut candidate = make_candidate(1);
        candidate.profile.high_confidence_skills = Some("Python, AWS".to_string());

        let plain = score_candidate(&candidate, &criteria("", "", "python, aws"));
        let noisy = score_candidate(
            &candidate,
            &criteria("", "", " PYTHON , aws, Python , AWS "),
        );
        assert!((plain - noisy).abs() < f64::EPSILON);
    }

    #[test]
    fn test_substring_semantics_go_matches_django() {
        let mut candidate = make_candidate(1);
        candidate.profile.skillset = Some("django".to_string());

        // Known false-positive bias, preserved on purpose
        let score = score_candidate(&candidate, &criteria("", "", "go"));
        assert!((score - 10.0).abs() < f64::EPSILON, "score was {score}");
    }

    #[test]
    fn test_direct_seniority_match() {
        let mut candidate = make_candidate(1);
        candidate.profile.general_proficiency = Some("Senior Backend Engineer".to_string());

        let score = score_candidate(&candidate, &criteria("", "Senior", ""));
        assert!((score - SENIORITY_POINTS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lead_covers_senior() {
        let mut candidate = make_candidate(1);
        candidate.profile.general_proficiency = Some("Lead Engineer".to_string());

        let score = score_candidate(&candidate, &criteria("", "Senior", ""));
        assert!((score - SENIORITY_POINTS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_senior_and_lead_cover_mid() {
        let mut senior = make_candidate(1);
        senior.profile.general_proficiency = Some("Senior Engineer".to_string());
        let mut lead = make_candidate(2);
        lead.profile.general_proficiency = Some("Lead Engineer".to_string());

        let target = criteria("", "Mid", "");
        assert!((score_candidate(&senior, &target) - SENIORITY_POINTS).abs() < f64::EPSILON);
        assert!((score_candidate(&lead, &target) - SENIORITY_POINTS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_junior_does_not_cover_senior() {
        let mut candidate = make_candidate(1);
        candidate.profile.general_proficiency = Some("Junior Engineer".to_string());

        assert_eq!(score_candidate(&candidate, &criteria("", "Senior", "")), 0.0);
    }

    #[test]
    fn test_empty_seniority_matches_nothing() {
        let mut candidate = make_candidate(1);
        candidate.profile.general_proficiency = Some("Senior Engineer".to_string());

        assert_eq!(score_candidate(&candidate, &criteria("", "", "")), 0.0);
    }

    #[test]
    fn test_role_match_against_skills_or_stack() {
        let mut candidate = make_candidate(1);
        candidate.profile.tech_stack = Some("backend engineering, python".to_string());

        let score = score_candidate(&candidate, &criteria("Backend Engineering", "", ""));
        assert!((score - ROLE_POINTS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_experience_one_point_per_year_capped_at_ten() {
        let mut candidate = make_candidate(1);

        candidate.profile.total_months_experience = 120;
        let score = score_candidate(&candidate, &ScreeningCriteria::default());
        assert!((score - 10.0).abs() < f64::EPSILON);

        candidate.profile.total_months_experience = 300;
        let score = score_candidate(&candidate, &ScreeningCriteria::default());
        assert!((score - EXPERIENCE_POINTS_CAP).abs() < f64::EPSILON);

        candidate.profile.total_months_experience = 18;
        let score = score_candidate(&candidate, &ScreeningCriteria::default());
        assert!((score - 1.5).abs() < f64::EPSILON, "score was {score}");
    }

    #[test]
    fn test_all_fields_missing_scores_zero_without_panicking() {
        let candidate = make_candidate(1);
        let score = score_candidate(
            &candidate,
            &criteria("Backend Engineer", "Senior", "python, aws"),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_full_match_combines_all_dimensions() {
        let mut candidate = make_candidate(1);
        candidate.profile.high_confidence_skills = Some("python, django".to_string());
        candidate.profile.skillset = Some("backend, python, django".to_string());
        candidate.profile.general_proficiency = Some("Senior Backend Engineer".to_string());
        candidate.profile.total_months_experience = 96;

        // 40 (tech, all high) + 30 (seniority) + 10 (role) + 8 (experience)
        let score = score_candidate(
            &candidate,
            &criteria("backend", "Senior", "python, django"),
        );
        assert!((score - 88.0).abs() < f64::EPSILON, "score was {score}");
    }

    #[test]
    fn test_ranking_sorts_descending_and_caps_lists() {
        // 25 candidates with strictly increasing experience → distinct scores
        let candidates: Vec<Candidate> = (1..=25)
            .map(|id| {
                let mut c = make_candidate(id);
                c.profile.total_months_experience = id * 4;
                c
            })
            .collect();

        let outcome = score_and_rank(candidates, &ScreeningCriteria::default());

        assert_eq!(outcome.longlist.len(), LONGLIST_LIMIT);
        assert_eq!(outcome.shortlist.len(), SHORTLIST_LIMIT);
        assert!(outcome
            .longlist
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
        // Highest experience (id 25) first
        assert_eq!(outcome.longlist[0].candidate.profile.id, 25);
        // Shortlist is the prefix of the longlist
        for (short, long) in outcome.shortlist.iter().zip(outcome.longlist.iter()) {
            assert_eq!(short.candidate.profile.id, long.candidate.profile.id);
        }
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        // All zero scores: order must match input order exactly
        let candidates: Vec<Candidate> = (1..=8).map(make_candidate).collect();
        let outcome = score_and_rank(candidates, &ScreeningCriteria::default());

        let ids: Vec<i64> = outcome
            .longlist
            .iter()
            .map(|s| s.candidate.profile.id)
            .collect();
        assert_eq!(ids, (1..=8).collect::<Vec<i64>>());
    }

    #[test]
    fn test_fewer_candidates_than_limits() {
        let candidates: Vec<Candidate> = (1..=3).map(make_candidate).collect();
        let outcome = score_and_rank(candidates, &ScreeningCriteria::default());
        assert_eq!(outcome.longlist.len(), 3);
        assert_eq!(outcome.shortlist.len(), 3);
    }

    #[test]
    fn test_scoring_is_pure_and_repeatable() {
        let candidates: Vec<Candidate> = (1..=10)
            .map(|id| {
                let mut c = make_candidate(id);
                c.profile.skillset = Some("python, django, aws".to_string());
                c.profile.total_months_experience = id * 7;
                c
            })
            .collect();
        let target = criteria("Backend Engineer", "Senior", "python, aws");

        let first = score_and_rank(candidates.clone(), &target);
        let second = score_and_rank(candidates, &target);

        let order = |o: &ScreeningOutcome| {
            o.longlist
                .iter()
                .map(|s| (s.candidate.profile.id, s.score))
                .collect::<Vec<_>>()
        };
        assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn test_criteria_merge_prefers_explicit_values() {
        let remembered = criteria("Backend Engineer", "Senior", "python");
        let explicit = criteria("", "Mid", " ");

        let merged = explicit.or(&remembered);
        assert_eq!(merged.role, "Backend Engineer");
        assert_eq!(merged.seniority, "Mid");
        assert_eq!(merged.tech_stack, "python");
    }

    #[test]
    fn test_criteria_is_empty_ignores_whitespace() {
        assert!(ScreeningCriteria::default().is_empty());
        assert!(criteria("  ", "\t", "").is_empty());
        assert!(!criteria("", "", "python").is_empty());
    }

    #[test]
    fn test_scored_candidate_serializes_additively() {
        let mut candidate = make_candidate(7);
        candidate.profile.name = Some("John Doe".to_string());
        let scored = ScoredCandidate {
            candidate,
            score: 42.5,
        };

        let value = serde_json::to_value(&scored).unwrap();
        // Original attributes preserved alongside the added score
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "John Doe");
        assert_eq!(value["filename"], "cv_7.pdf");
        assert_eq!(value["score"], 42.5);
        assert!(value["work_experience"].is_array());
    }
}
