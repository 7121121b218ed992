use std::collections::HashSet;

use uuid::Uuid;

use crate::models::resume::ResumeRow;

/// Keeps the first resume seen per candidate (`user_id`), preserving order.
///
/// Expects `resumes` newest-first, so each survivor is the candidate's most
/// recent upload. Equal timestamps resolve to whichever row arrived first.
pub fn latest_per_candidate(resumes: Vec<ResumeRow>) -> Vec<ResumeRow> {
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(resumes.len());
    resumes
        .into_iter()
        .filter(|resume| seen.insert(resume.user_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::testing::resume_at;

    fn newest_first(mut resumes: Vec<ResumeRow>) -> Vec<ResumeRow> {
        resumes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        resumes
    }

    #[test]
    fn test_keeps_most_recent_resume_of_candidate() {
        let candidate = Uuid::new_v4();
        let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let t2 = t1 + Duration::days(30);
        let old = resume_at(candidate, "old.pdf", t1);
        let new = resume_at(candidate, "new.pdf", t2);

        let kept = latest_per_candidate(newest_first(vec![old, new.clone()]));

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, new.id);
    }

    #[test]
    fn test_one_resume_per_candidate_and_latest_wins() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let candidates: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();

        let mut all = Vec::new();
        for (i, candidate) in candidates.iter().enumerate() {
            for upload in 0..=i {
                let at = base + Duration::hours((upload * 7 + i) as i64);
                all.push(resume_at(*candidate, &format!("{i}-{upload}.pdf"), at));
            }
        }

        let kept = latest_per_candidate(newest_first(all.clone()));

        assert_eq!(kept.len(), candidates.len());
        for candidate in &candidates {
            let latest = all
                .iter()
                .filter(|r| r.user_id == *candidate)
                .map(|r| r.created_at)
                .max()
                .unwrap();
            let survivors: Vec<_> = kept.iter().filter(|r| r.user_id == *candidate).collect();
            assert_eq!(survivors.len(), 1);
            assert_eq!(survivors[0].created_at, latest);
        }
    }

    #[test]
    fn test_equal_timestamps_keep_first_encountered() {
        let candidate = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let first = resume_at(candidate, "a.pdf", at);
        let second = resume_at(candidate, "b.pdf", at);

        let kept = latest_per_candidate(vec![first.clone(), second]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, first.id);
    }

    #[test]
    fn test_empty_input() {
        assert!(latest_per_candidate(Vec::new()).is_empty());
    }
}
