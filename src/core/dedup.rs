//! Novelty detection for extracted grades
//!
//! The widget lists grades newest first. Candidates are walked oldest first so
//! that several grades posted between two cycles are notified and appended to
//! history in posting order.

use crate::core::types::GradeRecord;

/// Return the candidates not yet present in `history`, in processing order.
///
/// Membership is a full scan of `history` per candidate under trimmed-triple
/// equality; history is not assumed sorted. A candidate identical to one already
/// accepted earlier in the same pass is reported once.
pub(crate) fn detect_new(fresh: &[GradeRecord], history: &[GradeRecord]) -> Vec<GradeRecord> {
    let mut new_grades: Vec<GradeRecord> = Vec::new();

    for candidate in fresh.iter().rev() {
        let known = history.iter().any(|seen| seen.same_grade(candidate))
            || new_grades.iter().any(|accepted| accepted.same_grade(candidate));
        if !known {
            new_grades.push(candidate.clone());
        }
    }

    new_grades
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(subject: &str, date: &str, grade: &str) -> GradeRecord {
        GradeRecord::new(subject, date, grade)
    }

    #[test]
    fn test_detect_returns_oldest_first() {
        let fresh = vec![
            g("A", "03/01", "12"),
            g("B", "02/01", "13"),
            g("C", "01/01", "14"),
        ];
        let result = detect_new(&fresh, &[]);
        let subjects: Vec<&str> = result.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_detect_skips_known_grades() {
        let history = vec![g("Maths", "01/01", "12/20")];
        let fresh = vec![g("Physique", "02/01", "15/20"), g("Maths", "01/01", "12/20")];
        let result = detect_new(&fresh, &history);
        assert_eq!(result, vec![g("Physique", "02/01", "15/20")]);
    }

    #[test]
    fn test_detect_matches_after_trimming() {
        let history = vec![g(" Maths ", "01/01\n", "12/20")];
        let fresh = vec![g("Maths", " 01/01", "12/20 ")];
        assert!(detect_new(&fresh, &history).is_empty());
    }

    #[test]
    fn test_detect_history_order_irrelevant() {
        let history = vec![
            g("Z", "09/09", "1"),
            g("Maths", "01/01", "12/20"),
            g("A", "01/01", "2"),
        ];
        let fresh = vec![g("Maths", "01/01", "12/20")];
        assert!(detect_new(&fresh, &history).is_empty());
    }

    #[test]
    fn test_detect_empty_extraction() {
        let history = vec![g("Maths", "01/01", "12/20")];
        assert!(detect_new(&[], &history).is_empty());
        assert!(detect_new(&[], &[]).is_empty());
    }

    #[test]
    fn test_detect_is_idempotent_without_persist() {
        let history = vec![g("Maths", "01/01", "12/20")];
        let fresh = vec![g("Chimie", "03/01", "9"), g("Maths", "01/01", "12/20")];
        let first = detect_new(&fresh, &history);
        let second = detect_new(&fresh, &history);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_detect_never_returns_history_members() {
        let history = vec![g("A", "1", "10"), g("B", "2", "11"), g("C", "3", "12")];
        let fresh = vec![
            g("D", "4", "13"),
            g("C", "3", "12"),
            g("B", "2", "11"),
            g("E", "5", "14"),
            g("A", "1", "10"),
        ];
        let result = detect_new(&fresh, &history);
        assert!(
            result
                .iter()
                .all(|r| !history.iter().any(|h| h.same_grade(r)))
        );
        assert_eq!(result, vec![g("E", "5", "14"), g("D", "4", "13")]);
    }

    #[test]
    fn test_detect_same_grade_twice_in_one_pass() {
        let fresh = vec![g("Maths", "01/01", "12"), g("Maths", "01/01", " 12")];
        let result = detect_new(&fresh, &[]);
        assert_eq!(result.len(), 1);
        // The oldest displayed copy is the one kept
        assert_eq!(result[0].grade, " 12");
    }

    #[test]
    fn test_detect_same_subject_different_grade_is_new() {
        let history = vec![g("Maths", "01/01", "12/20")];
        let fresh = vec![g("Maths", "01/01", "13/20")];
        assert_eq!(detect_new(&fresh, &history).len(), 1);
    }
}
