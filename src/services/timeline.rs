//! Public progress timeline shown next to a folio.

use crate::dto::tracking_dto::{TimelineItem, TimelineResponse, TimelineStage};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::interview::{Interview, InterviewStatus};

const STAGES: [(TimelineStage, &str, &str); 5] = [
    (
        TimelineStage::Received,
        "Recibida",
        "Documentación recibida y registrada en el sistema.",
    ),
    (
        TimelineStage::Review,
        "En revisión",
        "Evaluación inicial de requisitos y perfil.",
    ),
    (
        TimelineStage::Interview,
        "Entrevista",
        "Programación y realización de entrevistas.",
    ),
    (
        TimelineStage::Evaluation,
        "Evaluación",
        "Análisis de resultados y toma de decisiones.",
    ),
    (
        TimelineStage::Finished,
        "Finalizada",
        "Proceso completado con decisión final.",
    ),
];

fn has_interview(interviews: &[Interview], status: InterviewStatus) -> bool {
    interviews.iter().any(|i| i.status() == Some(status))
}

/// Active and rejected candidates are done; candidates in process move on
/// as their interviews get scheduled and completed.
pub fn current_stage(status: Option<CandidateStatus>, interviews: &[Interview]) -> TimelineStage {
    match status {
        Some(CandidateStatus::Active) | Some(CandidateStatus::Rejected) => TimelineStage::Finished,
        Some(CandidateStatus::InProcess) => {
            if has_interview(interviews, InterviewStatus::Completed) {
                TimelineStage::Evaluation
            } else if has_interview(interviews, InterviewStatus::Pending) {
                TimelineStage::Interview
            } else {
                TimelineStage::Review
            }
        }
        None => TimelineStage::Received,
    }
}

/// `interviews` must belong to `candidate`.
pub fn build_timeline(candidate: &Candidate, interviews: &[Interview]) -> TimelineResponse {
    let stage = current_stage(candidate.status(), interviews);
    let last_completed = interviews
        .iter()
        .filter(|i| i.status() == Some(InterviewStatus::Completed))
        .map(|i| i.scheduled_on)
        .max();

    let items = STAGES
        .iter()
        .map(|&(item_stage, title, description)| {
            let date = match item_stage {
                TimelineStage::Received => Some(candidate.registered_at.date_naive()),
                TimelineStage::Review if stage > TimelineStage::Received => {
                    Some(candidate.updated_at.date_naive())
                }
                TimelineStage::Interview => last_completed,
                TimelineStage::Finished if stage == TimelineStage::Finished => {
                    Some(candidate.updated_at.date_naive())
                }
                _ => None,
            };
            TimelineItem {
                stage: item_stage,
                title: title.to_string(),
                description: description.to_string(),
                completed: item_stage <= stage,
                active: item_stage == stage,
                date,
            }
        })
        .collect();

    let status_label = candidate
        .status()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| candidate.status.clone());

    TimelineResponse {
        folio: candidate.folio.clone(),
        name: candidate.name.clone(),
        status: candidate.status.clone(),
        status_label,
        stage,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use uuid::Uuid;

    fn candidate(status: &str) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: "Juan Pérez".into(),
            email: "juan@example.com".into(),
            phone: "5551234567".into(),
            status: status.into(),
            position: None,
            notes: None,
            folio: "REC-00AB12CD".into(),
            advisor_id: None,
            registered_at: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 6, 20, 16, 0, 0).unwrap(),
        }
    }

    fn interview(day: u32, status: &str) -> Interview {
        Interview {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            candidate_name: "Juan Pérez".into(),
            scheduled_on: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            starts_at: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 60,
            kind: "in_person".into(),
            location: None,
            notes: None,
            status: status.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn in_process_candidate_advances_with_interviews() {
        assert_eq!(current_stage(Some(CandidateStatus::InProcess), &[]), TimelineStage::Review);
        assert_eq!(
            current_stage(Some(CandidateStatus::InProcess), &[interview(12, "cancelled")]),
            TimelineStage::Review
        );
        assert_eq!(
            current_stage(Some(CandidateStatus::InProcess), &[interview(12, "pending")]),
            TimelineStage::Interview
        );
        assert_eq!(
            current_stage(
                Some(CandidateStatus::InProcess),
                &[interview(12, "completed"), interview(15, "pending")]
            ),
            TimelineStage::Evaluation
        );
        assert_eq!(current_stage(Some(CandidateStatus::Rejected), &[]), TimelineStage::Finished);
        assert_eq!(current_stage(None, &[]), TimelineStage::Received);
    }

    #[test]
    fn review_stage_marks_only_the_first_two_items() {
        let timeline = build_timeline(&candidate("in_process"), &[]);

        assert_eq!(timeline.stage, TimelineStage::Review);
        assert_eq!(timeline.status_label, "En proceso");
        let flags: Vec<(bool, bool)> = timeline.items.iter().map(|i| (i.completed, i.active)).collect();
        assert_eq!(
            flags,
            vec![(true, false), (true, true), (false, false), (false, false), (false, false)]
        );
        assert_eq!(timeline.items[0].date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(timeline.items[1].date, NaiveDate::from_ymd_opt(2025, 6, 20));
        assert_eq!(timeline.items[4].date, None);
    }

    #[test]
    fn finished_timeline_dates_the_last_completed_interview() {
        let interviews = [interview(10, "completed"), interview(14, "completed"), interview(18, "cancelled")];
        let timeline = build_timeline(&candidate("active"), &interviews);

        assert_eq!(timeline.stage, TimelineStage::Finished);
        assert!(timeline.items.iter().all(|i| i.completed));
        assert_eq!(timeline.items[2].date, NaiveDate::from_ymd_opt(2025, 6, 14));
        assert_eq!(timeline.items[4].date, NaiveDate::from_ymd_opt(2025, 6, 20));
        assert!(timeline.items[4].active);
    }
}
