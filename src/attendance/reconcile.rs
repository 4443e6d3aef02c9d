use std::collections::{BTreeMap, HashMap, HashSet};

use sqlx::{PgConnection, PgPool};
use tracing::{error, info, warn};

use crate::courses::{repo::enrolled_students, repo_types::EnrolledStudent};
use crate::error::{AppError, AppResult};

use super::dto::{AttendanceEntry, AttendanceSubmission};
use super::repo;
use super::repo_types::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
}

/// One planned row write for the (course, date) being reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceWrite {
    pub kind: WriteKind,
    pub student_id: i32,
    pub status: AttendanceStatus,
    pub notes: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub inserted: usize,
    pub updated: usize,
    /// Submitted ids that are not enrolled in the course.
    pub ignored: Vec<i32>,
}

/// Decides insert vs update for every enrolled student, in roster order.
pub fn plan(
    enrolled: &[EnrolledStudent],
    existing: &HashSet<i32>,
    entries: &BTreeMap<i32, AttendanceEntry>,
) -> Vec<AttendanceWrite> {
    enrolled
        .iter()
        .map(|s| {
            let entry = entries.get(&s.student_id).cloned().unwrap_or_default();
            AttendanceWrite {
                kind: if existing.contains(&s.student_id) {
                    WriteKind::Update
                } else {
                    WriteKind::Insert
                },
                student_id: s.student_id,
                status: entry.status.unwrap_or_default(),
                notes: entry.notes.unwrap_or_default(),
            }
        })
        .collect()
}

async fn apply(
    conn: &mut PgConnection,
    course_id: &str,
    date: time::Date,
    writes: &[AttendanceWrite],
) -> sqlx::Result<()> {
    for w in writes {
        match w.kind {
            WriteKind::Insert => {
                repo::insert(conn, w.student_id, course_id, date, w.status, &w.notes).await?
            }
            WriteKind::Update => {
                repo::update(conn, w.student_id, course_id, date, w.status, &w.notes).await?
            }
        }
    }
    Ok(())
}

async fn plan_in(
    conn: &mut PgConnection,
    sub: &AttendanceSubmission,
) -> sqlx::Result<(Vec<AttendanceWrite>, Vec<i32>)> {
    let enrolled = enrolled_students(&mut *conn, &sub.course_id).await?;
    let ids: Vec<i32> = enrolled.iter().map(|s| s.student_id).collect();
    let existing: HashSet<i32> = repo::existing_for(&mut *conn, &sub.course_id, sub.date, &ids)
        .await?
        .into_iter()
        .map(|r| r.student_id)
        .collect();

    let enrolled_set: HashSet<i32> = ids.iter().copied().collect();
    let ignored = sub
        .entries
        .keys()
        .copied()
        .filter(|id| !enrolled_set.contains(id))
        .collect();

    Ok((plan(&enrolled, &existing, &sub.entries), ignored))
}

/// Runs one reconciliation pass in a single transaction. Any database
/// error rolls back every write of the pass.
pub async fn reconcile(db: &PgPool, sub: &AttendanceSubmission) -> AppResult<ReconcileOutcome> {
    let mut tx = db.begin().await?;

    let result = async {
        let (writes, ignored) = plan_in(&mut tx, sub).await?;
        apply(&mut tx, &sub.course_id, sub.date, &writes).await?;
        Ok::<_, sqlx::Error>((writes, ignored))
    }
    .await;

    let (writes, ignored) = match result {
        Ok(done) => done,
        Err(e) => {
            error!(error = %e, course_id = %sub.course_id, date = %sub.date, "attendance batch failed");
            if let Err(rb) = tx.rollback().await {
                error!(error = %rb, "attendance rollback failed");
            }
            return Err(AppError::AttendanceBatch(e));
        }
    };

    if let Err(e) = tx.commit().await {
        error!(error = %e, course_id = %sub.course_id, "attendance commit failed");
        return Err(AppError::AttendanceBatch(e));
    }

    if !ignored.is_empty() {
        warn!(course_id = %sub.course_id, ?ignored, "attendance for students not enrolled ignored");
    }
    let outcome = ReconcileOutcome {
        inserted: writes.iter().filter(|w| w.kind == WriteKind::Insert).count(),
        updated: writes.iter().filter(|w| w.kind == WriteKind::Update).count(),
        ignored,
    };
    info!(
        course_id = %sub.course_id,
        date = %sub.date,
        inserted = outcome.inserted,
        updated = outcome.updated,
        "attendance reconciled"
    );
    Ok(outcome)
}

/// Roster and stored rows for (course, date), keyed by student id.
pub async fn current_state(
    db: &PgPool,
    course_id: &str,
    date: time::Date,
) -> sqlx::Result<(Vec<EnrolledStudent>, HashMap<i32, AttendanceRecord>)> {
    let enrolled = enrolled_students(db, course_id).await?;
    let ids: Vec<i32> = enrolled.iter().map(|s| s.student_id).collect();
    let rows = repo::existing_for(db, course_id, date, &ids)
        .await?
        .into_iter()
        .map(|r| (r.student_id, r))
        .collect();
    Ok((enrolled, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_course, seed_student, test_pool};
    use time::macros::date;

    fn roster(ids: &[i32]) -> Vec<EnrolledStudent> {
        ids.iter()
            .map(|&id| EnrolledStudent {
                student_id: id,
                name: format!("Student {id}"),
                username: format!("s{id}"),
            })
            .collect()
    }

    fn entry(status: AttendanceStatus, notes: &str) -> AttendanceEntry {
        AttendanceEntry {
            status: Some(status),
            notes: Some(notes.into()),
        }
    }

    #[test]
    fn plan_inserts_new_and_updates_existing() {
        let existing = HashSet::from([102]);
        let entries = BTreeMap::from([(101, entry(AttendanceStatus::Absent, "flu"))]);

        let writes = plan(&roster(&[101, 102]), &existing, &entries);
        assert_eq!(
            writes,
            vec![
                AttendanceWrite {
                    kind: WriteKind::Insert,
                    student_id: 101,
                    status: AttendanceStatus::Absent,
                    notes: "flu".into(),
                },
                AttendanceWrite {
                    kind: WriteKind::Update,
                    student_id: 102,
                    status: AttendanceStatus::Present,
                    notes: String::new(),
                },
            ]
        );
    }

    #[test]
    fn plan_ignores_students_not_on_roster() {
        let entries = BTreeMap::from([(999, entry(AttendanceStatus::Late, ""))]);
        let writes = plan(&roster(&[1]), &HashSet::new(), &entries);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].student_id, 1);
        assert_eq!(writes[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn replanning_after_apply_only_updates() {
        let students = roster(&[1, 2, 3]);
        let entries = BTreeMap::from([(2, entry(AttendanceStatus::Excused, "trip"))]);

        let first = plan(&students, &HashSet::new(), &entries);
        let stored: HashSet<i32> = first.iter().map(|w| w.student_id).collect();
        let second = plan(&students, &stored, &entries);

        assert!(second.iter().all(|w| w.kind == WriteKind::Update));
        let values = |ws: &[AttendanceWrite]| {
            ws.iter()
                .map(|w| (w.student_id, w.status, w.notes.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(values(&first), values(&second));
    }

    fn submission(course: &str, entries: BTreeMap<i32, AttendanceEntry>) -> AttendanceSubmission {
        AttendanceSubmission {
            course_id: course.into(),
            date: date!(2024 - 09 - 02),
            entries,
        }
    }

    #[tokio::test]
    async fn present_then_absent_updates_the_same_row() {
        let Some(db) = test_pool().await else { return };
        let course = seed_course(&db).await;
        let student = seed_student(&db).await;
        crate::courses::repo::enroll(&db, student, &course).await.unwrap();

        let present = submission(
            &course,
            BTreeMap::from([(student, entry(AttendanceStatus::Present, ""))]),
        );
        let out = reconcile(&db, &present).await.unwrap();
        assert_eq!((out.inserted, out.updated), (1, 0));

        // idempotent
        reconcile(&db, &present).await.unwrap();
        let (_, rows) = current_state(&db, &course, present.date).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[&student].status, AttendanceStatus::Present);

        let absent = submission(
            &course,
            BTreeMap::from([(student, entry(AttendanceStatus::Absent, "no show"))]),
        );
        let out = reconcile(&db, &absent).await.unwrap();
        assert_eq!((out.inserted, out.updated), (0, 1));

        let (_, rows) = current_state(&db, &course, absent.date).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[&student].status, AttendanceStatus::Absent);
        assert_eq!(rows[&student].notes, "no show");
    }

    #[tokio::test]
    async fn failing_batch_leaves_no_rows() {
        let Some(db) = test_pool().await else { return };
        let course = seed_course(&db).await;
        let a = seed_student(&db).await;
        let b = seed_student(&db).await;
        for s in [a, b] {
            crate::courses::repo::enroll(&db, s, &course).await.unwrap();
        }

        // notes column holds 255 chars; one over-long note fails the pass
        let sub = submission(
            &course,
            BTreeMap::from([
                (a, entry(AttendanceStatus::Late, "bus")),
                (b, entry(AttendanceStatus::Absent, &"x".repeat(300))),
            ]),
        );
        let err = reconcile(&db, &sub).await.unwrap_err();
        assert!(err.user_message().starts_with("Error saving attendance:"));

        let (_, rows) = current_state(&db, &course, sub.date).await.unwrap();
        assert!(rows.is_empty());
    }
}
