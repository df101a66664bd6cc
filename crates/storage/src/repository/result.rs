use chrono::NaiveTime;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::patch::patch;
use crate::dto::result::{CreateResultRequest, EventResultEntry, UpdateResultRequest};
use crate::error::{Result, StorageError};
use crate::models::{CompletionStatus, RaceResult, YachtHandicap};
use crate::services::corrected_time::{
    ClassStartTimes, CorrectionInput, CorrectionResult, compute_corrected_time, penalty_duration,
};

const RESULT_COLUMNS: &str = "result_id, event_id, yacht_id, completion_status, finish_time, order_over_line, \
     time_penalty, posted_time, used_spinnaker, notes, created_at, updated_at";

/// Result fields as they will be written, after merging an update.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResult {
    pub completion_status: CompletionStatus,
    pub finish_time: Option<NaiveTime>,
    pub order_over_line: Option<i32>,
    pub time_penalty: Option<NaiveTime>,
    pub used_spinnaker: bool,
    pub notes: Option<String>,
}

impl From<&CreateResultRequest> for PendingResult {
    fn from(req: &CreateResultRequest) -> Self {
        Self {
            completion_status: req.completion_status,
            finish_time: req.finish_time,
            order_over_line: req.order_over_line,
            time_penalty: req.time_penalty,
            used_spinnaker: req.used_spinnaker,
            notes: req.notes.clone(),
        }
    }
}

impl PendingResult {
    /// Omitted fields keep their stored value; `Some(None)` clears a field
    pub fn merged(existing: &RaceResult, req: &UpdateResultRequest) -> Self {
        Self {
            completion_status: req.completion_status.unwrap_or(existing.completion_status),
            finish_time: patch(req.finish_time, existing.finish_time),
            order_over_line: req.order_over_line.or(existing.order_over_line),
            time_penalty: patch(req.time_penalty, existing.time_penalty),
            used_spinnaker: req.used_spinnaker.unwrap_or(existing.used_spinnaker),
            notes: req.notes.clone().or_else(|| existing.notes.clone()),
        }
    }
}

/// The pre-commit hook: derives the posted time of a result about to be
/// written from its yacht and its event's class starts.
pub fn posted_time_for(
    yacht: &YachtHandicap,
    class_starts: ClassStartTimes,
    pending: &PendingResult,
) -> CorrectionResult<Option<NaiveTime>> {
    let input = CorrectionInput {
        completion_status: pending.completion_status,
        yacht_active: yacht.is_active,
        yacht_class: yacht.yacht_class,
        phrf_rating: yacht.phrf_rating,
        used_spinnaker: pending.used_spinnaker,
        spinnaker_adjustment: yacht.spinnaker_adjustment,
        class_start_times: class_starts,
        finish_time: pending.finish_time,
        time_penalty: pending.time_penalty.map(penalty_duration),
    };

    compute_corrected_time(&input)
}

#[derive(FromRow)]
struct RecomputeRow {
    result_id: Uuid,
    completion_status: CompletionStatus,
    finish_time: Option<NaiveTime>,
    time_penalty: Option<NaiveTime>,
    used_spinnaker: bool,
    #[sqlx(flatten)]
    yacht: YachtHandicap,
}

/// Repository for race results
///
/// `create`, `update` and `recompute_event` derive `posted_time` inside the
/// same transaction as the write. A correction error rolls the write back.
pub struct ResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<RaceResult> {
        let sql = format!("SELECT {} FROM results WHERE result_id = $1", RESULT_COLUMNS);
        let result = sqlx::query_as::<_, RaceResult>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(result)
    }

    /// Results of an event joined with their yachts, fastest posted time first
    pub async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<EventResultEntry>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_by_event_tx(&mut conn, event_id).await
    }

    pub async fn list_by_event_tx(tx: &mut PgConnection, event_id: Uuid) -> Result<Vec<EventResultEntry>> {
        let entries = sqlx::query_as::<_, EventResultEntry>(
            r#"
            SELECT r.result_id, r.yacht_id, y.name AS yacht_name, y.slug AS yacht_slug,
                   y.sail_number, y.yacht_class, r.completion_status, r.finish_time,
                   r.order_over_line, r.time_penalty, r.used_spinnaker, r.posted_time
            FROM results r
            INNER JOIN yachts y ON y.yacht_id = r.yacht_id
            WHERE r.event_id = $1
            ORDER BY r.posted_time NULLS LAST, y.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&mut *tx)
        .await?;

        Ok(entries)
    }

    pub async fn list_by_yacht(&self, yacht_id: Uuid) -> Result<Vec<RaceResult>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM results
            WHERE yacht_id = $1
            ORDER BY created_at DESC
            "#,
            RESULT_COLUMNS
        );
        let results = sqlx::query_as::<_, RaceResult>(&sql)
            .bind(yacht_id)
            .fetch_all(self.pool)
            .await?;

        Ok(results)
    }

    pub async fn create(&self, req: &CreateResultRequest) -> Result<RaceResult> {
        let mut tx = self.pool.begin().await?;
        let result = Self::create_tx(&mut tx, req).await?;
        tx.commit().await?;

        Ok(result)
    }

    /// Derives the posted time and inserts on the caller's transaction
    pub async fn create_tx(tx: &mut PgConnection, req: &CreateResultRequest) -> Result<RaceResult> {
        let pending = PendingResult::from(req);

        let yacht = load_handicap(tx, req.yacht_id).await?;
        let class_starts = load_class_starts(tx, req.event_id).await?;
        let posted_time = posted_time_for(&yacht, class_starts, &pending)?;

        let sql = format!(
            r#"
            INSERT INTO results (
                event_id, yacht_id, completion_status, finish_time, order_over_line,
                time_penalty, posted_time, used_spinnaker, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            RESULT_COLUMNS
        );
        let result = sqlx::query_as::<_, RaceResult>(&sql)
            .bind(req.event_id)
            .bind(req.yacht_id)
            .bind(pending.completion_status)
            .bind(pending.finish_time)
            .bind(pending.order_over_line)
            .bind(pending.time_penalty)
            .bind(posted_time)
            .bind(pending.used_spinnaker)
            .bind(&pending.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                StorageError::from(e).with_constraint_message(
                    "Yacht already has a result for this event",
                    "Event or yacht does not exist",
                )
            })?;

        tracing::debug!(
            result_id = %result.result_id,
            posted_time = ?result.posted_time,
            "Result recorded"
        );

        Ok(result)
    }

    pub async fn update(&self, existing: &RaceResult, req: &UpdateResultRequest) -> Result<RaceResult> {
        let pending = PendingResult::merged(existing, req);
        let mut tx = self.pool.begin().await?;

        let yacht = load_handicap(&mut tx, existing.yacht_id).await?;
        let class_starts = load_class_starts(&mut tx, existing.event_id).await?;
        let posted_time = posted_time_for(&yacht, class_starts, &pending)?;

        let sql = format!(
            r#"
            UPDATE results
            SET completion_status = $2,
                finish_time = $3,
                order_over_line = $4,
                time_penalty = $5,
                posted_time = $6,
                used_spinnaker = $7,
                notes = $8
            WHERE result_id = $1
            RETURNING {}
            "#,
            RESULT_COLUMNS
        );
        let result = sqlx::query_as::<_, RaceResult>(&sql)
            .bind(existing.result_id)
            .bind(pending.completion_status)
            .bind(pending.finish_time)
            .bind(pending.order_over_line)
            .bind(pending.time_penalty)
            .bind(posted_time)
            .bind(pending.used_spinnaker)
            .bind(&pending.notes)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        tx.commit().await?;

        tracing::debug!(
            result_id = %result.result_id,
            posted_time = ?result.posted_time,
            "Result updated"
        );

        Ok(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM results WHERE result_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Re-derive the posted time of every result in an event, e.g. after a
    /// start time or a yacht's rating changed. All or nothing.
    pub async fn recompute_event(&self, event_id: Uuid) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let count = Self::recompute_event_tx(&mut tx, event_id).await?;
        tx.commit().await?;

        tracing::info!(%event_id, count, "Posted times recomputed");

        Ok(count)
    }

    pub async fn recompute_event_tx(tx: &mut PgConnection, event_id: Uuid) -> Result<u64> {
        let class_starts = load_class_starts(tx, event_id).await?;
        let rows = sqlx::query_as::<_, RecomputeRow>(
            r#"
            SELECT r.result_id, r.completion_status, r.finish_time, r.time_penalty,
                   r.used_spinnaker, y.yacht_id, y.is_active, y.yacht_class, y.phrf_rating,
                   s.adjustment_value AS spinnaker_adjustment
            FROM results r
            INNER JOIN yachts y ON y.yacht_id = r.yacht_id
            LEFT JOIN spinnakers s ON s.spinnaker_id = y.spinnaker_id
            WHERE r.event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut count = 0u64;

        for row in rows {
            let pending = PendingResult {
                completion_status: row.completion_status,
                finish_time: row.finish_time,
                order_over_line: None,
                time_penalty: row.time_penalty,
                used_spinnaker: row.used_spinnaker,
                notes: None,
            };
            let posted_time = posted_time_for(&row.yacht, class_starts, &pending).inspect_err(|e| {
                tracing::warn!(result_id = %row.result_id, error = %e, "Recompute aborted");
            })?;

            sqlx::query("UPDATE results SET posted_time = $2 WHERE result_id = $1")
                .bind(row.result_id)
                .bind(posted_time)
                .execute(&mut *tx)
                .await?;

            count += 1;
        }

        Ok(count)
    }

    /// Events holding a result of a yacht that races with this spinnaker class
    pub async fn events_using_spinnaker_tx(tx: &mut PgConnection, spinnaker_id: Uuid) -> Result<Vec<Uuid>> {
        let event_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT r.event_id
            FROM results r
            INNER JOIN yachts y ON y.yacht_id = r.yacht_id
            INNER JOIN events e ON e.event_id = r.event_id
            WHERE y.spinnaker_id = $1 AND e.is_deleted = FALSE
            "#,
        )
        .bind(spinnaker_id)
        .fetch_all(&mut *tx)
        .await?;

        Ok(event_ids)
    }
}

async fn load_handicap(conn: &mut PgConnection, yacht_id: Uuid) -> Result<YachtHandicap> {
    sqlx::query_as::<_, YachtHandicap>(
        r#"
        SELECT y.yacht_id, y.is_active, y.yacht_class, y.phrf_rating,
               s.adjustment_value AS spinnaker_adjustment
        FROM yachts y
        LEFT JOIN spinnakers s ON s.spinnaker_id = y.spinnaker_id
        WHERE y.yacht_id = $1 AND y.is_deleted = FALSE
        "#,
    )
    .bind(yacht_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StorageError::ConstraintViolation("Yacht does not exist".to_string()))
}

async fn load_class_starts(conn: &mut PgConnection, event_id: Uuid) -> Result<ClassStartTimes> {
    sqlx::query_as::<_, ClassStartTimes>(
        r#"
        SELECT start_a AS a, start_b AS b, start_c AS c, start_j AS j
        FROM events
        WHERE event_id = $1 AND is_deleted = FALSE
        "#,
    )
    .bind(event_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StorageError::ConstraintViolation("Event does not exist".to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;

    use super::*;
    use crate::Database;
    use crate::dto::event::CreateEventRequest;
    use crate::dto::series::CreateSeriesRequest;
    use crate::dto::yacht::CreateYachtRequest;
    use crate::models::{Event, Yacht, YachtClass};
    use crate::repository::{event::EventRepository, series::SeriesRepository, yacht::YachtRepository};
    use crate::services::corrected_time::CorrectionError;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn yacht() -> YachtHandicap {
        YachtHandicap {
            yacht_id: Uuid::new_v4(),
            is_active: true,
            yacht_class: Some(YachtClass::A1),
            phrf_rating: Some(Decimal::from(150)),
            spinnaker_adjustment: Some(18),
        }
    }

    fn class_starts() -> ClassStartTimes {
        ClassStartTimes {
            a: Some(hms(10, 0, 0)),
            ..ClassStartTimes::default()
        }
    }

    fn stored_result() -> RaceResult {
        let timestamp = NaiveDateTime::parse_from_str("2022-07-06 18:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        RaceResult {
            result_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            yacht_id: Uuid::new_v4(),
            completion_status: CompletionStatus::Completed,
            finish_time: Some(hms(11, 0, 0)),
            order_over_line: Some(3),
            time_penalty: None,
            posted_time: Some(hms(0, 58, 12)),
            used_spinnaker: false,
            notes: Some("clean start".to_string()),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    fn no_changes() -> UpdateResultRequest {
        UpdateResultRequest {
            completion_status: None,
            finish_time: None,
            order_over_line: None,
            time_penalty: None,
            used_spinnaker: None,
            notes: None,
        }
    }

    #[test]
    fn test_merge_keeps_omitted_fields() {
        let existing = stored_result();
        let pending = PendingResult::merged(&existing, &no_changes());

        assert_eq!(pending.completion_status, CompletionStatus::Completed);
        assert_eq!(pending.finish_time, Some(hms(11, 0, 0)));
        assert_eq!(pending.order_over_line, Some(3));
        assert_eq!(pending.notes.as_deref(), Some("clean start"));
    }

    #[test]
    fn test_merge_applies_changes() {
        let existing = stored_result();
        let req = UpdateResultRequest {
            used_spinnaker: Some(true),
            time_penalty: Some(Some(hms(0, 2, 0))),
            ..no_changes()
        };
        let pending = PendingResult::merged(&existing, &req);

        assert!(pending.used_spinnaker);
        assert_eq!(pending.time_penalty, Some(hms(0, 2, 0)));
        assert_eq!(pending.finish_time, existing.finish_time);
    }

    #[test]
    fn test_merge_clears_penalty_and_finish() {
        let existing = RaceResult {
            time_penalty: Some(hms(0, 2, 0)),
            ..stored_result()
        };
        let req: UpdateResultRequest = serde_json::from_str(
            r#"{"completion_status": "DNC", "finish_time": null, "time_penalty": null}"#,
        )
        .unwrap();
        let pending = PendingResult::merged(&existing, &req);

        assert_eq!(pending.completion_status, CompletionStatus::DidNotComplete);
        assert_eq!(pending.finish_time, None);
        assert_eq!(pending.time_penalty, None);
        assert_eq!(pending.order_over_line, Some(3));
        assert_eq!(posted_time_for(&yacht(), class_starts(), &pending), Ok(None));
    }

    #[test]
    fn test_cleared_penalty_restores_unpenalized_time() {
        let existing = RaceResult {
            time_penalty: Some(hms(0, 2, 0)),
            ..stored_result()
        };
        let req: UpdateResultRequest = serde_json::from_str(r#"{"time_penalty": null}"#).unwrap();
        let pending = PendingResult::merged(&existing, &req);

        assert_eq!(
            posted_time_for(&yacht(), class_starts(), &pending),
            Ok(Some(hms(0, 58, 12)))
        );
    }

    #[test]
    fn test_hook_recomputes_from_current_fields() {
        let existing = stored_result();
        let plain = PendingResult::merged(&existing, &no_changes());
        assert_eq!(
            posted_time_for(&yacht(), class_starts(), &plain),
            Ok(Some(hms(0, 58, 12)))
        );

        let spinnaker = PendingResult::merged(
            &existing,
            &UpdateResultRequest {
                used_spinnaker: Some(true),
                ..no_changes()
            },
        );
        assert_eq!(
            posted_time_for(&yacht(), class_starts(), &spinnaker),
            Ok(Some(hms(0, 59, 48)))
        );
    }

    #[test]
    fn test_hook_clears_posted_time_when_not_completed() {
        let pending = PendingResult::merged(
            &stored_result(),
            &UpdateResultRequest {
                completion_status: Some(CompletionStatus::Disqualified),
                ..no_changes()
            },
        );
        assert_eq!(posted_time_for(&yacht(), class_starts(), &pending), Ok(None));
    }

    #[test]
    fn test_hook_clears_posted_time_for_inactive_yacht() {
        let inactive = YachtHandicap {
            is_active: false,
            phrf_rating: None,
            ..yacht()
        };
        let pending = PendingResult::merged(&stored_result(), &no_changes());
        assert_eq!(posted_time_for(&inactive, class_starts(), &pending), Ok(None));
    }

    #[test]
    fn test_hook_rejects_missing_start() {
        let pending = PendingResult::merged(&stored_result(), &no_changes());
        let result = posted_time_for(&yacht(), ClassStartTimes::default(), &pending);
        assert!(matches!(result, Err(CorrectionError::InvalidInput(_))));
    }

    async fn seed_race(db: &Database) -> (Yacht, Event) {
        let suffix = Uuid::new_v4().simple().to_string();
        let series: CreateSeriesRequest =
            serde_json::from_value(serde_json::json!({ "name": format!("Series {suffix}"), "year": 2022 }))
                .unwrap();
        let series = SeriesRepository::new(db.pool())
            .create(&series)
            .await
            .unwrap();
        let event: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "series_id": series.series_id,
            "event_date": "2022-07-06",
            "start_a": "10:00:00",
        }))
        .unwrap();
        let event = EventRepository::new(db.pool())
            .create(&event)
            .await
            .unwrap();
        let yacht: CreateYachtRequest = serde_json::from_value(serde_json::json!({
            "name": format!("Yacht {suffix}"),
            "yacht_class": "A1",
            "phrf_rating": "150",
        }))
        .unwrap();
        let yacht = YachtRepository::new(db.pool())
            .create(&yacht)
            .await
            .unwrap();

        (yacht, event)
    }

    fn finished(yacht: &Yacht, event: &Event) -> CreateResultRequest {
        CreateResultRequest {
            event_id: event.event_id,
            yacht_id: yacht.yacht_id,
            completion_status: CompletionStatus::Completed,
            finish_time: Some(hms(11, 0, 0)),
            order_over_line: Some(1),
            time_penalty: None,
            used_spinnaker: false,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_posts_corrected_time() {
        let Some(db) = crate::test_database().await else {
            return;
        };
        let (yacht, event) = seed_race(&db).await;

        let result = ResultRepository::new(db.pool())
            .create(&finished(&yacht, &event))
            .await
            .unwrap();
        assert_eq!(result.posted_time, Some(hms(0, 58, 12)));
    }

    #[tokio::test]
    async fn test_soft_deleted_yacht_takes_no_results() {
        let Some(db) = crate::test_database().await else {
            return;
        };
        let (yacht, event) = seed_race(&db).await;
        YachtRepository::new(db.pool())
            .soft_delete(yacht.yacht_id)
            .await
            .unwrap();

        let err = ResultRepository::new(db.pool())
            .create(&finished(&yacht, &event))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_soft_deleted_event_takes_no_results() {
        let Some(db) = crate::test_database().await else {
            return;
        };
        let (yacht, event) = seed_race(&db).await;
        EventRepository::new(db.pool())
            .soft_delete(event.event_id)
            .await
            .unwrap();

        let err = ResultRepository::new(db.pool())
            .create(&finished(&yacht, &event))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }
}
