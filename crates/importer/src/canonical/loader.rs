use std::collections::{BTreeSet, HashMap, HashSet};

use sqlx::{PgPool, Postgres, Transaction};
use storage::dto::club::CreateYachtClubRequest;
use storage::dto::event::CreateEventRequest;
use storage::dto::result::CreateResultRequest;
use storage::dto::series::CreateSeriesRequest;
use storage::dto::spinnaker::{CreateSpinnakerRequest, UpdateSpinnakerRequest};
use storage::dto::yacht::CreateYachtRequest;
use storage::error::StorageError;
use storage::models::{SpinnakerClass, Yacht};
use storage::repository::{
    club::YachtClubRepository, event::EventRepository, result::ResultRepository,
    series::SeriesRepository, spinnaker::SpinnakerRepository, yacht::YachtRepository,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::models::{CanonicalFixture, EventData, SeriesData, YachtData};
use crate::{ImporterError, Result};

type Tx = Transaction<'static, Postgres>;

/// Counts of what a load wrote versus what was already present.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub clubs_created: usize,
    pub spinnakers_created: usize,
    pub yachts_created: usize,
    pub series_created: usize,
    pub events_created: usize,
    pub results_created: usize,
    pub events_recomputed: usize,
    pub skipped: usize,
}

/// Writes a validated fixture through the storage repositories, in a
/// single transaction: a failing row leaves the database untouched.
///
/// Loading is idempotent: clubs, yachts and series are matched by name,
/// spinnakers by class, events by date within their series and results by
/// yacht within their event. Matched rows are left untouched, except
/// spinnaker adjustments which follow the file. Events holding results of
/// a re-adjusted spinnaker class are recomputed before commit.
pub struct CanonicalLoader<'a> {
    pool: &'a PgPool,
    clubs: HashMap<String, Uuid>,
    spinnakers: HashMap<SpinnakerClass, Uuid>,
    yachts: HashMap<String, Uuid>,
    readjusted: Vec<(SpinnakerClass, Uuid)>,
    summary: LoadSummary,
}

impl<'a> CanonicalLoader<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            clubs: HashMap::new(),
            spinnakers: HashMap::new(),
            yachts: HashMap::new(),
            readjusted: Vec::new(),
            summary: LoadSummary::default(),
        }
    }

    pub async fn load(self, fixture: &CanonicalFixture) -> Result<LoadSummary> {
        let mut tx = self.pool.begin().await?;

        let summary = self.write(fixture, &mut tx).await?;

        tx.commit().await?;
        Ok(summary)
    }

    /// Runs the whole load against the current database, stored yachts and
    /// spinnakers included, then rolls it back.
    pub async fn dry_run(self, fixture: &CanonicalFixture) -> Result<LoadSummary> {
        let mut tx = self.pool.begin().await?;

        let summary = self.write(fixture, &mut tx).await?;

        tx.rollback().await?;
        Ok(summary)
    }

    async fn write(mut self, fixture: &CanonicalFixture, tx: &mut Tx) -> Result<LoadSummary> {
        self.load_clubs(fixture, tx).await?;
        self.load_spinnakers(fixture, tx).await?;

        for yacht in &fixture.yachts {
            self.load_yacht(yacht, tx).await?;
        }

        for series in &fixture.series {
            self.load_series(series, tx).await?;
        }

        self.recompute_readjusted(tx).await?;

        Ok(self.summary)
    }

    async fn load_clubs(&mut self, fixture: &CanonicalFixture, tx: &mut Tx) -> Result<()> {
        for club in &fixture.clubs {
            let club_id = match found(YachtClubRepository::find_by_name_tx(&mut **tx, &club.name).await)? {
                Some(existing) => {
                    self.summary.skipped += 1;
                    existing.yacht_club_id
                }
                None => {
                    let created =
                        YachtClubRepository::create_tx(&mut **tx, &CreateYachtClubRequest::from(club)).await?;
                    info!("Created club '{}' ({})", created.name, created.slug);
                    self.summary.clubs_created += 1;
                    created.yacht_club_id
                }
            };
            self.clubs.insert(club.name.clone(), club_id);
        }

        Ok(())
    }

    async fn load_spinnakers(&mut self, fixture: &CanonicalFixture, tx: &mut Tx) -> Result<()> {
        for spinnaker in &fixture.spinnakers {
            let stored = found(SpinnakerRepository::find_by_class_tx(&mut **tx, spinnaker.class_name).await)?;
            let spinnaker_id = match stored {
                Some(existing) if existing.adjustment_value == spinnaker.adjustment_value => {
                    self.summary.skipped += 1;
                    existing.spinnaker_id
                }
                Some(existing) => {
                    let request = UpdateSpinnakerRequest {
                        adjustment_value: spinnaker.adjustment_value,
                    };
                    SpinnakerRepository::update_tx(&mut **tx, existing.spinnaker_id, &request).await?;
                    warn!(
                        "Spinnaker {} adjustment changed {} -> {}; its recorded events will be recomputed",
                        spinnaker.class_name, existing.adjustment_value, spinnaker.adjustment_value
                    );
                    self.readjusted.push((spinnaker.class_name, existing.spinnaker_id));
                    existing.spinnaker_id
                }
                None => {
                    let request = CreateSpinnakerRequest {
                        class_name: spinnaker.class_name,
                        adjustment_value: spinnaker.adjustment_value,
                    };
                    self.summary.spinnakers_created += 1;
                    SpinnakerRepository::create_tx(&mut **tx, &request).await?.spinnaker_id
                }
            };
            self.spinnakers.insert(spinnaker.class_name, spinnaker_id);
        }

        Ok(())
    }

    async fn load_yacht(&mut self, yacht: &YachtData, tx: &mut Tx) -> Result<()> {
        if let Some(existing) = found(YachtRepository::find_by_name_tx(&mut **tx, &yacht.name).await)? {
            let spinnaker_id = match yacht.spinnaker {
                Some(class_name) => self.lookup_spinnaker(class_name, tx).await?,
                None => None,
            };
            if handicap_differs(&existing, yacht, spinnaker_id) {
                warn!(
                    "Yacht '{}' already exists with a different handicap; its stored rating, class and spinnaker are used",
                    yacht.name
                );
            }

            self.summary.skipped += 1;
            self.yachts.insert(yacht.name.clone(), existing.yacht_id);
            return Ok(());
        }

        let yacht_club_id = match &yacht.club {
            Some(name) => Some(self.club_id(name, tx).await?),
            None => None,
        };
        let spinnaker_id = match yacht.spinnaker {
            Some(class_name) => Some(self.spinnaker_id(class_name, tx).await?),
            None => None,
        };

        let request = CreateYachtRequest {
            name: yacht.name.clone(),
            slug: yacht.slug.clone(),
            skipper_id: None,
            sail_number: yacht.sail_number.clone(),
            yacht_type: yacht.yacht_type.clone(),
            yacht_class: yacht.yacht_class,
            yacht_club_id,
            phrf_rating: yacht.phrf_rating,
            spinnaker_id,
        };
        let created = YachtRepository::create_tx(&mut **tx, &request).await?;
        info!(
            "Created yacht '{}' ({}, active: {})",
            created.name, created.slug, created.is_active
        );

        self.summary.yachts_created += 1;
        self.yachts.insert(yacht.name.clone(), created.yacht_id);

        Ok(())
    }

    async fn load_series(&mut self, series: &SeriesData, tx: &mut Tx) -> Result<()> {
        let series_id = match found(SeriesRepository::find_by_name_tx(&mut **tx, &series.name).await)? {
            Some(existing) => {
                self.summary.skipped += 1;
                existing.series_id
            }
            None => {
                let created = SeriesRepository::create_tx(&mut **tx, &CreateSeriesRequest::from(series)).await?;
                info!("Created series '{}'", created.name);
                self.summary.series_created += 1;
                created.series_id
            }
        };

        let existing_events: HashMap<_, _> = EventRepository::list_by_series_tx(&mut **tx, series_id)
            .await?
            .into_iter()
            .map(|event| (event.event_date, event.event_id))
            .collect();

        for event in &series.events {
            let event_id = match existing_events.get(&event.event_date) {
                Some(event_id) => {
                    self.summary.skipped += 1;
                    *event_id
                }
                None => self.create_event(series_id, event, tx).await?,
            };
            self.load_results(event_id, event, tx).await?;
        }

        Ok(())
    }

    async fn create_event(&mut self, series_id: Uuid, event: &EventData, tx: &mut Tx) -> Result<Uuid> {
        let request = CreateEventRequest {
            series_id,
            event_date: event.event_date,
            first_flag_a: event.first_flag_a,
            first_flag_b: event.first_flag_b,
            first_flag_c: event.first_flag_c,
            start_a: event.start_a,
            start_b: event.start_b,
            start_c: event.start_c,
            start_j: event.start_j,
            notes: event.notes.clone(),
        };
        let created = EventRepository::create_tx(&mut **tx, &request).await?;
        debug!("Created event {} on {}", created.event_id, created.event_date);

        self.summary.events_created += 1;
        Ok(created.event_id)
    }

    async fn load_results(&mut self, event_id: Uuid, event: &EventData, tx: &mut Tx) -> Result<()> {
        let recorded: HashSet<Uuid> = ResultRepository::list_by_event_tx(&mut **tx, event_id)
            .await?
            .into_iter()
            .map(|entry| entry.yacht_id)
            .collect();

        for result in &event.results {
            let yacht_id = self.yacht_id(&result.yacht, tx).await?;
            if recorded.contains(&yacht_id) {
                self.summary.skipped += 1;
                continue;
            }

            let request = CreateResultRequest {
                event_id,
                yacht_id,
                completion_status: result.completion_status,
                finish_time: result.finish_time,
                order_over_line: result.order_over_line,
                time_penalty: result.time_penalty,
                used_spinnaker: result.used_spinnaker,
                notes: result.notes.clone(),
            };
            let created = ResultRepository::create_tx(&mut **tx, &request)
                .await
                .map_err(|e| match e {
                    StorageError::Correction(correction) => ImporterError::ValidationError(format!(
                        "Event {}, yacht '{}': {}",
                        event.event_date, result.yacht, correction
                    )),
                    other => other.into(),
                })?;
            debug!(
                "Recorded '{}' on {}: posted {:?}",
                result.yacht, event.event_date, created.posted_time
            );

            self.summary.results_created += 1;
        }

        Ok(())
    }

    async fn recompute_readjusted(&mut self, tx: &mut Tx) -> Result<()> {
        let mut stale = BTreeSet::new();
        for (class_name, spinnaker_id) in &self.readjusted {
            let event_ids = ResultRepository::events_using_spinnaker_tx(&mut **tx, *spinnaker_id).await?;
            debug!("Spinnaker {} affects {} event(s)", class_name, event_ids.len());
            stale.extend(event_ids);
        }

        for event_id in stale {
            let count = ResultRepository::recompute_event_tx(&mut **tx, event_id)
                .await
                .map_err(|e| match e {
                    StorageError::Correction(correction) => ImporterError::ValidationError(format!(
                        "Recomputing event {}: {}",
                        event_id, correction
                    )),
                    other => other.into(),
                })?;
            info!("Recomputed {} result(s) for event {}", count, event_id);
            self.summary.events_recomputed += 1;
        }

        Ok(())
    }

    async fn club_id(&mut self, name: &str, tx: &mut Tx) -> Result<Uuid> {
        if let Some(id) = self.clubs.get(name) {
            return Ok(*id);
        }

        let club = found(YachtClubRepository::find_by_name_tx(&mut **tx, name).await)?
            .ok_or_else(|| ImporterError::ReferenceError(format!("club '{}'", name)))?;
        self.clubs.insert(name.to_string(), club.yacht_club_id);

        Ok(club.yacht_club_id)
    }

    async fn lookup_spinnaker(&mut self, class_name: SpinnakerClass, tx: &mut Tx) -> Result<Option<Uuid>> {
        if let Some(id) = self.spinnakers.get(&class_name) {
            return Ok(Some(*id));
        }

        let spinnaker = found(SpinnakerRepository::find_by_class_tx(&mut **tx, class_name).await)?;
        if let Some(spinnaker) = &spinnaker {
            self.spinnakers.insert(class_name, spinnaker.spinnaker_id);
        }

        Ok(spinnaker.map(|spinnaker| spinnaker.spinnaker_id))
    }

    async fn spinnaker_id(&mut self, class_name: SpinnakerClass, tx: &mut Tx) -> Result<Uuid> {
        self.lookup_spinnaker(class_name, tx)
            .await?
            .ok_or_else(|| ImporterError::ReferenceError(format!("spinnaker {}", class_name)))
    }

    async fn yacht_id(&mut self, name: &str, tx: &mut Tx) -> Result<Uuid> {
        if let Some(id) = self.yachts.get(name) {
            return Ok(*id);
        }

        let yacht = found(YachtRepository::find_by_name_tx(&mut **tx, name).await)?
            .ok_or_else(|| ImporterError::ReferenceError(format!("yacht '{}'", name)))?;
        self.yachts.insert(name.to_string(), yacht.yacht_id);

        Ok(yacht.yacht_id)
    }
}

/// Whether the file describes a stored yacht with another handicap. The
/// stored one wins, so the file's rating, class and spinnaker are ignored.
fn handicap_differs(existing: &Yacht, yacht: &YachtData, spinnaker_id: Option<Uuid>) -> bool {
    existing.phrf_rating != yacht.phrf_rating
        || existing.yacht_class != yacht.yacht_class
        || existing.spinnaker_id != spinnaker_id
}

/// `NotFound` becomes `None`; every other storage error propagates.
fn found<T>(lookup: storage::error::Result<T>) -> Result<Option<T>> {
    match lookup {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use storage::Database;
    use storage::models::YachtClass;

    use super::*;

    #[test]
    fn test_found_maps_not_found_to_none() {
        assert_eq!(found(Ok(7)).unwrap(), Some(7));
        assert_eq!(found::<i32>(Err(StorageError::NotFound)).unwrap(), None);
    }

    #[test]
    fn test_found_propagates_other_errors() {
        let err = found::<i32>(Err(StorageError::ConstraintViolation("taken".to_string())))
            .unwrap_err();
        assert!(matches!(
            err,
            ImporterError::StorageError(StorageError::ConstraintViolation(_))
        ));
    }

    fn stored_yacht(spinnaker_id: Option<Uuid>) -> Yacht {
        let timestamp = chrono::NaiveDate::from_ymd_opt(2022, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Yacht {
            yacht_id: Uuid::new_v4(),
            name: "Existing".to_string(),
            slug: "existing".to_string(),
            skipper_id: None,
            sail_number: None,
            yacht_type: None,
            yacht_class: Some(YachtClass::A),
            yacht_club_id: None,
            phrf_rating: Some(Decimal::from(150)),
            spinnaker_id,
            is_active: true,
            is_deleted: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    fn file_yacht(json: &str) -> YachtData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_handicap_matches_stored_yacht() {
        let yacht = file_yacht(r#"{ "name": "Existing", "yacht_class": "A", "phrf_rating": 150 }"#);
        assert!(!handicap_differs(&stored_yacht(None), &yacht, None));
    }

    #[test]
    fn test_handicap_differs_on_spinnaker_or_rating() {
        let spinnaker_id = Uuid::new_v4();
        let with_spinnaker = file_yacht(
            r#"{ "name": "Existing", "yacht_class": "A", "phrf_rating": 150, "spinnaker": "S1" }"#,
        );
        assert!(handicap_differs(&stored_yacht(None), &with_spinnaker, Some(spinnaker_id)));

        let rerated = file_yacht(r#"{ "name": "Existing", "yacht_class": "A", "phrf_rating": 162 }"#);
        assert!(handicap_differs(&stored_yacht(None), &rerated, None));
    }

    /// Postgres from `DATABASE_URL`; the database tests are skipped without it.
    async fn test_database() -> Option<Database> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let db = Database::with_max_connections(&url, 2).await.unwrap();
        db.run_migrations().await.unwrap();

        Some(db)
    }

    async fn count(db: &Database, table: &str, name: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE name = $1", table);
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(name)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    /// A fixture whose result only fails against the stored copy of its
    /// yacht: the file gives it a spinnaker, the database does not.
    fn fixture_for_stored_yacht(suffix: &str) -> CanonicalFixture {
        serde_json::from_value(serde_json::json!({
            "format_version": "1.0.0",
            "clubs": [ { "name": format!("Club {suffix}") } ],
            "yachts": [
                { "name": format!("Existing {suffix}"), "yacht_class": "A", "phrf_rating": 150, "spinnaker": "S1" }
            ],
            "series": [
                {
                    "name": format!("Series {suffix}"),
                    "events": [
                        {
                            "event_date": "2022-07-06",
                            "start_a": "10:00:00",
                            "results": [
                                { "yacht": format!("Existing {suffix}"), "finish_time": "11:00:00", "used_spinnaker": true }
                            ]
                        }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    async fn store_yacht(db: &Database, name: &str) {
        let request = CreateYachtRequest {
            name: name.to_string(),
            slug: None,
            skipper_id: None,
            sail_number: None,
            yacht_type: None,
            yacht_class: Some(YachtClass::A),
            yacht_club_id: None,
            phrf_rating: Some(Decimal::from(150)),
            spinnaker_id: None,
        };
        YachtRepository::new(db.pool()).create(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_result_rolls_back_whole_load() {
        let Some(db) = test_database().await else {
            return;
        };
        let suffix = Uuid::new_v4().simple().to_string();
        store_yacht(&db, &format!("Existing {suffix}")).await;

        let err = CanonicalLoader::new(db.pool())
            .load(&fixture_for_stored_yacht(&suffix))
            .await
            .unwrap_err();
        assert!(matches!(err, ImporterError::ValidationError(_)));

        assert_eq!(count(&db, "yacht_clubs", &format!("Club {suffix}")).await, 0);
        assert_eq!(count(&db, "series", &format!("Series {suffix}")).await, 0);
    }

    #[tokio::test]
    async fn test_dry_run_uses_stored_yacht() {
        let Some(db) = test_database().await else {
            return;
        };
        let suffix = Uuid::new_v4().simple().to_string();
        store_yacht(&db, &format!("Existing {suffix}")).await;

        let result = CanonicalLoader::new(db.pool())
            .dry_run(&fixture_for_stored_yacht(&suffix))
            .await;
        assert!(matches!(result, Err(ImporterError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let Some(db) = test_database().await else {
            return;
        };
        let suffix = Uuid::new_v4().simple().to_string();
        let fixture: CanonicalFixture = serde_json::from_value(serde_json::json!({
            "format_version": "1.0.0",
            "clubs": [ { "name": format!("Club {suffix}") } ],
            "series": [ { "name": format!("Series {suffix}"), "events": [ { "event_date": "2022-07-06" } ] } ]
        }))
        .unwrap();

        let summary = CanonicalLoader::new(db.pool()).dry_run(&fixture).await.unwrap();
        assert_eq!(summary.clubs_created, 1);
        assert_eq!(summary.events_created, 1);

        assert_eq!(count(&db, "yacht_clubs", &format!("Club {suffix}")).await, 0);
        assert_eq!(count(&db, "series", &format!("Series {suffix}")).await, 0);
    }

    fn spinnaker_fixture(suffix: &str, adjustment: i32) -> CanonicalFixture {
        serde_json::from_value(serde_json::json!({
            "format_version": "1.0.0",
            "spinnakers": [ { "class_name": "S5", "adjustment_value": adjustment } ],
            "yachts": [
                { "name": format!("Flyer {suffix}"), "yacht_class": "A", "phrf_rating": 150, "spinnaker": "S5" }
            ],
            "series": [
                {
                    "name": format!("Series {suffix}"),
                    "events": [
                        {
                            "event_date": "2022-07-06",
                            "start_a": "10:00:00",
                            "results": [
                                { "yacht": format!("Flyer {suffix}"), "finish_time": "11:00:00", "used_spinnaker": true }
                            ]
                        }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_spinnaker_readjustment_recomputes_recorded_events() {
        let Some(db) = test_database().await else {
            return;
        };
        let suffix = Uuid::new_v4().simple().to_string();

        CanonicalLoader::new(db.pool())
            .load(&spinnaker_fixture(&suffix, 6))
            .await
            .unwrap();
        let summary = CanonicalLoader::new(db.pool())
            .load(&spinnaker_fixture(&suffix, 12))
            .await
            .unwrap();
        assert_eq!(summary.results_created, 0);
        assert!(summary.events_recomputed >= 1);

        let mut conn = db.pool().acquire().await.unwrap();
        let yacht = YachtRepository::find_by_name_tx(&mut conn, &format!("Flyer {suffix}"))
            .await
            .unwrap();
        let results = ResultRepository::new(db.pool())
            .list_by_yacht(yacht.yacht_id)
            .await
            .unwrap();
        assert_eq!(
            results[0].posted_time,
            chrono::NaiveTime::from_hms_opt(0, 59, 16)
        );
    }
}
