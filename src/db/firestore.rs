// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile and preferences)
//! - Workout entries (daily trained/rested log)
//! - Diet entries (daily meals)
//! - Routines (weekly exercise plans)
//! - Survey responses (onboarding answers)

use chrono::NaiveDate;
use std::time::Duration;

use crate::db::collections;
use crate::error::AppError;
use crate::models::workout::cycled_entry;
use crate::models::{DietEntry, Routine, SurveyResponse, User, WorkoutEntry, WorkoutRecord};

/// Attempts for a read-modify-write transaction before giving up.
const MAX_TRANSACTION_ATTEMPTS: u32 = 3;

/// Inclusive calendar date range for log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Read a document by ID from `collection`.
    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        for<'de> T: serde::Deserialize<'de> + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a document.
    async fn set_doc<T>(&self, collection: &str, id: &str, object: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + Sync + Send,
        for<'de> T: serde::Deserialize<'de>,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.id, user).await
    }

    // ─── Survey Operations ───────────────────────────────────────

    pub async fn get_survey_response(
        &self,
        user_id: &str,
    ) -> Result<Option<SurveyResponse>, AppError> {
        self.get_doc(collections::SURVEY_RESPONSES, user_id).await
    }

    /// Store the survey answers, replacing any earlier submission.
    pub async fn set_survey_response(&self, response: &SurveyResponse) -> Result<(), AppError> {
        self.set_doc(collections::SURVEY_RESPONSES, &response.user_id, response)
            .await
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// List a user's workout records, newest first, optionally limited to a
    /// date range.
    ///
    /// Documents that cannot be decoded at all are skipped with a warning;
    /// field-level validation is left to the caller via
    /// `WorkoutEntry::try_from`.
    pub async fn list_workout_entries(
        &self,
        user_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<WorkoutRecord>, AppError> {
        let start = range.map(|r| r.start.to_string());
        let end = range.map(|r| r.end.to_string());

        let docs = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_ENTRIES)
            .filter(|q| {
                q.for_all([
                    q.field("userId").eq(user_id),
                    start
                        .as_ref()
                        .and_then(|s| q.field("date").greater_than_or_equal(s.as_str())),
                    end.as_ref()
                        .and_then(|e| q.field("date").less_than_or_equal(e.as_str())),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(decode_workout_docs(user_id, &docs))
    }

    /// List all of a user's `trained` records, newest first.
    pub async fn list_trained_entries(
        &self,
        user_id: &str,
    ) -> Result<Vec<WorkoutRecord>, AppError> {
        let docs = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_ENTRIES)
            .filter(|q| {
                q.for_all([
                    q.field("userId").eq(user_id),
                    q.field("type").eq("trained"),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(decode_workout_docs(user_id, &docs))
    }

    /// Get a workout entry by document ID.
    pub async fn get_workout_entry(&self, id: &str) -> Result<Option<WorkoutEntry>, AppError> {
        self.get_doc(collections::WORKOUT_ENTRIES, id).await
    }

    /// Create or replace a workout entry.
    pub async fn set_workout_entry(&self, entry: &WorkoutEntry) -> Result<(), AppError> {
        self.set_doc(collections::WORKOUT_ENTRIES, &entry.id, entry)
            .await
    }

    pub async fn delete_workout_entry(&self, id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::WORKOUT_ENTRIES, id).await
    }

    /// Write `entry`, keeping the creation time of any entry it replaces.
    pub async fn upsert_workout_entry(
        &self,
        entry: &WorkoutEntry,
    ) -> Result<WorkoutEntry, AppError> {
        let stored = self
            .modify_workout_entry(&entry.id, |existing| Some(entry.clone().replacing(existing)))
            .await?;

        stored.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Workout entry {} vanished on upsert", entry.id))
        })
    }

    /// Advance a day through absent → trained → rested → absent.
    ///
    /// Returns the day's entry afterwards, or `None` once it is cleared.
    pub async fn cycle_workout_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
        now: &str,
    ) -> Result<Option<WorkoutEntry>, AppError> {
        let id = WorkoutEntry::document_id(user_id, date);
        self.modify_workout_entry(&id, |existing| cycled_entry(existing, user_id, date, now))
            .await
    }

    /// Read a workout entry, derive its replacement and write it back
    /// atomically. `update` returning `None` deletes the document.
    ///
    /// The read is bound to the transaction, so a concurrent change to the
    /// same day aborts the commit; the whole step is then retried with
    /// fresh data.
    async fn modify_workout_entry<F>(
        &self,
        id: &str,
        update: F,
    ) -> Result<Option<WorkoutEntry>, AppError>
    where
        F: Fn(Option<&WorkoutEntry>) -> Option<WorkoutEntry>,
    {
        let client = self.get_client()?;
        let mut attempt = 1;

        loop {
            match Self::try_modify_workout_entry(client, id, &update).await {
                Ok(entry) => return Ok(entry),
                Err(e) if attempt < MAX_TRANSACTION_ATTEMPTS => {
                    tracing::warn!(id, attempt, error = %e, "Workout transaction failed, retrying");
                    tokio::time::sleep(Duration::from_millis(10 << attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_modify_workout_entry<F>(
        client: &firestore::FirestoreDb,
        id: &str,
        update: &F,
    ) -> Result<Option<WorkoutEntry>, AppError>
    where
        F: Fn(Option<&WorkoutEntry>) -> Option<WorkoutEntry>,
    {
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Reading through the transaction registers the document for
        // conflict detection.
        let in_transaction = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );
        let current: Option<WorkoutEntry> = in_transaction
            .fluent()
            .select()
            .by_id_in(collections::WORKOUT_ENTRIES)
            .obj()
            .one(id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read entry in transaction: {}", e))
            })?;

        let next = update(current.as_ref());

        match &next {
            Some(entry) => {
                client
                    .fluent()
                    .update()
                    .in_col(collections::WORKOUT_ENTRIES)
                    .document_id(id)
                    .object(entry)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add entry to transaction: {}", e))
                    })?;
            }
            None => {
                client
                    .fluent()
                    .delete()
                    .from(collections::WORKOUT_ENTRIES)
                    .document_id(id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add deletion to transaction: {}", e))
                    })?;
            }
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(next)
    }

    // ─── Diet Operations ─────────────────────────────────────────

    /// Get the diet entry for a user and day.
    pub async fn get_diet_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DietEntry>, AppError> {
        self.get_doc(
            collections::DIET_ENTRIES,
            &DietEntry::document_id(user_id, date),
        )
        .await
    }

    pub async fn set_diet_entry(&self, entry: &DietEntry) -> Result<(), AppError> {
        self.set_doc(collections::DIET_ENTRIES, &entry.id, entry).await
    }

    // ─── Routine Operations ──────────────────────────────────────

    /// List a user's routines, newest first.
    pub async fn list_routines(&self, user_id: &str) -> Result<Vec<Routine>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ROUTINES)
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_routine(&self, id: &str) -> Result<Option<Routine>, AppError> {
        self.get_doc(collections::ROUTINES, id).await
    }

    pub async fn set_routine(&self, routine: &Routine) -> Result<(), AppError> {
        self.set_doc(collections::ROUTINES, &routine.id, routine).await
    }

    pub async fn delete_routine(&self, id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::ROUTINES, id).await
    }
}

/// Decode raw workout documents, dropping any that do not deserialize.
fn decode_workout_docs(
    user_id: &str,
    docs: &[firestore::FirestoreDocument],
) -> Vec<WorkoutRecord> {
    let records: Vec<WorkoutRecord> = docs
        .iter()
        .filter_map(
            |doc| match firestore::FirestoreDb::deserialize_doc_to::<WorkoutRecord>(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        document = %doc.name,
                        error = %e,
                        "Skipping undecodable workout document"
                    );
                    None
                }
            },
        )
        .collect();

    tracing::debug!(
        user_id = %user_id,
        fetched = docs.len(),
        decoded = records.len(),
        "Loaded workout records"
    );

    records
}
