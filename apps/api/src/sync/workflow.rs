//! Profile Synchronization Workflow.
//!
//! ensure-user-exists → per-experience persist (best effort) → read back.
//! Per-item failures are collected, not raised: one malformed experience
//! must not discard the rest.

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::extraction::extractor::WorkExperience;
use crate::identity::Principal;
use crate::models::profile::{Position, UserProfile};
use crate::store::{ProfileStore, StoreError};
use crate::sync::duration::{duration_months, DateError};

/// One experience that failed to persist, and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    /// Index of the experience in the submitted sequence.
    pub index: usize,
    pub company: String,
    pub role: String,
    pub reason: String,
}

/// Outcome of one workflow run: the read-back profile plus any per-item
/// failures the caller may want to re-submit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub profile: UserProfile,
    pub failed_experiences: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_partial(&self) -> bool {
        !self.failed_experiences.is_empty()
    }
}

/// Builds the persisted position for an experience. Review flags start
/// unknown; a verifier sets them later.
pub fn position_from_experience(experience: &WorkExperience) -> Result<Position, DateError> {
    let duration = duration_months(&experience.start_date, experience.end_date.as_deref())?;
    Ok(Position {
        company: experience.company.clone(),
        role: experience.title.clone(),
        duration,
        verified: None,
        reviewed: None,
    })
}

/// Runs the synchronization workflow for one user.
///
/// Fails outright only if registration (beyond "already exists") or the
/// final read-back fails; everything in between is best effort per item.
pub async fn sync_profile(
    store: &dyn ProfileStore,
    principal: &Principal,
    name: &str,
    skill_level: &str,
    experiences: &[WorkExperience],
) -> Result<SyncReport, AppError> {
    match store.register_user(principal, name, skill_level).await {
        Ok(()) => debug!(%principal, "registered user"),
        Err(StoreError::AlreadyExists) => debug!(%principal, "user already registered"),
        Err(e) => return Err(e.into()),
    }

    let mut failed_experiences = Vec::new();
    for (index, experience) in experiences.iter().enumerate() {
        let result = match position_from_experience(experience) {
            Ok(position) => store
                .add_position(principal, &position)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        if let Err(reason) = result {
            warn!(%principal, index, company = %experience.company, "failed to persist position: {reason}");
            failed_experiences.push(SyncFailure {
                index,
                company: experience.company.clone(),
                role: experience.title.clone(),
                reason,
            });
        }
    }

    let profile = store.get_profile(principal).await?;

    Ok(SyncReport {
        profile,
        failed_experiences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::derive_identity;
    use crate::models::profile::ReviewField;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn experience(title: &str, company: &str, start: &str, end: Option<&str>) -> WorkExperience {
        WorkExperience {
            title: title.to_string(),
            company: company.to_string(),
            start_date: start.to_string(),
            end_date: end.map(String::from),
            description: None,
        }
    }

    /// In-memory store. `fail_companies` makes add_position fail for the
    /// named companies, simulating per-item store errors.
    struct FakeStore {
        registered: Mutex<Option<(String, String)>>,
        positions: Mutex<Vec<Position>>,
        fail_companies: Vec<String>,
        already_exists: bool,
        register_error: bool,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                registered: Mutex::new(None),
                positions: Mutex::new(Vec::new()),
                fail_companies: Vec::new(),
                already_exists: false,
                register_error: false,
            }
        }

        fn failing_for(companies: &[&str]) -> Self {
            Self {
                fail_companies: companies.iter().map(|c| c.to_string()).collect(),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ProfileStore for FakeStore {
        async fn register_user(
            &self,
            _principal: &Principal,
            name: &str,
            skill_level: &str,
        ) -> Result<(), StoreError> {
            if self.register_error {
                return Err(StoreError::Rejected {
                    status: 500,
                    message: "canister trapped".to_string(),
                });
            }
            if self.already_exists {
                return Err(StoreError::AlreadyExists);
            }
            *self.registered.lock().unwrap() = Some((name.to_string(), skill_level.to_string()));
            Ok(())
        }

        async fn add_position(
            &self,
            _principal: &Principal,
            position: &Position,
        ) -> Result<(), StoreError> {
            if self.fail_companies.contains(&position.company) {
                return Err(StoreError::Rejected {
                    status: 500,
                    message: "canister trapped".to_string(),
                });
            }
            self.positions.lock().unwrap().push(position.clone());
            Ok(())
        }

        async fn get_profile(&self, _principal: &Principal) -> Result<UserProfile, StoreError> {
            Ok(UserProfile {
                name: "Test User".to_string(),
                skill_level: "Professional".to_string(),
                positions: self.positions.lock().unwrap().clone(),
            })
        }

        async fn list_profiles(&self) -> Result<Vec<(String, UserProfile)>, StoreError> {
            Ok(vec![])
        }

        async fn verify_position(
            &self,
            _target: &Principal,
            _index: u64,
            _field: ReviewField,
            _value: bool,
        ) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn test_principal() -> Principal {
        derive_identity("li-test", "test@example.com").principal
    }

    #[tokio::test]
    async fn test_sync_persists_all_experiences_in_order() {
        let store = FakeStore::new();
        let experiences = vec![
            experience("Engineer", "Acme", "2019-01-01", Some("2020-01-01")),
            experience("Senior Engineer", "Globex", "2020", None),
        ];

        let report = sync_profile(
            &store,
            &test_principal(),
            "Test User",
            "Professional",
            &experiences,
        )
        .await
        .unwrap();

        assert!(!report.is_partial());
        assert_eq!(report.profile.positions.len(), 2);
        assert_eq!(report.profile.positions[0].company, "Acme");
        assert_eq!(report.profile.positions[0].role, "Engineer");
        assert_eq!(report.profile.positions[1].duration, 12);
        assert_eq!(report.profile.positions[0].verified, None);
        assert_eq!(report.profile.positions[0].reviewed, None);
    }

    #[tokio::test]
    async fn test_middle_failure_keeps_first_and_third() {
        let store = FakeStore::failing_for(&["Globex"]);
        let experiences = vec![
            experience("Engineer", "Acme", "2019-01-01", Some("2020-01-01")),
            experience("Engineer", "Globex", "2020-01-01", Some("2021-01-01")),
            experience("Engineer", "Initech", "2021-01-01", None),
        ];

        let report = sync_profile(
            &store,
            &test_principal(),
            "Test User",
            "Professional",
            &experiences,
        )
        .await
        .unwrap();

        let companies: Vec<&str> = report
            .profile
            .positions
            .iter()
            .map(|p| p.company.as_str())
            .collect();
        assert_eq!(companies, vec!["Acme", "Initech"]);

        assert!(report.is_partial());
        assert_eq!(report.failed_experiences.len(), 1);
        assert_eq!(report.failed_experiences[0].index, 1);
        assert_eq!(report.failed_experiences[0].company, "Globex");
    }

    #[tokio::test]
    async fn test_already_registered_is_swallowed() {
        let store = FakeStore {
            already_exists: true,
            ..FakeStore::new()
        };
        let experiences = vec![experience("Engineer", "Acme", "2020", None)];

        let report = sync_profile(
            &store,
            &test_principal(),
            "Test User",
            "Professional",
            &experiences,
        )
        .await
        .unwrap();
        assert_eq!(report.profile.positions.len(), 1);
    }

    #[tokio::test]
    async fn test_register_failure_aborts_workflow() {
        let store = FakeStore {
            register_error: true,
            ..FakeStore::new()
        };

        let err = sync_profile(&store, &test_principal(), "Test User", "Professional", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[tokio::test]
    async fn test_unparseable_date_is_a_per_item_failure() {
        let store = FakeStore::new();
        let experiences = vec![
            experience("Engineer", "Acme", "early 2020", Some("late 2020")),
            experience("Engineer", "Globex", "2020-01-01", Some("2021-01-01")),
        ];

        let report = sync_profile(
            &store,
            &test_principal(),
            "Test User",
            "Professional",
            &experiences,
        )
        .await
        .unwrap();

        assert_eq!(report.profile.positions.len(), 1);
        assert_eq!(report.failed_experiences.len(), 1);
        assert_eq!(report.failed_experiences[0].index, 0);
        assert!(report.failed_experiences[0].reason.contains("date"));
    }

    #[tokio::test]
    async fn test_empty_experience_list_still_reads_back_profile() {
        let store = FakeStore::new();

        let report = sync_profile(&store, &test_principal(), "Test User", "Professional", &[])
            .await
            .unwrap();
        assert!(report.profile.positions.is_empty());
        assert!(!report.is_partial());
    }

    #[test]
    fn test_position_from_experience_maps_title_to_role() {
        let exp = experience("Staff Engineer", "Acme", "2018-06-01", Some("2020-06-01"));
        let position = position_from_experience(&exp).unwrap();
        assert_eq!(position.role, "Staff Engineer");
        assert_eq!(position.company, "Acme");
        // 731 days: round(24.4) = 24
        assert_eq!(position.duration, 24);
        assert_eq!(position.verified, None);
        assert_eq!(position.reviewed, None);
    }
}
