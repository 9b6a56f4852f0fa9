//! Single owner of `AppState`.
//!
//! State changes go through [`Action`] and the total reducer [`apply`]; the
//! [`Store`] wraps it with the checks the manage screens perform before
//! dispatching, and notifies its [`StateSink`] after every transition.

use crate::domain::models::{AppState, Requirement, TrackingType, Verifier};
use crate::domain::seed::seed_state;
use crate::services::status::parse_date;
use crate::services::storage::{PersistError, StateSink};

#[derive(Debug, Clone)]
pub enum Action {
    AddVerifier(Verifier),
    UpdateVerifier(Verifier),
    DeleteVerifier(String),
    AddRequirement(Requirement),
    UpdateRequirement(Requirement),
    DeleteRequirement(String),
    ImportData(AppState),
    Reset,
}

/// The reducer. Never fails; unknown ids are no-ops and deleting a verifier
/// does not touch requirements.
pub fn apply(state: &mut AppState, action: Action) {
    match action {
        Action::AddVerifier(v) => state.verifiers.push(v),
        Action::UpdateVerifier(v) => {
            if let Some(existing) = state.verifiers.iter_mut().find(|x| x.id == v.id) {
                *existing = v;
            }
        }
        Action::DeleteVerifier(id) => state.verifiers.retain(|v| v.id != id),
        Action::AddRequirement(r) => state.requirements.push(r),
        Action::UpdateRequirement(r) => {
            if let Some(existing) = state.requirements.iter_mut().find(|x| x.id == r.id) {
                *existing = r;
            }
        }
        Action::DeleteRequirement(id) => state.requirements.retain(|r| r.id != id),
        Action::ImportData(next) => *state = next,
        Action::Reset => *state = seed_state(),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("verifier not found: {0}")]
    VerifierNotFound(String),
    #[error("requirement not found: {0}")]
    RequirementNotFound(String),
    #[error("verifier {id} is still referenced by {count} requirement(s); reassign or remove them first")]
    VerifierInUse { id: String, count: usize },
    #[error("continuous tracking requires an internal verifier ({0} is external)")]
    ContinuousRequiresInternal(String),
    #[error("verifier {id} backs {count} continuous requirement(s) and cannot become external")]
    ContinuousDependsOnInternal { id: String, count: usize },
    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("periodic tracking needs a periodicity of at least one month")]
    InvalidPeriodicity,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Default)]
pub struct VerifierDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_internal: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VerifierPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_internal: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RequirementDraft {
    pub designation: String,
    pub description: String,
    pub tracking_type: TrackingType,
    pub last_date: String,
    pub periodicity_months: u32,
    /// Verifier id or name.
    pub verifier: String,
}

#[derive(Debug, Clone, Default)]
pub struct RequirementPatch {
    pub designation: Option<String>,
    pub description: Option<String>,
    pub tracking_type: Option<TrackingType>,
    pub last_date: Option<String>,
    pub periodicity_months: Option<u32>,
    pub verifier: Option<String>,
}

/// Cadence used when a periodic requirement has none.
pub const DEFAULT_PERIODICITY_MONTHS: u32 = 12;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub struct Store {
    state: AppState,
    sink: Box<dyn StateSink>,
}

impl Store {
    pub fn new(state: AppState, sink: Box<dyn StateSink>) -> Self {
        Self { state, sink }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        tracing::debug!(?action, "dispatch");
        apply(&mut self.state, action);
        self.sink.persist(&self.state)?;
        Ok(())
    }

    /// Resolves a verifier by exact id, then by case-insensitive name.
    pub fn find_verifier(&self, key: &str) -> Option<&Verifier> {
        let key = key.trim();
        self.state.verifier(key).or_else(|| {
            let lower = key.to_lowercase();
            self.state
                .verifiers
                .iter()
                .find(|v| v.name.to_lowercase() == lower)
        })
    }

    pub fn add_verifier(&mut self, draft: VerifierDraft) -> Result<Verifier, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::EmptyField("name"));
        }
        let verifier = Verifier {
            id: new_id(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            is_internal: draft.is_internal,
        };
        self.dispatch(Action::AddVerifier(verifier.clone()))?;
        tracing::info!(id = %verifier.id, name = %verifier.name, "verifier added");
        Ok(verifier)
    }

    pub fn update_verifier(
        &mut self,
        id: &str,
        patch: VerifierPatch,
    ) -> Result<Verifier, StoreError> {
        let mut verifier = self
            .state
            .verifier(id)
            .cloned()
            .ok_or_else(|| StoreError::VerifierNotFound(id.to_string()))?;
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(StoreError::EmptyField("name"));
            }
            verifier.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            verifier.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            verifier.phone = phone.trim().to_string();
        }
        if let Some(internal) = patch.is_internal {
            if verifier.is_internal && !internal {
                let count = self
                    .state
                    .requirements_for(id)
                    .filter(|r| r.tracking_type == TrackingType::Continuous)
                    .count();
                if count > 0 {
                    return Err(StoreError::ContinuousDependsOnInternal {
                        id: id.to_string(),
                        count,
                    });
                }
            }
            verifier.is_internal = internal;
        }
        self.dispatch(Action::UpdateVerifier(verifier.clone()))?;
        tracing::info!(id = %verifier.id, "verifier updated");
        Ok(verifier)
    }

    /// Deletion is refused while any requirement still references the
    /// verifier, so the store never creates dangling references itself.
    pub fn delete_verifier(&mut self, id: &str) -> Result<Verifier, StoreError> {
        let verifier = self
            .state
            .verifier(id)
            .cloned()
            .ok_or_else(|| StoreError::VerifierNotFound(id.to_string()))?;
        let count = self.state.requirements_for(id).count();
        if count > 0 {
            return Err(StoreError::VerifierInUse {
                id: id.to_string(),
                count,
            });
        }
        self.dispatch(Action::DeleteVerifier(id.to_string()))?;
        tracing::info!(id, "verifier deleted");
        Ok(verifier)
    }

    pub fn add_requirement(&mut self, draft: RequirementDraft) -> Result<Requirement, StoreError> {
        let verifier = self
            .find_verifier(&draft.verifier)
            .cloned()
            .ok_or_else(|| StoreError::VerifierNotFound(draft.verifier.clone()))?;
        let requirement = Requirement {
            id: new_id(),
            designation: draft.designation.trim().to_string(),
            description: draft.description.trim().to_string(),
            tracking_type: draft.tracking_type,
            last_date: draft.last_date.trim().to_string(),
            periodicity_months: draft.periodicity_months,
            verifier_id: verifier.id.clone(),
        };
        let requirement = validate_requirement(requirement, Some(&verifier))?;
        self.dispatch(Action::AddRequirement(requirement.clone()))?;
        tracing::info!(
            id = %requirement.id,
            designation = %requirement.designation,
            "requirement added"
        );
        Ok(requirement)
    }

    pub fn update_requirement(
        &mut self,
        id: &str,
        patch: RequirementPatch,
    ) -> Result<Requirement, StoreError> {
        let mut requirement = self
            .state
            .requirement(id)
            .cloned()
            .ok_or_else(|| StoreError::RequirementNotFound(id.to_string()))?;
        if let Some(v) = patch.designation {
            requirement.designation = v.trim().to_string();
        }
        if let Some(v) = patch.description {
            requirement.description = v.trim().to_string();
        }
        // verifier rules apply only when the edit touches the verifier or the mode
        let recheck_verifier = patch.verifier.is_some() || patch.tracking_type.is_some();
        if let Some(v) = patch.tracking_type {
            requirement.tracking_type = v;
            // switching back to periodic without a cadence keeps the form default
            if v == TrackingType::Periodic
                && patch.periodicity_months.is_none()
                && requirement.periodicity_months == 0
            {
                requirement.periodicity_months = DEFAULT_PERIODICITY_MONTHS;
            }
        }
        if let Some(v) = patch.last_date {
            requirement.last_date = v.trim().to_string();
        }
        if let Some(v) = patch.periodicity_months {
            requirement.periodicity_months = v;
        }
        let requirement = if recheck_verifier {
            let key = patch
                .verifier
                .unwrap_or_else(|| requirement.verifier_id.clone());
            let verifier = self
                .find_verifier(&key)
                .cloned()
                .ok_or(StoreError::VerifierNotFound(key))?;
            requirement.verifier_id = verifier.id.clone();
            validate_requirement(requirement, Some(&verifier))?
        } else {
            validate_requirement(requirement, None)?
        };
        self.dispatch(Action::UpdateRequirement(requirement.clone()))?;
        tracing::info!(id = %requirement.id, "requirement updated");
        Ok(requirement)
    }

    pub fn delete_requirement(&mut self, id: &str) -> Result<Requirement, StoreError> {
        let requirement = self
            .state
            .requirement(id)
            .cloned()
            .ok_or_else(|| StoreError::RequirementNotFound(id.to_string()))?;
        self.dispatch(Action::DeleteRequirement(id.to_string()))?;
        tracing::info!(id, "requirement deleted");
        Ok(requirement)
    }

    pub fn import(&mut self, next: AppState) -> Result<(), StoreError> {
        self.dispatch(Action::ImportData(next))
    }

    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.dispatch(Action::Reset)?;
        tracing::info!("state reset to seed data");
        Ok(())
    }
}

/// Cross-field rules of the requirement form. The internal-verifier rule is
/// skipped when `verifier` is `None`.
fn validate_requirement(
    mut requirement: Requirement,
    verifier: Option<&Verifier>,
) -> Result<Requirement, StoreError> {
    if requirement.designation.is_empty() {
        return Err(StoreError::EmptyField("designation"));
    }
    if parse_date(&requirement.last_date).is_none() {
        return Err(StoreError::InvalidDate(requirement.last_date));
    }
    match requirement.tracking_type {
        TrackingType::Continuous => {
            if let Some(verifier) = verifier.filter(|v| !v.is_internal) {
                return Err(StoreError::ContinuousRequiresInternal(verifier.id.clone()));
            }
            requirement.periodicity_months = 0;
        }
        TrackingType::Periodic => {
            if requirement.periodicity_months == 0 {
                return Err(StoreError::InvalidPeriodicity);
            }
        }
    }
    Ok(requirement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingSink {
        saved: Rc<RefCell<Vec<AppState>>>,
    }

    impl StateSink for RecordingSink {
        fn persist(&mut self, state: &AppState) -> Result<(), PersistError> {
            self.saved.borrow_mut().push(state.clone());
            Ok(())
        }
    }

    fn seeded() -> (Store, RecordingSink) {
        let sink = RecordingSink::default();
        (Store::new(seed_state(), Box::new(sink.clone())), sink)
    }

    fn periodic(designation: &str, verifier: &str) -> RequirementDraft {
        RequirementDraft {
            designation: designation.to_string(),
            description: String::new(),
            tracking_type: TrackingType::Periodic,
            last_date: "2024-01-10".to_string(),
            periodicity_months: 6,
            verifier: verifier.to_string(),
        }
    }

    #[test]
    fn reducer_update_and_delete_ignore_unknown_ids() {
        let mut state = seed_state();
        let ghost = Verifier {
            id: "ghost".to_string(),
            name: "Ghost".to_string(),
            email: String::new(),
            phone: String::new(),
            is_internal: false,
        };
        apply(&mut state, Action::UpdateVerifier(ghost));
        apply(&mut state, Action::DeleteRequirement("ghost".to_string()));
        assert_eq!(state, seed_state());
    }

    #[test]
    fn reducer_verifier_delete_does_not_cascade() {
        let mut state = seed_state();
        apply(&mut state, Action::DeleteVerifier("v2".to_string()));
        assert_eq!(state.verifiers.len(), 1);
        assert_eq!(state.requirements.len(), 3);
        assert!(state.requirements.iter().any(|r| r.verifier_id == "v2"));
    }

    #[test]
    fn reducer_import_replaces_and_reset_restores_seed() {
        let mut state = seed_state();
        apply(&mut state, Action::ImportData(AppState::default()));
        assert!(state.verifiers.is_empty() && state.requirements.is_empty());
        apply(&mut state, Action::Reset);
        assert_eq!(state, seed_state());
    }

    #[test]
    fn every_transition_is_persisted() {
        let (mut store, sink) = seeded();
        let v = store
            .add_verifier(VerifierDraft {
                name: "Apave".to_string(),
                email: "contact@apave.com".to_string(),
                ..VerifierDraft::default()
            })
            .expect("add verifier");
        store.add_requirement(periodic("Électricité", &v.id)).expect("add requirement");
        store.reset().expect("reset");

        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[1].requirements.len(), 4);
        assert_eq!(saved[2], seed_state());
    }

    #[test]
    fn requirement_accepts_verifier_name() {
        let (mut store, _) = seeded();
        let r = store
            .add_requirement(periodic("Électricité", "bureau veritas"))
            .expect("add requirement");
        assert_eq!(r.verifier_id, "v1");
        assert_eq!(store.state().requirements.last(), Some(&r));
    }

    #[test]
    fn continuous_requires_internal_verifier() {
        let (mut store, sink) = seeded();
        let mut draft = periodic("Rondes", "v1");
        draft.tracking_type = TrackingType::Continuous;
        let err = store.add_requirement(draft.clone()).unwrap_err();
        assert!(matches!(err, StoreError::ContinuousRequiresInternal(ref id) if id == "v1"));
        assert!(sink.saved.borrow().is_empty());

        draft.verifier = "v2".to_string();
        let r = store.add_requirement(draft).expect("internal verifier accepted");
        assert_eq!(r.periodicity_months, 0);
    }

    #[test]
    fn periodic_requires_cadence_and_valid_date() {
        let (mut store, _) = seeded();
        let mut draft = periodic("Gaz", "v1");
        draft.periodicity_months = 0;
        assert!(matches!(
            store.add_requirement(draft).unwrap_err(),
            StoreError::InvalidPeriodicity
        ));
        let mut draft = periodic("Gaz", "v1");
        draft.last_date = "2024-13-01".to_string();
        assert!(matches!(
            store.add_requirement(draft).unwrap_err(),
            StoreError::InvalidDate(_)
        ));
    }

    #[test]
    fn deleting_referenced_verifier_is_blocked() {
        let (mut store, _) = seeded();
        let err = store.delete_verifier("v1").unwrap_err();
        assert!(matches!(err, StoreError::VerifierInUse { count: 1, .. }));
        assert_eq!(store.state(), &seed_state());

        store.delete_requirement("r1").expect("delete requirement");
        store.delete_verifier("v1").expect("now unreferenced");
        assert!(store.state().verifier("v1").is_none());
        assert_eq!(store.state().requirements.len(), 2);
    }

    #[test]
    fn demoting_verifier_with_continuous_work_is_blocked() {
        let (mut store, _) = seeded();
        let err = store
            .update_verifier(
                "v2",
                VerifierPatch {
                    is_internal: Some(false),
                    ..VerifierPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::ContinuousDependsOnInternal { count: 1, .. }));

        let v = store
            .update_verifier(
                "v1",
                VerifierPatch {
                    phone: Some("0600000000".to_string()),
                    is_internal: Some(true),
                    ..VerifierPatch::default()
                },
            )
            .expect("promote");
        assert!(v.is_internal);
        assert_eq!(v.phone, "0600000000");
    }

    #[test]
    fn update_requirement_switches_mode() {
        let (mut store, _) = seeded();
        let r = store
            .update_requirement(
                "r3",
                RequirementPatch {
                    tracking_type: Some(TrackingType::Periodic),
                    ..RequirementPatch::default()
                },
            )
            .expect("switch to periodic");
        assert_eq!(r.periodicity_months, 12);

        let err = store
            .update_requirement(
                "r1",
                RequirementPatch {
                    tracking_type: Some(TrackingType::Continuous),
                    ..RequirementPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::ContinuousRequiresInternal(_)));
    }

    #[test]
    fn imported_rows_stay_editable() {
        let mut state = seed_state();
        state.requirements.push(Requirement {
            id: "imp1".to_string(),
            designation: "Sans vérificateur".to_string(),
            description: String::new(),
            tracking_type: TrackingType::Periodic,
            last_date: "2024-01-01".to_string(),
            periodicity_months: 12,
            verifier_id: String::new(),
        });
        state.requirements.push(Requirement {
            id: "imp2".to_string(),
            designation: "Surveillance externe".to_string(),
            description: String::new(),
            tracking_type: TrackingType::Continuous,
            last_date: "2024-01-01".to_string(),
            periodicity_months: 0,
            verifier_id: "v1".to_string(),
        });
        let mut store = Store::new(state, Box::new(RecordingSink::default()));

        for id in ["imp1", "imp2"] {
            let r = store
                .update_requirement(
                    id,
                    RequirementPatch {
                        description: Some("x".to_string()),
                        ..RequirementPatch::default()
                    },
                )
                .expect("description-only edit");
            assert_eq!(r.description, "x");
        }
        assert_eq!(store.state().requirement("imp1").expect("imp1").verifier_id, "");

        let err = store
            .update_requirement(
                "imp2",
                RequirementPatch {
                    tracking_type: Some(TrackingType::Continuous),
                    ..RequirementPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::ContinuousRequiresInternal(_)));

        let r = store
            .update_requirement(
                "imp1",
                RequirementPatch {
                    verifier: Some("v1".to_string()),
                    ..RequirementPatch::default()
                },
            )
            .expect("assign verifier");
        assert_eq!(r.verifier_id, "v1");
    }

    #[test]
    fn unknown_ids_are_reported() {
        let (mut store, _) = seeded();
        assert!(matches!(
            store.delete_requirement("nope").unwrap_err(),
            StoreError::RequirementNotFound(_)
        ));
        assert!(matches!(
            store.update_verifier("nope", VerifierPatch::default()).unwrap_err(),
            StoreError::VerifierNotFound(_)
        ));
    }
}
