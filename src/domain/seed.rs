use crate::domain::models::{AppState, Requirement, TrackingType, Verifier};

/// Dataset used when no state file exists, when it cannot be parsed, and on
/// `reset`.
pub fn seed_state() -> AppState {
    AppState {
        verifiers: vec![
            Verifier {
                id: "v1".to_string(),
                name: "Bureau Veritas".to_string(),
                email: "contact@bureauveritas.com".to_string(),
                phone: "01 42 91 52 91".to_string(),
                is_internal: false,
            },
            Verifier {
                id: "v2".to_string(),
                name: "Audit Interne".to_string(),
                email: "interne@entreprise.com".to_string(),
                phone: String::new(),
                is_internal: true,
            },
        ],
        requirements: vec![
            Requirement {
                id: "r1".to_string(),
                designation: "Vérification Extincteurs".to_string(),
                description: "Vérification réglementaire annuelle de tous les extincteurs."
                    .to_string(),
                tracking_type: TrackingType::Periodic,
                last_date: "2023-05-15".to_string(),
                periodicity_months: 12,
                verifier_id: "v1".to_string(),
            },
            Requirement {
                id: "r2".to_string(),
                designation: "Maintenance Ascenseurs".to_string(),
                description: "Contrôle de routine mensuel.".to_string(),
                tracking_type: TrackingType::Periodic,
                last_date: "2024-02-01".to_string(),
                periodicity_months: 1,
                verifier_id: "v2".to_string(),
            },
            Requirement {
                id: "r3".to_string(),
                designation: "Rondes de sécurité".to_string(),
                description: "Surveillance quotidienne des issues de secours.".to_string(),
                tracking_type: TrackingType::Continuous,
                last_date: "2024-01-01".to_string(),
                periodicity_months: 0,
                verifier_id: "v2".to_string(),
            },
        ],
    }
}
