/// Patient lookups used when booking.
///
/// Scheduling only needs a patient's identity and display name, so this
/// keeps the registry to that.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub status: String,
}

impl Patient {
    pub fn new(
        patient_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Patient {
            patient_id: patient_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: email.into(),
            status: "Active".to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientDirectory {
    patients: HashMap<String, Patient>,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patients referenced by the seeded appointments.
    pub fn with_sample_patients() -> Self {
        let mut directory = Self::new();
        directory.insert(Patient::new(
            "P001", "John", "Doe", "+1-555-0123", "john.doe@email.com",
        ));
        directory.insert(Patient::new(
            "P002", "Jane", "Smith", "+1-555-0124", "jane.smith@email.com",
        ));
        directory.insert(Patient::new(
            "P003", "Robert", "Johnson", "+1-555-0125", "robert.johnson@email.com",
        ));
        directory.insert(Patient::new(
            "P004", "Emily", "Davis", "+1-555-0126", "emily.davis@email.com",
        ));
        directory
    }

    pub fn insert(&mut self, patient: Patient) {
        self.patients.insert(patient.patient_id.clone(), patient);
    }

    pub fn lookup(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.get(patient_id)
    }

    /// Case-insensitive match on id or full name, sorted by id.
    pub fn search(&self, term: &str) -> Vec<&Patient> {
        let term = term.trim().to_lowercase();
        let mut matches: Vec<&Patient> = self
            .patients
            .values()
            .filter(|p| {
                p.patient_id.to_lowercase().contains(&term)
                    || p.full_name().to_lowercase().contains(&term)
            })
            .collect();
        matches.sort_by(|a, b| a.patient_id.cmp(&b.patient_id));
        matches
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_full_name() {
        let directory = PatientDirectory::with_sample_patients();
        let patient = directory.lookup("P003").unwrap();
        assert_eq!(patient.full_name(), "Robert Johnson");
        assert_eq!(patient.status, "Active");
        assert!(directory.lookup("P404").is_none());
    }

    #[test]
    fn search_matches_name_or_id_ignoring_case() {
        let directory = PatientDirectory::with_sample_patients();

        let by_name: Vec<&str> = directory
            .search("SMITH")
            .iter()
            .map(|p| p.patient_id.as_str())
            .collect();
        assert_eq!(by_name, ["P002"]);

        let by_id: Vec<&str> = directory
            .search("p00")
            .iter()
            .map(|p| p.patient_id.as_str())
            .collect();
        assert_eq!(by_id, ["P001", "P002", "P003", "P004"]);

        assert!(directory.search("nobody").is_empty());
    }
}
