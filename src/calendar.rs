/// Doctor roster for the appointment scheduling system.
///
/// Each doctor carries a fixed list of bookable times of day. The same
/// list repeats on every calendar date; whether a given slot is free on a
/// date is decided by the scheduler.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A doctor who can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doctor {
    pub doctor_id: String,
    pub name: String,
    pub department: String,
    pub slots: Vec<String>,
}

impl Doctor {
    pub fn new<S: Into<String>>(
        doctor_id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        slots: impl IntoIterator<Item = S>,
    ) -> Self {
        Doctor {
            doctor_id: doctor_id.into(),
            name: name.into(),
            department: department.into(),
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read-only lookup of doctors by id.
#[derive(Debug, Clone, Default)]
pub struct DoctorDirectory {
    doctors: HashMap<String, Doctor>,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hospital's default roster.
    pub fn with_sample_doctors() -> Self {
        let mut directory = Self::new();
        directory.insert(Doctor::new(
            "D001",
            "Dr. Smith",
            "Cardiology",
            ["09:00", "10:00", "11:00", "14:00", "15:00"],
        ));
        directory.insert(Doctor::new(
            "D002",
            "Dr. Johnson",
            "Neurology",
            ["10:00", "11:00", "13:00", "14:00", "16:00"],
        ));
        directory.insert(Doctor::new(
            "D003",
            "Dr. Brown",
            "Orthopedics",
            ["09:00", "10:30", "13:30", "15:00", "16:30"],
        ));
        directory.insert(Doctor::new(
            "D004",
            "Dr. Wilson",
            "Pediatrics",
            ["08:00", "09:30", "11:00", "13:00", "14:30"],
        ));
        directory
    }

    /// Add a doctor, replacing any existing entry with the same id.
    pub fn insert(&mut self, doctor: Doctor) {
        self.doctors.insert(doctor.doctor_id.clone(), doctor);
    }

    pub fn lookup(&self, doctor_id: &str) -> Option<&Doctor> {
        self.doctors.get(doctor_id)
    }

    /// Bookable times for a doctor, in roster order. Empty if unknown.
    pub fn slots_for(&self, doctor_id: &str) -> &[String] {
        self.lookup(doctor_id)
            .map(|doctor| doctor.slots.as_slice())
            .unwrap_or(&[])
    }

    /// All doctors sorted by id.
    pub fn all(&self) -> Vec<&Doctor> {
        let mut doctors: Vec<&Doctor> = self.doctors.values().collect();
        doctors.sort_by(|a, b| a.doctor_id.cmp(&b.doctor_id));
        doctors
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }
}

impl fmt::Display for DoctorDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DoctorDirectory(doctors={})", self.doctors.len())
    }
}
