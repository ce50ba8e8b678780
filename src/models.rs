/// Data models for the appointment scheduling system.
///
/// This module defines the core data structures used throughout the system:
/// - AppointmentStatus: Lifecycle states of an appointment
/// - Appointment: A booked visit between a patient and a doctor
/// - AppointmentRequest: Everything needed to book a new appointment
/// - AppointmentUpdate: Field changes applied by the scheduler

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Date format used for appointment and creation dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date as a `YYYY-MM-DD` string.
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Lifecycle states of an appointment.
///
/// Scheduled and Confirmed appointments hold their slot. Cancelled and
/// NoShow free it. Rescheduled is neither active nor cancelled, so it
/// does not hold a slot either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 6] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::Rescheduled,
    ];

    /// Map free text to a status.
    ///
    /// Matches the display name (`"No Show"`) or the status code
    /// (`"NO_SHOW"`), ignoring case. Anything else maps to `Scheduled`.
    pub fn from_string(value: &str) -> Self {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| {
                status.name().eq_ignore_ascii_case(value)
                    || status.code().eq_ignore_ascii_case(value)
            })
            .unwrap_or(AppointmentStatus::Scheduled)
    }

    /// Upper-case status code, e.g. `NO_SHOW`.
    pub fn code(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
            AppointmentStatus::Rescheduled => "RESCHEDULED",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
            AppointmentStatus::Rescheduled => "Rescheduled",
        }
    }

    /// Whether an appointment in this status occupies its slot.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AppointmentStatus::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::NoShow)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Represents a booked appointment.
///
/// Patient and doctor names are copied in at creation and are not
/// refreshed when the directories change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    appointment_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub department: String,
    pub date: String,
    pub time: String,
    pub appointment_type: String,
    pub notes: String,
    pub status: AppointmentStatus,
    created_date: String,
}

impl Appointment {
    /// Create a new appointment in the `Scheduled` state.
    ///
    /// No field is validated; dates and times are stored as given.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        appointment_id: impl Into<String>,
        patient_id: impl Into<String>,
        patient_name: impl Into<String>,
        doctor_id: impl Into<String>,
        doctor_name: impl Into<String>,
        department: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        appointment_type: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Appointment {
            appointment_id: appointment_id.into(),
            patient_id: patient_id.into(),
            patient_name: patient_name.into(),
            doctor_id: doctor_id.into(),
            doctor_name: doctor_name.into(),
            department: department.into(),
            date: date.into(),
            time: time.into(),
            appointment_type: appointment_type.into(),
            notes: notes.into(),
            status: AppointmentStatus::Scheduled,
            created_date: today(),
        }
    }

    /// Build an appointment from a request and a freshly generated id.
    pub fn from_request(appointment_id: String, request: AppointmentRequest) -> Self {
        Appointment::new(
            appointment_id,
            request.patient_id,
            request.patient_name,
            request.doctor_id,
            request.doctor_name,
            request.department,
            request.date,
            request.time,
            request.appointment_type,
            request.notes,
        )
    }

    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    pub fn created_date(&self) -> &str {
        &self.created_date
    }

    pub fn is_today(&self) -> bool {
        self.is_today_on(&today())
    }

    pub fn is_upcoming(&self) -> bool {
        self.is_upcoming_on(&today())
    }

    pub fn is_past(&self) -> bool {
        self.is_past_on(&today())
    }

    /// Exact string comparison against the reference date.
    pub fn is_today_on(&self, today: &str) -> bool {
        self.date == today
    }

    /// Whether the appointment date falls strictly after `today`.
    ///
    /// An unparsable date is never upcoming.
    pub fn is_upcoming_on(&self, today: &str) -> bool {
        match (parse_date(&self.date), parse_date(today)) {
            (Some(date), Some(today)) => date > today,
            _ => false,
        }
    }

    /// Whether the appointment date falls strictly before `today`.
    pub fn is_past_on(&self, today: &str) -> bool {
        match (parse_date(&self.date), parse_date(today)) {
            (Some(date), Some(today)) => date < today,
            _ => false,
        }
    }

    /// Expected length of the visit, looked up from the appointment type.
    pub fn duration_minutes(&self) -> u32 {
        match self.appointment_type.to_lowercase().as_str() {
            "consultation" => 30,
            "follow-up" => 15,
            "emergency" => 60,
            "routine" => 20,
            _ => 30,
        }
    }

    /// Whether this appointment holds the given doctor/date/time slot.
    pub fn occupies(&self, doctor_id: &str, date: &str, time: &str) -> bool {
        self.doctor_id == doctor_id
            && self.date == date
            && self.time == time
            && self.status.is_active()
    }

    pub(crate) fn apply(&mut self, update: AppointmentUpdate) {
        if let Some(patient_id) = update.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(patient_name) = update.patient_name {
            self.patient_name = patient_name;
        }
        if let Some(doctor_id) = update.doctor_id {
            self.doctor_id = doctor_id;
        }
        if let Some(doctor_name) = update.doctor_name {
            self.doctor_name = doctor_name;
        }
        if let Some(department) = update.department {
            self.department = department;
        }
        if let Some(appointment_type) = update.appointment_type {
            self.appointment_type = appointment_type;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appointment({}, {} with {}, {} {}, {})",
            self.appointment_id,
            self.patient_name,
            self.doctor_name,
            self.date,
            self.time,
            self.status
        )
    }
}

/// Everything needed to book an appointment, with names already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub department: String,
    pub date: String,
    pub time: String,
    pub appointment_type: String,
    pub notes: String,
}

/// Field changes for an existing appointment. `None` leaves a field as is.
///
/// Names are taken as given; callers changing a patient or doctor id
/// supply the matching name too. Id and creation date never change;
/// schedule and status have their own scheduler operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentUpdate {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_id: Option<String>,
    pub doctor_name: Option<String>,
    pub department: Option<String>,
    pub appointment_type: Option<String>,
    pub notes: Option<String>,
}
