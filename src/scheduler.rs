/// Appointment booking, availability and reporting.
///
/// This module provides the AppointmentScheduler struct which owns every
/// appointment record together with the doctor roster. A slot (doctor,
/// date, time) can hold at most one active appointment; `book` is the
/// only entry point that enforces this.

use crate::calendar::DoctorDirectory;
use crate::error::SchedulingError;
use crate::models::{
    today, Appointment, AppointmentRequest, AppointmentStatus, AppointmentUpdate, DATE_FORMAT,
};
use chrono::{Duration, Local};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

pub const TODAYS_APPOINTMENTS: &str = "Today's Appointments";
pub const UPCOMING_APPOINTMENTS: &str = "Upcoming Appointments";

/// Owner of all appointment records.
///
/// Every mutating operation takes `&mut self`, so a caller sharing the
/// scheduler across threads must put it behind a lock; `book` then runs
/// its availability check and insert inside that one critical section.
#[derive(Debug, Clone)]
pub struct AppointmentScheduler {
    appointments: HashMap<String, Appointment>,
    doctors: DoctorDirectory,
    next_id: u32,
}

impl AppointmentScheduler {
    /// Create an empty scheduler. The first generated id is `A001`.
    pub fn new(doctors: DoctorDirectory) -> Self {
        AppointmentScheduler {
            appointments: HashMap::new(),
            doctors,
            next_id: 1,
        }
    }

    /// Create a scheduler preloaded with the four sample appointments.
    ///
    /// Three fall on today and one on tomorrow. Generated ids continue
    /// from `A005`.
    pub fn with_sample_data(doctors: DoctorDirectory) -> Self {
        let mut scheduler = Self::new(doctors);
        let today = today();
        let tomorrow = (Local::now() + Duration::days(1))
            .format(DATE_FORMAT)
            .to_string();

        scheduler.add(Appointment::new(
            "A001", "P001", "John Doe", "D001", "Dr. Smith", "Cardiology", &today, "09:00",
            "Consultation", "Regular checkup",
        ));
        scheduler.add(Appointment::new(
            "A002", "P002", "Jane Smith", "D002", "Dr. Johnson", "Neurology", &today, "10:30",
            "Follow-up", "Follow-up for headaches",
        ));
        scheduler.add(Appointment::new(
            "A003", "P003", "Robert Johnson", "D003", "Dr. Brown", "Orthopedics", &today, "14:00",
            "Consultation", "Knee pain evaluation",
        ));
        scheduler.add(Appointment::new(
            "A004", "P004", "Emily Davis", "D004", "Dr. Wilson", "Pediatrics", &tomorrow, "11:00",
            "Routine", "Annual checkup",
        ));

        scheduler.next_id = scheduler.next_id.max(5);
        scheduler
    }

    pub fn doctors(&self) -> &DoctorDirectory {
        &self.doctors
    }

    /// Insert an appointment as is, replacing any record with the same id.
    ///
    /// No availability check is made; use `book` for new bookings.
    pub fn add(&mut self, appointment: Appointment) {
        info!(
            "Appointment added: {} for {}",
            appointment.appointment_id(),
            appointment.patient_name
        );
        self.appointments
            .insert(appointment.appointment_id().to_string(), appointment);
    }

    /// Book a slot if no active appointment holds it.
    ///
    /// On success the new appointment gets the next generated id and the
    /// `Scheduled` status. A rejected booking does not consume an id.
    pub fn book(&mut self, request: AppointmentRequest) -> Result<Appointment, SchedulingError> {
        if !self.is_slot_available(&request.doctor_id, &request.date, &request.time) {
            warn!(
                "Booking rejected for {}: {} on {} at {} is taken",
                request.patient_id, request.doctor_id, request.date, request.time
            );
            return Err(SchedulingError::SlotNotAvailable {
                doctor_id: request.doctor_id,
                date: request.date,
                time: request.time,
            });
        }

        let appointment = Appointment::from_request(self.generate_appointment_id(), request);
        self.add(appointment.clone());
        Ok(appointment)
    }

    pub fn get(&self, appointment_id: &str) -> Option<&Appointment> {
        self.appointments.get(appointment_id)
    }

    /// Every appointment, sorted by id.
    pub fn all_appointments(&self) -> Vec<Appointment> {
        let mut appointments: Vec<Appointment> = self.appointments.values().cloned().collect();
        appointments.sort_by(|a, b| a.appointment_id().cmp(b.appointment_id()));
        appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Set the status of an appointment. Any status may follow any other.
    pub fn update_status(&mut self, appointment_id: &str, status: AppointmentStatus) -> bool {
        match self.appointments.get_mut(appointment_id) {
            Some(appointment) => {
                appointment.status = status;
                info!("Appointment {} status updated to {}", appointment_id, status);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, appointment_id: &str) -> bool {
        self.update_status(appointment_id, AppointmentStatus::Cancelled)
    }

    /// Move an appointment to a new date and time and mark it `Rescheduled`.
    ///
    /// The destination slot is not checked, so this can double-book.
    /// See `reschedule_checked`.
    pub fn reschedule(&mut self, appointment_id: &str, new_date: &str, new_time: &str) -> bool {
        match self.appointments.get_mut(appointment_id) {
            Some(appointment) => {
                appointment.date = new_date.to_string();
                appointment.time = new_time.to_string();
                appointment.status = AppointmentStatus::Rescheduled;
                info!(
                    "Appointment {} rescheduled to {} {}",
                    appointment_id, new_date, new_time
                );
                true
            }
            None => false,
        }
    }

    /// Like `reschedule`, but refuses a destination slot held by another
    /// active appointment.
    pub fn reschedule_checked(
        &mut self,
        appointment_id: &str,
        new_date: &str,
        new_time: &str,
    ) -> Result<(), SchedulingError> {
        let doctor_id = match self.appointments.get(appointment_id) {
            Some(appointment) => appointment.doctor_id.clone(),
            None => return Err(SchedulingError::NotFound(appointment_id.to_string())),
        };

        let taken = self.appointments.values().any(|other| {
            other.appointment_id() != appointment_id
                && other.occupies(&doctor_id, new_date, new_time)
        });
        if taken {
            warn!(
                "Reschedule of {} rejected: {} on {} at {} is taken",
                appointment_id, doctor_id, new_date, new_time
            );
            return Err(SchedulingError::SlotNotAvailable {
                doctor_id,
                date: new_date.to_string(),
                time: new_time.to_string(),
            });
        }

        self.reschedule(appointment_id, new_date, new_time);
        Ok(())
    }

    /// Change descriptive fields of an appointment in place.
    pub fn update_details(&mut self, appointment_id: &str, update: AppointmentUpdate) -> bool {
        match self.appointments.get_mut(appointment_id) {
            Some(appointment) => {
                appointment.apply(update);
                debug!("Appointment {} details updated", appointment_id);
                true
            }
            None => false,
        }
    }

    fn filter<P>(&self, predicate: P) -> Vec<Appointment>
    where
        P: Fn(&Appointment) -> bool,
    {
        self.appointments
            .values()
            .filter(|&appointment| predicate(appointment))
            .cloned()
            .collect()
    }

    pub fn by_patient(&self, patient_id: &str) -> Vec<Appointment> {
        self.filter(|a| a.patient_id == patient_id)
    }

    pub fn by_doctor(&self, doctor_id: &str) -> Vec<Appointment> {
        self.filter(|a| a.doctor_id == doctor_id)
    }

    pub fn by_date(&self, date: &str) -> Vec<Appointment> {
        self.filter(|a| a.date == date)
    }

    pub fn by_status(&self, status: AppointmentStatus) -> Vec<Appointment> {
        self.filter(|a| a.status == status)
    }

    pub fn todays_appointments(&self) -> Vec<Appointment> {
        self.by_date(&today())
    }

    pub fn todays_appointment_count(&self) -> usize {
        self.todays_appointments().len()
    }

    pub fn upcoming_appointments(&self) -> Vec<Appointment> {
        self.upcoming_appointments_on(&today())
    }

    /// Appointments dated after `today`, sorted by date only.
    ///
    /// Appointments sharing a date keep no particular order.
    pub fn upcoming_appointments_on(&self, today: &str) -> Vec<Appointment> {
        let mut upcoming = self.filter(|a| a.is_upcoming_on(today));
        upcoming.sort_by(|a, b| a.date.cmp(&b.date));
        upcoming
    }

    /// Whether no active appointment holds this doctor/date/time.
    pub fn is_slot_available(&self, doctor_id: &str, date: &str, time: &str) -> bool {
        let available = !self
            .appointments
            .values()
            .any(|appointment| appointment.occupies(doctor_id, date, time));
        debug!(
            "Slot {} {} {} available: {}",
            doctor_id, date, time, available
        );
        available
    }

    /// Free times for a doctor on a date, in roster order.
    pub fn available_slots(&self, doctor_id: &str, date: &str) -> Vec<String> {
        self.doctors
            .slots_for(doctor_id)
            .iter()
            .filter(|time| self.is_slot_available(doctor_id, date, time))
            .cloned()
            .collect()
    }

    /// Next id in the `A001`, `A002`, ... sequence.
    pub fn generate_appointment_id(&mut self) -> String {
        let id = format!("A{:03}", self.next_id);
        self.next_id += 1;
        id
    }

    pub fn statistics(&self) -> BTreeMap<String, usize> {
        self.statistics_on(&today())
    }

    /// Count of appointments per status, plus today's and upcoming counts.
    ///
    /// The two date counts overlap with the status buckets.
    pub fn statistics_on(&self, today: &str) -> BTreeMap<String, usize> {
        let mut stats: BTreeMap<String, usize> = AppointmentStatus::ALL
            .iter()
            .map(|status| (status.name().to_string(), 0))
            .collect();

        for appointment in self.appointments.values() {
            *stats.entry(appointment.status.name().to_string()).or_insert(0) += 1;
        }

        stats.insert(TODAYS_APPOINTMENTS.to_string(), self.by_date(today).len());
        stats.insert(
            UPCOMING_APPOINTMENTS.to_string(),
            self.upcoming_appointments_on(today).len(),
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Doctor;
    use assert_matches::assert_matches;

    fn directory() -> DoctorDirectory {
        let mut doctors = DoctorDirectory::new();
        doctors.insert(Doctor::new("D001", "Dr. Smith", "Cardiology", ["09:00", "10:00"]));
        doctors
    }

    fn request(date: &str, time: &str) -> AppointmentRequest {
        AppointmentRequest {
            patient_id: "P001".to_string(),
            patient_name: "John Doe".to_string(),
            doctor_id: "D001".to_string(),
            doctor_name: "Dr. Smith".to_string(),
            department: "Cardiology".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            appointment_type: "Consultation".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn ids_are_zero_padded_and_sequential() {
        let mut scheduler = AppointmentScheduler::new(directory());
        assert_eq!(scheduler.generate_appointment_id(), "A001");
        assert_eq!(scheduler.generate_appointment_id(), "A002");
    }

    #[test]
    fn ids_wider_than_padding_are_not_truncated() {
        let mut scheduler = AppointmentScheduler::new(directory());
        scheduler.next_id = 1000;
        assert_eq!(scheduler.generate_appointment_id(), "A1000");
    }

    #[test]
    fn sample_data_continues_at_a005() {
        let mut scheduler =
            AppointmentScheduler::with_sample_data(DoctorDirectory::with_sample_doctors());
        assert_eq!(scheduler.len(), 4);
        assert_eq!(scheduler.todays_appointment_count(), 3);
        assert_eq!(scheduler.upcoming_appointments().len(), 1);
        assert_eq!(scheduler.generate_appointment_id(), "A005");
    }

    #[test]
    fn add_overwrites_without_checking_slot() {
        let mut scheduler = AppointmentScheduler::new(directory());
        scheduler.add(Appointment::new(
            "A001", "P001", "John Doe", "D001", "Dr. Smith", "Cardiology", "2030-01-01", "09:00",
            "Consultation", "",
        ));
        scheduler.add(Appointment::new(
            "A002", "P002", "Jane Smith", "D001", "Dr. Smith", "Cardiology", "2030-01-01",
            "09:00", "Consultation", "",
        ));
        assert_eq!(scheduler.len(), 2);

        scheduler.add(Appointment::new(
            "A001", "P003", "Robert Johnson", "D001", "Dr. Smith", "Cardiology", "2030-01-02",
            "10:00", "Routine", "",
        ));
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.get("A001").unwrap().patient_id, "P003");
    }

    #[test]
    fn rejected_booking_keeps_id_sequence() {
        let mut scheduler = AppointmentScheduler::new(directory());
        let first = scheduler.book(request("2030-01-01", "09:00")).unwrap();
        assert_eq!(first.appointment_id(), "A001");

        let err = scheduler.book(request("2030-01-01", "09:00")).unwrap_err();
        assert_matches!(err, SchedulingError::SlotNotAvailable { ref time, .. } if time == "09:00");

        let second = scheduler.book(request("2030-01-01", "10:00")).unwrap();
        assert_eq!(second.appointment_id(), "A002");
    }

    #[test]
    fn confirmed_appointment_still_blocks_slot() {
        let mut scheduler = AppointmentScheduler::new(directory());
        let booked = scheduler.book(request("2030-01-01", "09:00")).unwrap();
        assert!(scheduler.update_status(booked.appointment_id(), AppointmentStatus::Confirmed));
        assert!(!scheduler.is_slot_available("D001", "2030-01-01", "09:00"));

        assert!(scheduler.update_status(booked.appointment_id(), AppointmentStatus::Completed));
        assert!(scheduler.is_slot_available("D001", "2030-01-01", "09:00"));
    }

    #[test]
    fn no_show_frees_slot() {
        let mut scheduler = AppointmentScheduler::new(directory());
        let booked = scheduler.book(request("2030-01-01", "09:00")).unwrap();
        scheduler.update_status(booked.appointment_id(), AppointmentStatus::NoShow);
        assert_eq!(scheduler.available_slots("D001", "2030-01-01"), ["09:00", "10:00"]);
    }

    #[test]
    fn status_transitions_are_unrestricted() {
        let mut scheduler = AppointmentScheduler::new(directory());
        let booked = scheduler.book(request("2030-01-01", "09:00")).unwrap();
        let id = booked.appointment_id();

        assert!(scheduler.update_status(id, AppointmentStatus::Completed));
        assert!(scheduler.update_status(id, AppointmentStatus::Scheduled));
        assert_eq!(scheduler.get(id).unwrap().status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn operations_on_missing_id_report_failure() {
        let mut scheduler = AppointmentScheduler::new(directory());
        assert!(scheduler.get("A404").is_none());
        assert!(!scheduler.update_status("A404", AppointmentStatus::Confirmed));
        assert!(!scheduler.cancel("A404"));
        assert!(!scheduler.reschedule("A404", "2030-01-02", "10:00"));
        assert!(!scheduler.update_details("A404", AppointmentUpdate::default()));
        assert_matches!(
            scheduler.reschedule_checked("A404", "2030-01-02", "10:00"),
            Err(SchedulingError::NotFound(id)) if id == "A404"
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn reschedule_checked_allows_own_slot_and_free_slots() {
        let mut scheduler = AppointmentScheduler::new(directory());
        let booked = scheduler.book(request("2030-01-01", "09:00")).unwrap();
        let id = booked.appointment_id();

        assert_eq!(scheduler.reschedule_checked(id, "2030-01-01", "09:00"), Ok(()));
        assert_eq!(scheduler.reschedule_checked(id, "2030-01-03", "10:00"), Ok(()));

        let moved = scheduler.get(id).unwrap();
        assert_eq!(moved.date, "2030-01-03");
        assert_eq!(moved.status, AppointmentStatus::Rescheduled);
    }

    #[test]
    fn update_details_keeps_schedule_and_status() {
        let mut scheduler = AppointmentScheduler::new(directory());
        let booked = scheduler.book(request("2030-01-01", "09:00")).unwrap();
        let id = booked.appointment_id();

        assert!(scheduler.update_details(
            id,
            AppointmentUpdate {
                notes: Some("Fasting required".to_string()),
                ..Default::default()
            }
        ));

        let updated = scheduler.get(id).unwrap();
        assert_eq!(updated.notes, "Fasting required");
        assert_eq!(updated.time, "09:00");
        assert_eq!(updated.status, AppointmentStatus::Scheduled);
        assert_eq!(updated.created_date(), booked.created_date());
    }

    #[test]
    fn changing_doctor_moves_blocked_slot() {
        let mut doctors = directory();
        doctors.insert(Doctor::new("D002", "Dr. Johnson", "Neurology", ["09:00", "10:00"]));
        let mut scheduler = AppointmentScheduler::new(doctors);
        let booked = scheduler.book(request("2030-01-01", "09:00")).unwrap();
        assert!(!scheduler.is_slot_available("D001", "2030-01-01", "09:00"));

        assert!(scheduler.update_details(
            booked.appointment_id(),
            AppointmentUpdate {
                doctor_id: Some("D002".to_string()),
                doctor_name: Some("Dr. Johnson".to_string()),
                department: Some("Neurology".to_string()),
                ..Default::default()
            }
        ));

        assert!(scheduler.is_slot_available("D001", "2030-01-01", "09:00"));
        assert!(!scheduler.is_slot_available("D002", "2030-01-01", "09:00"));
        assert_eq!(scheduler.available_slots("D002", "2030-01-01"), ["10:00"]);
        assert_eq!(scheduler.by_doctor("D002").len(), 1);
        assert!(scheduler.by_doctor("D001").is_empty());
    }

    #[test]
    fn queries_filter_by_key() {
        let mut scheduler = AppointmentScheduler::new(directory());
        scheduler.book(request("2030-01-01", "09:00")).unwrap();
        let mut other = request("2030-01-02", "09:00");
        other.patient_id = "P002".to_string();
        let second = scheduler.book(other).unwrap();
        scheduler.cancel(second.appointment_id());

        assert_eq!(scheduler.by_patient("P001").len(), 1);
        assert_eq!(scheduler.by_patient("P002").len(), 1);
        assert_eq!(scheduler.by_doctor("D001").len(), 2);
        assert!(scheduler.by_doctor("D002").is_empty());
        assert_eq!(scheduler.by_date("2030-01-02")[0].patient_id, "P002");
        assert_eq!(scheduler.by_status(AppointmentStatus::Cancelled).len(), 1);
        assert_eq!(scheduler.by_status(AppointmentStatus::Scheduled).len(), 1);
    }

    #[test]
    fn statistics_lists_every_status() {
        let scheduler = AppointmentScheduler::new(directory());
        let stats = scheduler.statistics_on("2030-01-01");
        assert_eq!(stats.len(), 8);
        assert!(stats.values().all(|count| *count == 0));
        assert_eq!(stats["No Show"], 0);
    }

    #[test]
    fn unknown_doctor_has_no_available_slots() {
        let scheduler = AppointmentScheduler::new(directory());
        assert!(scheduler.available_slots("D999", "2030-01-01").is_empty());
    }
}
