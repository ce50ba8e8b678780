//! In-memory appointment scheduling for a hospital front desk.
//!
//! The [`AppointmentScheduler`] owns all appointment records and the
//! doctor roster, and enforces that a doctor's time slot on a given date
//! holds at most one active appointment.

pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod patients;
pub mod scheduler;

pub use calendar::{Doctor, DoctorDirectory};
pub use config::SchedulerConfig;
pub use error::SchedulingError;
pub use models::{Appointment, AppointmentRequest, AppointmentStatus, AppointmentUpdate};
pub use patients::{Patient, PatientDirectory};
pub use scheduler::AppointmentScheduler;
