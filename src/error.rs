use thiserror::Error;

/// Failures reported by scheduler operations that return `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Time slot not available: {doctor_id} on {date} at {time}")]
    SlotNotAvailable {
        doctor_id: String,
        date: String,
        time: String,
    },
}
