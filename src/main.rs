/// Command-line interface for the hospital appointment scheduler.
///
/// This binary provides an interactive menu for booking, cancelling and
/// rescheduling appointments, checking doctor availability and viewing
/// appointment statistics.

use dotenv::dotenv;
use hospital_scheduler::models::today;
use hospital_scheduler::{
    Appointment, AppointmentRequest, AppointmentScheduler, AppointmentStatus, AppointmentUpdate,
    DoctorDirectory, PatientDirectory, SchedulerConfig,
};
use std::io::{self, BufRead, Write};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct AppointmentCLI {
    scheduler: AppointmentScheduler,
    patients: PatientDirectory,
    config: SchedulerConfig,
    running: bool,
}

impl AppointmentCLI {
    fn new(config: SchedulerConfig) -> Self {
        // The menu cannot add doctors or patients, so both rosters always load.
        let doctors = DoctorDirectory::with_sample_doctors();
        let scheduler = if config.seed_sample_data {
            AppointmentScheduler::with_sample_data(doctors)
        } else {
            AppointmentScheduler::new(doctors)
        };
        let patients = PatientDirectory::with_sample_patients();

        AppointmentCLI {
            scheduler,
            patients,
            config,
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       HOSPITAL APPOINTMENT SCHEDULING");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. Schedule new appointment");
        println!("2. View all appointments");
        println!("3. Update appointment status");
        println!("4. Cancel appointment");
        println!("5. Reschedule appointment");
        println!("6. Edit appointment");
        println!("7. View available slots");
        println!("8. Search appointments");
        println!("9. Today's and upcoming appointments");
        println!("10. Appointment statistics");
        println!("11. List doctors");
        println!("12. Export appointments (JSON)");
        println!("13. Exit");
        println!("{}", "-".repeat(20));
    }

    /// Read one trimmed line. Returns `None` and stops the loop once stdin
    /// is closed or unreadable.
    fn get_input(&mut self, prompt: &str, default: Option<&str>) -> Option<String> {
        if let Err(e) = write_prompt(&mut io::stdout(), prompt, default) {
            error!("Failed to write prompt: {}", e);
            self.running = false;
            return None;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) => {
                self.running = false;
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to read input: {}", e);
                self.running = false;
                return None;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            Some(default.unwrap_or("").to_string())
        } else {
            Some(input.to_string())
        }
    }

    fn get_int_input(&mut self, prompt: &str, default: Option<u32>) -> Option<u32> {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref())?;

            if let Ok(value) = input.parse::<u32>() {
                return Some(value);
            }
            println!("Please enter a valid number");
        }
    }

    fn print_appointments(&self, appointments: &[Appointment]) {
        if appointments.is_empty() {
            println!("No appointments found.");
            return;
        }

        println!(
            "{:<8} {:<16} {:<14} {:<12} {:<7} {:<12}",
            "ID", "Patient", "Doctor", "Date", "Time", "Status"
        );
        println!("{}", "-".repeat(72));
        for apt in appointments {
            println!(
                "{:<8} {:<16} {:<14} {:<12} {:<7} {:<12}",
                apt.appointment_id(),
                apt.patient_name,
                apt.doctor_name,
                apt.date,
                apt.time,
                apt.status
            );
        }
    }

    fn schedule_appointment(&mut self) -> Option<()> {
        println!("\n--- Schedule New Appointment ---");

        let patient_id = self.get_input("Patient ID", None)?;
        let patient_name = match self.patients.lookup(&patient_id) {
            Some(patient) => patient.full_name(),
            None => {
                println!("\nPatient not found!");
                for patient in self.patients.search(&patient_id) {
                    println!("  Did you mean {} - {}?", patient.patient_id, patient.full_name());
                }
                return Some(());
            }
        };

        let doctor_id = self.get_input("Doctor ID", Some("D001"))?;
        let (doctor_name, department) = self.resolve_doctor(&doctor_id)?;

        let date = self.get_input("Date (YYYY-MM-DD)", Some(today().as_str()))?;
        let free = self.scheduler.available_slots(&doctor_id, &date);
        if !free.is_empty() {
            println!("Available times: {}", free.join(", "));
        }

        let time = self.get_input("Time (HH:MM)", free.first().map(String::as_str))?;
        let appointment_type = self.get_input("Appointment type", Some("Consultation"))?;
        let notes = self.get_input("Notes", Some(""))?;

        let request = AppointmentRequest {
            patient_id,
            patient_name,
            doctor_id,
            doctor_name,
            department,
            date,
            time,
            appointment_type,
            notes,
        };

        match self.scheduler.book(request) {
            Ok(apt) => {
                println!(
                    "\nAppointment scheduled successfully! ID: {}",
                    apt.appointment_id()
                );
                println!("Expected duration: {} minutes", apt.duration_minutes());
            }
            Err(e) => println!("\nCould not schedule appointment: {}", e),
        }
        Some(())
    }

    /// Doctor name and department from the roster, or asked for when the
    /// id is not on it.
    fn resolve_doctor(&mut self, doctor_id: &str) -> Option<(String, String)> {
        let roster_entry = self
            .scheduler
            .doctors()
            .lookup(doctor_id)
            .map(|doctor| (doctor.name.clone(), doctor.department.clone()));

        match roster_entry {
            Some(entry) => Some(entry),
            None => {
                println!("Doctor {} is not on the roster", doctor_id);
                let name = self.get_input("Doctor name", None)?;
                let department = self.get_input("Department", None)?;
                Some((name, department))
            }
        }
    }

    fn edit_appointment(&mut self) -> Option<()> {
        let appointment_id = self.get_input("Appointment ID to edit", None)?;
        let Some(current) = self.scheduler.get(&appointment_id).cloned() else {
            println!("\nAppointment not found!");
            return Some(());
        };

        println!("\n--- Edit {} ---", current);
        println!("Press enter to keep the current value");
        let mut update = AppointmentUpdate::default();

        let patient_id = self.get_input("Patient ID", Some(current.patient_id.as_str()))?;
        if patient_id != current.patient_id {
            match self.patients.lookup(&patient_id) {
                Some(patient) => {
                    update.patient_name = Some(patient.full_name());
                    update.patient_id = Some(patient_id);
                }
                None => {
                    println!("\nPatient not found!");
                    return Some(());
                }
            }
        }

        let doctor_id = self.get_input("Doctor ID", Some(current.doctor_id.as_str()))?;
        if doctor_id != current.doctor_id {
            let (doctor_name, department) = self.resolve_doctor(&doctor_id)?;
            if !self
                .scheduler
                .is_slot_available(&doctor_id, &current.date, &current.time)
            {
                println!(
                    "Note: {} already has an active appointment on {} at {}",
                    doctor_name, current.date, current.time
                );
            }
            update.doctor_name = Some(doctor_name);
            update.department = Some(department);
            update.doctor_id = Some(doctor_id);
        }

        let appointment_type =
            self.get_input("Appointment type", Some(current.appointment_type.as_str()))?;
        if appointment_type != current.appointment_type {
            update.appointment_type = Some(appointment_type);
        }

        let notes = self.get_input("Notes", Some(current.notes.as_str()))?;
        if notes != current.notes {
            update.notes = Some(notes);
        }

        if update == AppointmentUpdate::default() {
            println!("\nNothing changed");
        } else if self.scheduler.update_details(&appointment_id, update) {
            println!("\nAppointment {} updated", appointment_id);
        } else {
            println!("\nAppointment not found!");
        }
        Some(())
    }

    fn view_all_appointments(&self) {
        println!("\n--- All Appointments ---");
        self.print_appointments(&self.scheduler.all_appointments());
    }

    fn update_status(&mut self) -> Option<()> {
        let appointment_id = self.get_input("Appointment ID", None)?;
        println!("Statuses: Scheduled, Confirmed, Completed, Cancelled, No Show, Rescheduled");
        let raw = self.get_input("New status", None)?;
        let status = AppointmentStatus::from_string(&raw);

        if self.scheduler.update_status(&appointment_id, status) {
            println!("\nAppointment {} is now {}", appointment_id, status);
        } else {
            println!("\nAppointment not found!");
        }
        Some(())
    }

    fn cancel_appointment(&mut self) -> Option<()> {
        let appointment_id = self.get_input("Appointment ID to cancel", None)?;
        if self.scheduler.cancel(&appointment_id) {
            println!("\nAppointment {} cancelled", appointment_id);
            println!("Time slot is now available again");
        } else {
            println!("\nAppointment not found!");
        }
        Some(())
    }

    fn reschedule_appointment(&mut self) -> Option<()> {
        let appointment_id = self.get_input("Appointment ID to reschedule", None)?;
        let new_date = self.get_input("New date (YYYY-MM-DD)", None)?;
        let new_time = self.get_input("New time (HH:MM)", None)?;

        if self.config.strict_reschedule {
            match self
                .scheduler
                .reschedule_checked(&appointment_id, &new_date, &new_time)
            {
                Ok(()) => println!("\nRescheduled to {} {}", new_date, new_time),
                Err(e) => println!("\nFailed to reschedule: {}", e),
            }
        } else if self
            .scheduler
            .reschedule(&appointment_id, &new_date, &new_time)
        {
            println!("\nRescheduled to {} {}", new_date, new_time);
        } else {
            println!("\nAppointment not found!");
        }
        Some(())
    }

    fn view_available_slots(&mut self) -> Option<()> {
        let doctor_id = self.get_input("Doctor ID", Some("D001"))?;
        let date = self.get_input("Date (YYYY-MM-DD)", Some(today().as_str()))?;

        let slots = self.scheduler.available_slots(&doctor_id, &date);
        if slots.is_empty() {
            println!("\nNo available time slots");
            return Some(());
        }

        println!("\n--- Available Time Slots for {} on {} ---", doctor_id, date);
        for slot in slots {
            println!("  {}", slot);
        }
        Some(())
    }

    fn search_appointments(&mut self) -> Option<()> {
        println!("\nSearch by:");
        println!("  1. Patient ID");
        println!("  2. Doctor ID");
        println!("  3. Date");
        println!("  4. Status");
        let choice = self.get_int_input("Select search", Some(1))?;

        let mut results = match choice {
            1 => {
                let key = self.get_input("Patient ID", None)?;
                self.scheduler.by_patient(&key)
            }
            2 => {
                let key = self.get_input("Doctor ID", None)?;
                self.scheduler.by_doctor(&key)
            }
            3 => {
                let key = self.get_input("Date (YYYY-MM-DD)", Some(today().as_str()))?;
                self.scheduler.by_date(&key)
            }
            4 => {
                let key = self.get_input("Status", Some("Scheduled"))?;
                self.scheduler.by_status(AppointmentStatus::from_string(&key))
            }
            _ => {
                println!("Invalid choice");
                return Some(());
            }
        };

        results.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
        println!("\n--- Search Results ---");
        self.print_appointments(&results);
        Some(())
    }

    fn view_today_and_upcoming(&self) {
        println!("\n--- Today's Appointments ({}) ---", today());
        let mut todays = self.scheduler.todays_appointments();
        todays.sort_by(|a, b| a.time.cmp(&b.time));
        self.print_appointments(&todays);

        println!("\n--- Upcoming Appointments ---");
        self.print_appointments(&self.scheduler.upcoming_appointments());
    }

    fn view_statistics(&self) {
        println!("\n=== APPOINTMENT SUMMARY ===");
        for (label, count) in self.scheduler.statistics() {
            println!("{}: {}", label, count);
        }
    }

    fn list_doctors(&self) {
        println!("\n--- Doctors ---");
        for doctor in self.scheduler.doctors().all() {
            println!(
                "  {} - {} ({}): {}",
                doctor.doctor_id,
                doctor.name,
                doctor.department,
                doctor.slots.join(", ")
            );
        }
    }

    fn export_appointments(&self) {
        match serde_json::to_string_pretty(&self.scheduler.all_appointments()) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to export appointments: {}", e),
        }
    }

    fn run(&mut self) {
        self.print_header();

        while self.running {
            self.print_menu();

            let Some(choice) = self.get_int_input("Enter choice", Some(2)) else {
                break;
            };

            match choice {
                1 => {
                    self.schedule_appointment();
                }
                2 => self.view_all_appointments(),
                3 => {
                    self.update_status();
                }
                4 => {
                    self.cancel_appointment();
                }
                5 => {
                    self.reschedule_appointment();
                }
                6 => {
                    self.edit_appointment();
                }
                7 => {
                    self.view_available_slots();
                }
                8 => {
                    self.search_appointments();
                }
                9 => self.view_today_and_upcoming(),
                10 => self.view_statistics(),
                11 => self.list_doctors(),
                12 => self.export_appointments(),
                13 => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

/// Print a prompt, with its default in brackets, and flush it out.
fn write_prompt<W: Write>(out: &mut W, prompt: &str, default: Option<&str>) -> io::Result<()> {
    match default {
        Some(def) => write!(out, "{} [{}]: ", prompt, def)?,
        None => write!(out, "{}: ", prompt)?,
    }
    out.flush()
}

fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = SchedulerConfig::from_env();
    info!("Starting appointment scheduler with {:?}", config);

    let mut cli = AppointmentCLI::new(config);
    cli.run();
}
