//! Schedule (appointment) models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a schedule.
///
/// The store does not validate transitions between these; the calling
/// layer decides which transitions it offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Scheduled,
    Confirmed,
    Completed,
    Canceled,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleStatus::Scheduled => write!(f, "scheduled"),
            ScheduleStatus::Confirmed => write!(f, "confirmed"),
            ScheduleStatus::Completed => write!(f, "completed"),
            ScheduleStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// Fields required to book a new schedule.
///
/// Display names are denormalized here by the caller so that listing a
/// schedule never needs a join against the user collection.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub doctor_id: String,
    pub patient_id: String,
    pub doctor_name: String,
    pub patient_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// A booked appointment between one doctor and one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    /// Unique schedule ID
    pub id: String,
    /// Doctor user ID
    pub doctor_id: String,
    /// Patient user ID
    pub patient_id: String,
    /// Doctor display name, copied at creation (no cascade on rename)
    pub doctor_name: String,
    /// Patient display name, copied at creation (no cascade on rename)
    pub patient_name: String,
    /// Start of the appointment
    pub start: DateTime<Utc>,
    /// End of the appointment
    pub end: DateTime<Utc>,
    /// Short title shown in calendars
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Current status
    pub status: ScheduleStatus,
    /// Optional display color tag
    pub color: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Create a new schedule in `Scheduled` status.
    pub fn new(fields: NewSchedule) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            doctor_id: fields.doctor_id,
            patient_id: fields.patient_id,
            doctor_name: fields.doctor_name,
            patient_name: fields.patient_name,
            start: fields.start,
            end: fields.end,
            title: fields.title,
            description: fields.description,
            status: ScheduleStatus::Scheduled,
            color: fields.color,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this schedule overlaps the given time range.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Check if the appointment's end time has passed.
    pub fn is_elapsed(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }

    /// Check if the schedule still occupies its time slot.
    ///
    /// Canceled schedules free the slot for rebooking.
    pub fn blocks_slot(&self) -> bool {
        self.status != ScheduleStatus::Canceled
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
