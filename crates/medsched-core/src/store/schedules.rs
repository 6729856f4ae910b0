//! Schedule operations on the store.

use chrono::{DateTime, Utc};

use super::{Store, StoreError, StoreEvent, StoreResult};
use crate::models::{NewSchedule, Schedule, ScheduleStatus};

impl Store {
    /// List all schedules (snapshot copy).
    pub fn list_schedules(&self) -> StoreResult<Vec<Schedule>> {
        self.load_schedules()
    }

    /// Book a new schedule and persist it.
    ///
    /// Rejects ranges whose end is not after their start, and ranges
    /// that overlap a non-canceled schedule of the same doctor. Emits
    /// [`StoreEvent::ScheduleCreated`] after persisting.
    pub fn create_schedule(&mut self, fields: NewSchedule) -> StoreResult<Schedule> {
        if fields.end <= fields.start {
            return Err(StoreError::EndNotAfterStart);
        }

        let mut schedules = self.load_schedules()?;
        if let Some(taken) = schedules.iter().find(|s| {
            s.doctor_id == fields.doctor_id
                && s.blocks_slot()
                && s.overlaps(fields.start, fields.end)
        }) {
            return Err(StoreError::OverlappingSchedule {
                start: taken.start,
                end: taken.end,
            });
        }

        let schedule = Schedule::new(fields);
        schedules.push(schedule.clone());
        self.save_schedules(&schedules)?;

        self.events.emit(&StoreEvent::ScheduleCreated(schedule.clone()));
        Ok(schedule)
    }

    /// Overwrite a schedule's status.
    ///
    /// The store does not validate the transition; callers decide which
    /// transitions they offer. Returns false if no schedule has the
    /// given ID; otherwise persists and emits
    /// [`StoreEvent::ScheduleUpdated`].
    pub fn update_schedule_status(&mut self, id: &str, status: ScheduleStatus) -> StoreResult<bool> {
        let mut schedules = self.load_schedules()?;
        let Some(schedule) = schedules.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };

        schedule.status = status;
        schedule.touch();
        let updated = schedule.clone();

        self.save_schedules(&schedules)?;
        self.events.emit(&StoreEvent::ScheduleUpdated(updated));
        Ok(true)
    }

    /// Remove a schedule.
    ///
    /// The booking flows never delete; cancellation is a status change.
    /// This exists for administrative cleanup.
    pub fn delete_schedule(&mut self, id: &str) -> StoreResult<bool> {
        let mut schedules = self.load_schedules()?;
        let before = schedules.len();
        schedules.retain(|s| s.id != id);
        if schedules.len() == before {
            return Ok(false);
        }
        self.save_schedules(&schedules)?;
        Ok(true)
    }

    /// List schedules belonging to a doctor.
    pub fn list_schedules_by_doctor(&self, doctor_id: &str) -> StoreResult<Vec<Schedule>> {
        let schedules = self.load_schedules()?;
        Ok(schedules
            .into_iter()
            .filter(|s| s.doctor_id == doctor_id)
            .collect())
    }

    /// List schedules belonging to a patient.
    pub fn list_schedules_by_patient(&self, patient_id: &str) -> StoreResult<Vec<Schedule>> {
        let schedules = self.load_schedules()?;
        Ok(schedules
            .into_iter()
            .filter(|s| s.patient_id == patient_id)
            .collect())
    }

    /// Transition every open schedule whose end has passed to
    /// `Completed`.
    ///
    /// Views call this when they load, so stale appointments complete
    /// themselves on display. Returns the number of schedules
    /// transitioned; each one gets its own
    /// [`StoreEvent::ScheduleUpdated`].
    pub fn complete_elapsed(&mut self, now: DateTime<Utc>) -> StoreResult<usize> {
        let mut schedules = self.load_schedules()?;
        let mut completed = Vec::new();

        for schedule in schedules.iter_mut() {
            let open = matches!(
                schedule.status,
                ScheduleStatus::Scheduled | ScheduleStatus::Confirmed
            );
            if open && schedule.is_elapsed(now) {
                schedule.status = ScheduleStatus::Completed;
                schedule.touch();
                completed.push(schedule.clone());
            }
        }

        if completed.is_empty() {
            return Ok(0);
        }

        self.save_schedules(&schedules)?;
        for schedule in &completed {
            self.events.emit(&StoreEvent::ScheduleUpdated(schedule.clone()));
        }
        Ok(completed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryJar, SessionConfig, SessionStore};
    use crate::storage::MemoryBackend;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup_store() -> Store {
        Store::new(
            Box::new(MemoryBackend::new()),
            SessionStore::new(Box::new(MemoryJar::new()), SessionConfig::default()),
        )
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 4, hour, 0, 0).unwrap()
    }

    fn booking(doctor_id: &str, patient_id: &str, start_hour: u32, end_hour: u32) -> NewSchedule {
        NewSchedule {
            doctor_id: doctor_id.into(),
            patient_id: patient_id.into(),
            doctor_name: "Dr. Lima".into(),
            patient_name: "Carlos".into(),
            start: at(start_hour),
            end: at(end_hour),
            title: "Consultation".into(),
            description: None,
            color: None,
        }
    }

    #[test]
    fn test_create_and_filter_queries() {
        let mut store = setup_store();
        let schedule = store.create_schedule(booking("doc-1", "pat-1", 9, 10)).unwrap();
        store.create_schedule(booking("doc-2", "pat-2", 9, 10)).unwrap();

        let by_doctor = store.list_schedules_by_doctor("doc-1").unwrap();
        assert_eq!(by_doctor.len(), 1);
        assert_eq!(by_doctor[0].id, schedule.id);

        let by_patient = store.list_schedules_by_patient("pat-1").unwrap();
        assert_eq!(by_patient.len(), 1);
        assert_eq!(by_patient[0].status, ScheduleStatus::Scheduled);

        assert_eq!(store.list_schedules().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_end_not_after_start() {
        let mut store = setup_store();
        let result = store.create_schedule(booking("doc-1", "pat-1", 10, 9));
        assert!(matches!(result, Err(StoreError::EndNotAfterStart)));

        let result = store.create_schedule(booking("doc-1", "pat-1", 9, 9));
        assert!(matches!(result, Err(StoreError::EndNotAfterStart)));

        assert!(store.list_schedules().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_overlapping_booking_for_same_doctor() {
        let mut store = setup_store();
        store.create_schedule(booking("doc-1", "pat-1", 9, 10)).unwrap();

        let result = store.create_schedule(booking("doc-1", "pat-2", 9, 11));
        assert!(matches!(result, Err(StoreError::OverlappingSchedule { .. })));

        // A different doctor is free to take the same slot
        store.create_schedule(booking("doc-2", "pat-2", 9, 10)).unwrap();
        // Back-to-back slots do not conflict
        store.create_schedule(booking("doc-1", "pat-2", 10, 11)).unwrap();
    }

    #[test]
    fn test_canceled_schedule_frees_the_slot() {
        let mut store = setup_store();
        let schedule = store.create_schedule(booking("doc-1", "pat-1", 9, 10)).unwrap();
        store
            .update_schedule_status(&schedule.id, ScheduleStatus::Canceled)
            .unwrap();

        store.create_schedule(booking("doc-1", "pat-2", 9, 10)).unwrap();
    }

    #[test]
    fn test_booking_and_cancellation_scenario() {
        let mut store = setup_store();
        let schedule = store.create_schedule(booking("doc-1", "pat-1", 9, 10)).unwrap();

        let listed = store.list_schedules_by_patient("pat-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ScheduleStatus::Scheduled);
        let stamped = listed[0].updated_at;

        assert!(store
            .update_schedule_status(&schedule.id, ScheduleStatus::Canceled)
            .unwrap());

        let listed = store.list_schedules_by_patient("pat-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ScheduleStatus::Canceled);
        assert!(listed[0].updated_at > stamped);
    }

    #[test]
    fn test_status_update_emits_once_with_record() {
        let mut store = setup_store();
        let schedule = store.create_schedule(booking("doc-1", "pat-1", 9, 10)).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));

        store
            .update_schedule_status(&schedule.id, ScheduleStatus::Confirmed)
            .unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        match &events[0] {
            StoreEvent::ScheduleUpdated(updated) => {
                assert_eq!(updated.id, schedule.id);
                assert_eq!(updated.status, ScheduleStatus::Confirmed);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_status_update_missing_id() {
        let mut store = setup_store();
        assert!(!store
            .update_schedule_status("missing", ScheduleStatus::Canceled)
            .unwrap());
    }

    #[test]
    fn test_complete_elapsed_sweep() {
        let mut store = setup_store();
        let past = store.create_schedule(booking("doc-1", "pat-1", 9, 10)).unwrap();
        let canceled = store.create_schedule(booking("doc-1", "pat-1", 11, 12)).unwrap();
        store
            .update_schedule_status(&canceled.id, ScheduleStatus::Canceled)
            .unwrap();
        let future = store.create_schedule(booking("doc-1", "pat-1", 15, 16)).unwrap();

        let swept = store.complete_elapsed(at(13)).unwrap();
        assert_eq!(swept, 1);

        let schedules = store.list_schedules().unwrap();
        let status_of = |id: &str| schedules.iter().find(|s| s.id == id).unwrap().status;
        assert_eq!(status_of(&past.id), ScheduleStatus::Completed);
        assert_eq!(status_of(&canceled.id), ScheduleStatus::Canceled);
        assert_eq!(status_of(&future.id), ScheduleStatus::Scheduled);

        // Nothing left to sweep
        assert_eq!(store.complete_elapsed(at(13)).unwrap(), 0);
    }

    #[test]
    fn test_delete_schedule() {
        let mut store = setup_store();
        let schedule = store.create_schedule(booking("doc-1", "pat-1", 9, 10)).unwrap();

        assert!(store.delete_schedule(&schedule.id).unwrap());
        assert!(store.list_schedules().unwrap().is_empty());
        assert!(!store.delete_schedule(&schedule.id).unwrap());
    }
}
