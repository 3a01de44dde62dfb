//! Multi-entity insert workload
//!
//! Each sample writes one employee, then `patients_per_sample` patients that
//! reference it, each with `sessions_per_patient` sessions. Rows are wide text
//! on purpose so index locality shows up next to payload cost.

use std::time::Instant;

use rand::RngCore;

use super::clock::Clock;
use super::report::WorkloadReport;
use crate::config::WorkloadParams;
use crate::error::BenchError;
use crate::id::{IdGenerator, RecordId};
use crate::models::{Employee, Patient, Session, Table};
use crate::perf::InsertMetrics;
use crate::store::RecordStore;

const EMPLOYMENT_STATUS: &str = "full time, permanent contract, assigned to outpatient care \
    with rotating weekend shifts and on-call duty every fourth week, reviewed annually";

const SESSION_NOTES: &str = "patient arrived on time, reported improved sleep and reduced \
    pain levels since the last visit; exercises reviewed and adjusted, follow-up scheduled \
    in two weeks, no change in medication, vitals within normal range, notes shared with \
    the attending physician";

/// Per-table row counts written by one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct WorkloadRows {
    pub employees: u64,
    pub patients: u64,
    pub sessions: u64,
}

impl WorkloadRows {
    pub fn expected(params: &WorkloadParams) -> Self {
        let employees = params.samples as u64;
        let patients = employees * params.patients_per_sample as u64;
        let sessions = patients * params.sessions_per_patient as u64;
        Self {
            employees,
            patients,
            sessions,
        }
    }

    pub fn total(&self) -> u64 {
        self.employees + self.patients + self.sessions
    }
}

struct Sampler<'a, S: ?Sized, C: ?Sized, R> {
    store: &'a S,
    clock: &'a C,
    ids: &'a mut IdGenerator<R>,
    metrics: InsertMetrics,
}

impl<S, C, R> Sampler<'_, S, C, R>
where
    S: RecordStore + ?Sized,
    C: Clock + ?Sized,
    R: RngCore,
{
    async fn create_one_sample(&mut self, params: &WorkloadParams) -> Result<(), BenchError> {
        let employee = Employee {
            meta: self.ids.stamp(self.clock.now())?,
            first_name: "firstname".to_string(),
            last_name: "lastname".to_string(),
            age: 42,
            employment_status: EMPLOYMENT_STATUS.to_string(),
            street: "street".to_string(),
            house_number: "123".to_string(),
            city: "city".to_string(),
            postal_code: "1234".to_string(),
        };
        let t = Instant::now();
        self.store.insert_employee(&employee).await?;
        self.metrics.add_insert(t.elapsed());

        for _ in 0..params.patients_per_sample {
            let patient_id = self.create_patient(employee.meta.id()).await?;
            for _ in 0..params.sessions_per_patient {
                self.create_session(patient_id).await?;
            }
        }
        Ok(())
    }

    async fn create_patient(&mut self, employee_id: RecordId) -> Result<RecordId, BenchError> {
        let patient = Patient {
            meta: self.ids.stamp(self.clock.now())?,
            first_name: "first-name".to_string(),
            last_name: "lastname".to_string(),
            employee_id,
        };
        let t = Instant::now();
        self.store.insert_patient(&patient).await?;
        self.metrics.add_insert(t.elapsed());
        Ok(patient.meta.id())
    }

    async fn create_session(&mut self, patient_id: RecordId) -> Result<(), BenchError> {
        let session = Session {
            meta: self.ids.stamp(self.clock.now())?,
            notes: SESSION_NOTES.to_string(),
            patient_id,
        };
        let t = Instant::now();
        self.store.insert_session(&session).await?;
        self.metrics.add_insert(t.elapsed());
        Ok(())
    }
}

pub async fn run_workload<S, C, R>(
    store: &S,
    clock: &C,
    ids: &mut IdGenerator<R>,
    params: &WorkloadParams,
    metrics_sample_rate: usize,
) -> Result<WorkloadReport, BenchError>
where
    S: RecordStore + ?Sized,
    C: Clock + ?Sized,
    R: RngCore,
{
    let strategy = ids.strategy();
    tracing::info!(
        store = store.name(),
        %strategy,
        samples = params.samples,
        rows_per_sample = params.rows_per_sample(),
        "Starting clinic workload"
    );

    store.purge_clinic().await?;

    let mut sampler = Sampler {
        store,
        clock,
        ids,
        metrics: InsertMetrics::new(metrics_sample_rate),
    };

    let start = Instant::now();
    for _ in 0..params.samples {
        sampler.create_one_sample(params).await?;
    }
    let elapsed = start.elapsed();
    tracing::info!("Running {} samples took {:?}", params.samples, elapsed);

    let expected = WorkloadRows::expected(params);
    let rows = WorkloadRows {
        employees: store.count(Table::Employees).await?,
        patients: store.count(Table::Patients).await?,
        sessions: store.count(Table::Sessions).await?,
    };
    for (table, want, got) in [
        (Table::Employees, expected.employees, rows.employees),
        (Table::Patients, expected.patients, rows.patients),
        (Table::Sessions, expected.sessions, rows.sessions),
    ] {
        if want != got {
            return Err(BenchError::RowCount {
                table: table.name(),
                expected: want,
                actual: got,
            });
        }
    }

    Ok(WorkloadReport {
        store: store.name(),
        strategy,
        samples: params.samples,
        rows,
        elapsed,
        latency: sampler.metrics.summary(),
    })
}
