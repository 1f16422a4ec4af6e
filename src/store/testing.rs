//! Backend test double: injectable faults, call counting, gated reads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock, oneshot};

use super::backend::Backend;
use super::error::BackendError;
use super::memory::MemoryBackend;
use super::seed::fallback_dataset;
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, Barber, BarberFilter, BarberId, BarberPatch,
    NewAppointment, NewNotice, Notice, NoticeId,
};

/// How a [`TestBackend`] misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Calls report the backend unreachable.
    Down,
    /// Calls are refused.
    Reject,
    /// Calls hang far beyond any test timeout.
    Slow,
}

/// Test-side handle on one held appointment read.
#[derive(Debug)]
pub struct Gate {
    /// Fires once the read has reached the gate.
    pub entered: oneshot::Receiver<()>,
    /// Send to let the read proceed.
    pub release: oneshot::Sender<()>,
}

type PendingGate = (oneshot::Sender<()>, oneshot::Receiver<()>);

/// A [`MemoryBackend`] wrapper for tests.
///
/// Every call is counted. While a fault is set every call fails with it.
/// Appointment reads wait on gates handed out by [`TestBackend::gate`],
/// in call order; reads with no pending gate pass straight through.
#[derive(Debug, Default)]
pub struct TestBackend {
    pub inner: MemoryBackend,
    fault: RwLock<Option<Fault>>,
    gates: Mutex<VecDeque<PendingGate>>,
    calls: AtomicUsize,
}

impl TestBackend {
    /// Healthy backend over the seeded dataset.
    pub fn seeded() -> Self {
        Self {
            inner: MemoryBackend::with_dataset(fallback_dataset()),
            ..Self::default()
        }
    }

    /// Backend failing every call with `fault`.
    pub fn failing(fault: Fault) -> Self {
        Self {
            fault: RwLock::new(Some(fault)),
            ..Self::default()
        }
    }

    pub async fn set_fault(&self, fault: Option<Fault>) {
        *self.fault.write().await = fault;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn gate(&self) -> Gate {
        let (entered_tx, entered) = oneshot::channel();
        let (release, release_rx) = oneshot::channel();
        self.gates.lock().await.push_back((entered_tx, release_rx));
        Gate { entered, release }
    }

    async fn enter(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fault = *self.fault.read().await;
        match fault {
            None => Ok(()),
            Some(Fault::Down) => Err(BackendError::Unavailable("connection refused".to_string())),
            Some(Fault::Reject) => Err(BackendError::Rejected("constraint violated".to_string())),
            Some(Fault::Slow) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(BackendError::Unavailable("too slow".to_string()))
            }
        }
    }
}

#[async_trait]
impl Backend for TestBackend {
    fn name(&self) -> &'static str {
        "test"
    }

    async fn select_appointments(
        &self,
        filter: &BarberFilter,
    ) -> Result<Vec<Appointment>, BackendError> {
        self.enter().await?;
        let next = self.gates.lock().await.pop_front();
        if let Some((entered, release)) = next {
            let _ = entered.send(());
            let _ = release.await;
        }
        self.inner.select_appointments(filter).await
    }

    async fn insert_appointment(&self, new: &NewAppointment) -> Result<Appointment, BackendError> {
        self.enter().await?;
        self.inner.insert_appointment(new).await
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Option<Appointment>, BackendError> {
        self.enter().await?;
        self.inner.update_appointment(id, patch).await
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, BackendError> {
        self.enter().await?;
        self.inner.delete_appointment(id).await
    }

    async fn select_barbers(&self) -> Result<Vec<Barber>, BackendError> {
        self.enter().await?;
        self.inner.select_barbers().await
    }

    async fn insert_barber(&self, barber: &Barber) -> Result<Barber, BackendError> {
        self.enter().await?;
        self.inner.insert_barber(barber).await
    }

    async fn update_barber(
        &self,
        id: &BarberId,
        patch: &BarberPatch,
    ) -> Result<Option<Barber>, BackendError> {
        self.enter().await?;
        self.inner.update_barber(id, patch).await
    }

    async fn delete_barber(&self, id: &BarberId) -> Result<bool, BackendError> {
        self.enter().await?;
        self.inner.delete_barber(id).await
    }

    async fn select_notices(&self) -> Result<Vec<Notice>, BackendError> {
        self.enter().await?;
        self.inner.select_notices().await
    }

    async fn insert_notice(
        &self,
        new: &NewNotice,
        created_at: DateTime<Utc>,
    ) -> Result<Notice, BackendError> {
        self.enter().await?;
        self.inner.insert_notice(new, created_at).await
    }

    async fn set_notice_active(
        &self,
        id: NoticeId,
        active: bool,
    ) -> Result<Option<Notice>, BackendError> {
        self.enter().await?;
        self.inner.set_notice_active(id, active).await
    }

    async fn deactivate_notices(&self) -> Result<u64, BackendError> {
        self.enter().await?;
        self.inner.deactivate_notices().await
    }

    async fn delete_notice(&self, id: NoticeId) -> Result<bool, BackendError> {
        self.enter().await?;
        self.inner.delete_notice(id).await
    }
}
