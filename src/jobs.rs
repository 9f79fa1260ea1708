//! Print job sheets and their lifecycle
//!
//! A job sheet tracks one piece of work (a run of flyers, a banner, a batch
//! of business cards) from quote to invoice. Status moves strictly forward:
//! Open -> InProgress -> Completed -> Invoiced, with cancellation allowed at
//! any point before invoicing. Invoicing is the handoff into the books: it
//! raises the receivable transaction and pins its ID on the sheet.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::party::PartyKind;
use crate::traits::BooksStorage;
use crate::types::{BooksError, BooksResult};

/// Where a job sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Quoted and accepted, not yet on the press
    Open,
    /// Work underway
    InProgress,
    /// Work done, awaiting invoicing
    Completed,
    /// Invoiced into the books; terminal
    Invoiced,
    /// Abandoned before invoicing; terminal
    Cancelled,
}

impl JobStatus {
    /// Whether the status machine permits moving from `self` to `next`.
    /// Terminal states (Invoiced, Cancelled) permit nothing.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Open, JobStatus::InProgress)
                | (JobStatus::InProgress, JobStatus::Completed)
                | (JobStatus::Completed, JobStatus::Invoiced)
                | (JobStatus::Open, JobStatus::Cancelled)
                | (JobStatus::InProgress, JobStatus::Cancelled)
                | (JobStatus::Completed, JobStatus::Cancelled)
        )
    }
}

/// A single print job for a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSheet {
    pub id: Uuid,
    /// Human-facing number, e.g. "J-2026-0042"
    pub job_number: String,
    pub customer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Units quoted, e.g. 500 menus
    pub quantity: u32,
    /// Price per unit
    pub unit_price: BigDecimal,
    pub status: JobStatus,
    pub opened_on: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub completed_on: Option<NaiveDate>,
    /// Set when the job is invoiced; links to the receivable transaction
    pub invoice_transaction_id: Option<String>,
    pub metadata: HashMap<String, String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl JobSheet {
    /// Open a new job sheet
    pub fn new(
        job_number: String,
        customer_id: Uuid,
        title: String,
        quantity: u32,
        unit_price: BigDecimal,
        opened_on: NaiveDate,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            job_number,
            customer_id,
            title,
            description: None,
            quantity,
            unit_price,
            status: JobStatus::Open,
            opened_on,
            due_date: None,
            completed_on: None,
            invoice_transaction_id: None,
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Quoted value of the whole job
    pub fn total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }

    fn transition(&mut self, next: JobStatus) -> BooksResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(BooksError::InvalidTransition(format!(
                "job {} cannot move from {:?} to {:?}",
                self.job_number, self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now().naive_utc();
        Ok(())
    }

    /// Move the job onto the press
    pub fn start(&mut self) -> BooksResult<()> {
        self.transition(JobStatus::InProgress)
    }

    /// Mark the work finished on the given date
    pub fn complete(&mut self, completed_on: NaiveDate) -> BooksResult<()> {
        self.transition(JobStatus::Completed)?;
        self.completed_on = Some(completed_on);
        Ok(())
    }

    /// Abandon the job. Only possible before invoicing.
    pub fn cancel(&mut self) -> BooksResult<()> {
        self.transition(JobStatus::Cancelled)
    }

    /// Record that the receivable transaction has been raised for this job
    pub fn mark_invoiced(&mut self, transaction_id: String) -> BooksResult<()> {
        self.transition(JobStatus::Invoiced)?;
        self.invoice_transaction_id = Some(transaction_id);
        Ok(())
    }

    /// Whether the job still counts toward open work in progress
    pub fn is_active(&self) -> bool {
        matches!(self.status, JobStatus::Open | JobStatus::InProgress)
    }
}

/// Manages job sheets against storage
pub struct JobManager<S: BooksStorage> {
    storage: S,
}

impl<S: BooksStorage> JobManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Open a job sheet for an active customer
    pub async fn create_job(
        &mut self,
        job_number: String,
        customer_id: Uuid,
        title: String,
        quantity: u32,
        unit_price: BigDecimal,
        opened_on: NaiveDate,
    ) -> BooksResult<JobSheet> {
        if job_number.trim().is_empty() {
            return Err(BooksError::Validation(
                "Job number cannot be empty".to_string(),
            ));
        }
        if title.trim().is_empty() {
            return Err(BooksError::Validation(
                "Job title cannot be empty".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(BooksError::Validation(
                "Job quantity must be at least one".to_string(),
            ));
        }
        if unit_price < BigDecimal::from(0) {
            return Err(BooksError::Validation(
                "Unit price cannot be negative".to_string(),
            ));
        }

        let customer = self
            .storage
            .get_party(customer_id)
            .await?
            .ok_or(BooksError::PartyNotFound(customer_id))?;
        if customer.kind != PartyKind::Customer {
            return Err(BooksError::Validation(format!(
                "Party '{}' is not a customer",
                customer.name
            )));
        }
        if !customer.can_transact() {
            return Err(BooksError::Validation(format!(
                "Customer '{}' is archived",
                customer.name
            )));
        }

        let job = JobSheet::new(job_number, customer_id, title, quantity, unit_price, opened_on);
        self.storage.save_job_sheet(&job).await?;
        info!(job_id = %job.id, job_number = %job.job_number, "opened job sheet");
        Ok(job)
    }

    /// Get a job sheet by ID
    pub async fn get_job(&self, job_id: Uuid) -> BooksResult<JobSheet> {
        self.storage
            .get_job_sheet(job_id)
            .await?
            .ok_or(BooksError::JobNotFound(job_id))
    }

    /// List job sheets, optionally filtered by customer and status
    pub async fn list_jobs(
        &self,
        customer_id: Option<Uuid>,
        status: Option<JobStatus>,
    ) -> BooksResult<Vec<JobSheet>> {
        self.storage.list_job_sheets(customer_id, status).await
    }

    /// Move a job onto the press
    pub async fn start_job(&mut self, job_id: Uuid) -> BooksResult<JobSheet> {
        let mut job = self.get_job(job_id).await?;
        job.start()?;
        self.storage.update_job_sheet(&job).await?;
        Ok(job)
    }

    /// Mark a job's work finished
    pub async fn complete_job(
        &mut self,
        job_id: Uuid,
        completed_on: NaiveDate,
    ) -> BooksResult<JobSheet> {
        let mut job = self.get_job(job_id).await?;
        job.complete(completed_on)?;
        self.storage.update_job_sheet(&job).await?;
        Ok(job)
    }

    /// Cancel a job that has not been invoiced
    pub async fn cancel_job(&mut self, job_id: Uuid) -> BooksResult<JobSheet> {
        let mut job = self.get_job(job_id).await?;
        job.cancel()?;
        self.storage.update_job_sheet(&job).await?;
        info!(job_id = %job.id, "cancelled job sheet");
        Ok(job)
    }

    /// Pin the receivable transaction onto a completed job
    pub async fn mark_invoiced(
        &mut self,
        job_id: Uuid,
        transaction_id: String,
    ) -> BooksResult<JobSheet> {
        let mut job = self.get_job(job_id).await?;
        job.mark_invoiced(transaction_id)?;
        self.storage.update_job_sheet(&job).await?;
        Ok(job)
    }

    /// Access the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Access the underlying storage mutably
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
