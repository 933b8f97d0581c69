//! Work records service
//!
//! Dates and times are validated and normalized (`YYYY-MM-DD`, `HH:MM`) so
//! that plain text ordering in the database matches chronological order.

use super::required_text;
use crate::database::{CreateWorkRecordRequest, Repository, WorkRecord};
use crate::error::{AppError, Result};
use chrono::{NaiveDate, NaiveTime};

#[derive(Clone)]
pub struct WorkRecordsService {
    repo: Repository,
}

impl WorkRecordsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_record(&self, req: CreateWorkRecordRequest) -> Result<WorkRecord> {
        let date = normalize_date(required_text(req.date.as_deref(), "date")?)?;
        let time = normalize_time(required_text(req.time.as_deref(), "time")?)?;

        let hours = req
            .hours
            .ok_or_else(|| AppError::Validation("Missing required field: hours".to_string()))?;
        if !hours.is_finite() || hours < 0.0 {
            return Err(AppError::Validation(format!("Invalid hours: {}", hours)));
        }

        let record = self
            .repo
            .create_work_record(&date, &time, hours, req.manual.unwrap_or(false))
            .await?;

        tracing::info!("Work record created: {} ({} {}, {}h)", record.id, date, time, hours);
        Ok(record)
    }

    /// Records ordered by date then time, latest first
    pub async fn list_records(&self) -> Result<Vec<WorkRecord>> {
        self.repo.list_work_records().await
    }

    pub async fn delete_record(&self, id: i64) -> Result<()> {
        self.repo.delete_work_record(id).await?;
        tracing::info!("Work record deleted: {}", id);
        Ok(())
    }
}

fn normalize_date(value: &str) -> Result<String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| AppError::Validation(format!("Invalid date (expected YYYY-MM-DD): {}", value)))
}

fn normalize_time(value: &str) -> Result<String> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| AppError::Validation(format!("Invalid time (expected HH:MM): {}", value)))
}
