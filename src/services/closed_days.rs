//! Closed-day register service

use std::sync::Arc;

use super::slots::parse_date;
use crate::{
    error::{AppError, AppResult},
    models::{ClosedDay, ClosedDayType, CreateClosedDay},
    repository::ClosedDayStore,
};

#[derive(Clone)]
pub struct ClosedDaysService {
    store: Arc<dyn ClosedDayStore>,
}

impl ClosedDaysService {
    pub fn new(store: Arc<dyn ClosedDayStore>) -> Self {
        Self { store }
    }

    /// Append a closed day. Repeated dates are stored again.
    pub async fn add(&self, data: &CreateClosedDay) -> AppResult<ClosedDay> {
        let date = parse_date(&data.date)
            .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", data.date)))?;
        let closure_type = match data.closure_type.as_deref() {
            Some(t) if !t.trim().is_empty() => t.parse::<ClosedDayType>().map_err(AppError::Validation)?,
            _ => ClosedDayType::default(),
        };
        let reason = data
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let closed_day = self.store.insert(date, reason, closure_type).await?;
        tracing::info!("Declared {} closed ({})", closed_day.date, closed_day.closure_type);
        Ok(closed_day)
    }

    pub async fn list(&self) -> AppResult<Vec<ClosedDay>> {
        self.store.list_all().await
    }
}
