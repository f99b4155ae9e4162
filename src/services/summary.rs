//! Summary service
//!
//! Ties storage, settings, range resolution and aggregation together for
//! presentation. [`LiveSummary`] keeps a summary current by recomputing it
//! whenever storage reports a change.

use std::sync::mpsc::{Receiver, TryRecvError};

use chrono::{Local, NaiveDateTime};

use crate::config::settings::Settings;
use crate::error::ExpenseResult;
use crate::models::{DateInterval, DateRange, Money};
use crate::storage::{StoreChange, Storage};

use super::aggregate::{AccountBalance, AggregateFilter, AggregateResult, AggregationEngine};
use super::date_range::DateRangeResolver;

/// An aggregate together with the range it was computed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub range: DateRange,
    pub interval: DateInterval,
    /// Human-readable interval, e.g. "01/01/2024 - 31/01/2024"
    pub description: String,
    pub result: AggregateResult,
}

/// Everything the overview screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub summary: Summary,
    pub balances: Vec<AccountBalance>,
    pub total_balance: Money,
}

/// Service producing summaries from the current ledger
pub struct SummaryService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> SummaryService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Summarize a range as of `now`
    pub fn summarize(
        &self,
        range: &DateRange,
        filter: &AggregateFilter,
        now: NaiveDateTime,
    ) -> ExpenseResult<Summary> {
        let interval = DateRangeResolver::from_settings(self.settings).resolve(range, now)?;

        let accounts = self.storage.accounts()?;
        let categories = self.storage.categories()?;
        let transactions = self.storage.transactions(Some(&interval))?;

        let result = AggregationEngine::new(&accounts, &categories).aggregate(
            &transactions,
            interval,
            filter,
        );

        Ok(Summary {
            range: *range,
            interval,
            description: interval.describe(&self.settings.date_format),
            result,
        })
    }

    /// Summarize the configured default range against the local clock
    pub fn summarize_default(&self, filter: &AggregateFilter) -> ExpenseResult<Summary> {
        self.summarize(
            &self.settings.date_range,
            filter,
            Local::now().naive_local(),
        )
    }

    /// Summary for the configured range plus every account balance
    pub fn dashboard(&self, now: NaiveDateTime) -> ExpenseResult<Dashboard> {
        let summary = self.summarize(&self.settings.date_range, &AggregateFilter::all(), now)?;

        let accounts = self.storage.accounts()?;
        let engine = AggregationEngine::new(&accounts, &[]);

        Ok(Dashboard {
            summary,
            balances: engine.account_balances(),
            total_balance: engine.total_balance(),
        })
    }

    /// Start tracking a summary that follows storage changes
    pub fn live(&self, range: DateRange, filter: AggregateFilter) -> ExpenseResult<LiveSummary<'a>> {
        let changes = self.storage.subscribe()?;
        let current = self.summarize(&range, &filter, Local::now().naive_local())?;
        Ok(LiveSummary {
            service: SummaryService::new(self.storage, self.settings),
            changes,
            range,
            filter,
            current,
        })
    }
}

/// A summary recomputed from a fresh snapshot after each store change
pub struct LiveSummary<'a> {
    service: SummaryService<'a>,
    changes: Receiver<StoreChange>,
    range: DateRange,
    filter: AggregateFilter,
    current: Summary,
}

impl<'a> LiveSummary<'a> {
    pub fn current(&self) -> &Summary {
        &self.current
    }

    /// Drain pending changes; recompute as of `now` if there were any
    ///
    /// Returns the new summary when it was recomputed.
    pub fn refresh(&mut self, now: NaiveDateTime) -> ExpenseResult<Option<&Summary>> {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    tracing::debug!(?change, "store changed");
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if !changed {
            return Ok(None);
        }

        self.current = self.service.summarize(&self.range, &self.filter, now)?;
        Ok(Some(&self.current))
    }
}
