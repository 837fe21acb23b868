// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the adapters and services a command needs from [`Config`].

use crate::config::Config;
use crate::exit_error::ExitError;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use ns_adapters::{
    DesktopNotifier, HttpPageSurface, JenkinsClient, LogNotifier, Notice, NotifyError,
    OperatorNotifier, SystemBrowser,
};
use ns_core::{default_run_date, Clock, SystemClock};
use ns_engine::{CiQueries, Dashboard, Workflow};
use ns_storage::PgResultStore;

pub type JobWorkflow = Workflow<JenkinsClient, SystemBrowser, Notifier>;
pub type ResultsDashboard = Dashboard<PgResultStore, SystemClock>;

/// Desktop notifications, or log lines when they are turned off
#[derive(Clone, Copy, Debug)]
pub enum Notifier {
    Desktop(DesktopNotifier),
    Log(LogNotifier),
}

#[async_trait]
impl OperatorNotifier for Notifier {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
        match self {
            Notifier::Desktop(n) => n.notify(notice).await,
            Notifier::Log(n) => n.notify(notice).await,
        }
    }
}

pub struct Context {
    pub config: Config,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn ci(&self) -> Result<JenkinsClient> {
        let config = &self.config;
        JenkinsClient::new(&config.jenkins_url, &config.operator, &config.api_token)
            .context("configuring the CI client")
    }

    pub fn browser(&self) -> SystemBrowser {
        SystemBrowser::new(self.config.alternate_browsers.clone())
    }

    pub fn notifier(&self) -> Notifier {
        if self.config.desktop_notifications {
            Notifier::Desktop(DesktopNotifier::new())
        } else {
            Notifier::Log(LogNotifier)
        }
    }

    pub fn workflow(&self) -> Result<JobWorkflow> {
        let timing = self.config.workflow_timing()?;
        Ok(Workflow::new(self.ci()?, self.browser(), self.notifier(), &self.config.trigger_token)
            .with_timing(timing))
    }

    pub fn queries(&self) -> Result<CiQueries<JenkinsClient>> {
        Ok(CiQueries::new(self.ci()?))
    }

    pub fn page_surface(&self) -> Result<HttpPageSurface> {
        HttpPageSurface::new(&self.config.operator, &self.config.api_token)
            .context("preparing the page surface")
    }

    /// The store connects on first use.
    pub fn store(&self) -> Result<PgResultStore> {
        let url = self.config.database_url.as_deref().ok_or_else(|| {
            ExitError::usage("database_url is not configured; set it in config.toml or NIGHTLY_DATABASE_URL")
        })?;
        Ok(PgResultStore::connect_lazy(url))
    }

    pub fn dashboard(&self) -> Result<ResultsDashboard> {
        Ok(self.dashboard_over(self.store()?))
    }

    pub fn dashboard_over(&self, store: PgResultStore) -> ResultsDashboard {
        Dashboard::new(store, SystemClock, &self.config.operator)
    }

    /// `date`, or yesterday's run (Friday's on a Monday).
    pub fn run_date(&self, date: Option<NaiveDate>) -> NaiveDate {
        date.unwrap_or_else(|| default_run_date(SystemClock.today()))
    }
}
