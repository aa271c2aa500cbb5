//! Polling loop that populates report placeholders as the host page reveals them.
//!
//! ```text
//! Idle -> Scanning -> Populating -> Reflowing -> Idle
//!            |
//!            +-- no candidates, idle bound reached --> Done
//! ```
//!
//! Populations within one pass run concurrently on the current task and are joined
//! before any page write, so the page is only mutated serially.

use futures_util::future::join_all;
use tokio::time::{sleep, Duration};

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::error::Result;
use crate::locator::find_report_placeholders;
use crate::logging::{info, obj, v_num, v_str, warn, Domain};
use crate::page::HostPage;
use crate::reconcile::{reconcile, Reflow};
use crate::render::render_aggregation;
use crate::tracker::IssueSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning,
    Populating,
    Reflowing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub found: usize,
    pub populated: usize,
    pub failed: usize,
    pub reflow: Reflow,
    /// Phase after the pass: `Idle` to keep polling, `Done` to stop.
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub started: bool,
    pub scans: u32,
    pub populated: usize,
    pub failed: usize,
}

pub struct Orchestrator<S> {
    source: S,
    phase: Phase,
    idle_scans: u32,
    max_idle_scans: u32,
    initial_delay: Duration,
    scan_interval: Duration,
}

impl<S: IssueSource> Orchestrator<S> {
    pub fn new(source: S, cfg: &Config) -> Self {
        Self {
            source,
            phase: Phase::Idle,
            idle_scans: 0,
            max_idle_scans: cfg.max_idle_scans,
            initial_delay: cfg.initial_delay(),
            scan_interval: cfg.scan_interval(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn idle_scans(&self) -> u32 {
        self.idle_scans
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch, aggregate and render the report for one selector.
    pub async fn build_report(&self, selector: &str) -> Result<String> {
        let records = self.source.fetch_records(selector).await?;
        let agg = aggregate(&records)?;
        Ok(render_aggregation(&agg, &|label: &str| self.source.group_link(label)))
    }

    /// One scan pass. Does not sleep; `run` owns the timing.
    pub async fn scan_once(&mut self, page: &mut dyn HostPage) -> ScanOutcome {
        let mut out = ScanOutcome {
            found: 0,
            populated: 0,
            failed: 0,
            reflow: Reflow::default(),
            phase: Phase::Done,
        };
        if self.phase == Phase::Done {
            return out;
        }

        self.phase = Phase::Scanning;
        let candidates = find_report_placeholders(page);
        out.found = candidates.len();
        if candidates.is_empty() {
            self.idle_scans += 1;
            self.phase = if self.idle_scans >= self.max_idle_scans {
                Phase::Done
            } else {
                Phase::Idle
            };
            out.phase = self.phase;
            if self.phase == Phase::Done {
                info(
                    Domain::Scan,
                    "polling_done",
                    obj(&[("idle_scans", v_num(self.idle_scans as f64))]),
                );
            }
            return out;
        }

        self.phase = Phase::Populating;
        let reports = join_all(candidates.iter().map(|c| self.build_report(&c.selector))).await;
        for (candidate, report) in candidates.iter().zip(reports) {
            let written = report.and_then(|markup| page.write_content(&candidate.id, &markup));
            match written {
                Ok(()) => out.populated += 1,
                Err(e) => {
                    out.failed += 1;
                    warn(
                        Domain::Fetch,
                        "populate_failed",
                        obj(&[
                            ("placeholder", v_str(&candidate.id)),
                            ("selector", v_str(&candidate.selector)),
                            ("msg", v_str(&e.to_string())),
                        ]),
                    );
                }
            }
        }
        if out.populated > 0 {
            self.idle_scans = 0;
        }
        info(
            Domain::Render,
            "batch_settled",
            obj(&[
                ("found", v_num(out.found as f64)),
                ("populated", v_num(out.populated as f64)),
                ("failed", v_num(out.failed as f64)),
            ]),
        );

        self.phase = Phase::Reflowing;
        out.reflow = reconcile(page);

        self.phase = Phase::Idle;
        out.phase = Phase::Idle;
        out
    }

    /// Poll until the idle bound is reached. Never starts on a page without the
    /// dashboard container.
    pub async fn run(&mut self, page: &mut dyn HostPage) -> RunSummary {
        let mut summary = RunSummary::default();
        if !page.has_page_container() {
            info(Domain::System, "not_a_dashboard", obj(&[]));
            return summary;
        }
        summary.started = true;
        info(
            Domain::System,
            "polling_start",
            obj(&[
                ("initial_delay_ms", v_num(self.initial_delay.as_millis() as f64)),
                ("interval_ms", v_num(self.scan_interval.as_millis() as f64)),
                ("max_idle_scans", v_num(self.max_idle_scans as f64)),
            ]),
        );

        sleep(self.initial_delay).await;
        loop {
            let out = self.scan_once(page).await;
            summary.scans += 1;
            summary.populated += out.populated;
            summary.failed += out.failed;
            if out.phase == Phase::Done {
                return summary;
            }
            sleep(self.scan_interval).await;
        }
    }
}
