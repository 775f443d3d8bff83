//! Financial ledger: revenue, cost and savings accrual with daily snapshots
//!
//! Revenue, variable cost and savings accumulate per step. Fixed cost is
//! derived from elapsed simulated days on every step instead of being summed,
//! so it always equals `days × daily_fixed_cost` until the rate is changed.
//! A rate change re-bases it at the current day.
//!
//! Rolling-window figures are reconstructed from the bounded snapshot
//! history: the delta between the newest snapshot and the earliest one
//! inside the window, rescaled to exactly `window_days`.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::{FinanceConfig, MIN_WINDOW_HISTORY, MarketConfig};
use crate::reaction::MassFlow;

const KG_PER_TON: f64 = 1000.0;
const DAYS_PER_YEAR: f64 = 365.0;
/// Elapsed time (one simulated hour) before average-rate extrapolation kicks in
const MIN_EXTRAPOLATION_DAYS: f64 = 1.0 / 24.0;

/// Cumulative totals captured at a simulated day boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub day: u64,
    pub revenue: f64,
    pub savings: f64,
    /// Variable plus fixed cost at the moment of capture
    pub cost: f64,
}

impl DailySnapshot {
    pub fn profit(&self) -> f64 {
        self.revenue - self.cost + self.savings
    }
}

/// Capacity-bounded, strictly day-ordered snapshot buffer
#[derive(Debug, Clone)]
pub struct FinancialHistory {
    entries: VecDeque<DailySnapshot>,
    capacity: usize,
}

impl FinancialHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a snapshot, evicting the oldest past capacity.
    /// Returns false (and stores nothing) unless `day` is newer than the last entry.
    pub fn push(&mut self, snapshot: DailySnapshot) -> bool {
        if let Some(last) = self.entries.back() {
            if snapshot.day <= last.day {
                return false;
            }
        }

        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&DailySnapshot> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailySnapshot> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Revenue and profit normalized to one reporting window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub revenue: f64,
    pub profit: f64,
}

/// Windowed figures from snapshot deltas.
///
/// Returns `None` with fewer than three snapshots or when the reference and
/// the newest snapshot share a day.
pub fn compute_window(history: &FinancialHistory, window_days: u32) -> Option<WindowMetrics> {
    if history.len() < MIN_WINDOW_HISTORY {
        return None;
    }

    let latest = history.latest()?;
    let window = u64::from(window_days);
    let start_day = latest.day.saturating_sub(window);
    let reference = history
        .iter()
        .find(|s| s.day >= start_day)
        .or_else(|| history.iter().next())?;

    let span = latest.day - reference.day;
    if span == 0 {
        return None;
    }

    let mut revenue = latest.revenue - reference.revenue;
    let mut profit = latest.profit() - reference.profit();
    if span != window {
        let scale = f64::from(window_days) / span as f64;
        revenue *= scale;
        profit *= scale;
    }

    Some(WindowMetrics { revenue, profit })
}

/// Annualized windowed profit as a percentage of capex
pub fn roi_percent(window_profit: f64, window_days: u32, capex: f64) -> f64 {
    if window_days == 0 || capex <= 0.0 {
        return 0.0;
    }
    window_profit * (DAYS_PER_YEAR / f64::from(window_days)) / capex * 100.0
}

/// Years to recover capex at the windowed profit rate; `None` if not profitable
pub fn payback_years(window_profit: f64, window_days: u32, capex: f64) -> Option<f64> {
    if window_days == 0 {
        return None;
    }
    let annual = window_profit * (DAYS_PER_YEAR / f64::from(window_days));
    (annual > 0.0).then(|| capex / annual)
}

/// Running financial totals and their daily history
#[derive(Debug, Clone)]
pub struct FinancialLedger {
    market: MarketConfig,
    finance: FinanceConfig,
    total_revenue: f64,
    total_variable_cost: f64,
    total_fixed_cost: f64,
    /// Fixed cost booked before the current rate took effect
    fixed_cost_base: f64,
    fixed_rate_since_days: f64,
    total_savings: f64,
    last_snapshot_day: u64,
    history: FinancialHistory,
    window: WindowMetrics,
}

impl FinancialLedger {
    pub fn new(market: &MarketConfig, finance: &FinanceConfig) -> Self {
        Self {
            market: market.clone(),
            finance: finance.clone(),
            total_revenue: 0.0,
            total_variable_cost: 0.0,
            total_fixed_cost: 0.0,
            fixed_cost_base: 0.0,
            fixed_rate_since_days: 0.0,
            total_savings: 0.0,
            last_snapshot_day: 0,
            history: FinancialHistory::new(finance.history_capacity),
            window: WindowMetrics::default(),
        }
    }

    /// Swap prices and financial constants; totals are kept, history is trimmed
    ///
    /// The window figures are recomputed right away against the new window
    /// length, so ROI and payback are consistent even while paused.
    pub fn reconfigure(
        &mut self,
        market: &MarketConfig,
        finance: &FinanceConfig,
        cumulative_sim_days: f64,
    ) {
        if finance.daily_fixed_cost != self.finance.daily_fixed_cost {
            self.fixed_cost_base = self.total_fixed_cost;
            self.fixed_rate_since_days = cumulative_sim_days;
        }
        self.market = market.clone();
        self.finance = finance.clone();
        self.history.set_capacity(finance.history_capacity);
        self.refresh_window(cumulative_sim_days);
    }

    /// Book one step of production. Returns the snapshot if a new day began.
    pub fn accrue(
        &mut self,
        flow: &MassFlow,
        purity_mix: f64,
        cumulative_sim_days: f64,
    ) -> Option<DailySnapshot> {
        let product_tons = flow.fluorite_out / KG_PER_TON;
        let reagent_tons = flow.reagent_used / KG_PER_TON;
        let fluoride_tons = flow.fluoride_in / KG_PER_TON;

        self.total_revenue += product_tons * self.market.blended_price(purity_mix);
        self.total_variable_cost += reagent_tons * self.market.reagent_cost;
        self.total_savings += fluoride_tons * self.market.avoided_disposal_cost;
        self.total_fixed_cost = self.fixed_cost_base
            + (cumulative_sim_days - self.fixed_rate_since_days) * self.finance.daily_fixed_cost;

        let day = cumulative_sim_days.max(0.0).floor() as u64;
        if day <= self.last_snapshot_day {
            return None;
        }

        let snapshot = DailySnapshot {
            day,
            revenue: self.total_revenue,
            savings: self.total_savings,
            cost: self.total_cost(),
        };
        self.last_snapshot_day = day;
        self.history.push(snapshot);
        log::debug!(
            "Day {} snapshot: revenue {:.2}, cost {:.2}, savings {:.2}",
            day,
            snapshot.revenue,
            snapshot.cost,
            snapshot.savings
        );
        Some(snapshot)
    }

    /// Recompute the rolling window after accrual
    ///
    /// With enough history the snapshot deltas are used. Otherwise the
    /// all-time average rate is extrapolated once a simulated hour has
    /// passed. A degenerate span keeps the previous figures.
    pub fn refresh_window(&mut self, cumulative_sim_days: f64) {
        let window_days = self.finance.window_days;

        if self.history.len() >= MIN_WINDOW_HISTORY {
            if let Some(metrics) = compute_window(&self.history, window_days) {
                self.window = metrics;
            }
        } else if cumulative_sim_days > MIN_EXTRAPOLATION_DAYS {
            let scale = f64::from(window_days) / cumulative_sim_days;
            self.window = WindowMetrics {
                revenue: self.total_revenue * scale,
                profit: self.net_profit() * scale,
            };
        }
    }

    pub fn window_metrics(&self) -> WindowMetrics {
        self.window
    }

    pub fn roi_percent(&self) -> f64 {
        roi_percent(self.window.profit, self.finance.window_days, self.finance.capex)
    }

    pub fn payback_years(&self) -> Option<f64> {
        payback_years(self.window.profit, self.finance.window_days, self.finance.capex)
    }

    pub fn total_revenue(&self) -> f64 {
        self.total_revenue
    }

    pub fn total_variable_cost(&self) -> f64 {
        self.total_variable_cost
    }

    pub fn total_fixed_cost(&self) -> f64 {
        self.total_fixed_cost
    }

    pub fn total_savings(&self) -> f64 {
        self.total_savings
    }

    pub fn total_cost(&self) -> f64 {
        self.total_variable_cost + self.total_fixed_cost
    }

    /// Revenue minus all costs plus avoided-disposal savings
    pub fn net_profit(&self) -> f64 {
        self.total_revenue - self.total_cost() + self.total_savings
    }

    pub fn history(&self) -> &FinancialHistory {
        &self.history
    }

    pub fn reset(&mut self) {
        self.total_revenue = 0.0;
        self.total_variable_cost = 0.0;
        self.total_fixed_cost = 0.0;
        self.fixed_cost_base = 0.0;
        self.fixed_rate_since_days = 0.0;
        self.total_savings = 0.0;
        self.last_snapshot_day = 0;
        self.history.clear();
        self.window = WindowMetrics::default();
    }
}
