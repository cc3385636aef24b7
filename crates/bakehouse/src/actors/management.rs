//! Management: periodic staffing rebalance and the decision to close.
//!
//! The sole writer of the active flag's true→false transition and the sole
//! broadcaster of termination. Owns the chef roster; nothing else may touch
//! team sizes.

use crate::config::BakeryConfig;
use crate::context::Shared;
use crate::domain::{Product, ProductTable};
use crate::messages::{ControlMsg, ControlTag, Reallocation};
use crate::state::{ChefRoster, Ledger, LedgerSnapshot};
use bakehouse_kernel::KernelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Staffing/termination decisions happen at most this often.
const DECISION_INTERVAL: Duration = Duration::from_secs(60);
/// Pause between control-channel checks.
const CYCLE_PAUSE: Duration = Duration::from_secs(5);
/// A donor team must oversupply by more than this ratio gap.
const DONOR_FLOOR: f64 = 0.05;

/// Which threshold closed the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosureCause {
    FrustratedCustomers,
    Complaints,
    MissingItems,
    ProfitTarget,
    TimeLimit,
}

impl ClosureCause {
    pub fn label(self) -> &'static str {
        match self {
            ClosureCause::FrustratedCustomers => "frustrated-customer threshold reached",
            ClosureCause::Complaints => "complaint threshold reached",
            ClosureCause::MissingItems => "missing-item threshold reached",
            ClosureCause::ProfitTarget => "profit target reached",
            ClosureCause::TimeLimit => "time limit reached",
        }
    }
}

impl fmt::Display for ClosureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The closing report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_profit: f64,
    pub elapsed: Duration,
    pub produced: ProductTable<u32>,
    pub sold: ProductTable<u32>,
    pub frustrated_customers: u32,
    pub complained_customers: u32,
    pub missing_item_requests: u32,
    pub decisions: u32,
}

impl Summary {
    fn from_snapshot(snapshot: LedgerSnapshot, decisions: u32) -> Self {
        Self {
            total_profit: snapshot.total_profit,
            elapsed: snapshot.elapsed,
            produced: snapshot.produced,
            sold: snapshot.sold,
            frustrated_customers: snapshot.frustrated_customers,
            complained_customers: snapshot.complained_customers,
            missing_item_requests: snapshot.missing_item_requests,
            decisions,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "======== BAKERY SIMULATION SUMMARY ========")?;
        writeln!(f, "Total profit: ${:.2}", self.total_profit)?;
        writeln!(f, "Duration: {} s", self.elapsed.as_secs())?;
        writeln!(f, "Produced / sold:")?;
        for product in Product::ALL {
            writeln!(
                f,
                "  {:<18} {:>5} / {:<5}",
                product.label(),
                self.produced[product],
                self.sold[product]
            )?;
        }
        writeln!(f, "Frustrated customers: {}", self.frustrated_customers)?;
        writeln!(f, "Complaints: {}", self.complained_customers)?;
        writeln!(f, "Missing-item requests: {}", self.missing_item_requests)?;
        writeln!(f, "Management decisions: {}", self.decisions)?;
        write!(f, "===========================================")
    }
}

pub struct ManagementActor {
    shared: Shared,
    roster: ChefRoster,
    last_decision: Instant,
    decisions: u32,
}

impl ManagementActor {
    pub fn new(shared: Shared) -> Self {
        let roster = ChefRoster::from_config(&shared.config);
        Self {
            shared,
            roster,
            last_decision: Instant::now(),
            decisions: 0,
        }
    }

    pub fn roster(&self) -> &ChefRoster {
        &self.roster
    }

    /// Picks the staffing move for this cycle, if any: the product whose
    /// sales share most exceeds its production share gains one chef, taken
    /// from the team with the smallest oversupply above the floor.
    pub fn plan_reallocation(ledger: &Ledger) -> Option<Reallocation> {
        let total_produced: u32 = Product::ALL.iter().map(|&p| ledger.produced(p)).sum();
        let total_sold: u32 = Product::ALL.iter().map(|&p| ledger.sold(p)).sum();
        let production_share = |p: Product| {
            if total_produced > 0 {
                f64::from(ledger.produced(p)) / f64::from(total_produced)
            } else {
                0.0
            }
        };
        let sales_share = |p: Product| {
            if total_sold > 0 {
                f64::from(ledger.sold(p)) / f64::from(total_sold)
            } else {
                0.0
            }
        };

        let mut hottest: Option<(Product, f64)> = None;
        for product in Product::ALL {
            let gap = sales_share(product) - production_share(product);
            if gap > hottest.map_or(0.0, |(_, best)| best) {
                hottest = Some((product, gap));
            }
        }
        let (hot, gap) = hottest?;
        // Bread is baker territory and paste never sells retail; neither
        // can absorb a chef.
        if matches!(hot, Product::Bread | Product::Paste) {
            return None;
        }
        let to = hot.chef_role()?;

        let mut donor: Option<(Product, f64)> = None;
        for product in Product::ALL {
            if product == Product::Paste {
                continue;
            }
            let spare = production_share(product) - sales_share(product);
            if spare > DONOR_FLOOR && donor.map_or(true, |(_, least)| spare < least) {
                donor = Some((product, spare));
            }
        }
        let (cold, spare) = donor?;
        let from = cold.chef_role()?;

        debug!(
            hot = %hot,
            gap = format!("{gap:.3}"),
            cold = %cold,
            spare = format!("{spare:.3}"),
            "staffing imbalance found"
        );
        Some(Reallocation { from, to, count: 1 })
    }

    /// Evaluates the termination thresholds in fixed order; the first one
    /// met wins.
    pub fn closure_cause(ledger: &Ledger, config: &BakeryConfig) -> Option<ClosureCause> {
        let limits = &config.thresholds;
        if ledger.frustrated_customers() >= limits.frustrated_customers {
            Some(ClosureCause::FrustratedCustomers)
        } else if ledger.complained_customers() >= limits.complained_customers {
            Some(ClosureCause::Complaints)
        } else if ledger.missing_item_requests() >= limits.missing_item_requests {
            Some(ClosureCause::MissingItems)
        } else if ledger.total_profit() >= limits.total_profit {
            Some(ClosureCause::ProfitTarget)
        } else if ledger.elapsed().as_secs() / 60 >= config.max_simulation_minutes {
            Some(ClosureCause::TimeLimit)
        } else {
            None
        }
    }

    /// One decision cycle under the ledger lock: staffing rebalance plus the
    /// termination evaluation. Returns the closure cause when one fired.
    pub fn decision_pass(&mut self) -> Result<Option<ClosureCause>, KernelError> {
        let config = std::sync::Arc::clone(&self.shared.config);
        let (plan, cause) = self.shared.ledger.with(|ledger| {
            (
                Self::plan_reallocation(ledger),
                Self::closure_cause(ledger, &config),
            )
        })?;
        if let Some(decision) = plan {
            self.roster.apply(&decision);
        }
        self.last_decision = Instant::now();
        self.decisions += 1;
        Ok(cause)
    }

    fn drain_notices(&self) {
        while let Some(msg) = self.shared.control.try_take(&ControlTag::Management) {
            match msg {
                ControlMsg::Restock(material) => {
                    info!(%material, "supply restock notice received");
                }
                ControlMsg::Terminate => return,
            }
        }
    }

    /// Runs until a threshold fires or the active flag is flipped
    /// externally, then reports.
    pub async fn run(mut self) -> Summary {
        info!("management started");
        while self.shared.is_active() {
            self.drain_notices();
            if self.last_decision.elapsed() >= DECISION_INTERVAL {
                match self.decision_pass() {
                    Ok(Some(cause)) => {
                        info!(%cause, "simulation end condition reached");
                        self.shared.terminate(cause.label());
                        break;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        error!(error = %err, "ledger unavailable, management stepping down");
                        break;
                    }
                }
            }
            tokio::time::sleep(CYCLE_PAUSE).await;
        }

        let summary = match self.shared.ledger.with(|ledger| ledger.snapshot()) {
            Ok(snapshot) => Summary::from_snapshot(snapshot, self.decisions),
            Err(err) => {
                error!(error = %err, "summary built without final ledger state");
                Summary {
                    total_profit: 0.0,
                    elapsed: Duration::ZERO,
                    produced: ProductTable::default(),
                    sold: ProductTable::default(),
                    frustrated_customers: 0,
                    complained_customers: 0,
                    missing_item_requests: 0,
                    decisions: self.decisions,
                }
            }
        };
        info!(
            profit = format!("{:.2}", summary.total_profit),
            elapsed_secs = summary.elapsed.as_secs(),
            frustrated = summary.frustrated_customers,
            complaints = summary.complained_customers,
            missing = summary.missing_item_requests,
            decisions = summary.decisions,
            "management closing"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(produced: &[(Product, u32)], sold: &[(Product, u32)]) -> Ledger {
        let mut produced_t = ProductTable::<u32>::default();
        let mut sold_t = ProductTable::<u32>::default();
        for &(p, n) in produced {
            produced_t[p] = n;
        }
        for &(p, n) in sold {
            sold_t[p] = n;
        }
        Ledger::with_counts(produced_t, sold_t)
    }

    #[test]
    fn demand_pulls_a_chef_from_the_smallest_oversupplier() {
        // Sales shares: sweet 60/100, cake 20/100, bread 20/100.
        // Production shares: sweet 40/100, cake 28/100, bread 32/100.
        // Sweet runs hot by 0.2; cake oversupplies by 0.08, bread by 0.12,
        // so cake is the smallest qualifying donor.
        let ledger = ledger_with(
            &[(Product::Sweet, 40), (Product::Cake, 28), (Product::Bread, 32)],
            &[(Product::Sweet, 24), (Product::Cake, 8), (Product::Bread, 8)],
        );
        let plan = ManagementActor::plan_reallocation(&ledger).unwrap();
        assert_eq!(
            plan,
            Reallocation {
                from: crate::domain::ChefRole::Cake,
                to: crate::domain::ChefRole::Sweet,
                count: 1,
            }
        );
    }

    #[test]
    fn bread_demand_triggers_no_reallocation() {
        // Bread runs hottest but is baker territory.
        let ledger = ledger_with(
            &[(Product::Bread, 10), (Product::Cake, 30)],
            &[(Product::Bread, 10), (Product::Cake, 2)],
        );
        assert_eq!(ManagementActor::plan_reallocation(&ledger), None);
    }

    #[test]
    fn no_qualifying_donor_means_no_move() {
        // Sweet runs hot, but cake's oversupply sits below the 0.05 floor.
        let ledger = ledger_with(
            &[(Product::Sweet, 48), (Product::Cake, 52)],
            &[(Product::Sweet, 52), (Product::Cake, 48)],
        );
        assert_eq!(ManagementActor::plan_reallocation(&ledger), None);
    }

    #[test]
    fn empty_ledger_plans_nothing() {
        assert_eq!(
            ManagementActor::plan_reallocation(&Ledger::opened()),
            None
        );
    }

    #[test]
    fn closure_checks_fire_in_fixed_order() {
        let config = BakeryConfig::default();
        let mut ledger = Ledger::opened();
        for _ in 0..config.thresholds.frustrated_customers {
            ledger.record_frustration();
        }
        for _ in 0..config.thresholds.complained_customers {
            ledger.record_complaint();
        }
        // Both thresholds met; the frustration check is first.
        assert_eq!(
            ManagementActor::closure_cause(&ledger, &config),
            Some(ClosureCause::FrustratedCustomers)
        );
    }

    #[test]
    fn profit_target_closes_the_shop() {
        let config = BakeryConfig::default();
        let mut ledger = Ledger::opened();
        for _ in 0..2000 {
            ledger.record_production(Product::Cake);
        }
        ledger.record_sale(Product::Cake, 2000, 1.0);
        assert!(ledger.total_profit() >= config.thresholds.total_profit);
        assert_eq!(
            ManagementActor::closure_cause(&ledger, &config),
            Some(ClosureCause::ProfitTarget)
        );
    }

    #[test]
    fn quiet_ledger_stays_open() {
        let config = BakeryConfig::default();
        assert_eq!(
            ManagementActor::closure_cause(&Ledger::opened(), &config),
            None
        );
    }
}
