//! Folding session history into balances.

use tracing::error;

use crate::domain::bills::{bill_flow, check_bill_group};
use crate::domain::players::{PlayerIndex, ProfileId};
use crate::domain::round::Points;
use crate::domain::settlement::{settle, Balances, Transaction};
use crate::domain::state::SessionState;
use crate::errors::domain::{ConsistencyKind, DomainError, ValidationKind};

impl SessionState {
    /// Verify every stored round before anything is folded from it.
    pub fn check_consistency(&self) -> Result<(), DomainError> {
        for (position, result) in self.results.iter().enumerate() {
            if let Err(err) = result.check_consistency(position) {
                error!(round = position, error = %err, "Stored round is corrupt");
                return Err(err);
            }
            if let Some(stray) = result.players.iter().find(|s| self.player(s.index).is_none()) {
                error!(round = position, player = stray.index, "Round references unknown player");
                return Err(DomainError::consistency(
                    ConsistencyKind::MalformedRound,
                    format!("round {position}: player {} is not in the roster", stray.index),
                ));
            }
        }
        for (transaction_id, group) in &self.bill_table {
            let unknown = group.iter().find_map(|b| {
                [&b.payer, &b.debtor]
                    .into_iter()
                    .find(|id| self.player_by_profile(id).is_none())
            });
            let shape = check_bill_group(group).err().map(|e| e.to_string());
            if let Some(detail) = shape.or(unknown.map(|id| format!("unknown profile {id}"))) {
                error!(transaction = %transaction_id, %detail, "Stored bill is corrupt");
                return Err(DomainError::consistency(
                    ConsistencyKind::Other("bill".into()),
                    format!("bill {transaction_id}: {detail}"),
                ));
            }
        }
        Ok(())
    }

    /// Cumulative round score per player, in roster order.
    ///
    /// Each round's score is looked up through that round's own snapshot,
    /// so players absent from a round simply contribute nothing to it.
    pub fn compute_totals(&self) -> Result<Balances<PlayerIndex>, DomainError> {
        self.check_consistency()?;
        let mut totals: Balances<PlayerIndex> =
            self.players.iter().map(|p| (p.index, 0)).collect();
        for result in &self.results {
            for (slot, snap) in result.players.iter().enumerate() {
                if let Some(total) = totals.get_mut(&snap.index) {
                    *total = add_points(*total, result.scores[slot])?;
                }
            }
        }
        Ok(totals)
    }

    /// Currency balance per profile: round totals scaled by the unit
    /// multiplier, plus the flows of every recorded bill.
    pub fn compute_net_balances(&self) -> Result<Balances<ProfileId>, DomainError> {
        let totals = self.compute_totals()?;
        let unit = self.setting.unit();
        let mut balances: Balances<ProfileId> = Balances::new();
        for player in &self.players {
            let points = totals.get(&player.index).unwrap_or(0);
            let mut amount = points.checked_mul(unit).ok_or_else(overflow)?;
            for group in self.bill_table.values() {
                amount = add_points(amount, bill_flow(group, &player.profile_id)?)?;
            }
            balances.credit(player.profile_id.clone(), amount)?;
        }
        Ok(balances)
    }

    /// Settlement of round totals, in points.
    pub fn settle_scores(&self) -> Result<Vec<Transaction<PlayerIndex>>, DomainError> {
        settle(&self.compute_totals()?)
    }

    /// Settlement of net balances, in currency.
    pub fn settle_net_balances(&self) -> Result<Vec<Transaction<ProfileId>>, DomainError> {
        settle(&self.compute_net_balances()?)
    }
}

fn add_points(a: Points, b: Points) -> Result<Points, DomainError> {
    a.checked_add(b).ok_or_else(overflow)
}

fn overflow() -> DomainError {
    DomainError::validation(ValidationKind::Overflow, "balance overflow")
}
