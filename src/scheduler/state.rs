use super::types::{BudgetUnderflow, CarryOver, MemberLedger};
use crate::model::{Member, RestBudget, Rotation, Streaks};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// État mutable d'un membre pendant une génération.
#[derive(Debug, Clone)]
pub(super) struct MemberState {
    pub starting_budget: RestBudget,
    pub budget: RestBudget,
    pub consumed: RestBudget,
    pub streaks: Streaks,
    pub work_days: u32,
    pub rest_days: u32,
}

impl MemberState {
    /// Le report explicite prime sur les champs du membre.
    pub fn seed(member: &Member, carry: &CarryOver) -> Self {
        let budget = carry
            .initial_budgets
            .get(&member.id)
            .copied()
            .unwrap_or(member.budget);
        let streaks = carry
            .initial_streaks
            .get(&member.id)
            .copied()
            .unwrap_or(member.streaks);
        Self {
            starting_budget: budget,
            budget,
            consumed: RestBudget::default(),
            streaks,
            work_days: 0,
            rest_days: 0,
        }
    }

    pub fn work(&mut self, rotation: Rotation) {
        *self.streaks.get_mut(rotation) = 0;
        self.work_days += 1;
    }

    /// Incrémente la série ; renvoie sa nouvelle valeur.
    pub fn rest(&mut self, rotation: Rotation) -> u32 {
        let streak = self.streaks.get_mut(rotation);
        *streak += 1;
        self.rest_days += 1;
        *streak
    }

    /// Débite le solde de l'escala selon la politique de découvert.
    ///
    /// `consumed` reçoit exactement ce qui a été retiré de `budget`.
    pub fn debit(
        &mut self,
        member: &Member,
        date: NaiveDate,
        rotation: Rotation,
        amount: Decimal,
        allow_overdraft: bool,
    ) -> Option<BudgetUnderflow> {
        let before = self.budget.get(rotation);
        let applied = if allow_overdraft {
            amount
        } else {
            amount.min(before.max(Decimal::ZERO))
        };
        let after = before - applied;
        *self.budget.get_mut(rotation) = after;
        *self.consumed.get_mut(rotation) += applied;

        let shortfall = if allow_overdraft {
            if after < Decimal::ZERO {
                amount.min(-after)
            } else {
                Decimal::ZERO
            }
        } else {
            amount - applied
        };

        if shortfall > Decimal::ZERO {
            Some(BudgetUnderflow {
                member: member.id.clone(),
                date,
                rotation,
                requested: amount,
                shortfall,
                balance: after,
            })
        } else {
            None
        }
    }

    pub fn into_ledger(self, member: &Member) -> MemberLedger {
        MemberLedger {
            member: member.id.clone(),
            starting_budget: self.starting_budget,
            budget: self.budget,
            consumed: self.consumed,
            streaks: self.streaks,
            work_days: self.work_days,
            rest_days: self.rest_days,
        }
    }
}
