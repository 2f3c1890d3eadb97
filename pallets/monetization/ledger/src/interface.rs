//! 函数级中文注释：统一账本接口实现（CreatorLedger）
//!
//! payout pallet 经由本接口锁定/解锁/结算扣减；
//! 这是账本余额字段对外的唯一写入通道。

use super::*;
use crate::pallet::{BalanceOf, Ledgers, Pallet};
use monetization_common::CreatorLedger;
use sp_runtime::DispatchResult;

impl<T: Config> Pallet<T> {
    /// 函数级中文注释：可提现余额 = pending - 在途锁定 - 未审核
    pub fn withdrawable_of(who: &T::AccountId) -> BalanceOf<T> {
        let ledger = Ledgers::<T>::get(who);
        ledger
            .pending_balance
            .saturating_sub(ledger.locked)
            .saturating_sub(ledger.unverified)
    }

    /// 函数级中文注释：账龄（天，自首次收益活动起算；无活动为0）
    pub fn age_days_of(who: &T::AccountId) -> u32 {
        let ledger = Ledgers::<T>::get(who);
        if !ledger.has_activity {
            return 0;
        }
        Self::current_day().saturating_sub(ledger.first_seen_day)
    }
}

impl<T: Config> CreatorLedger<T::AccountId, BalanceOf<T>> for Pallet<T> {
    fn available_balance(who: &T::AccountId) -> BalanceOf<T> {
        Self::withdrawable_of(who)
    }

    /// 函数级中文注释：锁定在途提现金额（毛额）
    ///
    /// 锁定后，后续提现请求看到的可提现余额已扣除本笔，
    /// 同一用户的提现据此按提交顺序串行化、不可透支。
    fn lock(who: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
        Ledgers::<T>::try_mutate(who, |ledger| {
            let available = ledger
                .pending_balance
                .saturating_sub(ledger.locked)
                .saturating_sub(ledger.unverified);
            ensure!(available >= amount, Error::<T>::InsufficientAvailable);

            ledger.locked = ledger.locked.saturating_add(amount);
            Self::check_invariants(who, ledger)
        })
    }

    /// 函数级中文注释：解除锁定（提现失败，资金留在 pending）
    fn unlock(who: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
        Ledgers::<T>::try_mutate(who, |ledger| {
            // 解锁金额必须先前已锁定；否则是重复解锁缺陷
            ledger.locked = ledger
                .locked
                .checked_sub(&amount)
                .ok_or_else(|| Self::ledger_corrupted(who))?;
            Self::check_invariants(who, ledger)
        })
    }

    /// 函数级中文注释：结算扣减（提现成功，恰好一次）
    ///
    /// 要求金额已处于锁定状态；total_withdrawn 增加与 pending 减少
    /// 在同一事务内完成，这是账本唯一的借记入口。
    fn settle_debit(who: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
        Ledgers::<T>::try_mutate(who, |ledger| {
            ledger.locked = ledger
                .locked
                .checked_sub(&amount)
                .ok_or_else(|| Self::ledger_corrupted(who))?;
            ledger.pending_balance = ledger
                .pending_balance
                .checked_sub(&amount)
                .ok_or_else(|| Self::ledger_corrupted(who))?;
            ledger.total_withdrawn = ledger.total_withdrawn.saturating_add(amount);
            Self::check_invariants(who, ledger)
        })
    }

    fn activity_count(who: &T::AccountId) -> u32 {
        Ledgers::<T>::get(who).activity_count
    }

    fn account_age_days(who: &T::AccountId) -> u32 {
        Self::age_days_of(who)
    }
}
