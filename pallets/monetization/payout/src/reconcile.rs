//! 函数级中文注释：状态机终态与对账子模块
//!
//! finalize_success / finalize_failure 是状态机仅有的两个终态入口，
//! 均幂等：已终态的请求重复调用是空操作，不会二次借记/解锁。
//! 对账扫描在 on_idle 处理派发后超时的 Processing 请求。

use super::*;
use monetization_common::TransactionId;

/// 单块清理条数上限（每类）
pub(crate) const MAX_PRUNE_PER_BLOCK: usize = 50;

impl<T: Config> Pallet<T> {
    /// 函数级中文注释：提现成功终态（账本唯一借记路径）
    ///
    /// 同一事务内：状态 → Completed、借记毛额、累计统计、移出对账队列。
    /// 已终态请求直接返回 Ok（幂等，绝不二次借记）。
    pub(crate) fn finalize_success(
        id: u64,
        transaction_id: Option<TransactionId>,
    ) -> DispatchResult {
        let request = Requests::<T>::get(id).ok_or(Error::<T>::RequestNotFound)?;
        if request.status.is_terminal() {
            return Ok(());
        }

        T::Ledger::settle_debit(&request.who, request.amount)?;

        let now: u64 = frame_system::Pallet::<T>::block_number().saturated_into();
        Requests::<T>::mutate(id, |maybe| {
            if let Some(req) = maybe {
                req.status = WithdrawalStatus::Completed;
                req.transaction_id = transaction_id;
                req.resolved_at = Some(now);
            }
        });

        TotalPaidOut::<T>::mutate(|t| *t = t.saturating_add(request.amount));
        TotalFeesCharged::<T>::mutate(|t| *t = t.saturating_add(request.fee));
        Self::remove_in_flight(id);

        T::Notifier::notify(
            &request.who,
            PayoutNotice::Success,
            request.amount,
            request.provider,
        );

        Self::deposit_event(Event::WithdrawalCompleted {
            id,
            who: request.who,
            amount: request.amount,
            net_amount: request.net_amount,
        });

        Ok(())
    }

    /// 函数级中文注释：提现失败终态（账本分文不动）
    ///
    /// 解锁毛额，资金留在 pending 可再次提现；记录错误码供重试判定。
    /// 已终态请求直接返回 Ok（幂等）。
    pub(crate) fn finalize_failure(id: u64, code: GatewayErrorCode) -> DispatchResult {
        let request = Requests::<T>::get(id).ok_or(Error::<T>::RequestNotFound)?;
        if request.status.is_terminal() {
            return Ok(());
        }

        T::Ledger::unlock(&request.who, request.amount)?;

        let now: u64 = frame_system::Pallet::<T>::block_number().saturated_into();
        Requests::<T>::mutate(id, |maybe| {
            if let Some(req) = maybe {
                req.status = WithdrawalStatus::Failed;
                req.failure = Some(code);
                req.resolved_at = Some(now);
            }
        });

        Self::remove_in_flight(id);

        T::Notifier::notify(
            &request.who,
            PayoutNotice::Failed,
            request.amount,
            request.provider,
        );

        Self::deposit_event(Event::WithdrawalFailed {
            id,
            who: request.who,
            code,
            retryable: code.is_retryable(),
        });

        Ok(())
    }

    /// 函数级中文注释：对账一笔 Processing 请求
    ///
    /// 向网关查询真实状态：
    /// - Confirmed → 成功终态（超时但实际到账，避免漏付）
    /// - Failed → 失败终态（实际失败，避免重付）
    /// - Unknown → 按可重试的超时失败处理，资金解锁归还用户
    pub(crate) fn reconcile_request(id: u64) -> DispatchResult {
        let request = Requests::<T>::get(id).ok_or(Error::<T>::RequestNotFound)?;
        ensure!(
            request.status == WithdrawalStatus::Processing,
            Error::<T>::NotProcessing
        );

        let completed = match T::Gateway::query_status(request.provider, id) {
            GatewayStatus::Confirmed { transaction_id } => {
                Self::finalize_success(id, Some(transaction_id))?;
                true
            }
            GatewayStatus::Failed { code } => {
                Self::finalize_failure(id, code)?;
                false
            }
            GatewayStatus::Unknown => {
                log::warn!(
                    target: LOG_TARGET,
                    "gateway cannot confirm request {}, releasing funds as timed out",
                    id
                );
                Self::finalize_failure(id, GatewayErrorCode::Timeout)?;
                false
            }
        };

        Self::deposit_event(Event::WithdrawalReconciled { id, completed });

        Ok(())
    }

    /// 函数级中文注释：对账扫描（on_idle 周期执行）
    ///
    /// 遍历在途队列，处理派发后超过超时区块数的请求，
    /// 单块处理条数受 MaxReconcilePerBlock 约束。
    pub(crate) fn reconcile_stale(now: BlockNumberFor<T>) -> Weight {
        let now_block: u64 = now.saturated_into();
        let timeout: u64 = T::ProcessingTimeoutBlocks::get().saturated_into();
        let max = T::MaxReconcilePerBlock::get();

        let queue = InFlight::<T>::get();
        let mut processed: u32 = 0;

        for id in queue.iter() {
            if processed >= max {
                break;
            }

            let stale = Requests::<T>::get(*id)
                .and_then(|req| req.dispatched_at)
                .map(|at| now_block >= at.saturating_add(timeout))
                .unwrap_or(false);
            if !stale {
                continue;
            }

            if let Err(e) = Self::reconcile_request(*id) {
                log::warn!(
                    target: LOG_TARGET,
                    "reconciliation of request {} failed: {:?}",
                    id,
                    e
                );
                // 不可对账的请求移出队列，避免每块重复扫描
                Self::remove_in_flight(*id);
            }
            processed = processed.saturating_add(1);
        }

        Weight::from_parts(
            50_000u64.saturating_add(40_000u64.saturating_mul(processed as u64)),
            0,
        )
    }

    /// 函数级中文注释：清理过期的提现频次计数（on_idle 周期执行）
    ///
    /// 日界/周期之前的计数不再参与资格判定，定期移除防止状态无限增长，
    /// 单块处理条数有界。
    pub(crate) fn prune_stale_counters() -> Weight {
        let today = Self::current_day();
        let period = Self::current_period();
        let mut removed: u64 = 0;

        let stale_daily: sp_std::vec::Vec<_> = DailyWithdrawals::<T>::iter()
            .filter(|(_, day, _)| *day < today)
            .map(|(who, day, _)| (who, day))
            .take(MAX_PRUNE_PER_BLOCK)
            .collect();
        for (who, day) in stale_daily {
            DailyWithdrawals::<T>::remove(&who, day);
            removed = removed.saturating_add(1);
        }

        let stale_monthly: sp_std::vec::Vec<_> = MonthlyWithdrawals::<T>::iter()
            .filter(|(_, p, _)| *p < period)
            .map(|(who, p, _)| (who, p))
            .take(MAX_PRUNE_PER_BLOCK)
            .collect();
        for (who, p) in stale_monthly {
            MonthlyWithdrawals::<T>::remove(&who, p);
            removed = removed.saturating_add(1);
        }

        Weight::from_parts(
            10_000u64.saturating_add(15_000u64.saturating_mul(removed)),
            0,
        )
    }

    /// 函数级中文注释：移出对账队列
    fn remove_in_flight(id: u64) {
        InFlight::<T>::mutate(|queue| {
            queue.retain(|x| *x != id);
        });
    }
}
