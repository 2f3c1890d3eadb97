//! 函数级中文注释：支付路由子模块
//!
//! 请求创建 → 锁定毛额 → 计算费用 → 同步派发网关 → 按标签结果落状态。
//! 账本借记/解锁统一走 reconcile 子模块的 finalize 入口。

use super::*;
use crate::types::{Destination, WithdrawalRequest, FEE_BPS_DENOMINATOR};

impl<T: Config> Pallet<T> {
    /// 函数级中文注释：服务商费率（基点；无专属覆盖回退缺省费率）
    pub fn fee_bps_for(provider: PayoutProvider) -> u32 {
        ProviderFeeOverrides::<T>::get(provider).unwrap_or_else(T::DefaultFeeBps::get)
    }

    /// 函数级中文注释：计算手续费（毛额 × 基点 / 10000，向下取整）
    ///
    /// 手续费从毛额中吸收：账本按毛额扣减，网关派发净额。
    pub fn fee_for(provider: PayoutProvider, amount: BalanceOf<T>) -> BalanceOf<T> {
        let bps: BalanceOf<T> = Self::fee_bps_for(provider).into();
        let denominator: BalanceOf<T> = FEE_BPS_DENOMINATOR.into();
        amount.saturating_mul(bps) / denominator
    }

    /// 函数级中文注释：提现主流程（标准/即时共用）
    ///
    /// ## 流程
    /// 1. 收款标识长度校验
    /// 2. 资格门禁（通道档位独立）
    /// 3. 创建请求 + 锁定毛额（失败自动回滚整笔外部调用）
    /// 4. 标准通道计入日/月频次
    /// 5. 派发网关，按带标签结果落状态：
    ///    - Accepted → Completed（借记恰好一次）
    ///    - Rejected → Failed（解锁，账本未动）
    ///    - TimedOut → 即时按 Failed 处理；标准保持 Processing 入对账队列
    pub(crate) fn do_initiate_withdrawal(
        who: &T::AccountId,
        channel: WithdrawalChannel,
        amount: BalanceOf<T>,
        provider: PayoutProvider,
        destination: sp_std::vec::Vec<u8>,
    ) -> Result<u64, sp_runtime::DispatchError> {
        let destination: Destination = destination
            .try_into()
            .map_err(|_| Error::<T>::DestinationTooLong)?;

        Self::ensure_eligible(who, channel, amount, provider)?;

        let fee = Self::fee_for(provider, amount);
        let net_amount = amount.saturating_sub(fee);
        let country = T::RegionProvider::region_of(who);
        let now: u64 = frame_system::Pallet::<T>::block_number().saturated_into();

        // 锁定毛额：后续请求看到的可提现余额已扣除本笔
        T::Ledger::lock(who, amount)?;

        let id = NextRequestId::<T>::get();
        NextRequestId::<T>::put(id.saturating_add(1));

        let request = WithdrawalRequest {
            id,
            who: who.clone(),
            channel,
            amount,
            fee,
            net_amount,
            country,
            provider,
            destination: destination.clone(),
            status: WithdrawalStatus::Pending,
            transaction_id: None,
            failure: None,
            created_at: now,
            dispatched_at: None,
            resolved_at: None,
        };
        Requests::<T>::insert(id, &request);
        Self::note_user_request(who, id);

        if channel == WithdrawalChannel::Standard {
            DailyWithdrawals::<T>::mutate(who, Self::current_day(), |c| {
                *c = c.saturating_add(1)
            });
            MonthlyWithdrawals::<T>::mutate(who, Self::current_period(), |c| {
                *c = c.saturating_add(1)
            });
        }

        T::Notifier::notify(who, PayoutNotice::Initiated, amount, provider);

        Self::deposit_event(Event::WithdrawalRequested {
            id,
            who: who.clone(),
            channel,
            amount,
            fee,
            provider,
        });

        // 派发网关（同步有界调用）；先落 Processing 再匹配结果
        Requests::<T>::mutate(id, |maybe| {
            if let Some(req) = maybe {
                req.status = WithdrawalStatus::Processing;
                req.dispatched_at = Some(now);
            }
        });

        match T::Gateway::dispatch(provider, destination.as_slice(), net_amount, id) {
            DispatchOutcome::Accepted { transaction_id } => {
                Self::finalize_success(id, Some(transaction_id))?;
            }
            DispatchOutcome::Rejected { code } => {
                Self::finalize_failure(id, code)?;
            }
            DispatchOutcome::TimedOut => match channel {
                // 即时通道承诺同步落终态：超时按可重试失败处理
                WithdrawalChannel::Instant => {
                    Self::finalize_failure(id, GatewayErrorCode::Timeout)?;
                }
                // 标准通道保持 Processing，交给对账扫描定夺
                WithdrawalChannel::Standard => {
                    Self::enqueue_in_flight(id);
                }
            },
        }

        Ok(id)
    }

    /// 函数级中文注释：记录用户近期请求索引（满则淘汰最旧）
    fn note_user_request(who: &T::AccountId, id: u64) {
        UserRequests::<T>::mutate(who, |ids| {
            if ids.try_push(id).is_err() {
                ids.remove(0);
                let _ = ids.try_push(id);
            }
        });
    }

    /// 函数级中文注释：请求入对账队列
    ///
    /// 队列满时不回滚（网关调用已发生），仅落错误日志，
    /// 请求保持 Processing，由运营经 force_reconcile 兜底。
    fn enqueue_in_flight(id: u64) {
        InFlight::<T>::mutate(|queue| {
            if queue.try_push(id).is_err() {
                log::error!(
                    target: LOG_TARGET,
                    "in-flight queue full, request {} requires manual reconciliation",
                    id
                );
            }
        });
    }
}
