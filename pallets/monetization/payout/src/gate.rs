//! 函数级中文注释：资格门禁子模块
//!
//! 标准/即时双档位独立校验；报告一次性收集**全部**失败原因，
//! 可调用函数失败时取第一条映射为模块错误。

use super::*;
use crate::types::{EligibilityReport, GateReason, MAX_GATE_REASONS};

impl<T: Config> Pallet<T> {
    /// 函数级中文注释：当前天序号（创世起算，区块高度 / 每日区块数）
    pub fn current_day() -> u32 {
        let now: u64 = frame_system::Pallet::<T>::block_number().saturated_into();
        let per_day: u64 = T::BlocksPerDay::get().saturated_into();
        if per_day == 0 {
            return 0;
        }
        (now / per_day).saturated_into()
    }

    /// 函数级中文注释：当前月周期序号（30天一期）
    pub fn current_period() -> u32 {
        Self::current_day() / 30
    }

    /// 函数级中文注释：资格校验（只读，不改任何存储）
    ///
    /// 收集给定通道下的全部失败原因：
    /// - 通用：金额非零、国家支持所选服务商、可提现余额充足
    /// - 标准：最低金额、账龄、活跃度、日/月次数、风险分
    /// - 即时：单笔上限（账龄/活跃度/次数/风控刻意绕过）
    pub fn check_eligibility(
        who: &T::AccountId,
        channel: WithdrawalChannel,
        amount: BalanceOf<T>,
        provider: PayoutProvider,
    ) -> EligibilityReport<BalanceOf<T>> {
        let mut reasons: BoundedVec<GateReason<BalanceOf<T>>, ConstU32<MAX_GATE_REASONS>> =
            BoundedVec::new();
        let mut push = |reason: GateReason<BalanceOf<T>>| {
            let _ = reasons.try_push(reason);
        };

        if amount.is_zero() {
            push(GateReason::ZeroAmount);
        }

        let country = T::RegionProvider::region_of(who);
        if !CountryProviders::<T>::get(country).contains(&provider) {
            push(GateReason::ProviderNotSupported);
        }

        let available = T::Ledger::available_balance(who);
        if available < amount {
            push(GateReason::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        match channel {
            WithdrawalChannel::Standard => {
                let minimum = T::MinWithdrawal::get();
                if amount < minimum {
                    push(GateReason::BelowMinimum {
                        requested: amount,
                        minimum,
                    });
                }

                let age_days = T::Ledger::account_age_days(who);
                let required_days = T::MinAccountAgeDays::get();
                if age_days < required_days {
                    push(GateReason::AccountTooYoung {
                        age_days,
                        required_days,
                    });
                }

                let count = T::Ledger::activity_count(who);
                let required = T::MinActivityCount::get();
                if count < required {
                    push(GateReason::TooFewActivities { count, required });
                }

                let daily = DailyWithdrawals::<T>::get(who, Self::current_day());
                let daily_limit = T::MaxDailyWithdrawals::get();
                if daily >= daily_limit {
                    push(GateReason::DailyLimitReached {
                        count: daily,
                        limit: daily_limit,
                    });
                }

                let monthly = MonthlyWithdrawals::<T>::get(who, Self::current_period());
                let monthly_limit = T::MaxMonthlyWithdrawals::get();
                if monthly >= monthly_limit {
                    push(GateReason::MonthlyLimitReached {
                        count: monthly,
                        limit: monthly_limit,
                    });
                }

                let score = T::Risk::risk_score(who);
                let maximum = T::MaxRiskScore::get();
                if score > maximum {
                    push(GateReason::RiskScoreTooHigh { score, maximum });
                }
            }
            WithdrawalChannel::Instant => {
                let maximum = T::MaxInstantWithdrawal::get();
                if amount > maximum {
                    push(GateReason::AboveInstantMax {
                        requested: amount,
                        maximum,
                    });
                }
            }
        }

        EligibilityReport::from_reasons(reasons)
    }

    /// 函数级中文注释：资格校验并在失败时返回模块错误
    ///
    /// 全部原因先落日志（便于排查），再取第一条映射为 DispatchError。
    pub(crate) fn ensure_eligible(
        who: &T::AccountId,
        channel: WithdrawalChannel,
        amount: BalanceOf<T>,
        provider: PayoutProvider,
    ) -> DispatchResult {
        let report = Self::check_eligibility(who, channel, amount, provider);
        if report.eligible {
            return Ok(());
        }

        for reason in report.reasons.iter() {
            log::debug!(
                target: LOG_TARGET,
                "withdrawal gate rejected: {}",
                reason.message()
            );
        }

        let first = report
            .reasons
            .first()
            .copied()
            .unwrap_or(GateReason::ZeroAmount);
        Err(Self::gate_error(first).into())
    }

    /// 函数级中文注释：失败原因 → 模块错误 映射
    fn gate_error(reason: GateReason<BalanceOf<T>>) -> Error<T> {
        match reason {
            GateReason::ZeroAmount => Error::<T>::ZeroAmount,
            GateReason::BelowMinimum { .. } => Error::<T>::BelowMinimum,
            GateReason::AboveInstantMax { .. } => Error::<T>::AboveInstantMax,
            GateReason::InsufficientBalance { .. } => Error::<T>::InsufficientAvailable,
            GateReason::AccountTooYoung { .. } => Error::<T>::AccountTooYoung,
            GateReason::TooFewActivities { .. } => Error::<T>::TooFewActivities,
            GateReason::DailyLimitReached { .. } => Error::<T>::DailyLimitReached,
            GateReason::MonthlyLimitReached { .. } => Error::<T>::MonthlyLimitReached,
            GateReason::RiskScoreTooHigh { .. } => Error::<T>::RiskScoreTooHigh,
            GateReason::ProviderNotSupported => Error::<T>::ProviderNotSupported,
        }
    }
}
