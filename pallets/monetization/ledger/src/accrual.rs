//! 函数级中文注释：收益入账引擎子模块
//!
//! 功能：
//! - 活动守卫（观看时长、评论长度、去重）
//! - 费率换算（固定费率 / 按分钟 / CPM / 打赏金额）
//! - 日/月上限与单活动次数上限
//! - 账本原子更新与不变量校验
//!
//! 入账路径是事务性的：任何守卫或上限失败整笔回滚，
//! 不存在"有事件无余额更新"或反向的中间状态。

use super::*;
use crate::pallet::{
    BalanceOf, ChallengeDays, DailyActivityCounts, EarningEvents, Error, Event, Ledgers,
    NextEventId, Pallet, PollVotes, RecentEvents, ReferrerOf, RegionCpm, TotalAccrued,
};
use crate::types::{daily_count_cap, default_activity_rate, EarningEvent, DAYS_PER_PERIOD};
use sp_runtime::DispatchError;

/// 单块清理条数上限（每类）
pub(crate) const MAX_PRUNE_PER_BLOCK: usize = 50;

impl<T: Config> Pallet<T> {
    /// 函数级中文注释：当前天序号（区块高度 / 每日区块数）
    ///
    /// 日界等价于 UTC 午夜；计数器在跨天后的首次触达时惰性清零。
    pub fn current_day() -> u32 {
        let now: u64 = frame_system::Pallet::<T>::block_number().saturated_into();
        let per_day: u64 = T::BlocksPerDay::get().saturated_into();
        if per_day == 0 {
            return 0;
        }
        (now / per_day).saturated_into()
    }

    /// 函数级中文注释：查询活动费率（覆盖值优先，否则编译期缺省）
    pub fn activity_rate(activity: ActivityType) -> BalanceOf<T> {
        crate::pallet::ActivityRateOverrides::<T>::get(activity)
            .unwrap_or_else(|| default_activity_rate(activity).into())
    }

    /// 函数级中文注释：查询地区 CPM（无专属配置回退 DefaultCpm）
    pub fn cpm_for(region: &RegionCode) -> BalanceOf<T> {
        RegionCpm::<T>::get(region).unwrap_or_else(T::DefaultCpm::get)
    }

    /// 函数级中文注释：记录一笔收益活动（入账引擎主入口）
    ///
    /// 返回：新建收益事件ID
    pub fn do_record_activity(
        who: &T::AccountId,
        activity: ActivityType,
        reference: ActivityRef<T::AccountId>,
        quantity: u32,
    ) -> Result<u64, DispatchError> {
        let today = Self::current_day();

        // 活动守卫（不通过则无任何副作用）
        Self::check_guards(who, activity, &reference, quantity, today)?;

        // 费率换算
        let amount = Self::compute_amount(activity, quantity);

        // 上限校验 + 账本更新 + 事件创建
        let event_id = Self::accrue(who, activity, amount, reference.clone(), true)?;

        // 登记去重标记（与上面的入账同属一个事务）
        Self::note_dedup(who, activity, &reference, today);

        Self::deposit_event(Event::EarningRecorded {
            who: who.clone(),
            event_id,
            activity,
            amount,
        });

        Ok(event_id)
    }

    /// 函数级中文注释：按创作者地区 CPM 入账播放量分成
    ///
    /// 金额 = views × cpm(region) / 1000；创作者侧不受观看次数上限约束
    /// （次数上限针对观众侧防刷），日/月收益上限照常生效。
    pub fn do_record_views(
        creator: &T::AccountId,
        views: u32,
        video_id: u64,
    ) -> Result<u64, DispatchError> {
        let region = T::RegionProvider::region_of(creator);
        let cpm = Self::cpm_for(&region);
        let thousand: BalanceOf<T> = 1000u32.into();
        let amount = cpm.saturating_mul(views.into()) / thousand;

        let event_id = Self::accrue(
            creator,
            ActivityType::Watch,
            amount,
            ActivityRef::Video(video_id),
            false,
        )?;

        Self::deposit_event(Event::ViewRevenueRecorded {
            creator: creator.clone(),
            event_id,
            views,
            amount,
        });

        Ok(event_id)
    }

    /// 函数级中文注释：活动守卫
    ///
    /// 全部为只读校验：
    /// - Watch: 观看时长 ≥ MinWatchSeconds
    /// - Comment: 评论长度 ≥ MinCommentLen
    /// - Invite: 引用必填、不可自邀、被邀请人未被邀请过
    /// - PollVote: 同一投票只计一次
    /// - Challenge: 同一挑战每日只计一次
    /// - Gift/Tip: 金额非零
    fn check_guards(
        who: &T::AccountId,
        activity: ActivityType,
        reference: &ActivityRef<T::AccountId>,
        quantity: u32,
        today: u32,
    ) -> DispatchResult {
        match activity {
            ActivityType::Watch => {
                ensure!(quantity >= T::MinWatchSeconds::get(), Error::<T>::WatchTooShort);
            }
            ActivityType::Comment => {
                ensure!(quantity >= T::MinCommentLen::get(), Error::<T>::CommentTooShort);
            }
            ActivityType::Invite => {
                let referred = match reference {
                    ActivityRef::Referred(r) => r,
                    _ => return Err(Error::<T>::MissingReference.into()),
                };
                ensure!(referred != who, Error::<T>::CannotReferSelf);
                ensure!(
                    !ReferrerOf::<T>::contains_key(referred),
                    Error::<T>::AlreadyReferred
                );
            }
            ActivityType::PollVote => {
                let poll_id = match reference {
                    ActivityRef::Poll(id) => *id,
                    _ => return Err(Error::<T>::MissingReference.into()),
                };
                ensure!(
                    !PollVotes::<T>::contains_key(who, poll_id),
                    Error::<T>::DuplicatePollVote
                );
            }
            ActivityType::Challenge => {
                let challenge_id = match reference {
                    ActivityRef::Challenge(id) => *id,
                    _ => return Err(Error::<T>::MissingReference.into()),
                };
                ensure!(
                    !ChallengeDays::<T>::contains_key(who, (today, challenge_id)),
                    Error::<T>::DuplicateChallengeToday
                );
            }
            ActivityType::Gift | ActivityType::Tip => {
                ensure!(quantity > 0, Error::<T>::ZeroAmount);
            }
            _ => {}
        }

        Ok(())
    }

    /// 函数级中文注释：费率换算
    ///
    /// - LiveWatch: 每分钟费率 × 分钟数
    /// - Gift/Tip: 金额即打赏金额（quantity，美分）
    /// - 其余: 策略表固定费率
    fn compute_amount(activity: ActivityType, quantity: u32) -> BalanceOf<T> {
        match activity {
            ActivityType::LiveWatch => {
                Self::activity_rate(activity).saturating_mul(quantity.into())
            }
            ActivityType::Gift | ActivityType::Tip => quantity.into(),
            _ => Self::activity_rate(activity),
        }
    }

    /// 函数级中文注释：上限校验 + 账本原子更新 + 事件创建（共享入账路径）
    ///
    /// 顺序：跨天/跨期惰性清零 → 日收益上限 → 月收益上限 →
    /// 单活动次数上限（仅观众侧）→ 写账本 → 建事件。
    /// 任一步失败整笔回滚。
    fn accrue(
        who: &T::AccountId,
        activity: ActivityType,
        amount: BalanceOf<T>,
        reference: ActivityRef<T::AccountId>,
        enforce_count_cap: bool,
    ) -> Result<u64, DispatchError> {
        let today = Self::current_day();
        let period = today / DAYS_PER_PERIOD;
        let requires_review = activity.requires_review();

        Ledgers::<T>::try_mutate(who, |ledger| -> DispatchResult {
            // 跨天/跨期惰性清零
            if ledger.daily_day != today {
                ledger.daily_day = today;
                ledger.daily_earned = Zero::zero();
            }
            if ledger.monthly_period != period {
                ledger.monthly_period = period;
                ledger.monthly_earned = Zero::zero();
            }

            // 日收益上限
            let new_daily = ledger.daily_earned.saturating_add(amount);
            ensure!(
                new_daily <= T::MaxDailyEarnings::get(),
                Error::<T>::DailyEarningsCapReached
            );

            // 月收益上限
            let new_monthly = ledger.monthly_earned.saturating_add(amount);
            ensure!(
                new_monthly <= T::MaxMonthlyEarnings::get(),
                Error::<T>::MonthlyEarningsCapReached
            );

            // 单活动每日次数上限（观众侧防刷）
            if enforce_count_cap {
                let count = DailyActivityCounts::<T>::get(who, (today, activity));
                ensure!(count < daily_count_cap(activity), Error::<T>::DailyActivityCapReached);
            }

            // 写账本：入账与余额更新同一事务
            ledger.total_earned = ledger.total_earned.saturating_add(amount);
            ledger.pending_balance = ledger.pending_balance.saturating_add(amount);
            if requires_review {
                ledger.unverified = ledger.unverified.saturating_add(amount);
            }
            ledger.daily_earned = new_daily;
            ledger.monthly_earned = new_monthly;
            ledger.activity_count = ledger.activity_count.saturating_add(1);
            if !ledger.has_activity {
                ledger.has_activity = true;
                ledger.first_seen_day = today;
            }

            Self::check_invariants(who, ledger)
        })?;

        if enforce_count_cap {
            DailyActivityCounts::<T>::mutate(who, (today, activity), |c| {
                *c = c.saturating_add(1)
            });
        }

        // 创建收益事件
        let event_id = NextEventId::<T>::get();
        let status = if requires_review {
            EarningStatus::PendingReview
        } else {
            EarningStatus::Completed
        };
        let event = EarningEvent {
            id: event_id,
            who: who.clone(),
            activity,
            amount,
            reference,
            status,
            day: today,
        };
        EarningEvents::<T>::insert(event_id, event);
        NextEventId::<T>::put(event_id.saturating_add(1));

        // 近期事件索引（满则淘汰最旧）
        RecentEvents::<T>::mutate(who, |events| {
            if events.try_push(event_id).is_err() {
                events.remove(0);
                let _ = events.try_push(event_id);
            }
        });

        TotalAccrued::<T>::mutate(|total| *total = total.saturating_add(amount));

        Ok(event_id)
    }

    /// 函数级中文注释：清理过期的日计数与挑战去重标记（on_idle 周期执行）
    ///
    /// 日界之前的条目不再参与任何判定，定期移除防止状态无限增长，
    /// 单块处理条数有界。投票去重（PollVotes）是终身标记，刻意不清理。
    pub(crate) fn prune_stale_counters() -> Weight {
        let today = Self::current_day();
        let mut removed: u64 = 0;

        let stale_counts: sp_std::vec::Vec<_> = DailyActivityCounts::<T>::iter()
            .filter(|(_, (day, _), _)| *day < today)
            .map(|(who, key, _)| (who, key))
            .take(MAX_PRUNE_PER_BLOCK)
            .collect();
        for (who, key) in stale_counts {
            DailyActivityCounts::<T>::remove(&who, key);
            removed = removed.saturating_add(1);
        }

        let stale_challenges: sp_std::vec::Vec<_> = ChallengeDays::<T>::iter()
            .filter(|(_, (day, _), _)| *day < today)
            .map(|(who, key, _)| (who, key))
            .take(MAX_PRUNE_PER_BLOCK)
            .collect();
        for (who, key) in stale_challenges {
            ChallengeDays::<T>::remove(&who, key);
            removed = removed.saturating_add(1);
        }

        Weight::from_parts(
            10_000u64.saturating_add(15_000u64.saturating_mul(removed)),
            0,
        )
    }

    /// 函数级中文注释：登记去重标记（守卫通过、入账成功后调用）
    fn note_dedup(
        who: &T::AccountId,
        activity: ActivityType,
        reference: &ActivityRef<T::AccountId>,
        today: u32,
    ) {
        match (activity, reference) {
            (ActivityType::Invite, ActivityRef::Referred(referred)) => {
                ReferrerOf::<T>::insert(referred, who);
            }
            (ActivityType::PollVote, ActivityRef::Poll(id)) => {
                PollVotes::<T>::insert(who, *id, ());
            }
            (ActivityType::Challenge, ActivityRef::Challenge(id)) => {
                ChallengeDays::<T>::insert(who, (today, *id), ());
            }
            _ => {}
        }
    }

    /// 函数级中文注释：账本不变量校验
    ///
    /// `pending == total_earned - total_withdrawn`、`locked ≤ pending`、
    /// `unverified ≤ pending`。违反说明存在并发控制或程序缺陷，
    /// 记录 error 日志并回滚，绝不作为普通业务错误展示给用户。
    pub(crate) fn check_invariants(
        who: &T::AccountId,
        ledger: &crate::types::UserLedger<BalanceOf<T>>,
    ) -> DispatchResult {
        let expected_pending = ledger
            .total_earned
            .checked_sub(&ledger.total_withdrawn)
            .ok_or_else(|| Self::ledger_corrupted(who))?;

        if ledger.pending_balance != expected_pending
            || ledger.locked > ledger.pending_balance
            || ledger.unverified > ledger.pending_balance
        {
            return Err(Self::ledger_corrupted(who));
        }

        Ok(())
    }

    /// 函数级中文注释：不变量违约的统一出口（error 日志 + 致命错误码）
    pub(crate) fn ledger_corrupted(who: &T::AccountId) -> DispatchError {
        log::error!(
            target: LOG_TARGET,
            "ledger invariant violated for {:?}, aborting mutation",
            who
        );
        Error::<T>::LedgerInconsistent.into()
    }
}
