#![cfg_attr(not(feature = "std"), no_std)]

//! # 创作者收益账本 (pallet-creator-ledger)
//!
//! ## 功能概述
//!
//! 本模块是创作者变现体系的记账核心，提供统一的收益入账解决方案：
//! - **地区定价策略表**：按地区配置 CPM（每千次播放，美分），按活动类型配置固定费率
//! - **收益入账引擎**：观看/点赞/评论/分享/邀请/直播/投票/挑战/任务/礼物/打赏 逐笔入账
//! - **上限与防刷**：日收益上限、月收益上限、单活动每日次数上限、活动守卫（观看时长、
//!   评论长度、重复投票、重复挑战、重复邀请）
//! - **两段式审核**：邀请/挑战收益先入账、审核通过后才计入可提现子额度
//! - **余额不变量**：`pending == total_earned - total_withdrawn` 每次变更后校验
//!
//! ## 架构设计
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  pallet-creator-ledger                   │
//! ├──────────────────────────────────────────────────────────┤
//! │  💰 收益入账引擎  →  accrual.rs                           │
//! │  ⚙️ 定价策略表    →  lib.rs (RegionCpm/ActivityRates)     │
//! │  🔐 账本接口      →  interface.rs (CreatorLedger impl)    │
//! │  📐 类型定义      →  types.rs                             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 所有权约定
//!
//! 账本字段（余额、收益事件）仅由本 pallet 写入；payout pallet 经由
//! `monetization_common::CreatorLedger` 接口进行锁定/扣减，其余组件只读。

pub use pallet::*;

pub mod types;
mod accrual;
mod interface;

#[cfg(test)]
mod mock;


use frame_support::pallet_prelude::*;
use frame_system::pallet_prelude::*;
use monetization_common::{ActivityRef, ActivityType, EarningStatus, RegionCode, RegionProvider};
use sp_runtime::traits::{CheckedSub, SaturatedConversion, Saturating, Zero};

/// 日志目标
pub(crate) const LOG_TARGET: &str = "creator-ledger";

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use frame_support::traits::Currency;

    /// 余额类型（最小货币单位，美分）
    pub type BalanceOf<T> =
        <<T as Config>::Currency as Currency<<T as frame_system::Config>::AccountId>>::Balance;

    /// 收益事件类型别名
    pub type EventOf<T> =
        types::EarningEvent<<T as frame_system::Config>::AccountId, BalanceOf<T>>;

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        /// 函数级中文注释：空闲时清理过期的防刷计数
        ///
        /// 日界之前的活动计数与挑战去重标记已不参与任何判定，
        /// 周期性移除，防止状态无限增长。
        fn on_idle(_now: BlockNumberFor<T>, remaining_weight: Weight) -> Weight {
            let base_weight = Weight::from_parts(25_000, 0);

            if remaining_weight.ref_time() > base_weight.ref_time() * 5 {
                Self::prune_stale_counters()
            } else {
                Weight::zero()
            }
        }
    }

    #[pallet::config]
    pub trait Config: frame_system::Config {
        /// 事件类型
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// 货币系统（仅取 Balance 类型作为记账单位）
        type Currency: Currency<Self::AccountId>;

        /// 管理员权限（策略表配置、审核确认、播放量上报）
        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// 身份/会话上下文：账户地区归属（CPM 定价依据）
        type RegionProvider: RegionProvider<Self::AccountId>;

        /// 每日区块数（假设6秒出块，1天≈14400块）
        #[pallet::constant]
        type BlocksPerDay: Get<BlockNumberFor<Self>>;

        /// 单用户每日收益上限（美分）
        #[pallet::constant]
        type MaxDailyEarnings: Get<BalanceOf<Self>>;

        /// 单用户每期（30天）收益上限（美分）
        #[pallet::constant]
        type MaxMonthlyEarnings: Get<BalanceOf<Self>>;

        /// 观看计入收益的最短时长（秒）
        #[pallet::constant]
        type MinWatchSeconds: Get<u32>;

        /// 评论计入收益的最短长度（字符）
        #[pallet::constant]
        type MinCommentLen: Get<u32>;

        /// 地区无专属配置时的缺省 CPM（美分/千次播放）
        #[pallet::constant]
        type DefaultCpm: Get<BalanceOf<Self>>;

        /// 单用户近期收益事件索引上限（历史查询窗口）
        #[pallet::constant]
        type MaxRecentEvents: Get<u32>;
    }

    // ========================================
    // 存储项
    // ========================================

    // === 账本存储（3个）===

    /// 用户账本：账户 → 余额与计数器
    #[pallet::storage]
    #[pallet::getter(fn ledgers)]
    pub type Ledgers<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, types::UserLedger<BalanceOf<T>>, ValueQuery>;

    /// 收益事件：事件ID → 事件记录（创建后不可变，仅状态可迁移）
    #[pallet::storage]
    #[pallet::getter(fn earning_events)]
    pub type EarningEvents<T: Config> = StorageMap<_, Twox64Concat, u64, EventOf<T>>;

    /// 下一个事件ID
    #[pallet::storage]
    pub type NextEventId<T: Config> = StorageValue<_, u64, ValueQuery>;

    /// 近期收益事件索引：账户 → 事件ID列表（满则淘汰最旧）
    #[pallet::storage]
    pub type RecentEvents<T: Config> = StorageMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        BoundedVec<u64, T::MaxRecentEvents>,
        ValueQuery,
    >;

    // === 防刷计数与去重存储（4个）===

    /// 单活动每日计数：(账户, (天序号, 活动类型)) → 次数
    #[pallet::storage]
    pub type DailyActivityCounts<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Twox64Concat,
        (u32, ActivityType),
        u32,
        ValueQuery,
    >;

    /// 邀请关系：被邀请账户 → 邀请人（同一账户只能被邀请一次）
    #[pallet::storage]
    pub type ReferrerOf<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, T::AccountId>;

    /// 投票去重：(账户, 投票ID) → ()
    #[pallet::storage]
    pub type PollVotes<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AccountId, Twox64Concat, u64, ()>;

    /// 挑战赛每日去重：(账户, (天序号, 挑战ID)) → ()
    #[pallet::storage]
    pub type ChallengeDays<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AccountId, Twox64Concat, (u32, u64), ()>;

    // === 定价策略表存储（2个）===

    /// 地区 CPM：地区编码 → 美分/千次播放（无记录时回退 DefaultCpm）
    #[pallet::storage]
    #[pallet::getter(fn region_cpm)]
    pub type RegionCpm<T: Config> = StorageMap<_, Twox64Concat, RegionCode, BalanceOf<T>>;

    /// 活动费率覆盖：活动类型 → 美分（无记录时用 types::default_activity_rate）
    #[pallet::storage]
    pub type ActivityRateOverrides<T: Config> =
        StorageMap<_, Twox64Concat, ActivityType, BalanceOf<T>>;

    // === 统计存储（1个）===

    /// 累计入账总额
    #[pallet::storage]
    pub type TotalAccrued<T: Config> = StorageValue<_, BalanceOf<T>, ValueQuery>;

    // ========================================
    // 事件
    // ========================================

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// 收益已入账
        EarningRecorded {
            who: T::AccountId,
            event_id: u64,
            activity: ActivityType,
            amount: BalanceOf<T>,
        },
        /// 播放量分成已入账（创作者侧 CPM 收益）
        ViewRevenueRecorded {
            creator: T::AccountId,
            event_id: u64,
            views: u32,
            amount: BalanceOf<T>,
        },
        /// 待审核收益已确认，计入可提现额度
        EarningVerified {
            event_id: u64,
            who: T::AccountId,
            amount: BalanceOf<T>,
        },
        /// 地区 CPM 已更新
        RegionCpmSet {
            region: RegionCode,
            cpm: BalanceOf<T>,
        },
        /// 活动费率已更新
        ActivityRateSet {
            activity: ActivityType,
            rate: BalanceOf<T>,
        },
    }

    // ========================================
    // 错误
    // ========================================

    #[pallet::error]
    pub enum Error<T> {
        // === 活动守卫错误 ===
        /// 观看时长不足30秒
        WatchTooShort,
        /// 评论长度不足3字符
        CommentTooShort,
        /// 重复投票
        DuplicatePollVote,
        /// 当日已参与该挑战
        DuplicateChallengeToday,
        /// 该用户已被邀请过
        AlreadyReferred,
        /// 不能邀请自己
        CannotReferSelf,
        /// 缺少必需的关联引用
        MissingReference,
        /// 金额为零（礼物/打赏）
        ZeroAmount,

        // === 上限错误 ===
        /// 已达当日收益上限
        DailyEarningsCapReached,
        /// 已达当期收益上限
        MonthlyEarningsCapReached,
        /// 已达该活动当日次数上限
        DailyActivityCapReached,

        // === 接口错误 ===
        /// 可提现余额不足（锁定失败）
        InsufficientAvailable,

        // === 审核错误 ===
        /// 收益事件不存在
        EventNotFound,
        /// 事件不处于待审核状态
        NotPendingReview,

        // === 账本错误（致命，指示程序缺陷，绝不作为普通业务错误暴露）===
        /// 账本不变量被破坏（记录 error 日志并回滚）
        LedgerInconsistent,
    }

    // ========================================
    // 可调用函数
    // ========================================

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        // === 收益入账接口（2个）===

        /// 函数级中文注释：记录一笔收益活动（签名方即收益归属方）
        ///
        /// 参数：
        /// - `activity`: 活动类型
        /// - `reference`: 关联引用（邀请/投票/挑战等活动必填对应变体）
        /// - `quantity`: 活动度量——Watch=观看秒数；LiveWatch=观看分钟数；
        ///   Comment=评论字符数；Gift/Tip=打赏金额（美分）；其余忽略
        ///
        /// 守卫失败或触达上限时整笔拒绝，不产生事件、不动余额。
        #[pallet::call_index(0)]
        #[pallet::weight(Weight::from_parts(25_000, 0))]
        pub fn record_activity(
            origin: OriginFor<T>,
            activity: ActivityType,
            reference: ActivityRef<T::AccountId>,
            quantity: u32,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;

            Self::do_record_activity(&who, activity, reference, quantity)?;

            Ok(())
        }

        /// 函数级中文注释：上报播放量，按创作者地区 CPM 入账分成
        ///
        /// 平台统计服务聚合后批量上报（AdminOrigin），
        /// 金额 = views × cpm(region) / 1000。
        #[pallet::call_index(1)]
        #[pallet::weight(Weight::from_parts(25_000, 0))]
        pub fn record_views(
            origin: OriginFor<T>,
            creator: T::AccountId,
            views: u32,
            video_id: u64,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            Self::do_record_views(&creator, views, video_id)?;

            Ok(())
        }

        // === 审核接口（1个）===

        /// 函数级中文注释：确认待审核收益（邀请/挑战），释放到可提现子额度
        #[pallet::call_index(2)]
        #[pallet::weight(Weight::from_parts(15_000, 0))]
        pub fn verify_event(origin: OriginFor<T>, event_id: u64) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            let mut event = EarningEvents::<T>::get(event_id).ok_or(Error::<T>::EventNotFound)?;
            ensure!(
                event.status == EarningStatus::PendingReview,
                Error::<T>::NotPendingReview
            );

            Ledgers::<T>::try_mutate(&event.who, |ledger| -> DispatchResult {
                ledger.unverified = ledger
                    .unverified
                    .checked_sub(&event.amount)
                    .ok_or_else(|| Self::ledger_corrupted(&event.who))?;
                Self::check_invariants(&event.who, ledger)
            })?;

            event.status = EarningStatus::Verified;
            let who = event.who.clone();
            let amount = event.amount;
            EarningEvents::<T>::insert(event_id, event);

            Self::deposit_event(Event::EarningVerified {
                event_id,
                who,
                amount,
            });

            Ok(())
        }

        // === 策略表配置接口（2个）===

        /// 函数级中文注释：设置地区 CPM（美分/千次播放）
        ///
        /// 策略表运行期只读，变更仅限 AdminOrigin（等价于配置发布）。
        #[pallet::call_index(10)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn set_region_cpm(
            origin: OriginFor<T>,
            region: RegionCode,
            cpm: BalanceOf<T>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            RegionCpm::<T>::insert(region, cpm);

            Self::deposit_event(Event::RegionCpmSet { region, cpm });

            Ok(())
        }

        /// 函数级中文注释：覆盖活动费率（美分）
        #[pallet::call_index(11)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn set_activity_rate(
            origin: OriginFor<T>,
            activity: ActivityType,
            rate: BalanceOf<T>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            ActivityRateOverrides::<T>::insert(activity, rate);

            Self::deposit_event(Event::ActivityRateSet { activity, rate });

            Ok(())
        }
    }
}
