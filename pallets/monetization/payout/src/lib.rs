#![cfg_attr(not(feature = "std"), no_std)]

//! # 创作者提现模块 (pallet-creator-payout)
//!
//! ## 功能概述
//!
//! 本模块整合了提现链路的三个环节，提供统一的出金解决方案：
//! - **资格门禁**：标准/即时双档位独立校验，一次性收集全部失败原因
//! - **支付路由**：国家 → 服务商列表校验、服务商费率计算、同步派发网关
//! - **提现状态机**：Pending → Processing → Completed | Failed 单向迁移，
//!   成功恰好一次借记账本，失败分文不动
//! - **对账扫描**：Processing 超时请求在 on_idle 周期性向网关查询真实状态，
//!   既不重付也不漏付
//!
//! ## 架构设计
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  pallet-creator-payout                   │
//! ├──────────────────────────────────────────────────────────┤
//! │  🚪 资格门禁      →  gate.rs                              │
//! │  🛣️ 支付路由      →  router.rs                            │
//! │  🔁 状态机/对账    →  reconcile.rs                         │
//! │  📐 类型定义      →  types.rs                             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 核心正确性属性
//!
//! 账本借记当且仅当网关确认转账成功，且恰好一次：
//! - 借记只发生在 `finalize_success`，且终态请求再次 finalize 是幂等空操作
//! - 失败/超时路径只解锁，不借记
//! - 在途请求锁定毛额，后续请求看到的余额已扣除锁定，不可透支

pub use pallet::*;

pub mod types;
mod gate;
mod router;
mod reconcile;

#[cfg(test)]
mod mock;


use frame_support::pallet_prelude::*;
use frame_system::pallet_prelude::*;
use monetization_common::{
    CreatorLedger, DispatchOutcome, GatewayErrorCode, GatewayStatus, PayoutGateway, PayoutNotice,
    PayoutNotifier, PayoutProvider, RegionCode, RegionProvider, RiskProvider, WithdrawalChannel,
    WithdrawalStatus,
};
use sp_runtime::traits::{SaturatedConversion, Saturating, Zero};

/// 日志目标
pub(crate) const LOG_TARGET: &str = "creator-payout";

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use frame_support::traits::Currency;

    /// 余额类型（最小货币单位，美分）
    pub type BalanceOf<T> =
        <<T as Config>::Currency as Currency<<T as frame_system::Config>::AccountId>>::Balance;

    /// 提现请求类型别名
    pub type RequestOf<T> =
        types::WithdrawalRequest<<T as frame_system::Config>::AccountId, BalanceOf<T>>;

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        /// 函数级中文注释：空闲时执行对账扫描与计数清理
        ///
        /// 对账：处理派发后停留在 Processing 超过超时区块数的请求，
        /// 向网关查询真实状态并落到终态，绝不让请求无限期挂起。
        /// 清理：移除日界/周期之前的提现频次计数。
        fn on_idle(now: BlockNumberFor<T>, remaining_weight: Weight) -> Weight {
            let base_weight = Weight::from_parts(50_000, 0);

            if remaining_weight.ref_time() > base_weight.ref_time() * 5 {
                Self::reconcile_stale(now).saturating_add(Self::prune_stale_counters())
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

        /// 管理员权限（服务商路由表、费率配置、手动对账）
        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// 创作者账本（余额锁定/扣减的唯一通道）
        type Ledger: CreatorLedger<Self::AccountId, BalanceOf<Self>>;

        /// 支付网关（外部协作方）
        type Gateway: PayoutGateway<BalanceOf<Self>>;

        /// 通知服务（fire-and-forget，失败不回滚账本）
        type Notifier: PayoutNotifier<Self::AccountId, BalanceOf<Self>>;

        /// 风控评分
        type Risk: RiskProvider<Self::AccountId>;

        /// 身份/会话上下文：账户国家归属
        type RegionProvider: RegionProvider<Self::AccountId>;

        /// 每日区块数
        #[pallet::constant]
        type BlocksPerDay: Get<BlockNumberFor<Self>>;

        /// 标准通道最低提现额（美分）
        #[pallet::constant]
        type MinWithdrawal: Get<BalanceOf<Self>>;

        /// 即时通道单笔上限（美分）
        #[pallet::constant]
        type MaxInstantWithdrawal: Get<BalanceOf<Self>>;

        /// 标准通道最低账龄（天）
        #[pallet::constant]
        type MinAccountAgeDays: Get<u32>;

        /// 标准通道最低活跃次数
        #[pallet::constant]
        type MinActivityCount: Get<u32>;

        /// 每日提现次数上限（标准通道）
        #[pallet::constant]
        type MaxDailyWithdrawals: Get<u32>;

        /// 每月提现次数上限（标准通道）
        #[pallet::constant]
        type MaxMonthlyWithdrawals: Get<u32>;

        /// 风险分上限（标准通道，0-100）
        #[pallet::constant]
        type MaxRiskScore: Get<u8>;

        /// 服务商无专属费率时的缺省费率（基点，200 = 2%）
        #[pallet::constant]
        type DefaultFeeBps: Get<u32>;

        /// Processing 状态对账超时（区块数）
        #[pallet::constant]
        type ProcessingTimeoutBlocks: Get<BlockNumberFor<Self>>;

        /// 每国家最多配置的服务商数
        #[pallet::constant]
        type MaxProvidersPerCountry: Get<u32>;

        /// 在途（Processing）请求队列上限
        #[pallet::constant]
        type MaxInFlight: Get<u32>;

        /// 单块对账扫描处理条数上限
        #[pallet::constant]
        type MaxReconcilePerBlock: Get<u32>;

        /// 单用户近期提现请求索引上限
        #[pallet::constant]
        type MaxRecentRequests: Get<u32>;
    }

    // ========================================
    // 存储项
    // ========================================

    // === 请求存储（3个）===

    /// 提现请求：请求ID → 请求记录
    #[pallet::storage]
    #[pallet::getter(fn requests)]
    pub type Requests<T: Config> = StorageMap<_, Twox64Concat, u64, RequestOf<T>>;

    /// 下一个请求ID
    #[pallet::storage]
    pub type NextRequestId<T: Config> = StorageValue<_, u64, ValueQuery>;

    /// 近期提现请求索引：账户 → 请求ID列表（满则淘汰最旧）
    #[pallet::storage]
    pub type UserRequests<T: Config> = StorageMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        BoundedVec<u64, T::MaxRecentRequests>,
        ValueQuery,
    >;

    // === 路由策略表存储（2个）===

    /// 国家支持的服务商列表（大小写敏感的 ISO 编码匹配）
    #[pallet::storage]
    #[pallet::getter(fn country_providers)]
    pub type CountryProviders<T: Config> = StorageMap<
        _,
        Twox64Concat,
        RegionCode,
        BoundedVec<PayoutProvider, T::MaxProvidersPerCountry>,
        ValueQuery,
    >;

    /// 服务商费率覆盖（基点；无记录回退 DefaultFeeBps）
    #[pallet::storage]
    pub type ProviderFeeOverrides<T: Config> = StorageMap<_, Twox64Concat, PayoutProvider, u32>;

    // === 频次计数存储（2个）===

    /// 每日提现计数：(账户, 天序号) → 次数
    #[pallet::storage]
    pub type DailyWithdrawals<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AccountId, Twox64Concat, u32, u32, ValueQuery>;

    /// 每月提现计数：(账户, 周期序号) → 次数
    #[pallet::storage]
    pub type MonthlyWithdrawals<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AccountId, Twox64Concat, u32, u32, ValueQuery>;

    // === 对账存储（1个）===

    /// 在途请求队列（Processing 状态，对账扫描的工作集）
    #[pallet::storage]
    pub type InFlight<T: Config> =
        StorageValue<_, BoundedVec<u64, T::MaxInFlight>, ValueQuery>;

    // === 统计存储（2个）===

    /// 累计成功出金总额（毛额口径）
    #[pallet::storage]
    pub type TotalPaidOut<T: Config> = StorageValue<_, BalanceOf<T>, ValueQuery>;

    /// 累计手续费总额
    #[pallet::storage]
    pub type TotalFeesCharged<T: Config> = StorageValue<_, BalanceOf<T>, ValueQuery>;

    // ========================================
    // 事件
    // ========================================

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// 提现请求已创建
        WithdrawalRequested {
            id: u64,
            who: T::AccountId,
            channel: WithdrawalChannel,
            amount: BalanceOf<T>,
            fee: BalanceOf<T>,
            provider: PayoutProvider,
        },
        /// 提现成功，账本已按毛额扣减
        WithdrawalCompleted {
            id: u64,
            who: T::AccountId,
            amount: BalanceOf<T>,
            net_amount: BalanceOf<T>,
        },
        /// 提现失败，账本未动
        WithdrawalFailed {
            id: u64,
            who: T::AccountId,
            code: GatewayErrorCode,
            retryable: bool,
        },
        /// 失败请求已重试（创建新请求，旧请求保持终态）
        WithdrawalRetried {
            original_id: u64,
            new_id: u64,
        },
        /// 对账扫描已解决一笔在途请求
        WithdrawalReconciled {
            id: u64,
            completed: bool,
        },
        /// 国家服务商列表已更新
        CountryProvidersSet {
            country: RegionCode,
        },
        /// 服务商费率已更新
        ProviderFeeSet {
            provider: PayoutProvider,
            fee_bps: u32,
        },
    }

    // ========================================
    // 错误
    // ========================================

    #[pallet::error]
    pub enum Error<T> {
        // === 校验错误（账本未动即拒绝）===
        /// 金额为零
        ZeroAmount,
        /// 低于最低提现额
        BelowMinimum,
        /// 超过即时提现上限
        AboveInstantMax,
        /// 该国家不支持所选服务商
        ProviderNotSupported,
        /// 收款标识过长
        DestinationTooLong,

        // === 资格错误（完整原因列表见 check_eligibility）===
        /// 可提现余额不足
        InsufficientAvailable,
        /// 账龄不足
        AccountTooYoung,
        /// 活跃度不足
        TooFewActivities,
        /// 当日提现次数已达上限
        DailyLimitReached,
        /// 当月提现次数已达上限
        MonthlyLimitReached,
        /// 风险分过高
        RiskScoreTooHigh,

        // === 请求/状态机错误 ===
        /// 请求不存在
        RequestNotFound,
        /// 不是请求发起人
        NotRequestOwner,
        /// 请求已处于终态
        AlreadyResolved,
        /// 请求不处于 Processing 状态
        NotProcessing,
        /// 失败原因不可重试（收款标识永久无效等）
        NotRetryable,
        /// 在途队列已满
        TooManyInFlight,
    }

    // ========================================
    // 可调用函数
    // ========================================

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        // === 提现接口（3个）===

        /// 函数级中文注释：发起标准提现
        ///
        /// 全量资格门禁（最低金额/余额/账龄/活跃度/频次/风控）通过后，
        /// 创建请求、锁定毛额、同步派发网关：
        /// - 网关确认 → Completed，借记账本（恰好一次）
        /// - 网关拒绝 → Failed，解锁，账本未动
        /// - 网关超时 → 保持 Processing，入对账队列
        #[pallet::call_index(0)]
        #[pallet::weight(Weight::from_parts(60_000, 0))]
        pub fn request_withdrawal(
            origin: OriginFor<T>,
            amount: BalanceOf<T>,
            provider: PayoutProvider,
            destination: sp_std::vec::Vec<u8>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;

            Self::do_initiate_withdrawal(
                &who,
                WithdrawalChannel::Standard,
                amount,
                provider,
                destination,
            )?;

            Ok(())
        }

        /// 函数级中文注释：发起即时提现
        ///
        /// 小额低摩擦通道：仅校验金额区间与国家/服务商支持，
        /// 账龄/活跃度/频次/风控全部刻意绕过（产品策略，双档位不得合并）。
        /// 同步落到终态：Completed 或 Failed，超时按 Failed 处理。
        #[pallet::call_index(1)]
        #[pallet::weight(Weight::from_parts(60_000, 0))]
        pub fn instant_withdrawal(
            origin: OriginFor<T>,
            amount: BalanceOf<T>,
            provider: PayoutProvider,
            destination: sp_std::vec::Vec<u8>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;

            Self::do_initiate_withdrawal(
                &who,
                WithdrawalChannel::Instant,
                amount,
                provider,
                destination,
            )?;

            Ok(())
        }

        /// 函数级中文注释：重试失败的提现
        ///
        /// 仅限本人、终态为 Failed、且失败原因可重试的请求；
        /// 沿用原请求参数创建**新**请求，旧请求保持终态不复活。
        #[pallet::call_index(2)]
        #[pallet::weight(Weight::from_parts(60_000, 0))]
        pub fn retry_withdrawal(origin: OriginFor<T>, failed_id: u64) -> DispatchResult {
            let who = ensure_signed(origin)?;

            let failed = Requests::<T>::get(failed_id).ok_or(Error::<T>::RequestNotFound)?;
            ensure!(failed.who == who, Error::<T>::NotRequestOwner);
            ensure!(
                failed.status == WithdrawalStatus::Failed,
                Error::<T>::NotRetryable
            );
            let retryable = failed
                .failure
                .map(|code| code.is_retryable())
                .unwrap_or(false);
            ensure!(retryable, Error::<T>::NotRetryable);

            let new_id = Self::do_initiate_withdrawal(
                &who,
                failed.channel,
                failed.amount,
                failed.provider,
                failed.destination.to_vec(),
            )?;

            Self::deposit_event(Event::WithdrawalRetried {
                original_id: failed_id,
                new_id,
            });

            Ok(())
        }

        // === 对账接口（1个）===

        /// 函数级中文注释：手动对账一笔在途请求（运营兜底入口）
        #[pallet::call_index(3)]
        #[pallet::weight(Weight::from_parts(40_000, 0))]
        pub fn force_reconcile(origin: OriginFor<T>, id: u64) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            Self::reconcile_request(id)?;

            Ok(())
        }

        // === 路由策略表配置接口（2个）===

        /// 函数级中文注释：设置国家支持的服务商列表
        ///
        /// 路由表运行期只读，变更仅限 AdminOrigin（等价于配置发布）。
        #[pallet::call_index(10)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn set_country_providers(
            origin: OriginFor<T>,
            country: RegionCode,
            providers: BoundedVec<PayoutProvider, T::MaxProvidersPerCountry>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            CountryProviders::<T>::insert(country, providers);

            Self::deposit_event(Event::CountryProvidersSet { country });

            Ok(())
        }

        /// 函数级中文注释：设置服务商费率（基点）
        #[pallet::call_index(11)]
        #[pallet::weight(Weight::from_parts(10_000, 0))]
        pub fn set_provider_fee(
            origin: OriginFor<T>,
            provider: PayoutProvider,
            fee_bps: u32,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            ProviderFeeOverrides::<T>::insert(provider, fee_bps);

            Self::deposit_event(Event::ProviderFeeSet { provider, fee_bps });

            Ok(())
        }
    }
}
