//! # 公共 Trait 定义
//!
//! 本模块定义创作者变现相关的公共接口，供 ledger / payout 两个 pallet 共享。
//!
//! ## 版本历史
//! - v0.1.0: 初始版本（PayoutGateway / PayoutNotifier）
//! - v0.2.0: 新增 CreatorLedger 统一账本接口

use crate::types::{DispatchOutcome, GatewayStatus, PayoutProvider, RegionCode};
use sp_runtime::DispatchResult;

/// 函数级详细中文注释：移动支付 / 银行卡网关接口
///
/// ## 说明
/// 外部协作方（Stripe / MTN / Orange / Wave / Airtel 等）的统一抽象。
/// 派发调用从路由器角度是一次同步阻塞的网络调用，必须有界超时；
/// 超时由实现方以 `DispatchOutcome::TimedOut` 上报，绝不无限等待。
///
/// ## 使用者
/// - `pallet-creator-payout`: 提现派发与对账扫描
///
/// ## 实现者
/// - 运行时桥接层（OCW / 链下网关适配器）；测试中为脚本化 Mock
pub trait PayoutGateway<Balance> {
    /// 派发一笔转账
    ///
    /// ## 参数
    /// - `provider`: 支付服务商
    /// - `destination`: 收款标识（加密字节串，本模块不解读）
    /// - `net_amount`: 到账净额（已扣手续费）
    /// - `reference`: 提现请求ID（幂等引用，同一ID重复派发必须被网关去重）
    ///
    /// ## 返回
    /// 带标签的派发结果，路由器穷尽匹配处理
    fn dispatch(
        provider: PayoutProvider,
        destination: &[u8],
        net_amount: Balance,
        reference: u64,
    ) -> DispatchOutcome;

    /// 查询某笔派发的真实状态（对账扫描用）
    ///
    /// ## 参数
    /// - `provider`: 支付服务商
    /// - `reference`: 提现请求ID
    ///
    /// ## 返回
    /// - `Confirmed`: 超时但实际到账（避免漏付）
    /// - `Failed`: 实际失败（避免重付）
    /// - `Unknown`: 网关无法确认
    fn query_status(provider: PayoutProvider, reference: u64) -> GatewayStatus;
}

/// 函数级中文注释：提现通知类型
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PayoutNotice {
    /// 提现已发起
    Initiated,
    /// 提现成功
    Success,
    /// 提现失败
    Failed,
}

/// 函数级详细中文注释：通知服务接口（fire-and-forget）
///
/// ## 说明
/// 提现状态迁移后触发；返回 `()`，通知失败不得回滚账本事务。
pub trait PayoutNotifier<AccountId, Balance> {
    /// 发送通知
    fn notify(who: &AccountId, notice: PayoutNotice, amount: Balance, provider: PayoutProvider);
}

/// 函数级中文注释：空通知实现（测试或无通知场景）
pub struct NullNotifier;

impl<AccountId, Balance> PayoutNotifier<AccountId, Balance> for NullNotifier {
    fn notify(_who: &AccountId, _notice: PayoutNotice, _amount: Balance, _provider: PayoutProvider) {}
}

/// 函数级详细中文注释：风控评分接口
///
/// ## 说明
/// 返回 0-100 的风险分，标准提现要求 ≤ 阈值（默认70）。
/// 反作弊评分模型由实现方提供，本模块只固定接口。
pub trait RiskProvider<AccountId> {
    /// 查询账户风险分（0-100，越高越危险）
    fn risk_score(who: &AccountId) -> u8;
}

/// 函数级中文注释：空风控实现（风险分恒为0）
pub struct NullRiskProvider;

impl<AccountId> RiskProvider<AccountId> for NullRiskProvider {
    fn risk_score(_who: &AccountId) -> u8 {
        0
    }
}

/// 函数级详细中文注释：身份/会话上下文接口
///
/// ## 说明
/// 提供账户的地区归属（定价与服务商路由依据）。
/// 变现核心信任此输入，不做二次鉴权。
pub trait RegionProvider<AccountId> {
    /// 查询账户地区编码（ISO-3166 alpha-2）
    fn region_of(who: &AccountId) -> RegionCode;
}

/// 函数级详细中文注释：创作者账本接口
///
/// ## 说明
/// payout pallet 通过本接口读写余额；账本字段的唯一合法写入方
/// 是 ledger pallet 内部实现，其他组件一律经由本接口。
///
/// ## 余额口径
/// - `pending_balance == total_earned - total_withdrawn` 恒成立
/// - 可提现余额 = pending - 在途锁定(locked) - 未审核(unverified)
///
/// ## 使用者
/// - `pallet-creator-payout`: 资格校验、锁定、扣减
///
/// ## 实现者
/// - `pallet-creator-ledger`
pub trait CreatorLedger<AccountId, Balance> {
    /// 查询可提现余额（已扣除在途锁定与未审核部分）
    fn available_balance(who: &AccountId) -> Balance;

    /// 锁定一笔在途提现金额（毛额）
    ///
    /// ## 说明
    /// 后续提现请求看到的可提现余额已扣除本笔锁定，
    /// 以此保证同一用户的提现按提交顺序串行化、不可透支。
    ///
    /// ## 返回
    /// - `Err`: 可提现余额不足
    fn lock(who: &AccountId, amount: Balance) -> DispatchResult;

    /// 解除锁定（提现失败，资金留在 pending 可再次提现）
    fn unlock(who: &AccountId, amount: Balance) -> DispatchResult;

    /// 结算扣减（提现成功，恰好一次）
    ///
    /// ## 说明
    /// 要求金额已处于锁定状态；total_withdrawn 增加、pending 减少
    /// 在同一事务内完成。这是账本唯一的借记入口。
    fn settle_debit(who: &AccountId, amount: Balance) -> DispatchResult;

    /// 查询累计活跃次数（收益事件数）
    fn activity_count(who: &AccountId) -> u32;

    /// 查询账龄（天，自首次收益活动起算）
    fn account_age_days(who: &AccountId) -> u32;
}
