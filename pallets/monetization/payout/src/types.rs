//! 函数级中文注释：提现模块类型定义

extern crate alloc;
use alloc::format;
use alloc::string::String;

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::pallet_prelude::*;
use monetization_common::{
    GatewayErrorCode, PayoutProvider, RegionCode, TransactionId, WithdrawalChannel,
    WithdrawalStatus, MAX_DESTINATION_LEN,
};
use scale_info::TypeInfo;

/// 函数级中文注释：收款标识（加密字节串，本模块不解读内容）
pub type Destination = BoundedVec<u8, ConstU32<MAX_DESTINATION_LEN>>;

/// 函数级中文注释：资格报告最大原因数
pub const MAX_GATE_REASONS: u32 = 8;

/// 函数级中文注释：手续费基点分母（10000 = 100%）
pub const FEE_BPS_DENOMINATOR: u32 = 10_000;

/// 函数级中文注释：提现请求
///
/// 生命周期：用户发起创建；状态单向迁移（见 WithdrawalStatus）；
/// 终态后整行只读。失败的请求经 retry 创建**新**请求，本行不复活。
#[derive(
    Encode, Decode, DecodeWithMemTracking, Clone, RuntimeDebug, PartialEq, Eq, TypeInfo, MaxEncodedLen,
)]
pub struct WithdrawalRequest<AccountId, Balance> {
    /// 请求ID（自增）
    pub id: u64,
    /// 发起账户
    pub who: AccountId,
    /// 提现通道
    pub channel: WithdrawalChannel,
    /// 请求毛额（账本按毛额扣减）
    pub amount: Balance,
    /// 手续费（从毛额中吸收）
    pub fee: Balance,
    /// 到账净额（毛额 - 手续费，派发给网关的金额）
    pub net_amount: Balance,
    /// 国家（发起时的地区归属快照）
    pub country: RegionCode,
    /// 支付服务商
    pub provider: PayoutProvider,
    /// 收款标识（加密）
    pub destination: Destination,
    /// 状态
    pub status: WithdrawalStatus,
    /// 网关交易号（成功后由网关指定）
    pub transaction_id: Option<TransactionId>,
    /// 失败原因（网关错误码）
    pub failure: Option<GatewayErrorCode>,
    /// 创建区块
    pub created_at: u64,
    /// 派发网关区块（对账超时起点）
    pub dispatched_at: Option<u64>,
    /// 终态区块
    pub resolved_at: Option<u64>,
}

/// 函数级中文注释：资格门禁失败原因（携带数值，可渲染人类可读文案）
#[derive(
    Encode, Decode, DecodeWithMemTracking, Clone, Copy, RuntimeDebug, PartialEq, Eq, TypeInfo, MaxEncodedLen,
)]
pub enum GateReason<Balance> {
    /// 金额为零
    ZeroAmount,
    /// 低于最低提现额
    BelowMinimum { requested: Balance, minimum: Balance },
    /// 超过即时提现上限
    AboveInstantMax { requested: Balance, maximum: Balance },
    /// 可提现余额不足
    InsufficientBalance { requested: Balance, available: Balance },
    /// 账龄不足
    AccountTooYoung { age_days: u32, required_days: u32 },
    /// 活跃度不足
    TooFewActivities { count: u32, required: u32 },
    /// 当日提现次数已达上限
    DailyLimitReached { count: u32, limit: u32 },
    /// 当月提现次数已达上限
    MonthlyLimitReached { count: u32, limit: u32 },
    /// 风险分过高
    RiskScoreTooHigh { score: u8, maximum: u8 },
    /// 该国家不支持所选服务商
    ProviderNotSupported,
}

impl<Balance: core::fmt::Debug> GateReason<Balance> {
    /// 函数级中文注释：渲染人类可读的失败文案（RPC 层透传给前端）
    pub fn message(&self) -> String {
        match self {
            GateReason::ZeroAmount => String::from("Amount must be greater than zero"),
            GateReason::BelowMinimum { requested, minimum } => {
                format!("Amount below minimum: {:?}/{:?}", requested, minimum)
            }
            GateReason::AboveInstantMax { requested, maximum } => {
                format!("Amount above instant maximum: {:?}/{:?}", requested, maximum)
            }
            GateReason::InsufficientBalance { requested, available } => {
                format!("Insufficient balance: {:?}/{:?}", requested, available)
            }
            GateReason::AccountTooYoung { age_days, required_days } => {
                format!("Account too young: {}/{} days", age_days, required_days)
            }
            GateReason::TooFewActivities { count, required } => {
                format!("Too few activities: {}/{}", count, required)
            }
            GateReason::DailyLimitReached { count, limit } => {
                format!("Daily withdrawal limit reached: {}/{}", count, limit)
            }
            GateReason::MonthlyLimitReached { count, limit } => {
                format!("Monthly withdrawal limit reached: {}/{}", count, limit)
            }
            GateReason::RiskScoreTooHigh { score, maximum } => {
                format!("Risk score too high: {}/{}", score, maximum)
            }
            GateReason::ProviderNotSupported => {
                String::from("Provider not supported in this country")
            }
        }
    }
}

/// 函数级中文注释：资格报告
///
/// 一次性收集**全部**失败原因（而非只报第一条），
/// 供 RPC 层完整返回给用户。
#[derive(Encode, Decode, Clone, RuntimeDebug, PartialEq, Eq, TypeInfo)]
pub struct EligibilityReport<Balance> {
    /// 是否具备资格
    pub eligible: bool,
    /// 失败原因列表（eligible=true 时为空）
    pub reasons: BoundedVec<GateReason<Balance>, ConstU32<MAX_GATE_REASONS>>,
}

impl<Balance> EligibilityReport<Balance> {
    /// 函数级中文注释：由原因列表构造报告
    pub fn from_reasons(
        reasons: BoundedVec<GateReason<Balance>, ConstU32<MAX_GATE_REASONS>>,
    ) -> Self {
        Self {
            eligible: reasons.is_empty(),
            reasons,
        }
    }
}
