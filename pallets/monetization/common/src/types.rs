//! 函数级中文注释：创作者变现公共类型定义
//!
//! 包含 ledger 与 payout 两个 pallet 共享的类型定义

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::pallet_prelude::*;
use scale_info::TypeInfo;

/// 函数级中文注释：地区编码（ISO-3166 alpha-2，大写，大小写敏感匹配）
pub type RegionCode = [u8; 2];

/// 函数级中文注释：网关交易号最大长度
pub const MAX_TX_ID_LEN: u32 = 64;

/// 函数级中文注释：收款标识（加密后）最大长度
pub const MAX_DESTINATION_LEN: u32 = 128;

/// 函数级中文注释：网关交易号
pub type TransactionId = BoundedVec<u8, ConstU32<MAX_TX_ID_LEN>>;

/// 函数级中文注释：收益活动类型
///
/// 每种活动对应策略表中的一个固定费率；Watch/LiveWatch 走
/// 时长/CPM 计费，Gift/Tip 按打赏金额入账。
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    RuntimeDebug,
    PartialEq,
    Eq,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum ActivityType {
    /// 完整观看视频（≥30秒）
    Watch,
    /// 点赞
    Like,
    /// 评论（≥3字符）
    Comment,
    /// 分享
    Share,
    /// 邀请新用户（需审核确认）
    Invite,
    /// 直播观看（按分钟计费）
    LiveWatch,
    /// 投票
    PollVote,
    /// 挑战赛参与（每日一次，需审核确认）
    Challenge,
    /// 平台任务
    Task,
    /// 收到礼物（创作者侧）
    Gift,
    /// 收到打赏（创作者侧）
    Tip,
}

impl ActivityType {
    /// 函数级中文注释：该活动是否需要异步审核确认
    ///
    /// 需审核的活动（邀请、挑战赛）先入账 pending_balance，
    /// 但在审核通过前不计入可提现子额度。
    pub fn requires_review(&self) -> bool {
        matches!(self, ActivityType::Invite | ActivityType::Challenge)
    }
}

/// 函数级中文注释：收益事件状态
///
/// 事件创建后不可变，唯一合法迁移：PendingReview → Verified
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    RuntimeDebug,
    PartialEq,
    Eq,
    TypeInfo,
    MaxEncodedLen,
    Default,
)]
pub enum EarningStatus {
    /// 已完成（普通活动，立即计入可提现额度）
    #[default]
    Completed,
    /// 待审核（邀请/挑战赛，暂不计入可提现额度）
    PendingReview,
    /// 审核通过
    Verified,
}

/// 函数级中文注释：收益事件关联引用
///
/// 记录事件来源（视频、被邀请人、任务等），用于去重与追溯
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    RuntimeDebug,
    PartialEq,
    Eq,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum ActivityRef<AccountId> {
    /// 无关联
    None,
    /// 视频ID
    Video(u64),
    /// 被邀请账户
    Referred(AccountId),
    /// 投票ID
    Poll(u64),
    /// 挑战赛ID
    Challenge(u64),
    /// 任务ID
    Task(u64),
    /// 直播间ID
    LiveRoom(u64),
}

// 手动实现 Default，避免给 AccountId 附加 Default 约束
impl<AccountId> Default for ActivityRef<AccountId> {
    fn default() -> Self {
        Self::None
    }
}

/// 函数级中文注释：支付服务商
///
/// 按国家配置可用列表（CountryProviders），费率按服务商配置
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    RuntimeDebug,
    PartialEq,
    Eq,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum PayoutProvider {
    /// Stripe（银行卡）
    Stripe,
    /// MTN Mobile Money
    MtnMomo,
    /// Orange Money
    OrangeMoney,
    /// Wave
    Wave,
    /// Airtel Money
    AirtelMoney,
}

/// 函数级中文注释：提现请求状态
///
/// 状态机：Pending → Processing → Completed | Failed
/// 即时提现：Pending/Processing 折叠为同步一步，直接落到终态。
/// 终态不可逆；失败的即时提现通过创建**新**请求重试，绝不复活旧请求。
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    RuntimeDebug,
    PartialEq,
    Eq,
    TypeInfo,
    MaxEncodedLen,
    Default,
)]
pub enum WithdrawalStatus {
    /// 已创建，未派发
    #[default]
    Pending,
    /// 已派发网关，等待结果（仅标准通道可达）
    Processing,
    /// 网关确认转账成功，账本已扣减（终态）
    Completed,
    /// 网关拒绝或超时，账本未动（终态）
    Failed,
}

impl WithdrawalStatus {
    /// 函数级中文注释：是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, WithdrawalStatus::Completed | WithdrawalStatus::Failed)
    }
}

/// 函数级中文注释：提现通道
///
/// 两套独立资格档位，产品设计上刻意区分，网关侧不得合并：
/// - Standard: 全量门槛（最低金额/账龄/活跃度/次数/风控）
/// - Instant: 小额低摩擦，仅校验金额区间与服务商支持
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    RuntimeDebug,
    PartialEq,
    Eq,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum WithdrawalChannel {
    /// 标准提现
    Standard,
    /// 即时提现
    Instant,
}

/// 函数级中文注释：网关错误码
///
/// 用于区分可重试错误（用户可重新发起）与永久错误（收款标识无效等）
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    RuntimeDebug,
    PartialEq,
    Eq,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum GatewayErrorCode {
    /// 网关超时
    Timeout,
    /// 服务商侧故障
    ProviderUnavailable,
    /// 收款标识被服务商拒绝（永久）
    InvalidDestination,
    /// 服务商拒绝该笔转账（永久）
    TransferRejected,
    /// 余额/限额等服务商侧限制
    ProviderLimitExceeded,
}

impl GatewayErrorCode {
    /// 函数级中文注释：该错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayErrorCode::Timeout
            | GatewayErrorCode::ProviderUnavailable
            | GatewayErrorCode::ProviderLimitExceeded => true,
            GatewayErrorCode::InvalidDestination | GatewayErrorCode::TransferRejected => false,
        }
    }
}

/// 函数级中文注释：网关派发结果（带标签的结果类型）
///
/// 替代上游动态探测字段的做法：路由器对结果做穷尽匹配，
/// 不存在第三种"半成功"状态。
#[derive(Encode, Decode, Clone, RuntimeDebug, PartialEq, Eq, TypeInfo)]
pub enum DispatchOutcome {
    /// 网关受理并确认转账，返回交易号
    Accepted { transaction_id: TransactionId },
    /// 网关拒绝，携带错误码
    Rejected { code: GatewayErrorCode },
    /// 网络调用超时，转账结果未知（仅标准通道保留 Processing 等待对账）
    TimedOut,
}

/// 函数级中文注释：网关状态查询结果（对账扫描用）
#[derive(Encode, Decode, Clone, RuntimeDebug, PartialEq, Eq, TypeInfo)]
pub enum GatewayStatus {
    /// 转账实际已成功（超时但到账的场景）
    Confirmed { transaction_id: TransactionId },
    /// 转账实际已失败
    Failed { code: GatewayErrorCode },
    /// 网关侧无法确认
    Unknown,
}
