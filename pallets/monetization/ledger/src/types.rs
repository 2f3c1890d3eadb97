//! 函数级中文注释：创作者收益账本类型定义

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::pallet_prelude::*;
use monetization_common::{ActivityRef, ActivityType, EarningStatus};
use scale_info::TypeInfo;

/// 函数级中文注释：月度周期长度（天）
pub const DAYS_PER_PERIOD: u32 = 30;

/// 函数级中文注释：用户账本
///
/// ## 不变量（每次变更后校验，违反即 LedgerInconsistent 并回滚）
/// - `pending_balance == total_earned - total_withdrawn` 恒成立
/// - `locked ≤ pending_balance`，`unverified ≤ pending_balance`
/// - 全部字段无符号，只允许 checked 减法
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
pub struct UserLedger<Balance> {
    /// 累计总收益
    pub total_earned: Balance,
    /// 累计已提现
    pub total_withdrawn: Balance,
    /// 待提现余额（= total_earned - total_withdrawn）
    pub pending_balance: Balance,
    /// 在途提现锁定金额（毛额，提现成功后结转到 total_withdrawn）
    pub locked: Balance,
    /// 待审核收益（计入 pending，但不计入可提现子额度）
    pub unverified: Balance,
    /// 当日累计收益（daily_day 翻转时清零）
    pub daily_earned: Balance,
    /// 当日所属天序号
    pub daily_day: u32,
    /// 当期累计收益（30天周期）
    pub monthly_earned: Balance,
    /// 当期周期序号
    pub monthly_period: u32,
    /// 累计收益事件数（活跃度口径）
    pub activity_count: u32,
    /// 首次收益活动的天序号（账龄起点）
    pub first_seen_day: u32,
    /// 是否已有收益活动（first_seen_day=0 与"第0天首活"区分）
    pub has_activity: bool,
}

/// 函数级中文注释：收益事件（创建后不可变，仅状态可 PendingReview → Verified）
#[derive(
    Encode, Decode, DecodeWithMemTracking, Clone, RuntimeDebug, PartialEq, Eq, TypeInfo, MaxEncodedLen,
)]
pub struct EarningEvent<AccountId, Balance> {
    /// 事件ID（自增）
    pub id: u64,
    /// 收益归属账户
    pub who: AccountId,
    /// 活动类型
    pub activity: ActivityType,
    /// 入账金额（最小货币单位，美分）
    pub amount: Balance,
    /// 关联引用（视频/被邀请人/任务等）
    pub reference: ActivityRef<AccountId>,
    /// 事件状态
    pub status: EarningStatus,
    /// 入账天序号
    pub day: u32,
}

/// 函数级中文注释：活动默认费率（美分）
///
/// 策略表的编译期缺省值；运行期可经 AdminOrigin 覆盖
/// （ActivityRateOverrides），普通用户无任何修改入口。
/// Gift/Tip 返回 0：金额即打赏金额本身，不走费率。
pub fn default_activity_rate(activity: ActivityType) -> u32 {
    match activity {
        ActivityType::Watch => 2,
        ActivityType::Like => 1,
        ActivityType::Comment => 1,
        ActivityType::Share => 2,
        ActivityType::Invite => 100,
        // 每分钟费率
        ActivityType::LiveWatch => 1,
        ActivityType::PollVote => 1,
        ActivityType::Challenge => 50,
        ActivityType::Task => 25,
        ActivityType::Gift => 0,
        ActivityType::Tip => 0,
    }
}

/// 函数级中文注释：活动每日次数上限
///
/// 超限后当日该活动不再入账；u32::MAX 表示不设次数上限
/// （Gift/Tip 由打赏金额与日收益上限约束）。
pub fn daily_count_cap(activity: ActivityType) -> u32 {
    match activity {
        ActivityType::Watch => 500,
        ActivityType::Like => 1000,
        ActivityType::Comment => 200,
        ActivityType::Share => 100,
        ActivityType::Invite => 20,
        ActivityType::LiveWatch => 120,
        ActivityType::PollVote => 50,
        ActivityType::Challenge => 1,
        ActivityType::Task => 10,
        ActivityType::Gift => u32::MAX,
        ActivityType::Tip => u32::MAX,
    }
}
