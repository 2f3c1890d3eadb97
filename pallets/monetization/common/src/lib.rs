#![cfg_attr(not(feature = "std"), no_std)]

//! # Monetization Common (创作者变现公共库)
//!
//! ## 概述
//!
//! 本 crate 提供创作者变现相关的公共类型和统一接口，包括：
//! - 收益活动类型定义（ActivityType, EarningStatus）
//! - 提现状态机类型（WithdrawalStatus, WithdrawalChannel）
//! - 移动支付网关统一接口（PayoutGateway，带标签的结果类型）
//! - 账本接口（CreatorLedger，供 payout pallet 调用）
//! - 风控 / 地区 / 通知等外部协作方接口
//!
//! ## 特点
//!
//! - ✅ 纯 Rust crate，无链上存储
//! - ✅ 可被多个 pallet 共享
//! - ✅ no_std 兼容
//!
//! ## 版本历史
//!
//! - v0.1.0: 初始版本（活动类型 + 网关接口）
//! - v0.2.0: 账本接口抽离到本 crate，payout 与 ledger 解耦

pub mod types;
pub mod traits;

// ===== 重新导出公共类型 =====
pub use types::{
    ActivityType,
    ActivityRef,
    EarningStatus,
    PayoutProvider,
    WithdrawalStatus,
    WithdrawalChannel,
    RegionCode,
    GatewayErrorCode,
    DispatchOutcome,
    GatewayStatus,
    TransactionId,
    MAX_TX_ID_LEN,
    MAX_DESTINATION_LEN,
};

// ===== 重新导出公共 Trait =====
pub use traits::{
    PayoutGateway,
    PayoutNotifier,
    PayoutNotice,
    NullNotifier,
    RiskProvider,
    NullRiskProvider,
    RegionProvider,
    CreatorLedger,
};
