//! # Mock Runtime for Creator Ledger Pallet Testing
//!
//! 函数级详细中文注释：提供收益账本 Pallet 的测试运行时环境

use crate as pallet_creator_ledger;
use frame_support::{parameter_types, traits::ConstU32};
use monetization_common::{RegionCode, RegionProvider};
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};
use std::cell::RefCell;
use std::collections::HashMap;

type Block = frame_system::mocking::MockBlock<Test>;

// 函数级中文注释：构建测试运行时
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Balances: pallet_balances,
        Ledger: pallet_creator_ledger,
    }
);

// ========================================
// System 配置
// ========================================

parameter_types! {
    pub const BlockHashCount: u64 = 250;
}

impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = sp_core::H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = BlockHashCount;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = pallet_balances::AccountData<u128>;
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
    type RuntimeTask = ();
    type SingleBlockMigrations = ();
    type MultiBlockMigrator = ();
    type PreInherents = ();
    type PostInherents = ();
    type PostTransactions = ();
    type ExtensionsWeightInfo = ();
}

// ========================================
// Balances 配置
// ========================================

parameter_types! {
    pub const ExistentialDeposit: u128 = 1;
}

impl pallet_balances::Config for Test {
    type MaxLocks = ();
    type MaxReserves = ();
    type ReserveIdentifier = [u8; 8];
    type Balance = u128;
    type RuntimeEvent = RuntimeEvent;
    type DustRemoval = ();
    type ExistentialDeposit = ExistentialDeposit;
    type AccountStore = System;
    type WeightInfo = ();
    type FreezeIdentifier = ();
    type MaxFreezes = ();
    type RuntimeHoldReason = ();
    type RuntimeFreezeReason = ();
    type DoneSlashHandler = ();
}

// ========================================
// Mock RegionProvider
// ========================================

thread_local! {
    /// 函数级中文注释：账户 → 地区 映射（缺省 US）
    static REGIONS: RefCell<HashMap<u64, RegionCode>> = RefCell::new(HashMap::new());
}

/// 函数级中文注释：模拟身份/会话上下文
///
/// 测试环境规则：未显式设置的账户归属 "US"
pub struct MockRegionProvider;

impl RegionProvider<u64> for MockRegionProvider {
    fn region_of(who: &u64) -> RegionCode {
        REGIONS.with(|r| r.borrow().get(who).copied().unwrap_or(*b"US"))
    }
}

/// 函数级中文注释：设置账户地区（测试辅助）
pub fn set_region(who: u64, region: RegionCode) {
    REGIONS.with(|r| {
        r.borrow_mut().insert(who, region);
    });
}

// ========================================
// Creator Ledger 配置参数
// ========================================

parameter_types! {
    /// 函数级中文注释：每日区块数（测试取小值便于跨天）
    pub const BlocksPerDay: u64 = 100;

    /// 函数级中文注释：日收益上限 10.00 USD（1000美分）
    pub const MaxDailyEarnings: u128 = 1_000;

    /// 函数级中文注释：月收益上限 200.00 USD
    pub const MaxMonthlyEarnings: u128 = 20_000;

    /// 函数级中文注释：观看计入收益的最短时长（秒）
    pub const MinWatchSeconds: u32 = 30;

    /// 函数级中文注释：评论计入收益的最短长度
    pub const MinCommentLen: u32 = 3;

    /// 函数级中文注释：缺省 CPM：50美分/千次播放
    pub const DefaultCpm: u128 = 50;
}

impl pallet_creator_ledger::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Currency = Balances;
    type AdminOrigin = frame_system::EnsureRoot<u64>;
    type RegionProvider = MockRegionProvider;
    type BlocksPerDay = BlocksPerDay;
    type MaxDailyEarnings = MaxDailyEarnings;
    type MaxMonthlyEarnings = MaxMonthlyEarnings;
    type MinWatchSeconds = MinWatchSeconds;
    type MinCommentLen = MinCommentLen;
    type DefaultCpm = DefaultCpm;
    type MaxRecentEvents = ConstU32<64>;
}

// ========================================
// 测试辅助函数
// ========================================

/// 测试账户
pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;

/// 函数级中文注释：创建测试环境
///
/// 账本余额是记账口径（美分），与链上 DUST 余额无关；
/// 仍为测试账户分配少量链上余额以保持账户存在。
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default()
        .build_storage()
        .unwrap();

    pallet_balances::GenesisConfig::<Test> {
        balances: vec![
            (ALICE, 1_000_000),
            (BOB, 1_000_000),
            (CHARLIE, 1_000_000),
        ],
        dev_accounts: None,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        REGIONS.with(|r| r.borrow_mut().clear());
    });
    ext
}

/// 函数级中文注释：前进到指定区块
pub fn run_to_block(n: u64) {
    while System::block_number() < n {
        System::set_block_number(System::block_number() + 1);
    }
}

/// 函数级中文注释：前进 n 天（BlocksPerDay=100）
pub fn advance_days(days: u64) {
    run_to_block(System::block_number() + days * 100);
}
