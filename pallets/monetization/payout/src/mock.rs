//! # Mock Runtime for Creator Payout Pallet Testing
//!
//! 函数级详细中文注释：提现 Pallet 的集成测试运行时
//!
//! 账本接入**真实**的 pallet-creator-ledger（锁定/借记语义按真实实现验证），
//! 网关/通知/风控为脚本化 Mock。

use crate as pallet_creator_payout;
use frame_support::{parameter_types, traits::ConstU32, BoundedVec};
use monetization_common::{
    DispatchOutcome, GatewayStatus, PayoutGateway, PayoutNotice, PayoutNotifier, PayoutProvider,
    RegionCode, RegionProvider, RiskProvider, TransactionId,
};
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

type Block = frame_system::mocking::MockBlock<Test>;

// 函数级中文注释：构建测试运行时
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Balances: pallet_balances,
        Ledger: pallet_creator_ledger,
        Payout: pallet_creator_payout,
    }
);

// ========================================
// System / Balances 配置
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
// Mock RegionProvider（缺省 US）
// ========================================

thread_local! {
    static REGIONS: RefCell<HashMap<u64, RegionCode>> = RefCell::new(HashMap::new());
}

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
// Creator Ledger 配置（真实账本）
// ========================================

parameter_types! {
    pub const BlocksPerDay: u64 = 100;
    pub const MaxDailyEarnings: u128 = 1_000;
    pub const MaxMonthlyEarnings: u128 = 20_000;
    pub const MinWatchSeconds: u32 = 30;
    pub const MinCommentLen: u32 = 3;
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
// Mock Gateway（脚本化派发/查询）
// ========================================

thread_local! {
    /// 函数级中文注释：预置派发结果队列（空则缺省 Accepted）
    static DISPATCH_OUTCOMES: RefCell<VecDeque<DispatchOutcome>> = RefCell::new(VecDeque::new());
    /// 函数级中文注释：派发调用记录 (provider, destination, net_amount, reference)
    static DISPATCH_CALLS: RefCell<Vec<(PayoutProvider, Vec<u8>, u128, u64)>> =
        RefCell::new(Vec::new());
    /// 函数级中文注释：预置状态查询结果（缺省 Unknown）
    static QUERY_STATUSES: RefCell<HashMap<u64, GatewayStatus>> = RefCell::new(HashMap::new());
}

pub struct MockGateway;

impl PayoutGateway<u128> for MockGateway {
    fn dispatch(
        provider: PayoutProvider,
        destination: &[u8],
        net_amount: u128,
        reference: u64,
    ) -> DispatchOutcome {
        DISPATCH_CALLS.with(|c| {
            c.borrow_mut()
                .push((provider, destination.to_vec(), net_amount, reference))
        });
        DISPATCH_OUTCOMES.with(|q| {
            q.borrow_mut().pop_front().unwrap_or(DispatchOutcome::Accepted {
                transaction_id: tx(b"MM-OK"),
            })
        })
    }

    fn query_status(_provider: PayoutProvider, reference: u64) -> GatewayStatus {
        QUERY_STATUSES.with(|m| {
            m.borrow()
                .get(&reference)
                .cloned()
                .unwrap_or(GatewayStatus::Unknown)
        })
    }
}

/// 函数级中文注释：构造网关交易号（测试辅助）
pub fn tx(raw: &[u8]) -> TransactionId {
    raw.to_vec().try_into().expect("test tx id fits")
}

/// 函数级中文注释：预置下一次派发结果
pub fn queue_dispatch_outcome(outcome: DispatchOutcome) {
    DISPATCH_OUTCOMES.with(|q| q.borrow_mut().push_back(outcome));
}

/// 函数级中文注释：预置状态查询结果
pub fn set_query_status(reference: u64, status: GatewayStatus) {
    QUERY_STATUSES.with(|m| {
        m.borrow_mut().insert(reference, status);
    });
}

/// 函数级中文注释：读取派发调用记录
pub fn dispatch_calls() -> Vec<(PayoutProvider, Vec<u8>, u128, u64)> {
    DISPATCH_CALLS.with(|c| c.borrow().clone())
}

// ========================================
// Mock Notifier（记录通知）
// ========================================

thread_local! {
    static NOTICES: RefCell<Vec<(u64, PayoutNotice, u128, PayoutProvider)>> =
        RefCell::new(Vec::new());
}

pub struct MockNotifier;

impl PayoutNotifier<u64, u128> for MockNotifier {
    fn notify(who: &u64, notice: PayoutNotice, amount: u128, provider: PayoutProvider) {
        NOTICES.with(|n| n.borrow_mut().push((*who, notice, amount, provider)));
    }
}

/// 函数级中文注释：读取通知记录
pub fn notices() -> Vec<(u64, PayoutNotice, u128, PayoutProvider)> {
    NOTICES.with(|n| n.borrow().clone())
}

// ========================================
// Mock RiskProvider（缺省 0 分）
// ========================================

thread_local! {
    static RISK_SCORES: RefCell<HashMap<u64, u8>> = RefCell::new(HashMap::new());
}

pub struct MockRisk;

impl RiskProvider<u64> for MockRisk {
    fn risk_score(who: &u64) -> u8 {
        RISK_SCORES.with(|r| r.borrow().get(who).copied().unwrap_or(0))
    }
}

/// 函数级中文注释：设置账户风险分（测试辅助）
pub fn set_risk(who: u64, score: u8) {
    RISK_SCORES.with(|r| {
        r.borrow_mut().insert(who, score);
    });
}

// ========================================
// Creator Payout 配置参数
// ========================================

parameter_types! {
    /// 函数级中文注释：标准通道最低提现 5.00 USD
    pub const MinWithdrawal: u128 = 500;

    /// 函数级中文注释：即时通道单笔上限 10.00 USD
    pub const MaxInstantWithdrawal: u128 = 1_000;

    /// 函数级中文注释：标准通道最低账龄 7 天
    pub const MinAccountAgeDays: u32 = 7;

    /// 函数级中文注释：标准通道最低活跃 10 次
    pub const MinActivityCount: u32 = 10;

    /// 函数级中文注释：每日最多 3 笔标准提现
    pub const MaxDailyWithdrawals: u32 = 3;

    /// 函数级中文注释：每月最多 50 笔标准提现
    pub const MaxMonthlyWithdrawals: u32 = 50;

    /// 函数级中文注释：风险分上限 70
    pub const MaxRiskScore: u8 = 70;

    /// 函数级中文注释：缺省费率 2%（200基点）
    pub const DefaultFeeBps: u32 = 200;

    /// 函数级中文注释：Processing 对账超时 10 区块
    pub const ProcessingTimeoutBlocks: u64 = 10;
}

impl pallet_creator_payout::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Currency = Balances;
    type AdminOrigin = frame_system::EnsureRoot<u64>;
    type Ledger = Ledger;
    type Gateway = MockGateway;
    type Notifier = MockNotifier;
    type Risk = MockRisk;
    type RegionProvider = MockRegionProvider;
    type BlocksPerDay = BlocksPerDay;
    type MinWithdrawal = MinWithdrawal;
    type MaxInstantWithdrawal = MaxInstantWithdrawal;
    type MinAccountAgeDays = MinAccountAgeDays;
    type MinActivityCount = MinActivityCount;
    type MaxDailyWithdrawals = MaxDailyWithdrawals;
    type MaxMonthlyWithdrawals = MaxMonthlyWithdrawals;
    type MaxRiskScore = MaxRiskScore;
    type DefaultFeeBps = DefaultFeeBps;
    type ProcessingTimeoutBlocks = ProcessingTimeoutBlocks;
    type MaxProvidersPerCountry = ConstU32<5>;
    type MaxInFlight = ConstU32<16>;
    type MaxReconcilePerBlock = ConstU32<8>;
    type MaxRecentRequests = ConstU32<32>;
}

// ========================================
// 测试辅助函数
// ========================================

/// 测试账户
pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;

/// 函数级中文注释：创建测试环境
///
/// 预置路由表：US → Stripe/MtnMomo，NG → MtnMomo/OrangeMoney/Wave
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default()
        .build_storage()
        .unwrap();

    pallet_balances::GenesisConfig::<Test> {
        balances: vec![(ALICE, 1_000_000), (BOB, 1_000_000)],
        dev_accounts: None,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        REGIONS.with(|r| r.borrow_mut().clear());
        DISPATCH_OUTCOMES.with(|q| q.borrow_mut().clear());
        DISPATCH_CALLS.with(|c| c.borrow_mut().clear());
        QUERY_STATUSES.with(|m| m.borrow_mut().clear());
        NOTICES.with(|n| n.borrow_mut().clear());
        RISK_SCORES.with(|r| r.borrow_mut().clear());

        set_providers(*b"US", vec![PayoutProvider::Stripe, PayoutProvider::MtnMomo]);
        set_providers(
            *b"NG",
            vec![
                PayoutProvider::MtnMomo,
                PayoutProvider::OrangeMoney,
                PayoutProvider::Wave,
            ],
        );
    });
    ext
}

/// 函数级中文注释：写入国家服务商路由表
pub fn set_providers(country: RegionCode, providers: Vec<PayoutProvider>) {
    let bounded: BoundedVec<PayoutProvider, ConstU32<5>> =
        providers.try_into().expect("provider list fits");
    pallet_creator_payout::CountryProviders::<Test>::insert(country, bounded);
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

/// 函数级中文注释：为账户入账指定美分（经真实账本的播放量分成通道）
///
/// DefaultCpm=50 → views = cents × 20；单日不得超过日收益上限 1000
pub fn credit(who: u64, cents: u128) {
    let views = (cents * 20) as u32;
    frame_support::assert_ok!(Ledger::record_views(RuntimeOrigin::root(), who, views, 1));
}

/// 函数级中文注释：铺垫标准提现资格
///
/// 单日分 10 笔入账（活跃次数 ≥10），再前进 7 天满足账龄
pub fn make_eligible(who: u64, total_cents: u128) {
    let per_event = total_cents / 10;
    for _ in 0..10 {
        credit(who, per_event);
    }
    advance_days(7);
}
