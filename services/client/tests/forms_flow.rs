//! End-to-end form behaviour against an in-memory network

use async_trait::async_trait;
use dex_amm::AmmError;
use dex_client::{
    ClientError, DexContext, DualGateStep, FormAction, FormState, LiquidityManager, PoolLookup,
    SwapForm, Transfers, WalletAdapter, WalletSession,
};
use dex_config::{defaults::mappings, DexConfig};
use dex_network::{
    InMemoryMappingReader, MappingReader, StaticKeyDeriver, SwapKeys, TransactionRequest,
    TransferKind,
};
use dex_types::{Address, Field, ProgramId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const OWNER: &str = "aleo1789vf4eq3dnm236j4us7w7aqqkgxxly7xf2hxvpqwxx3zzef35zq4t30xl";

fn field(s: &str) -> Field {
    s.parse().unwrap()
}

#[derive(Clone, Default)]
struct RecordingWallet {
    requests: Arc<Mutex<Vec<TransactionRequest>>>,
}

#[async_trait]
impl WalletAdapter for RecordingWallet {
    async fn connect(&self) -> dex_client::Result<Address> {
        Ok(OWNER.parse().unwrap())
    }

    async fn request_transaction(&self, request: &TransactionRequest) -> dex_client::Result<String> {
        let mut requests = self.requests.lock();
        requests.push(request.clone());
        Ok(format!("tx-{}", requests.len()))
    }

    async fn disconnect(&self) -> dex_client::Result<()> {
        Ok(())
    }
}

/// Delays every read so refreshes overlap with edits
struct SlowReader {
    inner: Arc<InMemoryMappingReader>,
    delay: Duration,
}

#[async_trait]
impl MappingReader for SlowReader {
    async fn get_mapping_value(
        &self,
        program: &ProgramId,
        mapping: &str,
        key: &str,
    ) -> dex_network::Result<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_mapping_value(program, mapping, key).await
    }
}

struct Harness {
    config: DexConfig,
    reader: Arc<InMemoryMappingReader>,
    wallet: RecordingWallet,
    ctx: DexContext,
}

impl Harness {
    async fn new() -> Self {
        Self::build(None, true).await
    }

    async fn build(read_delay: Option<Duration>, connect: bool) -> Self {
        let config = DexConfig::default();
        let owner: Address = OWNER.parse().unwrap();
        let reader = Arc::new(InMemoryMappingReader::new());

        let deriver = StaticKeyDeriver::new()
            .with_swap_keys(
                owner.clone(),
                field("1field"),
                field("2field"),
                SwapKeys {
                    allowance_in: field("11field"),
                    allowance_out: field("22field"),
                    pair_id: field("33field"),
                },
            )
            .with_balance_key(field("33field"), owner, field("44field"));

        let wallet = RecordingWallet::default();
        let session = Arc::new(WalletSession::new(wallet.clone()));
        if connect {
            session.connect().await.unwrap();
        }

        let network: Arc<dyn MappingReader> = match read_delay {
            Some(delay) => Arc::new(SlowReader {
                inner: reader.clone(),
                delay,
            }),
            None => reader.clone(),
        };
        let ctx = DexContext::new(&config, session, network, Arc::new(deriver));

        Self {
            config,
            reader,
            wallet,
            ctx,
        }
    }

    fn with_pool(self) -> Self {
        self.reader.insert(
            &self.config.programs.dex,
            mappings::PAIRS,
            "33field",
            "{\n  reserve_a: 1000u128,\n  reserve_b: 2000u128\n}",
        );
        self.reader.insert(
            &self.config.programs.token_registry,
            mappings::REGISTERED_TOKENS,
            "33field",
            "{ token_id: 33field, max_supply: 10000000u128, supply: 500u128, decimals: 6u8 }",
        );
        self
    }

    fn set_allowance(&self, key: &str, amount: u128) {
        self.reader.insert(
            &self.config.programs.token_registry,
            mappings::ALLOWANCES,
            key,
            format!("{}u128", amount),
        );
    }

    fn set_lp_balance(&self, balance: u128) {
        self.reader.insert(
            &self.config.programs.token_registry,
            mappings::AUTHORIZED_BALANCES,
            "44field",
            format!(
                "{{ account: {}, token_id: 33field, balance: {}u128, authorized_until: 4294967295u32 }}",
                OWNER, balance
            ),
        );
    }

    fn requests(&self) -> Vec<TransactionRequest> {
        self.wallet.requests.lock().clone()
    }
}

fn literals(request: &TransactionRequest) -> Vec<String> {
    request.transitions[0]
        .inputs
        .iter()
        .map(|i| i.as_literal().unwrap_or("<record>").to_string())
        .collect()
}

#[tokio::test]
async fn swap_requires_approval_then_swaps() {
    let h = Harness::new().await.with_pool();
    let form = SwapForm::new(h.ctx.clone());
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(100).unwrap();

    let state = form.refresh().await;
    let FormState::NeedsApproval(preview) = &state else {
        panic!("expected NeedsApproval, got {}", state);
    };
    assert_eq!(preview.quote.output_amount, 181);
    assert_eq!(preview.allowance, 0);
    assert_eq!(state.action(), Some(FormAction::Approve));
    assert!(form.swap_transaction().is_err());

    form.submit().await.unwrap();
    let approve = &h.requests()[0];
    assert_eq!(approve.transitions[0].function_name, "approve_public");
    assert_eq!(literals(approve), vec!["1field", OWNER, "100u128"]);
    assert_eq!(approve.fee, 35_000);

    // Approval lands on chain
    h.set_allowance("11field", 100);
    let state = form.refresh().await;
    assert_eq!(state.action(), Some(FormAction::Act));

    let id = form.submit().await.unwrap();
    assert_eq!(form.last_submission(), Some(id));
    let swap = &h.requests()[1];
    assert_eq!(swap.transitions[0].function_name, "swap_exact_tokens_for_tokens");
    assert_eq!(
        literals(swap),
        vec!["1field", "2field", "100u128", "1000u128", "2000u128", OWNER]
    );
    assert_eq!(swap.fee, 500_000);
}

#[tokio::test]
async fn smaller_allowance_refetch_flips_back() {
    let h = Harness::new().await.with_pool();
    h.set_allowance("11field", 100);
    let form = SwapForm::new(h.ctx.clone());
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(100).unwrap();
    assert_eq!(form.refresh().await.action(), Some(FormAction::Act));

    h.set_allowance("11field", 99);
    assert_eq!(form.refresh().await.action(), Some(FormAction::Approve));
}

#[tokio::test]
async fn missing_pair_offers_no_action() {
    let h = Harness::new().await;
    let form = SwapForm::new(h.ctx.clone());
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(100).unwrap();

    let state = form.refresh().await;
    assert_eq!(state, FormState::PairMissing);
    assert_eq!(state.action(), None);
    assert!(matches!(
        form.submit().await,
        Err(ClientError::ActionUnavailable { .. })
    ));
    assert!(h.requests().is_empty());
}

#[tokio::test]
async fn fetch_failure_surfaces_as_error_state() {
    let h = Harness::new().await.with_pool();
    h.reader.fail_mapping(mappings::ALLOWANCES);
    let form = SwapForm::new(h.ctx.clone());
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(100).unwrap();

    assert!(matches!(form.refresh().await, FormState::Error(_)));
}

#[tokio::test]
async fn disconnected_wallet_is_an_error_state() {
    let h = Harness::build(None, false).await.with_pool();
    let form = SwapForm::new(h.ctx.clone());
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(100).unwrap();

    match form.refresh().await {
        FormState::Error(message) => assert!(message.contains("not connected")),
        other => panic!("unexpected {}", other),
    }
}

#[tokio::test]
async fn edit_after_ready_withdraws_the_action() {
    let h = Harness::new().await.with_pool();
    h.set_allowance("11field", 1000);
    let form = SwapForm::new(h.ctx.clone());
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(50).unwrap();
    assert_eq!(form.refresh().await.action(), Some(FormAction::Act));

    // New amount exceeds the allowance; the amount-50 quote must not be offered
    form.set_amount(5000).unwrap();
    assert_eq!(form.state(), FormState::Loading);
    assert_eq!(form.state().action(), None);
    assert!(matches!(
        form.submit().await,
        Err(ClientError::ActionUnavailable { .. })
    ));
    assert!(h.requests().is_empty());

    let state = form.refresh().await;
    assert_eq!(state.action(), Some(FormAction::Approve));
    assert_eq!(state.data().unwrap().quote.input_amount, 5000);

    form.set_amount(0).unwrap();
    assert_eq!(form.state(), FormState::Idle);
}

#[tokio::test(start_paused = true)]
async fn edits_are_debounced_into_one_refresh() {
    let h = Harness::new().await.with_pool();
    let form = SwapForm::new(h.ctx.clone());

    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    for amount in [1, 10, 100] {
        form.set_amount(amount).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert_eq!(h.reader.read_count(), 0);
    assert_eq!(form.state(), FormState::Loading);

    tokio::time::sleep(Duration::from_millis(900)).await;
    // One allowance read and one pair read
    assert_eq!(h.reader.read_count(), 2);
    let state = form.state();
    assert_eq!(state.data().unwrap().quote.input_amount, 100);
}

#[tokio::test(start_paused = true)]
async fn dispose_cancels_pending_refresh() {
    let h = Harness::new().await.with_pool();
    let form = SwapForm::new(h.ctx.clone());
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(100).unwrap();

    form.dispose();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(h.reader.read_count(), 0);
    assert_eq!(form.state().action(), None);
    assert!(matches!(form.set_amount(5), Err(ClientError::Disposed)));
}

#[tokio::test(start_paused = true)]
async fn superseded_refresh_is_discarded() {
    let h = Harness::build(Some(Duration::from_millis(500)), true)
        .await
        .with_pool();
    let form = Arc::new(SwapForm::new(h.ctx.clone()));
    form.set_token_in(field("1field")).unwrap();
    form.set_token_out(field("2field")).unwrap();
    form.set_amount(100).unwrap();

    let in_flight = {
        let form = Arc::clone(&form);
        tokio::spawn(async move { form.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    form.set_amount(300).unwrap();

    // The first refresh completes but its amount-100 quote is not published
    let _ = in_flight.await.unwrap();
    assert!(form.state().data().is_none());

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(form.state().data().unwrap().quote.input_amount, 300);
}

#[tokio::test]
async fn pool_lookup_reports_pair_and_both_allowances() {
    let h = Harness::new().await.with_pool();
    h.set_allowance("11field", 7);
    h.set_allowance("22field", 9);
    let lookup = PoolLookup::new(h.ctx.clone());
    lookup.set_token_a(field("1field")).unwrap();
    lookup.set_token_b(field("2field")).unwrap();

    let state = lookup.refresh().await;
    let FormState::Ready(snapshot) = &state else {
        panic!("expected Ready, got {}", state);
    };
    assert_eq!((snapshot.pair.reserve_a, snapshot.pair.reserve_b), (1000, 2000));
    assert_eq!(snapshot.allowance_a, 7);
    assert_eq!(snapshot.allowance_b, 9);
    assert_eq!(snapshot.keys.pair_id, field("33field"));
    assert_eq!(snapshot.token_a, field("1field"));
}

#[tokio::test]
async fn pool_lookup_without_pair() {
    let h = Harness::new().await;
    let lookup = PoolLookup::new(h.ctx.clone());
    lookup.set_token_a(field("1field")).unwrap();
    assert_eq!(lookup.state(), FormState::Idle);
    lookup.set_token_b(field("2field")).unwrap();

    assert_eq!(lookup.refresh().await, FormState::PairMissing);
}

#[tokio::test(start_paused = true)]
async fn pool_lookup_is_debounced() {
    let h = Harness::new().await.with_pool();
    let lookup = PoolLookup::new(h.ctx.clone());
    lookup.set_token_a(field("1field")).unwrap();
    lookup.set_token_b(field("2field")).unwrap();
    assert_eq!(lookup.state(), FormState::Loading);

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert_eq!(h.reader.read_count(), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    // Pair plus both allowances
    assert_eq!(h.reader.read_count(), 3);
    assert!(matches!(lookup.state(), FormState::Ready(_)));
    lookup.dispose();
}

#[tokio::test]
async fn add_liquidity_approves_a_then_b_then_deposits() {
    let h = Harness::new().await.with_pool();
    h.set_lp_balance(100);

    let manager = LiquidityManager::new(h.ctx.clone(), field("1field"), field("2field"));
    let position = manager.refresh().await;
    let position = position.data().expect("position loaded");
    assert_eq!(position.balance, 100);
    assert_eq!(position.reserves.total_supply, 500);
    assert_eq!(position.lp_token_id(), &field("33field"));

    let form = manager.add_liquidity().unwrap();
    let state = form.set_amount_a(100).unwrap();
    let preview = *state.data().unwrap();
    assert_eq!(preview.amount_b, 200);
    assert_eq!(preview.step, DualGateStep::ApproveA);

    form.submit().await.unwrap();
    assert_eq!(literals(&h.requests()[0]), vec!["1field", OWNER, "100u128"]);

    h.set_allowance("11field", 100);
    let state = form.refresh_allowances().await.unwrap();
    assert_eq!(state.data().unwrap().step, DualGateStep::ApproveB);
    form.submit().await.unwrap();
    assert_eq!(literals(&h.requests()[1]), vec!["2field", OWNER, "200u128"]);

    h.set_allowance("22field", 200);
    let state = form.refresh_allowances().await.unwrap();
    assert_eq!(state.action(), Some(FormAction::Act));
    form.submit().await.unwrap();

    let deposit = &h.requests()[2];
    assert_eq!(deposit.transitions[0].function_name, "add_liquidity");
    assert_eq!(
        literals(deposit),
        vec!["1field", "2field", "100u128", "200u128", "500u128", "1000u128", "2000u128"]
    );
    assert_eq!(deposit.fee, 750_000);
}

#[tokio::test]
async fn remove_liquidity_slider_and_withdrawal() {
    let h = Harness::new().await.with_pool();
    h.set_lp_balance(100);

    let manager = LiquidityManager::new(h.ctx.clone(), field("1field"), field("2field"));
    manager.refresh().await;
    let form = manager.remove_liquidity().unwrap();

    let state = form.set_percentage(50).unwrap();
    let preview = *state.data().unwrap();
    assert_eq!(preview.removed, 50);
    assert_eq!((preview.withdrawal.withdraw_a, preview.withdrawal.withdraw_b), (100, 200));

    let state = form.set_amount(33).unwrap();
    assert_eq!(state.data().unwrap().percentage, 33);
    assert_eq!(form.input().removed_amount(), 33);

    let state = form.set_amount(150).unwrap();
    assert!(matches!(state, FormState::Error(_)));
    assert!(form.remove_transaction().is_err());

    form.set_amount(50).unwrap();
    form.submit().await.unwrap();
    let request = &h.requests()[0];
    assert_eq!(
        literals(request),
        vec!["1field", "2field", "50u128", "500u128", "1000u128", "2000u128", OWNER]
    );
}

#[tokio::test]
async fn remove_liquidity_needs_a_balance() {
    let h = Harness::new().await.with_pool();
    let manager = LiquidityManager::new(h.ctx.clone(), field("1field"), field("2field"));
    assert_eq!(manager.refresh().await.data().unwrap().balance, 0);

    assert!(matches!(
        manager.remove_liquidity(),
        Err(ClientError::Amm(AmmError::EmptyBalance))
    ));
}

#[tokio::test]
async fn transfers_validate_record_usage() {
    let h = Harness::new().await;
    let transfers = Transfers::new(h.ctx.clone());
    let recipient: Address = OWNER.parse().unwrap();

    assert!(matches!(
        transfers.transaction(TransferKind::Private, &recipient, 10, None),
        Err(ClientError::InvalidInput(_))
    ));
    assert!(matches!(
        transfers.transaction(TransferKind::Public, &recipient, 0, None),
        Err(ClientError::InvalidInput(_))
    ));

    transfers
        .submit(TransferKind::PublicToPrivate, &recipient, 10, None)
        .await
        .unwrap();
    let request = &h.requests()[0];
    assert_eq!(request.transitions[0].function_name, "transfer_public_to_private");
    assert_eq!(literals(request), vec![OWNER, "10u64"]);
}
