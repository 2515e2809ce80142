//! DEX command line client
//!
//! Usage:
//!   dex quote --pair 33field --amount 100
//!   dex swap --owner aleo1... --token-in 1field --token-out 2field --amount 100 \
//!       --allowance-in-key 11field --allowance-out-key 22field --pair-id 33field
//!   dex transfer --owner aleo1... --kind public --recipient aleo1... --amount 5000
//!
//! Read commands query the configured explorer API. Transaction commands
//! write the request JSON to the output directory for an external signer.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dex_amm::SwapQuoteCalculator;
use dex_client::{
    DexContext, FormAction, FormState, JsonExportWallet, LiquidityManager, SwapForm, Transfers,
    WalletSession,
};
use dex_config::{load_config, DexConfig};
use dex_network::{
    HttpMappingReader, MappingQueries, MappingReader, StaticKeyDeriver, SwapKeys, TransferKind,
};
use dex_types::{Address, Field};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dex")]
#[command(about = "Aleo DEX client: quotes, pool lookups and transaction requests")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/dex.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Environment overlay from config/environments/<ENV>.toml
    #[arg(short, long, global = true)]
    env: Option<String>,

    /// Directory transaction requests are written to
    #[arg(short, long, global = true, default_value = "transactions")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote an exact-input swap against a pair's reserves
    Quote {
        /// Pair id in the DEX `pairs` mapping
        #[arg(long)]
        pair: Field,
        #[arg(long)]
        amount: u128,
    },
    /// Show reserves, LP supply and optional allowances of a pair
    Pool {
        #[arg(long)]
        pair: Field,
        /// `allowances` keys to report alongside the pair
        #[arg(long = "allowance-key")]
        allowance_keys: Vec<Field>,
    },
    /// Show a token balance under an `authorized_balances` key
    Balance {
        #[arg(long)]
        key: Field,
    },
    /// Approve or swap, whichever the current allowance requires
    Swap {
        #[command(flatten)]
        pair: PairArgs,
        #[arg(long)]
        amount: u128,
    },
    /// Approve the DEX to spend a token
    Approve {
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        token: Field,
        #[arg(long)]
        amount: u128,
    },
    /// Next step of a paired deposit: approve A, approve B, or deposit
    AddLiquidity {
        #[command(flatten)]
        pair: PairArgs,
        #[arg(long)]
        balance_key: Field,
        #[arg(long)]
        amount_a: u128,
    },
    /// Withdraw LP tokens by amount or percentage
    RemoveLiquidity {
        #[command(flatten)]
        pair: PairArgs,
        #[arg(long)]
        balance_key: Field,
        #[arg(long, conflicts_with = "percent", required_unless_present = "percent")]
        amount: Option<u128>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: Option<u8>,
    },
    /// Transfer credits
    Transfer {
        #[arg(long)]
        owner: Address,
        #[arg(long, value_enum)]
        kind: TransferArg,
        #[arg(long)]
        recipient: Address,
        /// Microcredits
        #[arg(long)]
        amount: u64,
        /// JSON file holding the credits record for private transfers
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// Token pair and the precomputed keys for the owner
#[derive(Args)]
struct PairArgs {
    #[arg(long)]
    owner: Address,
    #[arg(long)]
    token_in: Field,
    #[arg(long)]
    token_out: Field,
    #[arg(long)]
    allowance_in_key: Field,
    #[arg(long)]
    allowance_out_key: Field,
    #[arg(long)]
    pair_id: Field,
}

impl PairArgs {
    fn keys(&self) -> SwapKeys {
        SwapKeys {
            allowance_in: self.allowance_in_key.clone(),
            allowance_out: self.allowance_out_key.clone(),
            pair_id: self.pair_id.clone(),
        }
    }

    fn deriver(&self) -> StaticKeyDeriver {
        StaticKeyDeriver::new().with_swap_keys(
            self.owner.clone(),
            self.token_in.clone(),
            self.token_out.clone(),
            self.keys(),
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TransferArg {
    Public,
    PublicToPrivate,
    Private,
    PrivateToPublic,
}

impl From<TransferArg> for TransferKind {
    fn from(arg: TransferArg) -> Self {
        match arg {
            TransferArg::Public => TransferKind::Public,
            TransferArg::PublicToPrivate => TransferKind::PublicToPrivate,
            TransferArg::Private => TransferKind::Private,
            TransferArg::PrivateToPublic => TransferKind::PrivateToPublic,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dex_client=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.env.as_deref())?;
    debug!("Using endpoint {}/{}", config.network.endpoint, config.network.network);

    let reader: Arc<dyn MappingReader> =
        Arc::new(HttpMappingReader::new(&config.network).context("Failed to create HTTP client")?);
    let queries = MappingQueries::new(Arc::clone(&reader), config.programs.clone());

    match cli.command {
        Commands::Quote { pair, amount } => {
            let record = queries
                .pair(&pair)
                .await?
                .with_context(|| format!("Pair {} does not exist", pair))?;
            let quote = SwapQuoteCalculator::quote(amount, record.reserve_a, record.reserve_b)?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
            if let Some(line) = price_impact_line(amount, record.reserve_a, record.reserve_b) {
                println!("{}", line);
            }
        }
        Commands::Pool {
            pair,
            allowance_keys,
        } => {
            let (record, token) = tokio::try_join!(queries.pair(&pair), queries.token(&pair))?;
            let record = record.with_context(|| format!("Pair {} does not exist", pair))?;
            println!("reserve_a: {}", record.reserve_a);
            println!("reserve_b: {}", record.reserve_b);
            match token {
                Some(token) => println!("lp supply: {}", token.supply),
                None => println!("lp supply: not registered"),
            }
            for key in &allowance_keys {
                println!("allowance {}: {}", key, queries.allowance(key).await?);
            }
        }
        Commands::Balance { key } => match queries.balance(&key).await? {
            Some(balance) => println!("{}: {}", balance.token_id, balance.balance),
            None => println!("no balance under {}", key),
        },
        Commands::Swap { pair, amount } => {
            let ctx = connect(&config, &cli.out_dir, &pair.owner, reader, pair.deriver()).await?;
            let form = SwapForm::new(ctx);
            form.set_token_in(pair.token_in.clone())?;
            form.set_token_out(pair.token_out.clone())?;
            form.set_amount(amount)?;

            let state = form.refresh().await;
            match &state {
                FormState::Ready(preview) | FormState::NeedsApproval(preview) => {
                    println!("expected output: {}", preview.quote.output_amount);
                    println!("allowance: {}", preview.allowance);
                }
                FormState::PairMissing => bail!("Pair does not exist"),
                other => bail!("Swap form is {}", other),
            }
            let function = match state.action() {
                Some(FormAction::Approve) => "approve_public",
                _ => "swap_exact_tokens_for_tokens",
            };
            let id = form.submit().await?;
            println!("{} request {} written to {}", function, id, cli.out_dir.display());
            form.dispose();
        }
        Commands::Approve {
            owner,
            token,
            amount,
        } => {
            let ctx = connect(&config, &cli.out_dir, &owner, reader, StaticKeyDeriver::new()).await?;
            let request = ctx.calls.approve_public(&owner, &token, amount);
            let id = ctx.session.submit(&request).await?;
            println!("approve_public request {} written to {}", id, cli.out_dir.display());
        }
        Commands::AddLiquidity {
            pair,
            balance_key,
            amount_a,
        } => {
            let deriver = pair.deriver().with_balance_key(
                pair.pair_id.clone(),
                pair.owner.clone(),
                balance_key,
            );
            let ctx = connect(&config, &cli.out_dir, &pair.owner, reader, deriver).await?;
            let manager = load_position(ctx, &pair).await?;
            let form = manager.add_liquidity()?;

            let state = form.set_amount_a(amount_a)?;
            let preview = state
                .data()
                .copied()
                .with_context(|| format!("Add liquidity form is {}", state))?;
            println!("token b amount: {}", preview.amount_b);
            let id = form.submit().await?;
            println!("{:?} request {} written to {}", preview.step, id, cli.out_dir.display());
        }
        Commands::RemoveLiquidity {
            pair,
            balance_key,
            amount,
            percent,
        } => {
            let deriver = pair.deriver().with_balance_key(
                pair.pair_id.clone(),
                pair.owner.clone(),
                balance_key,
            );
            let ctx = connect(&config, &cli.out_dir, &pair.owner, reader, deriver).await?;
            let manager = load_position(ctx, &pair).await?;
            let form = manager.remove_liquidity()?;

            let state = match (amount, percent) {
                (Some(amount), _) => form.set_amount(amount)?,
                (None, Some(percent)) => form.set_percentage(percent)?,
                (None, None) => bail!("Either --amount or --percent is required"),
            };
            let preview = state
                .data()
                .copied()
                .with_context(|| format!("Remove liquidity form is {}", state))?;
            println!(
                "removing {} LP ({}%): {} token a, {} token b",
                preview.removed,
                preview.percentage,
                preview.withdrawal.withdraw_a,
                preview.withdrawal.withdraw_b
            );
            let id = form.submit().await?;
            println!("remove_liquidity request {} written to {}", id, cli.out_dir.display());
        }
        Commands::Transfer {
            owner,
            kind,
            recipient,
            amount,
            record,
        } => {
            let record = match record {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read record {}", path.display()))?;
                    Some(serde_json::from_str(&raw).context("Record is not valid JSON")?)
                }
                None => None,
            };
            let ctx = connect(&config, &cli.out_dir, &owner, reader, StaticKeyDeriver::new()).await?;
            let kind = TransferKind::from(kind);
            let id = Transfers::new(ctx)
                .submit(kind, &recipient, amount, record)
                .await?;
            println!("{} request {} written to {}", kind.function_name(), id, cli.out_dir.display());
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

/// Context with an exporting wallet connected as `owner`
async fn connect(
    config: &DexConfig,
    out_dir: &Path,
    owner: &Address,
    reader: Arc<dyn MappingReader>,
    deriver: StaticKeyDeriver,
) -> Result<DexContext> {
    let session = Arc::new(WalletSession::new(JsonExportWallet::new(out_dir, owner.clone())));
    session.connect().await.context("Failed to open export wallet")?;
    info!("Exporting requests for {} to {}", owner, out_dir.display());
    Ok(DexContext::new(config, session, reader, Arc::new(deriver)))
}

async fn load_position(ctx: DexContext, pair: &PairArgs) -> Result<LiquidityManager> {
    let manager = LiquidityManager::new(ctx, pair.token_in.clone(), pair.token_out.clone());
    match manager.refresh().await {
        FormState::Ready(position) => {
            println!(
                "reserves {}/{}, lp supply {}, lp balance {}",
                position.reserves.reserve_a,
                position.reserves.reserve_b,
                position.reserves.total_supply,
                position.balance
            );
            Ok(manager)
        }
        FormState::PairMissing => bail!("Pair does not exist"),
        other => bail!("Liquidity position is {}", other),
    }
}

/// Display line for the price impact, if the pool can price the trade at all
fn price_impact_line(amount: u128, reserve_in: u128, reserve_out: u128) -> Option<String> {
    match SwapQuoteCalculator::calculate_price_impact(amount, reserve_in, reserve_out) {
        Ok(impact) => Some(format!("price impact: {}%", impact.round_dp(4))),
        Err(e) => {
            debug!("No price impact for this quote: {}", e);
            None
        }
    }
}
