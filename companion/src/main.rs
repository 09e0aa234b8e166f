//! `xcrypt` - command line front end of the wallet companion.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use companion::app::{MarketState, SessionContext};
use companion::services::explorer::PREVIEW_LEN;
use companion::SessionError;
use shared::{shorten_address, Currency, FormField, History};

#[derive(Parser)]
#[command(name = "xcrypt", version, about = "Ethereum wallet companion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the market snapshot
    Prices {
        /// Keep polling and reprint on every update
        #[arg(long)]
        watch: bool,
        /// Show every coin instead of the first page
        #[arg(long)]
        all: bool,
    },
    /// Convert an ETH amount to USD and INR
    Convert { amount: String },
    /// Show the transaction ledger
    History,
    /// Show recent explorer transactions
    Explorer {
        /// Show every entry instead of the preview
        #[arg(long)]
        all: bool,
    },
    /// Connect the wallet
    Connect,
    /// Send ETH and record it on the ledger
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        message: String,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "XCRYPT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show session status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = companion::debug::init_logger();
    let config = lib_core::config::init_config().context("Failed to load configuration")?;
    let session = SessionContext::from_config(config).context("Failed to set up session")?;

    session.initialize().await;
    let result = run(&session, cli.command).await;
    session.teardown();

    result?;
    Ok(())
}

async fn run(session: &SessionContext, command: Command) -> Result<(), SessionError> {
    match command {
        Command::Prices { watch, all } => {
            if !watch {
                session.refresh_market().await;
                print_market(&session.market(), all);
                return Ok(());
            }

            let events = session.events();
            session.start_market_polling();
            println!("Watching market data (Ctrl+C to stop)");
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = events.recv() => match event {
                        Ok(companion::SessionEvent::MarketUpdated(_)) => print_market(&session.market(), all),
                        Ok(companion::SessionEvent::MarketFailed(message)) => eprintln!("Market refresh failed: {}", message),
                        Ok(_) => {}
                        Err(_) => break,
                    },
                }
            }
            session.stop_market_polling();
        }
        Command::Convert { amount } => {
            let converter = session.converter();
            let amount = converter.set_amount(&amount);
            converter.refresh_quote().await;
            for currency in [Currency::Usd, Currency::Inr] {
                match converter.convert(currency) {
                    Some(value) => println!("{} ETH = {}{} {}", amount, currency.symbol(), value, currency),
                    None => println!("Fetching price..."),
                }
            }
        }
        Command::History => print_history(&session.history(), session.transaction_count()),
        Command::Explorer { all } => {
            let state = session.refresh_explorer().await;
            if let Some(notice) = &state.notice {
                println!("{}", notice);
            }
            if state.source.is_sample() {
                println!("(sample data)");
            }
            for tx in state.visible(all) {
                println!(
                    "{}  {} -> {}  {} ETH  {}",
                    lib_utils::format_local_date(tx.timestamp),
                    shorten_address(&tx.from),
                    shorten_address(&tx.to),
                    tx.value.display_rounded(4),
                    tx.status.label()
                );
            }
            if !all && state.hidden_count() > 0 {
                println!("... {} more (use --all; preview shows {})", state.hidden_count(), PREVIEW_LEN);
            }
        }
        Command::Connect => {
            let account = session.connect().await?;
            println!("Connected: {}", shorten_address(&account));
            print_history(&session.history(), session.transaction_count());
        }
        Command::Send {
            to,
            amount,
            keyword,
            message,
        } => {
            if !session.is_connected() {
                session.connect().await?;
            }
            session.update_form(FormField::AddressTo, to);
            session.update_form(FormField::Amount, amount);
            session.update_form(FormField::Keyword, keyword);
            session.update_form(FormField::Message, message);

            println!("Waiting for wallet approval...");
            let submission = session.submit_form().await?;
            println!("Transfer:      {}", submission.transfer_hash);
            println!("Ledger record: {}", submission.record_hash);
            if let Some(count) = submission.transaction_count {
                println!("Ledger now holds {} transactions", count);
            }
        }
        Command::Login { email, password } => {
            let user = session.sign_in(&email, &password).await?;
            println!("Signed in as {} ({})", user.email, user.uid);
        }
        Command::Status => {
            let state = session.snapshot();
            println!("Provider:     {}", if state.provider_installed { "installed" } else { "not installed" });
            println!(
                "Account:      {}",
                state.account.as_deref().map(shorten_address).unwrap_or_else(|| "-".to_string())
            );
            println!(
                "Transactions: {}",
                state.transaction_count.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
            );
            println!("History:      {:?} ({} records)", state.history.source, state.history.len());
            if let Some(reason) = state.history.fallback {
                println!("Fallback:     {}", reason);
            }
            if let Some(error) = &state.error {
                println!("Error:        {}", error);
            }
        }
    }
    Ok(())
}

fn print_market(market: &MarketState, all: bool) {
    if let Some(error) = &market.error {
        println!("{}", error);
        return;
    }
    let coins = if all { &market.coins[..] } else { market.visible() };
    for (rank, coin) in coins.iter().enumerate() {
        let price = coin
            .current_price
            .map(|p| format!("${:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        let change = coin
            .day_change_percent
            .map(|c| format!("{}{:.2}%", if coin.is_up() { "▲" } else { "▼" }, c.abs()))
            .unwrap_or_default();
        println!("{:>3}. {:<20} {:<6} {:>14} {}", rank + 1, coin.name, coin.symbol.to_uppercase(), price, change);
    }
    if !all && market.remaining() > 0 {
        println!("... {} more (use --all)", market.remaining());
    }
    if let Some(at) = market.last_updated {
        println!("Updated {}", at.format("%-I:%M:%S %p"));
    }
}

fn print_history(history: &History, count: Option<u64>) {
    if history.is_using_sample() {
        match history.fallback {
            Some(reason) => println!("Showing sample data ({})", reason),
            None => println!("Showing sample data"),
        }
    }
    for record in &history.records {
        println!(
            "{}  {} -> {}  {} ETH  [{}] {}",
            record.timestamp,
            shorten_address(&record.address_from),
            shorten_address(&record.address_to),
            record.amount,
            record.keyword,
            record.message
        );
    }
    if let Some(count) = count {
        println!("{} transactions on the ledger", count);
    }
}
