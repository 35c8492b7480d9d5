//! Interactive console front end.
//!
//! Each console command maps to exactly one component operation:
//! `connect`/`disconnect` → session, `send` → submitter, `balance` →
//! session refresh, `history` → transaction log, `qr` → presenter. The loop
//! also drains passive provider events between commands, so account and
//! chain changes land even while the prompt is idle. Everything runs on the
//! one loop; shared state needs no locking.

use colored::Colorize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::schema::{NetworkDescriptor, WalletConfig};
use crate::error::WalletError;
use crate::history::{TransactionLog, TransferRecord};
use crate::provider::{ProviderEvent, WalletProvider};
use crate::qr::QrPresenter;
use crate::session::{SessionChange, WalletSession};
use crate::transfer::{SubmitStatus, TransferSubmitter};

/// Console application state.
pub struct App {
    session: WalletSession,
    submitter: TransferSubmitter,
    log: TransactionLog,
    qr: QrPresenter,
    network: NetworkDescriptor,
}

impl App {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        config: &WalletConfig,
        log: TransactionLog,
    ) -> Self {
        let session = WalletSession::new(provider, config.network.clone());
        let submitter = TransferSubmitter::new(&session);
        Self {
            session,
            submitter,
            log,
            qr: QrPresenter::new(),
            network: config.network.clone(),
        }
    }

    /// Run the command loop until EOF or `quit`.
    pub async fn run(mut self) {
        let mut events = self.session.subscribe_events();
        println!(
            "{}",
            format!(
                "{} wallet — type 'help' for commands",
                self.network.chain_name
            )
            .bold()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if !self.handle_line(line.trim()).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        tracing::error!(error = %err, "stdin read failed");
                        break;
                    }
                },
                event = events.recv() => {
                    if let Ok(event) = event {
                        self.handle_provider_event(event).await;
                    }
                }
            }
        }
    }

    async fn handle_line(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        match parts.next() {
            None => {}
            Some("help") => print_help(),
            Some("connect") => self.connect().await,
            Some("disconnect") => {
                self.session.disconnect();
                println!("{}", "Wallet disconnected".yellow());
            }
            Some("balance") => self.balance().await,
            Some("send") => {
                let to = parts.next().unwrap_or("");
                let amount = parts.next().unwrap_or("");
                if to.is_empty() || amount.is_empty() {
                    println!("usage: send <recipient> <amount>");
                } else {
                    self.send(to, amount).await;
                }
            }
            Some("history") => self.history(),
            Some("qr") => self.qr_toggle(),
            Some("quit") | Some("exit") => return false,
            Some(other) => println!("unknown command '{other}', type 'help'"),
        }
        true
    }

    async fn connect(&mut self) {
        match self.session.connect().await {
            Ok(address) => {
                println!("{} {}", "Wallet connected:".green(), address);
                if let Some(url) = self.network.address_url(&address.to_string()) {
                    println!("  {url}");
                }
                self.print_balance_line();
            }
            Err(err) => print_error(&err),
        }
    }

    async fn balance(&mut self) {
        if !self.session.is_connected() {
            print_error(&WalletError::NoActiveAddress);
            return;
        }
        match self.session.refresh_balance().await {
            Ok(()) => self.print_balance_line(),
            Err(err) => print_error(&err),
        }
    }

    async fn send(&mut self, to: &str, amount: &str) {
        let mut status = self.submitter.status();
        let network = self.network.clone();
        let symbol = network.native_currency.symbol.clone();

        // Print progress transitions while the submission is in flight; the
        // terminal outcome is reported from the call's own result. The inner
        // scope releases the future's borrows before the session is read
        // again below.
        let result = {
            let submit = self
                .submitter
                .submit(&mut self.session, &mut self.log, to, amount);
            tokio::pin!(submit);
            loop {
                tokio::select! {
                    result = &mut submit => break result,
                    changed = status.changed() => {
                        if changed.is_ok() {
                            let current = status.borrow_and_update().clone();
                            print_progress(&current, &network);
                        }
                    }
                }
            }
        };

        match result {
            Ok(confirmed) => {
                println!(
                    "{} {}",
                    "Transfer confirmed in block".green(),
                    confirmed.block_number
                );
                if let Some(url) = network.tx_url(&confirmed.hash.to_string()) {
                    println!("  {url}");
                }
                println!("Sent {amount} {symbol} to {to}");
                self.print_balance_line();
            }
            Err(err) => print_error(&err),
        }
    }

    fn history(&self) {
        if self.log.is_empty() {
            println!("No transactions yet.");
            return;
        }
        for record in self.log.iter_recent() {
            self.print_record(record);
        }
    }

    fn print_record(&self, record: &TransferRecord) {
        let when = chrono::DateTime::from_timestamp_millis(record.timestamp as i64)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "unknown time".to_string());
        println!(
            "{} {} {} {}  {}",
            "To".bold(),
            shorten(&record.to, 6, 4),
            record.amount,
            self.network.native_currency.symbol,
            when.dimmed()
        );
        if let Some(url) = self.network.tx_url(&record.tx_hash) {
            println!("  {url}");
        }
    }

    fn qr_toggle(&mut self) {
        match self.qr.toggle(self.session.address()) {
            Ok(Some(code)) => println!("{code}"),
            Ok(None) => println!("QR hidden"),
            Err(err) => print_error(&err),
        }
    }

    async fn handle_provider_event(&mut self, event: ProviderEvent) {
        match self.session.handle_event(event) {
            SessionChange::AccountSwitched(address) => {
                println!("{} {}", "Active account changed:".yellow(), address);
                if let Err(err) = self.session.refresh_balance().await {
                    print_error(&err);
                } else {
                    self.print_balance_line();
                }
            }
            SessionChange::Disconnected => {
                println!(
                    "{}",
                    "Wallet disconnected (no accounts available)".yellow()
                );
            }
            SessionChange::NetworkChanged(chain_id) => {
                // The session cannot survive a chain move; re-establish it
                // against the configured network instead of restarting.
                tracing::info!(chain_id, "provider chain changed, reconnecting session");
                println!("{}", "Network changed, reconnecting...".yellow());
                self.connect().await;
            }
        }
    }

    fn print_balance_line(&self) {
        if let Some(balance) = self.session.balance() {
            println!(
                "{} {} {}",
                "Balance:".green(),
                balance,
                self.network.native_currency.symbol
            );
        }
    }
}

fn print_progress(status: &SubmitStatus, network: &NetworkDescriptor) {
    match status {
        SubmitStatus::Submitting => println!("{}", "Sending transaction...".cyan()),
        SubmitStatus::Submitted { hash } => {
            println!(
                "{} {}",
                "Transaction submitted, waiting for confirmation:".cyan(),
                shorten(&hash.to_string(), 12, 6)
            );
            if let Some(url) = network.tx_url(&hash.to_string()) {
                println!("  {url}");
            }
        }
        // Terminal states are reported from the submit result.
        SubmitStatus::Idle | SubmitStatus::Confirmed { .. } | SubmitStatus::Failed { .. } => {}
    }
}

fn print_error(err: &WalletError) {
    println!("{} {}", "Error:".red(), err);
}

fn print_help() {
    println!("commands:");
    println!("  connect               request wallet access");
    println!("  disconnect            clear the session");
    println!("  balance               refresh and show the balance");
    println!("  send <to> <amount>    send native currency");
    println!("  history               show past transfers, newest first");
    println!("  qr                    toggle the address QR code");
    println!("  quit                  exit");
}

/// Shorten a hex string to `head…tail`, the way explorer UIs do.
fn shorten(text: &str, head: usize, tail: usize) -> String {
    if text.len() <= head + tail + 1 {
        return text.to_string();
    }
    format!("{}…{}", &text[..head], &text[text.len() - tail..])
}
