use anyhow::Context;
use clap::{Parser, Subcommand};
use invoice_bridge::invoice::build_invoice_payload;
use invoice_bridge::{BridgeConfig, InvoiceBridge, MemoryOrderStore, OrderStore, init_logger_with_file};
use shared::meta;
use shared::models::Order;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vyfak_client::{ApiReply, InvoiceApi};

/// Operator tool for the Vyfakturuj.cz integration
#[derive(Debug, Parser)]
#[command(name = "vyfak-check", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check credentials and connectivity (default)
    Ping,
    /// Fetch one invoice
    Invoice { id: String },
    /// List invoices, optionally by variable symbol
    Invoices {
        #[arg(long)]
        vs: Option<String>,
    },
    /// Print the invoice payload for an order JSON file without calling the API
    Preview { order: PathBuf },
    /// Create the invoice for an order JSON file and email the PDF
    Process { order: PathBuf },
    /// Email the PDF of an existing invoice again
    Resend {
        order: PathBuf,
        #[arg(long)]
        invoice_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = BridgeConfig::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Ping) {
        Command::Preview { order } => {
            let order = read_order(&order)?;
            let payload = build_invoice_payload(&order, chrono::Local::now().date_naive())?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Ping => {
            println!("Login: {}", config.provider.login);
            println!("API Key: {}", config.provider.masked_key());
            let client = config.connect()?;
            let reply = client.test().await.context("API connection failed")?;
            print_reply(&reply)?;
        }
        Command::Invoice { id } => {
            let client = config.connect()?;
            let reply = client.get_invoice(&id).await?;
            print_reply(&reply)?;
        }
        Command::Invoices { vs } => {
            let client = config.connect()?;
            let args: Vec<(&str, &str)> = vs.as_deref().map(|v| ("vs", v)).into_iter().collect();
            let reply = client.list_invoices(&args).await?;
            print_reply(&reply)?;
        }
        Command::Process { order } => {
            let order = read_order(&order)?;
            let order_id = order.id;
            let (bridge, store) = local_bridge(&config, order)?;

            let invoice_id = bridge.create_invoice_for_order(order_id).await?;
            println!("Invoice ID: {}", invoice_id);
            print_order_state(&bridge, &store, order_id).await?;
        }
        Command::Resend { order, invoice_id } => {
            let order = read_order(&order)?;
            let order_id = order.id;
            let (bridge, store) = local_bridge(&config, order)?;
            store
                .set_meta(order_id, meta::INVOICE_ID, &invoice_id)
                .await?;

            let outcome = bridge.resend_pdf(order_id).await?;
            println!("Delivered: {}", outcome.is_delivered());
            print_order_state(&bridge, &store, order_id).await?;
        }
    }

    Ok(())
}

type LocalBridge = InvoiceBridge<vyfak_client::VyfakClient, MemoryOrderStore>;

fn local_bridge(
    config: &BridgeConfig,
    order: Order,
) -> anyhow::Result<(LocalBridge, Arc<MemoryOrderStore>)> {
    let client = Arc::new(config.connect()?);
    let store = Arc::new(MemoryOrderStore::new());
    store.insert_order(order);
    let bridge = InvoiceBridge::new(client, store.clone(), config.workflow.clone());
    Ok((bridge, store))
}

fn read_order(path: &Path) -> anyhow::Result<Order> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing order {}", path.display()))
}

fn print_reply(reply: &ApiReply) -> anyhow::Result<()> {
    match reply {
        ApiReply::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        ApiReply::Raw(body) => println!("{}", body),
    }
    Ok(())
}

async fn print_order_state(
    bridge: &LocalBridge,
    store: &MemoryOrderStore,
    order_id: u64,
) -> anyhow::Result<()> {
    let status = bridge.invoice_status(order_id).await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    for note in store.notes(order_id) {
        println!("note: {}", note);
    }
    Ok(())
}
