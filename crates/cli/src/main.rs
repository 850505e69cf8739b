//! Ticketline CLI - kiosk and counter operations over JSON-RPC

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9530";

#[derive(Parser)]
#[command(name = "ticketline")]
#[command(about = "Ticketline queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "TICKETLINE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a ticket
    Take {
        /// withdraw, saving, loan, loan-releasing, insurance or member
        category: String,

        /// Contact name (requires --phone and --location)
        #[arg(long, requires_all = ["phone", "location"])]
        name: Option<String>,

        #[arg(long, requires_all = ["name", "location"])]
        phone: Option<String>,

        #[arg(long, requires_all = ["name", "phone"])]
        location: Option<String>,
    },

    /// Complete the current ticket (if given) and call the next one
    Next {
        /// Ticket currently being served
        #[arg(long)]
        current: Option<String>,
    },

    /// Complete a ticket that is being served
    Complete {
        /// Ticket ID
        ticket_id: String,
    },

    /// Show the ticket being served
    Current,

    /// Show the waiting list, oldest first
    Waiting,

    /// Show every ticket, newest first
    List,

    /// Show queue status
    Status,

    /// Delete every ticket (irreversible)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Contact {
    name: String,
    phone: String,
    location: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TicketView {
    id: String,
    code: String,
    category_label: String,
    status: String,
    counter: Option<i32>,
    contact: Option<Contact>,
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Counter")]
    counter: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<TicketView> for TicketRow {
    fn from(t: TicketView) -> Self {
        Self {
            code: t.code,
            category: t.category_label,
            status: t.status,
            counter: t.counter.map(|c| c.to_string()).unwrap_or_default(),
            contact: t
                .contact
                .map(|c| format!("{} ({}, {})", c.name, c.phone, c.location))
                .unwrap_or_default(),
            id: t.id,
        }
    }
}

#[derive(Deserialize)]
struct TicketResponse {
    ticket: Option<TicketView>,
}

#[derive(Deserialize)]
struct TicketListResponse {
    tickets: Vec<TicketView>,
}

#[derive(Deserialize)]
struct StatsResponse {
    total: i64,
    waiting: i64,
    serving: i64,
    completed: i64,
    waiting_by_category: BTreeMap<String, i64>,
    uptime_seconds: i64,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

async fn call<T: for<'de> Deserialize<'de>>(
    url: &str,
    method: &str,
    params: serde_json::Value,
) -> Result<T> {
    let result = call_rpc(url, method, params).await?;
    serde_json::from_value(result).with_context(|| format!("Unexpected {} result", method))
}

fn print_tickets(tickets: Vec<TicketView>, empty: &str) {
    if tickets.is_empty() {
        println!("{}", empty.yellow());
        return;
    }
    let rows: Vec<TicketRow> = tickets.into_iter().map(TicketRow::from).collect();
    println!("{}", Table::new(rows));
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let url = cli.rpc_url.as_str();

    match cli.command {
        Commands::Take {
            category,
            name,
            phone,
            location,
        } => {
            let contact = match (name, phone, location) {
                (Some(name), Some(phone), Some(location)) => Some(json!({
                    "name": name,
                    "phone": phone,
                    "location": location,
                })),
                _ => None,
            };
            let params = json!({ "category": category, "contact": contact });

            let ticket: TicketView = call(url, "ticket.create.v1", params).await?;

            println!(
                "{}",
                format!("✓ Your ticket number is {}", ticket.code).green().bold()
            );
            println!();
            println!("{}", Table::new(vec![TicketRow::from(ticket)]));
        }

        Commands::Next { current } => {
            let params = json!({ "current_ticket_id": current });
            let next: TicketResponse = call(url, "queue.advance.v1", params).await?;

            if let Some(id) = current {
                println!("{}", format!("✓ Ticket {} completed", id).green());
            }
            match next.ticket {
                Some(ticket) => {
                    println!("{}", format!("Now serving {}", ticket.code).cyan().bold());
                    println!("{}", Table::new(vec![TicketRow::from(ticket)]));
                }
                None => println!("{}", "No tickets waiting".yellow()),
            }
        }

        Commands::Complete { ticket_id } => {
            call_rpc(url, "ticket.complete.v1", json!({ "ticket_id": ticket_id })).await?;
            println!("{}", format!("✓ Ticket {} completed", ticket_id).green().bold());
        }

        Commands::Current => {
            let current: TicketResponse = call(url, "queue.current.v1", json!({})).await?;
            match current.ticket {
                Some(ticket) => {
                    println!("{}", format!("Now serving {}", ticket.code).cyan().bold());
                    println!("{}", Table::new(vec![TicketRow::from(ticket)]));
                }
                None => println!("{}", "No ticket is being served".yellow()),
            }
        }

        Commands::Waiting => {
            let waiting: TicketListResponse = call(url, "queue.waiting.v1", json!({})).await?;
            println!(
                "{}",
                format!("Waiting ({})", waiting.tickets.len()).cyan().bold()
            );
            print_tickets(waiting.tickets, "Nobody is waiting");
        }

        Commands::List => {
            let all: TicketListResponse = call(url, "tickets.list.v1", json!({})).await?;
            print_tickets(all.tickets, "No tickets issued");
        }

        Commands::Status => {
            println!("{}", "Queue Status".cyan().bold());
            println!();

            match call::<StatsResponse>(url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Total Tickets:".bold(), stats.total);
                    println!("  {} {}", "Waiting:".bold(), stats.waiting);
                    println!("  {} {}", "Serving:".bold(), stats.serving);
                    println!("  {} {}", "Completed:".bold(), stats.completed);
                    println!();
                    for (category, count) in &stats.waiting_by_category {
                        println!("    {:<16} {}", category, count);
                    }
                    println!();
                    println!("  {} {} seconds", "Uptime:".bold(), stats.uptime_seconds);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete every ticket without --yes");
            }
            let result = call_rpc(url, "admin.reset.v1", json!({})).await?;
            println!(
                "{}",
                format!("✓ Queue reset ({} tickets deleted)", result["deleted"])
                    .green()
                    .bold()
            );
        }
    }

    Ok(())
}
