//! Simple SDK Example
//!
//! Takes two tickets, serves them in order and prints the board.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package ticketline-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package ticketline-sdk --example simple
//!    ```

use ticketline_sdk::{Contact, TicketlineClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Ticketline SDK - Simple Example");
    println!("================================\n");

    // 1. Connect to daemon
    let client = TicketlineClient::connect("http://127.0.0.1:9530").await?;

    // 2. Take tickets
    let withdraw = client.create_ticket("withdraw", None).await?;
    let loan = client
        .create_ticket("loan", Some(Contact::new("Ana", "0917 555 0101", "Cebu")))
        .await?;
    println!("Issued {} and {}\n", withdraw.code, loan.code);

    // 3. Serve the queue until it is empty
    let mut current = client.advance(None).await?;
    while let Some(ticket) = current {
        println!("Now serving {} ({})", ticket.code, ticket.category_label);
        current = client.advance(Some(ticket.id)).await?;
    }

    // 4. Print the board
    let stats = client.stats().await?;
    println!(
        "\nTotal {} | waiting {} | serving {} | completed {}",
        stats.total, stats.waiting, stats.serving, stats.completed
    );

    Ok(())
}
