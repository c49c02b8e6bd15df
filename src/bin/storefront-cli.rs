use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Management CLI for the storefront services", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version and mounted services
    Status,
    /// Inspect or extend the inventory
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
    /// Publish an order event
    Order {
        #[arg(long)]
        item: String,
        #[arg(long, default_value_t = 1)]
        quantity: i32,
    },
    /// Look up a user by id
    User { id: i64 },
}

#[derive(Subcommand)]
enum InventoryCommands {
    /// List every item
    List,
    /// Add an item
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        quantity: i32,
        /// Decimal unit price, sent exactly as given
        #[arg(long, default_value = "0")]
        price: Decimal,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{base}/status")).send().await?,
        Commands::Inventory {
            command: InventoryCommands::List,
        } => client.get(format!("{base}/inventory")).send().await?,
        Commands::Inventory {
            command: InventoryCommands::Add { name, quantity, price },
        } => {
            client
                .post(format!("{base}/inventory"))
                .json(&add_item_body(&name, quantity, price))
                .send()
                .await?
        }
        Commands::Order { item, quantity } => {
            client
                .post(format!("{base}/orders"))
                .json(&json!({ "item_name": item, "quantity": quantity }))
                .send()
                .await?
        }
        Commands::User { id } => client.get(format!("{base}/users/{id}")).send().await?,
    };

    print_response(res).await
}

/// Price travels as a decimal string so no digits are lost.
fn add_item_body(name: &str, quantity: i32, price: Decimal) -> Value {
    json!({ "name": name, "quantity": quantity, "price": price.to_string() })
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: storefront returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_sent_exactly() {
        let cli = Cli::try_parse_from([
            "storefront-cli", "inventory", "add", "--name", "Lamp", "--price", "0.1000000000000000055",
        ])
        .unwrap();

        let Commands::Inventory {
            command: InventoryCommands::Add { name, quantity, price },
        } = cli.command
        else {
            panic!("expected inventory add");
        };
        let body = add_item_body(&name, quantity, price);
        assert_eq!(body["price"], "0.1000000000000000055");
        assert_eq!(body["quantity"], 0);
    }

    #[test]
    fn test_non_decimal_price_rejected() {
        let parsed = Cli::try_parse_from(["storefront-cli", "inventory", "add", "--name", "Lamp", "--price", "cheap"]);
        assert!(parsed.is_err());
    }
}
