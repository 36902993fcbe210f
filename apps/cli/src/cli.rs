//! # Command Line
//!
//! Typed commands shared by the one-shot invocation (`tally shop list`) and
//! the interactive shell (`tally> shop list`).
//!
//! ```text
//! tally [--db PATH] [--json] <COMMAND>
//!
//!   dashboard                          shop count, sales this month, recent bills
//!   shop     list | add | edit         customers
//!   product  list | add | edit | delete
//!   history  [--shop ID] [--from DAY] [--to DAY] [--search TEXT]
//!   sell     --shop ID --item PRODUCT[:QTY] ...
//!   bill     view ID | return ITEM QTY | invoice ID | save
//!   billing  [--shop ID]                shell only: fresh cart
//!   cart     show | shop ID | add PRODUCT [QTY] | remove POS | clear
//!   config                             effective configuration
//!   shell                              interactive session (default)
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Tally POS: shops, products, bills, returns and invoices.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about)]
pub struct Cli {
    /// Config file (default: config.toml in the platform config directory)
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Store name printed on invoices
    #[arg(long, global = true)]
    pub store_name: Option<String>,

    /// UTC offset in minutes that defines calendar days (e.g. 330, -300)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub utc_offset: Option<i32>,

    /// Directory invoices are written to
    #[arg(long, global = true)]
    pub invoice_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Runs the shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(name = "tally>", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    #[command(flatten)]
    App(Command),

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Shop count, sales this month and the latest bills
    Dashboard,

    /// Manage shops
    #[command(subcommand)]
    Shop(ShopCommand),

    /// Manage the product catalog
    #[command(subcommand)]
    Product(ProductCommand),

    /// Open the billing view with an empty cart
    Billing {
        /// Preselect this shop
        #[arg(long)]
        shop: Option<i64>,
    },

    /// Edit the cart of the billing view
    #[command(subcommand)]
    Cart(CartCommand),

    /// Save, view, return items of, or export a bill
    #[command(subcommand)]
    Bill(BillCommand),

    /// Browse past bills, newest first
    History(HistoryArgs),

    /// Record a bill in one step
    Sell {
        /// Shop the bill is issued to
        #[arg(long)]
        shop: i64,

        /// Product and quantity, repeatable
        #[arg(long = "item", value_name = "PRODUCT[:QTY]", value_parser = parse_item, required = true)]
        items: Vec<(i64, i64)>,
    },

    /// Show the effective configuration
    Config,

    /// Start an interactive session
    Shell,
}

impl Command {
    /// Commands that read or change the billing session, which only lives
    /// inside a shell.
    pub fn needs_session(&self) -> bool {
        matches!(
            self,
            Command::Billing { .. } | Command::Cart(_) | Command::Bill(BillCommand::Save)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShopCommand {
    /// List all shops
    List,

    /// Add a shop
    Add {
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
    },

    /// Change fields of a shop; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Pass "" to clear
        #[arg(long)]
        phone: Option<String>,
        /// Pass "" to clear
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ProductCommand {
    /// List all products
    List,

    /// Add a product
    Add {
        name: String,
        /// Selling price, e.g. 25 or 25.50
        #[arg(long, default_value = "")]
        price: String,
        /// Cost price (default 0)
        #[arg(long, default_value = "")]
        cost: String,
    },

    /// Change fields of a product; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        cost: Option<String>,
    },

    /// Remove a product (bills keep their lines)
    Delete { id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CartCommand {
    /// Show the cart and the catalog
    Show,

    /// Select the shop to bill
    Shop { id: i64 },

    /// Add a product
    Add {
        product: i64,
        #[arg(default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove the line at a position (1 = first)
    Remove {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        position: u64,
    },

    /// Empty the cart
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum BillCommand {
    /// Save the cart as a bill for the selected shop
    Save,

    /// Show a bill and its items
    View { id: i64 },

    /// Return some units of a bill item
    Return {
        item: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Export the bill as a PDF invoice
    Invoice {
        id: i64,
        /// Output directory (default: configured invoice directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct HistoryArgs {
    /// Only bills of this shop
    #[arg(long)]
    pub shop: Option<i64>,

    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Text matched against shop names and bill dates
    #[arg(long)]
    pub search: Option<String>,
}

/// Parses `PRODUCT` or `PRODUCT:QTY`.
fn parse_item(s: &str) -> Result<(i64, i64), String> {
    let (product, quantity) = match s.split_once(':') {
        Some((p, q)) => (p, q),
        None => (s, "1"),
    };

    let product = product
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid product id '{}'", product))?;
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid quantity '{}'", quantity))?;

    Ok((product, quantity))
}

/// Splits a shell line into words. Single or double quotes group words;
/// a backslash escapes the next character outside single quotes.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(next) => current.push(next),
                None => return Err("trailing backslash".to_string()),
            },
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("3:2"), Ok((3, 2)));
        assert_eq!(parse_item("7"), Ok((7, 1)));
        assert!(parse_item("x:1").is_err());
        assert!(parse_item("1:y").is_err());
    }

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line(r#"shop add "Acme Corp" --phone '011 22'"#).unwrap(),
            vec!["shop", "add", "Acme Corp", "--phone", "011 22"]
        );
        assert_eq!(split_line(r#"shop edit 1 --phone """#).unwrap(), vec!["shop", "edit", "1", "--phone", ""]);
        assert_eq!(split_line(r"a\ b  c").unwrap(), vec!["a b", "c"]);
        assert!(split_line("  ").unwrap().is_empty());
        assert!(split_line("shop add \"Acme").is_err());
    }

    #[test]
    fn test_one_shot_parsing() {
        let cli = Cli::try_parse_from(["tally", "--json", "sell", "--shop", "1", "--item", "2:3", "--item", "4"]).unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Some(Command::Sell {
                shop: 1,
                items: vec![(2, 3), (4, 1)]
            })
        );

        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_history_dates() {
        let cli = Cli::try_parse_from(["tally", "history", "--from", "2024-03-01", "--to", "2024-03-31"]).unwrap();
        match cli.command {
            Some(Command::History(args)) => {
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 3, 31));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(Cli::try_parse_from(["tally", "history", "--from", "03/01/2024"]).is_err());
    }

    #[test]
    fn test_shell_lines() {
        let line = ShellLine::try_parse_from(["cart", "add", "5"]).unwrap();
        assert!(matches!(
            line.command,
            ShellCommand::App(Command::Cart(CartCommand::Add { product: 5, quantity: 1 }))
        ));

        let line = ShellLine::try_parse_from(["quit"]).unwrap();
        assert!(matches!(line.command, ShellCommand::Exit));

        assert!(ShellLine::try_parse_from(["cart", "remove", "0"]).is_err());
    }

    #[test]
    fn test_session_commands() {
        assert!(Command::Cart(CartCommand::Show).needs_session());
        assert!(Command::Bill(BillCommand::Save).needs_session());
        assert!(!Command::Bill(BillCommand::View { id: 1 }).needs_session());
        assert!(!Command::Dashboard.needs_session());
    }
}
