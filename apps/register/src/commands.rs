//! # Register Commands
//!
//! Parses operator input lines and runs them against a [`PosSession`].
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tables                              list tables                        │
//! │  products [category]                 list the menu                      │
//! │  categories                          list menu sections                 │
//! │  summary                             table counts per status            │
//! │  select <table>                      make <table> current               │
//! │  add <table> <product> [opts]        add one unit                       │
//! │  qty <table> <product> <n> [opts]    set quantity (0 removes)           │
//! │  remove <table> <product> [opts]     remove the line                    │
//! │  note <table> <product> <opts> [..]  set kitchen note (empty clears)    │
//! │  name <table> [customer ..]          set customer name (empty clears)   │
//! │  totals <table>                      subtotal / tax / total             │
//! │  bill <table>                        generate a bill                    │
//! │  pay <bill>                          mark a bill paid                   │
//! │  bills                               list bills                         │
//! │  help | quit                                                            │
//! │                                                                         │
//! │  [opts] is a comma-separated option id list, or "-" for none.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use serde_json::{json, Value};
use tableside_core::Bill;
use tableside_service::{ApiError, PosSession, ServiceConfig};
use thiserror::Error;
use tracing::debug;

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tables,
    Products { category: Option<String> },
    Categories,
    Summary,
    Select { table_id: String },
    Add { table_id: String, product_id: String, options: Vec<String> },
    Quantity { table_id: String, product_id: String, quantity: i64, options: Vec<String> },
    Remove { table_id: String, product_id: String, options: Vec<String> },
    Note { table_id: String, product_id: String, options: Vec<String>, note: Option<String> },
    Name { table_id: String, name: Option<String> },
    Totals { table_id: String },
    Bill { table_id: String },
    Pay { bill_id: String },
    Bills,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("{command}: missing <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Not a whole number: {0}")]
    InvalidNumber(String),
}

/// Errors from running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outcome of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Data(Value),
    Help,
    Quit,
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses one input line.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or(ParseError::Empty)?;
    let args: Vec<&str> = words.collect();

    let command = match name.to_lowercase().as_str() {
        "tables" => Command::Tables,
        "products" => Command::Products {
            category: rest(&args, 0),
        },
        "categories" => Command::Categories,
        "summary" => Command::Summary,
        "select" => Command::Select {
            table_id: arg(&args, 0, "select", "table")?,
        },
        "add" => Command::Add {
            table_id: arg(&args, 0, "add", "table")?,
            product_id: arg(&args, 1, "add", "product")?,
            options: options(args.get(2).copied()),
        },
        "qty" => {
            let raw = arg(&args, 2, "qty", "n")?;
            Command::Quantity {
                table_id: arg(&args, 0, "qty", "table")?,
                product_id: arg(&args, 1, "qty", "product")?,
                quantity: raw.parse().map_err(|_| ParseError::InvalidNumber(raw))?,
                options: options(args.get(3).copied()),
            }
        }
        "remove" => Command::Remove {
            table_id: arg(&args, 0, "remove", "table")?,
            product_id: arg(&args, 1, "remove", "product")?,
            options: options(args.get(2).copied()),
        },
        "note" => Command::Note {
            table_id: arg(&args, 0, "note", "table")?,
            product_id: arg(&args, 1, "note", "product")?,
            options: options(Some(arg(&args, 2, "note", "opts")?.as_str())),
            note: rest(&args, 3),
        },
        "name" => Command::Name {
            table_id: arg(&args, 0, "name", "table")?,
            name: rest(&args, 1),
        },
        "totals" => Command::Totals {
            table_id: arg(&args, 0, "totals", "table")?,
        },
        "bill" => Command::Bill {
            table_id: arg(&args, 0, "bill", "table")?,
        },
        "pay" => Command::Pay {
            bill_id: arg(&args, 0, "pay", "bill")?,
        },
        "bills" => Command::Bills,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(command)
}

fn arg(
    args: &[&str],
    index: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<String, ParseError> {
    args.get(index)
        .map(|s| s.to_string())
        .ok_or(ParseError::MissingArgument { command, argument })
}

/// Remaining words joined by single spaces, `None` if there are none.
fn rest(args: &[&str], from: usize) -> Option<String> {
    args.get(from..)
        .filter(|words| !words.is_empty())
        .map(|words| words.join(" "))
}

fn options(token: Option<&str>) -> Vec<String> {
    match token {
        None | Some("-") => Vec::new(),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Bill with display-formatted amounts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BillView<'a> {
    #[serde(flatten)]
    bill: &'a Bill,
    display: BillDisplay,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BillDisplay {
    subtotal: String,
    tax: String,
    total: String,
}

fn bill_view(config: &ServiceConfig, bill: &Bill) -> Result<Value, serde_json::Error> {
    serde_json::to_value(BillView {
        bill,
        display: BillDisplay {
            subtotal: config.format_money(bill.subtotal),
            tax: config.format_money(bill.tax),
            total: config.format_money(bill.total),
        },
    })
}

/// Runs a command against the session.
pub fn execute(
    session: &mut PosSession,
    config: &ServiceConfig,
    command: Command,
) -> Result<Reply, CommandError> {
    debug!(?command, "execute");

    let data = match command {
        Command::Tables => serde_json::to_value(session.list_tables())?,
        Command::Products { category } => {
            let products: Vec<_> = session
                .list_products()
                .iter()
                .filter(|p| category.as_deref().map_or(true, |c| p.category == c))
                .collect();
            serde_json::to_value(products)?
        }
        Command::Categories => serde_json::to_value(session.categories())?,
        Command::Summary => serde_json::to_value(session.floor_summary())?,
        Command::Select { table_id } => serde_json::to_value(session.select_table(&table_id)?)?,
        Command::Add {
            table_id,
            product_id,
            options,
        } => serde_json::to_value(session.add_product_to_table(&table_id, &product_id, &options)?)?,
        Command::Quantity {
            table_id,
            product_id,
            quantity,
            options,
        } => serde_json::to_value(session.set_item_quantity(
            &table_id,
            &product_id,
            &options,
            quantity,
        )?)?,
        Command::Remove {
            table_id,
            product_id,
            options,
        } => serde_json::to_value(session.remove_item_from_table(
            &table_id,
            &product_id,
            &options,
        )?)?,
        Command::Note {
            table_id,
            product_id,
            options,
            note,
        } => serde_json::to_value(session.set_item_notes(
            &table_id,
            &product_id,
            &options,
            note.as_deref(),
        )?)?,
        Command::Name { table_id, name } => {
            serde_json::to_value(session.set_table_customer_name(&table_id, name.as_deref())?)?
        }
        Command::Totals { table_id } => {
            let totals = session.order_totals(&table_id)?;
            json!({
                "totals": totals,
                "display": {
                    "subtotal": config.format_money(totals.subtotal),
                    "tax": config.format_money(totals.tax),
                    "total": config.format_money(totals.total),
                }
            })
        }
        Command::Bill { table_id } => bill_view(config, &session.generate_bill(&table_id)?)?,
        Command::Pay { bill_id } => bill_view(config, &session.mark_bill_paid(&bill_id)?)?,
        Command::Bills => serde_json::to_value(session.bills())?,
        Command::Help => return Ok(Reply::Help),
        Command::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Data(data))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tableside_service::ErrorCode;

    fn session() -> (PosSession, ServiceConfig) {
        let config = ServiceConfig::default();
        (PosSession::from_config(&config).unwrap(), config)
    }

    fn run(session: &mut PosSession, config: &ServiceConfig, line: &str) -> Value {
        match execute(session, config, parse(line).unwrap()).unwrap() {
            Reply::Data(value) => value,
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_with_options() {
        assert_eq!(
            parse("add table-1 1 extra-cheese,bacon").unwrap(),
            Command::Add {
                table_id: "table-1".into(),
                product_id: "1".into(),
                options: vec!["extra-cheese".into(), "bacon".into()],
            }
        );
        assert_eq!(
            parse("ADD table-1 4").unwrap(),
            Command::Add {
                table_id: "table-1".into(),
                product_id: "4".into(),
                options: vec![],
            }
        );
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(
            parse("qty table-2 4 -1 -").unwrap(),
            Command::Quantity {
                table_id: "table-2".into(),
                product_id: "4".into(),
                quantity: -1,
                options: vec![],
            }
        );
        assert_eq!(
            parse("qty table-2 4 lots"),
            Err(ParseError::InvalidNumber("lots".into()))
        );
    }

    #[test]
    fn test_parse_free_text() {
        assert_eq!(
            parse("name table-3 Ada   Lovelace").unwrap(),
            Command::Name {
                table_id: "table-3".into(),
                name: Some("Ada Lovelace".into()),
            }
        );
        assert_eq!(
            parse("name table-3").unwrap(),
            Command::Name {
                table_id: "table-3".into(),
                name: None,
            }
        );
        assert_eq!(
            parse("note table-1 1 - no pickles").unwrap(),
            Command::Note {
                table_id: "table-1".into(),
                product_id: "1".into(),
                options: vec![],
                note: Some("no pickles".into()),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(
            parse("dance"),
            Err(ParseError::UnknownCommand("dance".into()))
        );
        assert_eq!(
            parse("add table-1"),
            Err(ParseError::MissingArgument {
                command: "add",
                argument: "product",
            })
        );
    }

    #[test]
    fn test_bill_and_pay_flow() {
        let (mut session, config) = session();
        run(&mut session, &config, "add table-1 1 extra-cheese");
        let table = run(&mut session, &config, "add table-1 1 extra-cheese");
        assert_eq!(table["status"], "occupied");
        assert_eq!(table["items"][0]["quantity"], 2);

        let bill = run(&mut session, &config, "bill table-1");
        assert_eq!(bill["display"]["total"], "$31.88");
        assert_eq!(bill["paymentStatus"], "pending");

        let bill_id = bill["id"].as_str().unwrap().to_string();
        let paid = run(&mut session, &config, &format!("pay {}", bill_id));
        assert_eq!(paid["paymentStatus"], "paid");

        let summary = run(&mut session, &config, "summary");
        assert_eq!(summary["available"], 6);
    }

    #[test]
    fn test_api_errors_pass_through() {
        let (mut session, config) = session();
        let err = execute(&mut session, &config, parse("bill table-1").unwrap()).unwrap_err();
        match err {
            CommandError::Api(api) => assert_eq!(api.code, ErrorCode::NoOp),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_products_by_category() {
        let (mut session, config) = session();
        let mains = run(&mut session, &config, "products Main Course");
        assert_eq!(mains.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_help_and_quit() {
        let (mut session, config) = session();
        assert_eq!(
            execute(&mut session, &config, Command::Help).unwrap(),
            Reply::Help
        );
        assert_eq!(
            execute(&mut session, &config, Command::Quit).unwrap(),
            Reply::Quit
        );
    }
}
