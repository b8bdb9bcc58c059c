use std::time::Duration;

use auction_types::{is_word_token, AuctionId, Funds, Item, Username};

/// A command parsed from one protocol line, or `Unknown` if the line
/// doesn't match any recognized shape.
///
/// Numeric arguments that are present in the right *position* but fail to
/// parse as a base-10 non-negative integer (non-numeric, or too large for
/// `u64`) are carried as `Err` so the executor can report the command-
/// specific "invalid argument" failure; a line whose non-numeric tokens
/// (verb, item, username) don't match at all falls all the way through to
/// `Unknown`, exactly as the original's single whole-line regex match would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login(Username),
    Logout,
    DepositFunds(Result<Funds, ()>),
    DepositItem(Item),
    WithdrawFunds(Result<Funds, ()>),
    WithdrawItem(Item),
    /// `duration` is `None` when the line omitted the optional `<secs>`
    /// argument; the executor fills in the configured default in that case.
    Sell { item: Item, price: Funds, duration: Option<Duration> },
    Bid { auction_id: AuctionId, price: Funds },
    ShowFunds,
    ShowItems,
    ShowSales,
    Unknown(String),
}

fn parse_funds(tok: &str) -> Result<Funds, ()> {
    tok.parse::<u64>().map(Funds::new).map_err(|_| ())
}

/// Parses one protocol line. `line` is the raw line as received (newline
/// already stripped by the framing layer); leading/trailing whitespace is
/// permitted and internal whitespace runs between tokens collapse, but the
/// original string is preserved verbatim in `Unknown` for the echo.
pub fn parse(line: &str) -> Command {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let unknown = || Command::Unknown(line.to_string());

    let Some(verb) = tokens.first() else {
        return unknown();
    };

    match verb.to_ascii_uppercase().as_str() {
        "HELP" if tokens.len() == 1 => Command::Help,
        "LOGOUT" if tokens.len() == 1 => Command::Logout,
        "LOGIN" if tokens.len() == 2 && is_word_token(tokens[1]) => {
            Command::Login(tokens[1].to_string())
        }
        "DEPOSIT" if tokens.len() == 3 && tokens[1].eq_ignore_ascii_case("FUNDS") => {
            Command::DepositFunds(parse_funds(tokens[2]))
        }
        "DEPOSIT" if tokens.len() == 3
            && tokens[1].eq_ignore_ascii_case("ITEM")
            && is_word_token(tokens[2]) =>
        {
            Command::DepositItem(tokens[2].to_string())
        }
        "WITHDRAW" if tokens.len() == 3 && tokens[1].eq_ignore_ascii_case("FUNDS") => {
            Command::WithdrawFunds(parse_funds(tokens[2]))
        }
        "WITHDRAW" if tokens.len() == 3
            && tokens[1].eq_ignore_ascii_case("ITEM")
            && is_word_token(tokens[2]) =>
        {
            Command::WithdrawItem(tokens[2].to_string())
        }
        "SELL" if (tokens.len() == 3 || tokens.len() == 4) && is_word_token(tokens[1]) => {
            let Ok(price) = parse_funds(tokens[2]) else {
                return unknown();
            };
            let duration = if tokens.len() == 4 {
                match tokens[3].parse::<u64>() {
                    Ok(secs) => Some(Duration::from_secs(secs)),
                    Err(_) => return unknown(),
                }
            } else {
                None
            };
            Command::Sell { item: tokens[1].to_string(), price, duration }
        }
        "BID" if tokens.len() == 3 => match (tokens[1].parse::<u64>(), parse_funds(tokens[2])) {
            (Ok(id), Ok(price)) => Command::Bid { auction_id: AuctionId::new(id), price },
            _ => unknown(),
        },
        "SHOW" if tokens.len() == 2 && tokens[1].eq_ignore_ascii_case("FUNDS") => {
            Command::ShowFunds
        }
        "SHOW" if tokens.len() == 2 && tokens[1].eq_ignore_ascii_case("ITEMS") => {
            Command::ShowItems
        }
        "SHOW" if tokens.len() == 2 && tokens[1].eq_ignore_ascii_case("SALES") => {
            Command::ShowSales
        }
        _ => unknown(),
    }
}
