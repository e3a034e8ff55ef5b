use tracing::warn;

use salewatch_store::{AddOutcome, RemoveOutcome, WishlistManager};

pub const USAGE_ADDWISH: &str = "Usage: `!addwish <product id>`";
pub const USAGE_REMOVEWISH: &str = "Usage: `!removewish <product id>`";

const HELP_TEXT: &str = "**salewatch commands**\n\
    `!addwish <id>` — add a product to your wishlist\n\
    `!removewish <id>` — remove a product from your wishlist\n\
    `!list` — show your wishlist\n\
    `!help` — show this help";

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddWish(String),
    RemoveWish(String),
    List,
    Help,
}

/// Result of parsing one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// A well-formed command.
    Command(Command),
    /// A command with a missing argument; reply with the usage hint.
    Malformed { usage: &'static str },
    /// Not addressed to the bot at all.
    Ignored,
}

/// Parse an inbound message into a command. Only the first two whitespace
/// tokens matter; anything that isn't a known `!` command is ignored.
pub fn parse_command(text: &str) -> Parsed {
    let mut tokens = text.trim().split_whitespace();
    let Some(head) = tokens.next() else {
        return Parsed::Ignored;
    };

    match head {
        "!addwish" => match tokens.next() {
            Some(id) => Parsed::Command(Command::AddWish(id.to_string())),
            None => Parsed::Malformed {
                usage: USAGE_ADDWISH,
            },
        },
        "!removewish" => match tokens.next() {
            Some(id) => Parsed::Command(Command::RemoveWish(id.to_string())),
            None => Parsed::Malformed {
                usage: USAGE_REMOVEWISH,
            },
        },
        "!list" => Parsed::Command(Command::List),
        "!help" => Parsed::Command(Command::Help),
        _ => Parsed::Ignored,
    }
}

/// Execute a command against the wishlist manager and produce the reply text.
pub async fn dispatch(wishlists: &WishlistManager, sender: &str, command: Command) -> String {
    match command {
        Command::AddWish(id) => match wishlists.add(sender, &id).await {
            Ok(AddOutcome::Added) => format!("✅ Added `{id}` to your wishlist!"),
            Ok(AddOutcome::AlreadyPresent) => {
                format!("⚠ `{id}` is already in your wishlist.")
            }
            Err(e) => {
                warn!(user = sender, product = %id, error = %e, "addwish failed");
                "⚠ Could not update your wishlist right now.".to_string()
            }
        },
        Command::RemoveWish(id) => match wishlists.remove(sender, &id).await {
            Ok(RemoveOutcome::Removed) => format!("❌ Removed `{id}` from your wishlist!"),
            Ok(RemoveOutcome::NotFound) => format!("⚠ `{id}` not found in your wishlist."),
            Err(e) => {
                warn!(user = sender, product = %id, error = %e, "removewish failed");
                "⚠ Could not update your wishlist right now.".to_string()
            }
        },
        Command::List => {
            let products = wishlists.list(sender).await;
            if products.is_empty() {
                "Your wishlist is empty.".to_string()
            } else {
                format!("```Your wishlist:\n{}```", products.join("\n"))
            }
        }
        Command::Help => HELP_TEXT.to_string(),
    }
}
