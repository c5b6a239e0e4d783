//! Slash commands typed into the chat prompt.

use cartchat_core::{Attachment, ReactionKind};

/// A parsed line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text sent to the assistant
    Say(String),
    /// Show help
    Help,
    /// Exit the chat
    Quit,
    /// Reprint the transcript
    List,
    /// Send quick-start suggestion N (1-based)
    Suggest(usize),
    /// Edit message N and replay the conversation from there
    Edit(usize, String),
    /// Delete message N and everything after it
    Delete(usize),
    /// Like or dislike message N
    React(usize, ReactionKind),
    /// Attach a photo or voice note by URI
    Attach(Attachment),
    /// Browse the market results of message N
    Markets(usize),
    /// Select a market tab by name
    Market(String),
    /// Open the selected market's categories
    Open,
    /// Open a category of the current market
    Category(String),
    /// Filter visible products by name or category
    Filter(String),
    /// Show details of visible product N
    Product(usize),
    /// Go back one screen
    Back,
    /// Malformed command with a hint for the user
    Invalid(String),
}

/// Help text listing every command.
pub const HELP: &str = "\
Digite sua lista de compras, ou:
  /suggest <n>         envia a sugestão n
  /edit <n> <texto>    edita a mensagem n e refaz a busca
  /delete <n>          apaga a mensagem n e as seguintes
  /like <n>            curte a mensagem n
  /dislike <n>         descurte a mensagem n
  /photo <uri>         envia uma foto da câmera
  /image <uri>         envia uma imagem da galeria
  /voice <uri>         envia uma mensagem de voz
  /markets <n>         abre os mercados da mensagem n
  /market <nome>       seleciona um mercado
  /open                abre as categorias do mercado selecionado
  /category <nome>     abre uma categoria
  /filter <termo>      filtra os produtos visíveis
  /product <n>         mostra os detalhes do produto n
  /back                volta uma tela
  /list                mostra a conversa
  /quit                sai";

/// Parse one line of input. Returns None for a blank line.
pub fn parse_line(input: &str) -> Option<Command> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if !input.starts_with('/') {
        return Some(Command::Say(input.to_string()));
    }

    let content = &input[1..];
    let (cmd, args) = match content.find(char::is_whitespace) {
        Some(idx) => {
            let (c, a) = content.split_at(idx);
            (c.to_lowercase(), a.trim())
        }
        None => (content.to_lowercase(), ""),
    };

    Some(match cmd.as_str() {
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "list" | "ls" => Command::List,
        "back" | "b" => Command::Back,
        "open" => Command::Open,

        "suggest" | "s" => with_index(args, "/suggest <n>", Command::Suggest),
        "delete" | "del" => with_index(args, "/delete <n>", Command::Delete),
        "like" => with_index(args, "/like <n>", |n| Command::React(n, ReactionKind::Like)),
        "dislike" => with_index(args, "/dislike <n>", |n| {
            Command::React(n, ReactionKind::Dislike)
        }),
        "markets" => with_index(args, "/markets <n>", Command::Markets),
        "product" | "p" => with_index(args, "/product <n>", Command::Product),

        "edit" => {
            let (n, text) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            match n.parse::<usize>() {
                Ok(n) if n > 0 && !text.trim().is_empty() => {
                    Command::Edit(n, text.trim().to_string())
                }
                _ => Command::Invalid("uso: /edit <n> <texto>".to_string()),
            }
        }

        "photo" => with_text(args, "/photo <uri>", |s| Command::Attach(Attachment::camera(s))),
        "image" => with_text(args, "/image <uri>", |s| Command::Attach(Attachment::gallery(s))),
        "voice" => with_text(args, "/voice <uri>", |s| Command::Attach(Attachment::voice(s))),
        "market" => with_text(args, "/market <nome>", Command::Market),
        "category" | "cat" => with_text(args, "/category <nome>", Command::Category),
        "filter" => Command::Filter(args.to_string()),

        other => Command::Invalid(format!("comando desconhecido: /{}", other)),
    })
}

fn with_index(args: &str, usage: &str, f: impl FnOnce(usize) -> Command) -> Command {
    match args.parse::<usize>() {
        Ok(n) if n > 0 => f(n),
        _ => Command::Invalid(format!("uso: {}", usage)),
    }
}

fn with_text(args: &str, usage: &str, f: impl FnOnce(String) -> Command) -> Command {
    if args.is_empty() {
        Command::Invalid(format!("uso: {}", usage))
    } else {
        f(args.to_string())
    }
}
