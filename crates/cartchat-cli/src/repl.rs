//! Interactive chat loop.
//!
//! Input is handled one line at a time. Appended messages, alerts and the
//! typing indicator are printed by a separate task that follows the store's
//! event stream, so delayed follow-ups show up while the prompt is idle.

use std::io;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use cartchat_core::{MessageId, NavigationState, SUGGESTIONS};
use cartchat_session::{ConversationStore, StoreEvent};

use crate::commands::{parse_line, Command, HELP};
use crate::render;

/// Run the chat until `/quit` or end of input.
pub async fn run(
    store: ConversationStore,
    events: mpsc::UnboundedReceiver<StoreEvent>,
) -> io::Result<()> {
    print_transcript(&store).await;
    println!("(/help para comandos)");

    let printer = tokio::spawn(print_events(store.clone(), events));

    let mut nav = NavigationState::new();
    let mut filter = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_line(&line) else {
            continue;
        };
        debug!(?command, "Command");
        if command == Command::Quit {
            break;
        }
        handle(&store, &mut nav, &mut filter, command).await;
    }

    printer.abort();
    Ok(())
}

async fn handle(
    store: &ConversationStore,
    nav: &mut NavigationState,
    filter: &mut String,
    command: Command,
) {
    match command {
        Command::Say(text) => {
            if store.submit(&text).await.is_none() {
                println!("(aguarde a resposta do assistente)");
            }
        }
        Command::Suggest(n) => match SUGGESTIONS.get(n - 1) {
            Some(s) => {
                if store.send_suggestion(s.text).await.is_none() {
                    println!("(sugestões só valem no início da conversa)");
                }
            }
            None => println!("(sugestão inexistente)"),
        },
        Command::Edit(n, text) => {
            let edited = match message_id(store, n).await {
                Some(id) => store.edit(&id, &text).await,
                None => false,
            };
            if !edited {
                println!("(mensagem {} não pode ser editada)", n);
            }
        }
        Command::Delete(n) => {
            let deleted = match message_id(store, n).await {
                Some(id) => store.delete(&id).await.is_some(),
                None => false,
            };
            if !deleted {
                println!("(mensagem {} não encontrada)", n);
            }
        }
        Command::React(n, kind) => {
            let reacted = match message_id(store, n).await {
                Some(id) => store.react(&id, kind).await,
                None => None,
            };
            match reacted {
                Some(_) => {
                    if let Some(msg) = store.message_at(n - 1).await {
                        println!("{}", render::message_block(n - 1, &msg));
                    }
                }
                None => println!("(só mensagens do assistente recebem reações)"),
            }
        }
        Command::Attach(attachment) => {
            store.attach(attachment).await;
        }
        Command::Markets(n) => {
            let markets = store
                .message_at(n - 1)
                .await
                .and_then(|m| m.markets().map(<[_]>::to_vec));
            match markets.map(|m| nav.open_results(m)) {
                Some(Ok(())) => {
                    filter.clear();
                    println!("{}", render::screen(nav, filter));
                }
                Some(Err(e)) => println!("({})", e),
                None => println!("(mensagem {} não tem produtos)", n),
            }
        }
        Command::Market(name) => show(nav.select_market(&name), nav, filter),
        Command::Open => show(nav.open_selected_market(), nav, filter),
        Command::Category(name) => show(nav.open_category(&name), nav, filter),
        Command::Filter(term) => {
            *filter = term;
            println!("{}", render::screen(nav, filter));
        }
        Command::Product(n) => match nav.visible_products(filter).get(n - 1) {
            Some(product) => println!("{}", render::product_detail(product)),
            None => println!("(produto {} não está na tela)", n),
        },
        Command::Back => {
            nav.back();
            filter.clear();
            println!("{}", render::screen(nav, filter));
        }
        Command::List => print_transcript(store).await,
        Command::Help => println!("{}", HELP),
        Command::Invalid(hint) => println!("({})", hint),
        Command::Quit => {}
    }
}

fn show<E: std::fmt::Display>(result: Result<(), E>, nav: &NavigationState, filter: &str) {
    match result {
        Ok(()) => println!("{}", render::screen(nav, filter)),
        Err(e) => println!("({})", e),
    }
}

/// Id of the message shown as number `n`.
async fn message_id(store: &ConversationStore, n: usize) -> Option<MessageId> {
    store.message_at(n.checked_sub(1)?).await.map(|m| *m.id())
}

/// Print every message, plus the suggestion menu while it is on offer.
async fn print_transcript(store: &ConversationStore) {
    for (i, msg) in store.snapshot().await.iter().enumerate() {
        println!("{}", render::message_block(i, msg));
    }
    if store.suggestions_visible().await {
        println!("{}", render::suggestions());
    }
}

async fn print_events(store: ConversationStore, mut events: mpsc::UnboundedReceiver<StoreEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            StoreEvent::MessageAppended(msg) => {
                // Number by position in the live conversation.
                let snapshot = store.snapshot().await;
                let index = snapshot
                    .iter()
                    .position(|m| m.id() == msg.id())
                    .unwrap_or(snapshot.len());
                if msg.is_assistant() {
                    println!("{}", render::message_block(index, &msg));
                }
            }
            StoreEvent::ConversationTruncated { len } => {
                println!("(conversa agora tem {} mensagens)", len);
            }
            StoreEvent::TypingChanged(true) => println!("assistente está digitando..."),
            StoreEvent::TypingChanged(false) => {}
            StoreEvent::Alert { title, body } => eprintln!("{}: {}", title, body),
        }
    }
}
