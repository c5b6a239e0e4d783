//! Plain-text rendering of messages and market screens.

use cartchat_core::{
    Author, MarketResult, Message, MessageBody, NavigationState, Product, ReactionKind, Route,
    SUGGESTIONS,
};

/// One transcript entry. `index` is 0-based; numbers shown are 1-based.
pub fn message_block(index: usize, msg: &Message) -> String {
    let who = match msg.author() {
        Author::User => "você",
        Author::Assistant => "assistente",
    };
    let time = msg.created_at().format("%H:%M");
    let mut out = format!("[{}] {} {}: ", index + 1, time, who);

    match msg.body() {
        MessageBody::Text { text } => out.push_str(text),
        MessageBody::Image { uri, caption } => {
            out.push_str(&format!("[foto: {}]", uri));
            push_caption(&mut out, caption);
        }
        MessageBody::Audio { uri, caption } => {
            out.push_str(&format!("[áudio: {}]", uri));
            push_caption(&mut out, caption);
        }
        MessageBody::Markets { text, markets } => {
            out.push_str(text);
            for market in markets {
                out.push('\n');
                out.push_str(&market_summary(market));
            }
        }
    }

    if let Some(r) = msg.reactions() {
        let mine = match r.user_reaction {
            Some(ReactionKind::Like) => " *curtiu*",
            Some(ReactionKind::Dislike) => " *descurtiu*",
            None => "",
        };
        out.push_str(&format!("  (+{} / -{}{})", r.likes, r.dislikes, mine));
    }
    out
}

fn push_caption(out: &mut String, caption: &str) {
    if !caption.is_empty() {
        out.push(' ');
        out.push_str(caption);
    }
}

/// The newest message of a transcript, numbered by its position.
pub fn last_message(messages: &[Message]) -> Option<String> {
    let last = messages.last()?;
    Some(message_block(messages.len() - 1, last))
}

/// One-line summary of a market.
pub fn market_summary(market: &MarketResult) -> String {
    format!(
        "    • {}: {} itens, {} produtos",
        market.market_name,
        market.category_count(),
        market.product_count()
    )
}

/// Product row numbered from 1, as picked by `/product <n>`.
pub fn product_line(number: usize, product: &Product) -> String {
    format!(
        "  {:>2}. {} ({}) {}",
        number,
        product.name,
        product.brand,
        product.price
    )
}

/// Full product card: headline, price and description without markup.
pub fn product_detail(product: &Product) -> String {
    let mut lines = vec![
        format!("{} ({})", product.name, product.brand),
        format!("    categoria: {}", product.category),
        format!("    preço: {}", product.price),
        format!("    similaridade: {:.0}%", product.similarity * 100.0),
    ];
    let description = product.plain_description();
    if !description.is_empty() {
        lines.push(format!("    {}", description));
    }
    lines.join("\n")
}

/// Numbered products on the current screen, filtered by `term`.
fn filtered(nav: &NavigationState, term: &str) -> Vec<String> {
    let products: Vec<String> = nav
        .visible_products(term)
        .into_iter()
        .enumerate()
        .map(|(i, p)| product_line(i + 1, p))
        .collect();
    if products.is_empty() {
        vec!["    (nenhum produto)".to_string()]
    } else {
        products
    }
}

/// Suggestion menu shown while only the greetings are present.
pub fn suggestions() -> String {
    SUGGESTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  /suggest {}  {}: {} ({})", i + 1, s.title, s.text, s.subtitle))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Current navigation screen, filtered by `term`.
pub fn screen(nav: &NavigationState, term: &str) -> String {
    match nav.current() {
        Route::Chat => "(conversa)".to_string(),
        Route::Markets { markets, selected } => {
            let mut lines: Vec<String> = markets
                .iter()
                .map(|m| {
                    let marker = if &m.market_name == selected { ">" } else { " " };
                    format!("{} {}", marker, market_summary(m).trim_start())
                })
                .collect();
            lines.extend(filtered(nav, term));
            lines.join("\n")
        }
        Route::MarketItems { market } => {
            let mut lines = vec![format!("{}:", market.market_name)];
            lines.extend(
                market
                    .categories
                    .iter()
                    .map(|c| format!("    {} ({} produtos)", c.name, c.products.len())),
            );
            lines.join("\n")
        }
        Route::CategoryProducts { market, category } => {
            let mut lines = vec![format!("{} / {}:", market.market_name, category)];
            lines.extend(filtered(nav, term));
            lines.join("\n")
        }
    }
}
