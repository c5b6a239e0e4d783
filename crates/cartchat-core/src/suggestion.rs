//! Canned prompts offered before the user has typed anything.

/// A quick-start suggestion shown under the greetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    /// Prompt sent when the suggestion is picked.
    pub text: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const SUGGESTIONS: [Suggestion; 4] = [
    Suggestion {
        text: "Procurar leite e pão",
        title: "Básicos",
        subtitle: "Itens essenciais",
    },
    Suggestion {
        text: "Encontrar ofertas de frutas",
        title: "Frutas",
        subtitle: "Melhores preços",
    },
    Suggestion {
        text: "Buscar produtos de limpeza",
        title: "Limpeza",
        subtitle: "Produtos domésticos",
    },
    Suggestion {
        text: "Ver produtos em promoção",
        title: "Promoções",
        subtitle: "Ofertas do dia",
    },
];
