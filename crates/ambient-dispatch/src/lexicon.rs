//! Matcher lexicons as injectable data tables.
//!
//! The merchant table, slang list, urgency keywords and crypto symbol
//! set are data, not control flow: deployments localize them without
//! touching matcher logic, and tests inject minimal fixtures.

use ambient_types::{CryptoAction, DueHint};

/// One known merchant with its inferred category.
#[derive(Clone, Debug)]
pub struct MerchantEntry {
    /// Normalized match key (lowercase, no diacritics).
    pub key: &'static str,
    /// Display name as printed on receipts.
    pub display: &'static str,
    pub category: &'static str,
}

/// Lexical knowledge shared by the domain matchers.
#[derive(Clone, Debug)]
pub struct Lexicon {
    pub merchants: Vec<MerchantEntry>,
    /// Generic place nouns that stand in for a merchant ("cafe", "farmacia").
    pub place_nouns: Vec<(&'static str, &'static str)>,
    /// Words that signal a completed expense ("fatura", "paguei").
    pub expense_context: Vec<&'static str>,
    /// Imperative/reminder verbs that open a task.
    pub reminder_verbs: Vec<&'static str>,
    /// Verbs inside a todo title that signal a payment intent.
    pub payment_verbs: Vec<&'static str>,
    /// Urgency keywords that raise task priority.
    pub urgency_keywords: Vec<&'static str>,
    /// Due-date hint words and their bucket.
    pub due_hints: Vec<(&'static str, DueHint)>,
    /// Crypto action verbs.
    pub crypto_verbs: Vec<(&'static str, CryptoAction)>,
    /// Known ticker symbols and asset-name aliases.
    pub crypto_symbols: Vec<(&'static str, &'static str)>,
    /// Generic crypto nouns that identify the domain without a symbol.
    pub crypto_nouns: Vec<&'static str>,
    /// Save-intent words for the links matcher.
    pub save_keywords: Vec<&'static str>,
    /// Nouns naming the thing being saved ("link", "site").
    pub link_nouns: Vec<&'static str>,
    /// Gift/occasion keywords for calendar correlation.
    pub occasion_keywords: Vec<&'static str>,
    /// Conversational filler stripped before title extraction.
    pub filler_words: Vec<&'static str>,
}

impl Lexicon {
    /// Built-in Portuguese/European table.
    ///
    /// The merchant rows mirror the vision sidecar's fast-path table so
    /// text and OCR signals agree on display names and categories.
    pub fn default_pt() -> Self {
        Self {
            merchants: vec![
                MerchantEntry { key: "pingo doce", display: "Pingo Doce", category: "Supermercado" },
                MerchantEntry { key: "continente", display: "Continente", category: "Supermercado" },
                MerchantEntry { key: "lidl", display: "Lidl", category: "Supermercado" },
                MerchantEntry { key: "aldi", display: "Aldi", category: "Supermercado" },
                MerchantEntry { key: "mercadona", display: "Mercadona", category: "Supermercado" },
                MerchantEntry { key: "edp", display: "EDP", category: "Serviços" },
                MerchantEntry { key: "galp", display: "Galp", category: "Transportes" },
                MerchantEntry { key: "meo", display: "MEO", category: "Serviços" },
                MerchantEntry { key: "vodafone", display: "Vodafone", category: "Serviços" },
                MerchantEntry { key: "nos", display: "NOS", category: "Serviços" },
                MerchantEntry { key: "uber", display: "Uber", category: "Transportes" },
                MerchantEntry { key: "bolt", display: "Bolt", category: "Transportes" },
                MerchantEntry { key: "worten", display: "Worten", category: "Tecnologia" },
                MerchantEntry { key: "fnac", display: "FNAC", category: "Tecnologia" },
                MerchantEntry { key: "zara", display: "Zara", category: "Vestuário" },
                MerchantEntry { key: "primark", display: "Primark", category: "Vestuário" },
                MerchantEntry { key: "mcdonald", display: "McDonald's", category: "Restaurante" },
                MerchantEntry { key: "burger king", display: "Burger King", category: "Restaurante" },
                MerchantEntry { key: "ikea", display: "IKEA", category: "Outros" },
            ],
            place_nouns: vec![
                ("cafe", "Restaurante"),
                ("restaurante", "Restaurante"),
                ("pastelaria", "Restaurante"),
                ("padaria", "Restaurante"),
                ("supermercado", "Supermercado"),
                ("mercado", "Supermercado"),
                ("farmacia", "Saúde"),
                ("gasolineira", "Transportes"),
                ("loja", "Outros"),
            ],
            expense_context: vec![
                "fatura", "paguei", "gastei", "comprei", "recibo", "conta", "despesa",
            ],
            reminder_verbs: vec![
                "lembrar", "lembra", "marcar", "agendar", "renovar", "ligar", "tratar",
            ],
            payment_verbs: vec!["pagar", "liquidar", "transferir"],
            urgency_keywords: vec!["urgente", "amanha", "deadline", "prazo", "ja", "asap"],
            due_hints: vec![
                ("hoje", DueHint::Today),
                ("amanha", DueHint::Tomorrow),
                ("esta semana", DueHint::ThisWeek),
                ("deadline", DueHint::Deadline),
                ("prazo", DueHint::Deadline),
            ],
            crypto_verbs: vec![
                ("comprar", CryptoAction::Buy),
                ("compra", CryptoAction::Buy),
                ("buy", CryptoAction::Buy),
                ("vender", CryptoAction::Sell),
                ("venda", CryptoAction::Sell),
                ("sell", CryptoAction::Sell),
                ("trocar", CryptoAction::Swap),
                ("swap", CryptoAction::Swap),
                ("segurar", CryptoAction::Hold),
                ("manter", CryptoAction::Hold),
                ("hold", CryptoAction::Hold),
            ],
            crypto_symbols: vec![
                ("btc", "BTC"),
                ("bitcoin", "BTC"),
                ("eth", "ETH"),
                ("ethereum", "ETH"),
                ("sol", "SOL"),
                ("solana", "SOL"),
                ("ada", "ADA"),
                ("cardano", "ADA"),
                ("xrp", "XRP"),
                ("doge", "DOGE"),
                ("dogecoin", "DOGE"),
                ("dot", "DOT"),
                ("avax", "AVAX"),
                ("matic", "MATIC"),
            ],
            crypto_nouns: vec!["cripto", "crypto", "criptomoeda", "token"],
            save_keywords: vec!["guarda", "guardar", "salva", "salvar", "marca"],
            link_nouns: vec!["link", "site", "pagina", "url", "artigo"],
            occasion_keywords: vec![
                "presente", "prenda", "aniversario", "anos", "natal", "casamento",
            ],
            filler_words: vec![
                "mano", "bro", "ya", "ai", "tipo", "pa", "meu", "ei", "oh", "entao",
            ],
        }
    }

    /// Exact merchant hit anywhere in the normalized text.
    pub fn find_merchant(&self, normalized: &str) -> Option<&MerchantEntry> {
        self.merchants
            .iter()
            .find(|m| contains_phrase(normalized, m.key))
    }

    /// Category for a generic place noun, if one occurs.
    pub fn find_place_noun(&self, normalized: &str) -> Option<(&'static str, &'static str)> {
        self.place_nouns
            .iter()
            .find(|(noun, _)| contains_word(normalized, noun))
            .copied()
    }

    pub fn ticker_for(&self, word: &str) -> Option<&'static str> {
        self.crypto_symbols
            .iter()
            .find(|(alias, _)| *alias == word)
            .map(|(_, ticker)| *ticker)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::default_pt()
    }
}

/// Whole-word containment: `nos` must not match inside `nosso`.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

/// Phrase containment with word boundaries on both ends, so multi-word
/// merchant keys ("pingo doce", "burger king") match as units.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(phrase) {
        let begin = start + pos;
        let end = begin + phrase.len();
        let left_ok = begin == 0
            || !haystack[..begin]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let right_ok = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if left_ok && right_ok {
            return true;
        }
        start = begin + 1;
    }
    false
}
