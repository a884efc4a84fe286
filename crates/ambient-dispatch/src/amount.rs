//! Locale-aware monetary token parsing.
//!
//! European signals mix decimal commas and decimal points freely
//! ("45,90 eur", "45.90", "1.234,56"), so the parser decides the
//! decimal separator per token instead of per locale.

use std::sync::OnceLock;

use regex::Regex;

/// One monetary hit in the text.
#[derive(Clone, Debug, PartialEq)]
pub struct AmountHit {
    pub value: f64,
    /// ISO code when a currency symbol/word sits next to the number.
    pub currency: Option<&'static str>,
    /// Byte offset of the number token in the normalized text.
    pub start: usize,
}

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            (€|\$|£)?            # leading symbol
            \s*
            (\d+(?:[.,]\d{1,3})*) # number with mixed separators
            \s*
            (€|\$|£|eur|euros?|usd|dolares?|gbp|libras?)? # trailing token
            ",
        )
        .expect("amount regex is valid")
    })
}

/// Map a currency symbol or word to its ISO code.
pub fn currency_code(token: &str) -> Option<&'static str> {
    match token {
        "€" | "eur" | "euro" | "euros" => Some("EUR"),
        "$" | "usd" | "dolar" | "dolares" => Some("USD"),
        "£" | "gbp" | "libra" | "libras" => Some("GBP"),
        _ => None,
    }
}

/// Parse one number token, deciding the decimal separator from shape.
///
/// Rules: with both separators present, the last one is decimal; a
/// single separator followed by 1-2 digits is decimal; followed by 3
/// digits it is a thousands group.
pub fn parse_number(token: &str) -> Option<f64> {
    let has_comma = token.contains(',');
    let has_dot = token.contains('.');

    let cleaned = match (has_comma, has_dot) {
        (false, false) => token.to_string(),
        (true, true) => {
            let last_comma = token.rfind(',').unwrap_or(0);
            let last_dot = token.rfind('.').unwrap_or(0);
            if last_comma > last_dot {
                token.replace('.', "").replace(',', ".")
            } else {
                token.replace(',', "")
            }
        }
        (true, false) => separate_single(token, ','),
        (false, true) => separate_single(token, '.'),
    };

    cleaned.parse::<f64>().ok()
}

fn separate_single(token: &str, sep: char) -> String {
    let occurrences = token.matches(sep).count();
    let trailing = token.rsplit(sep).next().map(str::len).unwrap_or(0);
    if occurrences == 1 && trailing <= 2 {
        token.replace(sep, ".")
    } else {
        // Thousands grouping ("1.234", "1,234,567").
        token.replace(sep, "")
    }
}

/// All monetary hits in the normalized text, in order of appearance.
pub fn find_amounts(normalized: &str) -> Vec<AmountHit> {
    let mut hits = Vec::new();
    for caps in amount_regex().captures_iter(normalized) {
        let number = match caps.get(2) {
            Some(m) => m,
            None => continue,
        };
        let value = match parse_number(number.as_str()) {
            Some(v) if v.is_finite() => v,
            _ => continue,
        };
        let currency = caps
            .get(1)
            .or_else(|| caps.get(3))
            .and_then(|m| currency_code(m.as_str()));
        hits.push(AmountHit {
            value,
            currency,
            start: number.start(),
        });
    }
    hits
}

/// The best monetary candidate: prefer a hit with an adjacent currency
/// token, fall back to the first number.
pub fn best_amount(normalized: &str) -> Option<AmountHit> {
    let hits = find_amounts(normalized);
    hits.iter()
        .find(|h| h.currency.is_some())
        .or_else(|| hits.first())
        .cloned()
}
