//! Todo matcher: reminder verbs plus a task-worthy noun phrase.

use ambient_types::{DueHint, RawSignal, SignalRoute, TodoPriority};

use crate::lexicon::{contains_phrase, contains_word, Lexicon};
use crate::matchers::MatchCandidate;

const CAP: f64 = 0.95;

pub fn evaluate(signal: &RawSignal, lexicon: &Lexicon) -> MatchCandidate {
    let mut candidate = MatchCandidate::empty(SignalRoute::Todo);
    let text = signal.normalized_text.as_str();

    let mut score: f64 = 0.0;

    let verb = lexicon
        .reminder_verbs
        .iter()
        .chain(lexicon.payment_verbs.iter())
        .find(|v| contains_word(text, v))
        .copied();

    if let Some(verb) = verb {
        score += 0.45;
        candidate.reason.push("todo:reminder_verb".into());
        candidate.extracted.keywords.push(verb.to_string());
    }

    let title = verb.and_then(|v| extract_title(signal, v, lexicon));
    if let Some(title) = &title {
        score += 0.30;
        candidate.reason.push("todo:title".into());
        candidate.extracted.todo_title = Some(title.clone());
    }

    if lexicon
        .urgency_keywords
        .iter()
        .any(|w| contains_word(text, w))
    {
        score += 0.10;
        candidate.reason.push("todo:urgency".into());
    }

    let due_hint = lexicon
        .due_hints
        .iter()
        .find(|(word, _)| contains_phrase(text, word))
        .map(|(_, hint)| *hint);
    if let Some(hint) = due_hint {
        score += 0.08;
        candidate.reason.push("todo:due_hint".into());
        candidate.extracted.due_hint = Some(hint);
    }

    candidate.extracted.todo_priority = Some(infer_priority(text, due_hint, lexicon));
    candidate.confidence = score.min(CAP);
    candidate.strict_parameters_met = candidate
        .extracted
        .todo_title
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());
    candidate.reason.push(
        if candidate.strict_parameters_met {
            "todo_title_present"
        } else {
            "todo_title_missing"
        }
        .into(),
    );
    candidate
}

/// The task phrase following the trigger verb, recovered with original
/// casing. Filler, leading connectives, and trailing due-hint words are
/// dropped; the reminder verb that opens the phrase itself ("lembra me
/// PAGAR o seguro") is kept.
fn extract_title(signal: &RawSignal, verb: &str, lexicon: &Lexicon) -> Option<String> {
    let normalized: Vec<&str> = signal.normalized_text.split_whitespace().collect();
    let raw: Vec<&str> = signal.raw_text.split_whitespace().collect();
    let verb_idx = normalized
        .iter()
        .position(|t| t.trim_matches(|c: char| !c.is_alphanumeric()) == verb)?;

    let mut picked: Vec<&str> = Vec::new();
    for idx in (verb_idx + 1)..normalized.len() {
        let norm_token = normalized[idx].trim_matches(|c: char| !c.is_alphanumeric());
        if picked.is_empty() && matches!(norm_token, "me" | "de" | "te" | "que") {
            continue;
        }
        if lexicon.filler_words.contains(&norm_token) {
            continue;
        }
        // Due-hint words close the phrase ("... da carrinha amanha").
        if lexicon.due_hints.iter().any(|(w, _)| *w == norm_token) {
            break;
        }
        // Original casing comes from the parallel raw token stream.
        picked.push(raw.get(idx).copied().unwrap_or(normalized[idx]));
    }

    let title = picked.join(" ").trim().to_string();
    (!title.is_empty()).then_some(title)
}

fn infer_priority(text: &str, due_hint: Option<DueHint>, lexicon: &Lexicon) -> TodoPriority {
    if contains_word(text, "urgente") || contains_word(text, "asap") {
        return TodoPriority::Urgent;
    }
    if matches!(due_hint, Some(DueHint::Today) | Some(DueHint::Tomorrow))
        || contains_word(text, "deadline")
        || contains_word(text, "prazo")
    {
        return TodoPriority::High;
    }
    if lexicon
        .urgency_keywords
        .iter()
        .any(|w| contains_word(text, w))
    {
        return TodoPriority::High;
    }
    TodoPriority::Normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient_types::SignalKind;

    fn lexicon() -> Lexicon {
        Lexicon::default_pt()
    }

    #[test]
    fn reminder_with_payment_phrase_is_strict() {
        let signal = RawSignal::new(
            SignalKind::Text,
            "mano lembra me pagar o seguro da carrinha amanha",
        );
        let candidate = evaluate(&signal, &lexicon());
        assert!(candidate.strict_parameters_met);
        let title = candidate.extracted.todo_title.unwrap();
        assert!(title.contains("seguro da carrinha"));
        assert!(!title.contains("amanha"));
        assert!(!title.contains("mano"));
        assert_eq!(candidate.extracted.due_hint, Some(DueHint::Tomorrow));
        assert_eq!(candidate.extracted.todo_priority, Some(TodoPriority::High));
        assert!(candidate.confidence > 0.85);
    }

    #[test]
    fn urgency_keyword_raises_priority() {
        let signal = RawSignal::new(SignalKind::Text, "marcar consulta urgente");
        let candidate = evaluate(&signal, &lexicon());
        assert_eq!(candidate.extracted.todo_priority, Some(TodoPriority::Urgent));
        assert!(candidate.strict_parameters_met);
    }

    #[test]
    fn verb_without_phrase_is_not_strict() {
        let signal = RawSignal::new(SignalKind::Text, "lembrar");
        let candidate = evaluate(&signal, &lexicon());
        assert!(!candidate.strict_parameters_met);
        assert!(candidate.reason.iter().any(|r| r == "todo_title_missing"));
    }

    #[test]
    fn unrelated_text_scores_low() {
        let signal = RawSignal::new(SignalKind::Text, "ya fatura continente 45,90 eur foi hoje");
        let candidate = evaluate(&signal, &lexicon());
        assert!(candidate.confidence < 0.45);
    }

    #[test]
    fn title_preserves_original_casing() {
        let signal = RawSignal::new(SignalKind::Text, "lembra me ligar ao Dr. Costa");
        let candidate = evaluate(&signal, &lexicon());
        let title = candidate.extracted.todo_title.unwrap();
        assert!(title.contains("Dr. Costa"));
    }
}
