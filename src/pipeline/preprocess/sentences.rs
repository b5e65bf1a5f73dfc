/// Abbreviations that end with a period but do not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "dr.", "mr.", "mrs.", "ms.", "prof.", "jr.", "sr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
    "approx.", "dept.", "est.", "avg.", "max.", "min.", "vol.", "no.", "pt.", "hx.", "dx.",
    "rx.", "tx.", "sx.", "b.i.d.", "t.i.d.", "q.i.d.", "p.o.", "p.r.n.",
];

/// True when `segment` ends with a known abbreviation that starts on a
/// word boundary ("pt." matches, "apt." does not).
fn ends_with_abbreviation(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    ABBREVIATIONS.iter().any(|abbr| {
        lower.ends_with(abbr)
            && lower[..lower.len() - abbr.len()]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

/// Split report text into sentences.
///
/// Boundaries are `.`, `!` or `?` followed by whitespace, and line breaks.
/// Works on lowercased text too: no capital letter is required after the
/// terminator. A line ending in `:` is a heading and stays attached to the
/// line that follows, so `"Diagnosis:\nAcute MI"` is one sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if i < start {
            continue;
        }
        match c {
            '.' | '!' | '?' => {
                let end = i + c.len_utf8();
                let followed_by_space = text[end..]
                    .chars()
                    .next()
                    .is_some_and(char::is_whitespace);
                if !followed_by_space {
                    continue;
                }
                if c == '.' && ends_with_abbreviation(&text[start..end]) {
                    continue;
                }
                push_sentence(&mut sentences, &text[start..end]);
                start = end;
            }
            '\n' => {
                if text[start..i].trim_end().ends_with(':') {
                    continue;
                }
                push_sentence(&mut sentences, &text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    push_sentence(&mut sentences, &text[start..]);
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let text = "Chief Complaint: chest pain. Diagnosis: suspected MI.";
        assert_eq!(
            split_sentences(text),
            vec!["Chief Complaint: chest pain.", "Diagnosis: suspected MI."]
        );
    }

    #[test]
    fn splits_lowercased_text() {
        let text = "pain radiates to left arm. no history of similar episodes! stable?";
        assert_eq!(
            split_sentences(text),
            vec![
                "pain radiates to left arm.",
                "no history of similar episodes!",
                "stable?"
            ]
        );
    }

    #[test]
    fn decimals_are_not_boundaries() {
        let text = "Nitroglycerin 0.4 mg SL given. Temp 98.6 on arrival.";
        assert_eq!(
            split_sentences(text),
            vec!["Nitroglycerin 0.4 mg SL given.", "Temp 98.6 on arrival."]
        );
    }

    #[test]
    fn abbreviations_are_not_boundaries() {
        let text = "Seen by Dr. Martin today. Metformin 500 mg p.o. twice daily.";
        assert_eq!(
            split_sentences(text),
            vec![
                "Seen by Dr. Martin today.",
                "Metformin 500 mg p.o. twice daily."
            ]
        );
    }

    #[test]
    fn abbreviation_needs_word_boundary() {
        let text = "Moved to a new apt. Follow up next week.";
        assert_eq!(
            split_sentences(text),
            vec!["Moved to a new apt.", "Follow up next week."]
        );
    }

    #[test]
    fn headings_join_the_following_line() {
        let text = "Chief Complaint:\n65-year-old male with chest pain\n\nDiagnosis:\n\nAcute myocardial infarction";
        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Chief Complaint:\n65-year-old male with chest pain");
        assert!(sentences[1].starts_with("Diagnosis:"));
        assert!(sentences[1].ends_with("Acute myocardial infarction"));
    }

    #[test]
    fn plain_lines_are_separate_sentences() {
        let text = "Regular rate and rhythm\nNo murmurs, gallops, or rubs";
        assert_eq!(
            split_sentences(text),
            vec!["Regular rate and rhythm", "No murmurs, gallops, or rubs"]
        );
    }

    #[test]
    fn empty_and_blank_text() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n\n  ").is_empty());
    }

    #[test]
    fn handles_multibyte_characters() {
        let text = "Température élevée à 39°C. Résultat normal.";
        assert_eq!(
            split_sentences(text),
            vec!["Température élevée à 39°C.", "Résultat normal."]
        );
    }
}
