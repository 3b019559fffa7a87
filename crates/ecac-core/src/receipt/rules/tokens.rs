//! Whitespace tokenizer that keeps byte spans into the source line.

/// A whitespace-delimited token and where it sits in its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split a line on Unicode whitespace, recording each token's byte range.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (idx, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push(Token { text: &line[s..idx], start: s, end: idx });
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }

    if let Some(s) = start {
        tokens.push(Token { text: &line[s..], start: s, end: line.len() });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_spans() {
        let line = "1234  Imposto\tde Renda";
        let tokens = tokenize(line);

        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["1234", "Imposto", "de", "Renda"]);

        for t in &tokens {
            assert_eq!(&line[t.start..t.end], t.text);
        }
        assert_eq!(tokens[1].start, 6);
    }

    #[test]
    fn test_tokenize_multibyte_and_blank() {
        assert!(tokenize("   ").is_empty());

        let tokens = tokenize(" Contribuição\u{a0}Previdenciária ");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Contribuição");
        assert_eq!(tokens[1].text, "Previdenciária");
    }
}
