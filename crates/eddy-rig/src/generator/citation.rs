//! Passage citation labels (`[S1]`, `[S2]`, ...) inside rationale text.

/// Citations found in a rationale after filtering.
#[derive(Debug, Default, PartialEq)]
pub(super) struct Citations {
    /// Rationale with rejected labels removed.
    pub text: String,
    /// Accepted labels in order of first appearance, without brackets.
    pub kept: Vec<String>,
    /// Rejected labels in order of appearance, without brackets.
    pub removed: Vec<String>,
}

/// Splits the labels in `text` into those in `known` and the rest, removing
/// the rest from the text.
pub(super) fn filter(text: &str, known: &[String]) -> Citations {
    let mut citations = Citations::default();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("[S") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match label_len(candidate) {
            Some(len) => {
                let label = &candidate[1..len - 1];
                if known.iter().any(|k| k == label) {
                    out.push_str(&candidate[..len]);
                    if !citations.kept.iter().any(|k| k == label) {
                        citations.kept.push(label.to_owned());
                    }
                } else {
                    citations.removed.push(label.to_owned());
                }
                rest = &candidate[len..];
            }
            None => {
                out.push_str("[S");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);

    citations.text = if citations.removed.is_empty() {
        out
    } else {
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    };
    citations
}

/// Returns the byte length of a `[S<digits>]` label at the start of `text`.
fn label_len(text: &str) -> Option<usize> {
    let digits = text[2..].bytes().take_while(u8::is_ascii_digit).count();
    (digits > 0 && text.as_bytes().get(2 + digits) == Some(&b']')).then_some(3 + digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        vec!["S1".into(), "S2".into()]
    }

    #[test]
    fn keeps_known_labels() {
        let c = filter("Standard value [S1], confirmed by [S2] and [S1].", &known());
        assert_eq!(c.kept, ["S1", "S2"]);
        assert!(c.removed.is_empty());
        assert_eq!(c.text, "Standard value [S1], confirmed by [S2] and [S1].");
    }

    #[test]
    fn removes_unknown_labels() {
        let c = filter("Per [S7] and [S1] the value holds.", &known());
        assert_eq!(c.kept, ["S1"]);
        assert_eq!(c.removed, ["S7"]);
        assert_eq!(c.text, "Per and [S1] the value holds.");
    }

    #[test]
    fn ignores_non_label_brackets() {
        let c = filter("See [Smith 2001] and [S].", &[]);
        assert!(c.kept.is_empty() && c.removed.is_empty());
        assert_eq!(c.text, "See [Smith 2001] and [S].");
    }
}
