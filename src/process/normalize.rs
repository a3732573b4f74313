use crate::table::Table;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static CURLY_QUOTES: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{2018}\u{2019}\u{201C}\u{201D}]").unwrap());

/// NFKD, then collapse whitespace runs to one space, then fold curly quotes
/// to `'`. Leading and trailing whitespace is collapsed, not trimmed.
pub fn normalize_text(raw: &str) -> String {
    let decomposed: String = raw.nfkd().collect();
    let collapsed = WHITESPACE_RUN.replace_all(&decomposed, " ");
    CURLY_QUOTES.replace_all(&collapsed, "'").into_owned()
}

/// Apply [`normalize_text`] to every present cell. Headers and missing
/// cells are left alone.
pub fn normalize_table(table: &Table) -> Table {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_deref().map(normalize_text))
                .collect()
        })
        .collect();
    Table::new(table.headers.clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_curly_quotes() {
        assert_eq!(
            normalize_text("\u{201C}it\u{2019}s\u{201D} \u{2018}x\u{2019}"),
            "'it's' 'x'"
        );
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize_text("a  b\t\tc\r\n\nd"), "a b c d");
        assert_eq!(normalize_text("  padded  "), " padded ");
        assert_eq!(normalize_text("\n"), " ");
    }

    #[test]
    fn compatibility_decomposition() {
        // fi ligature and a non-breaking space
        assert_eq!(normalize_text("\u{FB01}ne\u{A0}\u{A0}day"), "fine day");
        // é decomposes to e + combining acute
        assert_eq!(normalize_text("caf\u{e9}"), "cafe\u{301}");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "",
            "plain",
            "  lots   of\tspace\n",
            "\u{201C}quoted\u{201D}\u{A0}\u{2003}wide",
            "\u{FB01}\u{2460}\u{e9}\u{2019}",
        ];
        for s in samples {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn table_keeps_headers_and_missing_cells() {
        let t = Table::new(
            vec!["Why  \u{2019}".into()],
            vec![vec![Some("a\u{2019}  b".into())], vec![None]],
        );
        let n = normalize_table(&t);
        assert_eq!(n.headers, t.headers);
        assert_eq!(n.rows, vec![vec![Some("a' b".into())], vec![None]]);
        assert_eq!(normalize_table(&n), n);
    }
}
