use std::sync::LazyLock;

use regex::Regex;

static SPAN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+|www\.\S+").expect("span url pattern"));

/// Extracts the winning URL of each outermost bracket pair, in order of the
/// pairs' closing positions.
///
/// Escaped brackets (`\[`, `\]`) are literal text, nested pairs collapse
/// into the content of their outermost span, and within one span the last
/// URL-like token is the authoritative target. Spans without a URL-like
/// token contribute nothing.
pub fn extract_urls(text: &str) -> Vec<String> {
    collect_spans(text)
        .iter()
        .filter_map(|span| last_url_in_span(span))
        .collect()
}

/// Single left-to-right scan. `depth` tracks unescaped bracket nesting and
/// `current` accumulates the content of the outermost open pair; text
/// outside any bracket is discarded.
fn collect_spans(text: &str) -> Vec<String> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.peek().copied() {
                Some(next @ ('[' | ']')) => {
                    // Escaped bracket: literal content inside a span,
                    // dropped entirely outside one.
                    if depth > 0 {
                        current.push(next);
                    }
                    chars.next();
                }
                // A lone backslash is kept inside a span, dropped outside.
                _ => {
                    if depth > 0 {
                        current.push('\\');
                    }
                }
            },
            '[' => {
                if depth == 0 {
                    // Outermost opener: stray text seen so far is not span content.
                    current.clear();
                } else {
                    current.push('[');
                }
                depth += 1;
            }
            ']' => {
                // An unmatched closer is silently dropped.
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        spans.push(current.trim().to_string());
                        current.clear();
                    } else {
                        current.push(']');
                    }
                }
            }
            _ => {
                if depth > 0 {
                    current.push(ch);
                }
            }
        }
    }

    // An unclosed opener yields no span; partial content is discarded.
    spans
}

fn last_url_in_span(span: &str) -> Option<String> {
    // Literal brackets left in the content act as token separators.
    let cleaned: String = span
        .chars()
        .map(|ch| if ch == '[' || ch == ']' { ' ' } else { ch })
        .collect();
    SPAN_URL
        .find_iter(&cleaned)
        .last()
        .map(|found| found.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::collect_spans;

    #[test]
    fn nested_pairs_collapse_into_outer_content() {
        assert_eq!(collect_spans("[a [b] c]"), vec!["a [b] c"]);
    }

    #[test]
    fn escaped_brackets_outside_spans_vanish() {
        assert_eq!(collect_spans("\\[x\\]"), Vec::<String>::new());
    }

    #[test]
    fn lone_backslash_kept_inside_span_only() {
        assert_eq!(collect_spans("a\\b [c\\d]"), vec!["c\\d"]);
    }

    #[test]
    fn unclosed_opener_discards_partial_content() {
        assert_eq!(collect_spans("[never closed"), Vec::<String>::new());
    }
}
