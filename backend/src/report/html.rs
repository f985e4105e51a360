//! Table row extraction from FMS report HTML.
//!
//! A small case-insensitive tag scanner: `<tr>` blocks become rows, `<td>`
//! and `<th>` blocks inside them become cells. Closing tags are optional, as
//! they are in the reports FMS writes. Comments are removed before scanning
//! and a `>` inside a quoted attribute value does not close its tag.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ReportRow;

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&bull;", "•"),
    // last, so `&amp;lt;` stays `&lt;`
    ("&amp;", "&"),
];

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("valid entity pattern"));

/// ASCII-lowercase copy; byte offsets are preserved.
fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Position of the next `<name` opening tag at or after `from`.
fn find_open_tag(lower: &str, name: &str, from: usize) -> Option<usize> {
    let pattern = format!("<{}", name);
    let mut pos = from;
    while let Some(rel) = lower.get(pos..)?.find(&pattern) {
        let start = pos + rel;
        let next = lower[start + pattern.len()..].chars().next();
        match next {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => return Some(start),
            None => return None,
            _ => pos = start + pattern.len(),
        }
    }
    None
}

/// Index just past the `>` of the tag starting at `start`, skipping quoted
/// attribute values.
fn after_open_tag(lower: &str, start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, b) in lower.bytes().enumerate().skip(start) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Copy of `html` with every `<!-- ... -->` removed; an unterminated comment
/// runs to the end.
fn strip_comments(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        rest = match rest[start + 4..].find("-->") {
            Some(end) => &rest[start + 4 + end + 3..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

/// Earliest of the given positions, or `default`.
fn first_of(candidates: impl IntoIterator<Item = Option<usize>>, default: usize) -> usize {
    candidates.into_iter().flatten().min().unwrap_or(default)
}

/// Extract every `<tr>` of a decoded report as a row of cell texts.
pub fn extract_rows(html: &str) -> Vec<ReportRow> {
    let html = strip_comments(html);
    let lower = to_lower(&html);
    let mut rows = Vec::new();
    let mut pos = 0;

    while let Some(start) = find_open_tag(&lower, "tr", pos) {
        let Some(body) = after_open_tag(&lower, start) else {
            break;
        };
        let end = first_of(
            [
                lower[body..].find("</tr").map(|i| body + i),
                find_open_tag(&lower, "tr", body),
                lower[body..].find("</table").map(|i| body + i),
            ],
            lower.len(),
        );
        rows.push(ReportRow::new(extract_cells(&html[body..end], &lower[body..end])));
        pos = end;
    }
    rows
}

fn extract_cells(raw: &str, lower: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0;

    loop {
        let Some(start) = [find_open_tag(lower, "td", pos), find_open_tag(lower, "th", pos)]
            .into_iter()
            .flatten()
            .min()
        else {
            break;
        };
        let Some(body) = after_open_tag(lower, start) else {
            break;
        };
        let end = first_of(
            [
                lower[body..].find("</td").map(|i| body + i),
                lower[body..].find("</th").map(|i| body + i),
                find_open_tag(lower, "td", body),
                find_open_tag(lower, "th", body),
            ],
            lower.len(),
        );
        cells.push(cell_text(&raw[body..end]));
        pos = end;
    }
    cells
}

/// Visible text of one cell: `<br>` and source newlines become line breaks,
/// other tags are dropped, entities decoded, each line whitespace-collapsed.
pub fn cell_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let rest = &raw[i..];
        if rest.starts_with('<') {
            let Some(close) = after_open_tag(rest, 0) else {
                break;
            };
            if is_line_break(&rest[1..close - 1]) {
                text.push('\n');
            }
            i += close;
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        text.push(ch);
        i += ch.len_utf8();
    }

    decode_entities(&text)
        .lines()
        .map(normalize_ws)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(tag: &str) -> bool {
    let name = tag
        .trim()
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");
    name.eq_ignore_ascii_case("br")
}

/// Decode the named entities FMS uses plus numeric ones.
pub fn decode_entities(s: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(s, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    NAMED_ENTITIES
        .iter()
        .fold(numeric.into_owned(), |acc, (entity, text)| acc.replace(entity, text))
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rows() {
        let html = r#"
            <html><body><table class="score">
              <TR><TH>Match Score Item</TH><th>Blue</th><th>Red</th></TR>
              <tr><td>Teams</td><td>254<br>1678<br/>971</td><td>118<BR />148<br>2056</td></tr>
              <tr class="x"><td> Final  Score </td><td>100</td><td>80</td></tr>
            </table></body></html>
        "#;
        let rows = extract_rows(html);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells, vec!["Match Score Item", "Blue", "Red"]);
        assert_eq!(rows[1].cells[1], "254\n1678\n971");
        assert_eq!(rows[1].cells[2], "118\n148\n2056");
        assert_eq!(rows[2].cells, vec!["Final Score", "100", "80"]);
    }

    #[test]
    fn test_unclosed_cells_and_rows() {
        let html = "<table><tr><td>Link Points<td>5<td>10<tr><td>Foul Points<td>0<td>4</table>";
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells, vec!["Link Points", "5", "10"]);
        assert_eq!(rows[1].cells, vec!["Foul Points", "0", "4"]);
    }

    #[test]
    fn test_similar_tag_names_ignored() {
        let html = "<tr><td>a</td><tdata>x</tdata><td>b</td></tr><track></track>";
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells.len(), 2);
    }

    #[test]
    fn test_cell_text_entities() {
        assert_eq!(cell_text("2&bull;1"), "2•1");
        assert_eq!(cell_text("<b>A&amp;B</b>&nbsp;"), "A&B");
        assert_eq!(cell_text("&#8226;&#x2713;"), "•✓");
        assert_eq!(cell_text("&lt;none&gt;"), "<none>");
    }

    #[test]
    fn test_cell_text_source_newlines() {
        assert_eq!(cell_text("\n   Docked\n   None  \n\n None\n"), "Docked\nNone\nNone");
        assert_eq!(cell_text("Yes<br>\n  No"), "Yes\nNo");
    }

    #[test]
    fn test_quoted_gt_in_attributes() {
        let html = r#"<tr><td title="a>b">Link Points</td><td data-x='>'>5</td><td>6</td></tr>"#;
        let rows = extract_rows(html);
        assert_eq!(rows[0].cells, vec!["Link Points", "5", "6"]);
        assert_eq!(cell_text(r#"<span title="1>0">7</span>"#), "7");
    }

    #[test]
    fn test_comments_skipped() {
        let html = "<table><!-- <tr><td>old</td><td>1</td><td>2</td></tr> -->\
                    <tr><td>Final Score<!-- </td> --></td><td>9</td><td>8</td></tr>\
                    <!-- unterminated <tr><td>x";
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, vec!["Final Score", "9", "8"]);
    }

    #[test]
    fn test_no_table() {
        assert!(extract_rows("<p>nothing here</p>").is_empty());
    }
}
