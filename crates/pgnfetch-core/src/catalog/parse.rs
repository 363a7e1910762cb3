//! Issue-table extraction.

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::record::Record;

/// Columns: issue, date, html, pgn, cbv, games, stories.
const MIN_CELLS: usize = 7;

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow::anyhow!("invalid selector {:?}: {:?}", s, e))
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// First run of ASCII digits in `text`, as a number.
fn leading_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn count(text: &str) -> Option<u32> {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

fn cell_link(cell: &ElementRef<'_>, anchor: &Selector, base: &Url) -> Option<String> {
    let href = cell.select(anchor).next()?.value().attr("href")?.trim();
    // An empty href would join to the index page itself.
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}

/// Parses the first `<table>` of the index page into records.
///
/// The header row is skipped, rows with fewer than seven cells or without an
/// issue number are dropped. Relative links are resolved against `base_url`.
pub fn parse_index(html: &str, base_url: &str) -> Result<Vec<Record>> {
    let base = Url::parse(base_url).with_context(|| format!("invalid base URL {}", base_url))?;
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td, th")?;
    let anchor_sel = selector("a")?;

    let doc = Html::parse_document(html);
    let Some(table) = doc.select(&table_sel).next() else {
        tracing::warn!("no table found on the index page");
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
        if cells.len() < MIN_CELLS {
            continue;
        }
        let issue = cell_text(&cells[0]);
        let Some(id) = leading_number(&issue).filter(|id| *id > 0) else {
            continue;
        };
        records.push(Record {
            id,
            issue: Some(issue),
            date: Some(cell_text(&cells[1])),
            html_link: cell_link(&cells[2], &anchor_sel, &base),
            source_url: cell_link(&cells[3], &anchor_sel, &base),
            cbv_link: cell_link(&cells[4], &anchor_sel, &base),
            games: count(&cell_text(&cells[5])),
            stories: count(&cell_text(&cells[6])),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table>
          <tr><th>TWIC</th><th>Date</th><th>Read</th><th>PGN</th><th>CBV</th><th>Games</th><th>Stories</th></tr>
          <tr>
            <td>1520</td><td>08/01/2024</td>
            <td><a href="/html/twic1520.html">Read</a></td>
            <td><a href="https://theweekinchess.com/zips/twic1520g.zip">PGN</a></td>
            <td><a href="../zips/twic1520c6.zip">CBV</a></td>
            <td>5123</td><td>12</td>
          </tr>
          <tr>
            <td>TWIC 1519</td><td>01/01/2024</td>
            <td></td><td></td><td></td>
            <td>n/a</td><td></td>
          </tr>
          <tr><td colspan="7">Older issues below</td></tr>
          <tr><td>no number</td><td>x</td><td></td><td></td><td></td><td>1</td><td>1</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_rows_and_resolves_links() {
        let records = parse_index(PAGE, "https://theweekinchess.com/twic").unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id, 1520);
        assert_eq!(first.date.as_deref(), Some("08/01/2024"));
        assert_eq!(
            first.html_link.as_deref(),
            Some("https://theweekinchess.com/html/twic1520.html")
        );
        assert_eq!(
            first.source_url(),
            Some("https://theweekinchess.com/zips/twic1520g.zip")
        );
        assert_eq!(
            first.cbv_link.as_deref(),
            Some("https://theweekinchess.com/zips/twic1520c6.zip")
        );
        assert_eq!(first.games, Some(5123));
        assert_eq!(first.stories, Some(12));

        let second = &records[1];
        assert_eq!(second.id, 1519);
        assert_eq!(second.issue.as_deref(), Some("TWIC 1519"));
        assert!(second.source_url().is_none());
        assert!(second.games.is_none());
    }

    #[test]
    fn empty_href_is_no_link() {
        let page = r#"
            <table>
              <tr><th>TWIC</th><th>Date</th><th>Read</th><th>PGN</th><th>CBV</th><th>Games</th><th>Stories</th></tr>
              <tr>
                <td>1521</td><td>15/01/2024</td>
                <td><a href="/html/twic1521.html">Read</a></td>
                <td><a href="">PGN</a></td>
                <td><a href="   ">CBV</a></td>
                <td>10</td><td>2</td>
              </tr>
            </table>
        "#;
        let records = parse_index(page, "https://theweekinchess.com/twic").unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].source_url().is_none());
        assert!(records[0].cbv_link.is_none());
        assert!(records[0].html_link.is_some());
    }

    #[test]
    fn page_without_table_is_empty() {
        let records = parse_index("<html><p>maintenance</p></html>", "https://x/").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn number_helpers() {
        assert_eq!(leading_number("TWIC 1519"), Some(1519));
        assert_eq!(leading_number("none"), None);
        assert_eq!(count("42"), Some(42));
        assert_eq!(count("4 2"), None);
        assert_eq!(count(""), None);
    }
}
