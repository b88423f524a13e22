use scraper::{ElementRef, Html, Selector};
use trending_core::{parse_timestamp, PeriodBounds};

use crate::error::ExtractionError;
use crate::extract::parse_selector;

const START_COLUMN: &str = "TSTART";
const STOP_COLUMN: &str = "TSTOP";

/// Reads the reporting period from a quarterly report page.
///
/// The period table is the `index`-th `<table>` of the document (0-based).
/// Its header is the first row holding `<th>` cells, or the first row when
/// there is none; the first following row with `<td>` cells supplies the
/// values.
pub fn period_bounds(html: &str, index: usize, url: &str) -> Result<PeriodBounds, ExtractionError> {
    let doc = Html::parse_document(html);
    let table_sel = parse_selector("table")?;
    let row_sel = parse_selector("tr")?;
    let th_sel = parse_selector("th")?;
    let td_sel = parse_selector("td")?;
    let cell_sel = parse_selector("th, td")?;

    let table = doc
        .select(&table_sel)
        .nth(index)
        .ok_or_else(|| ExtractionError::MissingPeriodTable {
            url: url.to_string(),
            index,
        })?;

    let rows: Vec<ElementRef<'_>> = table.select(&row_sel).collect();
    let header_pos = rows
        .iter()
        .position(|row| row.select(&th_sel).next().is_some())
        .unwrap_or(0);
    let empty = || ExtractionError::EmptyPeriodTable {
        url: url.to_string(),
    };
    let header = rows.get(header_pos).ok_or_else(empty)?;
    let values = rows
        .iter()
        .skip(header_pos + 1)
        .find(|row| row.select(&td_sel).next().is_some())
        .ok_or_else(empty)?;

    let names = cell_texts(header, &cell_sel);
    let values = cell_texts(values, &cell_sel);

    Ok(PeriodBounds {
        start: column_timestamp(&names, &values, START_COLUMN, url)?,
        stop: column_timestamp(&names, &values, STOP_COLUMN, url)?,
    })
}

fn cell_texts(row: &ElementRef<'_>, cells: &Selector) -> Vec<String> {
    row.select(cells)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

fn column_timestamp(
    names: &[String],
    values: &[String],
    column: &'static str,
    url: &str,
) -> Result<chrono::DateTime<chrono::Utc>, ExtractionError> {
    let value = names
        .iter()
        .position(|name| name == column)
        .and_then(|pos| values.get(pos))
        .ok_or_else(|| ExtractionError::MissingPeriodColumn {
            url: url.to_string(),
            column,
        })?;
    parse_timestamp(value).ok_or_else(|| ExtractionError::BadTimestamp {
        url: url.to_string(),
        column,
        value: value.clone(),
    })
}
