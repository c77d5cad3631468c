// src/specs/grid.rs
//! Read every `<table>` of a page into plain text grids.
//!
//! - Header rows come from `<thead>`, or else from leading rows made only of `<th>`.
//! - Multi-row headers are flattened: `colspan`/`rowspan` are expanded and each
//!   column takes the label of its deepest non-empty header cell.
//! - `<tfoot>` is ignored. Body cells with `colspan` are padded with empty cells.
//! - Nested tables are read as tables of their own.

use scraper::{ElementRef, Html};

use crate::core::sanitize::{is_total_label, normalize_ws};
use crate::data::ParseWarning;

const MAX_SPAN: usize = 64;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub body: Vec<Vec<String>>,
}

impl RawTable {
    pub fn has_total_header(&self) -> bool {
        self.header.iter().any(|h| is_total_label(h))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub colspan: usize,
    pub rowspan: usize,
    pub is_th: bool,
}

pub fn read_tables(markup: &str) -> Vec<RawTable> {
    let doc = Html::parse_document(markup);
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name().eq_ignore_ascii_case("table"))
        .map(read_table)
        .collect()
}

fn read_table(table: ElementRef<'_>) -> RawTable {
    let mut head_rows: Vec<Vec<Cell>> = Vec::new();
    let mut body_rows: Vec<Vec<Cell>> = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "thead" => head_rows.extend(child_rows(child).map(row_cells)),
            "tbody" => body_rows.extend(child_rows(child).map(row_cells)),
            "tr" => body_rows.push(row_cells(child)),
            _ => {} // tfoot, caption, colgroup
        }
    }

    // No <thead>: leading all-<th> rows are the header.
    if head_rows.is_empty() {
        let n = body_rows
            .iter()
            .take_while(|r| !r.is_empty() && r.iter().all(|c| c.is_th))
            .count();
        head_rows = body_rows.drain(..n).collect();
    }

    RawTable {
        header: flatten_header(&head_rows),
        body: body_rows.iter().map(|r| expand_body_row(r)).collect(),
    }
}

fn child_rows<'a>(section: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
}

fn row_cells(tr: ElementRef<'_>) -> Vec<Cell> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter_map(|c| {
            let name = c.value().name();
            if name != "td" && name != "th" {
                return None;
            }
            Some(Cell {
                text: normalize_ws(&c.text().collect::<String>()),
                colspan: span(c.value().attr("colspan")),
                rowspan: span(c.value().attr("rowspan")),
                is_th: name == "th",
            })
        })
        .collect()
}

fn span(attr: Option<&str>) -> usize {
    attr.and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

fn expand_body_row(cells: &[Cell]) -> Vec<String> {
    let mut out = Vec::with_capacity(cells.len());
    for c in cells {
        out.push(c.text.clone());
        for _ in 1..c.colspan {
            out.push(String::new());
        }
    }
    out
}

/// One label per column; deeper header rows override their parents.
pub fn flatten_header(rows: &[Vec<Cell>]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    // (rows still covered below, label) per column
    let mut carry: Vec<(usize, String)> = Vec::new();

    fn place(labels: &mut Vec<String>, col: usize, text: &str) {
        if labels.len() <= col {
            labels.resize(col + 1, String::new());
        }
        if !text.is_empty() {
            labels[col] = text.to_string();
        }
    }

    for row in rows {
        let mut col = 0usize;
        let mut cells = row.iter();
        let mut next = cells.next();

        loop {
            if col < carry.len() && carry[col].0 > 0 {
                carry[col].0 -= 1;
                let text = carry[col].1.clone();
                place(&mut labels, col, &text);
                col += 1;
                continue;
            }
            let Some(cell) = next else { break };
            for _ in 0..cell.colspan {
                if carry.len() <= col {
                    carry.resize(col + 1, (0, String::new()));
                }
                carry[col] = (cell.rowspan - 1, cell.text.clone());
                place(&mut labels, col, &cell.text);
                col += 1;
            }
            next = cells.next();
        }

        // rowspans hanging past the last cell of this row
        for c in col..carry.len() {
            if carry[c].0 > 0 {
                carry[c].0 -= 1;
                let text = carry[c].1.clone();
                place(&mut labels, c, &text);
            }
        }
    }
    labels
}

/// Which table holds the report.
/// Preference: a table whose header has a TOTAL column, most body rows wins.
/// Fallback: the sixth table if there are more than five, else the last one.
pub fn pick_results(tables: &[RawTable]) -> Option<(usize, Option<ParseWarning>)> {
    let mut best: Option<usize> = None;
    for (i, t) in tables.iter().enumerate() {
        if !t.has_total_header() || t.body.is_empty() {
            continue;
        }
        match best {
            Some(b) if tables[b].body.len() >= t.body.len() => {}
            _ => best = Some(i),
        }
    }
    if let Some(i) = best {
        return Some((i, None));
    }

    if tables.is_empty() {
        return None;
    }
    let idx = if tables.len() > 5 { 5 } else { tables.len() - 1 };
    let warn = ParseWarning(format!(
        "results table not identified by a TOTAL header; using table {} of {}",
        idx + 1,
        tables.len()
    ));
    Some((idx, Some(warn)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th(text: &str, colspan: usize, rowspan: usize) -> Cell {
        Cell { text: text.into(), colspan, rowspan, is_th: true }
    }

    #[test]
    fn two_row_header_with_spans() {
        // | S No | Maker | Month Wise (3) | TOTAL |
        // |      |       | JAN | FEB | MAR |       |
        let rows = vec![
            vec![th("S No", 1, 2), th("Maker", 1, 2), th("Month Wise", 3, 1), th("TOTAL", 1, 2)],
            vec![th("JAN", 1, 1), th("FEB", 1, 1), th("MAR", 1, 1)],
        ];
        assert_eq!(
            flatten_header(&rows),
            vec!["S No", "Maker", "JAN", "FEB", "MAR", "TOTAL"]
        );
    }

    #[test]
    fn parent_label_fills_uncovered_children() {
        let rows = vec![vec![th("Maker", 1, 1), th("Counts", 2, 1)]];
        assert_eq!(flatten_header(&rows), vec!["Maker", "Counts", "Counts"]);
    }

    #[test]
    fn reads_thead_and_tbody() {
        let html = r#"<html><body><table>
            <thead><tr><th>S No</th><th>Maker</th><th>TOTAL</th></tr></thead>
            <tbody>
              <tr><td>1</td><td> MARUTI&nbsp;SUZUKI </td><td>1,200</td></tr>
              <tr><td colspan="2">Total</td><td>1,200</td></tr>
            </tbody>
            <tfoot><tr><td>x</td></tr></tfoot>
        </table></body></html>"#;
        let tables = read_tables(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header, vec!["S No", "Maker", "TOTAL"]);
        assert_eq!(tables[0].body[0], vec!["1", "MARUTI SUZUKI", "1,200"]);
        assert_eq!(tables[0].body[1], vec!["Total", "", "1,200"]);
    }

    #[test]
    fn header_from_leading_th_rows() {
        let html = "<table><tr><th>Maker</th><th>TOTAL</th></tr><tr><td>A</td><td>3</td></tr></table>";
        let tables = read_tables(html);
        assert_eq!(tables[0].header, vec!["Maker", "TOTAL"]);
        assert_eq!(tables[0].body, vec![vec!["A".to_string(), "3".to_string()]]);
    }

    #[test]
    fn pick_prefers_total_header_then_falls_back() {
        let plain = RawTable { header: vec!["a".into()], body: vec![vec!["1".into()]] };
        let report = RawTable {
            header: vec!["Maker".into(), "TOTAL".into()],
            body: vec![vec!["A".into(), "1".into()]],
        };
        let tables = vec![plain.clone(), report, plain.clone()];
        assert_eq!(pick_results(&tables), Some((1, None)));

        let (idx, warn) = pick_results(&vec![plain.clone(); 7]).unwrap();
        assert_eq!(idx, 5);
        assert!(warn.is_some());

        let (idx, _) = pick_results(&vec![plain; 3]).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(pick_results(&[]), None);
    }
}
