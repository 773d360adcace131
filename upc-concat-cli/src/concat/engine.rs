//! Aggregation of offer rows into one row per offer

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::normalize::{BarcodeError, canonical_barcode, normalize_title};
use super::{Cell, ColumnSelection, Table, ValidationError};

/// Output column headers, in output order
pub mod output_cols {
    pub const OFFER_ID: &str = "OFFER ID";
    pub const TITLE: &str = "TITLE";
    pub const CONCATENATED_UPC: &str = "CONCATENATED FINAL UPC";
    pub const ITEM_NAME: &str = "ITEM NAME";

    pub const ALL: [&str; 4] = [OFFER_ID, TITLE, CONCATENATED_UPC, ITEM_NAME];
}

/// Separator between barcodes in the concatenated field
pub const UPC_SEPARATOR: &str = ",";
/// Separator between item names in the item name field
pub const ITEM_SEPARATOR: &str = "\n";

/// One consolidated offer
///
/// `upcs[i]` and `item_names[i]` always come from the same source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRow {
    pub offer_id: String,
    pub title: String,
    pub upcs: Vec<String>,
    pub item_names: Vec<String>,
}

impl OfferRow {
    /// `CONCATENATED FINAL UPC` field
    pub fn concatenated_upc(&self) -> String {
        self.upcs.join(UPC_SEPARATOR)
    }

    /// `ITEM NAME` field, one name per line
    pub fn item_name_lines(&self) -> String {
        self.item_names.join(ITEM_SEPARATOR)
    }

    /// Field values in output column order
    pub fn fields(&self) -> [String; 4] {
        [
            self.offer_id.clone(),
            self.title.clone(),
            self.concatenated_upc(),
            self.item_name_lines(),
        ]
    }
}

impl Serialize for OfferRow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(output_cols::ALL.len()))?;
        for (name, value) in output_cols::ALL.iter().zip(self.fields()) {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// A source row excluded because its barcode could not be canonicalized
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedBarcode {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub value: Cell,
    pub error: BarcodeError,
}

impl std::fmt::Display for RejectedBarcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {} (value '{}')", self.row, self.error, self.value)
    }
}

/// Counters collected while transforming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub input_rows: usize,
    pub blank_barcodes: usize,
    pub rejected_barcodes: usize,
    pub duplicates_removed: usize,
    pub groups: usize,
}

/// Result of a transform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformReport {
    pub rows: Vec<OfferRow>,
    pub rejected: Vec<RejectedBarcode>,
    pub stats: TransformStats,
}

/// Row after normalization and filtering
struct NormalizedRow {
    offer_id: String,
    title: String,
    barcode: String,
    item_name: String,
}

/// Collapse `table` into one row per (offer id, normalized title)
///
/// Fails only when the column selection does not match the table. Rows with
/// blank barcodes are dropped, rows with unusable barcodes are reported in
/// [`TransformReport::rejected`], and rows repeating an earlier (offer id,
/// title, barcode, item name) are dropped. The same barcode under a different
/// item name stays. Groups are emitted in order of first appearance.
pub fn transform(
    table: &Table,
    selection: &ColumnSelection,
) -> Result<TransformReport, ValidationError> {
    let cols = selection.resolve(table)?;
    let mut report = TransformReport::default();
    report.stats.input_rows = table.len();

    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
    let mut kept: Vec<NormalizedRow> = Vec::new();

    for (idx, row) in table.rows().iter().enumerate() {
        let barcode = match canonical_barcode(&row[cols.barcode]) {
            Ok(Some(code)) => code,
            Ok(None) => {
                report.stats.blank_barcodes += 1;
                continue;
            }
            Err(error) => {
                log::warn!("Skipping row {}: {}", idx + 1, error);
                report.rejected.push(RejectedBarcode {
                    row: idx + 1,
                    value: row[cols.barcode].clone(),
                    error,
                });
                continue;
            }
        };

        let normalized = NormalizedRow {
            offer_id: row[cols.offer_id].to_text(),
            title: normalize_title(&row[cols.title]),
            barcode,
            item_name: row[cols.item_name].to_text(),
        };

        let key = (
            normalized.offer_id.clone(),
            normalized.title.clone(),
            normalized.barcode.clone(),
            normalized.item_name.clone(),
        );
        if !seen.insert(key) {
            report.stats.duplicates_removed += 1;
            continue;
        }

        kept.push(normalized);
    }

    report.stats.rejected_barcodes = report.rejected.len();
    report.rows = group_rows(kept);
    report.stats.groups = report.rows.len();

    log::info!(
        "Transformed {} rows into {} offers ({} blank, {} rejected, {} duplicates)",
        report.stats.input_rows,
        report.stats.groups,
        report.stats.blank_barcodes,
        report.stats.rejected_barcodes,
        report.stats.duplicates_removed
    );

    Ok(report)
}

fn group_rows(rows: Vec<NormalizedRow>) -> Vec<OfferRow> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<OfferRow> = Vec::new();

    for row in rows {
        let key = (row.offer_id, row.title);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(OfferRow {
                    offer_id: key.0.clone(),
                    title: key.1.clone(),
                    upcs: Vec::new(),
                    item_names: Vec::new(),
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        groups[slot].upcs.push(row.barcode);
        groups[slot].item_names.push(row.item_name);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> ColumnSelection {
        ColumnSelection::new("id", "title", "item", "upc")
    }

    fn table(rows: Vec<[Cell; 4]>) -> Table {
        let mut table = Table::new(vec![
            "id".into(),
            "title".into(),
            "item".into(),
            "upc".into(),
            "store".into(),
        ]);
        for row in rows {
            table.push_row(row.to_vec());
        }
        table
    }

    fn row(id: &str, title: &str, item: &str, upc: Cell) -> [Cell; 4] {
        [id.into(), title.into(), item.into(), upc]
    }

    #[test]
    fn test_sale_now_example() {
        let input = table(vec![
            row("O1", " Sale  Now ", "Soda", Cell::Int(12345)),
            row("O1", "Sale Now", "Chips", Cell::Int(678)),
        ]);

        let report = transform(&input, &selection()).unwrap();

        assert_eq!(report.rows.len(), 1);
        let offer = &report.rows[0];
        assert_eq!(offer.offer_id, "O1");
        assert_eq!(offer.title, "Sale Now");
        assert_eq!(offer.concatenated_upc(), "00000000012345,00000000000678");
        assert_eq!(offer.item_name_lines(), "Soda\nChips");
    }

    #[test]
    fn test_blank_barcode_only_row_emits_no_group() {
        let input = table(vec![
            row("O1", "Sale", "Soda", Cell::Int(1)),
            row("O2", "Clearance", "Bread", Cell::Empty),
            row("O1", "Sale", "Water", Cell::from("  ")),
        ]);

        let report = transform(&input, &selection()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].offer_id, "O1");
        assert_eq!(report.rows[0].concatenated_upc(), "00000000000001");
        assert_eq!(report.rows[0].item_name_lines(), "Soda");
        assert_eq!(report.stats.blank_barcodes, 2);
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let mut input = table(vec![
            row("O1", "Sale", "Soda", Cell::Int(42)),
            row("O1", "Sale ", "Soda", Cell::Float(42.0)),
        ]);
        // incidental column differs
        input.push_row(vec!["O1".into(), "Sale".into(), "Soda".into(), Cell::from("42"), "North".into()]);

        let report = transform(&input, &selection()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].upcs, vec!["00000000000042"]);
        assert_eq!(report.rows[0].item_names, vec!["Soda"]);
        assert_eq!(report.stats.duplicates_removed, 2);
    }

    #[test]
    fn test_same_barcode_for_different_item_is_kept() {
        let input = table(vec![
            row("O1", "Sale", "Soda 2L", Cell::Int(42)),
            row("O1", "Sale", "Soda 1L", Cell::Int(42)),
        ]);

        let report = transform(&input, &selection()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].concatenated_upc(), "00000000000042,00000000000042");
        assert_eq!(report.rows[0].item_name_lines(), "Soda 2L\nSoda 1L");
        assert_eq!(report.stats.duplicates_removed, 0);
    }

    #[test]
    fn test_same_barcode_in_different_offers_is_kept() {
        let input = table(vec![
            row("O1", "Sale", "Soda", Cell::Int(42)),
            row("O2", "Sale", "Soda", Cell::Int(42)),
            row("O1", "Other", "Soda", Cell::Int(42)),
        ]);

        let report = transform(&input, &selection()).unwrap();

        assert_eq!(report.rows.len(), 3);
        assert!(report.rows.iter().all(|r| r.upcs == vec!["00000000000042"]));
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let input = table(vec![
            row("B", "Second", "x", Cell::Int(1)),
            row("A", "First", "y", Cell::Int(2)),
            row("B", "Second", "z", Cell::Int(3)),
            row("C", "Third", "w", Cell::Empty),
            row("C", "Third", "v", Cell::Int(4)),
        ]);

        let report = transform(&input, &selection()).unwrap();
        let ids: Vec<_> = report.rows.iter().map(|r| r.offer_id.as_str()).collect();

        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(report.rows[0].item_name_lines(), "x\nz");
    }

    #[test]
    fn test_rejected_barcodes_do_not_abort() {
        let input = table(vec![
            row("O1", "Sale", "Soda", Cell::from("N/A")),
            row("O1", "Sale", "Chips", Cell::Int(7)),
        ]);

        let report = transform(&input, &selection()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].item_names, vec!["Chips"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].row, 1);
        assert_eq!(report.rejected[0].value, Cell::from("N/A"));
        assert_eq!(report.stats.rejected_barcodes, 1);
        assert_eq!(
            report.rejected[0].to_string(),
            "row 1: not a number (value 'N/A')"
        );
    }

    #[test]
    fn test_decimal_text_matches_numeric_cell() {
        let input = table(vec![
            row("O1", "Sale", "Soda", Cell::Float(12345.6)),
            row("O1", "Sale", "Soda", Cell::from("12345.6")),
            row("O1", "Sale", "Chips", Cell::from("6.78E+2")),
            row("O1", "Sale", "Water", Cell::Float(-0.0)),
        ]);

        let report = transform(&input, &selection()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(
            report.rows[0].concatenated_upc(),
            "00000000012346,00000000000678"
        );
        assert_eq!(report.stats.duplicates_removed, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].row, 4);
        assert_eq!(report.rejected[0].error, BarcodeError::Negative);
    }

    #[test]
    fn test_missing_column_is_validation_error() {
        let input = table(vec![row("O1", "Sale", "Soda", Cell::Int(1))]);
        let bad = ColumnSelection::new("id", "title", "item", "barcode");

        let err = transform(&input, &bad).unwrap_err();
        assert!(err.to_string().contains("barcode"));
    }

    #[test]
    fn test_empty_table_gives_empty_output() {
        let report = transform(&table(vec![]), &selection()).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.stats, TransformStats::default());
    }

    #[test]
    fn test_output_invariants() {
        let input = table(vec![
            row("O1", "A  deal", "one", Cell::Int(1)),
            row("O1", "A deal", "two", Cell::Empty),
            row("O1", "A\tdeal", "three", Cell::from("0003")),
            row("O2", "B", "four", Cell::Float(99.0)),
            row("O2", "B", "five", Cell::from("bad")),
            row("O2", "B", "six", Cell::Int(99)),
        ]);

        let first = transform(&input, &selection()).unwrap();
        let second = transform(&input, &selection()).unwrap();
        assert_eq!(first, second);

        for offer in &first.rows {
            let upcs: Vec<_> = offer.concatenated_upc().split(',').map(String::from).collect();
            let names: Vec<_> = offer.item_name_lines().split('\n').map(String::from).collect();

            assert_eq!(upcs.len(), names.len());
            assert!(upcs.iter().all(|u| u.len() == 14 && u.bytes().all(|b| b.is_ascii_digit())));
        }

        // O2 keeps the same barcode once per distinct item name
        assert_eq!(first.rows.len(), 2);
        assert_eq!(first.rows[1].upcs, vec!["00000000000099", "00000000000099"]);
        assert_eq!(first.rows[1].item_name_lines(), "four\nsix");
        assert_eq!(first.rows[0].item_name_lines(), "one\nthree");
    }

    #[test]
    fn test_serialize_uses_output_headers() {
        let offer = OfferRow {
            offer_id: "O1".into(),
            title: "Sale".into(),
            upcs: vec!["00000000000001".into(), "00000000000002".into()],
            item_names: vec!["a".into(), "b".into()],
        };

        let json = serde_json::to_value(&offer).unwrap();
        assert_eq!(json["OFFER ID"], "O1");
        assert_eq!(json["CONCATENATED FINAL UPC"], "00000000000001,00000000000002");
        assert_eq!(json["ITEM NAME"], "a\nb");
    }
}
