use rust_decimal::Decimal;

use outlet_insight::{
    stock::StockRow,
    variance::{DEFAULT_TOP_MOVERS, compute_variance},
};

fn row(item_no: &str, category: &str, book: i64, phys: i64, cost: Option<&str>) -> StockRow {
    StockRow {
        outlet: "Main".to_string(),
        category: category.to_string(),
        item_no: item_no.to_string(),
        item_name: format!("Item {item_no}"),
        barcode: format!("BC{item_no}"),
        book_stock: Decimal::from(book),
        phys_stock: Decimal::from(phys),
        cost_price: cost.map(|raw| raw.parse().expect("cost price literal")),
        diff_stock: None,
    }
}

#[test]
fn quantity_ranking_uses_absolute_diff_with_stable_ties() {
    let rows = vec![
        row("1", "A", 10, 9, None),  // diff -1
        row("2", "A", 10, 16, None), // diff +6
        row("3", "A", 20, 13, None), // diff -7
        row("4", "A", 5, 11, None),  // diff +6, ties with row 2
    ];
    let report = compute_variance(rows, 3);
    let order: Vec<&str> = report
        .top_by_qty
        .iter()
        .map(|fact| fact.item_no.as_str())
        .collect();
    assert_eq!(order, ["3", "2", "4"]);
}

#[test]
fn value_ranking_is_signed_so_overages_beat_shrinkage() {
    let rows = vec![
        row("1", "A", 100, 0, Some("10")), // diff value -1000
        row("2", "A", 0, 50, Some("10")),  // diff value +500
    ];
    let report = compute_variance(rows, DEFAULT_TOP_MOVERS);
    let order: Vec<&str> = report
        .top_by_value
        .iter()
        .map(|fact| fact.item_no.as_str())
        .collect();
    assert_eq!(order, ["2", "1"]);

    // The same two rows rank by magnitude on the quantity list.
    let qty_order: Vec<&str> = report
        .top_by_qty
        .iter()
        .map(|fact| fact.item_no.as_str())
        .collect();
    assert_eq!(qty_order, ["1", "2"]);
}

#[test]
fn rows_without_cost_price_are_not_value_rankable() {
    let rows = vec![
        row("1", "A", 10, 0, None),
        row("2", "A", 10, 12, Some("3")),
    ];
    let report = compute_variance(rows, DEFAULT_TOP_MOVERS);
    assert_eq!(report.top_by_value.len(), 1);
    assert_eq!(report.top_by_value[0].item_no, "2");
}

#[test]
fn remaining_excludes_both_top_lists_and_sorts_by_category() {
    let rows = vec![
        row("1", "B", 100, 0, Some("1")), // big qty and value mover
        row("2", "A", 10, 30, Some("2")), // big value mover
        row("3", "B", 10, 11, None),
        row("4", "A", 10, 12, None),
        row("5", "A", 10, 8, None),
    ];
    let report = compute_variance(rows, 2);

    let ranked: Vec<&str> = report
        .top_by_qty
        .iter()
        .chain(report.top_by_value.iter())
        .map(|fact| fact.item_no.as_str())
        .collect();
    for fact in &report.remaining {
        assert!(
            !ranked.contains(&fact.item_no.as_str()),
            "row {} leaked into remaining",
            fact.item_no
        );
    }

    // Category ascending, then diff stock descending within a category.
    let remaining: Vec<(&str, Decimal)> = report
        .remaining
        .iter()
        .map(|fact| (fact.category.as_str(), fact.diff_stock))
        .collect();
    let mut expected = remaining.clone();
    expected.sort_by(|a, b| a.0.cmp(b.0).then(b.1.cmp(&a.1)));
    assert_eq!(remaining, expected);
}

#[test]
fn short_row_sets_shrink_the_top_lists() {
    let rows = vec![row("1", "A", 10, 9, Some("2")), row("2", "A", 3, 3, None)];
    let report = compute_variance(rows, DEFAULT_TOP_MOVERS);
    assert_eq!(report.top_by_qty.len(), 2);
    assert_eq!(report.top_by_value.len(), 1);
    assert!(report.remaining.is_empty());
}

#[test]
fn summary_totals_cover_stock_and_present_values() {
    let rows = vec![
        row("1", "A", 10, 8, Some("2")),
        row("2", "A", 5, 9, None),
    ];
    let report = compute_variance(rows, DEFAULT_TOP_MOVERS);
    let summary = &report.summary;

    assert_eq!(summary.book_stock, Decimal::from(15));
    assert_eq!(summary.phys_stock, Decimal::from(17));
    assert_eq!(summary.diff_stock, Decimal::from(2));
    // Only row 1 carries values.
    assert_eq!(summary.book_value, Some(Decimal::from(20)));
    assert_eq!(summary.phys_value, Some(Decimal::from(16)));
    assert_eq!(summary.diff_value, Some(Decimal::from(-4)));
    // 2 / 15 * 100
    assert_eq!(summary.variance_pct.round_dp(2), Decimal::new(1333, 2));
}

#[test]
fn zero_book_stock_total_guards_the_percentage() {
    let rows = vec![row("1", "A", 0, 7, None)];
    let report = compute_variance(rows, DEFAULT_TOP_MOVERS);
    assert_eq!(report.summary.variance_pct, Decimal::ZERO);
}
