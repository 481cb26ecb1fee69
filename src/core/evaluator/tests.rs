use super::*;
use crate::core::operations::PERCENT_FORMAT;
use crate::error::CalcError;
use crate::host::colnames::DefaultNameCleaner;
use crate::params::SingleValueSelector;
use crate::types::{ColumnMetadata, ColumnType};

fn num(name: &str, values: &[Option<f64>]) -> Column {
    Column::new(name, ColumnValue::Number(values.to_vec()))
}

fn table(columns: Vec<Column>) -> Table {
    let mut table = Table::new();
    for column in columns {
        table.add_column(column);
    }
    table
}

fn params(operation: &str) -> Params {
    Params {
        operation: operation.to_string(),
        ..Params::default()
    }
}

fn colnames(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn formats(list: &[(&str, &str)]) -> InputColumns {
    list.iter()
        .map(|(name, format)| {
            (
                name.to_string(),
                ColumnMetadata::new(*name, ColumnType::Number, Some(*format)),
            )
        })
        .collect()
}

fn run(table: &mut Table, params: &Params) -> CalcResult<RenderOutcome> {
    let inputs = table.infer_input_columns();
    render(table, params, &inputs, &DefaultNameCleaner::default())
}

fn numbers<'t>(table: &'t Table, name: &str) -> &'t [Option<f64>] {
    table
        .column(name)
        .and_then(|c| c.values.as_numbers())
        .expect("number column")
}

fn assert_close(actual: &[Option<f64>], expected: &[Option<f64>]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        match (a, e) {
            (Some(a), Some(e)) => assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}"),
            (None, None) => {}
            _ => panic!("{actual:?} vs {expected:?}"),
        }
    }
}

fn mixed_table() -> Table {
    let mut t = table(vec![
        num("b", &[Some(2.0), Some(5.0), None, Some(8.0), Some(11.0)]),
        num("c", &[Some(3.0), Some(6.0), None, Some(9.0), Some(12.0)]),
    ]);
    t.columns.insert(
        0,
        Column::new(
            "a",
            ColumnValue::Text(vec![
                Some("fred".to_string()),
                Some("frederson".to_string()),
                None,
                Some("maggie".to_string()),
                Some("Fredrick".to_string()),
            ]),
        ),
    );
    t
}

//==============================================================================
// Waiting for parameters
//==============================================================================

#[test]
fn test_no_multicolumn_is_noop() {
    let mut t = mixed_table();
    let before = t.clone();
    let outcome = run(&mut t, &params("add")).unwrap();
    assert!(outcome.is_noop());
    assert_eq!(t, before);
}

#[test]
fn test_no_col1_is_noop() {
    let mut t = mixed_table();
    let before = t.clone();
    let p = Params {
        col2: "b".to_string(),
        ..params("subtract")
    };
    assert!(run(&mut t, &p).unwrap().is_noop());
    assert_eq!(t, before);
}

#[test]
fn test_no_col2_is_noop() {
    let mut t = mixed_table();
    let p = Params {
        col1: "b".to_string(),
        ..params("subtract")
    };
    assert!(run(&mut t, &p).unwrap().is_noop());
}

#[test]
fn test_unary_without_column_is_noop() {
    let mut t = mixed_table();
    assert!(run(&mut t, &params("percent_of_column_sum")).unwrap().is_noop());
}

#[test]
fn test_every_aggregate_single_column_is_noop() {
    for op in ["add", "multiply", "mean", "median", "minimum", "maximum"] {
        let mut t = mixed_table();
        let p = Params {
            colnames: colnames(&["b"]),
            outcolname: "X".to_string(),
            ..params(op)
        };
        assert!(run(&mut t, &p).unwrap().is_noop(), "{op}");
        assert_eq!(t.columns.len(), 3);
    }
}

#[test]
fn test_single_column_mean_ignores_scalar_selector() {
    let mut t = mixed_table();
    let p = Params {
        colnames: colnames(&["b"]),
        single_value_selector: SingleValueSelector::Constant,
        ..params("mean")
    };
    assert!(run(&mut t, &p).unwrap().is_noop());
}

//==============================================================================
// Aggregates
//==============================================================================

#[test]
fn test_add_default_name() {
    let mut t = table(vec![
        num("b", &[Some(1.0), Some(2.0), Some(3.0)]),
        num("c", &[Some(1.2), Some(2.3), Some(3.4)]),
        num("d", &[None, Some(2.0), Some(2.0)]),
    ]);
    let p = Params {
        colnames: colnames(&["b", "c", "d"]),
        ..params("add")
    };
    let outcome = run(&mut t, &p).unwrap();

    match outcome {
        RenderOutcome::Applied {
            column_name,
            column_format,
            warnings,
        } => {
            assert_eq!(column_name, "Sum of b, c, d");
            assert_eq!(column_format.as_deref(), Some("{:,}"));
            assert!(warnings.is_empty());
        }
        RenderOutcome::NoOp => panic!("expected a new column"),
    }
    assert_eq!(t.column_names(), colnames(&["b", "c", "d", "Sum of b, c, d"]));
    assert_close(
        numbers(&t, "Sum of b, c, d"),
        &[Some(2.2), Some(6.3), Some(8.4)],
    );
}

#[test]
fn test_add_four_columns_default_name() {
    let mut t = table(vec![
        num("b", &[Some(1.0)]),
        num("c", &[Some(2.0)]),
        num("d", &[Some(3.0)]),
        num("e", &[Some(4.0)]),
    ]);
    let p = Params {
        colnames: colnames(&["b", "c", "d", "e"]),
        ..params("add")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "Sum of 4 columns"), &[Some(10.0)]);
}

#[test]
fn test_add_default_name_collision_is_numbered() {
    let mut t = table(vec![
        num("b", &[Some(1.0)]),
        num("c", &[Some(2.0)]),
        num("Sum of b, c", &[Some(0.0)]),
    ]);
    let p = Params {
        colnames: colnames(&["b", "c"]),
        ..params("add")
    };
    let outcome = run(&mut t, &p).unwrap();
    let RenderOutcome::Applied {
        column_name,
        warnings,
        ..
    } = outcome
    else {
        panic!("expected a new column");
    };
    assert_eq!(column_name, "Sum of b, c 2");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].id, "util.colnames.warnings.numbered");
    assert_close(numbers(&t, "Sum of b, c"), &[Some(0.0)]);
}

#[test]
fn test_outcolname_is_verbatim_without_warnings() {
    let mut t = table(vec![num("b", &[Some(1.0)]), num("c", &[Some(2.0)])]);
    let p = Params {
        colnames: colnames(&["b", "c"]),
        outcolname: "X".to_string(),
        ..params("add")
    };
    let outcome = run(&mut t, &p).unwrap();
    assert!(matches!(
        outcome,
        RenderOutcome::Applied { ref column_name, ref warnings, .. }
            if column_name == "X" && warnings.is_empty()
    ));
    assert_close(numbers(&t, "X"), &[Some(3.0)]);
}

#[test]
fn test_outcolname_matching_existing_replaces_in_place() {
    let mut t = table(vec![num("b", &[Some(1.0)]), num("c", &[Some(2.0)])]);
    let p = Params {
        colnames: colnames(&["b", "c"]),
        outcolname: "b".to_string(),
        ..params("add")
    };
    run(&mut t, &p).unwrap();
    assert_eq!(t.column_names(), colnames(&["b", "c"]));
    assert_close(numbers(&t, "b"), &[Some(3.0)]);
}

#[test]
fn test_add_constant() {
    let mut t = table(vec![num("b", &[Some(1.0)]), num("c", &[Some(2.0)])]);
    let p = Params {
        colnames: colnames(&["b", "c"]),
        outcolname: "X".to_string(),
        single_value_selector: SingleValueSelector::Constant,
        single_value_constant: 100.0,
        ..params("add")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "X"), &[Some(103.0)]);
}

#[test]
fn test_add_constant_to_single_column() {
    let mut t = table(vec![num("b", &[Some(1.0), None])]);
    let p = Params {
        colnames: colnames(&["b"]),
        outcolname: "X".to_string(),
        single_value_selector: SingleValueSelector::Constant,
        single_value_constant: 10.0,
        ..params("add")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "X"), &[Some(11.0), Some(10.0)]);
}

#[test]
fn test_add_cell_uses_first_column_format() {
    let mut t = table(vec![
        num("b", &[Some(1.0), Some(1.1)]),
        num("c", &[Some(2.0), Some(2.1)]),
        num("d", &[Some(3.0), Some(3.1)]),
    ]);
    let p = Params {
        colnames: colnames(&["b", "c", "d"]),
        outcolname: "X".to_string(),
        single_value_selector: SingleValueSelector::Cell,
        single_value_row: 2,
        single_value_col: "d".to_string(),
        ..params("add")
    };
    let inputs = formats(&[("b", "{:,.2f}"), ("c", PERCENT_FORMAT), ("d", "{:,}")]);
    let outcome = render(&mut t, &p, &inputs, &DefaultNameCleaner::default()).unwrap();

    assert_close(numbers(&t, "X"), &[Some(9.1), Some(9.4)]);
    assert!(matches!(
        outcome,
        RenderOutcome::Applied { column_format: Some(ref f), .. } if f == "{:,.2f}"
    ));
}

#[test]
fn test_add_cell_not_number_leaves_table_untouched() {
    let mut t = table(vec![
        num("b", &[Some(1.0), Some(1.1)]),
        num("c", &[Some(2.0), Some(2.1)]),
        Column::new(
            "s",
            ColumnValue::Text(vec![Some("a".to_string()), Some("b".to_string())]),
        ),
    ]);
    let before = t.clone();
    let p = Params {
        colnames: colnames(&["b", "c"]),
        outcolname: "X".to_string(),
        single_value_selector: SingleValueSelector::Cell,
        single_value_row: 2,
        single_value_col: "s".to_string(),
        ..params("add")
    };
    let err = run(&mut t, &p).unwrap_err();
    assert!(matches!(err, CalcError::CellNotNumeric));
    assert_eq!(t, before);
}

#[test]
fn test_add_cell_missing() {
    let mut t = table(vec![
        num("b", &[Some(1.0), Some(1.1)]),
        num("c", &[Some(2.0), Some(2.1)]),
        num("d", &[Some(3.0), None]),
    ]);
    let p = Params {
        colnames: colnames(&["b", "c"]),
        single_value_selector: SingleValueSelector::Cell,
        single_value_row: 2,
        single_value_col: "d".to_string(),
        ..params("add")
    };
    assert!(matches!(run(&mut t, &p), Err(CalcError::CellNotNumeric)));
}

#[test]
fn test_add_cell_row_too_big_reports_row_count() {
    let mut t = table(vec![
        num("b", &[Some(1.0), Some(1.1)]),
        num("c", &[Some(2.0), Some(2.1)]),
    ]);
    let p = Params {
        colnames: colnames(&["b", "c"]),
        single_value_selector: SingleValueSelector::Cell,
        single_value_row: 3,
        single_value_col: "c".to_string(),
        ..params("multiply")
    };
    let err = run(&mut t, &p).unwrap_err();
    assert!(matches!(err, CalcError::RowTooBig { limit: 2 }));
}

#[test]
fn test_multiply_constant() {
    let mut t = table(vec![num("b", &[Some(1.0)]), num("c", &[Some(2.0)])]);
    let p = Params {
        colnames: colnames(&["b", "c"]),
        outcolname: "X".to_string(),
        single_value_selector: SingleValueSelector::Constant,
        single_value_constant: 100.0,
        ..params("multiply")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "X"), &[Some(200.0)]);
}

#[test]
fn test_mean_skips_missing() {
    let mut t = table(vec![
        num("a", &[Some(1.0), None]),
        num("b", &[Some(2.0), Some(3.0)]),
        num("c", &[Some(2.0), Some(2.0)]),
    ]);
    let p = Params {
        colnames: colnames(&["a", "b", "c"]),
        outcolname: "X".to_string(),
        ..params("mean")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "X"), &[Some(5.0 / 3.0), Some(2.5)]);
}

#[test]
fn test_mean_of_all_missing_row_is_missing() {
    let mut t = table(vec![num("a", &[None]), num("b", &[None])]);
    let p = Params {
        colnames: colnames(&["a", "b"]),
        outcolname: "X".to_string(),
        ..params("mean")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "X"), &[None]);
}

#[test]
fn test_median_minimum_maximum() {
    for (op, expected) in [("median", 2.0), ("minimum", 1.0), ("maximum", 7.0)] {
        let mut t = table(vec![
            num("a", &[Some(7.0)]),
            num("b", &[Some(1.0)]),
            num("c", &[Some(2.0)]),
        ]);
        let p = Params {
            colnames: colnames(&["a", "b", "c"]),
            outcolname: "X".to_string(),
            ..params(op)
        };
        run(&mut t, &p).unwrap();
        assert_close(numbers(&t, "X"), &[Some(expected)]);
    }
}

#[test]
fn test_aggregate_rejects_text_column() {
    let mut t = mixed_table();
    let p = Params {
        colnames: colnames(&["a", "b"]),
        ..params("add")
    };
    let err = run(&mut t, &p).unwrap_err();
    assert!(matches!(err, CalcError::ColumnNotNumeric { column } if column == "a"));
}

//==============================================================================
// Binary
//==============================================================================

#[test]
fn test_subtract_propagates_missing_and_keeps_first_format() {
    let mut t = table(vec![
        num("a", &[Some(1.0), Some(2.0)]),
        num("b", &[Some(2.0), None]),
    ]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        outcolname: "X".to_string(),
        ..params("subtract")
    };
    let inputs = formats(&[("a", "{:,.2f}"), ("b", "{:.1%}")]);
    let outcome = render(&mut t, &p, &inputs, &DefaultNameCleaner::default()).unwrap();

    assert_close(numbers(&t, "X"), &[Some(-1.0), None]);
    assert!(matches!(
        outcome,
        RenderOutcome::Applied { column_format: Some(ref f), .. } if f == "{:,.2f}"
    ));
}

#[test]
fn test_divide_by_zero_is_missing() {
    let mut t = table(vec![
        num("A", &[Some(1.0), Some(-2.0), Some(3.0), Some(-4.0)]),
        num("B", &[Some(0.0), Some(0.0), Some(1.0), None]),
    ]);
    let p = Params {
        col1: "A".to_string(),
        col2: "B".to_string(),
        outcolname: "X".to_string(),
        ..params("divide")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "X"), &[None, None, Some(3.0), None]);
}

#[test]
fn test_binary_default_name() {
    let mut t = table(vec![num("a", &[Some(1.0)]), num("b", &[Some(2.0)])]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        ..params("subtract")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "a minus b"), &[Some(-1.0)]);
}

#[test]
fn test_percent_change() {
    let mut t = table(vec![
        num("a", &[Some(1.0), Some(2.0)]),
        num("b", &[Some(1.6), None]),
    ]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        ..params("percent_change")
    };
    let outcome = run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "Percent change a to b"), &[Some(0.6), None]);
    assert!(matches!(
        outcome,
        RenderOutcome::Applied { column_format: Some(ref f), .. } if f == PERCENT_FORMAT
    ));
}

#[test]
fn test_percent_change_from_zero_is_missing() {
    let mut t = table(vec![
        num("a", &[Some(1.0), Some(0.0)]),
        num("b", &[Some(1.6), Some(2.0)]),
    ]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        ..params("percent_change")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "Percent change a to b"), &[Some(0.6), None]);
}

#[test]
fn test_percent_multiply_with_percent_formatted_input() {
    let mut t = table(vec![
        num("a", &[Some(0.6), Some(2.0)]),
        num("b", &[Some(1.6), None]),
    ]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        ..params("percent_multiply")
    };
    let inputs = formats(&[("a", PERCENT_FORMAT), ("b", "{:,.2f}")]);
    let outcome = render(&mut t, &p, &inputs, &DefaultNameCleaner::default()).unwrap();

    assert_close(numbers(&t, "a percent of b"), &[Some(0.6 * 1.6), None]);
    assert!(matches!(
        outcome,
        RenderOutcome::Applied { column_format: Some(ref f), .. } if f == "{:,.2f}"
    ));
}

#[test]
fn test_percent_multiply_with_plain_input_divides_by_100() {
    let mut t = table(vec![num("a", &[Some(60.0)]), num("b", &[Some(1.6)])]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        ..params("percent_multiply")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "a percent of b"), &[Some(0.96)]);
}

#[test]
fn test_percent_divide_over_zero_is_missing() {
    let mut t = table(vec![
        num("a", &[Some(1.0), Some(0.5)]),
        num("b", &[Some(1.6), Some(0.0)]),
    ]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        ..params("percent_divide")
    };
    let outcome = run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "a is this percent of b"), &[Some(0.625), None]);
    assert!(matches!(
        outcome,
        RenderOutcome::Applied { column_format: Some(ref f), .. } if f == PERCENT_FORMAT
    ));
}

#[test]
fn test_binary_unknown_column() {
    let mut t = table(vec![num("a", &[Some(1.0)])]);
    let p = Params {
        col1: "a".to_string(),
        col2: "zz".to_string(),
        ..params("divide")
    };
    assert!(matches!(
        run(&mut t, &p),
        Err(CalcError::ColumnNotFound { column }) if column == "zz"
    ));
}

//==============================================================================
// Unary
//==============================================================================

#[test]
fn test_percent_of_column_sum() {
    let mut t = table(vec![num("a", &[Some(1.0), None, Some(3.0)])]);
    let p = Params {
        col1: "a".to_string(),
        ..params("percent_of_column_sum")
    };
    let outcome = run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "Percent of a"), &[Some(0.25), None, Some(0.75)]);
    assert!(matches!(
        outcome,
        RenderOutcome::Applied { column_format: Some(ref f), .. } if f == PERCENT_FORMAT
    ));
}

#[test]
fn test_percent_of_all_missing_column_is_all_missing() {
    let mut t = table(vec![num("a", &[None, None])]);
    let p = Params {
        col1: "a".to_string(),
        ..params("percent_of_column_sum")
    };
    run(&mut t, &p).unwrap();
    assert_close(numbers(&t, "Percent of a"), &[None, None]);
}

#[test]
fn test_percent_of_zero_sum_column_errors() {
    let mut t = table(vec![num("a", &[Some(1.0), Some(-1.0), None])]);
    let before = t.clone();
    let p = Params {
        col1: "a".to_string(),
        ..params("percent_of_column_sum")
    };
    assert!(matches!(run(&mut t, &p), Err(CalcError::ZeroColumnSum)));
    assert_eq!(t, before);
}

//==============================================================================
// Dispatch
//==============================================================================

#[test]
fn test_unknown_operation() {
    let mut t = mixed_table();
    let err = run(&mut t, &params("power")).unwrap_err();
    assert!(matches!(err, CalcError::UnknownOperation { .. }));
}

#[test]
fn test_evaluate_does_not_touch_table() {
    let t = table(vec![num("a", &[Some(1.0)]), num("b", &[Some(2.0)])]);
    let p = Params {
        col1: "a".to_string(),
        col2: "b".to_string(),
        ..params("divide")
    };
    let inputs = t.infer_input_columns();
    let derived = Evaluator::new(&t, &p, &inputs).evaluate().unwrap().unwrap();
    assert_eq!(derived.default_name, "a divided by b");
    assert_eq!(derived.values, vec![Some(0.5)]);
    assert_eq!(t.columns.len(), 2);
}
