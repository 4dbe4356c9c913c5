//! Property tests for the query pipeline.

use std::collections::BTreeSet;

use proptest::prelude::*;

use tabula_model::{CellValue, ColumnName, Row};
use tabula_query::{QueryState, SortOrder, filter, query, sort};

fn col(name: &str) -> ColumnName {
    ColumnName::new(name).expect("valid column")
}

fn value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        (-50i64..50).prop_map(CellValue::from),
        "[a-cA-C0-9]{0,3}".prop_map(CellValue::Text),
    ]
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((value(), value()), 0..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(index, (key, label))| {
                Row::new(index.to_string())
                    .with(col("key"), key)
                    .with(col("label"), label)
            })
            .collect()
    })
}

fn position(rows: &[Row], row: &Row) -> usize {
    rows.iter()
        .position(|candidate| candidate.id == row.id)
        .expect("row from input")
}

proptest! {
    #[test]
    fn sort_is_stable_in_both_directions(rows in rows(), descending in any::<bool>()) {
        let order = if descending { SortOrder::Desc } else { SortOrder::Asc };
        let mut sorted: Vec<&Row> = rows.iter().collect();
        sort(&mut sorted, "key", order);

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ordering = tabula_query::compare_rows(a, b, "key");
            let expected = match order {
                SortOrder::Asc => ordering.is_le(),
                SortOrder::Desc => ordering.is_ge(),
            };
            prop_assert!(expected);
            if ordering.is_eq() {
                prop_assert!(position(&rows, a) < position(&rows, b));
            }
        }
    }

    #[test]
    fn filter_is_a_matching_subset(rows in rows(), term in "[a-cA-C0-9]{0,2}") {
        let visible = vec![col("label")];
        let matched = filter(&rows, &visible, &term);
        prop_assert!(matched.len() <= rows.len());
        let needle = term.to_lowercase();
        for row in &matched {
            prop_assert!(row.display("label").to_lowercase().contains(&needle));
        }
        let missed = rows.len() - matched.len();
        let expected_missed = rows
            .iter()
            .filter(|row| !row.display("label").to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(missed, expected_missed);
    }

    #[test]
    fn pages_cover_every_match_once(rows in rows(), page_size in 1usize..7, term in "[a-c]{0,1}") {
        let visible = vec![col("key"), col("label")];
        let mut state = QueryState::new();
        state.search_term = term;
        state.toggle_sort(col("key"));

        let first = query(&rows, &visible, &state, 0, page_size);
        let mut seen = Vec::new();
        for page in 0..first.page_count() {
            let window = query(&rows, &visible, &state, page, page_size);
            prop_assert_eq!(window.page, page);
            prop_assert!(!window.items.is_empty());
            seen.extend(window.items.iter().map(|row| row.id.clone()));
        }
        prop_assert_eq!(seen.len(), first.total_count);
        let unique: BTreeSet<_> = seen.iter().collect();
        prop_assert_eq!(unique.len(), seen.len());
    }
}
