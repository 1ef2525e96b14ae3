//! Client-side table state over a fetched product list: filter, sort and
//! pagination, applied in that order.

use std::cmp::Ordering;

use crate::dto::ProductResponse;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Price,
    Description,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct ProductTable {
    rows: Vec<ProductResponse>,
    filter: String,
    sort: Option<(SortColumn, SortDirection)>,
    page_index: usize,
    page_size: usize,
}

impl Default for ProductTable {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            filter: String::new(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductTable {
    pub fn new(rows: Vec<ProductResponse>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Replaces the data, keeping filter and sort and clamping the page.
    pub fn set_rows(&mut self, rows: Vec<ProductResponse>) {
        self.rows = rows;
        self.page_index = self.page_index.min(self.page_count().saturating_sub(1));
    }

    pub fn rows(&self) -> &[ProductResponse] {
        &self.rows
    }

    pub fn find(&self, id: i32) -> Option<&ProductResponse> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Normalises the filter text and returns to the first page.
    pub fn apply_filter(&mut self, raw: &str) {
        self.filter = raw.trim().to_lowercase();
        self.page_index = 0;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.sort = Some((column, direction));
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Header-click cycle: ascending, descending, then unsorted.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn sort(&self) -> Option<(SortColumn, SortDirection)> {
        self.sort
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Changing the page size returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.page_index = page_index.min(self.page_count().saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page_index + 1);
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Number of rows left after filtering
    pub fn filtered_len(&self) -> usize {
        self.rows.iter().filter(|row| self.matches(row)).count()
    }

    pub fn page_count(&self) -> usize {
        self.filtered_len().div_ceil(self.page_size)
    }

    /// Filtered and sorted rows across all pages
    pub fn visible_rows(&self) -> Vec<&ProductResponse> {
        let mut rows: Vec<&ProductResponse> =
            self.rows.iter().filter(|row| self.matches(row)).collect();

        if let Some((column, direction)) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare(column, a, b);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        rows
    }

    /// Rows on the current page
    pub fn page(&self) -> Vec<&ProductResponse> {
        self.visible_rows()
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    fn matches(&self, row: &ProductResponse) -> bool {
        if self.filter.is_empty() {
            return true;
        }

        [
            row.name.to_lowercase(),
            row.description.as_deref().unwrap_or_default().to_lowercase(),
            row.price.normalize().to_string(),
            row.category_name().to_lowercase(),
        ]
        .iter()
        .any(|value| value.contains(&self.filter))
    }
}

fn compare(column: SortColumn, a: &ProductResponse, b: &ProductResponse) -> Ordering {
    match column {
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Price => a.price.cmp(&b.price),
        SortColumn::Description => {
            let a = a.description.as_deref().unwrap_or_default().to_lowercase();
            let b = b.description.as_deref().unwrap_or_default().to_lowercase();
            a.cmp(&b)
        }
        SortColumn::Category => a
            .category_name()
            .to_lowercase()
            .cmp(&b.category_name().to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CategoryResponse;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn product(id: i32, name: &str, price: Decimal, category: &str) -> ProductResponse {
        ProductResponse {
            id,
            name: name.to_string(),
            description: Some(format!("{name} description")),
            price,
            category: Some(CategoryResponse {
                id: 1,
                name: category.to_string(),
            }),
        }
    }

    fn sample() -> ProductTable {
        ProductTable::new(vec![
            product(1, "Hammer", dec!(9.99), "Tools"),
            product(2, "apple", dec!(0.5), "Food"),
            product(3, "Saw", dec!(24.00), "Tools"),
        ])
    }

    fn names(rows: Vec<&ProductResponse>) -> Vec<&str> {
        rows.into_iter().map(|row| row.name.as_str()).collect()
    }

    #[rstest]
    #[case("  HAMMER ", vec!["Hammer"])]
    #[case("tools", vec!["Hammer", "Saw"])]
    #[case("9.99", vec!["Hammer"])]
    #[case("apple desc", vec!["apple"])]
    #[case("", vec!["Hammer", "apple", "Saw"])]
    #[case("nothing", vec![])]
    fn filter_matches_any_displayed_column(#[case] filter: &str, #[case] expected: Vec<&str>) {
        let mut table = sample();
        table.apply_filter(filter);
        assert_eq!(names(table.visible_rows()), expected);
    }

    #[test]
    fn filter_resets_to_first_page() {
        let rows = (1..=25)
            .map(|i| product(i, &format!("Item {i}"), dec!(1), "Misc"))
            .collect();
        let mut table = ProductTable::new(rows);
        table.set_page(2);
        assert_eq!(table.page_index(), 2);

        table.apply_filter("item");
        assert_eq!(table.page_index(), 0);
    }

    #[test]
    fn sorts_in_either_direction() {
        let mut table = sample();
        table.set_sort(SortColumn::Name, SortDirection::Ascending);
        assert_eq!(names(table.visible_rows()), vec!["apple", "Hammer", "Saw"]);

        table.set_sort(SortColumn::Price, SortDirection::Descending);
        assert_eq!(names(table.visible_rows()), vec!["Saw", "Hammer", "apple"]);

        table.set_sort(SortColumn::Category, SortDirection::Ascending);
        assert_eq!(names(table.visible_rows()), vec!["apple", "Hammer", "Saw"]);
    }

    #[test]
    fn toggle_sort_cycles_through_unsorted() {
        let mut table = sample();
        table.toggle_sort(SortColumn::Price);
        assert_eq!(table.sort(), Some((SortColumn::Price, SortDirection::Ascending)));
        table.toggle_sort(SortColumn::Price);
        assert_eq!(table.sort(), Some((SortColumn::Price, SortDirection::Descending)));
        table.toggle_sort(SortColumn::Price);
        assert_eq!(table.sort(), None);
        table.toggle_sort(SortColumn::Price);
        table.toggle_sort(SortColumn::Name);
        assert_eq!(table.sort(), Some((SortColumn::Name, SortDirection::Ascending)));
    }

    #[test]
    fn paginates_with_default_page_size() {
        let rows = (1..=23)
            .map(|i| product(i, &format!("Item {i:02}"), dec!(1), "Misc"))
            .collect();
        let mut table = ProductTable::new(rows);
        assert_eq!(table.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(table.page_count(), 3);
        assert_eq!(table.page().len(), 10);

        table.next_page();
        table.next_page();
        table.next_page();
        assert_eq!(table.page_index(), 2);
        assert_eq!(names(table.page()), vec!["Item 21", "Item 22", "Item 23"]);

        table.set_page_size(5);
        assert_eq!(table.page_index(), 0);
        assert_eq!(table.page_count(), 5);
    }

    #[test]
    fn set_rows_clamps_page_index() {
        let rows = (1..=15)
            .map(|i| product(i, &format!("Item {i}"), dec!(1), "Misc"))
            .collect();
        let mut table = ProductTable::new(rows);
        table.set_page(1);
        table.set_rows(vec![product(1, "Only", dec!(1), "Misc")]);
        assert_eq!(table.page_index(), 0);
        assert_eq!(names(table.page()), vec!["Only"]);
    }
}
