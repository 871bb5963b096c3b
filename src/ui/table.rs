//! Sökning, sortering och sidindelning för tabellvyer

use std::cmp::Ordering;

/// Värde i en tabellcell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Self::Number(n) => format!("{}", n),
            Self::Empty => String::new(),
        }
    }

    /// Jämförelse för sortering: tomma först, tal numeriskt, text utan
    /// hänsyn till versaler
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Less,
            (_, Self::Empty) => Ordering::Greater,
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (a, b) => a.display().to_lowercase().cmp(&b.display().to_lowercase()),
        }
    }
}

/// Kolumndefinition
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub id: &'static str,
    pub title: &'static str,
    /// Ingår i fritextsökningen
    pub searchable: bool,
}

impl Column {
    pub const fn new(id: &'static str, title: &'static str, searchable: bool) -> Self {
        Self { id, title, searchable }
    }
}

/// En post som kan visas i en tabell
pub trait TableRow {
    fn columns() -> &'static [Column];

    fn cell(&self, column: &str) -> Cell;

    /// Matchar om någon sökbar kolumn innehåller frågan
    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        Self::columns()
            .iter()
            .filter(|c| c.searchable)
            .any(|c| self.cell(c.id).display().to_lowercase().contains(&needle))
    }
}

/// Tillåtna sidstorlekar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub fn value(&self) -> usize {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }

    pub fn from_value(value: usize) -> Option<Self> {
        match value {
            10 => Some(Self::Ten),
            25 => Some(Self::TwentyFive),
            50 => Some(Self::Fifty),
            100 => Some(Self::Hundred),
            _ => None,
        }
    }

    pub fn all() -> &'static [PageSize] {
        &[Self::Ten, Self::TwentyFive, Self::Fifty, Self::Hundred]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// En sida med rader
#[derive(Debug)]
pub struct PageView<'a, T> {
    pub rows: Vec<&'a T>,
    /// Aktuell sida (1-baserad)
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Antal rader efter filtrering
    pub total: usize,
}

impl<'a, T> PageView<'a, T> {
    /// Första och sista visade rad, 1-baserat ("Visar 1 till 10 av 42")
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.rows.len() - 1))
    }
}

/// Tillstånd för en tabell: sökfråga, sortering och sida
#[derive(Debug, Clone)]
pub struct TableState {
    query: String,
    sort: Option<SortState>,
    page: usize,
    page_size: PageSize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl TableState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            query: String::new(),
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Ny sökfråga, går tillbaka till första sidan
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Klick på kolumnrubrik: stigande, fallande, osorterat
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some(s) if s.column == column => match s.direction {
                SortDirection::Ascending => Some(SortState {
                    column: s.column,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortState {
                column: column.to_string(),
                direction: SortDirection::Ascending,
            }),
        };
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Ny sidstorlek, går tillbaka till första sidan
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Byt sida, begränsad till 1..=antal sidor
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.page = page.clamp(1, self.page_count(total));
    }

    pub fn next_page(&mut self, total: usize) {
        self.set_page(self.page + 1, total);
    }

    pub fn prev_page(&mut self, total: usize) {
        self.set_page(self.page.saturating_sub(1), total);
    }

    /// Flytta tillbaka om datan krympt under aktuell sida
    pub fn clamp_page(&mut self, total: usize) {
        self.set_page(self.page, total);
    }

    /// Antal sidor, minst 1 även utan rader
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.value()).max(1)
    }

    /// Filtrera och sortera. Osorterat behåller ursprunglig ordning.
    pub fn apply<'a, T: TableRow>(&self, rows: &'a [T]) -> Vec<&'a T> {
        let mut result: Vec<&T> = rows.iter().filter(|r| r.matches(&self.query)).collect();

        if let Some(sort) = &self.sort {
            // sort_by är stabil, lika värden behåller ordningen
            result.sort_by(|a, b| {
                let ord = a.cell(&sort.column).compare(&b.cell(&sort.column));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        result
    }

    /// Aktuell sida av filtrerade och sorterade rader
    pub fn page_of<'a, T: TableRow>(&self, rows: &'a [T]) -> PageView<'a, T> {
        let filtered = self.apply(rows);
        let total = filtered.len();
        let page_count = self.page_count(total);
        let page = self.page.clamp(1, page_count);
        let size = self.page_size.value();

        let rows = filtered
            .into_iter()
            .skip((page - 1) * size)
            .take(size)
            .collect();

        PageView {
            rows,
            page,
            page_count,
            page_size: size,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        city: String,
        progress: f64,
    }

    const COLUMNS: &[Column] = &[
        Column::new("name", "Namn", true),
        Column::new("city", "Ort", true),
        Column::new("progress", "Framsteg", false),
    ];

    impl TableRow for Row {
        fn columns() -> &'static [Column] {
            COLUMNS
        }

        fn cell(&self, column: &str) -> Cell {
            match column {
                "name" => Cell::text(&self.name),
                "city" => Cell::text(&self.city),
                "progress" => Cell::Number(self.progress),
                _ => Cell::Empty,
            }
        }
    }

    fn row(name: &str, city: &str, progress: f64) -> Row {
        Row {
            name: name.into(),
            city: city.into(),
            progress,
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| row(&format!("Projekt {}", i), "Malmö", i as f64)).collect()
    }

    #[test]
    fn test_search_any_field_case_insensitive() {
        let data = vec![
            row("Lakeshire", "Göteborg", 10.0),
            row("Bergsgatan", "Lund", 20.0),
            row("Hamnen", "LAKE city", 30.0),
        ];
        let mut state = TableState::default();
        state.set_query("lake");

        let names: Vec<&str> = state.apply(&data).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Lakeshire", "Hamnen"]);
    }

    #[test]
    fn test_search_skips_unsearchable_columns() {
        let data = vec![row("A", "B", 42.0)];
        let mut state = TableState::default();
        state.set_query("42");
        assert!(state.apply(&data).is_empty());
    }

    #[test]
    fn test_sort_cycle_returns_to_original_order() {
        let data = vec![row("b", "", 2.0), row("C", "", 3.0), row("a", "", 1.0)];
        let mut state = TableState::default();
        let original: Vec<Row> = state.apply(&data).into_iter().cloned().collect();

        state.toggle_sort("name");
        let asc: Vec<&str> = state.apply(&data).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(asc, vec!["a", "b", "C"]);

        state.toggle_sort("name");
        let desc: Vec<&str> = state.apply(&data).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(desc, vec!["C", "b", "a"]);

        state.toggle_sort("name");
        assert!(state.sort().is_none());
        let back: Vec<Row> = state.apply(&data).into_iter().cloned().collect();
        assert_eq!(back, original);
    }

    #[test]
    fn test_sort_other_column_starts_ascending() {
        let mut state = TableState::default();
        state.toggle_sort("name");
        state.toggle_sort("name");
        state.toggle_sort("progress");

        let sort = state.sort().unwrap();
        assert_eq!(sort.column, "progress");
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_numeric_sort() {
        let data = vec![row("x", "", 10.0), row("y", "", 9.0), row("z", "", 100.0)];
        let mut state = TableState::default();
        state.toggle_sort("progress");
        let order: Vec<f64> = state.apply(&data).iter().map(|r| r.progress).collect();
        assert_eq!(order, vec![9.0, 10.0, 100.0]);
    }

    #[test]
    fn test_page_count() {
        let mut state = TableState::default();
        assert_eq!(state.page_count(0), 1);
        assert_eq!(state.page_count(10), 1);
        assert_eq!(state.page_count(11), 2);

        state.set_page_size(PageSize::TwentyFive);
        assert_eq!(state.page_count(51), 3);
    }

    #[test]
    fn test_first_page_shows_min_of_size_and_total() {
        let state = TableState::default();

        let few = rows(4);
        assert_eq!(state.page_of(&few).rows.len(), 4);

        let many = rows(42);
        let page = state.page_of(&many);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.page_count, 5);
        assert_eq!(page.total, 42);
        assert_eq!(page.range(), Some((1, 10)));
    }

    #[test]
    fn test_last_page_range() {
        let data = rows(42);
        let mut state = TableState::default();
        state.set_page(5, data.len());

        let page = state.page_of(&data);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.range(), Some((41, 42)));
    }

    #[test]
    fn test_query_and_page_size_reset_page() {
        let data = rows(42);
        let mut state = TableState::default();

        state.set_page(3, data.len());
        assert_eq!(state.page(), 3);
        state.set_query("projekt");
        assert_eq!(state.page(), 1);

        state.next_page(data.len());
        assert_eq!(state.page(), 2);
        state.set_page_size(PageSize::Fifty);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_set_page_is_clamped() {
        let mut state = TableState::default();
        state.set_page(99, 25);
        assert_eq!(state.page(), 3);
        state.set_page(0, 25);
        assert_eq!(state.page(), 1);
        state.prev_page(25);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let data: Vec<Row> = Vec::new();
        let state = TableState::default();
        let page = state.page_of(&data);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert!(page.range().is_none());
    }

    #[test]
    fn test_page_size_values() {
        assert_eq!(PageSize::from_value(25), Some(PageSize::TwentyFive));
        assert_eq!(PageSize::from_value(30), None);
        let values: Vec<usize> = PageSize::all().iter().map(|p| p.value()).collect();
        assert_eq!(values, vec![10, 25, 50, 100]);
    }
}
