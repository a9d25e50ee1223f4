//! Employee list parameters, sort parsing and paged results

/// Largest page a caller may request unless configured otherwise
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 50;

/// Query parameters accepted by the employee list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeParameters {
    pub page_number: u64,
    pub page_size: u64,
    pub min_age: i32,
    pub max_age: i32,
    pub search_term: Option<String>,
    pub order_by: Option<String>,
    pub fields: Option<String>,
}

impl Default for EmployeeParameters {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
            min_age: 0,
            max_age: i32::MAX,
            search_term: None,
            order_by: Some("name".to_string()),
            fields: None,
        }
    }
}

impl EmployeeParameters {
    /// Clamp page number and size into the accepted range.
    ///
    /// The page number is capped so the row offset stays within `i64`.
    pub fn normalized(mut self, max_page_size: u64) -> Self {
        self.page_size = self.page_size.clamp(1, max_page_size.max(1));
        let last_addressable = i64::MAX.unsigned_abs() / self.page_size + 1;
        self.page_number = self.page_number.clamp(1, last_addressable);
        self
    }

    /// `max_age` must be strictly greater than `min_age`
    pub fn valid_age_range(&self) -> bool {
        self.max_age > self.min_age
    }

    /// Trimmed, lower-cased search term; blank terms are ignored
    pub fn search(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    pub fn sort_keys(&self) -> Vec<SortKey> {
        parse_order_by(self.order_by.as_deref())
    }
}

/// Employee property that the list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Age,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// Parse `"name desc, age"` into sort keys.
///
/// Unknown properties are skipped; when nothing usable remains the list is
/// ordered by name ascending.
pub fn parse_order_by(order_by: Option<&str>) -> Vec<SortKey> {
    let keys: Vec<SortKey> = order_by
        .unwrap_or_default()
        .split(',')
        .filter_map(|clause| {
            let mut parts = clause.split_whitespace();
            let field = match parts.next()?.to_ascii_lowercase().as_str() {
                "name" => SortField::Name,
                "age" => SortField::Age,
                "position" => SortField::Position,
                _ => return None,
            };
            let descending = parts
                .next()
                .is_some_and(|dir| dir.eq_ignore_ascii_case("desc"));
            Some(SortKey { field, descending })
        })
        .collect();

    if keys.is_empty() {
        vec![SortKey {
            field: SortField::Name,
            descending: false,
        }]
    } else {
        keys
    }
}

/// Pagination metadata emitted in the `X-Pagination` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetadata {
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub total_count: u64,
}

impl PageMetadata {
    pub fn new(total_count: u64, page_number: u64, page_size: u64) -> Self {
        let page_size = page_size.max(1);
        Self {
            current_page: page_number,
            total_pages: total_count.div_ceil(page_size),
            page_size,
            total_count,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One page of items plus the metadata describing the whole result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub meta: PageMetadata,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_number: u64, page_size: u64) -> Self {
        Self {
            items,
            meta: PageMetadata::new(total_count, page_number, page_size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
