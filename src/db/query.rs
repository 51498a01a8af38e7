//! SQL query builder for the link feed
//!
//! Turns the feed's text filter, ordering and skip/take window into
//! parameterized SQL. User supplied text only ever reaches SQLite as a bound
//! value; column names come from [`LinkSortField`].

use thiserror::Error;

use super::sqlite_helpers::escape_like;

/// Columns selected for every link row
pub const LINK_COLUMNS: &str = "id, description, url, created_at, posted_by_id";

/// Sort direction for a single ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Convert to SQL order string
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Link columns the feed can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSortField {
    Description,
    Url,
    CreatedAt,
}

impl LinkSortField {
    /// Database column name
    pub fn column(self) -> &'static str {
        match self {
            LinkSortField::Description => "description",
            LinkSortField::Url => "url",
            LinkSortField::CreatedAt => "created_at",
        }
    }
}

/// One ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOrder {
    pub field: LinkSortField,
    pub direction: SortDirection,
}

impl LinkOrder {
    pub fn new(field: LinkSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkQueryError {
    #[error("skip must be a non-negative integer, got {0}")]
    NegativeSkip(i64),

    #[error("each orderBy entry must set at most one field, got {0}")]
    MultipleSortFields(usize),
}

/// Filter, ordering and window for a feed read.
///
/// The same value drives both the page read and the count read; the count
/// ignores the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkQuery {
    filter: Option<String>,
    order: Vec<LinkOrder>,
    skip: i64,
    take: Option<i64>,
}

impl LinkQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match links whose description or url contains `text`.
    ///
    /// An empty string matches everything, same as no filter.
    pub fn filter(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.filter = if text.is_empty() { None } else { Some(text) };
        self
    }

    /// Append an ordering key. Earlier keys take precedence.
    pub fn order_by(mut self, order: LinkOrder) -> Self {
        self.order.push(order);
        self
    }

    pub fn skip(mut self, skip: i64) -> Result<Self, LinkQueryError> {
        if skip < 0 {
            return Err(LinkQueryError::NegativeSkip(skip));
        }
        self.skip = skip;
        Ok(self)
    }

    /// Page size. A negative value pages backwards from the end of the ordering.
    pub fn take(mut self, take: i64) -> Self {
        self.take = Some(take);
        self
    }

    fn where_sql(&self) -> (String, Vec<String>) {
        match &self.filter {
            Some(text) => {
                let pattern = format!("%{}%", escape_like(text));
                (
                    " WHERE (description LIKE ? ESCAPE '\\' OR url LIKE ? ESCAPE '\\')".to_string(),
                    vec![pattern.clone(), pattern],
                )
            }
            None => (String::new(), Vec::new()),
        }
    }

    /// ORDER BY clause; `id` is always the last key so pages are stable.
    fn order_sql(&self, reverse: bool) -> String {
        let direction = |d: SortDirection| if reverse { d.reversed() } else { d };

        let mut keys: Vec<String> = self
            .order
            .iter()
            .map(|o| format!("{} {}", o.field.column(), direction(o.direction).to_sql()))
            .collect();
        keys.push(format!("id {}", direction(SortDirection::Asc).to_sql()));

        format!(" ORDER BY {}", keys.join(", "))
    }

    fn window_sql(limit: Option<i64>, offset: i64) -> String {
        match (limit, offset) {
            (Some(limit), 0) => format!(" LIMIT {}", limit),
            (Some(limit), offset) => format!(" LIMIT {} OFFSET {}", limit, offset),
            // SQLite needs a LIMIT before OFFSET; -1 means unbounded
            (None, 0) => String::new(),
            (None, offset) => format!(" LIMIT -1 OFFSET {}", offset),
        }
    }

    /// Build the page query and its bind values.
    pub fn build_sql(&self) -> (String, Vec<String>) {
        let (where_sql, values) = self.where_sql();

        let sql = match self.take {
            Some(take) if take < 0 => {
                // Walk the reversed ordering, then restore the requested one
                let inner = format!(
                    "SELECT {} FROM links{}{}{}",
                    LINK_COLUMNS,
                    where_sql,
                    self.order_sql(true),
                    Self::window_sql(Some(take.saturating_abs()), self.skip)
                );
                format!(
                    "SELECT {} FROM ({}){}",
                    LINK_COLUMNS,
                    inner,
                    self.order_sql(false)
                )
            }
            take => format!(
                "SELECT {} FROM links{}{}{}",
                LINK_COLUMNS,
                where_sql,
                self.order_sql(false),
                Self::window_sql(take, self.skip)
            ),
        };

        (sql, values)
    }

    /// Build the COUNT query; skip and take do not apply.
    pub fn build_count_sql(&self) -> (String, Vec<String>) {
        let (where_sql, values) = self.where_sql();
        (format!("SELECT COUNT(*) FROM links{}", where_sql), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_query() {
        let (sql, values) = LinkQuery::new().build_sql();
        assert_eq!(
            sql,
            "SELECT id, description, url, created_at, posted_by_id FROM links ORDER BY id ASC"
        );
        assert!(values.is_empty());
    }

    #[test]
    fn test_filter_binds_pattern_twice() {
        let query = LinkQuery::new().filter("foo");
        let (sql, values) = query.build_sql();
        assert!(sql.contains("WHERE (description LIKE ? ESCAPE '\\' OR url LIKE ? ESCAPE '\\')"));
        assert_eq!(values, vec!["%foo%".to_string(), "%foo%".to_string()]);
    }

    #[test]
    fn test_filter_escapes_wildcards() {
        let (_, values) = LinkQuery::new().filter("50%_off").build_count_sql();
        assert_eq!(values[0], "%50\\%\\_off%");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let query = LinkQuery::new().filter("");
        assert_eq!(query, LinkQuery::new());
        assert_eq!(query.build_count_sql().0, "SELECT COUNT(*) FROM links");
    }

    #[test]
    fn test_multi_key_order() {
        let query = LinkQuery::new()
            .order_by(LinkOrder::new(LinkSortField::Url, SortDirection::Desc))
            .order_by(LinkOrder::new(LinkSortField::CreatedAt, SortDirection::Asc));
        let (sql, _) = query.build_sql();
        assert!(sql.ends_with(" ORDER BY url DESC, created_at ASC, id ASC"));
    }

    #[test]
    fn test_skip_and_take() {
        let query = LinkQuery::new().skip(2).unwrap().take(2);
        let (sql, _) = query.build_sql();
        assert!(sql.ends_with(" ORDER BY id ASC LIMIT 2 OFFSET 2"));
    }

    #[test]
    fn test_skip_without_take() {
        let (sql, _) = LinkQuery::new().skip(3).unwrap().build_sql();
        assert!(sql.ends_with(" LIMIT -1 OFFSET 3"));
    }

    #[test]
    fn test_negative_skip_rejected() {
        assert_matches!(LinkQuery::new().skip(-1), Err(LinkQueryError::NegativeSkip(-1)));
    }

    #[test]
    fn test_negative_take_reverses_then_restores() {
        let query = LinkQuery::new()
            .order_by(LinkOrder::new(LinkSortField::CreatedAt, SortDirection::Asc))
            .take(-2);
        let (sql, _) = query.build_sql();
        assert_eq!(
            sql,
            "SELECT id, description, url, created_at, posted_by_id FROM (\
             SELECT id, description, url, created_at, posted_by_id FROM links \
             ORDER BY created_at DESC, id DESC LIMIT 2) \
             ORDER BY created_at ASC, id ASC"
        );
    }

    #[test]
    fn test_count_ignores_window() {
        let query = LinkQuery::new().filter("x").skip(10).unwrap().take(5);
        let (sql, values) = query.build_count_sql();
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
        assert_eq!(values.len(), 2);
    }
}
