//! Sort descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Asc),
            "desc" | "descending" => Ok(Direction::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// One column of a sort order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub column_id: String,
    pub direction: Direction,
}

impl SortKey {
    pub fn new(column_id: impl Into<String>, direction: Direction) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, Direction::Asc)
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, Direction::Desc)
    }
}

/// Parses `column` or `column:asc` / `column:desc`.
impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.rsplit_once(':') {
            Some((column, direction)) => (column, direction.parse()?),
            None => (s, Direction::Asc),
        };
        if column.is_empty() {
            return Err(format!("missing column in sort '{s}'"));
        }
        Ok(Self::new(column, direction))
    }
}

/// Ordered list of sort keys, primary first.
///
/// Sort changes are always emitted as the whole list.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::{Direction, Sorting};
///
/// let mut sorting = Sorting::desc("createdAt").then_asc("name");
/// assert_eq!(sorting.direction_of("name"), Some(Direction::Asc));
///
/// // clicking a header cycles asc -> desc -> unsorted
/// sorting.toggle("email");
/// assert_eq!(sorting.keys().len(), 1);
/// assert_eq!(sorting.direction_of("email"), Some(Direction::Asc));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sorting {
    keys: Vec<SortKey>,
}

impl Sorting {
    /// No sorting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ascending on a single column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            keys: vec![SortKey::asc(column_id)],
        }
    }

    /// Descending on a single column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            keys: vec![SortKey::desc(column_id)],
        }
    }

    /// Adds a secondary ascending key.
    pub fn then_asc(mut self, column_id: impl Into<String>) -> Self {
        self.push(SortKey::asc(column_id));
        self
    }

    /// Adds a secondary descending key.
    pub fn then_desc(mut self, column_id: impl Into<String>) -> Self {
        self.push(SortKey::desc(column_id));
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Current direction of `column_id`, if it is sorted.
    pub fn direction_of(&self, column_id: &str) -> Option<Direction> {
        self.keys
            .iter()
            .find(|key| key.column_id == column_id)
            .map(|key| key.direction)
    }

    /// Replaces the sort with a single key.
    pub fn set(&mut self, column_id: impl Into<String>, direction: Direction) {
        self.keys = vec![SortKey::new(column_id, direction)];
    }

    /// Header click: makes `column_id` the only sort key and advances it
    /// through ascending, descending and unsorted.
    pub fn toggle(&mut self, column_id: &str) {
        match self.direction_of(column_id) {
            None => self.set(column_id, Direction::Asc),
            Some(Direction::Asc) => self.set(column_id, Direction::Desc),
            Some(Direction::Desc) => self.keys.clear(),
        }
    }

    /// Shift-click: cycles `column_id` in place and keeps other keys.
    pub fn toggle_multi(&mut self, column_id: &str) {
        match self.keys.iter().position(|key| key.column_id == column_id) {
            None => self.keys.push(SortKey::asc(column_id)),
            Some(index) => match self.keys[index].direction {
                Direction::Asc => self.keys[index].direction = Direction::Desc,
                Direction::Desc => {
                    self.keys.remove(index);
                }
            },
        }
    }

    /// Drops `column_id` from the sort.
    pub fn remove(&mut self, column_id: &str) {
        self.keys.retain(|key| key.column_id != column_id);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Appends a key, replacing an existing key for the same column.
    fn push(&mut self, key: SortKey) {
        self.remove(&key.column_id);
        self.keys.push(key);
    }
}

impl FromIterator<SortKey> for Sorting {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        let mut sorting = Sorting::new();
        for key in iter {
            sorting.push(key);
        }
        sorting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycle() {
        let mut sorting = Sorting::new();
        sorting.toggle("name");
        assert_eq!(sorting.keys(), &[SortKey::asc("name")]);
        sorting.toggle("name");
        assert_eq!(sorting.keys(), &[SortKey::desc("name")]);
        sorting.toggle("name");
        assert!(sorting.is_empty());
    }

    #[test]
    fn test_toggle_replaces_other_columns() {
        let mut sorting = Sorting::desc("createdAt").then_asc("name");
        sorting.toggle("email");
        assert_eq!(sorting.keys(), &[SortKey::asc("email")]);
    }

    #[test]
    fn test_toggle_multi_keeps_order() {
        let mut sorting = Sorting::asc("status");
        sorting.toggle_multi("name");
        sorting.toggle_multi("status");
        assert_eq!(
            sorting.keys(),
            &[SortKey::desc("status"), SortKey::asc("name")]
        );
        sorting.toggle_multi("status");
        assert_eq!(sorting.keys(), &[SortKey::asc("name")]);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::asc("name"));
        assert_eq!(
            "createdAt:desc".parse::<SortKey>().unwrap(),
            SortKey::desc("createdAt")
        );
        assert!("name:sideways".parse::<SortKey>().is_err());
        assert!(":desc".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_serializes_as_list() {
        let sorting = Sorting::desc("createdAt").then_asc("name");
        let json = serde_json::to_string(&sorting).unwrap();
        assert_eq!(
            json,
            r#"[{"columnId":"createdAt","direction":"desc"},{"columnId":"name","direction":"asc"}]"#
        );
    }
}
