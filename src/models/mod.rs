pub mod images;
pub mod operations;
pub mod projects;

/// Key of a lookup request. Ids outside the positive `i32` range match no row.
pub fn row_id(id: i64) -> Option<i32> {
    i32::try_from(id).ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_id_range() {
        assert_eq!(row_id(7), Some(7));
        assert_eq!(row_id(0), None);
        assert_eq!(row_id(-3), None);
        assert_eq!(row_id(99_999_999_999), None);
        assert_eq!(row_id(i64::from(i32::MAX)), Some(i32::MAX));
    }
}
