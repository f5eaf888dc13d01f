use crate::schema::Schema;

/// Map a column's declared cast to a schema primitive.
///
/// Date columns are always `string`/`date-time`, whatever they are cast to.
/// Unknown casts and uncast columns fall back to `string`.
pub fn map_column_type(cast: Option<&str>, is_date_column: bool) -> Schema {
    if is_date_column {
        return Schema::string().with_format("date-time");
    }

    match cast.unwrap_or("string") {
        "float" => Schema::typed("number").with_format("float"),
        "int" => Schema::typed("integer"),
        "boolean" => Schema::typed("boolean"),
        _ => Schema::string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_cast() {
        let schema = map_column_type(Some("float"), false);
        assert_eq!(schema.schema_type.as_deref(), Some("number"));
        assert_eq!(schema.format.as_deref(), Some("float"));
    }

    #[test]
    fn test_int_and_boolean_casts() {
        assert_eq!(map_column_type(Some("int"), false), Schema::typed("integer"));
        assert_eq!(map_column_type(Some("boolean"), false), Schema::typed("boolean"));
    }

    #[test]
    fn test_unknown_and_missing_casts_default_to_string() {
        assert_eq!(map_column_type(Some("array"), false), Schema::string());
        assert_eq!(map_column_type(Some("integer"), false), Schema::string());
        assert_eq!(map_column_type(None, false), Schema::string());
    }

    #[test]
    fn test_date_column_wins_over_cast() {
        for cast in [Some("int"), Some("float"), Some("boolean"), None] {
            let schema = map_column_type(cast, true);
            assert_eq!(schema.schema_type.as_deref(), Some("string"));
            assert_eq!(schema.format.as_deref(), Some("date-time"));
        }
    }
}
