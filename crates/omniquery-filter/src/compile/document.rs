//! Document-store compiler: nested predicate objects.

use omniquery_schema::literal::is_object_id;
use omniquery_schema::ColumnMetadata;
use serde_json::{json, Map, Value as Json};

use super::{column_class, operands, Logic, Operands, SkipReason, SkippedFilter};
use crate::condition::FilterCondition;
use crate::operator::Operator;
use crate::value::Scalar;

/// A compiled document-store predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPredicate {
    pub query: Json,
    pub skipped: Vec<SkippedFilter>,
}

impl Default for DocumentPredicate {
    fn default() -> Self {
        DocumentPredicate {
            query: Json::Object(Map::new()),
            skipped: Vec::new(),
        }
    }
}

impl DocumentPredicate {
    /// Returns `true` if the predicate matches every document.
    pub fn is_empty(&self) -> bool {
        self.query.as_object().is_some_and(Map::is_empty)
    }

    /// Wraps the predicate as an aggregation pipeline `$match` stage.
    pub fn match_stage(&self) -> Json {
        json!({ "$match": self.query })
    }
}

/// Compiles filters into a document-store query object.
///
/// One term is returned as is; several are wrapped under `$and` / `$or`.
/// Text operators become case-insensitive `$regex` matches on the escaped
/// operand, anchored for `starts_with` and `ends_with`.
///
/// # Example
///
/// ```
/// use omniquery_filter::{DocumentCompiler, FilterCondition, Logic, Operator};
/// use serde_json::json;
///
/// let filters = vec![FilterCondition::new("1", "age", Operator::GreaterThan, 30i64)];
/// let predicate = DocumentCompiler::new().compile(&filters, Logic::And);
/// assert_eq!(predicate.query, json!({"age": {"$gt": 30}}));
/// assert_eq!(predicate.match_stage(), json!({"$match": {"age": {"$gt": 30}}}));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCompiler<'a> {
    columns: Option<&'a [ColumnMetadata]>,
}

impl<'a> DocumentCompiler<'a> {
    pub fn new() -> Self {
        DocumentCompiler { columns: None }
    }

    /// Supplies column metadata for type checks and operand coercion.
    pub fn with_columns(mut self, columns: Option<&'a [ColumnMetadata]>) -> Self {
        self.columns = columns;
        self
    }

    /// Compiles the filters. Empty input yields `{}`.
    pub fn compile(&self, filters: &[FilterCondition], logic: Logic) -> DocumentPredicate {
        let mut skipped = Vec::new();
        let mut terms = Vec::new();

        for filter in filters {
            match self.compile_term(filter) {
                Ok(term) => terms.push(term),
                Err(reason) => skipped.push(SkippedFilter::new(filter, reason)),
            }
        }

        let query = match terms.len() {
            0 => Json::Object(Map::new()),
            1 => terms.remove(0),
            _ => {
                let key = match logic {
                    Logic::And => "$and",
                    Logic::Or => "$or",
                };
                json!({ key: terms })
            }
        };
        DocumentPredicate { query, skipped }
    }

    fn compile_term(&self, filter: &FilterCondition) -> Result<Json, SkipReason> {
        let class = column_class(filter, self.columns)?;
        let operands = operands(filter, class)?;
        let field = filter.column_name.as_str();
        let value = |scalar: &Scalar| field_value(field, scalar);

        let condition = match (filter.operator, operands) {
            (Operator::IsNull, _) => Json::Null,
            (Operator::IsNotNull, _) => json!({ "$ne": null }),
            (Operator::Between, Operands::Two(low, high)) => {
                json!({ "$gte": value(&low), "$lte": value(&high) })
            }
            (Operator::In, Operands::Many(items)) => {
                json!({ "$in": items.iter().map(value).collect::<Vec<_>>() })
            }
            (Operator::NotContains, Operands::One(text)) => {
                json!({ "$not": text_regex(Operator::Contains, &text) })
            }
            (op, Operands::One(text)) if op.is_text_match() => text_regex(op, &text),
            (Operator::Equals, Operands::One(v)) => value(&v),
            (op, Operands::One(v)) => {
                let key = comparison_key(op).ok_or(SkipReason::InvalidValue)?;
                json!({ key: value(&v) })
            }
            _ => return Err(SkipReason::InvalidValue),
        };

        let mut term = Map::new();
        term.insert(field.to_string(), condition);
        Ok(Json::Object(term))
    }
}

fn comparison_key(op: Operator) -> Option<&'static str> {
    match op {
        Operator::NotEquals => Some("$ne"),
        Operator::GreaterThan => Some("$gt"),
        Operator::LessThan => Some("$lt"),
        Operator::GreaterThanOrEqual => Some("$gte"),
        Operator::LessThanOrEqual => Some("$lte"),
        _ => None,
    }
}

fn text_regex(op: Operator, text: &Scalar) -> Json {
    let escaped = regex::escape(&text.to_text());
    let pattern = match op {
        Operator::StartsWith => format!("^{}", escaped),
        Operator::EndsWith => format!("{}$", escaped),
        _ => escaped,
    };
    json!({ "$regex": pattern, "$options": "i" })
}

/// `_id` operands that look like object ids are sent as `{"$oid": ..}`.
fn field_value(field: &str, scalar: &Scalar) -> Json {
    match scalar {
        Scalar::String(s) if field == "_id" && is_object_id(s) => json!({ "$oid": s }),
        other => other.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(filters: &[FilterCondition], logic: Logic) -> DocumentPredicate {
        DocumentCompiler::new().compile(filters, logic)
    }

    #[test]
    fn empty_input_matches_everything() {
        let predicate = compile(&[], Logic::And);
        assert_eq!(predicate.query, json!({}));
        assert!(predicate.is_empty());
        assert_eq!(predicate.match_stage(), json!({"$match": {}}));
    }

    #[test]
    fn single_term_is_unwrapped() {
        let filters = vec![FilterCondition::new("1", "status", Operator::Equals, "active")];
        assert_eq!(compile(&filters, Logic::Or).query, json!({"status": "active"}));
    }

    #[test]
    fn several_terms_are_wrapped() {
        let filters = vec![
            FilterCondition::new("1", "age", Operator::GreaterThanOrEqual, 18i64),
            FilterCondition::new("2", "age", Operator::LessThan, 65i64),
        ];
        assert_eq!(
            compile(&filters, Logic::And).query,
            json!({"$and": [{"age": {"$gte": 18}}, {"age": {"$lt": 65}}]})
        );
        assert_eq!(
            compile(&filters, Logic::Or).query,
            json!({"$or": [{"age": {"$gte": 18}}, {"age": {"$lt": 65}}]})
        );
    }

    #[test]
    fn text_operators_use_anchored_case_insensitive_regex() {
        let cases = [
            (Operator::Contains, json!({"name": {"$regex": "a\\.b", "$options": "i"}})),
            (Operator::StartsWith, json!({"name": {"$regex": "^a\\.b", "$options": "i"}})),
            (Operator::EndsWith, json!({"name": {"$regex": "a\\.b$", "$options": "i"}})),
            (
                Operator::NotContains,
                json!({"name": {"$not": {"$regex": "a\\.b", "$options": "i"}}}),
            ),
        ];
        for (op, expected) in cases {
            let filters = vec![FilterCondition::new("1", "name", op, "a.b")];
            assert_eq!(compile(&filters, Logic::And).query, expected, "{}", op);
        }
    }

    #[test]
    fn range_list_and_null_operators() {
        let filters = vec![FilterCondition::between("1", "score", 1i64, 5i64)];
        assert_eq!(
            compile(&filters, Logic::And).query,
            json!({"score": {"$gte": 1, "$lte": 5}})
        );

        let filters = vec![FilterCondition::in_list("1", "tag", ["a", "b"])];
        assert_eq!(
            compile(&filters, Logic::And).query,
            json!({"tag": {"$in": ["a", "b"]}})
        );

        let filters = vec![
            FilterCondition::null_check("1", "x", Operator::IsNull),
            FilterCondition::null_check("2", "y", Operator::IsNotNull),
        ];
        assert_eq!(
            compile(&filters, Logic::And).query,
            json!({"$and": [{"x": null}, {"y": {"$ne": null}}]})
        );
    }

    #[test]
    fn object_ids_are_wrapped_on_id_field() {
        let oid = "507f1f77bcf86cd799439011";
        let filters = vec![FilterCondition::new("1", "_id", Operator::Equals, oid)];
        assert_eq!(
            compile(&filters, Logic::And).query,
            json!({"_id": {"$oid": oid}})
        );

        let filters = vec![FilterCondition::in_list("1", "_id", [oid, "custom-key"])];
        assert_eq!(
            compile(&filters, Logic::And).query,
            json!({"_id": {"$in": [{"$oid": oid}, "custom-key"]}})
        );

        let filters = vec![FilterCondition::new("1", "ref", Operator::Equals, oid)];
        assert_eq!(compile(&filters, Logic::And).query, json!({"ref": oid}));
    }

    #[test]
    fn numeric_strings_are_coerced_with_metadata() {
        let columns = vec![ColumnMetadata::new("qty", "int32")];
        let filters = vec![FilterCondition::new("1", "qty", Operator::Equals, "7")];
        let predicate = DocumentCompiler::new()
            .with_columns(Some(&columns))
            .compile(&filters, Logic::And);
        assert_eq!(predicate.query, json!({"qty": 7}));
    }

    #[test]
    fn inapplicable_operator_is_skipped() {
        let columns = vec![ColumnMetadata::new("active", "boolean")];
        let filters = vec![FilterCondition::new("1", "active", Operator::GreaterThan, "1")];
        let predicate = DocumentCompiler::new()
            .with_columns(Some(&columns))
            .compile(&filters, Logic::And);
        assert!(predicate.is_empty());
        assert_eq!(predicate.skipped.len(), 1);
    }
}
