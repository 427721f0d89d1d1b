//! Named validators per entity. Each returns every violation it finds; the
//! caller gets the full set at once rather than the first failure.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::price::Price;
use crate::domain::status::{ItemStatus, OrderStatus};

/// The rule a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    Inclusion,
    GreaterThanZero,
    Unique,
    MinimumCardinality,
}

impl Rule {
    fn message(&self) -> &'static str {
        match self {
            Rule::Required => "is required",
            Rule::Inclusion => "is not an allowed value",
            Rule::GreaterThanZero => "must be greater than zero",
            Rule::Unique => "is already taken",
            Rule::MinimumCardinality => "must have at least one",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    pub field: &'static str,
    pub rule: Rule,
}

impl Violation {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Violation { field, rule }
    }
}

/// One or more field-level violations, collected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for v in &self.violations {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", v.field, v.rule.message())?;
            first = false;
        }
        Ok(())
    }
}

impl ValidationError {
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.violations.iter().any(|v| v.field == field && v.rule == rule)
    }
}

fn finish(violations: Vec<Violation>) -> Result<(), ValidationError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    match value {
        None => true,
        Some(s) => s.trim().is_empty(),
    }
}

/// Candidate item attributes before any record exists. `Option` fields keep
/// "absent" distinct from "blank"; both fail the required rule.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub status: Option<String>,
    pub category_ids: Vec<Uuid>,
}

/// `title_taken` is resolved by the caller against the repository with a
/// case-preserving exact match.
pub fn validate_item(draft: &ItemDraft, title_taken: bool) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if is_blank(&draft.title) {
        violations.push(Violation::new("title", Rule::Required));
    } else if title_taken {
        violations.push(Violation::new("title", Rule::Unique));
    }

    if is_blank(&draft.description) {
        violations.push(Violation::new("description", Rule::Required));
    }

    match draft.price {
        None => violations.push(Violation::new("price", Rule::Required)),
        Some(p) if !Price::from_cents(p).is_positive() => {
            violations.push(Violation::new("price", Rule::GreaterThanZero))
        }
        Some(_) => {}
    }

    match draft.status.as_deref() {
        None => violations.push(Violation::new("status", Rule::Required)),
        Some(s) if ItemStatus::parse(s).is_none() => {
            violations.push(Violation::new("status", Rule::Inclusion))
        }
        Some(_) => {}
    }

    if draft.category_ids.is_empty() {
        violations.push(Violation::new("categories", Rule::MinimumCardinality));
    }

    finish(violations)
}

#[derive(Debug, Clone, Default)]
pub struct CategoryDraft {
    pub name: Option<String>,
}

pub fn validate_category(draft: &CategoryDraft, name_taken: bool) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if is_blank(&draft.name) {
        violations.push(Violation::new("name", Rule::Required));
    } else if name_taken {
        violations.push(Violation::new("name", Rule::Unique));
    }

    finish(violations)
}

/// Order state checked at checkout, after line rows are known.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
    pub total_price: Option<i64>,
    pub item_count: usize,
}

pub fn validate_order(draft: &OrderDraft) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if draft.user_id.is_none() {
        violations.push(Violation::new("user", Rule::Required));
    }

    match draft.status.as_deref() {
        None => violations.push(Violation::new("status", Rule::Required)),
        Some(s) if OrderStatus::parse(s).is_none() => {
            violations.push(Violation::new("status", Rule::Inclusion))
        }
        Some(_) => {}
    }

    if draft.total_price.is_none() {
        violations.push(Violation::new("total_price", Rule::Required));
    }

    if draft.item_count < 1 {
        violations.push(Violation::new("items", Rule::MinimumCardinality));
    }

    finish(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_item() -> ItemDraft {
        ItemDraft {
            title: Some("food".into()),
            description: Some("good".into()),
            price: Some(500),
            status: Some("active".into()),
            category_ids: vec![Uuid::new_v4()],
        }
    }

    #[test]
    fn valid_item_passes() {
        assert!(validate_item(&valid_item(), false).is_ok());
    }

    #[test]
    fn absent_and_blank_title_both_fail_required() {
        for title in [None, Some(String::new()), Some("   ".into())] {
            let draft = ItemDraft { title, ..valid_item() };
            let err = validate_item(&draft, false).unwrap_err();
            assert!(err.has("title", Rule::Required));
        }
    }

    #[test]
    fn duplicate_title_fails_uniqueness() {
        let err = validate_item(&valid_item(), true).unwrap_err();
        assert!(err.has("title", Rule::Unique));
        assert_eq!(err.violations.len(), 1);
    }

    #[test]
    fn blank_description_fails() {
        let draft = ItemDraft { description: Some("".into()), ..valid_item() };
        let err = validate_item(&draft, false).unwrap_err();
        assert!(err.has("description", Rule::Required));
    }

    #[test]
    fn price_must_be_present_and_positive() {
        let absent = ItemDraft { price: None, ..valid_item() };
        assert!(validate_item(&absent, false).unwrap_err().has("price", Rule::Required));

        for cents in [0, -100] {
            let draft = ItemDraft { price: Some(cents), ..valid_item() };
            let err = validate_item(&draft, false).unwrap_err();
            assert!(err.has("price", Rule::GreaterThanZero));
        }
    }

    #[test]
    fn status_must_be_in_the_enum() {
        let absent = ItemDraft { status: None, ..valid_item() };
        assert!(validate_item(&absent, false).unwrap_err().has("status", Rule::Required));

        let unknown = ItemDraft { status: Some("retired".into()), ..valid_item() };
        assert!(validate_item(&unknown, false).unwrap_err().has("status", Rule::Inclusion));
    }

    #[test]
    fn item_requires_at_least_one_category() {
        let draft = ItemDraft { category_ids: vec![], ..valid_item() };
        let err = validate_item(&draft, false).unwrap_err();
        assert!(err.has("categories", Rule::MinimumCardinality));
    }

    #[test]
    fn all_item_violations_are_collected_together() {
        let err = validate_item(&ItemDraft::default(), false).unwrap_err();
        assert!(err.has("title", Rule::Required));
        assert!(err.has("description", Rule::Required));
        assert!(err.has("price", Rule::Required));
        assert!(err.has("status", Rule::Required));
        assert!(err.has("categories", Rule::MinimumCardinality));
        assert_eq!(err.violations.len(), 5);
    }

    #[test]
    fn category_name_rules() {
        let blank = CategoryDraft { name: Some(" ".into()) };
        assert!(validate_category(&blank, false).unwrap_err().has("name", Rule::Required));

        let taken = CategoryDraft { name: Some("food".into()) };
        assert!(validate_category(&taken, true).unwrap_err().has("name", Rule::Unique));

        assert!(validate_category(&CategoryDraft { name: Some("food".into()) }, false).is_ok());
    }

    #[test]
    fn order_with_zero_items_is_invalid_regardless_of_other_fields() {
        let draft = OrderDraft {
            user_id: Some(Uuid::new_v4()),
            status: Some("ordered".into()),
            total_price: Some(1600),
            item_count: 0,
        };
        let err = validate_order(&draft).unwrap_err();
        assert_eq!(err.violations, vec![Violation::new("items", Rule::MinimumCardinality)]);
    }

    #[test]
    fn order_field_rules_collect() {
        let draft = OrderDraft {
            user_id: None,
            status: Some("shipped".into()),
            total_price: None,
            item_count: 1,
        };
        let err = validate_order(&draft).unwrap_err();
        assert!(err.has("user", Rule::Required));
        assert!(err.has("status", Rule::Inclusion));
        assert!(err.has("total_price", Rule::Required));
        assert_eq!(err.violations.len(), 3);
    }

    #[test]
    fn valid_order_passes() {
        let draft = OrderDraft {
            user_id: Some(Uuid::new_v4()),
            status: Some("ordered".into()),
            total_price: Some(1600),
            item_count: 2,
        };
        assert!(validate_order(&draft).is_ok());
    }
}
