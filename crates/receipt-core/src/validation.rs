//! # Validation Module
//!
//! Declarative schema validation for receipts.
//!
//! ## Rules as Data
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Tables                                      │
//! │                                                                         │
//! │  Receipt                                                                │
//! │  ├── retailer      pattern  ^[\w\s\-&]+$                               │
//! │  ├── purchaseDate  pattern  ^\d{4}-\d{2}-\d{2}$                        │
//! │  ├── purchaseTime  pattern  ^\d{2}:\d{2}$                              │
//! │  ├── items         min_count 1 ──► recurse into each Item              │
//! │  └── total         pattern  ^\d+\.\d{2}$                               │
//! │                                                                         │
//! │  Item                                                                   │
//! │  ├── shortDescription  pattern  ^[\w\s\-]+$                            │
//! │  └── price             pattern  ^\d+\.\d{2}$                           │
//! │                                                                         │
//! │  validate(record)                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for rule in T::rules()  (declared order, stop at first failure)       │
//! │       ├── Pattern  + Text     → regex must match the whole value       │
//! │       ├── MinCount + Records  → len >= n, then validate each element   │
//! │       └── anything else       → RuleMismatch                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A new field or rule is one more `FieldRule` entry in a table. The
//! evaluator never changes.
//!
//! Patterns are compiled with Unicode classes disabled, so `\w`, `\s` and
//! `\d` are ASCII only. A total written with non-ASCII digits never reaches
//! the calculator.
//!
//! ## Usage
//! ```rust
//! use receipt_core::validation::validate;
//! use receipt_core::{Item, Receipt};
//!
//! let receipt = Receipt::new("Target", "2022-01-02", "13:13", "1.25",
//!     vec![Item::new("Pepsi - 12-oz", "1.25")]);
//! assert!(validate(&receipt).is_ok());
//!
//! let empty = Receipt::new("Target", "2022-01-02", "13:13", "1.25", vec![]);
//! assert!(validate(&empty).is_err());
//! ```

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{Item, Receipt};
use crate::MIN_RECEIPT_ITEMS;

// =============================================================================
// Patterns
// =============================================================================

/// Word characters, whitespace, hyphen, ampersand.
pub const RETAILER_PATTERN: &str = r"^[\w\s\-&]+$";

/// Word characters, whitespace, hyphen.
pub const DESCRIPTION_PATTERN: &str = r"^[\w\s\-]+$";

/// `YYYY-MM-DD` shape. Calendar validity is not checked.
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// `HH:MM` shape. Clock validity is not checked.
pub const TIME_PATTERN: &str = r"^\d{2}:\d{2}$";

/// Non-negative fixed-point amount with exactly two decimals.
pub const AMOUNT_PATTERN: &str = r"^\d+\.\d{2}$";

// =============================================================================
// Rule Descriptors
// =============================================================================

/// The value of one field, as seen by the evaluator.
pub enum Field<'a> {
    /// A string field.
    Text(&'a str),
    /// A sequence of records that carry their own schema.
    Records(Vec<&'a dyn Validate>),
}

impl<'a> Field<'a> {
    /// Wraps a slice of schema-bearing records.
    pub fn records<S: Schema>(records: &'a [S]) -> Self {
        Field::Records(records.iter().map(|r| r as &dyn Validate).collect())
    }
}

/// A rule kind and its parameter.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The whole text value must match.
    Pattern(Regex),
    /// The sequence must hold at least this many elements.
    MinCount(usize),
}

impl Rule {
    fn kind(&self) -> &'static str {
        match self {
            Rule::Pattern(_) => "pattern",
            Rule::MinCount(_) => "min_count",
        }
    }
}

/// One `(field, accessor, rule)` entry of a schema table.
pub struct FieldRule<T> {
    name: &'static str,
    get: for<'a> fn(&'a T) -> Field<'a>,
    rule: Rule,
}

impl<T> FieldRule<T> {
    /// Declares a pattern rule.
    ///
    /// ## Panics
    /// If `pattern` is not a valid ASCII-mode regex. Tables are built from
    /// the constants in this module, so this is a programming error caught
    /// by the first validation in any test.
    pub fn pattern(
        name: &'static str,
        get: for<'a> fn(&'a T) -> Field<'a>,
        pattern: &str,
    ) -> Self {
        let regex = RegexBuilder::new(pattern)
            .unicode(false)
            .build()
            .unwrap_or_else(|e| panic!("schema pattern for {name} does not compile: {e}"));

        FieldRule {
            name,
            get,
            rule: Rule::Pattern(regex),
        }
    }

    /// Declares a minimum element count rule. Elements are validated
    /// recursively after the count passes.
    pub fn min_count(name: &'static str, get: for<'a> fn(&'a T) -> Field<'a>, min: usize) -> Self {
        FieldRule {
            name,
            get,
            rule: Rule::MinCount(min),
        }
    }

    /// Field name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, record: &T) -> ValidationResult<()> {
        match (&self.rule, (self.get)(record)) {
            (Rule::Pattern(regex), Field::Text(value)) => {
                if regex.is_match(value) {
                    Ok(())
                } else {
                    Err(ValidationError::PatternMismatch {
                        field: self.name.to_string(),
                        pattern: regex.as_str().to_string(),
                    })
                }
            }
            (Rule::MinCount(min), Field::Records(elements)) => {
                if elements.len() < *min {
                    return Err(ValidationError::TooFew {
                        field: self.name.to_string(),
                        min: *min,
                        actual: elements.len(),
                    });
                }

                for (index, element) in elements.iter().enumerate() {
                    element.validate().map_err(|e| ValidationError::Element {
                        field: self.name.to_string(),
                        index,
                        source: Box::new(e),
                    })?;
                }
                Ok(())
            }
            (rule, _) => Err(ValidationError::RuleMismatch {
                field: self.name.to_string(),
                rule: rule.kind(),
            }),
        }
    }
}

// =============================================================================
// Schema Traits
// =============================================================================

/// A record type with a static rule table.
pub trait Schema: Sized + 'static {
    /// Rules in evaluation order.
    fn rules() -> &'static [FieldRule<Self>];
}

/// Object-safe view of [`Schema`], used for recursion into sequences.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

impl<T: Schema> Validate for T {
    fn validate(&self) -> ValidationResult<()> {
        validate(self)
    }
}

/// Runs every rule of `T`'s table against `record`, stopping at the first
/// failure.
pub fn validate<T: Schema>(record: &T) -> ValidationResult<()> {
    T::rules().iter().try_for_each(|rule| rule.check(record))
}

// =============================================================================
// Schema Tables
// =============================================================================

static RECEIPT_RULES: LazyLock<Vec<FieldRule<Receipt>>> = LazyLock::new(|| {
    vec![
        FieldRule::pattern("retailer", |r: &Receipt| Field::Text(&r.retailer), RETAILER_PATTERN),
        FieldRule::pattern("purchaseDate", |r: &Receipt| Field::Text(&r.purchase_date), DATE_PATTERN),
        FieldRule::pattern("purchaseTime", |r: &Receipt| Field::Text(&r.purchase_time), TIME_PATTERN),
        FieldRule::min_count("items", |r: &Receipt| Field::records(&r.items), MIN_RECEIPT_ITEMS),
        FieldRule::pattern("total", |r: &Receipt| Field::Text(&r.total), AMOUNT_PATTERN),
    ]
});

static ITEM_RULES: LazyLock<Vec<FieldRule<Item>>> = LazyLock::new(|| {
    vec![
        FieldRule::pattern(
            "shortDescription",
            |i: &Item| Field::Text(&i.short_description),
            DESCRIPTION_PATTERN,
        ),
        FieldRule::pattern("price", |i: &Item| Field::Text(&i.price), AMOUNT_PATTERN),
    ]
});

impl Schema for Receipt {
    fn rules() -> &'static [FieldRule<Self>] {
        &RECEIPT_RULES
    }
}

impl Schema for Item {
    fn rules() -> &'static [FieldRule<Self>] {
        &ITEM_RULES
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_receipt() -> Receipt {
        Receipt::new(
            "M&M Corner Market",
            "2022-03-20",
            "14:33",
            "9.00",
            vec![
                Item::new("Gatorade", "2.25"),
                Item::new("Gatorade", "2.25"),
                Item::new("Gatorade", "2.25"),
                Item::new("Gatorade", "2.25"),
            ],
        )
    }

    fn failing_field(receipt: &Receipt) -> String {
        validate(receipt).unwrap_err().field().to_string()
    }

    #[test]
    fn test_valid_receipts_pass() {
        assert!(validate(&valid_receipt()).is_ok());

        let receipt = Receipt::new(
            "Target",
            "2022-01-01",
            "13:01",
            "35.35",
            vec![
                Item::new("Mountain Dew 12PK", "6.49"),
                Item::new("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
            ],
        );
        assert!(validate(&receipt).is_ok());
    }

    #[test]
    fn test_zero_items_rejected() {
        let mut receipt = valid_receipt();
        receipt.items.clear();

        assert_eq!(
            validate(&receipt),
            Err(ValidationError::TooFew {
                field: "items".to_string(),
                min: 1,
                actual: 0,
            })
        );
    }

    #[test]
    fn test_retailer_characters() {
        let mut receipt = valid_receipt();

        receipt.retailer = "Walgreens #42".to_string();
        assert_eq!(failing_field(&receipt), "retailer");

        receipt.retailer = "Café".to_string();
        assert_eq!(failing_field(&receipt), "retailer");

        receipt.retailer = String::new();
        assert_eq!(failing_field(&receipt), "retailer");

        receipt.retailer = "Mom & Pop-Shop_2".to_string();
        assert!(validate(&receipt).is_ok());
    }

    #[test]
    fn test_total_shape() {
        let mut receipt = valid_receipt();

        for bad in ["9", "9.0", "9.000", "-9.00", ".00", "9.00\n", "٩.٠٠"] {
            receipt.total = bad.to_string();
            assert_eq!(failing_field(&receipt), "total", "total {bad:?}");
        }
    }

    #[test]
    fn test_date_and_time_are_anchored() {
        let mut receipt = valid_receipt();

        receipt.purchase_date = "on 2022-03-20".to_string();
        assert_eq!(failing_field(&receipt), "purchaseDate");

        receipt.purchase_date = "2022-03-20".to_string();
        receipt.purchase_time = "14:33:00".to_string();
        assert_eq!(failing_field(&receipt), "purchaseTime");

        // Shape only: an impossible calendar date still passes.
        receipt.purchase_time = "14:33".to_string();
        receipt.purchase_date = "2022-13-99".to_string();
        assert!(validate(&receipt).is_ok());
    }

    #[test]
    fn test_item_price_with_one_decimal_rejected() {
        let mut receipt = valid_receipt();
        receipt.items[2].price = "1.5".to_string();

        match validate(&receipt) {
            Err(ValidationError::Element { field, index, source }) => {
                assert_eq!(field, "items");
                assert_eq!(index, 2);
                assert_eq!(source.field(), "price");
            }
            other => panic!("expected element error, got {other:?}"),
        }
    }

    #[test]
    fn test_item_description_rejects_ampersand() {
        let mut receipt = valid_receipt();
        receipt.items[0].short_description = "Salt & Vinegar".to_string();

        assert!(matches!(
            validate(&receipt),
            Err(ValidationError::Element { index: 0, .. })
        ));
    }

    #[test]
    fn test_first_failure_in_declared_order_wins() {
        let mut receipt = valid_receipt();
        receipt.retailer = "!!!".to_string();
        receipt.total = "oops".to_string();
        receipt.items.clear();

        assert_eq!(failing_field(&receipt), "retailer");

        receipt.retailer = "Target".to_string();
        assert_eq!(failing_field(&receipt), "items");
    }

    #[test]
    fn test_count_checked_before_elements() {
        struct Basket {
            lines: Vec<Item>,
        }

        static BASKET_RULES: LazyLock<Vec<FieldRule<Basket>>> = LazyLock::new(|| {
            vec![FieldRule::min_count("lines", |b: &Basket| Field::records(&b.lines), 3)]
        });

        impl Schema for Basket {
            fn rules() -> &'static [FieldRule<Self>] {
                &BASKET_RULES
            }
        }

        let basket = Basket {
            lines: vec![Item::new("bad!", "1.00")],
        };
        assert!(matches!(
            validate(&basket),
            Err(ValidationError::TooFew { min: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_rule_on_wrong_field_shape() {
        struct Misdeclared {
            name: String,
        }

        static MISDECLARED_RULES: LazyLock<Vec<FieldRule<Misdeclared>>> = LazyLock::new(|| {
            vec![FieldRule::min_count("name", |m: &Misdeclared| Field::Text(&m.name), 1)]
        });

        impl Schema for Misdeclared {
            fn rules() -> &'static [FieldRule<Self>] {
                &MISDECLARED_RULES
            }
        }

        let record = Misdeclared {
            name: "x".to_string(),
        };
        assert_eq!(
            validate(&record),
            Err(ValidationError::RuleMismatch {
                field: "name".to_string(),
                rule: "min_count",
            })
        );
    }

    #[test]
    fn test_tables_are_declared_in_wire_order() {
        let names: Vec<_> = Receipt::rules().iter().map(FieldRule::name).collect();
        assert_eq!(
            names,
            ["retailer", "purchaseDate", "purchaseTime", "items", "total"]
        );

        let names: Vec<_> = Item::rules().iter().map(FieldRule::name).collect();
        assert_eq!(names, ["shortDescription", "price"]);
    }
}
