//! Static registry of field constraints and the rules for their values.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::Constraint;

/// Field-type groups constraints can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeGroup {
    String,
    Number,
    Date,
    Boolean,
    Binary,
    Collection,
    Object,
    /// Wildcard: applies to every group.
    All,
}

/// How many values a constraint carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueArity {
    None,
    Single,
    Double,
}

/// Which values must be present, independent of arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredValues {
    None,
    First,
    Both,
    AtLeastOne,
}

/// A registered constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintDefinition {
    pub name: &'static str,
    pub groups: &'static [TypeGroup],
    pub arity: ValueArity,
    /// Explicit validation mode; `None` follows the arity.
    pub validation: Option<RequiredValues>,
    pub labels: [Option<&'static str>; 2],
    pub placeholders: [Option<&'static str>; 2],
}

impl ConstraintDefinition {
    pub fn required_values(&self) -> RequiredValues {
        self.validation.unwrap_or(match self.arity {
            ValueArity::None => RequiredValues::None,
            ValueArity::Single => RequiredValues::First,
            ValueArity::Double => RequiredValues::Both,
        })
    }

    pub fn applies_to(&self, group: TypeGroup) -> bool {
        self.groups
            .iter()
            .any(|candidate| *candidate == TypeGroup::All || *candidate == group)
    }
}

const fn flag(
    name: &'static str,
    groups: &'static [TypeGroup],
) -> ConstraintDefinition {
    ConstraintDefinition {
        name,
        groups,
        arity: ValueArity::None,
        validation: None,
        labels: [None, None],
        placeholders: [None, None],
    }
}

const fn single(
    name: &'static str,
    groups: &'static [TypeGroup],
    label: &'static str,
    placeholder: &'static str,
) -> ConstraintDefinition {
    ConstraintDefinition {
        name,
        groups,
        arity: ValueArity::Single,
        validation: None,
        labels: [Some(label), None],
        placeholders: [Some(placeholder), None],
    }
}

const fn double(
    name: &'static str,
    groups: &'static [TypeGroup],
    validation: RequiredValues,
    labels: [&'static str; 2],
    placeholders: [&'static str; 2],
) -> ConstraintDefinition {
    ConstraintDefinition {
        name,
        groups,
        arity: ValueArity::Double,
        validation: Some(validation),
        labels: [Some(labels[0]), Some(labels[1])],
        placeholders: [Some(placeholders[0]), Some(placeholders[1])],
    }
}

use TypeGroup as G;

/// Sorted by name.
static DEFINITIONS: &[ConstraintDefinition] = &[
    flag("AssertFalse", &[G::Boolean]),
    flag("AssertTrue", &[G::Boolean]),
    double(
        "DecimalMax",
        &[G::Number],
        RequiredValues::First,
        ["Value", "Inclusive"],
        ["100.00", "true"],
    ),
    double(
        "DecimalMin",
        &[G::Number],
        RequiredValues::First,
        ["Value", "Inclusive"],
        ["0.00", "true"],
    ),
    double(
        "Digits",
        &[G::Number],
        RequiredValues::Both,
        ["Integer digits", "Fraction digits"],
        ["10", "2"],
    ),
    flag("Email", &[G::String]),
    flag("Future", &[G::Date]),
    flag("FutureOrPresent", &[G::Date]),
    single("Max", &[G::Number], "Maximum", "100"),
    single("Min", &[G::Number], "Minimum", "0"),
    flag("Negative", &[G::Number]),
    flag("NegativeOrZero", &[G::Number]),
    flag("NotBlank", &[G::String]),
    flag("NotEmpty", &[G::String, G::Collection]),
    flag("NotNull", &[G::All]),
    flag("Null", &[G::All]),
    flag("Past", &[G::Date]),
    flag("PastOrPresent", &[G::Date]),
    single("Pattern", &[G::String], "Regular expression", "^[A-Za-z]+$"),
    flag("Positive", &[G::Number]),
    flag("PositiveOrZero", &[G::Number]),
    double(
        "Size",
        &[G::String, G::Collection],
        RequiredValues::AtLeastOne,
        ["Min", "Max"],
        ["0", "255"],
    ),
];

/// Every registered definition, sorted by name.
pub fn definitions() -> &'static [ConstraintDefinition] {
    DEFINITIONS
}

pub fn definition(name: &str) -> Option<&'static ConstraintDefinition> {
    DEFINITIONS
        .binary_search_by(|def| def.name.cmp(name))
        .ok()
        .map(|idx| &DEFINITIONS[idx])
}

/// Resolve a field type to its constraint group.
///
/// Collection types (`List<T>`, `Set<T>`, `T[]`) always resolve to
/// [`TypeGroup::Collection`]; unknown types resolve to `None`.
pub fn type_group(field_type: &str) -> Option<TypeGroup> {
    let trimmed = field_type.trim();
    if trimmed.ends_with("[]") {
        return Some(TypeGroup::Collection);
    }

    let base = trimmed.split('<').next().unwrap_or(trimmed).trim();
    if trimmed.contains('<') {
        return match base {
            "List" | "Set" | "Collection" | "Iterable" => Some(TypeGroup::Collection),
            "Map" => Some(TypeGroup::Object),
            _ => None,
        };
    }

    match base {
        "String" | "Character" | "char" | "UUID" | "Text" => Some(TypeGroup::String),
        "Integer" | "int" | "Long" | "long" | "Short" | "short" | "Byte" | "byte" | "Double"
        | "double" | "Float" | "float" | "BigDecimal" | "BigInteger" => Some(TypeGroup::Number),
        "LocalDate" | "LocalDateTime" | "LocalTime" | "Instant" | "Date" | "ZonedDateTime"
        | "OffsetDateTime" => Some(TypeGroup::Date),
        "Boolean" | "boolean" => Some(TypeGroup::Boolean),
        "Blob" | "Binary" => Some(TypeGroup::Binary),
        "Object" | "Map" | "JsonNode" => Some(TypeGroup::Object),
        _ => None,
    }
}

/// Constraint names applicable to a field type, sorted lexicographically.
///
/// Unknown types are unrestricted and get every name.
pub fn options_for_field_type(field_type: &str) -> Vec<&'static str> {
    let group = type_group(field_type);
    let mut names: Vec<&'static str> = DEFINITIONS
        .iter()
        .filter(|def| group.is_none_or(|group| def.applies_to(group)))
        .map(|def| def.name)
        .collect();
    names.sort_unstable();
    names
}

pub fn is_applicable(name: &str, field_type: &str) -> bool {
    match (definition(name), type_group(field_type)) {
        (Some(def), Some(group)) => def.applies_to(group),
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// First problem found in a field's constraint list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("constraint #{index} is missing a name")]
    MissingName { index: usize },
    #[error("constraint '{name}' is declared more than once")]
    Duplicate { name: String },
    #[error("constraint '{name}' requires {requirement}")]
    MissingValue {
        name: String,
        requirement: &'static str,
    },
    #[error("constraint '{name}': {message}")]
    InvalidValue { name: String, message: String },
}

/// Validate a field's constraint list, returning the first error.
///
/// Checks run in passes over the whole list: names, duplicates, required
/// values, then value formats.
pub fn validate_constraint_list(constraints: &[Constraint]) -> Result<(), ConstraintError> {
    for (index, constraint) in constraints.iter().enumerate() {
        if constraint.name.trim().is_empty() {
            return Err(ConstraintError::MissingName { index });
        }
    }

    let mut seen = HashSet::new();
    for constraint in constraints {
        if !seen.insert(constraint.name.trim()) {
            return Err(ConstraintError::Duplicate {
                name: constraint.name.trim().to_string(),
            });
        }
    }

    for constraint in constraints {
        check_required_values(constraint)?;
    }

    for constraint in constraints {
        check_value_format(constraint)?;
    }

    Ok(())
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn check_required_values(constraint: &Constraint) -> Result<(), ConstraintError> {
    let Some(def) = definition(constraint.name.trim()) else {
        return Ok(());
    };

    let first = present(&constraint.value).is_some();
    let second = present(&constraint.value2).is_some();
    let missing = match def.required_values() {
        RequiredValues::None => None,
        RequiredValues::First if !first => Some("a value"),
        RequiredValues::Both if !(first && second) => Some("both values"),
        RequiredValues::AtLeastOne if !(first || second) => Some("at least one value"),
        _ => None,
    };

    match missing {
        Some(requirement) => Err(ConstraintError::MissingValue {
            name: def.name.to_string(),
            requirement,
        }),
        None => Ok(()),
    }
}

fn check_value_format(constraint: &Constraint) -> Result<(), ConstraintError> {
    let name = constraint.name.trim();
    let invalid = |message: String| ConstraintError::InvalidValue {
        name: name.to_string(),
        message,
    };

    match name {
        "Size" | "Digits" => {
            for value in [present(&constraint.value), present(&constraint.value2)]
                .into_iter()
                .flatten()
            {
                if value.parse::<i64>().is_err() {
                    return Err(invalid(format!("'{value}' must be an integer")));
                }
            }
        }
        "Min" | "Max" | "DecimalMin" | "DecimalMax" => {
            if let Some(value) = present(&constraint.value)
                && !is_numeric(value)
            {
                return Err(invalid(format!("'{value}' must be numeric")));
            }
            if matches!(name, "DecimalMin" | "DecimalMax")
                && let Some(flag) = present(&constraint.value2)
                && !flag.eq_ignore_ascii_case("true")
                && !flag.eq_ignore_ascii_case("false")
            {
                return Err(invalid(format!("'{flag}' must be true or false")));
            }
        }
        _ => {}
    }

    Ok(())
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(f64::is_finite)
        && value
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E'))
}
