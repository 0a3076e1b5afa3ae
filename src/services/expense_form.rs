//! Expense entry form: draft state, input parsing and submission.
//!
//! The draft keeps the numeric floors as invariants: quantity never drops
//! below 1.0 and unit value never below 0.0. Out-of-range numbers are
//! clamped, not rejected. The total is derived on every read.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::models::expense::{
    Category, ExpenseRecord, PaymentMethod, Unit, UnknownLabel, parse_display_date,
};

/// Smallest accepted quantity.
pub const MIN_QUANTITY: f64 = 1.0;

/// Smallest accepted unit value.
pub const MIN_UNIT_VALUE: f64 = 0.0;

/// Accepted date range, in years.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

/// Raw form fields as posted by the browser.
///
/// Every field is optional text; parsing happens in `ExpenseForm::apply`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub unit_value: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub notes: String,
}

/// Reasons a posted form cannot be applied to the draft.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Data inválida: {0:?}")]
    InvalidDate(String),

    #[error("Categoria desconhecida: {0:?}")]
    UnknownCategory(String),

    #[error("Unidade desconhecida: {0:?}")]
    UnknownUnit(String),

    #[error("Forma de pagamento desconhecida: {0:?}")]
    UnknownPaymentMethod(String),

    #[error("Valor numérico inválido em {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Draft of the record being entered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    date: NaiveDate,
    category: Category,
    description: String,
    quantity: f64,
    unit: Unit,
    unit_value: f64,
    payment_method: PaymentMethod,
    notes: String,
}

impl ExpenseForm {
    /// Fresh draft dated `today` with every choice on its first option.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            category: Category::ALL[0],
            description: String::new(),
            quantity: MIN_QUANTITY,
            unit: Unit::ALL[0],
            unit_value: MIN_UNIT_VALUE,
            payment_method: PaymentMethod::ALL[0],
            notes: String::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn unit_value(&self) -> f64 {
        self.unit_value
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// `quantity * unit_value`, shown before submission.
    pub fn total_value(&self) -> f64 {
        self.quantity * self.unit_value
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = clamp_floor(quantity, MIN_QUANTITY);
    }

    pub fn set_unit_value(&mut self, unit_value: f64) {
        self.unit_value = clamp_floor(unit_value, MIN_UNIT_VALUE);
    }

    /// Parse the posted fields and replace the draft with them.
    ///
    /// All fields are parsed before any is written, so a failed apply
    /// leaves the draft untouched.
    pub fn apply(&mut self, input: &FormInput) -> Result<(), ValidationError> {
        let date = parse_input_date(&input.date)?;
        let category = parse_label::<Category>(&input.category)
            .map_err(|e| ValidationError::UnknownCategory(e.0))?;
        let unit =
            parse_label::<Unit>(&input.unit).map_err(|e| ValidationError::UnknownUnit(e.0))?;
        let payment_method = parse_label::<PaymentMethod>(&input.payment_method)
            .map_err(|e| ValidationError::UnknownPaymentMethod(e.0))?;
        let quantity = parse_number("quantidade", &input.quantity, MIN_QUANTITY)?;
        let unit_value = parse_number("valor_unitario", &input.unit_value, MIN_UNIT_VALUE)?;

        let total = clamp_floor(quantity, MIN_QUANTITY) * clamp_floor(unit_value, MIN_UNIT_VALUE);
        if !total.is_finite() {
            return Err(ValidationError::InvalidNumber {
                field: "valor_total",
                value: format!("{} x {}", input.quantity.trim(), input.unit_value.trim()),
            });
        }

        self.date = date;
        self.category = category;
        self.description = input.description.trim().to_string();
        self.unit = unit;
        self.payment_method = payment_method;
        self.notes = input.notes.trim().to_string();
        self.set_quantity(quantity);
        self.set_unit_value(unit_value);

        Ok(())
    }

    /// Build the immutable record for the current draft.
    pub fn to_record(&self) -> ExpenseRecord {
        ExpenseRecord::new(
            self.date,
            self.category,
            self.description.clone(),
            self.quantity,
            self.unit,
            self.unit_value,
            self.payment_method,
            self.notes.clone(),
        )
    }

    /// Apply the posted fields and produce the record to append.
    pub fn submit(&mut self, input: &FormInput) -> Result<ExpenseRecord, ValidationError> {
        self.apply(input)?;
        Ok(self.to_record())
    }
}

fn clamp_floor(value: f64, floor: f64) -> f64 {
    if value < floor { floor } else { value }
}

/// Accepts the HTML date input format and the display format, limited to
/// the years a spreadsheet date can hold.
fn parse_input_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_display_date(text))
        .filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
        .ok_or_else(|| ValidationError::InvalidDate(text.to_string()))
}

fn parse_label<T: std::str::FromStr<Err = UnknownLabel>>(text: &str) -> Result<T, UnknownLabel> {
    text.trim().parse()
}

/// Empty input means the floor; anything else must be a finite number.
fn parse_number(field: &'static str, text: &str, floor: f64) -> Result<f64, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(floor);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn input(quantity: &str, unit_value: &str) -> FormInput {
        FormInput {
            date: "2024-06-01".to_string(),
            category: "Matéria-prima".to_string(),
            description: "fio de algodão".to_string(),
            quantity: quantity.to_string(),
            unit: "Kg".to_string(),
            unit_value: unit_value.to_string(),
            payment_method: "PIX".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn new_form_starts_at_floors() {
        let form = ExpenseForm::new(today());
        assert_eq!(form.quantity(), 1.0);
        assert_eq!(form.unit_value(), 0.0);
        assert_eq!(form.total_value(), 0.0);
        assert_eq!(form.date(), today());
        assert_eq!(form.category(), Category::RawMaterial);
    }

    #[test]
    fn total_tracks_every_input_change() {
        let mut form = ExpenseForm::new(today());
        let pairs = [(1.0, 0.0), (10.0, 5.0), (2.5, 3.3), (7.0, 0.01), (1000.0, 12.75)];
        for (quantity, unit_value) in pairs {
            form.set_quantity(quantity);
            form.set_unit_value(unit_value);
            assert!((form.total_value() - quantity * unit_value).abs() < 1e-9);
        }
    }

    #[test]
    fn numbers_below_floor_are_clamped() {
        let mut form = ExpenseForm::new(today());
        form.apply(&input("0.2", "-4")).unwrap();
        assert_eq!(form.quantity(), 1.0);
        assert_eq!(form.unit_value(), 0.0);
    }

    #[test]
    fn empty_numbers_use_floor() {
        let mut form = ExpenseForm::new(today());
        form.apply(&input("", "")).unwrap();
        assert_eq!(form.quantity(), 1.0);
        assert_eq!(form.unit_value(), 0.0);
    }

    #[test]
    fn submit_builds_record_with_derived_total() {
        let mut form = ExpenseForm::new(today());
        let record = form.submit(&input("10", "5.00")).unwrap();
        assert_eq!(record.total_value, 50.0);
        assert_eq!(record.category, Category::RawMaterial);
        assert_eq!(record.unit, Unit::Kilogram);
        assert_eq!(record.formatted_date(), "01/06/2024");
        assert_eq!(record.description, "fio de algodão");
    }

    #[test]
    fn display_date_format_is_accepted() {
        let mut form = ExpenseForm::new(today());
        let mut fields = input("1", "1");
        fields.date = "15/07/2024".to_string();
        form.apply(&fields).unwrap();
        assert_eq!(form.date(), NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
    }

    #[test]
    fn bad_input_leaves_draft_untouched() {
        let mut form = ExpenseForm::new(today());
        form.apply(&input("3", "2")).unwrap();
        let before = form.clone();

        let mut fields = input("9", "9");
        fields.category = "Aluguel".to_string();
        assert_eq!(
            form.apply(&fields),
            Err(ValidationError::UnknownCategory("Aluguel".to_string()))
        );
        assert_eq!(form, before);

        assert!(matches!(
            form.apply(&input("abc", "1")),
            Err(ValidationError::InvalidNumber { field: "quantidade", .. })
        ));
        assert!(matches!(
            form.apply(&input("1", "inf")),
            Err(ValidationError::InvalidNumber { field: "valor_unitario", .. })
        ));

        let mut fields = input("1", "1");
        fields.date = "ontem".to_string();
        assert_eq!(
            form.apply(&fields),
            Err(ValidationError::InvalidDate("ontem".to_string()))
        );
        assert_eq!(form, before);
    }

    #[test]
    fn dates_outside_spreadsheet_range_are_rejected() {
        let mut form = ExpenseForm::new(today());
        for text in ["0500-01-01", "1899-12-31", "01/01/0001", "+10000-01-01"] {
            let mut fields = input("1", "1");
            fields.date = text.to_string();
            assert_eq!(
                form.apply(&fields),
                Err(ValidationError::InvalidDate(text.to_string()))
            );
        }
        assert_eq!(form.date(), today());

        let mut fields = input("1", "1");
        fields.date = "1900-01-01".to_string();
        form.apply(&fields).unwrap();
        fields.date = "31/12/9999".to_string();
        form.apply(&fields).unwrap();
        assert_eq!(form.date(), NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let mut form = ExpenseForm::new(today());
        form.apply(&input("3", "2")).unwrap();
        let before = form.clone();

        assert!(matches!(
            form.apply(&input("1e200", "1e200")),
            Err(ValidationError::InvalidNumber { field: "valor_total", .. })
        ));
        assert_eq!(form, before);
        assert!(form.total_value().is_finite());
    }
}
