//! Expense record model and its fixed option lists.
//!
//! This module defines:
//! - `Category`, `Unit`, `PaymentMethod`: the fixed choices offered by the entry form
//! - `ExpenseRecord`: one immutable expense entry
//! - `ExpenseRow`: the flat database row the durable store reads back

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Display format for record dates (day/month/year).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Column names shown in the dashboard table and the exported sheet, in record order.
pub const COLUMNS: [&str; 9] = [
    "Data",
    "Categoria",
    "Descrição",
    "Quantidade",
    "Unidade",
    "Valor Unitário (R$)",
    "Valor Total (R$)",
    "Forma de Pagamento",
    "Observações",
];

/// Error returned when a label does not match any fixed option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option: {0}")]
pub struct UnknownLabel(pub String);

/// Generates the label plumbing shared by the fixed-choice enums.
///
/// Each enum gets `ALL` (declaration order), `label()`, `Display` and a
/// `FromStr` that accepts the exact display label.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == s)
                    .ok_or_else(|| UnknownLabel(s.to_string()))
            }
        }
    };
}

labelled_enum! {
    /// Expense category. Ordering follows the form's option list.
    Category {
        RawMaterial => "Matéria-prima",
        Labor => "Mão de obra",
        Electricity => "Energia elétrica",
        MachineMaintenance => "Manutenção de máquinas",
        Packaging => "Embalagens",
        Transport => "Transporte",
        Administrative => "Despesas administrativas",
    }
}

labelled_enum! {
    /// Unit the quantity is measured in.
    Unit {
        Kilogram => "Kg",
        Count => "und",
        Month => "mês",
    }
}

labelled_enum! {
    /// How the expense was paid.
    PaymentMethod {
        Pix => "PIX",
        Boleto => "Boleto",
        Card => "Cartão",
        AutomaticDebit => "Débito automático",
        Cash => "Dinheiro",
    }
}

/// One recorded expense.
///
/// Records are append-only: they are built once from a submitted form and
/// never updated afterwards. `total_value` is always `quantity * unit_value`
/// as computed at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    pub quantity: f64,
    pub unit: Unit,
    pub unit_value: f64,
    pub total_value: f64,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

impl ExpenseRecord {
    /// Build a record, deriving the total from quantity and unit value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        category: Category,
        description: String,
        quantity: f64,
        unit: Unit,
        unit_value: f64,
        payment_method: PaymentMethod,
        notes: String,
    ) -> Self {
        Self {
            date,
            category,
            description,
            quantity,
            unit,
            unit_value,
            total_value: quantity * unit_value,
            payment_method,
            notes,
        }
    }

    /// Date rendered as `dd/mm/yyyy`.
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Parse a `dd/mm/yyyy` date as stored and displayed.
pub fn parse_display_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Row of the `gastos` table.
///
/// Column names follow the persisted schema; the date is kept as `dd/mm/yyyy`
/// text and the enums as their display labels.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenseRow {
    /// Auto-increment identity, only used for ordering
    pub id: i64,
    pub data: String,
    pub categoria: String,
    pub descricao: String,
    pub quantidade: f64,
    pub unidade: String,
    pub valor_unitario: f64,
    pub valor_total: f64,
    pub forma_pagamento: String,
    pub observacoes: String,
}

/// Decode a stored row back into a typed record.
///
/// The stored total is kept as-is rather than recomputed, so the record
/// reads back exactly as it was written.
impl TryFrom<ExpenseRow> for ExpenseRecord {
    type Error = AppError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let corrupt = |what: String| AppError::CorruptRecord(format!("row {}: {what}", row.id));

        let date = parse_display_date(&row.data)
            .ok_or_else(|| corrupt(format!("invalid date {:?}", row.data)))?;
        let category = row
            .categoria
            .parse::<Category>()
            .map_err(|e| corrupt(e.to_string()))?;
        let unit = row.unidade.parse::<Unit>().map_err(|e| corrupt(e.to_string()))?;
        let payment_method = row
            .forma_pagamento
            .parse::<PaymentMethod>()
            .map_err(|e| corrupt(e.to_string()))?;

        Ok(Self {
            date,
            category,
            description: row.descricao,
            quantity: row.quantidade,
            unit,
            unit_value: row.valor_unitario,
            total_value: row.valor_total,
            payment_method,
            notes: row.observacoes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>(), Ok(*category));
        }
        for unit in Unit::ALL {
            assert_eq!(unit.label().parse::<Unit>(), Ok(*unit));
        }
        for method in PaymentMethod::ALL {
            assert_eq!(method.label().parse::<PaymentMethod>(), Ok(*method));
        }
    }

    #[test]
    fn option_lists_have_fixed_sizes() {
        assert_eq!(Category::ALL.len(), 7);
        assert_eq!(Unit::ALL.len(), 3);
        assert_eq!(PaymentMethod::ALL.len(), 5);
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            "Aluguel".parse::<Category>(),
            Err(UnknownLabel("Aluguel".to_string()))
        );
        assert!("kg".parse::<Unit>().is_err());
    }

    #[test]
    fn new_derives_total() {
        let record = ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Category::RawMaterial,
            String::new(),
            10.0,
            Unit::Kilogram,
            5.0,
            PaymentMethod::Pix,
            String::new(),
        );
        assert_eq!(record.total_value, 50.0);
        assert_eq!(record.formatted_date(), "01/06/2024");
    }

    #[test]
    fn corrupt_row_is_reported() {
        let row = ExpenseRow {
            id: 7,
            data: "2024-06-01".to_string(),
            categoria: "Transporte".to_string(),
            descricao: String::new(),
            quantidade: 1.0,
            unidade: "und".to_string(),
            valor_unitario: 2.0,
            valor_total: 2.0,
            forma_pagamento: "PIX".to_string(),
            observacoes: String::new(),
        };
        assert!(matches!(
            ExpenseRecord::try_from(row),
            Err(AppError::CorruptRecord(_))
        ));
    }
}
