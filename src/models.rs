/// Header of the category column appended to every processed statement.
pub const CATEGORY_HEADER: &str = "Category";

/// String form an absent cell takes when rules are matched against it.
pub const ABSENT: &str = "nan";

/// Columns kept from a bank export, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    BookingDate,
    Counterparty,
    BookingText,
    Purpose,
    Amount,
    Balance,
    MandateReference,
    Currency,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::BookingDate,
        Column::Counterparty,
        Column::BookingText,
        Column::Purpose,
        Column::Amount,
        Column::Balance,
        Column::MandateReference,
        Column::Currency,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::BookingDate => "Buchungstag",
            Self::Counterparty => "Name Zahlungsbeteiligter",
            Self::BookingText => "Buchungstext",
            Self::Purpose => "Verwendungszweck",
            Self::Amount => "Betrag",
            Self::Balance => "Saldo nach Buchung",
            Self::MandateReference => "Mandatsreferenz",
            Self::Currency => "Waehrung",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    /// `YYYY-MM-DD` after normalization, `None` when absent or unparseable.
    pub booking_date: Option<String>,
    pub counterparty: Option<String>,
    pub booking_text: Option<String>,
    pub purpose: Option<String>,
    pub amount: Option<String>,
    pub balance: Option<String>,
    pub mandate_reference: Option<String>,
    pub currency: Option<String>,
    pub category: Option<String>,
}

impl Transaction {
    pub fn field(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::BookingDate => &self.booking_date,
            Column::Counterparty => &self.counterparty,
            Column::BookingText => &self.booking_text,
            Column::Purpose => &self.purpose,
            Column::Amount => &self.amount,
            Column::Balance => &self.balance,
            Column::MandateReference => &self.mandate_reference,
            Column::Currency => &self.currency,
        };
        value.as_deref()
    }

    pub fn field_mut(&mut self, column: Column) -> &mut Option<String> {
        match column {
            Column::BookingDate => &mut self.booking_date,
            Column::Counterparty => &mut self.counterparty,
            Column::BookingText => &mut self.booking_text,
            Column::Purpose => &mut self.purpose,
            Column::Amount => &mut self.amount,
            Column::Balance => &mut self.balance,
            Column::MandateReference => &mut self.mandate_reference,
            Column::Currency => &mut self.currency,
        }
    }

    /// The value rules are matched against: absent cells become [`ABSENT`].
    pub fn match_text(&self, column: Column) -> &str {
        self.field(column).unwrap_or(ABSENT)
    }
}

/// A normalized statement: the kept columns (allow-list order) and its rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub columns: Vec<Column>,
    pub transactions: Vec<Transaction>,
}

/// Intermediate representation of a CSV file before normalization.
/// Every row has exactly `headers.len()` cells; empty cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Position of the first column with this header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingRule {
    pub pattern: String,
    pub category: String,
}
