use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    Invoice,
    Received,
    Pending,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Received => "Received",
            Self::Pending => "Pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoice" => Some(Self::Invoice),
            "received" => Some(Self::Received),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Amounts are currency; keep whole cents only.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub project_id: i64,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub project_id: i64,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
}
