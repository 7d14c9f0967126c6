use rust_decimal::Decimal;

/// The atomic fact of the ledger: one amount owed, tying exactly one
/// member, one category and one month. At most one due exists per
/// (member, category, month) triple.
#[derive(Debug, Clone)]
pub struct Due {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub is_late: bool,
    pub member_id: i64,
    pub category_id: i64,
    pub month_id: i64,
}

impl Due {
    /// A freshly backfilled matrix cell: nothing paid, not late.
    pub fn new_zero(member_id: i64, category_id: i64, month_id: i64) -> Self {
        Self {
            id: None,
            amount: Decimal::ZERO,
            is_late: false,
            member_id,
            category_id,
            month_id,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// The due occupying one matrix cell, if present in the loaded set.
    pub fn find(dues: &[Due], member_id: i64, category_id: i64, month_id: i64) -> Option<&Due> {
        dues.iter().find(|d| {
            d.member_id == member_id && d.category_id == category_id && d.month_id == month_id
        })
    }
}
