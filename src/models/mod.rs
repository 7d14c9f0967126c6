mod category;
mod due;
mod member;
mod month;

pub use category::Category;
pub use due::Due;
pub use member::Member;
pub use month::{Month, MonthName};

#[cfg(test)]
mod tests;
