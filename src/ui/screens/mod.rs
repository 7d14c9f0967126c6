pub(crate) mod categories;
pub(crate) mod dashboard;
pub(crate) mod dues;
pub(crate) mod members;
pub(crate) mod months;
