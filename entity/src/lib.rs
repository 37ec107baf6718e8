//! sea-orm entities backing the HR product.

pub mod employees;
