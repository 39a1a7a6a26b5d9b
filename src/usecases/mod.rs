pub mod accounts;
pub mod carts;
pub mod checkout;
pub mod history;
