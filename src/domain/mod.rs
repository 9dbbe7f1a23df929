//! Domain layer: benefit categories, transactions, response codes and the
//! ports the authorizer talks to.

pub mod category;
pub mod context;
pub mod merchant;
pub mod ports;
pub mod response;
pub mod transaction;
