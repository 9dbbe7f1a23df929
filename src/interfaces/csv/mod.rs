pub mod reference_reader;
pub mod transaction_reader;
