use crate::domain::transaction::Transaction;
use crate::error::{AuthorizerError, Result};
use std::io::Read;

/// Reads transactions from a CSV source with the header `mcc,amount,merchant`.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Transaction>`.
/// Only headers are trimmed: merchant names are fixed-width and matched with
/// their padding intact.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(AuthorizerError::from))
    }
}
