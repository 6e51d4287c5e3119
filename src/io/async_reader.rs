//! Asynchronous CSV reader with batch interface
//!
//! Reads operation scripts with csv-async so the async strategy can pull
//! records in batches without blocking the runtime.
//!
//! ```text
//! CSV source → AsyncReader → Batches of OperationRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerError, OperationRecord};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Maintains streaming behavior with constant memory usage per batch.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    skipped: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader over `reader`
    ///
    /// Same parsing rules as the synchronous reader: trimmed fields and
    /// rows shorter than the header.
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            skipped: 0,
        }
    }

    /// Read up to `batch_size` operation records
    ///
    /// Rows that fail to parse are logged at `warn` with their line number
    /// and skipped. Returns an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<OperationRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let row = match records.next().await {
                Some(row) => row,
                None => break,
            };
            self.line_num += 1;

            let parsed = row
                .map_err(|e| e.to_string())
                .and_then(convert_csv_record);
            match parsed {
                Ok(record) => batch.push(record),
                Err(message) => {
                    self.skipped += 1;
                    let error = LedgerError::ParseError {
                        line: Some(self.line_num),
                        message,
                    };
                    warn!(kind = error.kind(), "skipping record: {}", error);
                }
            }
        }

        batch
    }

    /// Number of rows skipped so far because they failed to parse
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
