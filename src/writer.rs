// src/writer.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single consumer that drains batches into the CSV sink

use crossbeam_channel::Receiver;
use csv::WriterBuilder;
use std::io::Write;

use crate::constants::HEADER;
use crate::error::{PipelineError, Result};
use crate::generator::Batch;

/// Counts reported by the writer once the queue is drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub batches_written: u64,
    pub rows_written: u64,
}

/// Owns the output sink and the progress counter
///
/// The header is written once, before the first batch. Batches are written in
/// whatever order they arrive; records inside a batch keep their order.
pub struct BatchWriter<W: Write> {
    csv: csv::Writer<W>,
    total_batches: u64,
    header_written: bool,
    report_progress: bool,
    summary: WriteSummary,
}

impl<W: Write> BatchWriter<W> {
    pub fn new(sink: W, total_batches: u64, report_progress: bool) -> Self {
        // Header is written explicitly so it appears even when there are no rows
        let csv = WriterBuilder::new().has_headers(false).from_writer(sink);
        Self {
            csv,
            total_batches,
            header_written: false,
            report_progress,
            summary: WriteSummary::default(),
        }
    }

    pub fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            self.csv.write_record(HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Serialize every record of `batch`, then bump the progress counter
    pub fn write_batch(&mut self, batch: &Batch) -> Result<()> {
        self.write_header()?;

        for record in &batch.records {
            self.csv.serialize(record)?;
        }

        self.summary.batches_written += 1;
        self.summary.rows_written += batch.len() as u64;

        tracing::debug!(
            "wrote batch index={} ({} rows), {}/{} done",
            batch.index,
            batch.len(),
            self.summary.batches_written,
            self.total_batches
        );
        if self.report_progress {
            println!(
                "Wrote batch {}/{}",
                self.summary.batches_written, self.total_batches
            );
        }
        Ok(())
    }

    /// Receive batches until every sender is dropped and the queue is empty
    ///
    /// Consumes `rx`: on error the receiver is dropped with the writer, which
    /// fails any producer still blocked on a full queue.
    pub fn drain(mut self, rx: Receiver<Batch>) -> Result<(WriteSummary, W)> {
        self.write_header()?;

        for batch in rx.iter() {
            self.write_batch(&batch)?;
        }

        self.finish()
    }

    /// Flush and hand the sink back
    pub fn finish(mut self) -> Result<(WriteSummary, W)> {
        self.write_header()?;
        self.csv.flush()?;

        let summary = self.summary;
        let sink = self
            .csv
            .into_inner()
            .map_err(|e| PipelineError::Io(e.into_error()))?;
        Ok((summary, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_batch;
    use chrono::Utc;
    use std::io;

    /// Sink that fails once `limit` bytes have been accepted
    #[derive(Debug)]
    struct FailingSink {
        written: usize,
        limit: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written + buf.len() > self.limit {
                return Err(io::Error::other("disk full"));
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn output_lines(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_header_only_when_empty() {
        let writer = BatchWriter::new(Vec::new(), 0, false);
        let (summary, buf) = writer.finish().unwrap();
        assert_eq!(summary, WriteSummary::default());
        assert_eq!(output_lines(buf), vec![HEADER.join(",")]);
    }

    #[test]
    fn test_header_written_once() {
        let now = Utc::now();
        let mut writer = BatchWriter::new(Vec::new(), 2, false);
        writer.write_header().unwrap();
        writer.write_batch(&generate_batch(1, 3, 5, now)).unwrap();
        writer.write_header().unwrap();
        writer.write_batch(&generate_batch(0, 3, 6, now)).unwrap();

        let (summary, buf) = writer.finish().unwrap();
        assert_eq!(summary.batches_written, 2);
        assert_eq!(summary.rows_written, 6);

        let lines = output_lines(buf);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(lines.iter().filter(|l| **l == HEADER.join(",")).count(), 1);
    }

    #[test]
    fn test_record_order_within_batch() {
        let batch = generate_batch(0, 10, 77, Utc::now());
        let mut writer = BatchWriter::new(Vec::new(), 1, false);
        writer.write_batch(&batch).unwrap();
        let (_, buf) = writer.finish().unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let emails: Vec<String> = rdr
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        let expected: Vec<String> = batch.records.iter().map(|r| r.email.clone()).collect();
        assert_eq!(emails, expected);
    }

    #[test]
    fn test_drain_until_closed() {
        let now = Utc::now();
        let (tx, rx) = crossbeam_channel::bounded(2);
        let producer = std::thread::spawn(move || {
            for i in 0..5 {
                tx.send(generate_batch(i, 4, i, now)).unwrap();
            }
        });

        let writer = BatchWriter::new(Vec::new(), 5, false);
        let (summary, buf) = writer.drain(rx).unwrap();
        producer.join().unwrap();

        assert_eq!(summary.batches_written, 5);
        assert_eq!(summary.rows_written, 20);
        assert_eq!(output_lines(buf).len(), 21);
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let sink = FailingSink {
            written: 0,
            limit: 512,
        };
        let (tx, rx) = crossbeam_channel::bounded(1);
        let now = Utc::now();
        let producer = std::thread::spawn(move || {
            let mut sent = 0;
            for i in 0..100 {
                if tx.send(generate_batch(i, 50, i, now)).is_err() {
                    break;
                }
                sent += 1;
            }
            sent
        });

        let writer = BatchWriter::new(sink, 100, false);
        let err = writer.drain(rx).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_) | PipelineError::Io(_)));

        // The producer is released once the receiver is dropped
        let sent = producer.join().unwrap();
        assert!(sent < 100);
    }
}
