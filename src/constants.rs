// src/constants.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Default total number of rows to generate
pub const DEFAULT_ROW_COUNT: u64 = 50_000_000;

/// Default rows per batch (one batch = one unit of work for a worker)
pub const DEFAULT_BATCH_SIZE: usize = 1_000_000;

/// Default number of producer workers
pub const DEFAULT_WORKERS: usize = 4;

/// Buffer size for the output file writer (1 MiB)
/// Batches are large, so a bigger buffer keeps syscalls per batch low
pub const WRITE_BUFFER_SIZE: usize = 1024 * 1024;

/// Number of columns in every record
pub const COLUMN_COUNT: usize = 20;

/// Output header, in column order
pub const HEADER: [&str; COLUMN_COUNT] = [
    "email",
    "uuid",
    "phone_number",
    "test_identifier",
    "event_name",
    "timestamp",
    "test_parameter1",
    "test_parameter2",
    "email_optin",
    "test_attr",
    "age",
    "country",
    "whatsapp_optin",
    "birthday",
    "currency",
    "quantity",
    "event_group_id",
    "unit_sale_price",
    "unit_price",
    "updated_at",
];
