pub mod order_reader;
pub mod settlement_writer;
